mod document;
mod error;
mod parser;
mod search;
mod serialiser;
mod srt;

use crate::document::Document;
use crate::search::{ReplaceOutcome, SearchCursor};

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Edit SRT subtitles: renumber, merge, delete, find and replace")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
        default_value = "-"
    )]
    output: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Write a backup of the original input to the specified file."
    )]
    backup: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Append a new, empty subtitle at the end
    New,
    /// Delete the subtitles with the given ids
    Delete {
        #[arg(
            long,
            value_delimiter = ',',
            value_name = "IDS",
            help = "Comma-separated subtitle ids."
        )]
        ids: Vec<usize>,
    },
    /// Merge two or more subtitles into one
    Merge {
        #[arg(
            long,
            value_delimiter = ',',
            value_name = "IDS",
            help = "Comma-separated subtitle ids."
        )]
        ids: Vec<usize>,
    },
    /// List the subtitles whose text contains the query
    Find {
        query: String,
        #[arg(short, long, help = "Match case exactly.")]
        case_sensitive: bool,
    },
    /// Replace occurrences of the query in subtitle text
    Replace {
        query: String,
        replacement: String,
        #[arg(short, long, help = "Match case exactly.")]
        case_sensitive: bool,
        #[arg(long, help = "Replace only the first occurrence.")]
        first: bool,
    },
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let data = if cli.input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&cli.input)
            .context(format!("Failed to open input file: '{}'", cli.input))?
    };

    if let Some(backup_path) = cli.backup {
        std::fs::write(backup_path, &data)?;
    }

    let mut document = Document::from_entries(parser::parse(&data));
    if document.is_empty() {
        eprintln!("No valid subtitle blocks were found.");
    } else {
        eprintln!("Loaded {} subtitles.", document.len());
    }

    match cli.command {
        Some(Command::Find {
            query,
            case_sensitive,
        }) => {
            return find(&document, &query, case_sensitive);
        }
        Some(Command::New) => {
            let id = document.insert_new();
            eprintln!("Appended subtitle #{}.", id);
        }
        Some(Command::Delete { ids }) => {
            let removed = document.delete(&ids)?;
            eprintln!("Deleted {} subtitles.", removed);
        }
        Some(Command::Merge { ids }) => {
            let id = document.merge(&ids)?;
            eprintln!("Merged into subtitle #{}.", id);
        }
        Some(Command::Replace {
            query,
            replacement,
            case_sensitive,
            first,
        }) => {
            let mut cursor = SearchCursor::new();
            if first {
                replace_first(&mut cursor, &mut document, &query, &replacement, case_sensitive)?;
            } else {
                let count =
                    cursor.replace_all(&mut document, &query, &replacement, case_sensitive)?;
                if count == 0 {
                    eprintln!("No matches found for '{}'.", query);
                } else {
                    eprintln!("Replaced {} occurrences.", count);
                }
            }
        }
        None => (),
    }

    if cli.output == "-" {
        let dst = io::stdout();
        serialiser::serialise(&document, dst)?;
    } else {
        let dst = std::fs::File::create(&cli.output)
            .context(format!("Failed to create output file: '{}'", cli.output))?;
        serialiser::serialise(&document, dst)?;
    };

    Ok(())
}

fn replace_first(
    cursor: &mut SearchCursor,
    document: &mut Document,
    query: &str,
    replacement: &str,
    case_sensitive: bool,
) -> Result<()> {
    // A fresh cursor is idle, so the first call only locates the match.
    let outcome = cursor.replace(document, query, replacement, case_sensitive)?;
    let outcome = match outcome {
        ReplaceOutcome::Located(_) => {
            cursor.replace(document, query, replacement, case_sensitive)?
        }
        other => other,
    };

    match outcome {
        ReplaceOutcome::Replaced { id, .. } => {
            eprintln!("Replaced the first occurrence in subtitle #{}.", id);
        }
        _ => eprintln!("No matches found for '{}'.", query),
    }
    Ok(())
}

fn find(document: &Document, query: &str, case_sensitive: bool) -> Result<()> {
    let mut cursor = SearchCursor::new();
    let mut first_id = None;

    // The cursor is circular, so stop once it comes back around.
    while let Some(found) = cursor.find_next(document, query, case_sensitive)? {
        if first_id == Some(found.id) {
            break;
        }
        if first_id.is_none() {
            first_id = Some(found.id);
        }
        let entry = &document.entries()[found.index];
        println!("{}: {}", entry.id(), entry.text().replace('\n', " "));
    }

    if first_id.is_none() {
        eprintln!("No matches found for '{}'.", query);
    }
    Ok(())
}
