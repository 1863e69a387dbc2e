use crate::document::Document;
use crate::srt::SubtitleEntry;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

pub fn serialise<W: Write>(document: &Document, output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    writer
        .write_all(to_string(document).as_bytes())
        .context("Failed to write to output file.")?;
    writer.flush().context("Failed to write to output file.")?;
    Ok(())
}

pub fn to_string(document: &Document) -> String {
    // Entry text is emitted verbatim; a text that itself contains a blank
    // line will be read back as two blocks.
    document
        .entries()
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_entry(entry: &SubtitleEntry) -> String {
    format!(
        "{}\n{} --> {}\n{}",
        entry.id(),
        entry.start(),
        entry.end(),
        entry.text()
    )
}
