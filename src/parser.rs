use crate::srt::{SubtitleEntry, Timestamp};

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::all_consuming;
use nom::IResult;

pub fn parse(input: &str) -> Vec<SubtitleEntry> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let normalised = input.replace('\r', "");

    // Blocks that fail validation are dropped without comment; a file that
    // is malformed from start to finish simply yields no entries.
    normalised
        .split("\n\n")
        .filter_map(|block| parse_block(block.trim_start_matches('\n')))
        .collect()
}

fn parse_block(block: &str) -> Option<SubtitleEntry> {
    let mut lines = block.splitn(3, '\n');
    let id_line = lines.next()?;
    let timing_line = lines.next()?;
    let text = lines.next().unwrap_or("").to_string();

    let id = id_line.trim().parse::<usize>().ok()?;
    let (start, end) = parse_timing(timing_line)?;

    Some(SubtitleEntry {
        id,
        start,
        end,
        text,
    })
}

fn parse_timing(line: &str) -> Option<(Timestamp, Timestamp)> {
    match all_consuming(timing)(line.trim()) {
        Ok((_, timestamps)) => Some(timestamps),
        Err(_) => None,
    }
}

fn timing(input: &str) -> IResult<&str, (Timestamp, Timestamp)> {
    let (input, start) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, end) = timestamp(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (start, end)))
}

fn timestamp(input: &str) -> IResult<&str, Timestamp> {
    let take_short = || take_while_m_n(1, 2, |c: char| c.is_ascii_digit());
    let take_millis = take_while_m_n(1, 3, |c: char| c.is_ascii_digit());

    let (input, hours) = digit1(input)?;
    let (input, _) = char(':')(input)?;
    let (input, minutes) = take_short()(input)?;
    let (input, _) = char(':')(input)?;
    let (input, seconds) = take_short()(input)?;
    let (input, _) = alt((char(','), char('.')))(input)?;
    let (input, millis) = take_millis(input)?;

    Ok((input, Timestamp::from_parts(hours, minutes, seconds, millis)))
}
