use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn zero() -> Self {
        Timestamp("00:00:00,000".to_string())
    }

    pub(crate) fn from_parts(hours: &str, minutes: &str, seconds: &str, millis: &str) -> Self {
        // Hour, minute and second groups are left-padded, so 1:13:45 reads
        // as 01:13:45. Milliseconds are right-padded instead: a value like
        // `,2` is not valid SRT, but we must be able to handle it anyway,
        // and it should read as `,200` rather than `,002`.
        Timestamp(format!(
            "{:0>2}:{:0>2}:{:0>2},{:0<3}",
            hours, minutes, seconds, millis
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub(crate) id: usize,
    pub(crate) start: Timestamp,
    pub(crate) end: Timestamp,
    pub(crate) text: String,
}

impl SubtitleEntry {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn start(&self) -> &Timestamp {
        &self.start
    }

    pub fn end(&self) -> &Timestamp {
        &self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
