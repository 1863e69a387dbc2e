use crate::error::EditError;
use crate::srt::{SubtitleEntry, Timestamp};

#[derive(Debug, PartialEq, Eq)]
pub struct Document {
    pub(crate) entries: Vec<SubtitleEntry>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<SubtitleEntry>) -> Self {
        // The nominal ids in the file only validated their blocks; an
        // import always yields a dense 1..N sequence.
        let mut document = Document { entries };
        document.renumber();
        document
    }

    pub fn entries(&self) -> &[SubtitleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position_of(&self, id: usize) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn insert_new(&mut self) -> usize {
        let id = self.entries.iter().map(|entry| entry.id).max().unwrap_or(0) + 1;
        self.entries.push(SubtitleEntry {
            id,
            start: Timestamp::zero(),
            end: Timestamp::zero(),
            text: String::new(),
        });
        self.renumber();
        self.entries.len()
    }

    pub fn delete(&mut self, ids: &[usize]) -> Result<usize, EditError> {
        if ids.is_empty() {
            return Err(EditError::NothingSelected);
        }
        let before = self.entries.len();
        self.entries.retain(|entry| !ids.contains(&entry.id));
        self.renumber();
        Ok(before - self.entries.len())
    }

    pub fn merge(&mut self, ids: &[usize]) -> Result<usize, EditError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() < 2 {
            return Err(EditError::MergeRequiresTwo);
        }

        let positions: Vec<usize> = ids.iter().filter_map(|&id| self.position_of(id)).collect();
        if positions.len() < 2 {
            return Err(EditError::MergeRequiresTwo);
        }

        // Start and end come from the first and last entry in ascending id
        // order; time values are never compared.
        let first = &self.entries[positions[0]];
        let last = &self.entries[positions[positions.len() - 1]];
        let merged = SubtitleEntry {
            id: first.id,
            start: first.start.clone(),
            end: last.end.clone(),
            text: positions
                .iter()
                .map(|&position| self.entries[position].text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        };

        let insert_at = positions[0];
        for &position in positions.iter().rev() {
            self.entries.remove(position);
        }
        self.entries.insert(insert_at, merged);
        self.renumber();
        Ok(self.entries[insert_at].id)
    }

    // Invoked after every structural change; nothing else assigns ids to
    // existing entries.
    fn renumber(&mut self) {
        let mut seqnum = 0;
        for entry in self.entries.iter_mut() {
            seqnum += 1;
            entry.id = seqnum;
        }
    }
}
