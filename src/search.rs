use crate::document::Document;
use crate::error::EditError;

use std::borrow::Cow;

use regex::{NoExpand, Regex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub id: usize,
    pub index: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Located(Match),
    Replaced { id: usize, next: Option<Match> },
    NotFound,
}

#[derive(Debug, Default)]
pub struct SearchCursor {
    last_match: Option<usize>,
}

impl SearchCursor {
    pub fn new() -> Self {
        SearchCursor { last_match: None }
    }

    pub fn reset(&mut self) {
        self.last_match = None;
    }

    pub fn find_next(
        &mut self,
        document: &Document,
        query: &str,
        case_sensitive: bool,
    ) -> Result<Option<Match>, EditError> {
        if query.is_empty() {
            return Err(EditError::EmptyQuery);
        }

        // Resuming from the matched id rather than a raw index survives
        // renumbering; if the entry itself is gone, the scan starts over.
        let entries = document.entries();
        let start = self
            .last_match
            .and_then(|id| document.position_of(id))
            .map_or(0, |position| position + 1);
        let needle = fold_case(query, case_sensitive);

        for step in 0..entries.len() {
            let index = (start + step) % entries.len();
            let entry = &entries[index];
            if fold_case(&entry.text, case_sensitive).contains(needle.as_ref()) {
                self.last_match = Some(entry.id);
                return Ok(Some(Match {
                    id: entry.id,
                    index,
                }));
            }
        }

        self.last_match = None;
        Ok(None)
    }

    pub fn replace(
        &mut self,
        document: &mut Document,
        query: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> Result<ReplaceOutcome, EditError> {
        if query.is_empty() {
            return Err(EditError::EmptyQuery);
        }

        // From an idle cursor the call only locates a match; replacement
        // starts on the call after that.
        let position = self
            .last_match
            .and_then(|id| document.position_of(id));
        let position = match position {
            Some(position) => position,
            None => {
                return Ok(match self.find_next(document, query, case_sensitive)? {
                    Some(located) => ReplaceOutcome::Located(located),
                    None => ReplaceOutcome::NotFound,
                });
            }
        };

        let pattern = literal_pattern(query, case_sensitive);
        let entry = &mut document.entries[position];
        let id = entry.id;
        entry.text = pattern
            .replace(&entry.text, NoExpand(replacement))
            .into_owned();

        let next = self.find_next(document, query, case_sensitive)?;
        Ok(ReplaceOutcome::Replaced { id, next })
    }

    pub fn replace_all(
        &mut self,
        document: &mut Document,
        query: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> Result<usize, EditError> {
        if query.is_empty() {
            return Err(EditError::EmptyQuery);
        }

        let pattern = literal_pattern(query, case_sensitive);
        let mut count = 0;
        for entry in document.entries.iter_mut() {
            let occurrences = pattern.find_iter(&entry.text).count();
            if occurrences > 0 {
                entry.text = pattern
                    .replace_all(&entry.text, NoExpand(replacement))
                    .into_owned();
                count += occurrences;
            }
        }

        // A bulk rewrite makes the previous match meaningless.
        self.reset();
        Ok(count)
    }
}

fn literal_pattern(query: &str, case_sensitive: bool) -> Regex {
    let mut pattern = regex::escape(query);
    if !case_sensitive {
        pattern = format!("(?i){}", pattern);
    }
    Regex::new(&pattern).expect("escaped literal is always a valid pattern")
}

fn fold_case(text: &str, case_sensitive: bool) -> Cow<str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn document(texts: &[&str]) -> Document {
        let srt = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                format!("{}\n00:00:0{},000 --> 00:00:0{},500\n{}", i + 1, i, i, text)
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        Document::from_entries(parser::parse(&srt))
    }

    fn texts(document: &Document) -> Vec<&str> {
        document.entries().iter().map(|e| e.text()).collect()
    }

    #[test]
    fn find_declines_an_empty_query() {
        let document = document(&["apple"]);
        let mut cursor = SearchCursor::new();

        assert_eq!(
            cursor.find_next(&document, "", false),
            Err(EditError::EmptyQuery)
        );
    }

    #[test]
    fn find_is_case_insensitive_by_default() {
        let document = document(&["apple", "Banana"]);
        let mut cursor = SearchCursor::new();

        let found = cursor.find_next(&document, "banana", false).unwrap();

        assert_eq!(found, Some(Match { id: 2, index: 1 }));
    }

    #[test]
    fn find_respects_case_sensitivity() {
        let document = document(&["apple", "Banana"]);
        let mut cursor = SearchCursor::new();

        let found = cursor.find_next(&document, "banana", true).unwrap();

        assert_eq!(found, None);
    }

    #[test]
    fn find_resumes_after_the_previous_match() {
        let document = document(&["cat one", "dog", "cat two"]);
        let mut cursor = SearchCursor::new();

        let first = cursor.find_next(&document, "cat", false).unwrap().unwrap();
        let second = cursor.find_next(&document, "cat", false).unwrap().unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 3);
    }

    #[test]
    fn find_wraps_around_to_a_single_match() {
        let document = document(&["apple", "banana"]);
        let mut cursor = SearchCursor::new();

        let first = cursor.find_next(&document, "banana", false).unwrap().unwrap();
        let again = cursor.find_next(&document, "banana", false).unwrap().unwrap();

        assert_eq!(first, again);
    }

    #[test]
    fn find_goes_idle_after_a_fruitless_cycle() {
        let document = document(&["cat", "dog"]);
        let mut cursor = SearchCursor::new();

        cursor.find_next(&document, "cat", false).unwrap().unwrap();
        assert_eq!(cursor.find_next(&document, "fish", false).unwrap(), None);

        // Idle again, so the next search starts from the top.
        let found = cursor.find_next(&document, "cat", false).unwrap().unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn find_on_an_empty_document_reports_nothing() {
        let document = Document::new();
        let mut cursor = SearchCursor::new();

        assert_eq!(cursor.find_next(&document, "cat", false).unwrap(), None);
    }

    #[test]
    fn find_falls_back_to_the_start_when_the_match_was_deleted() {
        let mut document = document(&["cat one", "cat two"]);
        let mut cursor = SearchCursor::new();

        cursor.find_next(&document, "cat", false).unwrap().unwrap();
        let second = cursor.find_next(&document, "cat", false).unwrap().unwrap();
        assert_eq!(second.id, 2);

        // Id 2 no longer exists after the delete, so the cursor starts over.
        document.delete(&[second.id]).unwrap();
        let next = cursor.find_next(&document, "cat", false).unwrap().unwrap();
        assert_eq!(next, Match { id: 1, index: 0 });
    }

    #[test]
    fn replace_from_idle_only_locates() {
        let mut document = document(&["one cat", "two cats"]);
        let mut cursor = SearchCursor::new();

        let outcome = cursor.replace(&mut document, "cat", "dog", false).unwrap();

        assert_eq!(outcome, ReplaceOutcome::Located(Match { id: 1, index: 0 }));
        assert_eq!(texts(&document), vec!["one cat", "two cats"]);
    }

    #[test]
    fn replace_rewrites_the_current_match_and_advances() {
        let mut document = document(&["one cat", "two cats"]);
        let mut cursor = SearchCursor::new();

        cursor.replace(&mut document, "cat", "dog", false).unwrap();
        let outcome = cursor.replace(&mut document, "cat", "dog", false).unwrap();

        assert_eq!(
            outcome,
            ReplaceOutcome::Replaced {
                id: 1,
                next: Some(Match { id: 2, index: 1 }),
            }
        );
        assert_eq!(texts(&document), vec!["one dog", "two cats"]);
    }

    #[test]
    fn replace_only_touches_the_first_occurrence() {
        let mut document = document(&["cat cat cat"]);
        let mut cursor = SearchCursor::new();

        cursor.replace(&mut document, "cat", "dog", false).unwrap();
        cursor.replace(&mut document, "cat", "dog", false).unwrap();

        assert_eq!(texts(&document), vec!["dog cat cat"]);
    }

    #[test]
    fn replace_reports_not_found() {
        let mut document = document(&["apple"]);
        let mut cursor = SearchCursor::new();

        let outcome = cursor.replace(&mut document, "pear", "plum", false).unwrap();

        assert_eq!(outcome, ReplaceOutcome::NotFound);
    }

    #[test]
    fn replace_treats_the_query_as_literal_text() {
        let mut document = document(&["version 1.5 (beta)"]);
        let mut cursor = SearchCursor::new();

        cursor
            .replace(&mut document, "1.5 (beta)", "2.0", false)
            .unwrap();
        cursor
            .replace(&mut document, "1.5 (beta)", "2.0", false)
            .unwrap();

        assert_eq!(texts(&document), vec!["version 2.0"]);
    }

    #[test]
    fn replace_keeps_dollar_signs_literal() {
        let mut document = document(&["price"]);
        let mut cursor = SearchCursor::new();

        cursor.replace(&mut document, "price", "$0", false).unwrap();
        cursor.replace(&mut document, "price", "$0", false).unwrap();

        assert_eq!(texts(&document), vec!["$0"]);
    }

    #[test]
    fn replace_all_declines_an_empty_query() {
        let mut document = document(&["apple"]);
        let mut cursor = SearchCursor::new();

        assert_eq!(
            cursor.replace_all(&mut document, "", "x", false),
            Err(EditError::EmptyQuery)
        );
    }

    #[test]
    fn replace_all_counts_occurrences_across_entries() {
        let mut document = document(&["Cat sat", "no match", "cats and CAT"]);
        let mut cursor = SearchCursor::new();

        let count = cursor
            .replace_all(&mut document, "cat", "dog", false)
            .unwrap();

        assert_eq!(count, 3);
        assert_eq!(texts(&document), vec!["dog sat", "no match", "dogs and dog"]);
    }

    #[test]
    fn replace_all_respects_case_sensitivity() {
        let mut document = document(&["Cat sat", "cats and CAT"]);
        let mut cursor = SearchCursor::new();

        let count = cursor
            .replace_all(&mut document, "cat", "dog", true)
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(texts(&document), vec!["Cat sat", "dogs and CAT"]);
    }

    #[test]
    fn replace_all_reports_zero_when_nothing_matches() {
        let mut document = document(&["apple"]);
        let mut cursor = SearchCursor::new();

        let count = cursor
            .replace_all(&mut document, "pear", "plum", false)
            .unwrap();

        assert_eq!(count, 0);
    }

    #[test]
    fn replace_all_resets_the_cursor() {
        let mut document = document(&["cat one", "cat two"]);
        let mut cursor = SearchCursor::new();

        cursor.find_next(&document, "cat", false).unwrap().unwrap();
        cursor.replace_all(&mut document, "cat", "dog", false).unwrap();

        // An idle cursor starts over from the first entry.
        let found = cursor.find_next(&document, "dog", false).unwrap().unwrap();
        assert_eq!(found.id, 1);
    }
}
