//! Parsing of the parallel word-row fields submitted by list editors.

use drill_core::model::{WordId, WordPairDraft};

/// One usable row: an optional existing word ID plus validated sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    /// `None` for a row that should become a new word.
    pub id: Option<WordId>,
    pub draft: WordPairDraft,
}

/// Outcome of parsing submitted rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRows {
    pub rows: Vec<WordRow>,
    /// Rows dropped because a side was blank or missing.
    pub blank: usize,
    /// 0-based indexes of rows dropped because their ID did not parse.
    pub malformed: Vec<usize>,
}

fn field<S: AsRef<str>>(list: &[S], i: usize) -> &str {
    list.get(i).map_or("", |s| s.as_ref().trim())
}

fn is_new_marker(raw: &str) -> bool {
    matches!(raw, "" | "new" | "0")
}

/// Zip the three field lists to the longest length and keep the usable rows.
///
/// Missing entries count as blank. A row with an unparsable ID is skipped and
/// reported instead of aborting the whole parse.
#[must_use]
pub fn parse_word_rows<S: AsRef<str>>(ids: &[S], side_a: &[S], side_b: &[S]) -> ParsedRows {
    let len = ids.len().max(side_a.len()).max(side_b.len());

    let mut parsed = ParsedRows::default();
    for i in 0..len {
        let Ok(draft) = WordPairDraft::new(field(side_a, i), field(side_b, i)) else {
            parsed.blank += 1;
            continue;
        };

        let raw_id = field(ids, i);
        let id = if is_new_marker(raw_id) {
            None
        } else if let Ok(id) = raw_id.parse::<WordId>() {
            Some(id)
        } else {
            tracing::debug!(row = i, raw_id, "skipping word row with malformed id");
            parsed.malformed.push(i);
            continue;
        };

        parsed.rows.push(WordRow { id, draft });
    }
    parsed
}

/// Parse rows for a brand-new list, where every row is a new word.
#[must_use]
pub fn parse_new_pairs<S: AsRef<str>>(side_a: &[S], side_b: &[S]) -> ParsedRows {
    parse_word_rows::<S>(&[], side_a, side_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_markers_and_ids() {
        let parsed = parse_word_rows(
            &["", "new", "0", "12"],
            &["a", "b", "c", "d"],
            &["w", "x", "y", "z"],
        );
        assert_eq!(parsed.rows.len(), 4);
        assert!(parsed.rows[..3].iter().all(|r| r.id.is_none()));
        assert_eq!(parsed.rows[3].id, Some(WordId::new(12)));
        assert_eq!(parsed.blank, 0);
    }

    #[test]
    fn blank_and_missing_sides_are_skipped() {
        let parsed = parse_word_rows(&["1", "2"], &["hello", "  ", "cat"], &["ola", "x"]);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].draft.side_b(), "ola");
        assert_eq!(parsed.blank, 2);
    }

    #[test]
    fn malformed_id_skips_only_that_row() {
        let parsed = parse_word_rows(&["x1", "3"], &["hello", "cat"], &["ola", "gato"]);
        assert_eq!(parsed.malformed, vec![0]);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].id, Some(WordId::new(3)));
    }

    #[test]
    fn new_pairs_are_trimmed() {
        let parsed = parse_new_pairs(&[" hello "], &[" ola"]);
        assert_eq!(parsed.rows[0].draft.side_a(), "hello");
        assert_eq!(parsed.rows[0].id, None);
    }
}
