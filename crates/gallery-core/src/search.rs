//! Title search
//!
//! Matching is exact after lowercasing both sides, not substring matching.
//! An empty query therefore matches only records whose title is empty.

use gallery_api::ImageRecord;

pub fn matches(record: &ImageRecord, query: &str) -> bool {
    record
        .title
        .as_deref()
        .is_some_and(|title| title.to_lowercase() == query.to_lowercase())
}

/// Records whose title equals `query` ignoring case, in input order.
pub fn search(records: &[ImageRecord], query: &str) -> Vec<ImageRecord> {
    records
        .iter()
        .filter(|record| matches(record, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pets() -> Vec<ImageRecord> {
        vec![
            ImageRecord::new("1", 1, "Cat"),
            ImageRecord::new("2", 2, "cat"),
            ImageRecord::new("3", 3, "Dog"),
        ]
    }

    fn ids(records: &[ImageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(ids(&search(&pets(), "cat")), vec!["1", "2"]);
        assert_eq!(ids(&search(&pets(), "CAT")), vec!["1", "2"]);
    }

    #[test]
    fn test_prefix_does_not_match() {
        assert!(search(&pets(), "ca").is_empty());
    }

    #[test]
    fn test_empty_query_matches_only_empty_titles() {
        let mut records = pets();
        records.push(ImageRecord::new("4", 4, ""));
        let mut untitled = ImageRecord::new("5", 5, "");
        untitled.title = None;
        records.push(untitled);

        assert_eq!(ids(&search(&records, "")), vec!["4"]);
    }

    #[test]
    fn test_unicode_case_folding() {
        let records = vec![ImageRecord::new("1", 1, "ÉTÉ")];
        assert_eq!(ids(&search(&records, "été")), vec!["1"]);
    }
}
