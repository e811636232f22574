//! In-memory image store
//!
//! `ImageCollection` keeps the complete list received from the service and
//! derives the displayed view from it. Searching never removes records from
//! the backing list, so clearing the query brings hidden records back.

use gallery_api::{ImageId, ImageOrder, ImageRecord, Result};

use crate::reorder::{reorder, reorder_in_view, sort_by_order};
use crate::search::search;

#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    /// Complete list in store order
    records: Vec<ImageRecord>,
    /// Active title filter; `None` shows everything
    query: Option<String>,
}

impl ImageCollection {
    pub fn new(records: Vec<ImageRecord>) -> Self {
        Self {
            records,
            query: None,
        }
    }

    /// Replace the backing list (full reload). The active query is kept.
    pub fn replace(&mut self, records: Vec<ImageRecord>) {
        self.records = records;
    }

    /// Every record, sorted by order
    pub fn all(&self) -> Vec<ImageRecord> {
        sort_by_order(&self.records)
    }

    /// Displayed records: sorted by order, then filtered by the active query
    pub fn visible(&self) -> Vec<ImageRecord> {
        let sorted = self.all();
        match &self.query {
            Some(query) => search(&sorted, query),
            None => sorted,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.records.iter().any(|r| &r.id == id)
    }

    pub fn get(&self, id: &ImageId) -> Option<&ImageRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = Some(query.into());
    }

    pub fn clear_query(&mut self) {
        self.query = None;
    }

    /// Apply a drag over the displayed view and renumber the whole list.
    ///
    /// On error the collection is left untouched.
    pub fn apply_move(&mut self, source_index: usize, destination_index: usize) -> Result<()> {
        let reordered = match self.query {
            None => reorder(&self.records, source_index, destination_index)?,
            Some(_) => reorder_in_view(
                &self.records,
                &self.visible(),
                source_index,
                destination_index,
            )?,
        };
        self.records = reordered;
        Ok(())
    }

    /// `(id, order)` pairs for every record, in display order
    pub fn orders(&self) -> Vec<ImageOrder> {
        self.all().iter().map(ImageRecord::to_order).collect()
    }

    /// Remove the given ids, returning how many records were dropped
    pub fn remove_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a ImageId>) -> usize {
        let ids: Vec<&ImageId> = ids.into_iter().collect();
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&&r.id));
        before - self.records.len()
    }

    pub fn snapshot(&self) -> Vec<ImageRecord> {
        self.records.clone()
    }

    pub fn restore(&mut self, snapshot: Vec<ImageRecord>) {
        self.records = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pets() -> ImageCollection {
        ImageCollection::new(vec![
            ImageRecord::new("dog", 3, "Dog"),
            ImageRecord::new("cat", 1, "Cat"),
            ImageRecord::new("kitten", 2, "cat"),
        ])
    }

    fn ids(records: &[ImageRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_visible_is_sorted() {
        assert_eq!(ids(&pets().visible()), vec!["cat", "kitten", "dog"]);
    }

    #[test]
    fn test_clearing_query_restores_hidden_records() {
        let mut collection = pets();
        collection.set_query("dog");
        assert_eq!(ids(&collection.visible()), vec!["dog"]);
        assert_eq!(collection.len(), 3);

        collection.clear_query();
        assert_eq!(ids(&collection.visible()), vec!["cat", "kitten", "dog"]);
    }

    #[test]
    fn test_move_while_filtered_renumbers_everything() {
        let mut collection = pets();
        collection.set_query("cat");
        // Visible: cat, kitten. Drag kitten above cat.
        collection.apply_move(1, 0).unwrap();

        assert_eq!(ids(&collection.visible()), vec!["kitten", "cat"]);
        let orders: Vec<(String, i64)> = collection
            .orders()
            .into_iter()
            .map(|o| (o.id.to_string(), o.order))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("kitten".to_string(), 1),
                ("cat".to_string(), 2),
                ("dog".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_failed_move_leaves_collection_untouched() {
        let mut collection = pets();
        let before = collection.snapshot();
        assert!(collection.apply_move(0, 7).is_err());
        assert_eq!(collection.snapshot(), before);
    }

    #[test]
    fn test_remove_and_restore() {
        let mut collection = pets();
        let snapshot = collection.snapshot();
        let removed = collection.remove_ids(&[ImageId::new("cat"), ImageId::new("nope")]);
        assert_eq!(removed, 1);
        assert!(!collection.contains(&ImageId::new("cat")));

        collection.restore(snapshot);
        assert_eq!(collection.len(), 3);
    }
}
