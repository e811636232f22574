//! Drag-and-drop reordering
//!
//! Every reorder renumbers the whole collection: after a move, the record at
//! zero-based position `i` of the sorted sequence has `order == i + 1`.

use gallery_api::{GalleryError, ImageId, ImageRecord, Result};

/// Stable sort by `order`; records with equal `order` keep their store order.
pub fn sort_by_order(records: &[ImageRecord]) -> Vec<ImageRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.order);
    sorted
}

/// Sort, then assign `order = position + 1` to every record.
pub fn renumber(records: &[ImageRecord]) -> Vec<ImageRecord> {
    let mut sorted = sort_by_order(records);
    assign_positions(&mut sorted);
    sorted
}

/// Move the record at `source_index` of the sorted view to `destination_index`
/// and renumber.
///
/// Indices address the sort-order-ascending view of `records`, whatever the
/// iteration order of the input.
pub fn reorder(
    records: &[ImageRecord],
    source_index: usize,
    destination_index: usize,
) -> Result<Vec<ImageRecord>> {
    let mut items = sort_by_order(records);
    let len = items.len();
    if source_index >= len {
        return Err(GalleryError::IndexOutOfBounds {
            index: source_index,
            len,
        });
    }
    if destination_index >= len {
        return Err(GalleryError::IndexOutOfBounds {
            index: destination_index,
            len,
        });
    }

    let moved = items.remove(source_index);
    items.insert(destination_index, moved);
    assign_positions(&mut items);
    Ok(items)
}

/// Reorder driven by indices into a filtered view of `records`.
///
/// The dragged record takes the full-sequence position of the record it was
/// dropped on, so its position relative to the other visible records matches
/// the gesture. With an unfiltered view this is exactly [`reorder`].
pub fn reorder_in_view(
    records: &[ImageRecord],
    view: &[ImageRecord],
    source_index: usize,
    destination_index: usize,
) -> Result<Vec<ImageRecord>> {
    let source_id = view_id(view, source_index)?;
    let destination_id = view_id(view, destination_index)?;

    let sorted = sort_by_order(records);
    let full_source = position_of(&sorted, source_id)?;
    let full_destination = position_of(&sorted, destination_id)?;

    reorder(&sorted, full_source, full_destination)
}

fn view_id(view: &[ImageRecord], index: usize) -> Result<&ImageId> {
    view.get(index)
        .map(|r| &r.id)
        .ok_or(GalleryError::IndexOutOfBounds {
            index,
            len: view.len(),
        })
}

fn position_of(sorted: &[ImageRecord], id: &ImageId) -> Result<usize> {
    sorted
        .iter()
        .position(|r| &r.id == id)
        .ok_or_else(|| GalleryError::NotFound { id: id.to_string() })
}

fn assign_positions(items: &mut [ImageRecord]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index as i64 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn records(pairs: &[(&str, i64)]) -> Vec<ImageRecord> {
        pairs.iter()
            .map(|(id, order)| ImageRecord::new(*id, *order, *id))
            .collect()
    }

    fn ids_and_orders(records: &[ImageRecord]) -> Vec<(String, i64)> {
        records
            .iter()
            .map(|r| (r.id.to_string(), r.order))
            .collect()
    }

    #[test]
    fn test_move_first_to_last() {
        let input = records(&[("A", 1), ("B", 2), ("C", 3)]);
        let result = reorder(&input, 0, 2).unwrap();
        assert_eq!(
            ids_and_orders(&result),
            vec![("B".into(), 1), ("C".into(), 2), ("A".into(), 3)]
        );
    }

    #[test]
    fn test_indices_address_sorted_view() {
        // Iteration order differs from display order
        let input = records(&[("C", 30), ("A", 10), ("B", 20)]);
        let result = reorder(&input, 2, 0).unwrap();
        assert_eq!(
            ids_and_orders(&result),
            vec![("C".into(), 1), ("A".into(), 2), ("B".into(), 3)]
        );
    }

    #[test]
    fn test_ties_keep_store_order() {
        let input = records(&[("X", 5), ("Y", 5), ("Z", 1)]);
        let result = renumber(&input);
        assert_eq!(
            ids_and_orders(&result),
            vec![("Z".into(), 1), ("X".into(), 2), ("Y".into(), 3)]
        );
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let input = records(&[("A", 1), ("B", 2)]);
        assert_eq!(
            reorder(&input, 2, 0),
            Err(GalleryError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(
            reorder(&input, 0, 5),
            Err(GalleryError::IndexOutOfBounds { index: 5, len: 2 })
        );
        assert!(reorder(&[], 0, 0).is_err());
    }

    #[test]
    fn test_reorder_in_filtered_view() {
        let all = records(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)]);
        // Only A and C are visible; drag A below C
        let view = vec![all[0].clone(), all[2].clone()];
        let result = reorder_in_view(&all, &view, 0, 1).unwrap();
        assert_eq!(
            ids_and_orders(&result),
            vec![
                ("B".into(), 1),
                ("C".into(), 2),
                ("A".into(), 3),
                ("D".into(), 4)
            ]
        );
    }

    #[test]
    fn test_reorder_in_filtered_view_upwards() {
        let all = records(&[("A", 1), ("B", 2), ("C", 3), ("D", 4)]);
        let view = vec![all[1].clone(), all[3].clone()];
        let result = reorder_in_view(&all, &view, 1, 0).unwrap();
        assert_eq!(
            ids_and_orders(&result),
            vec![
                ("A".into(), 1),
                ("D".into(), 2),
                ("B".into(), 3),
                ("C".into(), 4)
            ]
        );
    }

    fn collection_and_moves() -> impl Strategy<Value = (Vec<ImageRecord>, usize, usize)> {
        prop::collection::vec(-50i64..50, 1..20).prop_flat_map(|orders| {
            let len = orders.len();
            let records: Vec<ImageRecord> = orders
                .into_iter()
                .enumerate()
                .map(|(i, order)| ImageRecord::new(format!("img-{}", i), order, "t"))
                .collect();
            (Just(records), 0..len, 0..len)
        })
    }

    proptest! {
        #[test]
        fn prop_orders_are_contiguous_from_one((input, src, dst) in collection_and_moves()) {
            let result = reorder(&input, src, dst).unwrap();
            let orders: Vec<i64> = sort_by_order(&result).iter().map(|r| r.order).collect();
            let expected: Vec<i64> = (1..=input.len() as i64).collect();
            prop_assert_eq!(orders, expected);
        }

        #[test]
        fn prop_same_index_equals_renumber((input, src, _dst) in collection_and_moves()) {
            let moved: HashMap<_, _> = reorder(&input, src, src)
                .unwrap()
                .into_iter()
                .map(|r| (r.id, r.order))
                .collect();
            let renumbered: HashMap<_, _> = renumber(&input)
                .into_iter()
                .map(|r| (r.id, r.order))
                .collect();
            prop_assert_eq!(moved, renumbered);
        }

        #[test]
        fn prop_moved_record_lands_at_destination((input, src, dst) in collection_and_moves()) {
            let dragged = sort_by_order(&input)[src].id.clone();
            let result = reorder(&input, src, dst).unwrap();
            prop_assert_eq!(&result[dst].id, &dragged);
            prop_assert_eq!(result.len(), input.len());
        }
    }
}
