use serde::{Deserialize, Serialize};

/// Result of a drag-and-drop gesture over the displayed list.
///
/// `destination_index` is `None` when the drag was cancelled or dropped
/// outside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragResult {
    pub source_index: usize,
    pub destination_index: Option<usize>,
}

impl DragResult {
    pub fn moved(source_index: usize, destination_index: usize) -> Self {
        Self {
            source_index,
            destination_index: Some(destination_index),
        }
    }

    pub fn cancelled(source_index: usize) -> Self {
        Self {
            source_index,
            destination_index: None,
        }
    }
}
