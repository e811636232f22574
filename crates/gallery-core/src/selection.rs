//! Multi-select deletion
//!
//! ```text
//! Idle --toggle--> Selecting --request--> Confirming --confirm--> Deleting
//!  ^                 ^  ^                     |                     |
//!  |                 |  +------dismiss--------+                     |
//!  |                 +---------------- failure (rollback) ----------+
//!  +------------------------------------ success -------------------+
//! ```
//!
//! `cancel` clears the selection from any phase except `Deleting`.

use gallery_api::{ImageId, ImageRecord};
use indexmap::IndexSet;

use crate::collection::ImageCollection;

pub const DELETE_CONFIRMATION_MESSAGE: &str = "Are you sure you want to delete selected images ?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPhase {
    Idle,
    Selecting,
    Confirming,
    Deleting,
}

/// Prompt handed to the dialog collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub message: String,
}

/// Everything needed to finish or roll back an optimistic deletion
#[derive(Debug, Clone)]
pub struct DeleteTicket {
    pub ids: Vec<ImageId>,
    snapshot: Vec<ImageRecord>,
}

#[derive(Debug, Default)]
pub struct DeletionEngine {
    selected: IndexSet<ImageId>,
    prompt: Option<ConfirmationPrompt>,
    deleting: bool,
}

impl DeletionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DeletionPhase {
        if self.deleting {
            DeletionPhase::Deleting
        } else if self.prompt.is_some() {
            DeletionPhase::Confirming
        } else if self.selected.is_empty() {
            DeletionPhase::Idle
        } else {
            DeletionPhase::Selecting
        }
    }

    /// Selected ids in the order they were selected
    pub fn selected(&self) -> Vec<ImageId> {
        self.selected.iter().cloned().collect()
    }

    pub fn is_selected(&self, id: &ImageId) -> bool {
        self.selected.contains(id)
    }

    pub fn prompt(&self) -> Option<&ConfirmationPrompt> {
        self.prompt.as_ref()
    }

    /// Add or remove `id`. Ids not present in `collection` are ignored.
    ///
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: &ImageId, collection: &ImageCollection) -> bool {
        if self.selected.shift_remove(id) {
            return false;
        }
        if !collection.contains(id) {
            return false;
        }
        self.selected.insert(id.clone());
        true
    }

    /// Ask for confirmation. `None` when nothing is selected or a deletion
    /// is already in flight.
    pub fn request(&mut self) -> Option<ConfirmationPrompt> {
        if self.selected.is_empty() || self.deleting {
            return None;
        }
        let prompt = ConfirmationPrompt {
            message: DELETE_CONFIRMATION_MESSAGE.to_string(),
        };
        self.prompt = Some(prompt.clone());
        Some(prompt)
    }

    /// Close the prompt without deleting; the selection stays.
    pub fn dismiss(&mut self) {
        self.prompt = None;
    }

    /// Optimistically remove the selected records.
    ///
    /// Only valid while confirming; returns the ticket needed to finish.
    pub fn begin(&mut self, collection: &mut ImageCollection) -> Option<DeleteTicket> {
        if self.phase() != DeletionPhase::Confirming || self.selected.is_empty() {
            self.prompt = None;
            return None;
        }
        let ticket = DeleteTicket {
            ids: self.selected(),
            snapshot: collection.snapshot(),
        };
        collection.remove_ids(&ticket.ids);
        self.prompt = None;
        self.deleting = true;
        Some(ticket)
    }

    /// The service accepted the deletion. Ids selected while the request
    /// was in flight stay selected.
    pub fn succeed(&mut self, ticket: DeleteTicket) {
        self.deleting = false;
        for id in &ticket.ids {
            self.selected.shift_remove(id);
        }
    }

    /// The service rejected the deletion: restore the snapshot. The selection
    /// is left as it was so the user can retry.
    pub fn fail(&mut self, ticket: DeleteTicket, collection: &mut ImageCollection) {
        self.deleting = false;
        collection.restore(ticket.snapshot);
    }

    /// Clear the selection. Refused while a deletion is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.deleting {
            return false;
        }
        self.selected.clear();
        self.prompt = None;
        true
    }

    /// Drop selected ids that no longer exist after a reload.
    pub fn prune(&mut self, collection: &ImageCollection) {
        if self.deleting {
            return;
        }
        self.selected.retain(|id| collection.contains(id));
        if self.selected.is_empty() {
            self.prompt = None;
        }
    }
}
