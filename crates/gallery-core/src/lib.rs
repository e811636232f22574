//! Client-side gallery logic
//!
//! This crate holds the state management that sits between the UI and the
//! gallery service:
//! - `reorder`: drag-and-drop reordering with contiguous renumbering
//! - `selection`: multi-select deletion with rollback on failure
//! - `search`: exact, case-insensitive title filter
//! - `collection`: backing store plus derived view
//! - `gallery`: controller applying gestures optimistically and syncing them
//! - `auth`: login, registration and token persistence

pub mod auth;
pub mod collection;
pub mod gallery;
pub mod in_flight;
pub mod reorder;
pub mod search;
pub mod selection;
pub mod session;
pub mod traits;
pub mod validation;

pub use auth::AuthFlow;
pub use collection::ImageCollection;
pub use gallery::{DeleteOutcome, Gallery, RefreshOutcome, ReorderOutcome, SyncPolicy};
pub use in_flight::{CancelGuard, InFlight, OperationKind};
pub use reorder::{renumber, reorder, sort_by_order};
pub use search::search;
pub use selection::{ConfirmationPrompt, DeletionEngine, DeletionPhase};
pub use session::{MemoryTokenStore, Session};
pub use traits::{AuthGateway, ImageGateway, TokenStore};
