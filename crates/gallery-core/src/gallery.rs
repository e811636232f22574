//! Gallery controller
//!
//! Applies user gestures to local state first, then synchronizes with the
//! service. All state sits behind one mutex that is never held across an
//! `.await`, so gestures keep working while requests are outstanding.
//!
//! Failure handling is asymmetric by default: a failed delete
//! restores the records, a failed reorder keeps the local order and is only
//! logged. `SyncPolicy::RollbackAndRefresh` makes reorder failures roll back
//! and reload as well.

use gallery_api::{DragResult, GalleryError, ImageId, ImageOrder, ImageRecord, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::collection::ImageCollection;
use crate::in_flight::{CancelGuard, InFlight, OperationKind};
use crate::selection::{ConfirmationPrompt, DeleteTicket, DeletionEngine, DeletionPhase};
use crate::session::Session;
use crate::traits::ImageGateway;

/// What to do with local state when persisting a reorder fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Keep the optimistic order, log the failure
    #[default]
    KeepLocal,
    /// Restore the order from before the request, then reload from the service
    RollbackAndRefresh,
}

impl FromStr for SyncPolicy {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep_local" | "keep-local" => Ok(SyncPolicy::KeepLocal),
            "rollback_and_refresh" | "rollback-and-refresh" | "rollback" => {
                Ok(SyncPolicy::RollbackAndRefresh)
            }
            other => Err(GalleryError::InvalidOperation {
                message: format!("Unknown sync policy: {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded(usize),
    /// Local state changed while the list was in flight; the response was dropped
    Stale,
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Drag was cancelled
    Unchanged,
    /// Indices did not address the displayed list; nothing changed
    Rejected(GalleryError),
    /// Applied locally; the request already in flight will send it
    Queued,
    Persisted,
    /// Applied locally, but the service refused it
    Failed(GalleryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(usize),
    /// The service refused; the records are back
    RolledBack(GalleryError),
    /// Nothing awaiting confirmation, or a delete already in flight
    NotConfirmed,
}

#[derive(Debug, Default)]
struct GalleryState {
    collection: ImageCollection,
    deletion: DeletionEngine,
    in_flight: InFlight,
    /// Set when a drag lands while a reorder request is outstanding
    reorder_dirty: bool,
    /// Records as they were before the outstanding reorder request
    reorder_baseline: Option<Vec<ImageRecord>>,
    /// Bumped on every local mutation of the collection
    generation: u64,
}

enum ReorderStep {
    Resend(Vec<ImageOrder>),
    Done,
    Failed { error: GalleryError, refresh: bool },
}

pub struct Gallery<G: ImageGateway + ?Sized> {
    gateway: Arc<G>,
    session: Session,
    policy: SyncPolicy,
    state: Mutex<GalleryState>,
}

impl<G: ImageGateway + ?Sized> Gallery<G> {
    pub fn new(gateway: Arc<G>, session: Session) -> Self {
        Self {
            gateway,
            session,
            policy: SyncPolicy::default(),
            state: Mutex::new(GalleryState::default()),
        }
    }

    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    fn state(&self) -> MutexGuard<'_, GalleryState> {
        // Every mutation leaves the state consistent before it can panic
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Release `kind` after its future was dropped before the service answered.
    /// The optimistic local order is kept, as after a failed request.
    fn abandon(&self, kind: OperationKind) {
        let mut state = self.state();
        state.in_flight.end(kind);
        if kind == OperationKind::Reorder {
            state.reorder_dirty = false;
            state.reorder_baseline = None;
        }
        warn!("[Gallery] {} dropped before the service answered", kind);
    }

    /// Undo an optimistic deletion whose future was dropped mid-request.
    fn abandon_delete(&self, ticket: DeleteTicket) {
        let mut state = self.state();
        state.in_flight.end(OperationKind::Delete);
        let GalleryState {
            collection,
            deletion,
            generation,
            ..
        } = &mut *state;
        deletion.fail(ticket, collection);
        *generation += 1;
        warn!("[Gallery] Delete dropped before the service answered, records restored");
    }

    /// Reload the full list from the service.
    #[tracing::instrument(name = "gallery.refresh", skip(self))]
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let (generation, guard) = {
            let mut state = self.state();
            if !state.in_flight.begin(OperationKind::Refresh) {
                debug!("[Gallery] Refresh already in flight");
                return Ok(RefreshOutcome::AlreadyRunning);
            }
            let guard = CancelGuard::new(move || self.abandon(OperationKind::Refresh));
            (state.generation, guard)
        };

        let result = self.gateway.list_images(&self.session).await;

        let mut state = self.state();
        guard.disarm();
        state.in_flight.end(OperationKind::Refresh);
        match result {
            Ok(images) => {
                if state.generation != generation {
                    warn!("[Gallery] Discarding image list: local state changed while loading");
                    return Ok(RefreshOutcome::Stale);
                }
                let count = images.len();
                let GalleryState {
                    collection,
                    deletion,
                    ..
                } = &mut *state;
                collection.replace(images);
                deletion.prune(collection);
                info!("[Gallery] Loaded {} images", count);
                Ok(RefreshOutcome::Loaded(count))
            }
            Err(e) => {
                error!("[Gallery] Failed to load images: {}", e);
                Err(e)
            }
        }
    }

    /// Handle the end of a drag over the displayed list.
    #[tracing::instrument(name = "gallery.reorder", skip(self))]
    pub async fn on_drag_end(&self, drag: DragResult) -> ReorderOutcome {
        let Some(destination) = drag.destination_index else {
            debug!("[Gallery] Drag cancelled");
            return ReorderOutcome::Unchanged;
        };

        let (orders, guard) = {
            let mut state = self.state();
            let baseline = state.collection.snapshot();
            if let Err(e) = state.collection.apply_move(drag.source_index, destination) {
                warn!("[Gallery] Ignoring drag: {}", e);
                return ReorderOutcome::Rejected(e);
            }
            state.generation += 1;

            if !state.in_flight.begin(OperationKind::Reorder) {
                state.reorder_dirty = true;
                debug!("[Gallery] Reorder in flight, latest order queued");
                return ReorderOutcome::Queued;
            }
            state.reorder_baseline = Some(baseline);
            let guard = CancelGuard::new(move || self.abandon(OperationKind::Reorder));
            (state.collection.orders(), guard)
        };

        self.persist_orders(orders, guard).await
    }

    /// Send `orders`, then keep sending the latest orders for as long as
    /// drags land during the request.
    async fn persist_orders<F: FnOnce()>(
        &self,
        mut orders: Vec<ImageOrder>,
        guard: CancelGuard<F>,
    ) -> ReorderOutcome {
        let mut guard = Some(guard);
        loop {
            debug!("[Gallery] Persisting order of {} images", orders.len());
            let result = self.gateway.reorder_images(&self.session, &orders).await;

            let step = {
                let mut state = self.state();
                let step = match result {
                    Ok(()) if state.reorder_dirty => {
                        state.reorder_dirty = false;
                        ReorderStep::Resend(state.collection.orders())
                    }
                    Ok(()) => {
                        state.in_flight.end(OperationKind::Reorder);
                        state.reorder_baseline = None;
                        ReorderStep::Done
                    }
                    Err(error) => match self.policy {
                        SyncPolicy::KeepLocal if state.reorder_dirty => {
                            warn!("[Gallery] Failed to persist order, sending newer order: {}", error);
                            state.reorder_dirty = false;
                            ReorderStep::Resend(state.collection.orders())
                        }
                        SyncPolicy::KeepLocal => {
                            state.in_flight.end(OperationKind::Reorder);
                            state.reorder_baseline = None;
                            ReorderStep::Failed {
                                error,
                                refresh: false,
                            }
                        }
                        SyncPolicy::RollbackAndRefresh => {
                            state.in_flight.end(OperationKind::Reorder);
                            state.reorder_dirty = false;
                            if let Some(baseline) = state.reorder_baseline.take() {
                                state.collection.restore(baseline);
                                state.generation += 1;
                            }
                            ReorderStep::Failed {
                                error,
                                refresh: true,
                            }
                        }
                    },
                };
                // Only a resend keeps the slot
                if !matches!(step, ReorderStep::Resend(_)) {
                    if let Some(guard) = guard.take() {
                        guard.disarm();
                    }
                }
                step
            };

            match step {
                ReorderStep::Resend(latest) => orders = latest,
                ReorderStep::Done => return ReorderOutcome::Persisted,
                ReorderStep::Failed { error, refresh } => {
                    error!("[Gallery] Failed to persist order: {}", error);
                    if refresh {
                        if let Err(e) = self.refresh().await {
                            warn!("[Gallery] Reload after failed reorder also failed: {}", e);
                        }
                    }
                    return ReorderOutcome::Failed(error);
                }
            }
        }
    }

    /// Mark or unmark an image for deletion
    pub fn toggle_select(&self, id: &ImageId) -> bool {
        let mut state = self.state();
        let GalleryState {
            collection,
            deletion,
            ..
        } = &mut *state;
        deletion.toggle(id, collection)
    }

    pub fn request_delete(&self) -> Option<ConfirmationPrompt> {
        let mut state = self.state();
        if state.in_flight.is_active(OperationKind::Delete) {
            return None;
        }
        state.deletion.request()
    }

    pub fn dismiss_prompt(&self) {
        self.state().deletion.dismiss();
    }

    pub fn cancel_delete(&self) -> bool {
        self.state().deletion.cancel()
    }

    /// Remove the selected images locally, then ask the service to delete them.
    #[tracing::instrument(name = "gallery.delete", skip(self))]
    pub async fn confirm_delete(&self) -> DeleteOutcome {
        let (ticket, started, guard) = {
            let mut state = self.state();
            if !state.in_flight.begin(OperationKind::Delete) {
                debug!("[Gallery] Delete already in flight");
                return DeleteOutcome::NotConfirmed;
            }
            let GalleryState {
                collection,
                deletion,
                in_flight,
                generation,
                ..
            } = &mut *state;
            match deletion.begin(collection) {
                Some(ticket) => {
                    *generation += 1;
                    let pending = ticket.clone();
                    let guard = CancelGuard::new(move || self.abandon_delete(pending));
                    (ticket, *generation, guard)
                }
                None => {
                    in_flight.end(OperationKind::Delete);
                    return DeleteOutcome::NotConfirmed;
                }
            }
        };

        let result = self.gateway.delete_images(&self.session, &ticket.ids).await;

        let (error, changed_meanwhile) = {
            let mut state = self.state();
            guard.disarm();
            state.in_flight.end(OperationKind::Delete);
            let GalleryState {
                collection,
                deletion,
                generation,
                ..
            } = &mut *state;
            match result {
                Ok(()) => {
                    let count = ticket.ids.len();
                    deletion.succeed(ticket);
                    info!("[Gallery] Delete was successful ({} images)", count);
                    return DeleteOutcome::Deleted(count);
                }
                Err(e) => {
                    error!("[Gallery] Failed to delete images, restoring: {}", e);
                    let changed_meanwhile = *generation != started;
                    deletion.fail(ticket, collection);
                    *generation += 1;
                    (e, changed_meanwhile)
                }
            }
        };

        // The snapshot predates changes made during the request; reload so
        // they match the service again
        if changed_meanwhile {
            if let Err(e) = self.refresh().await {
                warn!("[Gallery] Reload after failed delete also failed: {}", e);
            }
        }
        DeleteOutcome::RolledBack(error)
    }

    /// Filter the displayed list by exact, case-insensitive title
    pub fn search(&self, query: &str) {
        self.state().collection.set_query(query);
    }

    pub fn clear_search(&self) {
        self.state().collection.clear_query();
    }

    pub fn query(&self) -> Option<String> {
        self.state().collection.query().map(str::to_string)
    }

    /// Displayed records in display order
    pub fn visible(&self) -> Vec<ImageRecord> {
        self.state().collection.visible()
    }

    /// Every record, ignoring the search filter
    pub fn all(&self) -> Vec<ImageRecord> {
        self.state().collection.all()
    }

    /// Number of displayed records
    pub fn count(&self) -> usize {
        self.visible().len()
    }

    pub fn selected(&self) -> Vec<ImageId> {
        self.state().deletion.selected()
    }

    pub fn phase(&self) -> DeletionPhase {
        self.state().deletion.phase()
    }

    pub fn prompt(&self) -> Option<ConfirmationPrompt> {
        self.state().deletion.prompt().cloned()
    }

    pub fn is_in_flight(&self, kind: OperationKind) -> bool {
        self.state().in_flight.is_active(kind)
    }
}
