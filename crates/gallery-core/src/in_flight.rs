//! Single-flight bookkeeping, one slot per logical operation

use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Refresh,
    Reorder,
    Delete,
    Login,
    Register,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Refresh => "refresh",
            OperationKind::Reorder => "reorder",
            OperationKind::Delete => "delete",
            OperationKind::Login => "login",
            OperationKind::Register => "register",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operations currently awaiting the service.
///
/// Lives inside the same lock as the state it protects, so checking and
/// claiming a slot is atomic with the state change that goes with it.
#[derive(Debug, Default)]
pub struct InFlight {
    active: HashSet<OperationKind>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `kind`. Returns `false` if it is already taken.
    pub fn begin(&mut self, kind: OperationKind) -> bool {
        self.active.insert(kind)
    }

    pub fn end(&mut self, kind: OperationKind) {
        self.active.remove(&kind);
    }

    pub fn is_active(&self, kind: OperationKind) -> bool {
        self.active.contains(&kind)
    }
}

/// Runs a cleanup if dropped before [`CancelGuard::disarm`].
///
/// Armed right after a slot is claimed; the future owning it may be dropped
/// at any `.await` (a timeout, `select!`, an aborted task), and the cleanup
/// then releases the slot and undoes whatever was applied optimistically.
pub struct CancelGuard<F: FnOnce()> {
    on_cancel: Option<F>,
}

impl<F: FnOnce()> CancelGuard<F> {
    pub fn new(on_cancel: F) -> Self {
        Self {
            on_cancel: Some(on_cancel),
        }
    }

    /// The operation finished normally; skip the cleanup.
    pub fn disarm(mut self) {
        self.on_cancel = None;
    }
}

impl<F: FnOnce()> Drop for CancelGuard<F> {
    fn drop(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cancel_guard_runs_only_when_dropped_armed() {
        let cancelled = Cell::new(0);
        {
            let _guard = CancelGuard::new(|| cancelled.set(cancelled.get() + 1));
        }
        assert_eq!(cancelled.get(), 1);

        CancelGuard::new(|| cancelled.set(cancelled.get() + 1)).disarm();
        assert_eq!(cancelled.get(), 1);
    }

    #[test]
    fn test_second_begin_is_refused_until_end() {
        let mut in_flight = InFlight::new();
        assert!(in_flight.begin(OperationKind::Delete));
        assert!(!in_flight.begin(OperationKind::Delete));
        // Other kinds are independent
        assert!(in_flight.begin(OperationKind::Reorder));

        in_flight.end(OperationKind::Delete);
        assert!(!in_flight.is_active(OperationKind::Delete));
        assert!(in_flight.begin(OperationKind::Delete));
    }
}
