#![forbid(unsafe_code)]

//! The transition guard: every navigation request passes through here.
//!
//! The guard owns the [`DirtyMap`] and the single [`PendingTransition`].
//! A request against a clean screen applies immediately; a dirty one is
//! parked pending confirmation. While one request is parked, further
//! requests are silently ignored — dropped, not queued — so a double
//! click can never stack two confirmation gates.
//!
//! Certain table families bypass the guard unconditionally: moves touching
//! the rule-configuration family apply immediately regardless of dirty
//! state. The family is a configurable [`ExceptionList`], not guard logic.

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};

use wayline_core::location::LocationKey;
use wayline_core::menu::Operation;

/// Per-screen unsaved-edit state.
#[derive(Debug, Clone, Default)]
pub struct DirtyMap {
    entries: HashMap<String, bool>,
}

impl DirtyMap {
    /// Everything clean.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record a screen's dirty state. Returns whether the value changed,
    /// so callers know when to surface a dirty-changed notification. A
    /// screen with no entry counts as clean, so the first clean report of
    /// a freshly mounted screen is not a change.
    pub fn set(&mut self, panel_id: &str, dirty: bool) -> bool {
        let previous = self
            .entries
            .insert(panel_id.to_owned(), dirty)
            .unwrap_or(false);
        previous != dirty
    }

    /// Whether a screen reports unsaved edits.
    #[must_use]
    pub fn is_dirty(&self, panel_id: &str) -> bool {
        self.entries.get(panel_id).copied().unwrap_or(false)
    }

    /// Whether any screen reports unsaved edits.
    #[must_use]
    pub fn any_dirty(&self) -> bool {
        self.entries.values().any(|d| *d)
    }

    /// Drop a screen's entry entirely (screen unmounted).
    pub fn remove(&mut self, panel_id: &str) {
        self.entries.remove(panel_id);
    }
}

/// Tables whose transitions bypass the unsaved-changes gate.
#[derive(Debug, Clone, Default)]
pub struct ExceptionList {
    tables: HashSet<String>,
}

impl ExceptionList {
    /// No exceptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: HashSet::new(),
        }
    }

    /// The rule-configuration family. Moves touching these tables always
    /// apply without a gate; flagged for product clarification rather than
    /// generalized.
    #[must_use]
    pub fn rule_family() -> Self {
        Self::new()
            .with_table("rule")
            .with_table("rule_profile")
            .with_table("rule_threshold")
            .with_table("rule_target")
    }

    /// Add a table to the list.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.tables.insert(table.into());
        self
    }

    /// Whether `table` bypasses the gate.
    #[must_use]
    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    /// Whether a location key points at an excepted table.
    #[must_use]
    pub fn covers(&self, key: &LocationKey) -> bool {
        table_of(key).is_some_and(|table| self.contains(table))
    }
}

/// The table a location key addresses: the final segment, or the one
/// before it when the key ends in an operation id.
#[must_use]
pub fn table_of(key: &LocationKey) -> Option<&str> {
    let leaf = key.leaf()?;
    if Operation::from_id(leaf).is_some() {
        key.depth().checked_sub(2).and_then(|i| key.segment(i))
    } else {
        Some(leaf)
    }
}

/// A navigation request parked behind the confirmation gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    /// Where the user currently is.
    pub from: LocationKey,
    /// Where the request wants to go.
    pub to: LocationKey,
    /// The screen whose edits block the move.
    pub panel_id: String,
}

/// Outcome of a guarded navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The move applies now; the host should commit this key.
    Applied(LocationKey),
    /// The move is parked; the host should show the confirmation surface.
    Deferred,
    /// A transition is already pending; the request was dropped.
    Ignored,
}

/// Intercepts navigation, consults the dirty map, and gates moves.
#[derive(Debug, Clone, Default)]
pub struct TransitionGuard {
    dirty: DirtyMap,
    exceptions: ExceptionList,
    pending: Option<PendingTransition>,
}

impl TransitionGuard {
    /// Guard with no exceptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard with an exception list.
    #[must_use]
    pub fn with_exceptions(exceptions: ExceptionList) -> Self {
        Self {
            dirty: DirtyMap::new(),
            exceptions,
            pending: None,
        }
    }

    /// Record a screen's dirty state. Returns whether it changed.
    pub fn set_dirty(&mut self, panel_id: &str, dirty: bool) -> bool {
        self.dirty.set(panel_id, dirty)
    }

    /// The dirty map, read-only.
    #[must_use]
    pub fn dirty(&self) -> &DirtyMap {
        &self.dirty
    }

    /// The parked transition, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Propose a move from `from` to `to`, with edits attributed to
    /// `panel_id`.
    pub fn request(
        &mut self,
        from: &LocationKey,
        to: &LocationKey,
        panel_id: &str,
    ) -> GuardDecision {
        if self.pending.is_some() {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "wayline::guard", to = %to, "request dropped, gate busy");
            return GuardDecision::Ignored;
        }

        // Rule-family moves never gate, dirty or not.
        if self.exceptions.covers(from) || self.exceptions.covers(to) {
            return GuardDecision::Applied(to.clone());
        }

        if !self.dirty.is_dirty(panel_id) {
            return GuardDecision::Applied(to.clone());
        }

        self.pending = Some(PendingTransition {
            from: from.clone(),
            to: to.clone(),
            panel_id: panel_id.to_owned(),
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "wayline::guard", from = %from, to = %to, "transition parked");
        GuardDecision::Deferred
    }

    /// The user confirmed the parked move: discard the blocking edits and
    /// return the transition to apply. `None` when nothing was parked.
    pub fn confirm(&mut self) -> Option<PendingTransition> {
        let pending = self.pending.take()?;
        self.dirty.set(&pending.panel_id, false);
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "wayline::guard", to = %pending.to, "transition confirmed");
        Some(pending)
    }

    /// The user cancelled: drop the parked move, keep the edits, stay put.
    pub fn cancel(&mut self) -> Option<PendingTransition> {
        let pending = self.pending.take()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "wayline::guard", from = %pending.from, "transition cancelled");
        Some(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> LocationKey {
        LocationKey::parse(raw).unwrap()
    }

    #[test]
    fn clean_screen_applies_immediately() {
        let mut guard = TransitionGuard::new();
        let decision = guard.request(&key("a-b"), &key("a-c"), "screen-b");
        assert_eq!(decision, GuardDecision::Applied(key("a-c")));
        assert!(guard.pending().is_none());
    }

    #[test]
    fn dirty_screen_defers_and_parks() {
        let mut guard = TransitionGuard::new();
        guard.set_dirty("screen-b", true);

        let decision = guard.request(&key("a-b"), &key("a-c"), "screen-b");
        assert_eq!(decision, GuardDecision::Deferred);

        let pending = guard.pending().unwrap();
        assert_eq!(pending.from, key("a-b"));
        assert_eq!(pending.to, key("a-c"));
    }

    #[test]
    fn second_request_while_parked_is_ignored() {
        let mut guard = TransitionGuard::new();
        guard.set_dirty("screen-b", true);

        assert_eq!(
            guard.request(&key("a-b"), &key("a-c"), "screen-b"),
            GuardDecision::Deferred
        );
        assert_eq!(
            guard.request(&key("a-b"), &key("a-d"), "screen-b"),
            GuardDecision::Ignored
        );
        // The original target is still the parked one.
        assert_eq!(guard.pending().unwrap().to, key("a-c"));
    }

    #[test]
    fn confirm_clears_dirty_and_returns_target() {
        let mut guard = TransitionGuard::new();
        guard.set_dirty("screen-b", true);
        guard.request(&key("a-b"), &key("a-c"), "screen-b");

        let pending = guard.confirm().unwrap();
        assert_eq!(pending.to, key("a-c"));
        assert!(!guard.dirty().is_dirty("screen-b"));
        assert!(guard.pending().is_none());
    }

    #[test]
    fn cancel_keeps_dirty_and_location() {
        let mut guard = TransitionGuard::new();
        guard.set_dirty("screen-b", true);
        guard.request(&key("a-b"), &key("a-c"), "screen-b");

        let pending = guard.cancel().unwrap();
        assert_eq!(pending.from, key("a-b"));
        assert!(guard.dirty().is_dirty("screen-b"));
        assert!(guard.pending().is_none());
    }

    #[test]
    fn confirm_without_pending_is_noop() {
        let mut guard = TransitionGuard::new();
        assert!(guard.confirm().is_none());
        assert!(guard.cancel().is_none());
    }

    #[test]
    fn rule_family_bypasses_gate_while_dirty() {
        let mut guard = TransitionGuard::with_exceptions(ExceptionList::rule_family());
        guard.set_dirty("screen-rule", true);

        let decision = guard.request(
            &key("alerts-rule-insert"),
            &key("alerts-rule_profile-status"),
            "screen-rule",
        );
        assert_eq!(
            decision,
            GuardDecision::Applied(key("alerts-rule_profile-status"))
        );
        assert!(guard.pending().is_none());
    }

    #[test]
    fn single_excepted_endpoint_still_bypasses() {
        // The bypass triggers when either endpoint touches the family.
        let mut guard = TransitionGuard::with_exceptions(ExceptionList::rule_family());
        guard.set_dirty("screen-sensor", true);

        let decision = guard.request(
            &key("configuration-devices-sensor-insert"),
            &key("alerts-rule-status"),
            "screen-sensor",
        );
        assert_eq!(decision, GuardDecision::Applied(key("alerts-rule-status")));
    }

    #[test]
    fn table_of_skips_operation_leaf() {
        assert_eq!(table_of(&key("configuration-devices-sensor-insert")), Some("sensor"));
        assert_eq!(table_of(&key("configuration-devices-sensor")), Some("sensor"));
        assert_eq!(table_of(&LocationKey::root()), None);
    }

    #[test]
    fn dirty_map_reports_changes_only() {
        let mut map = DirtyMap::new();
        assert!(map.set("p", true));
        assert!(!map.set("p", true));
        assert!(map.set("p", false));
        assert!(!map.any_dirty());
    }
}
