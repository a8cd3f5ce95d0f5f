//! Access snapshots and table flags: the external data the builder consumes.
//!
//! The permissions provider hands the host a set of accessible menu names;
//! the host stores it in an [`AccessCell`] and the shell rebuilds the menu
//! tree whenever the cell's generation moves. Until the first snapshot
//! arrives the cell is unresolved and the builder yields an empty tree —
//! nothing renders rather than a partially-trusted menu.
//!
//! Table flags come from the table-configuration provider via the
//! [`FlagSource`] trait; [`StaticFlags`] is the map-backed implementation
//! hosts and tests use directly.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use arc_swap::ArcSwapOption;

/// A resolved permission snapshot: the set of accessible menu names.
///
/// Matching is case-insensitive and substring-tolerant in either direction,
/// so `"DEVICES"` grants `"devices"` and `"device-admin"` grants `"admin"`.
#[derive(Debug, Clone, Default)]
pub struct AccessSnapshot {
    names: HashSet<String>,
}

impl AccessSnapshot {
    /// Build a snapshot from menu names; names are case-folded on entry.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for name in names {
            set.insert(name.as_ref().to_lowercase());
        }
        Self { names: set }
    }

    /// Whether `name` matches any accessible entry.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let folded = name.to_lowercase();
        self.names
            .iter()
            .any(|entry| entry.contains(&folded) || folded.contains(entry.as_str()))
    }

    /// Number of accessible names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the snapshot grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Live cell holding the latest access snapshot.
///
/// Starts unresolved (`load()` returns `None`). Every [`replace`] bumps a
/// generation counter so consumers can cheaply detect staleness without
/// comparing snapshots.
///
/// [`replace`]: AccessCell::replace
#[derive(Debug, Default)]
pub struct AccessCell {
    snapshot: ArcSwapOption<AccessSnapshot>,
    generation: AtomicU64,
}

impl AccessCell {
    /// Create an unresolved cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new snapshot, returning the new generation.
    pub fn replace(&self, snapshot: AccessSnapshot) -> u64 {
        self.snapshot.store(Some(Arc::new(snapshot)));
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Drop the snapshot (logout); the cell is unresolved again.
    pub fn clear(&self) -> u64 {
        self.snapshot.store(None);
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// The current snapshot, or `None` while unresolved.
    #[must_use]
    pub fn load(&self) -> Option<Arc<AccessSnapshot>> {
        self.snapshot.load_full()
    }

    /// Monotonic change counter; zero until the first replace.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Per-table capability flags and field defaults.
#[derive(Debug, Clone)]
pub struct TableFlags {
    allow_insert: bool,
    allow_update: bool,
    allow_massive: bool,
    /// Configured default values for numeric fields, keyed by field name.
    default_values: HashMap<String, f64>,
}

impl Default for TableFlags {
    fn default() -> Self {
        Self {
            allow_insert: true,
            allow_update: true,
            allow_massive: true,
            default_values: HashMap::new(),
        }
    }
}

impl TableFlags {
    /// Flags permitting every operation, no defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the insert operation is offered.
    #[must_use]
    pub const fn with_insert(mut self, allow: bool) -> Self {
        self.allow_insert = allow;
        self
    }

    /// Set whether the update operation is offered.
    #[must_use]
    pub const fn with_update(mut self, allow: bool) -> Self {
        self.allow_update = allow;
        self
    }

    /// Set whether the massive operation is offered.
    #[must_use]
    pub const fn with_massive(mut self, allow: bool) -> Self {
        self.allow_massive = allow;
        self
    }

    /// Record a numeric field default.
    #[must_use]
    pub fn with_default(mut self, field: impl Into<String>, value: f64) -> Self {
        self.default_values.insert(field.into(), value);
        self
    }

    /// Whether insert is offered.
    #[must_use]
    pub const fn allow_insert(&self) -> bool {
        self.allow_insert
    }

    /// Whether update is offered.
    #[must_use]
    pub const fn allow_update(&self) -> bool {
        self.allow_update
    }

    /// Whether massive is offered.
    #[must_use]
    pub const fn allow_massive(&self) -> bool {
        self.allow_massive
    }

    /// Configured default for a numeric field (0.0 when unset).
    #[must_use]
    pub fn default_for(&self, field: &str) -> f64 {
        self.default_values.get(field).copied().unwrap_or(0.0)
    }

    /// Explicitly configured default for a field, if any.
    #[must_use]
    pub fn configured_default(&self, field: &str) -> Option<f64> {
        self.default_values.get(field).copied()
    }
}

/// External table-configuration provider.
///
/// The host implements this over whatever backend serves table metadata;
/// the builder and guard consume it synchronously (the data is assumed
/// already resolved by the time navigation runs).
pub trait FlagSource {
    /// Flags for `table`; unknown tables get the permissive default.
    fn flags(&self, table: &str) -> TableFlags;
}

/// Map-backed [`FlagSource`] for hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFlags {
    tables: HashMap<String, TableFlags>,
}

impl StaticFlags {
    /// An empty source (every table gets the permissive default).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register flags for a table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>, flags: TableFlags) -> Self {
        self.tables.insert(table.into(), flags);
        self
    }
}

impl FlagSource for StaticFlags {
    fn flags(&self, table: &str) -> TableFlags {
        self.tables.get(table).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive() {
        let snap = AccessSnapshot::from_names(["DEVICES", "Reports"]);
        assert!(snap.matches("devices"));
        assert!(snap.matches("REPORTS"));
        assert!(!snap.matches("users"));
    }

    #[test]
    fn matching_is_substring_tolerant_both_ways() {
        let snap = AccessSnapshot::from_names(["device-admin"]);
        // Accessible entry contains the queried name.
        assert!(snap.matches("admin"));
        // Queried name contains the accessible entry.
        assert!(snap.matches("device-admin-extended"));
    }

    #[test]
    fn empty_name_never_matches() {
        let snap = AccessSnapshot::from_names(["devices"]);
        assert!(!snap.matches(""));
    }

    #[test]
    fn cell_starts_unresolved_and_tracks_generation() {
        let cell = AccessCell::new();
        assert!(cell.load().is_none());
        assert_eq!(cell.generation(), 0);

        let generation = cell.replace(AccessSnapshot::from_names(["devices"]));
        assert_eq!(generation, 1);
        assert!(cell.load().is_some());

        let generation = cell.clear();
        assert_eq!(generation, 2);
        assert!(cell.load().is_none());
    }

    #[test]
    fn flags_default_permissive() {
        let source = StaticFlags::new();
        let flags = source.flags("anything");
        assert!(flags.allow_insert() && flags.allow_update() && flags.allow_massive());
        assert_eq!(flags.default_for("statusid"), 0.0);
    }

    #[test]
    fn flag_defaults_are_per_field() {
        let flags = TableFlags::new().with_default("statusid", 1.0);
        assert_eq!(flags.default_for("statusid"), 1.0);
        assert_eq!(flags.default_for("other"), 0.0);
    }
}
