#![forbid(unsafe_code)]

//! The open-path chain: which tree prefixes are rendered expanded.
//!
//! An [`OpenPath`] holds at most one prefix per depth — the ancestor chain
//! of the active location. Sibling mutual exclusion is structural: opening
//! a different child at some depth replaces the entry at that depth, so two
//! siblings can never be open at once.
//!
//! # Invariants
//!
//! 1. `chain[i].depth() == i + 1`.
//! 2. Every entry extends the previous one (`chain[i + 1]` starts with
//!    `chain[i]`).
//! 3. Mutation happens only through [`OpenPath::replace`], one transaction
//!    per synchronization pass.

use wayline_core::location::LocationKey;

/// The set of open prefixes, one per depth, shallowest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpenPath {
    chain: Vec<LocationKey>,
}

/// Difference between the current chain and a required one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathDiff {
    /// Entries to close, deepest first.
    pub to_close: Vec<LocationKey>,
    /// Entries to open, shallowest first.
    pub to_open: Vec<LocationKey>,
}

impl PathDiff {
    /// Whether nothing opens or closes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_close.is_empty() && self.to_open.is_empty()
    }
}

impl OpenPath {
    /// Everything closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Open prefixes, shallowest first.
    #[must_use]
    pub fn entries(&self) -> &[LocationKey] {
        &self.chain
    }

    /// Deepest open prefix, if any.
    #[must_use]
    pub fn deepest(&self) -> Option<&LocationKey> {
        self.chain.last()
    }

    /// Number of open depths.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Whether `key` is an open prefix.
    #[must_use]
    pub fn contains(&self, key: &LocationKey) -> bool {
        self.chain.iter().any(|entry| entry == key)
    }

    /// Diff against a required chain.
    ///
    /// Entries past the common prefix close deepest-first; required entries
    /// past it open shallowest-first. Both empty means the pass is a no-op.
    #[must_use]
    pub fn diff(&self, required: &[LocationKey]) -> PathDiff {
        let common = self
            .chain
            .iter()
            .zip(required)
            .take_while(|(a, b)| *a == *b)
            .count();

        let mut to_close: Vec<LocationKey> = self.chain[common..].to_vec();
        to_close.reverse();
        let to_open = required[common..].to_vec();

        PathDiff { to_close, to_open }
    }

    /// Replace the whole chain in one transaction.
    ///
    /// Debug builds assert the chain invariants; release builds trust the
    /// synchronizer, which only ever produces ancestor chains.
    pub fn replace(&mut self, chain: Vec<LocationKey>) {
        debug_assert!(
            chain
                .iter()
                .enumerate()
                .all(|(i, key)| key.depth() == i + 1),
            "open-path entries must be one per depth"
        );
        debug_assert!(
            chain.windows(2).all(|w| w[1].starts_with(&w[0])),
            "open-path entries must form an ancestor chain"
        );
        self.chain = chain;
    }

    /// Close everything.
    pub fn clear(&mut self) {
        self.chain.clear();
    }
}
