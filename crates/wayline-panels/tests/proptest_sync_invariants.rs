//! Property-based invariant tests for open-path synchronization.
//!
//! These verify the navigation invariants that must hold for any sequence
//! of location changes over any tree:
//!
//! 1. Idempotence: re-planning the same key against a reconciled chain
//!    produces zero open/close operations.
//! 2. Mutual exclusion: after any sequence of applies, at most one entry
//!    per depth is open, and entries form an ancestor chain.
//! 3. Soft-fail determinism: a key with a bogus tail plans exactly like
//!    its valid prefix.
//! 4. Required chains are always prefixes of the effective path.
//! 5. Cascades retire closes (deepest-first) strictly before opens.

use proptest::prelude::*;
use wayline_core::location::LocationKey;
use wayline_core::menu::{MenuNode, MenuTree};
use wayline_panels::open_path::OpenPath;
use wayline_panels::sync::{StepKind, apply, plan};

// ── Helpers ─────────────────────────────────────────────────────────────

/// A small fixed forest; depth 4, two branches per level.
fn tree() -> MenuTree {
    fn subtree(prefix: &str, depth: usize) -> MenuNode {
        let mut node = MenuNode::new(prefix.to_owned());
        if depth > 0 {
            node = node
                .child(subtree("left", depth - 1))
                .child(subtree("right", depth - 1));
        }
        node
    }
    MenuTree::new(vec![subtree("alpha", 3), subtree("beta", 3)])
}

/// Arbitrary keys over the tree's segment alphabet, some invalid.
fn arb_key() -> impl Strategy<Value = LocationKey> {
    proptest::collection::vec(
        prop_oneof![
            Just("alpha"),
            Just("beta"),
            Just("left"),
            Just("right"),
            Just("bogus"),
        ],
        0..=5,
    )
    .prop_map(|segments| LocationKey::from_segments(segments).unwrap())
}

fn walk(open: &mut OpenPath, keys: &[LocationKey]) {
    let tree = tree();
    let mut active = LocationKey::root();
    for key in keys {
        let plan = plan(&active, key, open, &tree);
        apply(&plan, open);
        active = key.clone();
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replanning_reconciled_key_is_noop(keys in proptest::collection::vec(arb_key(), 1..8)) {
        let tree = tree();
        let mut open = OpenPath::new();
        walk(&mut open, &keys);

        let last = keys.last().unwrap();
        // A fresh plan toward the already-active key.
        let again = plan(&LocationKey::root(), last, &open, &tree);
        prop_assert!(again.is_noop(), "re-plan of {last} produced work");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Mutual exclusion / ancestor chain
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn open_path_is_always_an_ancestor_chain(keys in proptest::collection::vec(arb_key(), 0..10)) {
        let mut open = OpenPath::new();
        walk(&mut open, &keys);

        let entries = open.entries();
        for (i, entry) in entries.iter().enumerate() {
            prop_assert_eq!(entry.depth(), i + 1, "one entry per depth");
        }
        for pair in entries.windows(2) {
            prop_assert!(pair[1].starts_with(&pair[0]), "entries must chain");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Soft-fail determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn bogus_tail_plans_like_valid_prefix(keys in proptest::collection::vec(arb_key(), 0..6)) {
        let tree = tree();
        let mut open = OpenPath::new();
        walk(&mut open, &keys);

        let target = LocationKey::parse("alpha-left-bogus").unwrap();
        let prefix = LocationKey::parse("alpha-left").unwrap();

        let with_bogus = plan(&LocationKey::root(), &target, &open, &tree);
        let with_prefix = plan(&LocationKey::root(), &prefix, &open, &tree);

        prop_assert_eq!(with_bogus.required(), with_prefix.required());
        prop_assert_eq!(with_bogus.diff(), with_prefix.diff());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Required chains prefix the effective path
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn required_entries_prefix_effective(key in arb_key()) {
        let tree = tree();
        let open = OpenPath::new();
        let plan = plan(&LocationKey::root(), &key, &open, &tree);

        for entry in plan.required() {
            prop_assert!(plan.effective().starts_with(entry));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Cascade ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn closes_run_deepest_first_and_before_opens(a in arb_key(), b in arb_key()) {
        let tree = tree();
        let mut open = OpenPath::new();

        let first = plan(&LocationKey::root(), &a, &open, &tree);
        apply(&first, &mut open);

        let second = plan(&a, &b, &open, &tree);
        let mut cascade = apply(&second, &mut open);

        let mut seen_open = false;
        let mut last_close_depth = usize::MAX;
        let mut last_open_depth = 0usize;
        while let Some(step) = cascade.begin_next() {
            match step.kind {
                StepKind::Close => {
                    prop_assert!(!seen_open, "close after open");
                    prop_assert!(step.level.index() < last_close_depth);
                    last_close_depth = step.level.index();
                }
                StepKind::Open => {
                    seen_open = true;
                    prop_assert!(step.level.index() > last_open_depth || last_open_depth == 0);
                    last_open_depth = step.level.index();
                }
            }
            cascade.finish(step.level);
        }
    }
}
