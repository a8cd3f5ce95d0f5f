#![forbid(unsafe_code)]

//! Path synchronization: reconciling the active location against the
//! open-path chain.
//!
//! [`plan`] computes what must open and close for a location change;
//! [`apply`] commits the open-path mutation in one transaction and yields
//! a [`Cascade`] of strictly sequential animation steps: every close
//! (deepest first), then every open (shallowest first). A step begins only
//! after the previous one finishes, so two transitions never overlap on
//! the same panel and depth ordering is guaranteed.
//!
//! # Edge cases
//!
//! - Same key (string-equal): the plan is a no-op; re-navigating to the
//!   current leaf must not re-trigger animation.
//! - Unresolvable segment: the walk soft-fails at the matched prefix; the
//!   plan for `a-b-missing` equals the plan for `a-b`.
//! - Home key: required set is empty; everything collapses.

use std::collections::VecDeque;

use wayline_core::location::LocationKey;
use wayline_core::menu::MenuTree;

use crate::open_path::{OpenPath, PathDiff};
use crate::panel::PanelLevel;

/// What a cascade step does to its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Collapse the panel.
    Close,
    /// Expand the panel.
    Open,
}

/// One sequential step of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStep {
    /// Collapse or expand.
    pub kind: StepKind,
    /// The panel the step drives.
    pub level: PanelLevel,
}

/// The outcome of planning one synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    effective: LocationKey,
    required: Vec<LocationKey>,
    diff: PathDiff,
}

impl SyncPlan {
    /// A plan that does nothing (key unchanged or already reconciled).
    #[must_use]
    pub fn noop(effective: LocationKey) -> Self {
        Self {
            effective,
            required: Vec::new(),
            diff: PathDiff::default(),
        }
    }

    /// Whether the pass opens or closes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.diff.is_empty()
    }

    /// The effective path after the soft-fail walk.
    #[must_use]
    pub fn effective(&self) -> &LocationKey {
        &self.effective
    }

    /// The required open chain (internal-node prefixes of the effective path).
    #[must_use]
    pub fn required(&self) -> &[LocationKey] {
        &self.required
    }

    /// The open/close difference.
    #[must_use]
    pub fn diff(&self) -> &PathDiff {
        &self.diff
    }
}

/// Plan the synchronization for a location change.
///
/// Runs only the pure computation; nothing is mutated. Call [`apply`] to
/// commit. Equal keys produce a no-op plan without consulting the tree.
#[must_use]
pub fn plan(
    prev: &LocationKey,
    next: &LocationKey,
    open: &OpenPath,
    tree: &MenuTree,
) -> SyncPlan {
    if prev == next {
        return SyncPlan::noop(next.clone());
    }

    let effective = tree.resolve(next);

    // Every prefix of the effective path that is an internal node needs a
    // panel open for its children.
    let required: Vec<LocationKey> = effective
        .prefixes()
        .filter(|prefix| {
            tree.node_for(prefix)
                .is_some_and(wayline_core::menu::MenuNode::has_children)
        })
        .collect();

    let diff = open.diff(&required);

    #[cfg(feature = "tracing")]
    if !diff.is_empty() {
        tracing::debug!(
            target: "wayline::sync",
            from = %prev,
            to = %next,
            effective = %effective,
            closes = diff.to_close.len(),
            opens = diff.to_open.len(),
            "open-path reconciliation"
        );
    }

    SyncPlan {
        effective,
        required,
        diff,
    }
}

/// Commit a plan: mutate the open path once and build the step cascade.
pub fn apply(plan: &SyncPlan, open: &mut OpenPath) -> Cascade {
    if plan.is_noop() {
        return Cascade::empty();
    }
    open.replace(plan.required.to_vec());

    let mut steps = VecDeque::new();
    for key in &plan.diff.to_close {
        if let Some(level) = PanelLevel::for_depth(key.depth()) {
            steps.push_back(CascadeStep {
                kind: StepKind::Close,
                level,
            });
        }
    }
    for key in &plan.diff.to_open {
        if let Some(level) = PanelLevel::for_depth(key.depth()) {
            steps.push_back(CascadeStep {
                kind: StepKind::Open,
                level,
            });
        }
    }
    Cascade::from_steps(steps)
}

/// A strictly sequential queue of open/close steps.
///
/// At most one step is in flight. [`Cascade::begin_next`] starts the next
/// step only when none is pending; [`Cascade::finish`] retires the
/// in-flight step when its panel reports completion.
#[derive(Debug, Clone, Default)]
pub struct Cascade {
    steps: VecDeque<CascadeStep>,
    in_flight: Option<CascadeStep>,
}

impl Cascade {
    /// An empty, already-finished cascade.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from ordered steps.
    #[must_use]
    pub fn from_steps(steps: VecDeque<CascadeStep>) -> Self {
        Self {
            steps,
            in_flight: None,
        }
    }

    /// A visual collapse sweep over `levels`, deepest first.
    ///
    /// Used by the hover debounce: the open path is untouched, only panel
    /// visibility cascades shut.
    #[must_use]
    pub fn collapse_sweep(levels: &[PanelLevel]) -> Self {
        let mut ordered: Vec<PanelLevel> = levels.to_vec();
        ordered.sort();
        ordered.reverse();
        Self::from_steps(
            ordered
                .into_iter()
                .map(|level| CascadeStep {
                    kind: StepKind::Close,
                    level,
                })
                .collect(),
        )
    }

    /// Start the next step if none is in flight. Returns the started step.
    pub fn begin_next(&mut self) -> Option<CascadeStep> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = self.steps.pop_front();
        self.in_flight
    }

    /// The step currently awaiting completion.
    #[must_use]
    pub fn in_flight(&self) -> Option<CascadeStep> {
        self.in_flight
    }

    /// Retire the in-flight step if it drives `level`. Returns whether the
    /// step was retired.
    pub fn finish(&mut self, level: PanelLevel) -> bool {
        match self.in_flight {
            Some(step) if step.level == level => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Whether every step has run to completion.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.steps.is_empty() && self.in_flight.is_none()
    }

    /// Steps not yet started.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}
