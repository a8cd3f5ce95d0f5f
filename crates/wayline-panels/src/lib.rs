#![forbid(unsafe_code)]

//! Panel state machines for the Wayline navigation subsystem.
//!
//! Three cooperating pieces:
//!
//! - [`panel`]: the per-level slide state machine
//!   (`Collapsed → Expanding → Expanded → Collapsing`) with mid-flight
//!   reversal and reduced-motion support.
//! - [`hover`]: debounced close deadlines, one per level.
//! - [`sync`]: reconciliation of the active location key against the
//!   open-path chain, producing strictly sequenced open/close cascades.
//!
//! Everything is single-threaded and clock-explicit: callers pass `now`
//! and tick deltas in, nothing here reads a wall clock.

pub mod hover;
pub mod open_path;
pub mod panel;
pub mod sync;

pub use hover::{CloseTimers, HoverConfig};
pub use open_path::{OpenPath, PathDiff};
pub use panel::{LEVEL_COUNT, PanelLevel, PanelSet, PanelState, SlideConfig, SlidePhase, SlideState};
pub use sync::{Cascade, CascadeStep, StepKind, SyncPlan, apply, plan};
