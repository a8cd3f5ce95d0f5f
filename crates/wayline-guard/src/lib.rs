#![forbid(unsafe_code)]

//! Unsaved-change detection and navigation guarding for Wayline.
//!
//! [`form`] models the editable state a screen reports; [`detect`] holds
//! the pure dirty decision; [`guard`] intercepts navigation requests,
//! consults the dirty map, and gates moves behind a single pending
//! confirmation when uncommitted edits would be lost.

pub mod detect;
pub mod form;
pub mod guard;

pub use detect::{ChangeDetector, DetectorConfig};
pub use form::{
    FieldValue, FormSnapshot, MARKER_FORM_OPEN, MARKER_HAS_CHANGES, MassiveMarker,
    MultiRowBuffer, OperationTab,
};
pub use guard::{
    DirtyMap, ExceptionList, GuardDecision, PendingTransition, TransitionGuard, table_of,
};
