#![forbid(unsafe_code)]

//! Events the shell surfaces to its host.

use wayline_core::location::LocationKey;

/// Notifications emitted from [`crate::NavModel::update`].
///
/// `LocationChanged` fires only after the guard allows a move; the host
/// mounts the corresponding screen. `DirtyChanged` fires on every dirty
/// transition, usable for a page-level leave warning. `ConfirmRequested`
/// asks the host to show the confirmation surface for a parked move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The active location moved.
    LocationChanged(LocationKey),
    /// A screen's unsaved-edit state flipped.
    DirtyChanged {
        /// The screen the state belongs to.
        panel_id: String,
        /// Whether it now holds unsaved edits.
        dirty: bool,
    },
    /// A navigation request is parked pending user confirmation.
    ConfirmRequested {
        /// Where the user is.
        from: LocationKey,
        /// Where the parked request wants to go.
        to: LocationKey,
    },
}
