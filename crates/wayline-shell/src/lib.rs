#![forbid(unsafe_code)]

//! The Wayline navigation shell.
//!
//! [`NavModel`] is the single store the host drives: pointer and
//! navigation messages go in through [`NavModel::update`], host events
//! come back out as commands. Panels subscribe to nothing — the host
//! renders from the [`RenderDescriptor`] the pure reducer in [`render`]
//! produces, so the state machine stays decoupled from any particular
//! rendering technology.

pub mod events;
pub mod model;
pub mod render;

pub use events::HostEvent;
pub use model::{NavCmd, NavConfig, NavModel, NavMsg, panel_id_for};
pub use render::{PaneItem, PanelPane, RenderDescriptor, Screen, render_descriptor};
