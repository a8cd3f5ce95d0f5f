#![forbid(unsafe_code)]

//! Core data model for the Wayline navigation subsystem.
//!
//! This crate holds the pure, timer-free pieces: [`LocationKey`] path
//! identifiers, the [`MenuNode`]/[`MenuTree`] hierarchy, the
//! permission-pruned tree builder, and the access/flag snapshot types the
//! builder consumes. Everything here is plain owned data; panels, timers,
//! and guards live in the sibling crates.

pub mod access;
pub mod builder;
pub mod location;
pub mod menu;

pub use access::{AccessCell, AccessSnapshot, FlagSource, StaticFlags, TableFlags};
pub use builder::{BuilderConfig, build_menu};
pub use location::{KeyError, LocationKey, MAX_DEPTH, SEPARATOR};
pub use menu::{IconRef, MenuNode, MenuTemplate, MenuTree, Operation};
