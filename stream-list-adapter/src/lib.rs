//! Adapter utilities for the `stream-list` crate.
//!
//! The `stream-list` crate is UI-agnostic and owns only the engine state. This crate
//! provides small, framework-neutral helpers commonly needed by hosts:
//!
//! - An in-memory container with fixed-extent children ([`VecContainer`])
//! - An in-memory paged data source ([`SliceSource`])
//! - A clock-driven controller that pumps the engine once per frame ([`Controller`])
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod container;
mod controller;
mod source;


pub use container::{Geometry, VecContainer};
pub use controller::Controller;
pub use source::{SliceSource, SourceQuery};
