#![forbid(unsafe_code)]

//! vdump runtime
//!
//! Ties the core, render and widget crates into an interactive session.
//!
//! - [`Screen`] - view registry, global keys, view list overlay and chrome
//! - [`Program`] - single-threaded frame loop: render, diff, present, block
//!   on one event
//! - [`run`] - start a terminal session and drive a [`Screen`] until quit

pub mod chrome;
pub mod program;
pub mod screen;
pub mod selector;

pub use program::{Program, run};
pub use screen::{Screen, ScreenAction};
pub use selector::{SelectorOutcome, ViewSelector};
pub use vdump_widgets::View;
