//! Core algorithms – scroll progress, the scroll controller, transition math,
//! and the state behind each interactive panel.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Time is
//! always passed in as an `Instant` so everything can be driven from tests.

pub mod content;
pub mod controller;
pub mod counter;
pub mod easing;
pub mod frame;
pub mod molecules;
pub mod panel;
pub mod progress;
pub mod smooth_scroll;
pub mod title;
pub mod training;
pub mod twin;
