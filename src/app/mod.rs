//! Application orchestration — state management, event loop, and input handling.

pub mod deck;
pub mod event;
pub mod feed_runtime;
pub mod handler;
pub mod settings;
pub mod state;
