//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard and mouse input handling
//! - `events` - Callback event processing
//! - `render` - Render dispatch and layering
//! - `carousel` - Article list widgets
//! - `detail` - Detail overlay widget
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay
//! - `helpers` - Shared utility functions

mod carousel;
mod detail;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
