//! Foundation module - Core utilities shared by the window manager
//!
//! - Logging bootstrap
//! - Fixed-step frame clock

pub mod logging;
pub mod time;
