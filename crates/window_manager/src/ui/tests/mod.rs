//! Scenario tests for the window manager
//!
//! Every scenario drives a real [`WindowManager`](crate::ui::WindowManager)
//! against a recording backend and records every hook call in one shared log,
//! so ordering between backend calls and window hooks can be asserted.

mod support;

mod messaging;
