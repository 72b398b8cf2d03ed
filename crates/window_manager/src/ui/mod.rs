//! UI Window Module
//!
//! Tracks which screens are open, in what order, and drives their lifecycle.
//!
//! Architecture:
//! - WindowManager: owns descriptors, runtime records, the stack and the
//!   updatable list; runs the open/close/destroy state machine
//! - window: the instance contract every screen implements
//! - backend: engine adapter that owns the real UI objects
//! - stack: ordering and background-group rewrite rules
//! - script: adapter that lets a scripting runtime provide windows

pub mod backend;
pub mod manager;
pub mod message;
pub mod record;
pub mod script;
pub mod stack;
pub mod window;

#[cfg(feature = "lua")]
pub mod lua;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use backend::{BackendError, WindowBackend};
pub use manager::{CloseOptions, OpenOptions, Transition, WindowManager};
pub use message::{MessageArg, WindowMessage};
pub use record::{WindowDescriptor, WindowFlags, WindowRecord};
pub use script::{LifecycleHook, ScriptArgs, ScriptBridge, ScriptError, ScriptWindow};
pub use stack::WindowStack;
pub use window::{Window, WindowFactory};

/// Opaque handle to the engine-side UI object backing a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiHandle(pub u64);

/// Window manager errors
///
/// Each of these is also logged by the manager before it is returned, and
/// none of them leave the manager in a modified state.
#[derive(Error, Debug)]
pub enum WindowError {
    /// A window with this name is already registered
    #[error("Window already registered: {0}")]
    AlreadyRegistered(String),

    /// No window with this name is registered
    #[error("Unknown window: {0}")]
    UnknownWindow(String),

    /// The window has no live instance to receive a call
    #[error("Window not instantiated: {0}")]
    NotInstantiated(String),

    /// The engine backend failed to create the UI object
    #[error("Backend error for window {name}: {source}")]
    Backend {
        /// Window being instantiated
        name: String,
        /// Underlying backend failure
        #[source]
        source: BackendError,
    },
}
