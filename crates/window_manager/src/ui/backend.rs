//! Window Backend Trait
//!
//! Defines the interface between the window manager and the engine's UI layer.
//! Keeps the state machine independent of how UI objects are built or drawn.

use super::UiHandle;
use thiserror::Error;

/// Errors reported by a window backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// The UI object for a window could not be created
    #[error("Instantiation failed: {0}")]
    InstantiationFailed(String),

    /// A dependency of the window could not be resolved
    #[error("Missing dependency: {0}")]
    MissingDependency(String),
}

/// Engine-side operations the window manager consumes
///
/// Implementations receive only opaque handles and names; they must not hold
/// on to anything owned by the manager.
pub trait WindowBackend {
    /// Create the UI object for `name`, loading `dependencies` first
    fn instantiate(&mut self, name: &str, dependencies: &[String]) -> Result<UiHandle, BackendError>;

    /// Release the UI object and the dependencies loaded for it
    fn destroy(&mut self, handle: UiHandle, name: &str, dependencies: &[String]);

    /// Make the UI object visible
    fn activate(&mut self, handle: UiHandle);

    /// Hide the UI object
    fn deactivate(&mut self, handle: UiHandle);

    /// Place the UI object on a render layer
    fn add_to_layer(&mut self, handle: UiHandle, layer: i32);

    /// Start the close animation of a window
    ///
    /// Returns the animation length in seconds; zero or negative means the
    /// window has no close animation.
    fn play_close_animation(&mut self, name: &str, handle: UiHandle) -> f32;
}
