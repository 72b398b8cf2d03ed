//! Window instance contract
//!
//! Every screen managed by [`WindowManager`](super::WindowManager) is a boxed
//! [`Window`]. All hooks have empty defaults so a screen only implements the
//! ones it cares about.

use super::message::WindowMessage;
use super::UiHandle;

/// Produces a fresh window instance each time a window is instantiated
pub type WindowFactory = Box<dyn Fn() -> Box<dyn Window>>;

/// Lifecycle hooks of a managed window
///
/// # Threading
/// Not `Send + Sync`: the manager drives every hook from the single UI update loop.
pub trait Window {
    /// Called once after the backend created the UI object
    fn on_create(&mut self, _handle: UiHandle) {}

    /// Called every time the window becomes visible
    fn on_enable(&mut self) {}

    /// Per-frame hook, only called when [`Window::wants_update`] is true
    fn on_update(&mut self, _delta_time: f32) {}

    /// Called every time the window is hidden
    fn on_disable(&mut self) {}

    /// Called once before the backend tears the UI object down
    fn on_destroy(&mut self) {}

    /// Receive a direct or broadcast message
    fn handle_message(&mut self, _message: &WindowMessage) {}

    /// Whether this window takes part in the per-frame update list
    ///
    /// Probed once, at first instantiation.
    fn wants_update(&self) -> bool {
        false
    }
}
