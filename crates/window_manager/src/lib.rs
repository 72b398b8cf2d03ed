//! # Window Manager
//!
//! Window stack and lifecycle management for game UI screens.
//!
//! ## Features
//!
//! - **Lifecycle state machine**: instantiate, open, close and destroy with
//!   lifecycle hooks and render-layer placement
//! - **Window stack**: background windows group the foreground windows above
//!   them; groups are suspended and restored as backgrounds change
//! - **Animated close**: closes wait on their animation cooperatively through
//!   [`ui::WindowManager::update`], and immediate requests take them over
//! - **Scripting**: windows implemented by script modules (`lua` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use window_manager::prelude::*;
//!
//! struct Inventory;
//!
//! impl Window for Inventory {
//!     fn on_enable(&mut self) {
//!         log::info!("Inventory shown");
//!     }
//! }
//!
//! fn run<B: WindowBackend>(backend: B) -> Result<(), WindowError> {
//!     let mut manager = WindowManager::new(backend);
//!     manager.register_window(WindowDescriptor::new("Inventory", || -> Box<dyn Window> {
//!         Box::new(Inventory)
//!     }))?;
//!
//!     manager.open_window("Inventory", OpenOptions::on_layer(2))?;
//!     manager.close_window("Inventory", CloseOptions::default())?;
//!     manager.update(1.0 / 60.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod ui;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigError, WindowManagerConfig};
    pub use crate::foundation::time::FrameClock;
    pub use crate::ui::{
        BackendError, CloseOptions, MessageArg, OpenOptions, Transition, UiHandle, Window, WindowBackend,
        WindowDescriptor, WindowError, WindowManager, WindowMessage,
    };
}
