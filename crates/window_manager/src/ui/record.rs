//! Window descriptors and runtime records
//!
//! A [`WindowDescriptor`] is the static registration data of one window.
//! A [`WindowRecord`] wraps it with the mutable lifecycle state; records live
//! for the whole lifetime of the manager and are reused across open, close and
//! destroy cycles.

use super::window::{Window, WindowFactory};
use super::UiHandle;
use bitflags::bitflags;
use std::fmt;

slotmap::new_key_type! {
    /// Stable key of a registered window
    pub struct WindowKey;
}

bitflags! {
    /// Lifecycle flags of a window record
    ///
    /// `ACTIVE`, `CLOSING`, `DESTROYING` and `IMMEDIATE` are only ever set
    /// together with `INSTANTIATED`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u8 {
        /// The instance and its UI object exist
        const INSTANTIATED = 1 << 0;
        /// The UI object is visible and `on_enable` has run
        const ACTIVE = 1 << 1;
        /// A close is in flight
        const CLOSING = 1 << 2;
        /// A destroy is in flight
        const DESTROYING = 1 << 3;
        /// The in-flight close was taken over by an immediate teardown
        const IMMEDIATE = 1 << 4;
    }
}

/// Static registration data for one named window
pub struct WindowDescriptor {
    /// Unique window name
    pub name: String,
    /// Creates the window instance
    pub factory: WindowFactory,
    /// Whether the window starts a new background group on the stack
    pub is_background: bool,
    /// Resources the backend loads alongside the UI object
    pub dependencies: Vec<String>,
}

impl WindowDescriptor {
    /// Create a foreground window descriptor without dependencies
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Window> + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            is_background: false,
            dependencies: Vec::new(),
        }
    }

    /// Mark the window as a background window
    pub fn background(mut self) -> Self {
        self.is_background = true;
        self
    }

    /// Set the resources loaded with the window
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Debug for WindowDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowDescriptor")
            .field("name", &self.name)
            .field("is_background", &self.is_background)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Per-window mutable state
pub struct WindowRecord {
    /// Registration data
    pub descriptor: WindowDescriptor,
    flags: WindowFlags,
    layer: i32,
    updatable: Option<bool>,
    instance: Option<Box<dyn Window>>,
    handle: Option<UiHandle>,
    last_active: f64,
}

impl WindowRecord {
    /// Create a clean record for a freshly registered window
    pub fn new(descriptor: WindowDescriptor) -> Self {
        Self {
            descriptor,
            flags: WindowFlags::empty(),
            layer: -1,
            updatable: None,
            instance: None,
            handle: None,
            last_active: 0.0,
        }
    }

    /// Window name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Whether this window starts a background group
    pub fn is_background(&self) -> bool {
        self.descriptor.is_background
    }

    /// Current lifecycle flags
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Instance and UI object exist
    pub fn is_instantiated(&self) -> bool {
        self.flags.contains(WindowFlags::INSTANTIATED)
    }

    /// Window is visible
    pub fn is_active(&self) -> bool {
        self.flags.contains(WindowFlags::ACTIVE)
    }

    /// A close is in flight
    pub fn is_closing(&self) -> bool {
        self.flags.contains(WindowFlags::CLOSING)
    }

    /// A destroy is in flight
    pub fn is_destroying(&self) -> bool {
        self.flags.contains(WindowFlags::DESTROYING)
    }

    /// An immediate teardown owns the in-flight close
    pub fn is_immediate(&self) -> bool {
        self.flags.contains(WindowFlags::IMMEDIATE)
    }

    /// Whether an open request would be honoured
    pub fn can_open(&self) -> bool {
        !self
            .flags
            .intersects(WindowFlags::ACTIVE | WindowFlags::CLOSING | WindowFlags::DESTROYING)
    }

    /// Whether a close request would be honoured
    pub fn can_close(&self) -> bool {
        self.is_instantiated() && self.is_active() && !self.is_closing() && !self.is_destroying()
    }

    /// Whether a destroy request would be honoured
    pub fn can_destroy(&self) -> bool {
        self.is_instantiated() && !self.is_destroying()
    }

    /// Assigned render layer, -1 when not placed
    pub fn layer(&self) -> i32 {
        self.layer
    }

    /// Record the render layer
    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    /// Whether the window joins the per-frame update list, `None` before first instantiation
    pub fn updatable(&self) -> Option<bool> {
        self.updatable
    }

    /// Backend handle of the UI object while instantiated
    pub fn handle(&self) -> Option<UiHandle> {
        self.handle
    }

    /// Manager clock value when the window was last seen active
    pub fn last_active(&self) -> f64 {
        self.last_active
    }

    /// Refresh the last-active timestamp
    pub fn touch(&mut self, now: f64) {
        self.last_active = now;
    }

    /// Mutable access to the live instance
    pub fn instance_mut(&mut self) -> Option<&mut (dyn Window + 'static)> {
        self.instance.as_deref_mut()
    }

    /// Take ownership of a new instance and its UI object
    ///
    /// The update capability is probed here the first time only.
    pub fn attach(&mut self, instance: Box<dyn Window>, handle: UiHandle) -> bool {
        let updatable = *self.updatable.get_or_insert_with(|| instance.wants_update());
        self.instance = Some(instance);
        self.handle = Some(handle);
        self.flags = WindowFlags::INSTANTIATED;
        updatable
    }

    /// Release the instance and return the record to its registered state
    pub fn detach(&mut self) -> Option<Box<dyn Window>> {
        self.handle = None;
        self.layer = -1;
        self.flags = WindowFlags::empty();
        self.instance.take()
    }

    /// Mark the window visible
    pub fn set_active(&mut self, active: bool) {
        debug_assert!(!active || self.is_instantiated());
        self.flags.set(WindowFlags::ACTIVE, active);
    }

    /// Begin a close
    pub fn begin_close(&mut self, immediate: bool) {
        debug_assert!(self.is_instantiated());
        self.flags.insert(WindowFlags::CLOSING);
        self.flags.set(WindowFlags::IMMEDIATE, immediate);
    }

    /// Hand an in-flight close over to an immediate teardown
    pub fn take_over_close(&mut self) {
        debug_assert!(self.is_closing());
        self.flags.insert(WindowFlags::IMMEDIATE);
    }

    /// Finish a close
    pub fn end_close(&mut self) {
        self.flags.remove(WindowFlags::ACTIVE | WindowFlags::CLOSING | WindowFlags::IMMEDIATE);
    }

    /// Begin a destroy
    pub fn begin_destroy(&mut self) {
        debug_assert!(self.is_instantiated());
        self.flags.insert(WindowFlags::DESTROYING);
    }
}

impl fmt::Debug for WindowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowRecord")
            .field("name", &self.descriptor.name)
            .field("flags", &self.flags)
            .field("layer", &self.layer)
            .field("updatable", &self.updatable)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ticking;

    impl Window for Ticking {
        fn wants_update(&self) -> bool {
            true
        }
    }

    struct Still;

    impl Window for Still {}

    fn record() -> WindowRecord {
        WindowRecord::new(WindowDescriptor::new("Inventory", || Box::new(Ticking)))
    }

    #[test]
    fn test_new_record_is_clean() {
        let record = record();

        assert_eq!(record.flags(), WindowFlags::empty());
        assert_eq!(record.layer(), -1);
        assert_eq!(record.updatable(), None);
        assert!(record.handle().is_none());
        assert!(record.can_open());
        assert!(!record.can_close());
        assert!(!record.can_destroy());
    }

    #[test]
    fn test_update_capability_is_probed_once() {
        let mut record = record();

        assert!(record.attach(Box::new(Ticking), UiHandle(1)));
        record.detach();

        // Second instantiation keeps the first answer
        assert!(record.attach(Box::new(Still), UiHandle(2)));
        assert_eq!(record.updatable(), Some(true));
    }

    #[test]
    fn test_close_flags() {
        let mut record = record();
        record.attach(Box::new(Ticking), UiHandle(1));
        record.set_active(true);
        assert!(record.can_close());
        assert!(!record.can_open());

        record.begin_close(false);
        assert!(record.is_closing());
        assert!(!record.is_immediate());
        assert!(!record.can_close());

        record.take_over_close();
        assert!(record.is_immediate());

        record.end_close();
        assert!(!record.is_active());
        assert!(!record.is_closing());
        assert!(!record.is_immediate());
        assert!(record.can_open());
    }

    #[test]
    fn test_detach_resets_record() {
        let mut record = record();
        record.attach(Box::new(Ticking), UiHandle(3));
        record.set_layer(4);
        record.begin_destroy();

        assert!(record.detach().is_some());
        assert_eq!(record.flags(), WindowFlags::empty());
        assert_eq!(record.layer(), -1);
        assert!(record.handle().is_none());
        assert!(record.instance_mut().is_none());
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = WindowDescriptor::new("Main", || Box::new(Still))
            .background()
            .with_dependencies(["atlas/main", "font/title"]);

        assert!(descriptor.is_background);
        assert_eq!(descriptor.dependencies, vec!["atlas/main".to_string(), "font/title".to_string()]);
        assert!(format!("{descriptor:?}").contains("Main"));
    }
}
