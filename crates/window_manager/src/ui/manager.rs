//! Window Manager
//!
//! Central state machine for managed windows: registration, open, close,
//! destroy, messaging and the per-frame update.
//!
//! All mutation happens on the caller's update loop. A close that plays an
//! animation does not block: it is parked as a pending transition and finished
//! by [`WindowManager::update`] once the animation time has elapsed. While it is
//! parked the window refuses to reopen, and an immediate close or destroy can
//! take the transition over and finish it on the spot.

use super::backend::WindowBackend;
use super::message::WindowMessage;
use super::record::{WindowDescriptor, WindowKey, WindowRecord};
use super::stack::WindowStack;
use super::WindowError;
use crate::config::{Config, WindowManagerConfig};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Outcome of a lifecycle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The window was in a state where the request does not apply
    Ignored,
    /// The request took effect synchronously
    Completed,
    /// The request waits on a close animation and finishes in a later `update`
    Pending,
}

/// Parameters of an open request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    /// Render layer; `None` keeps the current layer or uses the configured default
    pub layer: Option<i32>,
    /// Immediately close every other open window first
    pub close_others: bool,
    /// Restore the suspended children of a background window instead of discarding them
    pub pop_suspended: bool,
}

impl OpenOptions {
    /// Open on a specific layer
    pub fn on_layer(layer: i32) -> Self {
        Self {
            layer: Some(layer),
            ..Self::default()
        }
    }

    /// Close every other open window first
    pub fn close_others(mut self) -> Self {
        self.close_others = true;
        self
    }

    /// Restore suspended children of a background window
    pub fn pop_suspended(mut self) -> Self {
        self.pop_suspended = true;
        self
    }
}

/// Parameters of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOptions {
    /// Remove the window from the stack
    pub remove_from_stack: bool,
    /// Only remove it when it is the topmost entry
    pub only_if_top: bool,
}

impl Default for CloseOptions {
    fn default() -> Self {
        Self {
            remove_from_stack: true,
            only_if_top: true,
        }
    }
}

impl CloseOptions {
    /// Hide the window but keep its stack slot
    pub fn keep_in_stack() -> Self {
        Self {
            remove_from_stack: false,
            only_if_top: false,
        }
    }

    /// Remove the window from the stack wherever it sits
    pub fn anywhere() -> Self {
        Self {
            remove_from_stack: true,
            only_if_top: false,
        }
    }
}

/// A close waiting on its animation
#[derive(Debug, Clone, Copy)]
struct PendingClose {
    key: WindowKey,
    remaining: f32,
    restore: Option<WindowKey>,
}

/// Central window management system
pub struct WindowManager<B: WindowBackend> {
    /// Engine adapter owning the real UI objects
    backend: B,

    config: WindowManagerConfig,

    /// Runtime records, one per registered window
    records: SlotMap<WindowKey, WindowRecord>,

    /// Name lookup
    names: HashMap<String, WindowKey>,

    stack: WindowStack,

    /// Instantiated windows that take part in the per-frame update
    updatable: Vec<WindowKey>,

    /// Instantiated windows in instantiation order
    instantiated: Vec<WindowKey>,

    /// Closes waiting on their animation
    pending: Vec<PendingClose>,

    /// Background window whose close finished most recently
    last_closed_background: Option<WindowKey>,

    /// Seconds since the manager was created
    clock: f64,
}

impl<B: WindowBackend> WindowManager<B> {
    /// Create a window manager with default configuration
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, WindowManagerConfig::default())
    }

    /// Create a window manager with custom configuration
    pub fn with_config(backend: B, mut config: WindowManagerConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("Invalid window manager config, clamping: {err}");
        }
        config.time_scale = config.time_scale.max(0.0);

        Self {
            backend,
            config,
            records: SlotMap::with_key(),
            names: HashMap::new(),
            stack: WindowStack::new(),
            updatable: Vec::new(),
            instantiated: Vec::new(),
            pending: Vec::new(),
            last_closed_background: None,
            clock: 0.0,
        }
    }

    /// Backend reference
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Backend mutable reference
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Active configuration
    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    /// Factor applied to frame time while close animations are pending
    pub fn time_scale(&self) -> f32 {
        self.config.time_scale
    }

    /// Set the animation time scale
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.config.time_scale = time_scale.max(0.0);
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a window
    ///
    /// Fails without side effects if the name is already taken.
    pub fn register_window(&mut self, descriptor: WindowDescriptor) -> Result<(), WindowError> {
        if self.names.contains_key(&descriptor.name) {
            log::error!("Window '{}' is already registered", descriptor.name);
            return Err(WindowError::AlreadyRegistered(descriptor.name));
        }

        log::debug!(
            "Registering window '{}' (background: {}, {} dependencies)",
            descriptor.name,
            descriptor.is_background,
            descriptor.dependencies.len()
        );
        let name = descriptor.name.clone();
        let key = self.records.insert(WindowRecord::new(descriptor));
        self.names.insert(name, key);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<WindowKey, WindowError> {
        self.names.get(name).copied().ok_or_else(|| {
            log::error!("Unknown window '{name}'");
            WindowError::UnknownWindow(name.to_string())
        })
    }

    fn is_background_key(&self, key: WindowKey) -> bool {
        self.records.get(key).is_some_and(WindowRecord::is_background)
    }

    // ------------------------------------------------------------------
    // Open
    // ------------------------------------------------------------------

    /// Open a window
    ///
    /// Instantiates it on first use, shows it and moves it to the top of the
    /// stack. Opening a window that is already visible, closing or being
    /// destroyed is ignored.
    pub fn open_window(&mut self, name: &str, options: OpenOptions) -> Result<Transition, WindowError> {
        let key = self.lookup(name)?;
        self.open_key(key, options)
    }

    fn open_key(&mut self, key: WindowKey, options: OpenOptions) -> Result<Transition, WindowError> {
        let record = &self.records[key];
        if !record.can_open() {
            log::trace!("Open of '{}' ignored (flags {:?})", record.name(), record.flags());
            return Ok(Transition::Ignored);
        }

        if !record.is_instantiated() {
            self.instantiate(key)?;
        }

        let record = &self.records[key];
        let layer = options.layer.unwrap_or_else(|| {
            if record.layer() >= 0 {
                record.layer()
            } else {
                self.config.default_layer
            }
        });
        self.place(key, layer);

        if options.close_others {
            self.close_others(key);
        }

        self.activate(key);
        self.restack(key, options.pop_suspended);

        if self.last_closed_background == Some(key) {
            self.last_closed_background = None;
        }
        log::debug!("Opened window '{}' on layer {}", self.records[key].name(), layer);
        Ok(Transition::Completed)
    }

    fn instantiate(&mut self, key: WindowKey) -> Result<(), WindowError> {
        let record = &self.records[key];
        let instance = (record.descriptor.factory)();
        let handle = self
            .backend
            .instantiate(&record.descriptor.name, &record.descriptor.dependencies)
            .map_err(|source| {
                log::error!("Failed to instantiate window '{}': {}", record.descriptor.name, source);
                WindowError::Backend {
                    name: record.descriptor.name.clone(),
                    source,
                }
            })?;

        let record = &mut self.records[key];
        let updatable = record.attach(instance, handle);
        if let Some(window) = record.instance_mut() {
            window.on_create(handle);
        }
        // Hidden until the open finishes
        self.backend.deactivate(handle);

        self.instantiated.push(key);
        if updatable {
            self.updatable.push(key);
        }
        log::debug!("Instantiated window '{}' ({:?}, updatable: {})", record.name(), handle, updatable);
        Ok(())
    }

    fn place(&mut self, key: WindowKey, layer: i32) {
        let record = &mut self.records[key];
        if record.layer() == layer {
            return;
        }
        if let Some(handle) = record.handle() {
            self.backend.add_to_layer(handle, layer);
        }
        record.set_layer(layer);
    }

    fn activate(&mut self, key: WindowKey) {
        let record = &mut self.records[key];
        if let Some(handle) = record.handle() {
            self.backend.activate(handle);
        }
        record.set_active(true);
        record.touch(self.clock);
        if let Some(window) = record.instance_mut() {
            window.on_enable();
        }
    }

    fn close_others(&mut self, except: WindowKey) {
        let others: Vec<WindowKey> = self
            .instantiated
            .iter()
            .rev()
            .copied()
            .filter(|key| *key != except && self.records[*key].is_active())
            .collect();

        // Every other window ends up hidden, so taken-over closes restore nothing
        for pending in &mut self.pending {
            pending.restore = None;
        }

        for key in others {
            self.close_key(key, CloseOptions::keep_in_stack(), true);
        }
    }

    /// Move a freshly shown window to the top of the stack
    ///
    /// A background window takes over the group below it: the children of
    /// its old slot (or of the current background when it was not on the
    /// stack) are either restored on top of it or evicted.
    fn restack(&mut self, key: WindowKey, pop_suspended: bool) {
        let orphans = if self.is_background_key(key) {
            let records = &self.records;
            self.stack
                .take_group(key, |entry| records.get(entry).is_some_and(WindowRecord::is_background))
        } else {
            Vec::new()
        };

        self.stack.push(key);

        for child in orphans {
            if pop_suspended {
                self.resume_child(child);
            } else {
                self.evict_child(child);
            }
        }
    }

    fn resume_child(&mut self, child: WindowKey) {
        if self.records[child].is_active() {
            self.stack.push(child);
            return;
        }

        match self.open_key(child, OpenOptions::default()) {
            Ok(Transition::Ignored) => {
                log::debug!("Suspended window '{}' could not be restored", self.records[child].name());
            }
            Ok(_) => {}
            Err(err) => log::warn!("Failed to restore suspended window: {err}"),
        }
    }

    /// Evicted windows are hidden as well, so nothing stays visible without a stack slot
    fn evict_child(&mut self, child: WindowKey) {
        log::debug!("Evicting window '{}' from the stack", self.records[child].name());
        if self.records[child].is_active() {
            self.close_key(child, CloseOptions::keep_in_stack(), true);
        }
    }

    // ------------------------------------------------------------------
    // Close
    // ------------------------------------------------------------------

    /// Close a window, playing its close animation
    ///
    /// Returns [`Transition::Pending`] while the animation runs.
    pub fn close_window(&mut self, name: &str, options: CloseOptions) -> Result<Transition, WindowError> {
        let key = self.lookup(name)?;
        Ok(self.close_key(key, options, false))
    }

    /// Close a window without waiting on an animation
    ///
    /// Also finishes a close that is already waiting on its animation.
    pub fn close_window_immediate(&mut self, name: &str, options: CloseOptions) -> Result<Transition, WindowError> {
        let key = self.lookup(name)?;
        Ok(self.close_key(key, options, true))
    }

    fn close_key(&mut self, key: WindowKey, options: CloseOptions, immediate: bool) -> Transition {
        let record = &self.records[key];
        if immediate && record.is_closing() && !record.is_immediate() {
            return self.take_over_close(key);
        }
        if !record.can_close() {
            log::trace!("Close of '{}' ignored (flags {:?})", record.name(), record.flags());
            return Transition::Ignored;
        }

        let restore = if options.remove_from_stack {
            self.unstack(key, options.only_if_top)
        } else {
            None
        };
        self.run_close(key, immediate, restore)
    }

    /// Remove a closing window from the stack
    ///
    /// Children of a removed background window go with it. Returns the
    /// background window to restore when the removed window was the
    /// visible topmost background; hidden windows leave the rest alone.
    fn unstack(&mut self, key: WindowKey, only_if_top: bool) -> Option<WindowKey> {
        let index = self.stack.position(key)?;
        if only_if_top && index + 1 != self.stack.len() {
            return None;
        }

        let records = &self.records;
        let is_background = |entry: WindowKey| records.get(entry).is_some_and(WindowRecord::is_background);
        let background = is_background(key);
        let visible = records[key].is_active();
        let topmost = background && visible && self.stack.next_background_after(index, is_background).is_none();

        let children = self.stack.remove_with_children(index, is_background);
        let restore = if topmost {
            self.stack.previous_background_before(index, is_background)
        } else {
            None
        };

        for child in children {
            self.evict_child(child);
        }
        restore
    }

    fn run_close(&mut self, key: WindowKey, immediate: bool, restore: Option<WindowKey>) -> Transition {
        self.records[key].begin_close(immediate);

        if !immediate {
            let record = &self.records[key];
            let duration = match record.handle() {
                Some(handle) => self.backend.play_close_animation(record.name(), handle),
                None => 0.0,
            };
            if duration > 0.0 {
                log::debug!("Closing window '{}' after {:.2}s animation", record.name(), duration);
                self.pending.push(PendingClose {
                    key,
                    remaining: duration,
                    restore,
                });
                return Transition::Pending;
            }
        }

        self.finish_close(key, restore);
        Transition::Completed
    }

    fn take_over_close(&mut self, key: WindowKey) -> Transition {
        self.records[key].take_over_close();

        let mut restore = None;
        self.pending.retain(|pending| {
            if pending.key == key {
                restore = pending.restore;
                false
            } else {
                true
            }
        });

        log::debug!("Immediate teardown of closing window '{}'", self.records[key].name());
        self.finish_close(key, restore);
        Transition::Completed
    }

    fn finish_close(&mut self, key: WindowKey, restore: Option<WindowKey>) {
        let record = &mut self.records[key];
        if let Some(window) = record.instance_mut() {
            window.on_disable();
        }
        if let Some(handle) = record.handle() {
            self.backend.deactivate(handle);
        }
        record.touch(self.clock);
        record.end_close();
        log::debug!("Closed window '{}'", record.name());

        if record.is_destroying() {
            self.finish_destroy(key);
        } else if record.is_background() {
            self.last_closed_background = Some(key);
        }

        if let Some(background) = restore {
            self.restore_background(background);
        }
    }

    /// Bring a background window and its group back after the group above it went away
    fn restore_background(&mut self, key: WindowKey) {
        let record = &self.records[key];
        if !record.is_instantiated() || record.is_closing() || record.is_destroying() {
            return;
        }

        log::debug!("Restoring background window '{}'", record.name());
        if record.is_active() {
            self.restack(key, true);
        } else if let Err(err) = self.open_key(key, OpenOptions::default().pop_suspended()) {
            log::warn!("Failed to restore background window: {err}");
        }
    }

    /// Reopen the background window whose close finished most recently
    pub fn reopen_last_background(&mut self) -> Result<Transition, WindowError> {
        let Some(key) = self.last_closed_background else {
            return Ok(Transition::Ignored);
        };
        self.open_key(key, OpenOptions::default().pop_suspended())
    }

    /// Close every open window
    ///
    /// The stack is cleared first so no background restoration kicks in.
    pub fn close_all(&mut self, immediate: bool) {
        self.stack.clear();
        let keys: Vec<WindowKey> = self.instantiated.iter().rev().copied().collect();
        for key in keys {
            self.close_key(key, CloseOptions::keep_in_stack(), immediate);
        }
    }

    // ------------------------------------------------------------------
    // Destroy
    // ------------------------------------------------------------------

    /// Destroy a window's instance and UI object
    ///
    /// A visible window is closed first; if its close animation runs, the
    /// destroy finishes together with the close.
    pub fn destroy_window(&mut self, name: &str) -> Result<Transition, WindowError> {
        let key = self.lookup(name)?;
        Ok(self.destroy_key(key, false))
    }

    /// Destroy a window without waiting on any close animation
    pub fn destroy_window_immediate(&mut self, name: &str) -> Result<Transition, WindowError> {
        let key = self.lookup(name)?;
        Ok(self.destroy_key(key, true))
    }

    fn destroy_key(&mut self, key: WindowKey, immediate: bool) -> Transition {
        let record = &self.records[key];
        if !record.can_destroy() {
            if immediate && record.is_destroying() && record.is_closing() && !record.is_immediate() {
                return self.take_over_close(key);
            }
            log::trace!("Destroy of '{}' ignored (flags {:?})", record.name(), record.flags());
            return Transition::Ignored;
        }

        self.records[key].begin_destroy();
        self.updatable.retain(|entry| *entry != key);
        let restore = self.unstack(key, false);

        let record = &self.records[key];
        if record.is_closing() {
            if immediate && !record.is_immediate() {
                self.attach_restore(key, restore);
                return self.take_over_close(key);
            }
            log::debug!("Destroy of '{}' waits on its close", record.name());
            self.attach_restore(key, restore);
            return Transition::Pending;
        }

        if record.is_active() {
            return self.run_close(key, immediate, restore);
        }

        self.finish_destroy(key);
        if let Some(background) = restore {
            self.restore_background(background);
        }
        Transition::Completed
    }

    fn attach_restore(&mut self, key: WindowKey, restore: Option<WindowKey>) {
        if let Some(pending) = self.pending.iter_mut().find(|pending| pending.key == key) {
            pending.restore = pending.restore.or(restore);
        }
    }

    fn finish_destroy(&mut self, key: WindowKey) {
        self.updatable.retain(|entry| *entry != key);
        self.instantiated.retain(|entry| *entry != key);
        self.stack.remove(key);
        if self.last_closed_background == Some(key) {
            self.last_closed_background = None;
        }

        let record = &mut self.records[key];
        let handle = record.handle();
        let mut instance = record.detach();
        if let Some(window) = instance.as_deref_mut() {
            window.on_destroy();
        }
        if let Some(handle) = handle {
            self.backend
                .destroy(handle, &record.descriptor.name, &record.descriptor.dependencies);
        }
        log::debug!("Destroyed window '{}'", record.name());
    }

    /// Destroy every instantiated window without animations
    pub fn destroy_all(&mut self) {
        self.stack.clear();
        let keys: Vec<WindowKey> = self.instantiated.iter().rev().copied().collect();
        for key in keys {
            self.destroy_key(key, true);
        }
    }

    // ------------------------------------------------------------------
    // Messaging
    // ------------------------------------------------------------------

    /// Deliver a message to one window
    pub fn send_message(&mut self, name: &str, message: &WindowMessage) -> Result<(), WindowError> {
        let key = self.lookup(name)?;
        match self.records[key].instance_mut() {
            Some(window) => {
                window.handle_message(message);
                Ok(())
            }
            None => {
                log::error!("Cannot send message {} to '{}': window is not instantiated", message.id, name);
                Err(WindowError::NotInstantiated(name.to_string()))
            }
        }
    }

    /// Deliver a message to every instantiated window, newest first
    pub fn broadcast(&mut self, message: &WindowMessage) {
        for &key in self.instantiated.iter().rev() {
            if let Some(window) = self.records[key].instance_mut() {
                window.handle_message(message);
            }
        }
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Advance the manager by one frame
    ///
    /// Finishes close animations that ran out, runs the update hook of every
    /// updatable window (newest first) and, when enabled, evicts idle windows.
    pub fn update(&mut self, delta_time: f32) {
        self.clock += f64::from(delta_time);
        self.advance_pending(delta_time * self.config.time_scale);

        for &key in self.updatable.iter().rev() {
            if let Some(window) = self.records[key].instance_mut() {
                window.on_update(delta_time);
            }
        }

        let now = self.clock;
        for (_, record) in self.records.iter_mut() {
            if record.is_active() {
                record.touch(now);
            }
        }

        if self.config.idle_eviction {
            self.evict_idle();
        }
    }

    fn advance_pending(&mut self, step: f32) {
        if self.pending.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        self.pending.retain_mut(|pending| {
            pending.remaining -= step;
            if pending.remaining <= 0.0 {
                finished.push(*pending);
                false
            } else {
                true
            }
        });

        for pending in finished {
            let record = &self.records[pending.key];
            if record.is_closing() && !record.is_immediate() {
                self.finish_close(pending.key, pending.restore);
            }
        }
    }

    fn evict_idle(&mut self) {
        let timeout = f64::from(self.config.idle_timeout);
        let now = self.clock;
        let idle: Vec<WindowKey> = self
            .instantiated
            .iter()
            .copied()
            .filter(|key| {
                let record = &self.records[*key];
                !record.is_active()
                    && !record.is_closing()
                    && !record.is_destroying()
                    && now - record.last_active() > timeout
            })
            .collect();

        for key in idle {
            log::info!("Evicting idle window '{}'", self.records[key].name());
            self.destroy_key(key, true);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Record of a registered window
    pub fn record(&self, name: &str) -> Option<&WindowRecord> {
        self.names.get(name).map(|key| &self.records[*key])
    }

    /// Whether a window with this name is registered
    pub fn is_window_registered(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Whether the window has a live instance
    pub fn is_window_instantiated(&self, name: &str) -> bool {
        self.record(name).is_some_and(WindowRecord::is_instantiated)
    }

    /// Whether the window is visible
    pub fn is_window_active(&self, name: &str) -> bool {
        self.record(name).is_some_and(WindowRecord::is_active)
    }

    /// Whether a close of the window is in flight
    pub fn is_window_closing(&self, name: &str) -> bool {
        self.record(name).is_some_and(WindowRecord::is_closing)
    }

    /// Whether a destroy of the window is in flight
    pub fn is_window_destroying(&self, name: &str) -> bool {
        self.record(name).is_some_and(WindowRecord::is_destroying)
    }

    /// Render layer of the window, -1 when not placed
    pub fn window_layer(&self, name: &str) -> Option<i32> {
        self.record(name).map(WindowRecord::layer)
    }

    /// Stack entries bottom to top
    pub fn stack(&self) -> Vec<&str> {
        self.stack.iter().map(|key| self.records[key].name()).collect()
    }

    /// Topmost stack entry
    pub fn top_window(&self) -> Option<&str> {
        self.stack.top().map(|key| self.records[key].name())
    }

    /// Topmost background window on the stack
    pub fn current_background(&self) -> Option<&str> {
        self.stack
            .current_background(|key| self.is_background_key(key))
            .map(|key| self.records[key].name())
    }

    /// Windows in the per-frame update list, in insertion order
    pub fn updatable_windows(&self) -> Vec<&str> {
        self.updatable.iter().map(|key| self.records[*key].name()).collect()
    }

    /// Number of closes waiting on their animation
    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    /// Seconds accumulated by `update`
    pub fn clock(&self) -> f64 {
        self.clock
    }
}
