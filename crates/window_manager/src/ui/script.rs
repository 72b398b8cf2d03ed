//! Script-backed windows
//!
//! A [`ScriptWindow`] forwards every lifecycle hook to callbacks found in a
//! scripting runtime. The runtime itself stays behind the [`ScriptBridge`]
//! trait: the window only holds opaque table and callback handles.
//!
//! Missing callbacks are fine. They are reported once when the window binds
//! and the matching hook simply does nothing.

use super::message::WindowMessage;
use super::window::{Window, WindowFactory};
use super::UiHandle;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// Lifecycle hooks a script can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    /// `on_create(self, handle)`
    Create,
    /// `on_enable(self)`
    Enable,
    /// `on_update(self, delta_time)`
    Update,
    /// `on_disable(self)`
    Disable,
    /// `on_destroy(self)`
    Destroy,
    /// `handle_message(self, id, args)`
    HandleMessage,
}

impl LifecycleHook {
    /// Every hook, in lifecycle order
    pub const ALL: [Self; 6] = [
        Self::Create,
        Self::Enable,
        Self::Update,
        Self::Disable,
        Self::Destroy,
        Self::HandleMessage,
    ];

    /// Name of the script function implementing the hook
    pub fn function_name(self) -> &'static str {
        match self {
            Self::Create => "on_create",
            Self::Enable => "on_enable",
            Self::Update => "on_update",
            Self::Disable => "on_disable",
            Self::Destroy => "on_destroy",
            Self::HandleMessage => "handle_message",
        }
    }
}

/// Arguments passed after the window table
#[derive(Debug, Clone, Copy)]
pub enum ScriptArgs<'a> {
    /// No extra arguments
    None,
    /// Handle of the freshly created UI object
    Create(UiHandle),
    /// Frame delta in seconds
    Update(f32),
    /// Message id and arguments
    Message(&'a WindowMessage),
}

/// Script bridge errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// No table is registered under the module name
    #[error("Script module not found: {0}")]
    ModuleNotFound(String),

    /// The runtime reported an error while running a callback
    #[error("Script runtime error: {0}")]
    Runtime(String),
}

/// Access to a scripting runtime
pub trait ScriptBridge {
    /// Handle to the table backing one window
    type Table;
    /// Handle to a bound callback
    type Callback;

    /// Find the table exported by a script module
    fn lookup_table(&self, module: &str) -> Option<Self::Table>;

    /// Find the callback implementing `hook` in a table
    fn lookup_callback(&self, table: &Self::Table, hook: LifecycleHook) -> Option<Self::Callback>;

    /// Call a callback with the table as first argument
    fn invoke(&self, callback: &Self::Callback, table: &Self::Table, args: ScriptArgs<'_>) -> Result<(), ScriptError>;

    /// Release the table and callback handles held by a destroyed window
    fn release(&self, table: Self::Table, callbacks: Vec<Self::Callback>);
}

/// Window implemented by a script module
pub struct ScriptWindow<B: ScriptBridge> {
    bridge: Rc<B>,
    module: String,
    table: Option<B::Table>,
    callbacks: HashMap<LifecycleHook, B::Callback>,
}

impl<B: ScriptBridge> ScriptWindow<B> {
    /// Bind a window to a script module
    pub fn bind(bridge: Rc<B>, module: &str) -> Result<Self, ScriptError> {
        let table = bridge
            .lookup_table(module)
            .ok_or_else(|| ScriptError::ModuleNotFound(module.to_string()))?;

        let mut callbacks = HashMap::new();
        for hook in LifecycleHook::ALL {
            match bridge.lookup_callback(&table, hook) {
                Some(callback) => {
                    callbacks.insert(hook, callback);
                }
                None => log::warn!("Script module '{}' has no {} callback", module, hook.function_name()),
            }
        }

        Ok(Self {
            bridge,
            module: module.to_string(),
            table: Some(table),
            callbacks,
        })
    }

    /// Bind a window, falling back to an inert window if the module is missing
    pub fn bind_or_inert(bridge: Rc<B>, module: &str) -> Self {
        match Self::bind(Rc::clone(&bridge), module) {
            Ok(window) => window,
            Err(err) => {
                log::error!("Cannot bind script window: {err}");
                Self {
                    bridge,
                    module: module.to_string(),
                    table: None,
                    callbacks: HashMap::new(),
                }
            }
        }
    }

    /// Factory producing a freshly bound window per instantiation
    pub fn factory(bridge: Rc<B>, module: impl Into<String>) -> WindowFactory
    where
        B: 'static,
        B::Table: 'static,
        B::Callback: 'static,
    {
        let module = module.into();
        Box::new(move || -> Box<dyn Window> { Box::new(Self::bind_or_inert(Rc::clone(&bridge), &module)) })
    }

    /// Script module name
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Whether a callback is bound for `hook`
    pub fn has_hook(&self, hook: LifecycleHook) -> bool {
        self.callbacks.contains_key(&hook)
    }

    /// Whether the window still holds its script table
    pub fn is_bound(&self) -> bool {
        self.table.is_some()
    }

    fn call(&self, hook: LifecycleHook, args: ScriptArgs<'_>) {
        let (Some(table), Some(callback)) = (self.table.as_ref(), self.callbacks.get(&hook)) else {
            return;
        };
        if let Err(err) = self.bridge.invoke(callback, table, args) {
            log::error!("Script window '{}' failed in {}: {}", self.module, hook.function_name(), err);
        }
    }

    fn release(&mut self) {
        let callbacks: Vec<B::Callback> = self.callbacks.drain().map(|(_, callback)| callback).collect();
        if let Some(table) = self.table.take() {
            self.bridge.release(table, callbacks);
        }
    }
}

impl<B: ScriptBridge> Window for ScriptWindow<B> {
    fn on_create(&mut self, handle: UiHandle) {
        self.call(LifecycleHook::Create, ScriptArgs::Create(handle));
    }

    fn on_enable(&mut self) {
        self.call(LifecycleHook::Enable, ScriptArgs::None);
    }

    fn on_update(&mut self, delta_time: f32) {
        self.call(LifecycleHook::Update, ScriptArgs::Update(delta_time));
    }

    fn on_disable(&mut self) {
        self.call(LifecycleHook::Disable, ScriptArgs::None);
    }

    fn on_destroy(&mut self) {
        self.call(LifecycleHook::Destroy, ScriptArgs::None);
        self.release();
    }

    fn handle_message(&mut self, message: &WindowMessage) {
        self.call(LifecycleHook::HandleMessage, ScriptArgs::Message(message));
    }

    fn wants_update(&self) -> bool {
        self.has_hook(LifecycleHook::Update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// In-memory runtime: a module is a set of implemented hooks
    #[derive(Default)]
    struct FakeBridge {
        modules: HashMap<String, HashSet<LifecycleHook>>,
        failing: HashSet<LifecycleHook>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeBridge {
        fn with_module(mut self, module: &str, hooks: &[LifecycleHook]) -> Self {
            self.modules.insert(module.to_string(), hooks.iter().copied().collect());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl ScriptBridge for FakeBridge {
        type Table = String;
        type Callback = LifecycleHook;

        fn lookup_table(&self, module: &str) -> Option<String> {
            self.modules.contains_key(module).then(|| module.to_string())
        }

        fn lookup_callback(&self, table: &String, hook: LifecycleHook) -> Option<LifecycleHook> {
            self.modules[table].contains(&hook).then_some(hook)
        }

        fn invoke(&self, callback: &LifecycleHook, table: &String, args: ScriptArgs<'_>) -> Result<(), ScriptError> {
            if self.failing.contains(callback) {
                return Err(ScriptError::Runtime("boom".to_string()));
            }
            let suffix = match args {
                ScriptArgs::None => String::new(),
                ScriptArgs::Create(handle) => format!("({})", handle.0),
                ScriptArgs::Update(delta) => format!("({delta})"),
                ScriptArgs::Message(message) => format!("({})", message.id),
            };
            self.calls
                .borrow_mut()
                .push(format!("{}.{}{}", table, callback.function_name(), suffix));
            Ok(())
        }

        fn release(&self, table: String, callbacks: Vec<LifecycleHook>) {
            self.calls
                .borrow_mut()
                .push(format!("release {} ({} callbacks)", table, callbacks.len()));
        }
    }

    #[test]
    fn test_hooks_forward_to_script() {
        let bridge = Rc::new(FakeBridge::default().with_module("Hud", &LifecycleHook::ALL));
        let mut window = ScriptWindow::bind(Rc::clone(&bridge), "Hud").unwrap();

        assert!(window.wants_update());
        window.on_create(UiHandle(9));
        window.on_enable();
        window.on_update(0.5);
        window.handle_message(&WindowMessage::new(3));
        window.on_disable();
        window.on_destroy();

        assert_eq!(
            bridge.calls(),
            vec![
                "Hud.on_create(9)",
                "Hud.on_enable",
                "Hud.on_update(0.5)",
                "Hud.handle_message(3)",
                "Hud.on_disable",
                "Hud.on_destroy",
                "release Hud (6 callbacks)",
            ]
        );
        assert!(!window.is_bound());
    }

    #[test]
    fn test_missing_callbacks_are_tolerated() {
        let bridge = Rc::new(FakeBridge::default().with_module("Dialog", &[LifecycleHook::Enable]));
        let mut window = ScriptWindow::bind(Rc::clone(&bridge), "Dialog").unwrap();

        assert!(!window.wants_update());
        assert!(window.has_hook(LifecycleHook::Enable));
        assert!(!window.has_hook(LifecycleHook::Disable));

        window.on_enable();
        window.on_disable();
        window.on_update(0.1);

        assert_eq!(bridge.calls(), vec!["Dialog.on_enable"]);
    }

    #[test]
    fn test_unknown_module() {
        let bridge = Rc::new(FakeBridge::default());

        assert!(matches!(
            ScriptWindow::bind(Rc::clone(&bridge), "Missing"),
            Err(ScriptError::ModuleNotFound(_))
        ));

        let mut window = ScriptWindow::bind_or_inert(Rc::clone(&bridge), "Missing");
        assert!(!window.is_bound());
        window.on_enable();
        window.on_destroy();
        assert!(bridge.calls().is_empty());
    }

    #[test]
    fn test_callback_errors_are_contained() {
        let mut bridge = FakeBridge::default().with_module("Shop", &LifecycleHook::ALL);
        bridge.failing.insert(LifecycleHook::Enable);
        let bridge = Rc::new(bridge);
        let mut window = ScriptWindow::bind(Rc::clone(&bridge), "Shop").unwrap();

        window.on_enable();
        window.on_disable();

        assert_eq!(bridge.calls(), vec!["Shop.on_disable"]);
    }

    #[test]
    fn test_factory_binds_fresh_windows() {
        let bridge = Rc::new(FakeBridge::default().with_module("Hud", &[LifecycleHook::Create]));
        let factory = ScriptWindow::factory(Rc::clone(&bridge), "Hud");

        let mut first = factory();
        let mut second = factory();
        first.on_create(UiHandle(1));
        second.on_create(UiHandle(2));

        assert_eq!(bridge.calls(), vec!["Hud.on_create(1)", "Hud.on_create(2)"]);
    }
}
