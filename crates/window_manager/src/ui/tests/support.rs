//! Recording test doubles

use crate::config::WindowManagerConfig;
use crate::ui::{
    BackendError, UiHandle, Window, WindowBackend, WindowDescriptor, WindowManager, WindowMessage,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub type EventLog = Rc<RefCell<Vec<String>>>;

/// Backend that records every call
pub struct RecordingBackend {
    log: EventLog,
    next_handle: u64,
    names: HashMap<UiHandle, String>,
    /// Close animation length per window name
    pub animations: HashMap<String, f32>,
    /// Windows whose instantiation fails
    pub failing: HashSet<String>,
}

impl RecordingBackend {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            next_handle: 1,
            names: HashMap::new(),
            animations: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    fn record(&self, call: &str, handle: UiHandle) {
        let name = self.names.get(&handle).map_or("?", String::as_str);
        self.log.borrow_mut().push(format!("backend.{call} {name}"));
    }

    /// Number of live UI objects
    pub fn live_objects(&self) -> usize {
        self.names.len()
    }
}

impl WindowBackend for RecordingBackend {
    fn instantiate(&mut self, name: &str, _dependencies: &[String]) -> Result<UiHandle, BackendError> {
        if self.failing.contains(name) {
            return Err(BackendError::InstantiationFailed(name.to_string()));
        }
        let handle = UiHandle(self.next_handle);
        self.next_handle += 1;
        self.names.insert(handle, name.to_string());
        self.record("instantiate", handle);
        Ok(handle)
    }

    fn destroy(&mut self, handle: UiHandle, name: &str, _dependencies: &[String]) {
        assert_eq!(self.names.get(&handle).map(String::as_str), Some(name));
        self.record("destroy", handle);
        self.names.remove(&handle);
    }

    fn activate(&mut self, handle: UiHandle) {
        self.record("activate", handle);
    }

    fn deactivate(&mut self, handle: UiHandle) {
        self.record("deactivate", handle);
    }

    fn add_to_layer(&mut self, handle: UiHandle, layer: i32) {
        self.record(&format!("layer({layer})"), handle);
    }

    fn play_close_animation(&mut self, name: &str, handle: UiHandle) -> f32 {
        self.record("animate", handle);
        self.animations.get(name).copied().unwrap_or(-1.0)
    }
}

/// Window that records its hooks
pub struct ProbeWindow {
    name: String,
    log: EventLog,
    updatable: bool,
}

impl ProbeWindow {
    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}.{}", self.name, hook));
    }
}

impl Window for ProbeWindow {
    fn on_create(&mut self, _handle: UiHandle) {
        self.record("create");
    }

    fn on_enable(&mut self) {
        self.record("enable");
    }

    fn on_update(&mut self, _delta_time: f32) {
        self.record("update");
    }

    fn on_disable(&mut self) {
        self.record("disable");
    }

    fn on_destroy(&mut self) {
        self.record("destroy");
    }

    fn handle_message(&mut self, message: &WindowMessage) {
        self.record(&format!("message({})", message.id));
    }

    fn wants_update(&self) -> bool {
        self.updatable
    }
}

/// Manager plus the log shared by its backend and windows
pub struct Harness {
    pub manager: WindowManager<RecordingBackend>,
    pub log: EventLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(WindowManagerConfig::default())
    }

    pub fn with_config(config: WindowManagerConfig) -> Self {
        crate::foundation::logging::init_for_tests();
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        let manager = WindowManager::with_config(RecordingBackend::new(Rc::clone(&log)), config);
        Self { manager, log }
    }

    fn register(&mut self, name: &str, background: bool, updatable: bool) {
        let log = Rc::clone(&self.log);
        let window_name = name.to_string();
        let mut descriptor = WindowDescriptor::new(name, move || -> Box<dyn Window> {
            Box::new(ProbeWindow {
                name: window_name.clone(),
                log: Rc::clone(&log),
                updatable,
            })
        });
        if background {
            descriptor = descriptor.background();
        }
        self.manager.register_window(descriptor).unwrap();
    }

    /// Register a background window
    pub fn background(&mut self, name: &str) -> &mut Self {
        self.register(name, true, false);
        self
    }

    /// Register a foreground window
    pub fn foreground(&mut self, name: &str) -> &mut Self {
        self.register(name, false, false);
        self
    }

    /// Register a foreground window with an update hook
    pub fn ticking(&mut self, name: &str) -> &mut Self {
        self.register(name, false, true);
        self
    }

    /// Give a window a close animation
    pub fn animate(&mut self, name: &str, seconds: f32) -> &mut Self {
        self.manager
            .backend_mut()
            .animations
            .insert(name.to_string(), seconds);
        self
    }

    /// Number of log entries equal to `entry`
    pub fn count(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|line| *line == entry).count()
    }

    /// Log entries mentioning `name`, in order
    pub fn history(&self, name: &str) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter(|line| {
                line.split(|c: char| c == '.' || c == ' ')
                    .any(|part| part == name)
            })
            .cloned()
            .collect()
    }

    /// Forget everything logged so far
    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }
}
