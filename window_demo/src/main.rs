//! Window manager demo
//!
//! Drives a short scripted UI session against a console backend that logs
//! every engine call. Pass a `.toml` or `.ron` file to override the manager
//! configuration.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use window_manager::foundation::logging;
use window_manager::prelude::*;

const STEP: f32 = 1.0 / 60.0;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Backend that prints engine calls instead of building widgets
#[derive(Default)]
struct ConsoleBackend {
    next_handle: u64,
    live: HashMap<UiHandle, String>,
    close_animations: HashMap<&'static str, f32>,
}

impl WindowBackend for ConsoleBackend {
    fn instantiate(&mut self, name: &str, dependencies: &[String]) -> Result<UiHandle, BackendError> {
        if let Some(missing) = dependencies.iter().find(|dep| dep.is_empty()) {
            return Err(BackendError::MissingDependency(missing.clone()));
        }
        self.next_handle += 1;
        let handle = UiHandle(self.next_handle);
        self.live.insert(handle, name.to_string());
        log::info!("[engine] instantiate {name} as {handle:?} (deps: {dependencies:?})");
        Ok(handle)
    }

    fn destroy(&mut self, handle: UiHandle, name: &str, _dependencies: &[String]) {
        self.live.remove(&handle);
        log::info!("[engine] destroy {name} ({} objects left)", self.live.len());
    }

    fn activate(&mut self, handle: UiHandle) {
        log::info!("[engine] show {handle:?}");
    }

    fn deactivate(&mut self, handle: UiHandle) {
        log::info!("[engine] hide {handle:?}");
    }

    fn add_to_layer(&mut self, handle: UiHandle, layer: i32) {
        log::info!("[engine] {handle:?} -> layer {layer}");
    }

    fn play_close_animation(&mut self, name: &str, _handle: UiHandle) -> f32 {
        self.close_animations.get(name).copied().unwrap_or(0.0)
    }
}

/// Screen that just reports its hooks
struct Screen {
    name: &'static str,
    ticks: u32,
    ticking: bool,
}

impl Screen {
    fn factory(name: &'static str, ticking: bool) -> impl Fn() -> Box<dyn Window> + 'static {
        move || -> Box<dyn Window> { Box::new(Screen { name, ticks: 0, ticking }) }
    }
}

impl Window for Screen {
    fn on_create(&mut self, handle: UiHandle) {
        log::info!("{} created ({handle:?})", self.name);
    }

    fn on_enable(&mut self) {
        log::info!("{} enabled", self.name);
    }

    fn on_update(&mut self, _delta_time: f32) {
        self.ticks += 1;
    }

    fn on_disable(&mut self) {
        log::info!("{} disabled after {} ticks", self.name, self.ticks);
    }

    fn on_destroy(&mut self) {
        log::info!("{} destroyed", self.name);
    }

    fn handle_message(&mut self, message: &WindowMessage) {
        log::info!("{} got message {} (gold: {:?})", self.name, message.id, message.get_int("gold"));
    }

    fn wants_update(&self) -> bool {
        self.ticking
    }
}

fn load_config() -> Result<WindowManagerConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading window manager config from {path}");
            Ok(WindowManagerConfig::load_from_file(&path)?)
        }
        None => Ok(WindowManagerConfig::default()),
    }
}

/// Run the manager for `seconds` of fixed steps
fn run_frames(manager: &mut WindowManager<ConsoleBackend>, clock: &mut FrameClock, seconds: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds {
        std::thread::sleep(Duration::from_secs_f32(clock.step()));
        for _ in 0..clock.tick() {
            manager.update(clock.step());
            elapsed += clock.step();
        }
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let mut backend = ConsoleBackend::default();
    backend.close_animations.insert("Shop", 0.25);

    let mut manager = WindowManager::with_config(backend, config);
    manager.register_window(WindowDescriptor::new("MainMenu", Screen::factory("MainMenu", false)).background())?;
    manager.register_window(WindowDescriptor::new("Battle", Screen::factory("Battle", false)).background())?;
    manager.register_window(
        WindowDescriptor::new("Shop", Screen::factory("Shop", false)).with_dependencies(["shop_atlas"]),
    )?;
    manager.register_window(WindowDescriptor::new("Hud", Screen::factory("Hud", true)))?;

    let mut clock = FrameClock::new(STEP);

    manager.open_window("MainMenu", OpenOptions::on_layer(0))?;
    manager.open_window("Shop", OpenOptions::on_layer(2))?;
    log::info!("Stack: {:?}", manager.stack());

    manager.broadcast(&WindowMessage::new(1).with_arg("gold", MessageArg::Int(120)));

    // Entering battle suspends the menu group
    manager.open_window("Battle", OpenOptions::on_layer(0).close_others())?;
    manager.open_window("Hud", OpenOptions::on_layer(1))?;
    log::info!("Stack: {:?}", manager.stack());
    run_frames(&mut manager, &mut clock, 0.5);

    // Leaving battle restores the menu
    manager.close_window("Hud", CloseOptions::default())?;
    manager.close_window("Battle", CloseOptions::default())?;
    log::info!("Stack: {:?}", manager.stack());
    manager.open_window("Shop", OpenOptions::default())?;

    if manager.close_window("Shop", CloseOptions::default())? == Transition::Pending {
        log::info!("Shop is animating out");
        run_frames(&mut manager, &mut clock, 0.3);
    }

    manager.destroy_all();
    log::info!(
        "Done after {} steps, {} live UI objects",
        clock.total_steps(),
        manager.backend().live.len()
    );
    Ok(())
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        log::error!("Demo failed: {err}");
        std::process::exit(1);
    }
}
