//! Lua script bridge
//!
//! Window modules are plain Lua tables. A module is looked up in
//! `package.loaded` first, so `require`d modules work, then in the globals.
//!
//! ```lua
//! Inventory = {}
//! function Inventory:on_enable() self.visible = true end
//! function Inventory:handle_message(id, args) self.last = id end
//! ```

use super::message::{MessageArg, WindowMessage};
use super::script::{LifecycleHook, ScriptArgs, ScriptBridge, ScriptError};
use mlua::{Function, Lua, RegistryKey, Table, Value};

fn runtime_error(err: mlua::Error) -> ScriptError {
    ScriptError::Runtime(err.to_string())
}

/// [`ScriptBridge`] over an `mlua` runtime
pub struct LuaBridge {
    lua: Lua,
}

impl LuaBridge {
    /// Wrap a Lua runtime
    pub fn new(lua: Lua) -> Self {
        Self { lua }
    }

    /// Underlying runtime, e.g. to load window modules
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    fn find_table(&self, module: &str) -> mlua::Result<Option<RegistryKey>> {
        let globals = self.lua.globals();

        if let Value::Table(package) = globals.get::<Value>("package")? {
            if let Value::Table(loaded) = package.get::<Value>("loaded")? {
                if let Value::Table(table) = loaded.get::<Value>(module)? {
                    return self.lua.create_registry_value(table).map(Some);
                }
            }
        }

        match globals.get::<Value>(module)? {
            Value::Table(table) => self.lua.create_registry_value(table).map(Some),
            _ => Ok(None),
        }
    }

    fn find_callback(&self, table: &RegistryKey, hook: LifecycleHook) -> mlua::Result<Option<RegistryKey>> {
        let table: Table = self.lua.registry_value(table)?;
        match table.get::<Value>(hook.function_name())? {
            Value::Function(function) => self.lua.create_registry_value(function).map(Some),
            _ => Ok(None),
        }
    }

    fn message_args(&self, message: &WindowMessage) -> mlua::Result<Table> {
        let args = self.lua.create_table()?;
        for (key, value) in message.args() {
            match value {
                MessageArg::Int(value) => args.set(key, *value)?,
                MessageArg::Float(value) => args.set(key, *value)?,
                MessageArg::Bool(value) => args.set(key, *value)?,
                MessageArg::Text(value) => args.set(key, value.as_str())?,
            }
        }
        Ok(args)
    }
}

impl ScriptBridge for LuaBridge {
    type Table = RegistryKey;
    type Callback = RegistryKey;

    fn lookup_table(&self, module: &str) -> Option<RegistryKey> {
        self.find_table(module).unwrap_or_else(|err| {
            log::error!("Lua lookup of module '{module}' failed: {err}");
            None
        })
    }

    fn lookup_callback(&self, table: &RegistryKey, hook: LifecycleHook) -> Option<RegistryKey> {
        self.find_callback(table, hook).unwrap_or_else(|err| {
            log::error!("Lua lookup of {} failed: {}", hook.function_name(), err);
            None
        })
    }

    fn invoke(&self, callback: &RegistryKey, table: &RegistryKey, args: ScriptArgs<'_>) -> Result<(), ScriptError> {
        let function: Function = self.lua.registry_value(callback).map_err(runtime_error)?;
        let table: Table = self.lua.registry_value(table).map_err(runtime_error)?;

        let result = match args {
            ScriptArgs::None => function.call::<()>(table),
            ScriptArgs::Create(handle) => function.call::<()>((table, handle.0)),
            ScriptArgs::Update(delta_time) => function.call::<()>((table, delta_time)),
            ScriptArgs::Message(message) => {
                let payload = self.message_args(message).map_err(runtime_error)?;
                function.call::<()>((table, message.id, payload))
            }
        };
        result.map_err(runtime_error)
    }

    fn release(&self, table: RegistryKey, callbacks: Vec<RegistryKey>) {
        for key in std::iter::once(table).chain(callbacks) {
            if let Err(err) = self.lua.remove_registry_value(key) {
                log::warn!("Failed to release Lua registry value: {err}");
            }
        }
    }
}
