//! Window messages
//!
//! Messages carry an integer id plus key-value arguments, so senders and
//! receivers never depend on argument order.

use std::collections::HashMap;

/// Variant for type-safe message arguments
#[derive(Debug, Clone, PartialEq)]
pub enum MessageArg {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean flag
    Bool(bool),
    /// Text value
    Text(String),
}

/// Message with id and key-value arguments
#[derive(Debug, Clone, PartialEq)]
pub struct WindowMessage {
    /// Message identifier, meaning is defined by the game
    pub id: u32,
    args: HashMap<&'static str, MessageArg>,
}

impl WindowMessage {
    /// Create a message without arguments
    pub fn new(id: u32) -> Self {
        Self {
            id,
            args: HashMap::new(),
        }
    }

    /// Add an argument to the message (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: MessageArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&MessageArg> {
        self.args.get(key)
    }

    /// Iterate over all arguments
    pub fn args(&self) -> impl Iterator<Item = (&'static str, &MessageArg)> {
        self.args.iter().map(|(key, value)| (*key, value))
    }

    /// Get an integer argument if present
    pub fn get_int(&self, key: &str) -> Option<i64> {
        if let Some(MessageArg::Int(value)) = self.get_arg(key) {
            Some(*value)
        } else {
            None
        }
    }

    /// Get a float argument if present
    pub fn get_float(&self, key: &str) -> Option<f64> {
        if let Some(MessageArg::Float(value)) = self.get_arg(key) {
            Some(*value)
        } else {
            None
        }
    }

    /// Get a boolean argument if present
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        if let Some(MessageArg::Bool(value)) = self.get_arg(key) {
            Some(*value)
        } else {
            None
        }
    }

    /// Get a text argument if present
    pub fn get_text(&self, key: &str) -> Option<&str> {
        if let Some(MessageArg::Text(value)) = self.get_arg(key) {
            Some(value.as_str())
        } else {
            None
        }
    }
}
