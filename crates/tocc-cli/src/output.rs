//! Output formatting

use serde_json::{Map, Value};

/// Output builder for formatted CLI output
///
/// In JSON mode the fields are printed as one object, otherwise only the
/// message is printed.
pub struct Output {
    json_mode: bool,
    fields: Map<String, Value>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Add every field of a JSON object; other values are stored under `value`
    pub fn merge(mut self, value: Value) -> Self {
        match value {
            Value::Object(map) => self.fields.extend(map),
            other => {
                self.fields.insert("value".to_string(), other);
            }
        }
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Text that [`print`](Self::print) writes, if any
    pub fn render(&self) -> Option<String> {
        if self.json_mode {
            let json = Value::Object(self.fields.clone());
            Some(serde_json::to_string_pretty(&json).unwrap_or_default())
        } else {
            self.message.clone()
        }
    }

    /// Fields collected so far, as one JSON object
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Print the output
    pub fn print(self) {
        if let Some(text) = self.render() {
            println!("{}", text);
        }
    }
}
