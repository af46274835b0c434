use serde_json::{Map, Value};

/// Element configuration: form field name to the value the user supplied
pub type Config = Map<String, Value>;

/// Typed lookups over a [`Config`]
pub trait ConfigExt {
    /// Field as a string slice, if it holds a string
    fn text(&self, field: &str) -> Option<&str>;

    /// Field is present and not `null`
    fn has(&self, field: &str) -> bool;

    /// Field holds a truthy value (see [`is_truthy`])
    fn is_filled(&self, field: &str) -> bool;

    /// Field rendered for a result message
    fn display(&self, field: &str) -> Option<String>;
}

impl ConfigExt for Config {
    fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    fn has(&self, field: &str) -> bool {
        self.get(field).map_or(false, |v| !v.is_null())
    }

    fn is_filled(&self, field: &str) -> bool {
        self.get(field).map_or(false, is_truthy)
    }

    fn display(&self, field: &str) -> Option<String> {
        self.get(field).filter(|v| !v.is_null()).map(display_value)
    }
}

/// Whether a form value counts as "supplied".
///
/// Empty strings, `false`, zero, empty collections and `null` do not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Render a value the way it appears inside a result message.
/// Strings are printed bare, everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
