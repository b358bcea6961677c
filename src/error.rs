// Errors surfaced to the host page. A missing 2d context is not one of them,
// the field just never starts drawing in that case.

use std::fmt;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    // no global window, e.g. when loaded inside a worker
    NoWindow,
    // options object from JS could not be deserialized
    InvalidOptions(String),
    // deserialized, but describes an unusable field
    InvalidConfig(&'static str),
    // a DOM call threw
    Js(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::NoWindow => write!(f, "no global window available"),
            FieldError::InvalidOptions(msg) => write!(f, "invalid particle field options: {}", msg),
            FieldError::InvalidConfig(what) => write!(f, "invalid particle field config: {}", what),
            FieldError::Js(msg) => write!(f, "DOM call failed: {}", msg),
        }
    }
}

impl std::error::Error for FieldError {}

impl From<JsValue> for FieldError {
    fn from(value: JsValue) -> Self {
        FieldError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<serde_wasm_bindgen::Error> for FieldError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        FieldError::InvalidOptions(e.to_string())
    }
}

impl From<FieldError> for JsValue {
    fn from(e: FieldError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            FieldError::InvalidConfig("link_falloff must be positive").to_string(),
            "invalid particle field config: link_falloff must be positive"
        );
        assert_eq!(FieldError::NoWindow.to_string(), "no global window available");
    }
}
