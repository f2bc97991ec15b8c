//! Startup errors of the browser shell.

use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("camera unavailable: {0}")]
    Camera(String),
    #[error("hand detector failed to load: {0}")]
    Detector(String),
    #[error("invalid detector options: {0}")]
    Options(#[from] serde_wasm_bindgen::Error),
}

/// Human-readable text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}
