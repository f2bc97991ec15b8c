//! Loads [`AppConfig`] from the page.

use pinchcard_core::AppConfig;
use web_sys::Element;

use crate::dom;

const CONFIG_ELEMENT_ID: &str = "pinchcard-config";

/// Reads `<script type="application/json" id="pinchcard-config">`.
///
/// A missing or blank element yields the defaults; invalid JSON is logged and
/// also falls back to the defaults.
pub fn load() -> AppConfig {
    let Some(json) = dom::find::<Element>(CONFIG_ELEMENT_ID).and_then(|e| e.text_content()) else {
        return AppConfig::default();
    };
    if json.trim().is_empty() {
        return AppConfig::default();
    }
    match AppConfig::from_json(&json) {
        Ok(config) => {
            tracing::debug!(steps = config.storyline.len(), "Loaded page config");
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid page config, using defaults");
            AppConfig::default()
        }
    }
}
