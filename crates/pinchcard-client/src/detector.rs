//! Hand landmark detector backed by the MediaPipe JS module.

use pinchcard_core::{DetectionResult, DetectorConfig, DetectorError, LandmarkDetector, LandmarkSet};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::error::{ClientError, describe};

#[wasm_bindgen(module = "/js/hand_landmarker.js")]
extern "C" {
    #[wasm_bindgen(js_name = createHandLandmarker)]
    fn create_hand_landmarker(options: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_name = detectHand, catch)]
    fn detect_hand(
        landmarker: &JsValue,
        video: &HtmlVideoElement,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue>;
}

/// Runs the detector on the webcam video, one frame per call.
pub struct HandDetector {
    landmarker: JsValue,
    video: HtmlVideoElement,
}

impl HandDetector {
    /// Loads the wasm fileset and model. Slow; awaited once at startup.
    pub async fn create(
        config: &DetectorConfig,
        video: HtmlVideoElement,
    ) -> Result<Self, ClientError> {
        let options = serde_wasm_bindgen::to_value(config)?;
        let landmarker = JsFuture::from(create_hand_landmarker(&options))
            .await
            .map_err(|e| ClientError::Detector(describe(&e)))?;
        tracing::info!(delegate = ?config.delegate, "Hand detector ready");
        Ok(Self { landmarker, video })
    }
}

impl LandmarkDetector for HandDetector {
    fn detect(&mut self, timestamp_ms: f64) -> Result<Option<LandmarkSet>, DetectorError> {
        let output = detect_hand(&self.landmarker, &self.video, timestamp_ms)
            .map_err(|e| DetectorError::Inference(describe(&e)))?;
        let result: DetectionResult = serde_wasm_bindgen::from_value(output)
            .map_err(|e| DetectorError::Output(e.to_string()))?;
        Ok(result.first_hand()?)
    }
}
