//! Webcam access.

use pinchcard_core::CameraConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints};

use crate::dom;
use crate::error::{ClientError, describe};

/// Requests the camera and attaches the stream to `video`.
///
/// Not retried: a denied permission stays denied until the page reloads.
pub async fn attach(video: &HtmlVideoElement, config: &CameraConfig) -> Result<(), ClientError> {
    let devices = dom::window()?
        .navigator()
        .media_devices()
        .map_err(|e| ClientError::Camera(describe(&e)))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&serde_wasm_bindgen::to_value(config)?);

    let request = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| ClientError::Camera(describe(&e)))?;
    let stream: MediaStream = JsFuture::from(request)
        .await
        .map_err(|e| ClientError::Camera(describe(&e)))?
        .dyn_into()
        .map_err(|_| ClientError::Camera("getUserMedia returned a non-stream".to_string()))?;

    video.set_src_object(Some(&stream));
    tracing::info!(width = config.width, height = config.height, "Camera attached");
    Ok(())
}
