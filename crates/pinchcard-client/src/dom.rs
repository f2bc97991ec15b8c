//! Page lookups and the webcam frame source.

use pinchcard_core::{FrameSource, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlVideoElement, Window};
use yew::NodeRef;

use crate::error::ClientError;

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

pub fn window() -> Result<Window, ClientError> {
    web_sys::window().ok_or(ClientError::Unavailable("window"))
}

/// Optional lookup for elements the page may leave out.
pub fn find<T: JsCast>(id: &str) -> Option<T> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<T>()
        .ok()
}

/// Milliseconds on the page's monotonic clock.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

#[allow(clippy::cast_possible_truncation)]
pub fn viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::new(0.0, 0.0);
    };
    let size = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(
        size(window.inner_width()) as f32,
        size(window.inner_height()) as f32,
    )
}

/// Computed CSS `width` of `element`, without border or padding.
pub fn content_width(element: &Element) -> Option<f32> {
    let style = web_sys::window()?.get_computed_style(element).ok()??;
    parse_px(&style.get_property_value("width").ok()?)
}

/// Parses a resolved CSS length such as `"40px"`.
pub fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// The webcam `<video>` as a frame source.
///
/// Inactive until the element is mounted and has decoded a frame.
#[derive(Debug, Clone)]
pub struct VideoSource {
    video: Option<HtmlVideoElement>,
}

impl VideoSource {
    pub fn from_ref(node: &NodeRef) -> Self {
        Self {
            video: node.cast::<HtmlVideoElement>(),
        }
    }
}

impl FrameSource for VideoSource {
    fn is_active(&self) -> bool {
        self.video
            .as_ref()
            .is_some_and(|video| video.ready_state() >= HAVE_CURRENT_DATA)
    }

    fn current_time(&self) -> f64 {
        self.video.as_ref().map_or(0.0, |video| video.current_time())
    }
}
