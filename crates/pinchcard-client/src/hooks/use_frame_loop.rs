//! Per-frame session tick driven by `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use pinchcard_core::{FrameReport, TickOutcome};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use yew::prelude::*;

use crate::app::Runtime;
use crate::dom::{self, VideoSource};
use crate::layout::DomLayout;

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything one frame reads.
#[derive(Clone)]
pub struct FrameLoopConfig {
    pub runtime: Rc<Runtime>,
    pub layout: Rc<DomLayout>,
    /// The webcam `<video>`. Frames are skipped until it plays.
    pub video: NodeRef,
    /// The drawn hand cursor, measured to size the hit-test circle.
    pub cursor: NodeRef,
}

impl FrameLoopConfig {
    fn tick(&self) -> TickOutcome {
        let now = dom::now_ms();
        self.runtime.drain_audio(now);

        let rendered_width = self
            .cursor
            .cast::<Element>()
            .and_then(|cursor| dom::content_width(&cursor));
        let shape = self.runtime.config.interaction.cursor_shape(rendered_width);

        let mut session = self.runtime.session.borrow_mut();
        session.set_cursor_shape(shape);
        let mut detector = self.runtime.detector.borrow_mut();
        session.tick(
            now,
            &VideoSource::from_ref(&self.video),
            &mut *detector,
            &*self.layout,
            dom::viewport(),
        )
    }
}

fn request_frame(closure: &FrameClosure) -> Option<i32> {
    let window = web_sys::window()?;
    let closure = closure.borrow();
    window
        .request_animation_frame(closure.as_ref()?.as_ref().unchecked_ref())
        .ok()
}

/// Runs the session once per animation frame for the component's lifetime.
///
/// The loop starts on mount, before the camera or detector exist: the intro
/// clock must advance on every frame, and frame processing waits on the
/// video by itself.
#[hook]
pub fn use_frame_loop(config: FrameLoopConfig) {
    let animation_frame_id = use_mut_ref(|| None::<i32>);

    use_effect_with((), move |_| {
        let closure: FrameClosure = Rc::new(RefCell::new(None));
        let closure_for_loop = closure.clone();
        let frame_id_for_loop = animation_frame_id.clone();

        *closure.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
            *frame_id_for_loop.borrow_mut() = request_frame(&closure_for_loop);
            if let TickOutcome::Processed(FrameReport {
                click: Some(click), ..
            }) = config.tick()
            {
                tracing::debug!(?click, "Pinch click");
            }
        }));
        *animation_frame_id.borrow_mut() = request_frame(&closure);

        move || {
            if let Some(id) = animation_frame_id.borrow_mut().take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            // Break the reference cycle by clearing the closure
            *closure.borrow_mut() = None;
        }
    });
}
