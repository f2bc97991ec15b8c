//! Root component and the runtime shared by the frame loop and controls.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use pinchcard_core::{AppConfig, Session};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlVideoElement;
use yew::prelude::*;

use crate::camera;
use crate::components::{FadeOverlay, HandCursor, MouseCursor, NoticeBanner, SceneView};
use crate::config;
use crate::content::{ButtonAction, SCENES};
use crate::detector::HandDetector;
use crate::dom;
use crate::error::{ClientError, describe};
use crate::hooks::{FrameLoopConfig, use_frame_loop};
use crate::layout::DomLayout;
use crate::presenter::{AudioInbox, AudioSignal, Presenter, Sounds};
use crate::view_state::{ViewAction, ViewState};

const CAMERA_UNAVAILABLE: &str =
    "The webcam is unavailable. Check the camera permission and reload the page.";
const DETECTOR_UNAVAILABLE: &str =
    "Hand tracking failed to load. Check your connection and reload the page.";

/// State that outlives renders: the session and the devices feeding it.
pub struct Runtime {
    pub config: AppConfig,
    pub session: RefCell<Session>,
    /// Empty until the model has loaded; the session sees no hand meanwhile.
    pub detector: RefCell<Option<HandDetector>>,
    audio: Rc<AudioInbox>,
    started: Cell<bool>,
}

impl Runtime {
    pub fn new(config: AppConfig, view: UseReducerDispatcher<ViewState>, sounds: Sounds) -> Self {
        let audio = Rc::new(AudioInbox::default());
        let mut session = Session::new(&config);
        let mut presenter = Presenter::new(config.timings, view, sounds, Rc::clone(&audio));
        session.subscribe(move |event| presenter.apply(event));

        tracing::info!(steps = config.storyline.len(), "pinchcard ready");
        Self {
            config,
            session: RefCell::new(session),
            detector: RefCell::new(None),
            audio,
            started: Cell::new(false),
        }
    }

    /// Hands queued playback outcomes to the session.
    pub fn drain_audio(&self, now_ms: f64) {
        let signals = self.audio.take();
        if signals.is_empty() {
            return;
        }
        let mut session = self.session.borrow_mut();
        for signal in signals {
            match signal {
                AudioSignal::VoicemailEnded => session.voicemail_ended(now_ms),
                AudioSignal::VoicemailFailed => session.voicemail_failed(now_ms),
            }
        }
    }

    /// The start button advances the story and, the first time, brings up
    /// the detector and camera.
    fn start(self: &Rc<Self>, video: &NodeRef, view: &UseReducerDispatcher<ViewState>) {
        self.session.borrow_mut().trigger_next(dom::now_ms());
        if self.started.replace(true) {
            return;
        }

        let runtime = Rc::clone(self);
        let video = video.cast::<HtmlVideoElement>();
        let view = view.clone();
        spawn_local(async move {
            view.dispatch(ViewAction::Notice(None));
            let result = match video {
                Some(video) => runtime.initialize(video).await,
                None => Err(ClientError::MissingElement("input-video".to_string())),
            };
            if let Err(e) = result {
                tracing::error!(error = %e, "Startup failed");
                let text = match e {
                    ClientError::Detector(_) => DETECTOR_UNAVAILABLE,
                    _ => CAMERA_UNAVAILABLE,
                };
                view.dispatch(ViewAction::Notice(Some(text)));
            }
        });
    }

    async fn initialize(&self, video: HtmlVideoElement) -> Result<(), ClientError> {
        let detector = HandDetector::create(&self.config.detector, video.clone()).await?;
        *self.detector.borrow_mut() = Some(detector);
        camera::attach(&video, &self.config.camera).await?;

        let target = video.clone();
        EventListener::once(&target, "loadeddata", move |_| match video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    tracing::warn!(error = %describe(&e), "Video playback failed");
                }
            }),
            Err(e) => tracing::warn!(error = %describe(&e), "Video playback failed"),
        })
        .forget();
        Ok(())
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(ViewState::default);
    let video_ref = use_node_ref();
    let cursor_ref = use_node_ref();
    let sounds = Sounds {
        vibration: use_node_ref(),
        voicemail: use_node_ref(),
    };
    let layout = use_memo((), |_| DomLayout::new(&SCENES));

    let runtime = {
        let view = state.dispatcher();
        let sounds = sounds.clone();
        use_memo((), move |_| Rc::new(Runtime::new(config::load(), view, sounds)))
    };

    use_frame_loop(FrameLoopConfig {
        runtime: (*runtime).clone(),
        layout: layout.clone(),
        video: video_ref.clone(),
        cursor: cursor_ref.clone(),
    });

    let on_button = {
        let runtime = (*runtime).clone();
        let video = video_ref.clone();
        let view = state.dispatcher();
        Callback::from(move |action: ButtonAction| {
            let now = dom::now_ms();
            match action {
                ButtonAction::Start => runtime.start(&video, &view),
                ButtonAction::Next => {
                    runtime.session.borrow_mut().trigger_next(now);
                }
                ButtonAction::Restart => {
                    runtime.session.borrow_mut().restart(now);
                }
            }
        })
    };

    html! {
        <>
            <video id="input-video" ref={video_ref} autoplay=true playsinline=true muted=true />
            <HandCursor node={cursor_ref} position={state.cursor} pinching={state.pinching} />
            <MouseCursor />
            <FadeOverlay active={state.fading} />
            <NoticeBanner text={state.notice} />
            <audio id="vibration-sound" ref={sounds.vibration} src="assets/vibration.mp3" preload="auto" />
            <audio id="voicemail-sound" ref={sounds.voicemail} src="assets/voicemail.mp3" preload="auto" />
            { for SCENES.iter().map(|content| html! {
                <SceneView
                    key={content.scene.name()}
                    content={content}
                    state={state.clone()}
                    layout={layout.clone()}
                    on_button={on_button.clone()}
                />
            }) }
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn runtime_with(audio: &Rc<AudioInbox>) -> Runtime {
        let config = AppConfig::default();
        Runtime {
            session: RefCell::new(Session::new(&config)),
            config,
            detector: RefCell::new(None),
            audio: Rc::clone(audio),
            started: Cell::new(false),
        }
    }

    #[wasm_bindgen_test]
    fn test_drain_audio_empties_inbox() {
        let audio = Rc::new(AudioInbox::default());
        audio.push(AudioSignal::VoicemailFailed);
        audio.push(AudioSignal::VoicemailEnded);

        let runtime = runtime_with(&audio);
        runtime.drain_audio(0.0);

        assert!(audio.take().is_empty());
        // No intro was running, so nothing changed.
        assert!(!runtime.session.borrow().intro().is_running());
    }

    #[wasm_bindgen_test]
    fn test_audio_signal_during_ring_is_ignored() {
        let audio = Rc::new(AudioInbox::default());
        let runtime = runtime_with(&audio);
        {
            let mut session = runtime.session.borrow_mut();
            session.trigger_next(0.0);
            session.trigger_next(0.0);
        }
        assert!(runtime.session.borrow().intro().is_running());

        audio.push(AudioSignal::VoicemailEnded);
        runtime.drain_audio(100.0);
        assert!(runtime.session.borrow().intro().is_running());
    }
}
