//! Turns interaction events into view updates and sound.
//!
//! Delays only gate what the user sees; the session has already moved on
//! by the time a fade starts.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use pinchcard_core::{InteractionEvent, IntroCue, SceneId, Timings, TransitionCause};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlMediaElement;
use yew::{NodeRef, UseReducerDispatcher};

use crate::error::describe;
use crate::view_state::{ViewAction, ViewState};

/// Playback outcomes reported back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSignal {
    VoicemailEnded,
    VoicemailFailed,
}

/// Audio signals queued by media callbacks and drained by the frame loop.
///
/// Callbacks never borrow the session directly: presenters run inside
/// `Session::tick`, which already holds it.
#[derive(Debug, Default)]
pub struct AudioInbox(RefCell<VecDeque<AudioSignal>>);

impl AudioInbox {
    pub fn push(&self, signal: AudioSignal) {
        self.0.borrow_mut().push_back(signal);
    }

    pub fn take(&self) -> Vec<AudioSignal> {
        self.0.borrow_mut().drain(..).collect()
    }
}

/// Refs of the page's `<audio>` elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sounds {
    pub vibration: NodeRef,
    pub voicemail: NodeRef,
}

pub struct Presenter {
    timings: Timings,
    view: UseReducerDispatcher<ViewState>,
    sounds: Sounds,
    audio: Rc<AudioInbox>,
    voicemail_listeners: Vec<EventListener>,
}

impl Presenter {
    pub fn new(
        timings: Timings,
        view: UseReducerDispatcher<ViewState>,
        sounds: Sounds,
        audio: Rc<AudioInbox>,
    ) -> Self {
        Self {
            timings,
            view,
            sounds,
            audio,
            voicemail_listeners: Vec::new(),
        }
    }

    pub fn apply(&mut self, event: &InteractionEvent) {
        self.view.dispatch(ViewAction::Interaction(event.clone()));
        match event {
            InteractionEvent::SceneChanged { to, cause, .. } => {
                if *cause == TransitionCause::Restart {
                    self.stop_voicemail();
                }
                self.switch_scene(*to, *cause);
            }
            InteractionEvent::IntroCue(cue) => self.play_cue(*cue),
            _ => {}
        }
    }

    /// Fade out, swap the shown scene, fade back in.
    fn switch_scene(&self, to: SceneId, cause: TransitionCause) {
        let delay = if cause == TransitionCause::Click {
            self.timings.click_advance_delay_ms
        } else {
            0
        };
        let fade = self.timings.fade_ms;
        let ending_delay = self.timings.ending_title_delay_ms;
        let view = self.view.clone();

        Timeout::new(delay, move || {
            view.dispatch(ViewAction::FadeOut);
            Timeout::new(fade, move || {
                view.dispatch(ViewAction::Show(to));
                if to == SceneId::End {
                    let view = view.clone();
                    Timeout::new(ending_delay, move || view.dispatch(ViewAction::ShowEndingTitle))
                        .forget();
                }
                Timeout::new(fade, move || view.dispatch(ViewAction::FadeIn)).forget();
            })
            .forget();
        })
        .forget();
    }

    fn play_cue(&mut self, cue: IntroCue) {
        tracing::debug!(cue = cue.name(), "Intro cue");
        match cue {
            IntroCue::PlayVibration => play_sound(&self.sounds.vibration, "vibration"),
            IntroCue::PlayVoicemail => self.play_voicemail(),
            // A voicemail still playing at the timeout is cut off.
            IntroCue::HidePhone => self.stop_voicemail(),
            IntroCue::ShowPhone => {}
        }
    }

    fn stop_voicemail(&mut self) {
        self.voicemail_listeners.clear();
        if let Some(sound) = self.sounds.voicemail.cast::<HtmlMediaElement>() {
            let _ = sound.pause();
        }
    }

    fn play_voicemail(&mut self) {
        self.voicemail_listeners.clear();
        let Some(sound) = self.sounds.voicemail.cast::<HtmlMediaElement>() else {
            tracing::warn!("Voicemail audio element missing");
            self.audio.push(AudioSignal::VoicemailFailed);
            return;
        };

        for (event_type, signal) in [
            ("ended", AudioSignal::VoicemailEnded),
            ("error", AudioSignal::VoicemailFailed),
        ] {
            let inbox = Rc::clone(&self.audio);
            self.voicemail_listeners
                .push(EventListener::once(&sound, event_type, move |_| {
                    inbox.push(signal);
                }));
        }

        sound.set_current_time(0.0);
        let inbox = Rc::clone(&self.audio);
        match sound.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    tracing::warn!(error = %describe(&e), "Voicemail playback failed");
                    inbox.push(AudioSignal::VoicemailFailed);
                }
            }),
            Err(e) => {
                tracing::warn!(error = %describe(&e), "Voicemail playback failed");
                inbox.push(AudioSignal::VoicemailFailed);
            }
        }
    }
}

/// Fire-and-forget playback; failures are only logged.
fn play_sound(node: &NodeRef, name: &'static str) {
    let Some(sound) = node.cast::<HtmlMediaElement>() else {
        tracing::warn!(sound = name, "Audio element missing");
        return;
    };
    sound.set_current_time(0.0);
    match sound.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                tracing::warn!(sound = name, error = %describe(&e), "Playback failed");
            }
        }),
        Err(e) => tracing::warn!(sound = name, error = %describe(&e), "Playback failed"),
    }
}
