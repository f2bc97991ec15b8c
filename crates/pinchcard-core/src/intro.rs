//! Phone-call intro played on the revisited start scene.
//!
//! The sequence is clocked by the tick timestamp rather than real timers.
//! Completion never depends on the voicemail's "ended" signal alone: a hard
//! deadline and an error fallback both force it forward, and it finishes at
//! most once.

use crate::config::Timings;

/// Presentation requests issued by the intro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroCue {
    PlayVibration,
    ShowPhone,
    PlayVoicemail,
    HidePhone,
}

impl IntroCue {
    pub fn name(self) -> &'static str {
        match self {
            IntroCue::PlayVibration => "play-vibration",
            IntroCue::ShowPhone => "show-phone",
            IntroCue::PlayVoicemail => "play-voicemail",
            IntroCue::HidePhone => "hide-phone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Ringing { until: f64 },
    Voicemail { deadline: f64 },
    Closing { until: f64 },
    Done,
}

/// Output of one [`IntroSequence::poll`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntroProgress {
    pub cues: Vec<IntroCue>,
    /// True on the single poll where the intro completes.
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct IntroSequence {
    ring_ms: f64,
    voicemail_timeout_ms: f64,
    error_fallback_ms: f64,
    exit_ms: f64,
    phase: Phase,
}

impl Default for IntroSequence {
    fn default() -> Self {
        Self::new(&Timings::default())
    }
}

impl IntroSequence {
    pub fn new(timings: &Timings) -> Self {
        Self {
            ring_ms: f64::from(timings.intro_ring_ms),
            voicemail_timeout_ms: f64::from(timings.voicemail_timeout_ms),
            error_fallback_ms: f64::from(timings.voicemail_error_fallback_ms),
            exit_ms: f64::from(timings.intro_exit_ms),
            phase: Phase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Done)
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Starts (or restarts) the intro at `now_ms`.
    pub fn start(&mut self, now_ms: f64) -> Vec<IntroCue> {
        self.phase = Phase::Ringing {
            until: now_ms + self.ring_ms,
        };
        vec![IntroCue::PlayVibration]
    }

    /// Abandons the intro without completing it.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Advances through every phase whose time has come.
    pub fn poll(&mut self, now_ms: f64) -> IntroProgress {
        let mut progress = IntroProgress::default();
        loop {
            match self.phase {
                Phase::Ringing { until } if now_ms >= until => {
                    progress.cues.push(IntroCue::ShowPhone);
                    progress.cues.push(IntroCue::PlayVoicemail);
                    self.phase = Phase::Voicemail {
                        deadline: until + self.voicemail_timeout_ms,
                    };
                }
                Phase::Voicemail { deadline } if now_ms >= deadline => {
                    tracing::debug!(deadline, "voicemail deadline reached");
                    progress.cues.push(self.finish_at(deadline));
                }
                Phase::Closing { until } if now_ms >= until => {
                    self.phase = Phase::Done;
                    progress.completed = true;
                }
                _ => break,
            }
        }
        progress
    }

    /// The voicemail finished playing.
    pub fn voicemail_ended(&mut self, now_ms: f64) -> Option<IntroCue> {
        match self.phase {
            Phase::Voicemail { .. } => Some(self.finish_at(now_ms)),
            _ => None,
        }
    }

    /// Voicemail playback failed or the asset is missing.
    pub fn voicemail_failed(&mut self, now_ms: f64) {
        if let Phase::Voicemail { deadline } = self.phase {
            self.phase = Phase::Voicemail {
                deadline: deadline.min(now_ms + self.error_fallback_ms),
            };
        }
    }

    fn finish_at(&mut self, at_ms: f64) -> IntroCue {
        self.phase = Phase::Closing {
            until: at_ms + self.exit_ms,
        };
        IntroCue::HidePhone
    }
}
