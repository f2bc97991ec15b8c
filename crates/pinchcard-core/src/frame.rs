//! Frame source abstraction and duplicate-frame gating.

/// Something that produces video frames, e.g. a `<video>` element.
pub trait FrameSource {
    /// False until the stream is playing.
    fn is_active(&self) -> bool;

    /// Presentation time of the current frame.
    fn current_time(&self) -> f64;
}

/// Why a tick did not process a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    SourceInactive,
    /// The source has not advanced since the last processed frame.
    StaleFrame,
}

/// Admits each distinct frame exactly once.
#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    last_time: Option<f64>,
}

impl FrameGate {
    /// Returns the frame time to process, or why this tick is skipped.
    #[allow(clippy::float_cmp)]
    pub fn admit(&mut self, source: &impl FrameSource) -> Result<f64, SkipReason> {
        if !source.is_active() {
            return Err(SkipReason::SourceInactive);
        }
        let time = source.current_time();
        if self.last_time == Some(time) {
            return Err(SkipReason::StaleFrame);
        }
        self.last_time = Some(time);
        Ok(time)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Video {
        active: bool,
        time: f64,
    }

    impl FrameSource for Video {
        fn is_active(&self) -> bool {
            self.active
        }

        fn current_time(&self) -> f64 {
            self.time
        }
    }

    #[test]
    fn test_inactive_source_skips() {
        let mut gate = FrameGate::default();
        let video = Video { active: false, time: 1.0 };
        assert_eq!(gate.admit(&video), Err(SkipReason::SourceInactive));
        assert_eq!(gate.last_time(), None);
    }

    #[test]
    fn test_same_time_is_processed_once() {
        let mut gate = FrameGate::default();
        let mut video = Video { active: true, time: 0.0 };

        assert_eq!(gate.admit(&video), Ok(0.0));
        for _ in 0..5 {
            assert_eq!(gate.admit(&video), Err(SkipReason::StaleFrame));
        }

        video.time = 0.033;
        assert_eq!(gate.admit(&video), Ok(0.033));
        assert_eq!(gate.admit(&video), Err(SkipReason::StaleFrame));
    }
}
