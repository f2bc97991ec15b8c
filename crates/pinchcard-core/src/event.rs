//! Interaction events delivered to presentation subscribers.
//!
//! The core never touches the page. Everything the user should see is
//! published here and applied by whoever subscribes.

use crate::hit_test::RegionId;
use crate::intro::IntroCue;
use crate::scene::SceneId;

/// What caused a scene change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// A pinch-click completed the scene's click rule.
    Click,
    /// A "next" button or explicit trigger.
    Trigger,
    IntroComplete,
    Restart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    CursorMoved {
        x: f32,
        y: f32,
    },
    PinchChanged {
        pinching: bool,
    },
    /// Clear hover/outline on `cleared`, then mark `hovered`.
    HighlightsChanged {
        cleared: Vec<RegionId>,
        hovered: Option<RegionId>,
        outlined: bool,
    },
    /// A card was clicked. Reapplying the mark for a repeat click is safe.
    CardMarked {
        scene: SceneId,
        card: RegionId,
        newly: bool,
    },
    SceneChanged {
        from: SceneId,
        to: SceneId,
        cause: TransitionCause,
    },
    IntroCue(IntroCue),
}

type Listener = Box<dyn FnMut(&InteractionEvent)>;

/// Ordered list of event subscribers.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&InteractionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: &InteractionEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();

        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |event| {
                if let InteractionEvent::PinchChanged { pinching } = event {
                    log.borrow_mut().push((name, *pinching));
                }
            });
        }

        bus.publish(&InteractionEvent::PinchChanged { pinching: true });
        assert_eq!(*log.borrow(), vec![("first", true), ("second", true)]);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn test_publish_without_listeners() {
        let mut bus = EventBus::default();
        bus.publish(&InteractionEvent::CursorMoved { x: 1.0, y: 2.0 });
    }
}
