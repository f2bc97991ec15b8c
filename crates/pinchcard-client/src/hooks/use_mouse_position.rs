//! Mouse position tracking.

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;
use yew::prelude::*;

/// Last mouse position in viewport pixels, `None` until the mouse moves.
#[hook]
pub fn use_mouse_position() -> Option<(i32, i32)> {
    let position = use_state(|| None);
    let listener_ref = use_mut_ref(|| None::<EventListener>);

    {
        let position = position.clone();
        use_effect_with((), move |_| {
            if let Some(window) = web_sys::window() {
                *listener_ref.borrow_mut() =
                    Some(EventListener::new(&window, "mousemove", move |event| {
                        if let Some(event) = event.dyn_ref::<MouseEvent>() {
                            position.set(Some((event.client_x(), event.client_y())));
                        }
                    }));
            }

            move || {
                *listener_ref.borrow_mut() = None;
            }
        });
    }

    *position
}
