//! Hand and mouse cursors.

use yew::prelude::*;

use crate::hooks::use_mouse_position;

#[derive(Properties, PartialEq)]
pub struct HandCursorProps {
    /// Measured each frame to size the hit-test circle.
    pub node: NodeRef,
    pub position: Option<(f32, f32)>,
    pub pinching: bool,
}

/// Circle following the index fingertip. Hidden until a hand is seen.
#[function_component(HandCursor)]
pub fn hand_cursor(props: &HandCursorProps) -> Html {
    let style = props.position.map(|(x, y)| format!("left: {x}px; top: {y}px;"));
    html! {
        <div
            id="cursor"
            ref={props.node.clone()}
            class={classes!(props.pinching.then_some("pinch"), style.is_none().then_some("hidden"))}
            style={style}
        />
    }
}

/// Dot following the mouse, for use without a webcam.
#[function_component(MouseCursor)]
pub fn mouse_cursor() -> Html {
    let position = use_mouse_position();
    let style = position.map(|(x, y)| format!("left: {x}px; top: {y}px;"));
    html! {
        <div id="mouse-cursor" style={style} />
    }
}
