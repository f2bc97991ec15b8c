//! Full-page overlays.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FadeOverlayProps {
    pub active: bool,
}

/// Black layer that hides scene swaps.
#[function_component(FadeOverlay)]
pub fn fade_overlay(props: &FadeOverlayProps) -> Html {
    html! {
        <div id="fade-overlay" class={classes!(props.active.then_some("active"))} />
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub text: Option<&'static str>,
}

#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let Some(text) = props.text else {
        return html! {};
    };
    html! {
        <p id="permission-message">{ text }</p>
    }
}
