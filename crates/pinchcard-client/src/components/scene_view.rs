//! One story scene: title, cards and its button.

use std::rc::Rc;

use pinchcard_core::SceneId;
use yew::prelude::*;

use crate::content::{ButtonAction, ButtonContent, CardContent, SceneContent};
use crate::layout::DomLayout;
use crate::view_state::ViewState;

#[derive(Properties, PartialEq)]
pub struct SceneViewProps {
    pub content: &'static SceneContent,
    pub state: UseReducerHandle<ViewState>,
    pub layout: Rc<DomLayout>,
    /// Mouse clicks on the scene's button.
    pub on_button: Callback<ButtonAction>,
}

#[function_component(SceneView)]
pub fn scene_view(props: &SceneViewProps) -> Html {
    let content = props.content;
    let state = &props.state;

    let title = if content.scene == SceneId::End {
        html! {
            <h1 id="ending-title" class={classes!(state.ending_title.then_some("visible"))}>
                { content.title }
            </h1>
        }
    } else {
        html! { <h2>{ content.title }</h2> }
    };

    let phone = (content.scene == SceneId::Start).then(|| {
        html! {
            <img
                id="phone-image"
                class={classes!(state.phone_visible.then_some("visible"))}
                src="assets/phone.png"
                alt="Incoming call"
            />
        }
    });

    let cards = (!content.cards.is_empty()).then(|| {
        html! {
            <div class="card-row">
                { for content.cards.iter().map(|card| html! {
                    <CardView
                        key={card.id}
                        card={card}
                        node={props.layout.node(card.id)}
                        hovered={state.is_hovered(card.id)}
                        outlined={state.is_outlined(card.id)}
                        clicked={state.is_clicked(card.id)}
                    />
                }) }
            </div>
        }
    });

    let button = content.button.as_ref().map(|button| {
        html! {
            <SceneButton
                button={button}
                node={props.layout.node(button.id)}
                on_click={props.on_button.clone()}
            />
        }
    });

    html! {
        <section
            class={classes!("scene", (state.shown == content.scene).then_some("active"))}
            id={content.scene.dom_id()}
        >
            { title }
            { phone }
            { cards }
            { button }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct CardViewProps {
    card: &'static CardContent,
    node: NodeRef,
    hovered: bool,
    outlined: bool,
    clicked: bool,
}

#[function_component(CardView)]
fn card_view(props: &CardViewProps) -> Html {
    let card = props.card;
    html! {
        <div
            id={card.id}
            ref={props.node.clone()}
            class={classes!(
                "card-container",
                props.hovered.then_some("hover"),
                props.outlined.then_some("pinch-outline"),
                props.clicked.then_some("clicked")
            )}
            data-correct={card.correct.then_some("true")}
        >
            <div class="card">{ card.label }</div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SceneButtonProps {
    button: &'static ButtonContent,
    node: NodeRef,
    on_click: Callback<ButtonAction>,
}

#[function_component(SceneButton)]
fn scene_button(props: &SceneButtonProps) -> Html {
    let button = props.button;
    let onclick = {
        let on_click = props.on_click.clone();
        let action = button.action;
        Callback::from(move |_: MouseEvent| on_click.emit(action))
    };
    html! {
        <button
            id={button.id}
            ref={props.node.clone()}
            class={classes!((button.action == ButtonAction::Next).then_some("scene-button"))}
            data-action={button.is_pinchable().then_some("next")}
            onclick={onclick}
        >
            { button.label }
        </button>
    }
}
