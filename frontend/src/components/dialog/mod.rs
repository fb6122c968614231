pub mod dom;
pub mod focus_trap;
pub mod lifecycle;

use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::hooks::use_focus_trap::{use_focus_trap, FocusTrapConfig, TrapOptions};

#[derive(Properties, PartialEq)]
pub struct DialogProps {
    #[prop_or_default]
    pub title: Option<AttrValue>,
    #[prop_or_default]
    pub small: bool,
    #[prop_or_default]
    pub large: bool,
    /// Keep the dialog open when Escape is pressed
    #[prop_or_default]
    pub disable_escape: bool,
    /// Called with the keydown event when Escape requests closing the dialog.
    /// The dialog never closes itself; the parent decides whether to unmount it.
    #[prop_or_default]
    pub on_close: Option<Callback<KeyboardEvent>>,
    #[prop_or_default]
    pub config: FocusTrapConfig,
    #[prop_or_default]
    pub children: Children,
}

/// Modal overlay that traps keyboard focus in its content while mounted
#[function_component(Dialog)]
pub fn dialog(props: &DialogProps) -> Html {
    let content_ref = use_node_ref();
    let active = use_focus_trap(
        content_ref.clone(),
        TrapOptions {
            disable_escape: props.disable_escape,
            on_close: props.on_close.clone(),
        },
        props.config.clone(),
    );

    let active_class = active.then_some("active");

    html! {
        <div class={classes!("overlay", active_class)}>
            <div class={classes!(
                "modal",
                active_class,
                props.small.then_some("small"),
                props.large.then_some("large")
            )}>
                {if let Some(title) = &props.title {
                    html! { <h3 class="modal-header">{title.clone()}</h3> }
                } else {
                    html! {}
                }}
                <div
                    class={classes!("modal-content", props.title.is_none().then_some("first"))}
                    ref={content_ref}
                >
                    {for props.children.iter()}
                </div>
            </div>
        </div>
    }
}
