use dioxus::prelude::*;
use recall_core::model::SetId;

use crate::vm::SetCardVm;

/// Passive display of one study set.
///
/// Activating the card fires `on_open` (which the dashboard uses to record
/// recency); the menu button only asks the dashboard to show the card's
/// context menu.
#[component]
pub fn SetCardView(card: SetCardVm, on_open: Callback<SetId>, on_menu: Callback<SetId>) -> Element {
    let id = card.id;
    rsx! {
        div { class: "set-card",
            button {
                class: "set-card-open",
                r#type: "button",
                onclick: move |_| on_open.call(id),
                h3 { class: "set-card-name", "{card.name}" }
                p { class: "set-card-used", "{card.last_used_label}" }
            }
            button {
                class: "set-card-menu",
                r#type: "button",
                aria_label: "Set actions",
                onclick: move |evt| {
                    evt.stop_propagation();
                    on_menu.call(id);
                },
                "⋯"
            }
        }
    }
}
