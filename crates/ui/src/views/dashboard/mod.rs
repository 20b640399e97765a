use chrono::Utc;
use dioxus::prelude::*;
use recall_core::model::SetId;

use crate::context::AppContext;
use crate::vm::map_set_cards;

mod actions;
mod card;
mod form;
mod state;

use actions::{build_delete_action, build_fetch_sets_action, build_touch_action};
use card::SetCardView;
use form::SetForm;
use state::{FormIntent, SKELETON_SLOTS, use_dashboard_state};

pub use state::DashboardState;

#[cfg(test)]
pub(crate) use form::SetFormTestHandles;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// The study-set dashboard: owns the displayed list, funnels every mutation
/// through its own callbacks, and resynchronizes with storage by re-fetching
/// after each successful create, edit, or delete.
///
/// Concurrent refreshes are allowed to race; whichever response lands last
/// wins, and the next refresh self-corrects. No call is cancelled or timed
/// out.
#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_dashboard_state();

    let fetch_sets = build_fetch_sets_action(state, &ctx);
    let touch = build_touch_action(&ctx);
    let delete = build_delete_action(state, &ctx, fetch_sets);

    // Every mount starts from an authoritative fetch.
    use_effect(move || fetch_sets.call(()));

    let toggle_menu = use_callback(move |set_id: SetId| {
        let mut menu_target = state.menu_target;
        let next = if menu_target() == Some(set_id) {
            None
        } else {
            Some(set_id)
        };
        menu_target.set(next);
    });

    let open_edit = use_callback(move |set_id: SetId| {
        let mut edit_target = state.edit_target;
        let mut menu_target = state.menu_target;
        let target = state
            .sets
            .read()
            .iter()
            .find(|set| set.id() == set_id)
            .cloned();
        menu_target.set(None);
        edit_target.set(target);
    });

    let on_create_done = use_callback(move |()| {
        let mut show_create = state.show_create;
        show_create.set(false);
        fetch_sets.call(());
    });

    let on_edit_done = use_callback(move |()| {
        let mut edit_target = state.edit_target;
        edit_target.set(None);
        fetch_sets.call(());
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<DashboardTestHandles>() {
                handles.register(fetch_sets, touch, delete, state);
            }
        }
    }

    let is_loading = (state.is_loading)();
    let menu_target = (state.menu_target)();
    let show_create = (state.show_create)();
    let edit_target = (state.edit_target)();
    let cards = map_set_cards(&state.sets.read(), Utc::now());

    rsx! {
        section { class: "page dashboard",
            header { class: "dashboard-header",
                h2 { "Your Sets" }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        let mut show_create = state.show_create;
                        show_create.set(true);
                    },
                    "Create Set"
                }
            }

            article { class: "set-row",
                if is_loading {
                    for slot in 0..SKELETON_SLOTS {
                        div { key: "{slot}", class: "set-skeleton" }
                    }
                } else {
                    for card in cards {
                        div { key: "{card.id}", class: "set-card-wrap",
                            SetCardView {
                                card: card.clone(),
                                on_open: touch,
                                on_menu: toggle_menu,
                            }
                            if menu_target == Some(card.id) {
                                div { class: "context-menu",
                                    button {
                                        class: "context-menu-item",
                                        r#type: "button",
                                        onclick: move |_| open_edit.call(card.id),
                                        "Edit"
                                    }
                                    button {
                                        class: "context-menu-item context-menu-danger",
                                        r#type: "button",
                                        onclick: move |_| delete.call(card.id),
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            if show_create {
                div {
                    class: "modal-overlay",
                    onclick: move |_| {
                        let mut show_create = state.show_create;
                        show_create.set(false);
                    },
                    div {
                        class: "modal",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "modal-title", "Create a new set" }
                        p { class: "modal-body",
                            "Generate a new set of flashcards given a custom context."
                        }
                        SetForm {
                            owner: ctx.owner_id(),
                            intent: FormIntent::Create,
                            on_done: on_create_done,
                        }
                    }
                }
            }

            if let Some(set) = edit_target {
                div {
                    class: "modal-overlay",
                    onclick: move |_| {
                        let mut edit_target = state.edit_target;
                        edit_target.set(None);
                    },
                    div {
                        class: "modal",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "modal-title", "Edit Set" }
                        SetForm {
                            owner: ctx.owner_id(),
                            intent: FormIntent::Update(set.clone()),
                            on_done: on_edit_done,
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct DashboardTestHandles {
    fetch: Rc<RefCell<Option<Callback<()>>>>,
    touch: Rc<RefCell<Option<Callback<SetId>>>>,
    remove: Rc<RefCell<Option<Callback<SetId>>>>,
    state: Rc<RefCell<Option<DashboardState>>>,
}

#[cfg(test)]
impl DashboardTestHandles {
    pub(crate) fn register(
        &self,
        fetch: Callback<()>,
        touch: Callback<SetId>,
        remove: Callback<SetId>,
        state: DashboardState,
    ) {
        *self.fetch.borrow_mut() = Some(fetch);
        *self.touch.borrow_mut() = Some(touch);
        *self.remove.borrow_mut() = Some(remove);
        *self.state.borrow_mut() = Some(state);
    }

    pub(crate) fn fetch(&self) -> Callback<()> {
        (*self.fetch.borrow()).expect("dashboard fetch registered")
    }

    pub(crate) fn touch(&self) -> Callback<SetId> {
        (*self.touch.borrow()).expect("dashboard touch registered")
    }

    pub(crate) fn remove(&self) -> Callback<SetId> {
        (*self.remove.borrow()).expect("dashboard remove registered")
    }

    pub(crate) fn state(&self) -> DashboardState {
        (*self.state.borrow()).expect("dashboard state registered")
    }
}
