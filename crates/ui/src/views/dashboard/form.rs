use dioxus::prelude::*;
use recall_core::model::OwnerId;

use crate::context::AppContext;
use crate::views::ViewError;

use super::state::{FormIntent, SaveState};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Create/edit form for a study set.
///
/// Persists through its own service handle and reports only success: a
/// failed save keeps the dialog open with an inline message, and `on_done`
/// fires exactly once, after the write lands. The dashboard reacts to
/// `on_done` by re-fetching; it never sees the payload.
#[component]
pub fn SetForm(owner: OwnerId, intent: FormIntent, on_done: Callback<()>) -> Element {
    let ctx = use_context::<AppContext>();

    let initial = match &intent {
        FormIntent::Create => (String::new(), String::new()),
        FormIntent::Update(set) => (
            set.name().to_owned(),
            set.context().unwrap_or_default().to_owned(),
        ),
    };
    let mut name = use_signal(|| initial.0.clone());
    let mut context_text = use_signal(|| initial.1.clone());
    let mut save_state = use_signal(|| SaveState::Idle);
    let mut show_validation = use_signal(|| false);

    let submit_label = match &intent {
        FormIntent::Create => "Create Set",
        FormIntent::Update(_) => "Save Changes",
    };

    let service = ctx.set_service();
    let intent_for_submit = intent.clone();
    let on_submit = use_callback(move |()| {
        let service = service.clone();
        let owner = owner.clone();
        let intent = intent_for_submit.clone();

        let raw_name = name.read().to_string();
        if !is_valid_set_name(&raw_name) {
            show_validation.set(true);
            return;
        }
        if save_state() == SaveState::Saving {
            return;
        }
        show_validation.set(false);
        let trimmed_name = raw_name.trim().to_owned();
        let context = Some(context_text.read().to_string()).filter(|c| !c.trim().is_empty());

        spawn(async move {
            save_state.set(SaveState::Saving);
            let result = match &intent {
                FormIntent::Create => service
                    .create_set(owner, trimmed_name, context)
                    .await
                    .map(|_| ()),
                FormIntent::Update(set) => service.update_set(set.id(), trimmed_name, context).await,
            };

            match result {
                Ok(()) => {
                    save_state.set(SaveState::Idle);
                    on_done.call(());
                }
                Err(_) => {
                    save_state.set(SaveState::Error(ViewError::Unknown));
                }
            }
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SetFormTestHandles>() {
                handles.register(on_submit, name, context_text);
            }
        }
    }

    rsx! {
        form {
            class: "set-form",
            onsubmit: move |evt| {
                evt.prevent_default();
                on_submit.call(());
            },
            label { class: "set-form-label", r#for: "set-form-name", "Name" }
            input {
                id: "set-form-name",
                class: "set-form-input",
                r#type: "text",
                value: "{name}",
                oninput: move |evt| name.set(evt.value()),
            }
            if show_validation() {
                p { class: "set-form-hint", "Name cannot be empty." }
            }

            label { class: "set-form-label", r#for: "set-form-context", "Context" }
            textarea {
                id: "set-form-context",
                class: "set-form-input",
                placeholder: "What should the flashcards cover?",
                value: "{context_text}",
                oninput: move |evt| context_text.set(evt.value()),
            }

            if let SaveState::Error(err) = save_state() {
                p { class: "set-form-error", "{err.message()}" }
            }

            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: save_state() == SaveState::Saving,
                "{submit_label}"
            }
        }
    }
}

fn is_valid_set_name(name: &str) -> bool {
    !name.trim().is_empty()
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SetFormTestHandles {
    submit: Rc<RefCell<Option<Callback<()>>>>,
    name: Rc<RefCell<Option<Signal<String>>>>,
    context: Rc<RefCell<Option<Signal<String>>>>,
}

#[cfg(test)]
impl SetFormTestHandles {
    pub(crate) fn register(
        &self,
        submit: Callback<()>,
        name: Signal<String>,
        context: Signal<String>,
    ) {
        *self.submit.borrow_mut() = Some(submit);
        *self.name.borrow_mut() = Some(name);
        *self.context.borrow_mut() = Some(context);
    }

    pub(crate) fn submit(&self) -> Callback<()> {
        (*self.submit.borrow()).expect("form submit registered")
    }

    pub(crate) fn name(&self) -> Signal<String> {
        (*self.name.borrow()).expect("form name registered")
    }

    pub(crate) fn context(&self) -> Signal<String> {
        (*self.context.borrow()).expect("form context registered")
    }
}
