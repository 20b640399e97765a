use std::sync::{Arc, Mutex};
use std::time::Duration;

use dioxus::prelude::*;

use crate::context::AppContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient, fire-and-forget message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sink for user-facing notices.
///
/// `notify` never blocks and never reports back to the caller; failures to
/// display are nobody's problem but the sink's. `take_all` hands pending
/// notices to whatever renders them.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notice: Notice);
    fn take_all(&self) -> Vec<Notice>;
}

/// Mutex-backed queue the toast area drains on a timer.
#[derive(Clone, Default)]
pub struct QueueSink {
    queue: Arc<Mutex<Vec<Notice>>>,
}

impl QueueSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSink for QueueSink {
    fn notify(&self, notice: Notice) {
        if let Ok(mut guard) = self.queue.lock() {
            guard.push(notice);
        }
    }

    fn take_all(&self) -> Vec<Notice> {
        match self.queue.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(_) => Vec::new(),
        }
    }
}

const TOAST_POLL_MS: u64 = 250;
const TOAST_LIFETIME_SECS: u64 = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
struct ToastVm {
    seq: u64,
    notice: Notice,
}

/// Renders queued notices as toasts and expires them after a few seconds.
#[component]
pub fn ToastArea() -> Element {
    let ctx = use_context::<AppContext>();
    let mut toasts = use_signal(Vec::<ToastVm>::new);
    let mut next_seq = use_signal(|| 0_u64);

    let sink = ctx.notifications();
    use_future(move || {
        let sink = sink.clone();
        async move {
            loop {
                tokio::time::sleep(Duration::from_millis(TOAST_POLL_MS)).await;
                for notice in sink.take_all() {
                    let seq = next_seq();
                    next_seq.set(seq + 1);
                    toasts.write().push(ToastVm { seq, notice });

                    let mut toasts = toasts;
                    spawn(async move {
                        tokio::time::sleep(Duration::from_secs(TOAST_LIFETIME_SECS)).await;
                        toasts.write().retain(|toast| toast.seq != seq);
                    });
                }
            }
        }
    });

    rsx! {
        div { class: "toast-area",
            for toast in toasts() {
                div {
                    key: "{toast.seq}",
                    class: if toast.notice.kind == NoticeKind::Error { "toast toast-error" } else { "toast toast-success" },
                    p { class: "toast-title", "{toast.notice.title}" }
                    p { class: "toast-message", "{toast.notice.message}" }
                }
            }
        }
    }
}
