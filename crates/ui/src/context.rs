use std::sync::Arc;

use recall_core::model::OwnerId;
use services::SetService;

use crate::notify::NotificationSink;

/// What the composition root must provide to the UI.
///
/// The owner identity is resolved upstream (auth is out of scope here) and
/// handed in once; views never look it up from ambient state.
pub trait UiApp: Send + Sync {
    fn owner_id(&self) -> OwnerId;

    fn set_service(&self) -> Arc<SetService>;
    fn notifications(&self) -> Arc<dyn NotificationSink>;
}

#[derive(Clone)]
pub struct AppContext {
    owner_id: OwnerId,

    set_service: Arc<SetService>,
    notifications: Arc<dyn NotificationSink>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            owner_id: app.owner_id(),
            set_service: app.set_service(),
            notifications: app.notifications(),
        }
    }

    #[must_use]
    pub fn owner_id(&self) -> OwnerId {
        self.owner_id.clone()
    }

    #[must_use]
    pub fn set_service(&self) -> Arc<SetService> {
        Arc::clone(&self.set_service)
    }

    #[must_use]
    pub fn notifications(&self) -> Arc<dyn NotificationSink> {
        Arc::clone(&self.notifications)
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
