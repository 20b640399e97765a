use dioxus::prelude::*;
use recall_core::model::SetId;

use crate::context::AppContext;
use crate::notify::Notice;

use super::state::DashboardState;

/// The authoritative refresh: everything the dashboard displays comes from
/// this query. Runs on mount and after every successful structural mutation.
pub(super) fn build_fetch_sets_action(state: DashboardState, ctx: &AppContext) -> Callback<()> {
    let service = ctx.set_service();
    let notifications = ctx.notifications();
    let owner = ctx.owner_id();
    use_callback(move |()| {
        let service = service.clone();
        let notifications = notifications.clone();
        let owner = owner.clone();
        let mut sets = state.sets;
        let mut is_loading = state.is_loading;

        spawn(async move {
            is_loading.set(true);
            match service.list_sets(&owner).await {
                Ok(fetched) => sets.set(fetched),
                Err(_) => {
                    // No stale retention: a failed fetch clears the list.
                    sets.set(Vec::new());
                    notifications.notify(Notice::error(
                        "Error",
                        "Failed to fetch sets. Please try again.",
                    ));
                }
            }
            // Cleared unconditionally so the dashboard never hangs on a
            // failed query.
            is_loading.set(false);
        });
    })
}

/// Record that a set was opened. No re-fetch and no error surface: the list
/// order goes briefly stale until the next refresh, and a lost touch must
/// never interrupt the open itself.
pub(super) fn build_touch_action(ctx: &AppContext) -> Callback<SetId> {
    let service = ctx.set_service();
    use_callback(move |set_id| {
        let service = service.clone();
        spawn(async move {
            let _ = service.touch_set(set_id).await;
        });
    })
}

/// Delete a set, then re-fetch. The list is never optimistically trimmed,
/// so a failure needs no rollback.
pub(super) fn build_delete_action(
    state: DashboardState,
    ctx: &AppContext,
    fetch_sets: Callback<()>,
) -> Callback<SetId> {
    let service = ctx.set_service();
    let notifications = ctx.notifications();
    use_callback(move |set_id| {
        let service = service.clone();
        let notifications = notifications.clone();
        let mut menu_target = state.menu_target;

        menu_target.set(None);
        spawn(async move {
            match service.delete_set(set_id).await {
                Ok(()) => {
                    notifications.notify(Notice::success("Success", "Set deleted successfully"));
                    fetch_sets.call(());
                }
                Err(_) => {
                    notifications.notify(Notice::error(
                        "Error",
                        "Failed to delete set. Please try again.",
                    ));
                }
            }
        });
    })
}
