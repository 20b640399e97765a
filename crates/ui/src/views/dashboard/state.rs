use dioxus::prelude::*;
use recall_core::model::{SetId, StudySet};

use crate::views::ViewError;

/// Fixed number of placeholder cards shown while the list loads. The prior
/// list is hidden outright, never overlaid.
pub(super) const SKELETON_SLOTS: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    Error(ViewError),
}

/// What the embedded form is being asked to do.
#[derive(Clone, Debug, PartialEq)]
pub enum FormIntent {
    Create,
    Update(StudySet),
}

/// The dashboard's own state: the displayed list, the loading flag, and
/// which overlay (create dialog, edit dialog, card menu) is open.
///
/// Only the dashboard's action callbacks ever write `sets` and `is_loading`;
/// children get narrow callbacks, not signals.
#[derive(Clone, Copy)]
pub struct DashboardState {
    pub sets: Signal<Vec<StudySet>>,
    pub is_loading: Signal<bool>,
    pub show_create: Signal<bool>,
    pub edit_target: Signal<Option<StudySet>>,
    pub menu_target: Signal<Option<SetId>>,
}

pub(super) fn use_dashboard_state() -> DashboardState {
    // Loading starts true so a fresh mount shows skeletons, not a flash of
    // an empty list.
    let sets = use_signal(Vec::new);
    let is_loading = use_signal(|| true);
    let show_create = use_signal(|| false);
    let edit_target = use_signal(|| None::<StudySet>);
    let menu_target = use_signal(|| None::<SetId>);

    DashboardState {
        sets,
        is_loading,
        show_create,
        edit_target,
        menu_target,
    }
}
