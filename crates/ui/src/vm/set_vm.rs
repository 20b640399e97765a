use chrono::{DateTime, Utc};
use recall_core::model::{SetId, StudySet};

/// UI-ready representation of one study set card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCardVm {
    pub id: SetId,
    pub name: String,
    pub last_used_label: String,
}

/// Convert domain sets into card view models, preserving order.
#[must_use]
pub fn map_set_cards(sets: &[StudySet], now: DateTime<Utc>) -> Vec<SetCardVm> {
    sets.iter()
        .map(|set| SetCardVm {
            id: set.id(),
            name: set.name().to_owned(),
            last_used_label: relative_label(set.last_used_at(), now),
        })
        .collect()
}

fn relative_label(last_used_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(last_used_at);
    if elapsed.num_seconds() < 60 {
        return "just now".to_owned();
    }
    if elapsed.num_minutes() < 60 {
        return format!("{}m ago", elapsed.num_minutes());
    }
    if elapsed.num_hours() < 24 {
        return format!("{}h ago", elapsed.num_hours());
    }
    format!("{}d ago", elapsed.num_days())
}
