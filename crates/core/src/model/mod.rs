mod ids;
mod set;

pub use ids::{OwnerId, ParseIdError, SetId};
pub use set::{SetError, StudySet, normalize_context, normalize_name};
