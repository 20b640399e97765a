use recall_core::model::SetId;

use crate::repository::StorageError;

pub(super) fn set_id_from_i64(raw: i64) -> Result<SetId, StorageError> {
    u64::try_from(raw)
        .map(SetId::new)
        .map_err(|_| StorageError::Serialization("set id sign overflow".into()))
}

pub(super) fn set_id_to_i64(id: SetId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("set id overflow".into()))
}
