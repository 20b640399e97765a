/// Opaque view-level failure; the user gets one generic retryable message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        "Something went wrong. Please try again."
    }
}
