#![forbid(unsafe_code)]

pub mod error;
pub mod set_service;

pub use recall_core::Clock;

pub use error::SetServiceError;
pub use set_service::SetService;
