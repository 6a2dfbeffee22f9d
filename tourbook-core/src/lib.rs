pub mod directory;
pub mod identity;
pub mod models;
pub mod payment;
pub mod repository;
pub mod validation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid ID: {0}")]
    InvalidId(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Identity verification failed: {0}")]
    Identity(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
