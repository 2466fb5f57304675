use thiserror::Error;

/// Generic error type used by service layer functions.
///
/// Backend failures are not represented here: services report them through
/// the form state and an `Ok(false)` result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Requested category is not in the local store.
    #[error("not found")]
    NotFound,
    /// Submitted data could not be turned into domain values.
    #[error("{0}")]
    Form(String),
    /// Shared state is unusable.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
