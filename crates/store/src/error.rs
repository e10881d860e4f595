use sitework_api::ServiceError;
use sitework_core::ValidationError;

/// Errors raised by the store.
///
/// `NotFound`, `Conflict` and `Invalid` describe caller mistakes and map to
/// 4xx responses; the rest are storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("embedded document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ServiceError::NotFound(e.to_string()),
            StoreError::Conflict(m) => ServiceError::Conflict(m),
            StoreError::Invalid(m) => ServiceError::BadRequest(m),
            StoreError::Validation(v) => v.into(),
            StoreError::Sqlite(_) | StoreError::Json(_) | StoreError::Io(_) => {
                tracing::error!("store failure: {e}");
                ServiceError::Internal("internal server error".into())
            }
        }
    }
}

/// Turn "no rows" into a typed not-found.
pub(crate) trait OptionalRow<T> {
    fn or_not_found(self, what: &'static str) -> Result<T>;
}

impl<T> OptionalRow<T> for rusqlite::Result<T> {
    fn or_not_found(self, what: &'static str) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(what)),
            Err(e) => Err(e.into()),
        }
    }
}
