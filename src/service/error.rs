use crate::database::error::DatabaseError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Unexpected result: {message}")]
    UnexpectedResult { message: String },

    #[error("Unknown subscriber id {subscriber_id}.")]
    UnknownSubscriber { subscriber_id: i64 },

    #[error("DatabaseError: {0}")]
    DatabaseError(#[from] DatabaseError),
}
