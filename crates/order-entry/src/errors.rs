use cqrs_es::AggregateError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Entity not found: {entity}")]
    NotFound { entity: String },

    #[error("Invalid order: missing {field}")]
    InvalidOrder { field: String },

    #[error("Page {index} is out of range ({page_count} pages)")]
    PageOutOfRange { index: u32, page_count: u32 },

    #[error("Offset overflow for page {index} with limit {limit}")]
    OffsetOverflow { index: u32, limit: u32 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Order query failed: {message}")]
    Query { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl From<AggregateError<Error>> for Error {
    fn from(err: AggregateError<Error>) -> Self {
        match err {
            AggregateError::UserError(err) => err,
            err => Error::Persistence {
                message: err.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Query {
            message: err.to_string(),
        }
    }
}
