use std::fmt::{Display, Formatter};

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::UserId;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Failures raised by the remote user directory.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect error, timeout, ...).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: StatusCode },
    /// The response body could not be decoded into the expected shape.
    #[error("invalid payload from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Which write operation a [`WriteFailure`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Delete,
}

impl Display for WriteOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
            WriteOp::Delete => "delete",
        };
        write!(f, "{s}")
    }
}

/// A rejected create/update/delete, classified with the operation and the
/// targeted record id when one exists. The collection is left unchanged
/// whenever one of these is produced.
#[derive(Debug)]
pub struct WriteFailure {
    pub operation: WriteOp,
    pub id: Option<UserId>,
    pub source: ApiError,
}

impl Display for WriteFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} of user {} failed: {}", self.operation, id, self.source),
            None => write!(f, "{} failed: {}", self.operation, self.source),
        }
    }
}

impl std::error::Error for WriteFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
