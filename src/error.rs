//! Unified error type for storage, validation and lookup failures, and its
//! mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// One violated constraint on a field of an incoming item.
///
/// `loc` is the path to the offending value, e.g. `["body", "price"]`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    /// Where the bad value sits (`body`/`path` followed by the field name).
    pub loc: Vec<String>,
    /// Human-readable explanation.
    pub msg: String,
    /// Machine-readable error kind, e.g. `value_error.number.not_gt`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    /// Error located in the request body at `field`.
    pub fn body(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".into(), field.into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Error about the request body as a whole (unparseable, wrong shape).
    pub fn whole_body(msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Error located in a path parameter.
    pub fn path(param: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: vec!["path".into(), param.into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (missing file, read, write, rename).
    Io(String),
    /// Failed to serialize items to bytes.
    Serialize(String),
    /// File contents are not a JSON array of items.
    Deserialize(String),
    /// Bad configuration (invalid path, policy, etc.).
    Config(String),
    /// Client input broke one or more field constraints.
    Validation(Vec<FieldError>),
    /// No item carries this id.
    NotFound(u64),
    /// The largest stored id is already `u64::MAX`; no id is left to assign.
    IdsExhausted(u64),
    /// A blocking store call did not run to completion.
    Task(String),
}

impl Error {
    /// HTTP status this error is reported with.
    ///
    /// - Validation: 422 Unprocessable Entity
    /// - NotFound: 404 Not Found
    /// - everything else: 500 Internal Server Error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation(errors) => json!({ "detail": errors }),
            Self::NotFound(_) => json!({ "detail": "Item not found" }),
            other => {
                // Storage details stay in the log, not in the response.
                error!(error = %other, "request failed on storage");
                json!({ "detail": "Internal Server Error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Validation(errors) => {
                write!(f, "validation failed:")?;
                for e in errors {
                    write!(f, " {}: {};", e.loc.join("."), e.msg)?;
                }
                Ok(())
            }
            Error::NotFound(id) => write!(f, "item {id} not found"),
            Error::IdsExhausted(max) => write!(f, "no id left after {max}"),
            Error::Task(msg) => write!(f, "store task failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            Error::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(Error::NotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::IdsExhausted(u64::MAX).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Deserialize("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_errors_do_not_leak_details() {
        let response = Error::Io("/secret/path: permission denied".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
