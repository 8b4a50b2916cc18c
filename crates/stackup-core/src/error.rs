//! Error types for stack operations

use std::string::FromUtf8Error;
use thiserror::Error;

/// Message CloudFormation returns when an update would change nothing
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";

/// Errors decoding the query-string parameter input
#[derive(Debug, Error)]
pub enum ParameterError {
    /// A percent-escape decoded to bytes that are not valid UTF-8
    #[error("Invalid parameter encoding in '{segment}': {source}")]
    InvalidEncoding {
        segment: String,
        #[source]
        source: FromUtf8Error,
    },
}

/// Where a remote failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The service answered and rejected the request
    Service,
    /// No usable response (network, credentials, request construction)
    Transport,
    /// A waiter hit a failure state, an unexpected error, or its time limit
    Waiter,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::Service => write!(f, "service"),
            ApiErrorKind::Transport => write!(f, "transport"),
            ApiErrorKind::Waiter => write!(f, "waiter"),
        }
    }
}

/// A failed call against the stack API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({kind}{}): {message}", code_suffix(.code))]
pub struct ApiError {
    /// API operation name, e.g. `CreateStack`
    pub operation: &'static str,
    pub kind: ApiErrorKind,
    /// Service error code, e.g. `ValidationError`
    pub code: Option<String>,
    pub message: String,
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(", {}", c))
        .unwrap_or_default()
}

impl ApiError {
    pub fn service(
        operation: &'static str,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind: ApiErrorKind::Service,
            code,
            message: message.into(),
        }
    }

    pub fn transport(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: ApiErrorKind::Transport,
            code: None,
            message: message.into(),
        }
    }

    pub fn waiter(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: ApiErrorKind::Waiter,
            code: None,
            message: message.into(),
        }
    }

    /// True when the service rejected the request (as opposed to never answering)
    pub fn is_service(&self) -> bool {
        self.kind == ApiErrorKind::Service
    }

    /// True for the benign "nothing to change" rejection of an update
    pub fn is_no_updates(&self) -> bool {
        self.is_service() && self.message == NO_UPDATES_MESSAGE
    }
}

/// Errors that abort a deployment run
#[derive(Debug, Error)]
pub enum StackError {
    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type alias for StackError
pub type Result<T> = std::result::Result<T, StackError>;
