/// Error taxonomy for dashboard operations.
///
/// Every user-triggered operation funnels its failure into one of these
/// kinds. Handlers in [`crate::app`] turn them into a toast plus a log line;
/// nothing here is fatal to the session.
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DashError {
    /// Bad or missing user input (e.g. an incomplete week range).
    Validation(String),
    /// The backend answered with a non-2xx status.
    Request {
        status: u16,
        status_text: String,
        body: String,
    },
    /// The request never produced a response (refused, timed out, ...).
    Transport(String),
    /// The response body was not the JSON shape we expected.
    Decode(String),
    /// Persisted filter state could not be parsed. Always swallowed.
    Parse(String),
}

impl DashError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this is a user-correctable input problem rather than a
    /// system failure. Used to pick the log level.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl fmt::Display for DashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::Request {
                status,
                status_text,
                body,
            } => write!(f, "{status} {status_text} - {body}"),
            Self::Transport(msg) => write!(f, "request failed: {msg}"),
            Self::Decode(msg) => write!(f, "invalid response: {msg}"),
            Self::Parse(msg) => write!(f, "invalid saved filters: {msg}"),
        }
    }
}

impl std::error::Error for DashError {}

pub type DashResult<T> = Result<T, DashError>;
