//! Error types for the dashboard core.
//!
//! [`ErrorKind`] classifies a failed backend fetch and decides how far the
//! failure travels: `Unauthorized` ends the session, everything else stays
//! inside the view that issued the request.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a single view fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The stored credential was rejected.
    #[error("session is no longer authorized")]
    Unauthorized,

    /// Gateway or transport timeout, usually because the range is too large.
    #[error("request timed out")]
    Timeout,

    /// Any other failure, with a short description for the logs.
    #[error("server error: {0}")]
    ServerError(String),
}

impl ErrorKind {
    /// Maps a non-success HTTP status to an error kind.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ErrorKind::Unauthorized,
            408 | 504 => ErrorKind::Timeout,
            _ if body.is_empty() => ErrorKind::ServerError(format!("status {status}")),
            _ => ErrorKind::ServerError(format!("status {status}: {body}")),
        }
    }

    /// Maps a transport-level failure from reqwest.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::ServerError(err.to_string())
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ErrorKind::Unauthorized)
    }

    /// Message shown next to the view that failed.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "Your session has expired. Please log in again.",
            ErrorKind::Timeout => "The request timed out. Try a smaller date range.",
            ErrorKind::ServerError(_) => "Failed to load data. Please try again.",
        }
    }
}

/// Invalid input or local I/O failures outside the fetch path.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: u32, max: u32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(401, ""), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403, "forbidden"), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(504, ""), ErrorKind::Timeout);
        assert_eq!(ErrorKind::from_status(408, ""), ErrorKind::Timeout);
        assert_eq!(
            ErrorKind::from_status(500, "boom"),
            ErrorKind::ServerError("status 500: boom".to_string())
        );
        assert_eq!(
            ErrorKind::from_status(502, ""),
            ErrorKind::ServerError("status 502".to_string())
        );
    }

    #[test]
    fn test_timeout_message_suggests_smaller_range() {
        assert!(ErrorKind::Timeout.user_message().contains("smaller date range"));
        assert_ne!(
            ErrorKind::Timeout.user_message(),
            ErrorKind::ServerError("x".into()).user_message()
        );
    }
}
