use serde::Serialize;
use thiserror::Error;

/// Errors a single upstream source can report.
///
/// Every variant is downgraded to "no results for this source" by the
/// analyzer. Only [`SourceError::InvalidCredential`] is something the user
/// can fix, see [`SourceError::is_actionable`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or transport failure (DNS, connect, timeout, body read)
    #[error("Request failed: {0}")]
    Transport(String),

    /// Upstream rejected the API key or the quota is exhausted
    #[error("Invalid credential (status {status}): {message}")]
    InvalidCredential { status: u16, message: String },

    /// Upstream answered with some other error status
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Response did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The requested operation is not offered by this source
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl SourceError {
    pub fn is_actionable(&self) -> bool {
        matches!(self, SourceError::InvalidCredential { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Transport(_) => "transport",
            SourceError::InvalidCredential { .. } => "invalid_credential",
            SourceError::Upstream { .. } => "upstream",
            SourceError::Malformed(_) => "malformed",
            SourceError::Unsupported(_) => "unsupported",
        }
    }

    /// Maps an error status from one of the Google endpoints.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 401 | 403 => SourceError::InvalidCredential { status, message },
            _ => SourceError::Upstream { status, message },
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Malformed(e.to_string())
    }
}

/// Which upstream a warning came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Suggestions,
    Videos,
    Trending,
    RisingTrends,
}

/// A source failure surfaced to the caller next to the partial results.
#[derive(Debug, Clone, Serialize)]
pub struct SourceWarning {
    pub source: SourceKind,
    pub kind: String,
    pub message: String,
    pub actionable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl SourceWarning {
    pub fn new(source: SourceKind, error: &SourceError, keyword: Option<&str>) -> Self {
        Self {
            source,
            kind: error.kind().to_string(),
            message: error.to_string(),
            actionable: error.is_actionable(),
            keyword: keyword.map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_statuses_are_actionable() {
        for status in [400, 401, 403] {
            let err = SourceError::from_status(status, "keyInvalid".into());
            assert!(err.is_actionable());
            assert_eq!(err.kind(), "invalid_credential");
        }
    }

    #[test]
    fn other_statuses_are_not_actionable() {
        let err = SourceError::from_status(500, "backendError".into());
        assert!(!err.is_actionable());
        assert_eq!(err.kind(), "upstream");
        assert!(!SourceError::Malformed("x".into()).is_actionable());
        assert!(!SourceError::Transport("x".into()).is_actionable());
    }

    #[test]
    fn warning_carries_keyword_and_flag() {
        let err = SourceError::from_status(403, "quotaExceeded".into());
        let warning = SourceWarning::new(SourceKind::Videos, &err, Some("fitness app"));
        assert!(warning.actionable);
        assert_eq!(warning.keyword.as_deref(), Some("fitness app"));
        assert!(warning.message.contains("quotaExceeded"));
    }
}
