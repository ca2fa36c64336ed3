use thiserror::Error;

/// Errors produced by the case finder
#[derive(Debug, Error)]
pub enum CaseFinderError {
    /// The case number is already present in the list
    #[error("Case number '{0}' is already in the list")]
    AlreadyExists(String),

    /// There is no page to send a message to
    #[error("No active page to message")]
    NoActiveSurface,

    /// The page did not accept or answer a message
    #[error("Page channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The key-value store could not be read or written
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// The case list has not been loaded yet
    #[error("Case list is not loaded")]
    NotReady,

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CaseFinderError {
    /// Whether the failure only degrades the session instead of rejecting the request
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            CaseFinderError::NoActiveSurface
                | CaseFinderError::ChannelUnavailable(_)
                | CaseFinderError::PersistenceUnavailable(_)
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CaseFinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CaseFinderError::AlreadyExists("X-1".to_string());
        assert_eq!(err.to_string(), "Case number 'X-1' is already in the list");

        let err = CaseFinderError::ChannelUnavailable("receiver dropped".to_string());
        assert_eq!(err.to_string(), "Page channel unavailable: receiver dropped");
    }

    #[test]
    fn test_degradation_classification() {
        assert!(CaseFinderError::NoActiveSurface.is_degradation());
        assert!(CaseFinderError::PersistenceUnavailable("disk".into()).is_degradation());
        assert!(!CaseFinderError::AlreadyExists("A".into()).is_degradation());
        assert!(!CaseFinderError::NotReady.is_degradation());
    }

    #[test]
    fn test_from_serde_error() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: CaseFinderError = parse.unwrap_err().into();
        assert!(matches!(err, CaseFinderError::Serialization(_)));
    }
}
