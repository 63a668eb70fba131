use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Cannot connect to server: {message}")]
    NetworkUnreachable { message: String },

    #[error("HTTP error! status: {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// Intentional cancellation; never surfaced to the user as a failure.
    #[error("Request aborted")]
    Aborted,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl DomainError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            message: message.into(),
        }
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// True for cancellations, which callers must treat as a no-op
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// HTTP status code, when the failure came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_mentions_status() {
        let error = DomainError::http(500, "Internal error");
        assert_eq!(
            error.to_string(),
            "HTTP error! status: 500: Internal error"
        );
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_network_error() {
        let error = DomainError::network("connection refused");
        assert_eq!(
            error.to_string(),
            "Cannot connect to server: connection refused"
        );
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_aborted_is_not_a_failure_kind() {
        assert!(DomainError::Aborted.is_aborted());
        assert!(!DomainError::decode("bad json").is_aborted());
    }
}
