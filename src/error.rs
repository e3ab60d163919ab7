use thiserror::Error;

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The body was not JSON at all.
    #[error("response body is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
    /// A literal `null` body. Reading fields off it fails the same way an
    /// unreachable server does.
    #[error("response body is null")]
    NullBody,
    /// JSON, but not the shape the endpoint documents.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Transport failures and unparseable bodies both mean the server could
    /// not be reached in any useful way.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode(_) | Self::NullBody)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("unsupported locale {0:?} (expected \"vi\" or \"en\")")]
    InvalidLocale(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_count_as_network_failures() {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ClientError::Decode(err);
        assert!(err.is_network());
        assert!(format!("{err}").contains("not JSON"));

        let err = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        assert!(!ClientError::UnexpectedShape(err).is_network());
        assert!(ClientError::NullBody.is_network());
    }
}
