use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain node request failed: {0}")]
    Transport(String),

    #[error("invalid status {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("failed to decode chain node response: {0}")]
    Decode(String),

    #[error("invalid chain client config: {0}")]
    Config(String),
}

impl ChainError {
    /// Whether the request that produced this error is worth repeating.
    ///
    /// Transport failures, rate limiting and server errors are transient;
    /// other statuses and malformed payloads are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChainError::Transport(_) => true,
            ChainError::BadStatus { status, .. } => *status == 429 || *status >= 500,
            ChainError::Decode(_) | ChainError::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(ChainError::Transport("reset".into()).is_retryable());
        assert!(ChainError::BadStatus { status: 503, url: "u".into() }.is_retryable());
        assert!(ChainError::BadStatus { status: 429, url: "u".into() }.is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!ChainError::BadStatus { status: 404, url: "u".into() }.is_retryable());
        assert!(!ChainError::Decode("bad json".into()).is_retryable());
    }
}
