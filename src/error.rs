/// Boxed error produced by a [`Transport`](crate::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The request URL could not be parsed.
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// A configured header name or value is not valid on the wire.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
    /// Network or request execution error from the transport.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
    /// Any status code other than 200. The code itself is available through
    /// [`HttpRequest::last_response`](crate::HttpRequest::last_response).
    #[error("status code != 200")]
    NotOk,
    /// The response body could not be read to the end.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
    /// Invalid environment configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl HttpClientError {
    /// Whether the executor spends a retry on this error.
    ///
    /// Construction errors fail the same way on every attempt, so they abort
    /// immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NotOk | Self::Body(_))
    }

    /// Whether the failure was a transport timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(err) => err
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            Self::Body(err) => err.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpClientError;

    #[test]
    fn construction_errors_are_not_retryable() {
        let err = HttpClientError::InvalidUrl {
            url: "::".to_owned(),
            source: url::ParseError::RelativeUrlWithoutBase,
        };
        assert!(!err.is_retryable());

        let err = HttpClientError::InvalidHeader {
            name: "bad name".to_owned(),
            reason: "invalid HTTP header name".to_owned(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_and_status_errors_are_retryable() {
        assert!(HttpClientError::NotOk.is_retryable());
        assert!(HttpClientError::Transport("connection reset".into()).is_retryable());
        assert!(!HttpClientError::Transport("connection reset".into()).is_timeout());
    }

    #[test]
    fn not_ok_display_is_status_agnostic() {
        assert_eq!(HttpClientError::NotOk.to_string(), "status code != 200");
    }
}
