use thiserror::Error;

/// Errors surfaced by the connection broker and the tenant aggregator.
///
/// The taxonomy is deliberately coarse: callers branch on the *kind* of
/// failure (credentials, remote status, transport, anything else), never on
/// the underlying cloud library's own error types. Not-found classification
/// goes through [`is_not_found`](Self::is_not_found) so the aggregator can
/// recover from it without knowing where the status came from.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// Credentials failed local validation; no connection attempt was made.
    ///
    /// The payload is the full user-facing message. Its wording is stable
    /// and callers may display it verbatim.
    #[error("{0}")]
    CredentialsRejected(String),

    /// The control plane answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: http::StatusCode,
        message: String,
    },

    /// Transport error (network, connection, TLS).
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Any other failure reported by the underlying cloud library, wrapped
    /// into one uniform category carrying the original message.
    #[error("API request error: {0}")]
    Request(String),

    /// An entity in an accessor result did not have the expected shape.
    #[error("Invalid response: {reason}")]
    InvalidResponse { reason: String },

    /// Handle construction failed before any connection was attempted.
    #[error("Invalid handle configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a [`Status`](Self::Status) error from a raw status code.
    ///
    /// Codes outside the valid HTTP range are folded into
    /// [`Request`](Self::Request) rather than rejected, since they can only
    /// come from a misbehaving backend and the caller still wants the
    /// message.
    #[must_use]
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match http::StatusCode::from_u16(code) {
            Ok(status) => Self::Status { status, message },
            Err(_) => Self::Request(message),
        }
    }

    /// Uniform wrap for failures without a usable status code.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    /// Malformed-entity error raised during aggregation.
    #[must_use]
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Whether this error is a not-found answer from the control plane.
    ///
    /// This is the only error class the aggregator recovers from; every
    /// other kind aborts the operation.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. } if *status == http::StatusCode::NOT_FOUND
        )
    }

    /// Whether this error was produced by local credential validation.
    #[must_use]
    pub fn is_credentials_rejected(&self) -> bool {
        matches!(self, Self::CredentialsRejected(_))
    }
}
