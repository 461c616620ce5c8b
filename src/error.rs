//! Error types for the farmhand client.

/// Failures produced by the request gateway.
///
/// Every transport problem is normalized into one of these before it
/// reaches a feature controller; the gateway never panics past its
/// boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The request never received a response (DNS, connect, timeout).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The backend answered with a non-2xx status.
    #[error("server error {status}: {detail}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, or the raw body.
        detail: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Failures acquiring device coordinates.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    /// The user (or platform policy) denied the location request.
    #[error("location access denied: {0}")]
    Denied(String),

    /// No location capability is available on this device.
    #[error("location unsupported: {0}")]
    Unsupported(String),
}

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Gateway request failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Location acquisition failure.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// Blank query or missing file, rejected before any network call.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ClientError>;
