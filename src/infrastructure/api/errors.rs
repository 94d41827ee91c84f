use thiserror::Error;

/// Failures surfaced by [super::ApiClient]. Call sites branch on the variants
/// the UI treats differently; everything else degrades to a generic notice.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the request as unauthenticated. The client has
    /// already signed the session out and navigated to the login route by the
    /// time a caller sees this. Carries the backend's detail so credential
    /// failures on the login form still show the real reason.
    #[error("{0}")]
    Unauthorized(String),

    /// HTTP 429 on chat. Carries the backend's detail message.
    #[error("{0}")]
    RateLimited(String),

    /// Any other non-2xx response.
    #[error("Request failed with status {status}: {detail}")]
    Api { status: u16, detail: String },

    /// Network-level failure before a response arrived.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
