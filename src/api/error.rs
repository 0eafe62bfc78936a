/// Network failures. Every variant carries only strings so results can cross
/// worker threads and be compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("request to {url} returned status {status}: {detail}")]
    Status {
        url: String,
        status: u16,
        detail: String,
    },
    #[error("request to {url} was rejected: {message}")]
    Rejected { url: String, message: String },
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("failed to encode request for {url}: {message}")]
    Encode { url: String, message: String },
}
