#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to encode panel state {path}: {source}")]
    EncodeState {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write panel state {path}: {source}")]
    WriteState {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
