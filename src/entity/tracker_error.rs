#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No trading pairs found for {0}")]
    NoPairs(String),

    #[error("Snapshot is empty or not an array")]
    EmptySnapshot,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
