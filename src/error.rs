use thiserror::Error;

/// Rejected encoder configuration. No encoder is built when this is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("k-mer size must be greater than 3, got {0}")]
    WindowTooShort(usize),

    #[error("batch size must be at least 1")]
    EmptyBatch,
}

/// A window that contains a character outside `{A,C,G,T,a,c,g,t}`.
///
/// `position` is the absolute offset of the first offending byte the scan
/// met. It is not necessarily the leftmost one in the window, but every window
/// covering it is invalid too, so scanning may resume at `position + 1`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid base {:?} at position {position}", as_char(.base))]
pub struct InvalidWindow {
    pub position: usize,
    pub base: u8,
}

fn as_char(b: &u8) -> char {
    *b as char
}

#[derive(Debug, Error)]
pub enum CanonkeyError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CanonkeyError>;
