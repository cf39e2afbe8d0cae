use thiserror::Error;

#[derive(Error, Debug)]
pub enum BvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    #[error("Invalid segment data: {0}")]
    InvalidSegment(String),

    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },

    #[error("Context error: {0}")]
    ContextError(String),
}

pub type BvResult<T> = Result<T, BvError>;
