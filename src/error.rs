//! Error types shared by the decoder, pipeline and scanners.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Input is empty")]
    EmptyInput,

    #[error("Encoding {name} cannot be used for {operation}")]
    UnsupportedEncoding {
        name: String,
        operation: &'static str,
    },

    #[error("Line break is unknown, classify the input first")]
    InvalidLineBreak,

    #[error("Unknown sample: {0}")]
    UnknownSample(String),

    #[error("Scan task failed: {0}")]
    TaskFailed(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
