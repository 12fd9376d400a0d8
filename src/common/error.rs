//! Error types for bucketprops

use std::convert::Infallible;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Property Errors ===
    #[error("Invalid quorum value: {0}")]
    InvalidQuorum(String),

    #[error("Malformed commit hook: {0}")]
    MalformedHook(String),

    // === Response Errors ===
    #[error("Unexpected content type: expected {expected}, got {actual}")]
    UnexpectedContentType { expected: String, actual: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Network Errors ===
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Server error {code}: {message}")]
    Server { code: u32, message: String },

    #[error("Operation timeout: {0}")]
    Timeout(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else {
            Error::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedResponse(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

// Lets infallible conversions (e.g. `QuorumPolicy -> QuorumValue`) flow
// through the same setters as the validated ones.
impl From<Infallible> for Error {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}
