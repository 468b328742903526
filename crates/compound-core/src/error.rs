//! Error types for compound search.

use std::fmt;

/// The main error type for compound search operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The caller supplied zero identifiers. No session was opened.
    EmptyInput,

    /// Credentials are missing or malformed, or the database could not be reached
    Connection(String),

    /// The engine rejected or failed the combined query
    Query(String),

    /// Query shape or batching configuration is unusable
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "Empty input: at least one identifier is required"),
            Error::Connection(msg) => write!(f, "Connection error: {}", msg),
            Error::Query(msg) => write!(f, "Query error: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for compound search operations.
pub type Result<T> = std::result::Result<T, Error>;
