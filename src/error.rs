/// Error types for the ipregion library
use std::fmt;

/// Result type alias for ipregion operations
pub type Result<T> = std::result::Result<T, IpRegionError>;

/// Main error type for ipregion operations
///
/// Only the offline compiler and artifact store surface errors; the query
/// path absorbs all faults and resolves to empty results instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpRegionError {
    /// Malformed source row (bad IP syntax, inverted range)
    InvalidRow(String),

    /// I/O errors
    Io(String),

    /// Upstream dataset fetch errors
    Fetch(String),

    /// Format/encoding errors
    Format(String),

    /// Resource limit exceeded (e.g., more than 65536 strings or triples)
    ResourceLimitExceeded(String),

    /// General errors
    Other(String),
}

impl fmt::Display for IpRegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpRegionError::InvalidRow(msg) => write!(f, "Invalid source row: {}", msg),
            IpRegionError::Io(msg) => write!(f, "I/O error: {}", msg),
            IpRegionError::Fetch(msg) => write!(f, "Fetch error: {}", msg),
            IpRegionError::Format(msg) => write!(f, "Format error: {}", msg),
            IpRegionError::ResourceLimitExceeded(msg) => {
                write!(f, "Resource limit exceeded: {}", msg)
            }
            IpRegionError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for IpRegionError {}

impl From<std::io::Error> for IpRegionError {
    fn from(err: std::io::Error) -> Self {
        IpRegionError::Io(err.to_string())
    }
}

impl From<String> for IpRegionError {
    fn from(msg: String) -> Self {
        IpRegionError::Other(msg)
    }
}

impl From<&str> for IpRegionError {
    fn from(msg: &str) -> Self {
        IpRegionError::Other(msg.to_string())
    }
}
