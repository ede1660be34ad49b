//! Request-level error taxonomy.
//!
//! Everything that can go wrong between reading a header block and loading
//! content is one of these variants. The connection handler turns each one
//! into an HTTP response (see [`crate::http::response::Response::for_error`]),
//! so the set is closed on purpose.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Request line did not have exactly three tokens, or the header block
    /// could not be read as text.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Anything other than `GET`.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Canonical path lies outside the document root.
    #[error("path escapes document root: {0}")]
    PathTraversal(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The target exists but could not be opened, read or listed.
    #[error("failed to read {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Header block grew past the configured limit before `\r\n\r\n` showed up.
    #[error("request header block exceeds {limit} bytes")]
    RequestTooLarge { limit: usize },
}

pub type Result<T> = std::result::Result<T, ServeError>;
