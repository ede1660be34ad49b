/// The only method this server answers.
pub const GET: &str = "GET";

/// Represents a parsed HTTP request line from a client.
///
/// Built once by [`crate::http::parser::parse_request`] and never mutated
/// afterwards. `method` is always `GET` by the time a `Request` exists, since
/// anything else is rejected during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: String,
    /// Request path as sent on the wire, still percent-encoded, with any
    /// query string or fragment removed. Always starts with `/`.
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
}
