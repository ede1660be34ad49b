use crate::error::ServeError;

/// Body sent with every 404, whatever the underlying reason was.
pub const NOT_FOUND_BODY: &[u8] = b"Content not found!";
pub const METHOD_NOT_ALLOWED_BODY: &[u8] = b"You can not do that on this server!";
pub const BAD_REQUEST_BODY: &[u8] = b"Malformed request!";
pub const TOO_LARGE_BODY: &[u8] = b"Request too large!";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): Content served
/// - `BadRequest` (400): Malformed request line or undecodable header block
/// - `NotFound` (404): Missing, unreadable or out-of-root path
/// - `MethodNotAllowed` (405): Anything but GET
/// - `PayloadTooLarge` (413): Header block over the configured limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 413 Payload Too Large
    PayloadTooLarge,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::PayloadTooLarge => 413,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PayloadTooLarge => "Payload Too Large",
        }
    }
}

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep the order they were added in, which is also the order they
/// are written to the wire.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers as ordered name/value pairs
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/html")
///     .body(b"<html>hi</html>".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header, or replaces the value of one with the same name.
    ///
    /// Names compare case-insensitively. A replaced header keeps its
    /// original position.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size unless one was set, then
    /// `Connection: close` since every connection carries a single exchange.
    pub fn build(self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));

        let length = self.body.len().to_string();
        let builder = if has_length {
            self
        } else {
            self.header("Content-Length", length)
        };
        let builder = builder.header("Connection", "close");

        Response {
            status: builder.status,
            headers: builder.headers,
            body: builder.body,
        }
    }
}

impl Response {
    /// Builds a response with a `Content-Type` header and the given body.
    pub fn build(status: StatusCode, mime_type: &str, body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(status)
            .header("Content-Type", mime_type)
            .body(body.into())
            .build()
    }

    /// 200 OK carrying `body` as `mime_type`.
    pub fn ok(body: impl Into<Vec<u8>>, mime_type: &str) -> Self {
        Self::build(StatusCode::Ok, mime_type, body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::fixed(StatusCode::NotFound, NOT_FOUND_BODY)
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        Self::fixed(StatusCode::MethodNotAllowed, METHOD_NOT_ALLOWED_BODY)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::fixed(StatusCode::BadRequest, BAD_REQUEST_BODY)
    }

    /// Creates a 413 Payload Too Large response.
    pub fn too_large() -> Self {
        Self::fixed(StatusCode::PayloadTooLarge, TOO_LARGE_BODY)
    }

    /// Maps a request-level error onto the response the client sees.
    pub fn for_error(err: &ServeError) -> Self {
        match err {
            ServeError::MalformedRequest(_) => Self::bad_request(),
            ServeError::UnsupportedMethod(_) => Self::method_not_allowed(),
            ServeError::PathTraversal(_)
            | ServeError::NotFound(_)
            | ServeError::IoFailure { .. } => Self::not_found(),
            ServeError::RequestTooLarge { .. } => Self::too_large(),
        }
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn fixed(status: StatusCode, body: &[u8]) -> Self {
        ResponseBuilder::new(status).body(body.to_vec()).build()
    }
}
