use crate::error::{Result, ServeError};
use crate::http::request::{Request, GET};

/// Byte sequence that terminates the header block.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Parses the text of a complete header block into a [`Request`].
///
/// Only the request line is read. Header lines are skipped whatever their
/// shape. The request line must split on single spaces into exactly three
/// non-empty tokens. The token count is checked before the method, so
/// `POST /` is malformed while `POST / HTTP/1.1` is an unsupported method.
pub fn parse_request(header_text: &str) -> Result<Request> {
    let request_line = header_text.split("\r\n").next().unwrap_or_default();
    let parts: Vec<&str> = request_line.split(' ').collect();

    let &[method, target, version] = parts.as_slice() else {
        return Err(ServeError::MalformedRequest(request_line.to_string()));
    };

    if method.is_empty() || target.is_empty() || version.is_empty() {
        return Err(ServeError::MalformedRequest(request_line.to_string()));
    }

    if method != GET {
        return Err(ServeError::UnsupportedMethod(method.to_string()));
    }

    if !target.starts_with('/') {
        return Err(ServeError::MalformedRequest(request_line.to_string()));
    }

    // Drop query string and fragment, nothing downstream looks at them
    let path = target
        .split(['?', '#'])
        .next()
        .unwrap_or(target);

    Ok(Request {
        method: method.to_string(),
        path: path.to_string(),
        version: version.to_string(),
    })
}

/// Index of the first `\r\n\r\n` in `buf`, if the header block is complete.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request(req).unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.version, "HTTP/1.1");
    }

    #[test]
    fn headers_end_points_at_terminator() {
        let buf = b"GET / HTTP/1.1\r\n\r\nbody";
        assert_eq!(find_headers_end(buf), Some(14));
        assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n"), None);
    }
}
