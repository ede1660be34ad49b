use std::io;
use std::path::PathBuf;

use lantern::error::ServeError;
use lantern::http::response::{Response, ResponseBuilder, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(
        StatusCode::PayloadTooLarge.reason_phrase(),
        "Payload Too Large"
    );
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_response_builder_auto_headers() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    assert_eq!(response.header("Content-Length"), Some("16"));
    assert_eq!(response.header("Connection"), Some("close"));
}

#[test]
fn test_response_builder_preserves_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.header("Content-Length"), Some("999"));
    assert_eq!(response.headers.len(), 2);
}

#[test]
fn test_response_builder_keeps_insertion_order() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("X-First", "1")
        .header("X-Second", "2")
        .body(b"{}".to_vec())
        .build();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        ["Content-Type", "X-First", "X-Second", "Content-Length", "Connection"]
    );
}

#[test]
fn test_response_builder_replaces_header_in_place() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Other", "x")
        .header("content-type", "text/html")
        .build();

    assert_eq!(response.headers[0], ("Content-Type".to_string(), "text/html".to_string()));
    assert_eq!(response.header("Content-Type"), Some("text/html"));
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok(b"<html>hi</html>".to_vec(), "text/html");

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("text/html"));
    assert_eq!(response.body, b"<html>hi</html>".to_vec());
}

#[test]
fn test_response_not_found_helper() {
    let response = Response::not_found();

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.body, b"Content not found!".to_vec());
    assert_eq!(response.header("Content-Type"), None);
}

#[test]
fn test_response_method_not_allowed_helper() {
    let response = Response::method_not_allowed();

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.body, b"You can not do that on this server!".to_vec());
}

#[test]
fn test_response_for_error_covers_every_kind() {
    let cases = [
        (ServeError::MalformedRequest("GET /".into()), StatusCode::BadRequest),
        (ServeError::UnsupportedMethod("POST".into()), StatusCode::MethodNotAllowed),
        (ServeError::PathTraversal("/../x".into()), StatusCode::NotFound),
        (ServeError::NotFound("/missing".into()), StatusCode::NotFound),
        (
            ServeError::IoFailure {
                path: PathBuf::from("/srv/locked"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
            StatusCode::NotFound,
        ),
        (ServeError::RequestTooLarge { limit: 8192 }, StatusCode::PayloadTooLarge),
    ];

    for (err, expected) in cases {
        let response = Response::for_error(&err);
        assert_eq!(response.status, expected, "{err}");
    }
}

#[test]
fn test_response_for_error_404_body() {
    let response = Response::for_error(&ServeError::PathTraversal("/../etc/passwd".into()));

    assert_eq!(response.body, b"Content not found!".to_vec());
}

#[test]
fn test_bad_request_and_too_large_helpers() {
    let response = Response::bad_request();
    assert_eq!(response.status, StatusCode::BadRequest);
    assert_eq!(response.body, b"Malformed request!".to_vec());
    assert_eq!(response.header("Content-Type"), None);

    let response = Response::too_large();
    assert_eq!(response.status, StatusCode::PayloadTooLarge);
    assert_eq!(response.body, b"Request too large!".to_vec());
    assert_eq!(response.header("Content-Length"), Some("18"));
}
