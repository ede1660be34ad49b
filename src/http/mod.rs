//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to answer one `GET` per connection. No library
//! parses HTTP here.
//!
//! # Architecture
//!
//! - **`connection`**: The connection handler implementing the request-response state machine
//! - **`parser`**: Finds the end of the header block and parses the request line
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingHeaders  │ ← Read until \r\n\r\n (size and time bounded)
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Parsing      │ ← Request line, GET only
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Resolving     │ ← Canonical path inside the document root
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Loading      │ ← File bytes or directory listing
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Responding    │ ← Every failure above lands here too,
//!        └──────┬───────────┘   as a 400/404/405/413
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
