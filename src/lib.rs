//! Lantern - Static File Server
//!
//! Serves files and directory listings from a single document root over
//! plain HTTP/1.1, one connection at a time.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod site;
