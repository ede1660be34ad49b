//! Accept loop and listening socket.

pub mod listener;

pub use listener::{run, Server};
