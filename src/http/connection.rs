use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::ServeError;
use crate::http::parser::{find_headers_end, parse_request, HEADER_TERMINATOR};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::site::{load, resolve, DocumentRoot, ResolvedTarget};

/// Size of a single read off the socket.
const READ_CHUNK: usize = 1024;

/// Per-connection limits, copied out of [`ServerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub max_header_bytes: usize,
    pub read_timeout: Duration,
}

impl From<&ServerConfig> for ConnectionSettings {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            max_header_bytes: cfg.max_header_bytes,
            read_timeout: cfg.read_timeout(),
        }
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    root: DocumentRoot,
    settings: ConnectionSettings,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingHeaders,
    Parsing(BytesMut),
    Resolving(Request),
    Loading(Request, ResolvedTarget),
    Responding(ResponseWriter),
    Closed,
}

enum HeaderRead {
    Complete(BytesMut),
    TooLarge,
    Disconnected,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, root: DocumentRoot, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            root,
            settings,
            state: ConnectionState::AwaitingHeaders,
        }
    }

    /// Drives one request/response exchange and closes the stream.
    ///
    /// Request-level failures become error responses. Socket failures are
    /// returned, and the stream is dropped with `self` either way.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitingHeaders => {
                    let read_timeout = self.settings.read_timeout;

                    match timeout(read_timeout, self.read_headers()).await {
                        Ok(Ok(HeaderRead::Complete(block))) => ConnectionState::Parsing(block),
                        Ok(Ok(HeaderRead::TooLarge)) => {
                            let limit = self.settings.max_header_bytes;
                            self.reject(None, &ServeError::RequestTooLarge { limit })
                        }
                        Ok(Ok(HeaderRead::Disconnected)) => {
                            debug!("Client closed before completing the header block");
                            ConnectionState::Closed
                        }
                        Ok(Err(e)) => return Err(e),
                        Err(_) => {
                            warn!(timeout = ?read_timeout, "Timed out waiting for request headers");
                            ConnectionState::Closed
                        }
                    }
                }

                ConnectionState::Parsing(block) => {
                    let parsed = std::str::from_utf8(&block)
                        .map_err(|_| {
                            ServeError::MalformedRequest("header block is not valid UTF-8".into())
                        })
                        .and_then(parse_request);

                    match parsed {
                        Ok(request) => ConnectionState::Resolving(request),
                        Err(e) => self.reject(None, &e),
                    }
                }

                ConnectionState::Resolving(request) => {
                    match resolve(&self.root, &request.path).await {
                        Ok(target) => ConnectionState::Loading(request, target),
                        Err(e) => self.reject(Some(&request), &e),
                    }
                }

                ConnectionState::Loading(request, target) => match load(&target).await {
                    Ok(payload) => {
                        let response = Response::ok(payload.body, payload.mime_type);
                        self.respond(Some(&request), response)
                    }
                    Err(e) => self.reject(Some(&request), &e),
                },

                ConnectionState::Responding(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        // The peer may already be gone, nothing left to tell it
        if let Err(e) = self.stream.shutdown().await {
            debug!(error = %e, "Stream shutdown failed");
        }

        Ok(())
    }

    /// Reads until the buffer holds a full header block.
    async fn read_headers(&mut self) -> anyhow::Result<HeaderRead> {
        let limit = self.settings.max_header_bytes;
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            // The terminator can straddle two reads
            let scan_from = self
                .buffer
                .len()
                .saturating_sub(HEADER_TERMINATOR.len() - 1);

            let n = self.stream.read(&mut chunk).await?;

            if n == 0 {
                return Ok(HeaderRead::Disconnected);
            }

            self.buffer.extend_from_slice(&chunk[..n]);

            if let Some(pos) = find_headers_end(&self.buffer[scan_from..]) {
                let end = scan_from + pos + HEADER_TERMINATOR.len();

                if end > limit {
                    return Ok(HeaderRead::TooLarge);
                }
                return Ok(HeaderRead::Complete(self.buffer.split_to(end)));
            }

            if self.buffer.len() >= limit {
                return Ok(HeaderRead::TooLarge);
            }
        }
    }

    fn reject(&self, request: Option<&Request>, err: &ServeError) -> ConnectionState {
        match err {
            ServeError::IoFailure { .. } => warn!(error = %err, "Failed to load content"),
            _ => debug!(error = %err, "Request rejected"),
        }

        self.respond(request, Response::for_error(err))
    }

    fn respond(&self, request: Option<&Request>, response: Response) -> ConnectionState {
        let (method, path) = request
            .map(|r| (r.method.as_str(), r.path.as_str()))
            .unwrap_or(("-", "-"));

        info!(
            method,
            path,
            status = response.status.as_u16(),
            bytes = response.body.len(),
            "Served request"
        );

        ConnectionState::Responding(ResponseWriter::new(&response))
    }
}
