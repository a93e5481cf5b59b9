//! The transaction engine: one request/response exchange per call.

use std::time::Duration;

use crate::client::deadline::{TimeoutGovernor, TxState};
use crate::error::ClientError;
use crate::http::parser::ResponseParser;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{self, Connection};

/// Read deadline applied when the caller sets none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Receive buffer size applied when the caller overrides none.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Asynchronous HTTP client driving one transaction at a time.
///
/// A transaction runs connect → send → timed read loop, strictly in that
/// order, and terminates exactly once: with a response, with a recorded
/// [`ClientError`], or with both the error and the
/// [`timed_out`](Self::timed_out) flag when the deadline expired first.
///
/// The receive buffer is owned by the engine and reused across
/// transactions; concurrent requests need independent engine instances.
pub struct HttpClient {
    timeout: Duration,
    buffer: Vec<u8>,
    timed_out: bool,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            buffer: vec![0; DEFAULT_BUFFER_SIZE],
            timed_out: false,
        }
    }

    /// Override the read deadline for subsequent transactions. Zero is
    /// ignored.
    pub fn set_timeout(&mut self, seconds: u64) {
        if seconds > 0 {
            self.timeout = Duration::from_secs(seconds);
        }
    }

    /// Whether the last failed transaction was aborted by the deadline.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Issue `request` and collect the response.
    ///
    /// The request must have its start line composed
    /// ([`HttpRequest::make_start_line`]). `buffer_size` overrides the
    /// receive buffer size for this transaction; the buffer is resized
    /// only when the override differs from its current size.
    ///
    /// Failures are terminal and never retried here; on `Err`, inspect
    /// [`timed_out`](Self::timed_out) to tell a deadline abort from a
    /// transport fault.
    pub async fn request(
        &mut self,
        request: &HttpRequest,
        buffer_size: Option<usize>,
    ) -> Result<HttpResponse, ClientError> {
        self.timed_out = false;
        if let Some(size) = buffer_size {
            if size > 0 && size != self.buffer.len() {
                self.buffer.resize(size, 0);
            }
        }

        let mut connection = self.connect(request).await?;

        if let Err(error) = connection.write_chunks(&request.wire_chunks()).await {
            tracing::error!(error = %error, "socket write error");
            let _ = connection.shutdown().await;
            return Err(ClientError::SocketWrite);
        }
        tracing::debug!(method = %request.method(), target = request.target(), "request sent");

        self.read_response(connection).await
    }

    async fn connect(&self, request: &HttpRequest) -> Result<Connection, ClientError> {
        let host = request.host();
        let port = request.port_or_default();

        let endpoints = match transport::resolve(host, port).await {
            Ok(endpoints) if !endpoints.is_empty() => endpoints,
            Ok(_) => {
                tracing::error!(host, port, "host resolved to no endpoints");
                return Err(ClientError::HostResolve);
            }
            Err(error) => {
                tracing::error!(host, port, error = %error, "host resolve error");
                return Err(ClientError::HostResolve);
            }
        };

        match transport::connect(&endpoints).await {
            Ok(connection) => Ok(connection),
            Err(error) => {
                tracing::error!(host, port, error = %error, "endpoint connect error");
                Err(ClientError::EndpointConnect)
            }
        }
    }

    /// The read loop: one outstanding read at a time, racing the deadline.
    /// Bytes are fed to the parser in arrival order; the loop ends when
    /// the parser finishes, the transport fails, or the governor trips.
    async fn read_response(
        &mut self,
        mut connection: Connection,
    ) -> Result<HttpResponse, ClientError> {
        tracing::debug!(timeout_secs = self.timeout.as_secs(), "reading response");

        let tx = TxState::new();
        let governor = TimeoutGovernor::arm(self.timeout, tx.clone());
        let mut parser = ResponseParser::new();
        let mut response = None;

        while !tx.is_stopped() {
            tokio::select! {
                _ = tx.aborted() => break,
                read = connection.read_some(&mut self.buffer) => match read {
                    Ok(0) => {
                        tracing::error!("peer closed before the response completed");
                        tx.stop(Some(ClientError::SocketRead), false);
                    }
                    Err(error) => {
                        tracing::error!(error = %error, "socket read error");
                        tx.stop(Some(ClientError::SocketRead), false);
                    }
                    Ok(length) => {
                        tracing::trace!(length, "read data");
                        match parser.feed(&self.buffer[..length]) {
                            Err(error) => {
                                tracing::error!(error = %error, "failed to parse HTTP response");
                                tx.stop(Some(ClientError::Http), false);
                            }
                            Ok(()) => {
                                // Stop reading as soon as the message is
                                // complete; some servers block an extra read.
                                if parser.finished() && tx.stop(None, false) {
                                    response = Some(parser.take_response());
                                }
                            }
                        }
                    }
                }
            }
        }

        governor.disarm();
        let _ = connection.shutdown().await;
        self.timed_out = tx.timed_out();

        match (tx.outcome(), response) {
            (Some(error), _) => Err(error),
            (None, Some(response)) => Ok(response),
            // A winning stop without an outcome always carries a response.
            (None, None) => Err(ClientError::SocketRead),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
