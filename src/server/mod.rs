//! REST server: accept loop and per-connection sessions.
//!
//! # Responsibilities
//! - Accept connections and hand each to its own task
//! - Read one request through the incremental parser
//! - Dispatch to the registered services and write the response
//!
//! # Design Decisions
//! - One exchange per connection; there is no keep-alive reuse
//! - All services are registered before `run` consumes the server, so
//!   sessions share an immutable dispatcher without locking

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::http::parser::RequestParser;
use crate::http::HttpResponse;
use crate::routing::{RestDispatcher, Service};

/// Requests larger than this are dropped without a response.
const MAX_REQUEST_BYTES: usize = 1024 * 1024;

const READ_BUFFER_SIZE: usize = 1024;

/// A registry-backed HTTP server. Register services, bind a listener,
/// then [`run`](Self::run).
#[derive(Default)]
pub struct RestServer {
    dispatcher: RestDispatcher,
}

impl RestServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under `pattern`; false if the pattern does not
    /// compile. Registration order is the match-priority order.
    pub fn register_service(&mut self, service: Arc<dyn Service>, pattern: &str) -> bool {
        self.dispatcher.register_service(service, pattern)
    }

    /// Accept connections on `listener` until the listener fails.
    pub async fn run(self, listener: TcpListener) -> io::Result<()> {
        let address = listener.local_addr()?;
        tracing::info!(address = %address, "REST server listening");

        let dispatcher = Arc::new(self.dispatcher);
        loop {
            let (stream, peer) = listener.accept().await?;
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                if let Err(error) = serve_connection(dispatcher, stream, peer).await {
                    tracing::warn!(peer = %peer, error = %error, "session ended with error");
                }
            });
        }
    }
}

async fn serve_connection(
    dispatcher: Arc<RestDispatcher>,
    mut stream: TcpStream,
    peer: SocketAddr,
) -> io::Result<()> {
    let mut parser = RequestParser::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let mut received = 0;

    let request = loop {
        let length = stream.read(&mut buffer).await?;
        if length == 0 {
            // Peer went away before completing a request.
            return Ok(());
        }
        received += length;
        if received > MAX_REQUEST_BYTES {
            tracing::warn!(peer = %peer, received, "dropping oversized request");
            return Ok(());
        }

        match parser.feed(&buffer[..length]) {
            Ok(()) => {
                if parser.finished() {
                    break parser.take_request();
                }
            }
            Err(error) => {
                tracing::warn!(peer = %peer, error = %error, "malformed request");
                return write_response(&mut stream, &HttpResponse::empty(StatusCode::BAD_REQUEST))
                    .await;
            }
        }
    };

    tracing::debug!(
        peer = %peer,
        method = %request.method(),
        target = request.target(),
        "dispatching request"
    );

    let response = dispatcher.dispatch(&request);

    tracing::debug!(peer = %peer, status = %response.status(), "sending response");
    write_response(&mut stream, &response).await
}

async fn write_response(stream: &mut TcpStream, response: &HttpResponse) -> io::Result<()> {
    for chunk in response.wire_chunks() {
        stream.write_all(chunk).await?;
    }
    stream.flush().await?;
    stream.shutdown().await
}
