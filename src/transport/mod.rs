//! Raw socket primitives consumed by the client engine.
//!
//! # Responsibilities
//! - Resolve a host/port pair to concrete endpoints
//! - Establish a connection, trying each endpoint in order
//! - Full gather-list writes, single `read_some` reads
//! - Idempotent force-close, safe from any failure path

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};

/// Resolve `host:port` to endpoint candidates. An empty result is possible
/// and must be treated as a resolution failure by the caller.
pub async fn resolve(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    Ok(lookup_host((host, port)).await?.collect())
}

/// Connect to the first endpoint that accepts, in resolution order.
pub async fn connect(endpoints: &[SocketAddr]) -> io::Result<Connection> {
    let mut last_error = None;
    for endpoint in endpoints {
        match TcpStream::connect(endpoint).await {
            Ok(stream) => {
                tracing::debug!(peer = %endpoint, "socket connected");
                return Ok(Connection {
                    stream: Some(stream),
                });
            }
            Err(error) => {
                tracing::debug!(peer = %endpoint, error = %error, "connect attempt failed");
                last_error = Some(error);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "no endpoints to connect to")
    }))
}

/// One established connection. Closing is idempotent; every operation after
/// a close fails with `NotConnected`.
#[derive(Debug)]
pub struct Connection {
    stream: Option<TcpStream>,
}

impl Connection {
    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))
    }

    /// Write a gather list in full, then flush.
    pub async fn write_chunks(&mut self, chunks: &[&[u8]]) -> io::Result<()> {
        let stream = self.stream()?;
        for chunk in chunks {
            stream.write_all(chunk).await?;
        }
        stream.flush().await
    }

    /// One read; 0 means the peer closed.
    pub async fn read_some(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.stream()?.read(buffer).await
    }

    /// Force-close. Safe to call repeatedly and from any path.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        match self.stream.take() {
            Some(mut stream) => {
                tracing::debug!("closing socket");
                stream.shutdown().await
            }
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });

        let endpoints = resolve(&addr.ip().to_string(), addr.port()).await.unwrap();
        let mut connection = connect(&endpoints).await.unwrap();
        let _peer = accept.await.unwrap();

        assert!(!connection.is_closed());
        connection.shutdown().await.unwrap();
        assert!(connection.is_closed());
        // A second close is a quiet no-op.
        connection.shutdown().await.unwrap();

        // Operations after close fail cleanly instead of touching a dead
        // socket.
        let mut buffer = [0u8; 8];
        assert!(connection.read_some(&mut buffer).await.is_err());
        assert!(connection.write_chunks(&[&b"x"[..]]).await.is_err());
    }
}
