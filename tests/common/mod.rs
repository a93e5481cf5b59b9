//! Shared scripted backends for integration tests.
//!
//! Every backend binds an ephemeral port and returns the bound address, so
//! tests never collide.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedSender;

/// Bind an ephemeral listener and hand each accepted connection to `serve`.
async fn start_backend<F, Fut>(serve: F) -> SocketAddr
where
    F: Fn(TcpStream) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let serve = Arc::new(serve);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let serve = serve.clone();
                    tokio::spawn(async move { serve(socket).await });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read until the blank line ending the request head (the request body, if
/// any, is irrelevant to these backends).
pub async fn drain_request(socket: &mut TcpStream) {
    let mut buffer = [0u8; 1024];
    let mut head = Vec::new();
    loop {
        match socket.read(&mut buffer).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                head.extend_from_slice(&buffer[..n]);
                if head.windows(4).any(|window| window == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

/// A backend that answers every request with `200 OK` and `body`.
pub async fn start_mock_backend(body: &'static str) -> SocketAddr {
    start_backend(move |mut socket| async move {
        drain_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    })
    .await
}

/// A backend that writes `raw` verbatim and closes.
#[allow(dead_code)]
pub async fn start_raw_backend(raw: &'static [u8]) -> SocketAddr {
    start_backend(move |mut socket| async move {
        drain_request(&mut socket).await;
        let _ = socket.write_all(raw).await;
        let _ = socket.shutdown().await;
    })
    .await
}

/// A backend that writes the response in two chunks with a pause between,
/// forcing the client to reassemble across reads.
#[allow(dead_code)]
pub async fn start_split_backend(
    first: &'static [u8],
    second: &'static [u8],
    gap: Duration,
) -> SocketAddr {
    start_backend(move |mut socket| async move {
        drain_request(&mut socket).await;
        let _ = socket.write_all(first).await;
        let _ = socket.flush().await;
        tokio::time::sleep(gap).await;
        let _ = socket.write_all(second).await;
        let _ = socket.shutdown().await;
    })
    .await
}

/// A backend that never responds. It keeps reading and signals on
/// `closed` once the peer closes the connection.
#[allow(dead_code)]
pub async fn start_silent_backend(closed: UnboundedSender<()>) -> SocketAddr {
    start_backend(move |mut socket| {
        let closed = closed.clone();
        async move {
            let mut buffer = [0u8; 1024];
            loop {
                match socket.read(&mut buffer).await {
                    Ok(0) | Err(_) => {
                        let _ = closed.send(());
                        return;
                    }
                    Ok(_) => {}
                }
            }
        }
    })
    .await
}
