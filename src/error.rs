//! Client transaction outcome codes.

use thiserror::Error;

/// Why a client transaction did not succeed.
///
/// A failed [`request`](crate::HttpClient::request) records exactly one of
/// these; whether a `SocketRead` was caused by deadline expiry is reported
/// separately through [`timed_out`](crate::HttpClient::timed_out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The host name could not be resolved to any endpoint.
    #[error("host resolve error")]
    HostResolve,

    /// No resolved endpoint accepted the connection.
    #[error("endpoint connect error")]
    EndpointConnect,

    /// Writing the serialized request failed.
    #[error("socket write error")]
    SocketWrite,

    /// Reading the response failed, or the peer closed early.
    #[error("socket read error")]
    SocketRead,

    /// The response bytes did not parse as HTTP.
    #[error("malformed HTTP response")]
    Http,
}
