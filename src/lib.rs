//! Embeddable HTTP transport substrate.
//!
//! Two halves, usable independently:
//!
//! - A client transaction engine ([`HttpClient`]) that drives one
//!   request/response exchange end to end: connect, send, then a timed
//!   read loop that feeds an incremental parser until a complete response
//!   is assembled or the deadline forces an abort.
//! - A server-side dispatcher ([`RestServer`], [`RestDispatcher`]) that
//!   routes incoming requests to registered services by URL pattern,
//!   first match wins.
//!
//! No web framework, no TLS, no connection reuse: one socket, one
//! exchange, one outcome.

// Core subsystems
pub mod client;
pub mod http;
pub mod routing;
pub mod server;
pub mod transport;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;

pub use crate::client::HttpClient;
pub use crate::config::Config;
pub use crate::error::ClientError;
pub use crate::http::{HttpRequest, HttpResponse};
pub use crate::routing::{RestDispatcher, Service, ServiceRegistry};
pub use crate::server::RestServer;
