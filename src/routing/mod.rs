//! URL-pattern routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming HttpRequest
//!     → dispatcher.rs (extract path from the request target)
//!     → registry.rs (first matching pattern wins, captures extracted)
//!     → Service::handle(method, body, captures)
//!     → HttpResponse (200 + JSON body, or 400)
//! ```
//!
//! # Design Decisions
//! - Ordered linear scan, not a trie: patterns may overlap
//!   (`/users/([0-9]+)` vs `/users/new`) and registration order is the
//!   only disambiguation signal the registering code controls
//! - Pattern compilation failures surface at registration time, never at
//!   dispatch time
//! - Registration requires `&mut`, so it provably ends before the
//!   registry is shared with running sessions

pub mod dispatcher;
pub mod registry;

pub use dispatcher::RestDispatcher;
pub use registry::{Service, ServiceRegistry};
