//! Client transaction engine.
//!
//! # Data Flow
//! ```text
//! caller
//!     → HttpClient::request
//!     → transport (resolve, connect, write)
//!     → read loop ── races ── TimeoutGovernor
//!     → ResponseParser
//!     → HttpResponse or ClientError back to the caller
//! ```
//!
//! # Design Decisions
//! - One engine instance drives one transaction at a time; concurrent
//!   transactions need independent instances
//! - The deadline governs only the read phase; connect and send block
//!   without a timer, as their failure modes are prompt
//! - Termination is first-writer-wins: whichever of the timer or the read
//!   path stops the transaction first decides the outcome, the loser is a
//!   no-op

pub(crate) mod deadline;
mod engine;

pub use engine::{HttpClient, DEFAULT_BUFFER_SIZE, DEFAULT_TIMEOUT_SECS};
