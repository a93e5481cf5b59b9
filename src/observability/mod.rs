//! Observability subsystem. Library code only emits `tracing` events; the
//! subscriber is installed by whoever owns `main`.

pub mod logging;
