//! Structured logging vocabulary.
//!
//! Library code only emits `tracing` events; subscribers are installed by binaries and
//! tests at process boundaries.

pub mod events;
pub mod fields;
