//! Core library for the DisasterNet message board client.
//!
//! Holds everything that does not touch the terminal: configuration,
//! logging setup, the HTTP backend, and the poll/send synchronization.

pub mod backend;
pub mod config;
pub mod logging;
pub mod sync;

pub use backend::{HttpBackend, MessageBackend};
pub use sync::Session;
