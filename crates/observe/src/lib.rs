//! Logging initialization shared by the binaries: a `tracing` subscriber
//! configured from the command line and a panic hook that reports through it.
pub mod config;
pub mod tracing;

pub use config::Config;
