//! # console-dns
//!
//! Command-line entry point for the console-dns authoritative server.
//!
//! ## Features
//!
//! - **TOML config** with command-line and environment overrides
//! - **Durable cache** so a restart serves the last known zones
//! - **Structured logs** via `tracing`, filtered by `RUST_LOG` or `--log`

pub mod cli;
pub mod logging;

pub use cli::run;
