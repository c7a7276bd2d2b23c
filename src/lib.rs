//! # ucsmkit
//!
//! Boot policy management against a UCS-style managed object store.
//!
//! ## Layout
//!
//! ```text
//! src
//! ├── boot -----------------> # Boot policies, boot order and boot security.
//! ├── cli.rs ---------------> # Command line definition.
//! ├── config.rs ------------> # Configuration file and device list loading.
//! ├── crud.rs --------------> # Generic CRUD helpers over a Handle.
//! ├── lib.rs ---------------> # This file.
//! ├── logging --------------> # Multi-sink logger and session log.
//! └── main.rs --------------> # Command line entry point.
//! ```

pub mod boot;
pub mod cli;
pub mod config;
pub mod crud;
mod logging;

pub use logging::{multilog::MultiLogger, session_log::SessionLog};

/// ucsmkit version as provided by environment variables at build time
pub const UCSMKIT_VERSION: &str = match option_env!("UCSMKIT_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
