//! Threatlens Core - Shared data structures and infrastructure
//!
//! This crate defines the data types, error handling, configuration and
//! logging bootstrap shared by the rest of the threatlens system.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
