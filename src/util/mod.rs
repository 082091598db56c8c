//! Utility modules for tracelink
//!
//! This module provides cross-cutting helpers:
//! - Structured logging setup and configuration
//! - Dotted version ordering for framework bundle directories

pub mod logging;
pub mod version;

// Re-export commonly used items
pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
pub use version::Version;
