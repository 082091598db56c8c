//! Trace database data model
//!
//! A trace database is the parsed record of every target a configured CMake
//! project declares, keyed by target name. It is produced elsewhere (by
//! running CMake and parsing its trace output) and consumed read-only by the
//! resolver.

pub mod types;

pub use types::{BuildTargetId, CMakeTarget, TraceDatabase, TraceError};
pub use types::get_config_declined_property;
