//! Trace target resolution
//!
//! The resolver turns one CMake target name into the complete, ordered set
//! of compiler flags, linker flags, include paths and host-built target
//! references a consumer needs, replicating CMake's transitive
//! usage-requirement semantics.

pub mod classify;
pub mod resolve;

pub use classify::{classify_external_reference, resolve_cmake_lib, Classification};
pub use resolve::{resolve_trace_targets, ResolveOptions, ResolvedTarget};
