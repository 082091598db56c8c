//! tracelink - CMake trace target resolution for host build systems
//!
//! This library integrates the trace of a configured CMake project into a host
//! build system's own target graph. Given one CMake target name it determines
//! every compiler flag, linker flag, include path, and cross-reference to a
//! locally-built target a consumer must apply to compile and link against it,
//! replicating CMake's transitive-dependency resolution closely enough that
//! generated build commands behave identically to a native CMake build.
//!
//! # Core Concepts
//!
//! - **Trace database**: the parsed record of every target and property a
//!   CMake project declares, keyed by target name. Producing it (running
//!   CMake, parsing its trace output) is the embedder's job; this crate only
//!   consumes it.
//! - **Resolution**: a worklist walk over transitive link dependencies that
//!   accumulates ordered flag and path lists. Library order is never sorted,
//!   because linker argument order is load-bearing.
//! - **External references**: names that are not targets - plain linker
//!   flags, absolute paths, macOS frameworks, or bare library names handed
//!   to a pluggable toolchain search.
//!
//! # Example Usage
//!
//! ```
//! use tracelink::{resolve_trace_targets, ResolveOptions, TraceDatabase};
//! use tracelink::trace::{BuildTargetId, CMakeTarget};
//!
//! let mut trace = TraceDatabase::new();
//! let mut tgt = CMakeTarget::new();
//! tgt.build_target = Some(BuildTargetId(0));
//! tgt.set_property("INTERFACE_INCLUDE_DIRECTORIES", ["/usr/include/foo"]);
//! tgt.set_property("LINK_LIBRARIES", ["z"]);
//! trace.insert("foo::foo", tgt);
//!
//! let resolved = resolve_trace_targets("foo::foo", &trace, &ResolveOptions::new());
//! assert_eq!(resolved.include_directories, ["/usr/include/foo"]);
//! assert_eq!(resolved.libraries, ["-lz"]);
//! ```
//!
//! # Project Structure
//!
//! - [`trace`]: trace database data model and configuration-declined lookups
//! - [`resolver`]: the worklist resolver and external reference classifier
//! - [`toolchain`]: the pluggable bare-library search capability
//! - [`framework`]: macOS framework bundle header probing

// Public modules
pub mod framework;
pub mod resolver;
pub mod toolchain;
pub mod trace;
pub mod util;

// Re-export key types for convenient access
pub use framework::framework_include_path;
pub use resolver::{resolve_cmake_lib, resolve_trace_targets, ResolveOptions, ResolvedTarget};
pub use toolchain::{DirectoryLibrarySearch, LibrarySearch, StaticLibrarySearch};
pub use trace::{BuildTargetId, CMakeTarget, TraceDatabase, TraceError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
