//! External reference classification
//!
//! Names encountered during traversal that are not CMake targets come in
//! four shapes, tried in order: a direct linker argument, an absolute path
//! that exists on disk (possibly into a macOS framework bundle), a bare
//! library name for the toolchain search, or nothing we can place. The rule
//! order is policy, not an accident of regex layout; reordering it changes
//! behavior.

use crate::toolchain::LibrarySearch;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Outcome of classifying a non-target reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Arguments to append to the library list, in this exact order
    LinkerArgs(Vec<String>),
    /// The reference matched no rule or the toolchain search came up empty
    Unresolved,
}

/// Converts a CMake library spec that is already known not to be a target
///
/// Link-library lists hold either files or library names, with or without a
/// `-l` prefix. Flag-shaped and path-shaped specs pass through; bare names
/// gain the prefix.
pub fn resolve_cmake_lib(lib: &str) -> String {
    if lib.starts_with('-') || lib.contains('/') || lib.contains('\\') {
        lib.to_string()
    } else {
        format!("-l{}", lib)
    }
}

/// Splits an absolute path into a framework's `-F`/`-framework` triple, or
/// `None` when no path segment is a framework bundle
///
/// CMake records frameworks as absolute paths reaching into the bundle, e.g.
/// `/S/L/F/CoreAudio.framework/Versions/A/CoreAudio.tbd`. Everything after
/// the `.framework` segment is sliced off; the bundle's parent becomes the
/// search path and its stem the framework name.
fn framework_triple(path: &Path) -> Option<Vec<String>> {
    if !path
        .components()
        .any(|c| matches!(c, Component::Normal(x) if x.to_string_lossy().ends_with(".framework")))
    {
        return None;
    }

    let mut bundle = PathBuf::new();
    for component in path.components() {
        bundle.push(component);
        if let Component::Normal(x) = component {
            if x.to_string_lossy().ends_with(".framework") {
                break;
            }
        }
    }

    let framework_path = bundle.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
    let framework_name = bundle.file_stem()?.to_string_lossy().into_owned();

    Some(vec![
        format!("-F{}", framework_path.display()),
        "-framework".to_string(),
        framework_name,
    ])
}

/// Classifies a traversal name that is absent from the trace database
pub fn classify_external_reference(
    name: &str,
    lib_search: Option<&dyn LibrarySearch>,
) -> Classification {
    // arguments we should pass straight to the linker
    let is_lib = Regex::new(r"^(-l[a-zA-Z0-9_]+|-l?pthread)$").expect("valid regex");
    // bare names CMake resolves by brute-forcing prefix/suffix combinations
    let is_maybe_bare_lib = Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid regex");

    let path = Path::new(name);

    if is_lib.is_match(name) {
        return Classification::LinkerArgs(vec![name.to_string()]);
    }

    if path.is_absolute() && path.exists() {
        return match framework_triple(path) {
            Some(triple) => Classification::LinkerArgs(triple),
            None => Classification::LinkerArgs(vec![name.to_string()]),
        };
    }

    if is_maybe_bare_lib.is_match(name) {
        // a bare name that is not a target must be a system library the
        // toolchain can locate; without a search capability we cannot tell
        if let Some(search) = lib_search {
            return match search.find_library(name) {
                Some(args) => Classification::LinkerArgs(args),
                None => Classification::Unresolved,
            };
        }
    }

    Classification::Unresolved
}
