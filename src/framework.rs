//! macOS framework bundle helpers
//!
//! Frameworks recorded by CMake arrive as absolute paths into the bundle
//! (e.g. `/System/Library/Frameworks/CoreAudio.framework/Versions/A/CoreAudio`).
//! The resolver only needs link flags for those, but callers that compile
//! against a framework also need its header directory, which hides behind a
//! versioned layout inside the bundle.

use crate::util::version::Version;
use std::path::{Path, PathBuf};

/// `Versions/<latest>/Headers` relative to the bundle, where the latest
/// version directory wins by dotted numeric ordering
///
/// A `Versions` entry named `Current` is a symlink-style alias, not a
/// version, and is skipped case-insensitively because macOS filesystems are
/// usually case-insensitive. Most system frameworks carry no `Versions`
/// directory at all, in which case the bare `Headers` layout applies.
fn latest_version_headers(bundle: &Path) -> PathBuf {
    let mut versions: Vec<Version> = Vec::new();

    if let Ok(entries) = bundle.join("Versions").read_dir() {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.eq_ignore_ascii_case("current") {
                continue;
            }
            versions.push(Version::new(name));
        }
    }

    match versions.iter().max() {
        Some(latest) => Path::new("Versions").join(latest.as_str()).join("Headers"),
        None => PathBuf::from("Headers"),
    }
}

/// Usable header directory of a framework bundle, if any
///
/// Tries `Headers`, then `Versions/Current/Headers`, then the `Headers` of
/// the greatest version directory, and returns the first that exists as a
/// directory.
pub fn framework_include_path(bundle: &Path) -> Option<PathBuf> {
    let trials = [
        PathBuf::from("Headers"),
        Path::new("Versions").join("Current").join("Headers"),
        latest_version_headers(bundle),
    ];

    for trial in trials {
        let candidate = bundle.join(trial);
        if candidate.is_dir() {
            return Some(candidate);
        }
    }

    None
}
