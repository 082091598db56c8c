//! Toolchain library search
//!
//! CMake dependencies can name a library with nothing but a bare identifier
//! such as `z` or `pthread`; CMake itself brute-forces prefix/suffix
//! combinations across the toolchain search paths to turn that into a real
//! linker argument. The resolver treats that search as a pluggable
//! capability: anything implementing [`LibrarySearch`] can answer, and when
//! no capability is supplied bare names are reported as unresolved instead.

use std::collections::HashMap;
use std::path::PathBuf;

/// A capability that turns a bare library name into linker arguments
///
/// Returns `None` when the toolchain knows no library by that name; the
/// resolver then reports the name through its unresolved callback.
pub trait LibrarySearch {
    fn find_library(&self, name: &str) -> Option<Vec<String>>;
}

impl<F> LibrarySearch for F
where
    F: Fn(&str) -> Option<Vec<String>>,
{
    fn find_library(&self, name: &str) -> Option<Vec<String>> {
        self(name)
    }
}

/// Table-backed search for embedders that already know their toolchain layout
#[derive(Debug, Clone, Default)]
pub struct StaticLibrarySearch {
    entries: HashMap<String, Vec<String>>,
}

impl StaticLibrarySearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, name: impl Into<String>, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(name.into(), args.into_iter().map(Into::into).collect());
    }
}

impl LibrarySearch for StaticLibrarySearch {
    fn find_library(&self, name: &str) -> Option<Vec<String>> {
        self.entries.get(name).cloned()
    }
}

/// Filesystem search probing conventional library file names per directory
///
/// Probes `lib<name>.so`, `lib<name>.dylib`, `lib<name>.a` and `<name>.lib`
/// in each search directory in order and returns the first hit as a single
/// absolute-path linker argument.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLibrarySearch {
    dirs: Vec<PathBuf>,
}

impl DirectoryLibrarySearch {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }
}

impl LibrarySearch for DirectoryLibrarySearch {
    fn find_library(&self, name: &str) -> Option<Vec<String>> {
        let candidates = [
            format!("lib{}.so", name),
            format!("lib{}.dylib", name),
            format!("lib{}.a", name),
            format!("{}.lib", name),
        ];

        for dir in &self.dirs {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() {
                    return Some(vec![path.to_string_lossy().into_owned()]);
                }
            }
        }

        None
    }
}
