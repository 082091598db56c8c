//! Worklist traversal over the trace database
//!
//! Resolution replays CMake's transitive usage-requirement propagation for
//! one target: a breadth-first walk over link-dependency properties that
//! folds every visited record's flags into one aggregate. The walk is
//! iterative (deep dependency chains must not recurse) and memoized by name,
//! so diamonds and cycles are visited once and tie-break deterministically
//! by discovery order.

use crate::resolver::classify::{classify_external_reference, resolve_cmake_lib, Classification};
use crate::toolchain::LibrarySearch;
use crate::trace::{get_config_declined_property, BuildTargetId, TraceDatabase};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// The accumulated effect of resolving one target and its transitive link
/// dependencies
///
/// Every list preserves discovery order. `libraries` in particular is never
/// sorted: relative order carries linker semantics (`-framework` stays
/// paired with its name, a `-L` search path precedes the `-l` that needs
/// it, and a library must follow whatever depends on it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTarget {
    pub include_directories: Vec<String>,
    pub link_flags: Vec<String>,
    pub public_compile_opts: Vec<String>,
    pub libraries: Vec<String>,
    pub link_with: Vec<BuildTargetId>,
    pub install_rpath: Option<String>,
    pub build_rpath: Option<String>,
}

impl ResolvedTarget {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Caller-supplied capabilities for one resolution call
///
/// Both are optional: without a library search, bare names are reported as
/// unresolved instead of probed; without a callback, unresolved references
/// are logged as warnings.
#[derive(Default)]
pub struct ResolveOptions<'a> {
    lib_search: Option<&'a dyn LibrarySearch>,
    on_unresolved: Option<&'a dyn Fn(&str)>,
}

impl<'a> ResolveOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lib_search(mut self, search: &'a dyn LibrarySearch) -> Self {
        self.lib_search = Some(search);
        self
    }

    pub fn with_unresolved_callback(mut self, callback: &'a dyn Fn(&str)) -> Self {
        self.on_unresolved = Some(callback);
        self
    }

    fn report_unresolved(&self, name: &str) {
        match self.on_unresolved {
            Some(callback) => callback(name),
            None => warn!(reference = %name, "could not resolve CMake reference"),
        }
    }
}

/// Resolves every flag, path and target reference a consumer of
/// `target_name` must apply
///
/// `target_name` need not exist in the database; it is then classified as an
/// external reference like any other. Unresolvable references are reported
/// through the options' callback and skipped; resolution itself never fails
/// and always returns a (possibly empty) aggregate.
pub fn resolve_trace_targets(
    target_name: &str,
    trace: &TraceDatabase,
    options: &ResolveOptions,
) -> ResolvedTarget {
    let mut res = ResolvedTarget::new();
    let mut worklist: VecDeque<String> = VecDeque::from([target_name.to_string()]);
    let mut processed: HashSet<String> = HashSet::new();

    while let Some(curr) = worklist.pop_front() {
        if processed.contains(&curr) {
            continue;
        }

        let Some(tgt) = trace.get(&curr) else {
            // not a target: a plain flag, a file, a framework, or a bare
            // library name -- external references carry no transitive
            // dependencies and are not memoized
            match classify_external_reference(&curr, options.lib_search) {
                Classification::LinkerArgs(args) => res.libraries.extend(args),
                Classification::Unresolved => options.report_unresolved(&curr),
            }
            continue;
        };

        debug!(name = %curr, record = ?tgt, "visiting trace target");

        res.include_directories.extend(
            tgt.property("INTERFACE_INCLUDE_DIRECTORIES")
                .iter()
                .filter(|x| !x.is_empty())
                .cloned(),
        );

        res.link_flags.extend(
            tgt.property("INTERFACE_LINK_OPTIONS")
                .iter()
                .filter(|x| !x.is_empty())
                .cloned(),
        );

        res.public_compile_opts.extend(
            tgt.property("INTERFACE_COMPILE_DEFINITIONS")
                .iter()
                .filter(|x| !x.is_empty())
                .map(|x| format!("-D{}", x.strip_prefix("-D").unwrap_or(x))),
        );

        res.public_compile_opts.extend(
            tgt.property("INTERFACE_COMPILE_OPTIONS")
                .iter()
                .filter(|x| !x.is_empty())
                .cloned(),
        );

        if tgt.imported {
            res.libraries
                .extend(get_config_declined_property(tgt, "IMPORTED_IMPLIB"));
            res.libraries
                .extend(get_config_declined_property(tgt, "IMPORTED_LOCATION"));
        } else if let Some(id) = tgt.build_target {
            // the requested target must not link against itself
            if curr != target_name {
                res.link_with.push(id);
            }
        } else {
            options.report_unresolved(&curr);
        }

        for prop in ["LINK_LIBRARIES", "INTERFACE_LINK_LIBRARIES"] {
            for value in tgt.property(prop).iter().filter(|x| !x.is_empty()) {
                if trace.contains(value) {
                    worklist.push_back(value.clone());
                } else {
                    // CMake already knows these are plain library specs, so
                    // the full classifier is skipped
                    res.libraries.push(resolve_cmake_lib(value));
                }
            }
        }

        for prop in ["LINK_DIRECTORIES", "INTERFACE_LINK_DIRECTORIES"] {
            res.link_flags.extend(
                tgt.property(prop)
                    .iter()
                    .filter(|x| !x.is_empty())
                    .map(|x| {
                        if x.starts_with('-') {
                            x.clone()
                        } else {
                            format!("-L{}", x)
                        }
                    }),
            );
        }

        if let Some(values) = tgt.properties.get("INSTALL_RPATH") {
            res.install_rpath = values.first().cloned();
        }
        if let Some(values) = tgt.properties.get("BUILD_RPATH") {
            res.build_rpath = values.first().cloned();
        }

        // dependent libraries of imported targets may or may not be targets
        // themselves; the membership check at the top of the loop sorts them
        worklist.extend(get_config_declined_property(
            tgt,
            "IMPORTED_LINK_DEPENDENT_LIBRARIES",
        ));

        processed.insert(curr);
    }

    // The library list keeps discovery order. Sorting would tear apart
    // `-framework <name>` pairs and move `-L` flags past the libraries
    // that need them.

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::CMakeTarget;
    use std::cell::RefCell;

    fn db(entries: Vec<(&str, CMakeTarget)>) -> TraceDatabase {
        let mut trace = TraceDatabase::new();
        for (name, tgt) in entries {
            trace.insert(name, tgt);
        }
        trace
    }

    fn built(id: usize) -> CMakeTarget {
        CMakeTarget {
            build_target: Some(BuildTargetId(id)),
            ..CMakeTarget::new()
        }
    }

    #[test]
    fn test_single_target_properties() {
        let mut tgt = built(0);
        tgt.set_property("INTERFACE_INCLUDE_DIRECTORIES", ["/usr/include/foo", ""]);
        tgt.set_property("INTERFACE_LINK_OPTIONS", ["-Wl,--no-undefined"]);
        tgt.set_property("INTERFACE_COMPILE_OPTIONS", ["-fno-exceptions"]);
        let trace = db(vec![("foo", tgt)]);

        let res = resolve_trace_targets("foo", &trace, &ResolveOptions::new());

        assert_eq!(res.include_directories, ["/usr/include/foo"]);
        assert_eq!(res.link_flags, ["-Wl,--no-undefined"]);
        assert_eq!(res.public_compile_opts, ["-fno-exceptions"]);
        assert!(res.link_with.is_empty());
    }

    #[test]
    fn test_compile_definitions_normalized_once() {
        let mut tgt = built(0);
        tgt.set_property("INTERFACE_COMPILE_DEFINITIONS", ["-DFOO", "BAR=1"]);
        let trace = db(vec![("foo", tgt)]);

        let res = resolve_trace_targets("foo", &trace, &ResolveOptions::new());

        assert_eq!(res.public_compile_opts, ["-DFOO", "-DBAR=1"]);
    }

    #[test]
    fn test_transitive_link_with_excludes_self() {
        let mut app = built(0);
        app.set_property("LINK_LIBRARIES", ["dep"]);
        let mut dep = built(1);
        // cycle back to the requested target
        dep.set_property("LINK_LIBRARIES", ["app"]);
        let trace = db(vec![("app", app), ("dep", dep)]);

        let res = resolve_trace_targets("app", &trace, &ResolveOptions::new());

        assert_eq!(res.link_with, [BuildTargetId(1)]);
    }

    #[test]
    fn test_diamond_visits_once() {
        let mut app = built(0);
        app.set_property("LINK_LIBRARIES", ["left", "right"]);
        let mut left = built(1);
        left.set_property("LINK_LIBRARIES", ["base"]);
        let mut right = built(2);
        right.set_property("LINK_LIBRARIES", ["base"]);
        let mut base = built(3);
        base.set_property("INTERFACE_INCLUDE_DIRECTORIES", ["/usr/include/base"]);
        let trace = db(vec![
            ("app", app),
            ("left", left),
            ("right", right),
            ("base", base),
        ]);

        let res = resolve_trace_targets("app", &trace, &ResolveOptions::new());

        assert_eq!(
            res.link_with,
            [BuildTargetId(1), BuildTargetId(2), BuildTargetId(3)]
        );
        assert_eq!(res.include_directories, ["/usr/include/base"]);
    }

    #[test]
    fn test_link_libraries_mixing_targets_and_libs() {
        let mut app = built(0);
        app.set_property("LINK_LIBRARIES", ["dep", "z", "dep"]);
        let dep = built(1);
        let trace = db(vec![("app", app), ("dep", dep)]);

        let res = resolve_trace_targets("app", &trace, &ResolveOptions::new());

        // dep is memoized, z is prefixed exactly once at first discovery
        assert_eq!(res.link_with, [BuildTargetId(1)]);
        assert_eq!(res.libraries, ["-lz"]);
    }

    #[test]
    fn test_imported_location_by_configuration() {
        let mut tgt = CMakeTarget {
            imported: true,
            ..CMakeTarget::new()
        };
        tgt.set_property("IMPORTED_CONFIGURATIONS", ["DEBUG", "RELEASE"]);
        tgt.set_property("IMPORTED_LOCATION_RELEASE", ["/opt/lib/libfoo.so"]);
        tgt.set_property("IMPORTED_LOCATION_DEBUG", ["/opt/lib/libfoo_d.so"]);
        let trace = db(vec![("foo::foo", tgt)]);

        let res = resolve_trace_targets("foo::foo", &trace, &ResolveOptions::new());

        assert_eq!(res.libraries, ["/opt/lib/libfoo.so"]);
    }

    #[test]
    fn test_imported_link_dependent_libraries_traversed() {
        let mut outer = CMakeTarget {
            imported: true,
            ..CMakeTarget::new()
        };
        outer.set_property("IMPORTED_LOCATION", ["/opt/lib/libouter.so"]);
        outer.set_property("IMPORTED_LINK_DEPENDENT_LIBRARIES", ["inner"]);
        let mut inner = built(7);
        inner.set_property("INTERFACE_INCLUDE_DIRECTORIES", ["/usr/include/inner"]);
        let trace = db(vec![("outer", outer), ("inner", inner)]);

        let res = resolve_trace_targets("outer", &trace, &ResolveOptions::new());

        assert_eq!(res.libraries, ["/opt/lib/libouter.so"]);
        assert_eq!(res.link_with, [BuildTargetId(7)]);
        assert_eq!(res.include_directories, ["/usr/include/inner"]);
    }

    #[test]
    fn test_link_directories_become_search_flags() {
        let mut tgt = built(0);
        tgt.set_property("LINK_DIRECTORIES", ["/opt/lib"]);
        tgt.set_property("INTERFACE_LINK_DIRECTORIES", ["-L/usr/local/lib"]);
        let trace = db(vec![("foo", tgt)]);

        let res = resolve_trace_targets("foo", &trace, &ResolveOptions::new());

        assert_eq!(res.link_flags, ["-L/opt/lib", "-L/usr/local/lib"]);
    }

    #[test]
    fn test_rpath_takes_first_value() {
        let mut tgt = built(0);
        tgt.set_property("INSTALL_RPATH", ["$ORIGIN/../lib", "/other"]);
        tgt.set_property("BUILD_RPATH", ["/build/lib"]);
        let trace = db(vec![("foo", tgt)]);

        let res = resolve_trace_targets("foo", &trace, &ResolveOptions::new());

        assert_eq!(res.install_rpath.as_deref(), Some("$ORIGIN/../lib"));
        assert_eq!(res.build_rpath.as_deref(), Some("/build/lib"));
    }

    #[test]
    fn test_unresolved_reported_once_and_never_fatal() {
        let mut app = CMakeTarget {
            imported: true,
            ..CMakeTarget::new()
        };
        app.set_property("IMPORTED_LOCATION", ["/opt/lib/libapp.so"]);
        // reaches the classifier and matches none of its rules
        app.set_property("IMPORTED_LINK_DEPENDENT_LIBRARIES", ["lib with spaces"]);
        let trace = db(vec![("app", app)]);

        let reported = RefCell::new(Vec::new());
        let callback = |name: &str| reported.borrow_mut().push(name.to_string());
        let options = ResolveOptions::new().with_unresolved_callback(&callback);

        let res = resolve_trace_targets("app", &trace, &options);

        assert_eq!(res.libraries, ["/opt/lib/libapp.so"]);
        assert_eq!(*reported.borrow(), ["lib with spaces"]);
    }

    #[test]
    fn test_missing_root_target_reports_unresolved() {
        let trace = TraceDatabase::new();

        let reported = RefCell::new(Vec::new());
        let callback = |name: &str| reported.borrow_mut().push(name.to_string());
        let options = ResolveOptions::new().with_unresolved_callback(&callback);

        let res = resolve_trace_targets("no such target!", &trace, &options);

        assert_eq!(res, ResolvedTarget::new());
        assert_eq!(*reported.borrow(), ["no such target!"]);
    }

    #[test]
    fn test_link_library_specs_skip_the_classifier() {
        // non-target LINK_LIBRARIES entries take the fast bare-lib rule,
        // so even an odd spec is prefixed rather than reported
        let mut app = built(0);
        app.set_property("LINK_LIBRARIES", ["z", "-lm", "/opt/lib/libfoo.a"]);
        let trace = db(vec![("app", app)]);

        let res = resolve_trace_targets("app", &trace, &ResolveOptions::new());

        assert_eq!(res.libraries, ["-lz", "-lm", "/opt/lib/libfoo.a"]);
    }

    #[test]
    fn test_orphan_target_reports_unresolved() {
        // neither imported nor built by the host project
        let mut app = built(0);
        app.set_property("LINK_LIBRARIES", ["ghost"]);
        let mut ghost = CMakeTarget::new();
        ghost.set_property("INTERFACE_COMPILE_OPTIONS", ["-pthread"]);
        let trace = db(vec![("app", app), ("ghost", ghost)]);

        let reported = RefCell::new(Vec::new());
        let callback = |name: &str| reported.borrow_mut().push(name.to_string());
        let options = ResolveOptions::new().with_unresolved_callback(&callback);

        let res = resolve_trace_targets("app", &trace, &options);

        // its interface properties still contribute
        assert_eq!(res.public_compile_opts, ["-pthread"]);
        assert_eq!(*reported.borrow(), ["ghost"]);
    }

    #[test]
    fn test_determinism() {
        let mut app = built(0);
        app.set_property("LINK_LIBRARIES", ["dep", "-lz", "dep2"]);
        let dep = built(1);
        let dep2 = built(2);
        let trace = db(vec![("app", app), ("dep", dep), ("dep2", dep2)]);

        let first = resolve_trace_targets("app", &trace, &ResolveOptions::new());
        let second = resolve_trace_targets("app", &trace, &ResolveOptions::new());

        assert_eq!(first, second);
    }
}
