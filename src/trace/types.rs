//! Core types for the CMake trace database

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while loading a trace snapshot
#[derive(Debug, Error)]
pub enum TraceError {
    /// The serialized snapshot could not be deserialized
    #[error("invalid trace snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
}

/// Stable index of a target built by the host build system
///
/// The host owns the actual converter-target objects in a table; the trace
/// database and the resolver only ever hold this index into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildTargetId(pub usize);

/// One recorded CMake target: a bag of list-valued properties plus
/// imported/build-target status
///
/// Property value lists keep the order CMake declared them in; that order is
/// significant and must survive resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CMakeTarget {
    #[serde(default)]
    pub properties: HashMap<String, Vec<String>>,

    /// True for prebuilt artifacts not built by the enclosing project
    #[serde(default)]
    pub imported: bool,

    /// Set when the target corresponds to one the host build system builds
    #[serde(default)]
    pub build_target: Option<BuildTargetId>,
}

impl CMakeTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a property, or an empty slice if the target does not set it
    pub fn property(&self, name: &str) -> &[String] {
        self.properties.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_property<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
    }
}

/// Immutable mapping from target name to its recorded properties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceDatabase {
    pub targets: HashMap<String, CMakeTarget>,
}

impl TraceDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a database from a serialized trace snapshot
    pub fn from_json(snapshot: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(snapshot)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, target: CMakeTarget) {
        self.targets.insert(name.into(), target);
    }

    pub fn get(&self, name: &str) -> Option<&CMakeTarget> {
        self.targets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }
}

/// Property lookup across build configurations when no single configuration
/// was selected
///
/// Imported targets record per-configuration variants of some properties
/// (e.g. `IMPORTED_LOCATION_RELEASE`). The configuration comes from
/// `IMPORTED_CONFIGURATIONS`: the first declared entry, except that RELEASE
/// wins whenever it is declared at all. The suffixed property is consulted
/// before the bare one; only the first key present contributes.
pub fn get_config_declined_property(target: &CMakeTarget, prop: &str) -> Vec<String> {
    let configs: Vec<&str> = target
        .property("IMPORTED_CONFIGURATIONS")
        .iter()
        .filter(|x| !x.is_empty())
        .map(String::as_str)
        .collect();

    let mut config = configs.first().copied().unwrap_or("");
    if configs.iter().any(|c| *c == "RELEASE") {
        config = "RELEASE";
    }

    if !config.is_empty() {
        let suffixed = format!("{}_{}", prop, config);
        if let Some(values) = target.properties.get(&suffixed) {
            return values.iter().filter(|x| !x.is_empty()).cloned().collect();
        }
    }

    if let Some(values) = target.properties.get(prop) {
        return values.iter().filter(|x| !x.is_empty()).cloned().collect();
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_missing_is_empty() {
        let tgt = CMakeTarget::new();
        assert!(tgt.property("INTERFACE_INCLUDE_DIRECTORIES").is_empty());
    }

    #[test]
    fn test_declined_property_prefers_release() {
        let mut tgt = CMakeTarget::new();
        tgt.set_property("IMPORTED_CONFIGURATIONS", ["DEBUG", "RELEASE"]);
        tgt.set_property("IMPORTED_LOCATION_DEBUG", ["/opt/lib/libfoo_d.so"]);
        tgt.set_property("IMPORTED_LOCATION_RELEASE", ["/opt/lib/libfoo.so"]);

        assert_eq!(
            get_config_declined_property(&tgt, "IMPORTED_LOCATION"),
            vec!["/opt/lib/libfoo.so".to_string()]
        );
    }

    #[test]
    fn test_declined_property_uses_first_declared_config() {
        let mut tgt = CMakeTarget::new();
        tgt.set_property("IMPORTED_CONFIGURATIONS", ["DEBUG", "MINSIZEREL"]);
        tgt.set_property("IMPORTED_LOCATION_DEBUG", ["/opt/lib/libfoo_d.so"]);

        assert_eq!(
            get_config_declined_property(&tgt, "IMPORTED_LOCATION"),
            vec!["/opt/lib/libfoo_d.so".to_string()]
        );
    }

    #[test]
    fn test_declined_property_falls_back_to_bare() {
        let mut tgt = CMakeTarget::new();
        tgt.set_property("IMPORTED_CONFIGURATIONS", ["RELEASE"]);
        tgt.set_property("IMPORTED_LOCATION", ["/opt/lib/libfoo.so"]);

        assert_eq!(
            get_config_declined_property(&tgt, "IMPORTED_LOCATION"),
            vec!["/opt/lib/libfoo.so".to_string()]
        );
    }

    #[test]
    fn test_declined_property_absent() {
        let tgt = CMakeTarget::new();
        assert!(get_config_declined_property(&tgt, "IMPORTED_IMPLIB").is_empty());
    }

    #[test]
    fn test_database_from_json() {
        let snapshot = r#"{
            "targets": {
                "foo::bar": {
                    "properties": {
                        "INTERFACE_INCLUDE_DIRECTORIES": ["/usr/include/foo"]
                    },
                    "imported": true
                }
            }
        }"#;

        let db = TraceDatabase::from_json(snapshot).unwrap();
        assert!(db.contains("foo::bar"));

        let tgt = db.get("foo::bar").unwrap();
        assert!(tgt.imported);
        assert_eq!(
            tgt.property("INTERFACE_INCLUDE_DIRECTORIES"),
            ["/usr/include/foo".to_string()]
        );
        assert!(tgt.build_target.is_none());
    }

    #[test]
    fn test_database_from_invalid_json() {
        let result = TraceDatabase::from_json("not json");
        assert!(matches!(result, Err(TraceError::InvalidSnapshot(_))));
    }
}
