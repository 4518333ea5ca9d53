//! Host-supplied configuration surface.
//!
//! Hosts build a [`Config`] directly or deserialize one (the fields map onto
//! the module parameters of the host application's config).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One controller root and its module label.
///
/// `module: None` means application-level controllers; a plain label is the
/// owning module id; a `@`-prefixed label is used literally for permission
/// names without resolving a host module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerDir {
    pub path: String,
    #[serde(default)]
    pub module: Option<String>,
}

/// A permission declared in configuration, not tied to a controller action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredPermission {
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller roots to synchronize, in order
    pub controller_dirs: Vec<ControllerDir>,
    /// Declared permissions, upserted in order at init
    pub permissions: Vec<DeclaredPermission>,
    /// principal id -> permission names to seed
    pub grant: BTreeMap<String, Vec<String>>,
    /// Permission names seeded for every principal
    pub grant_all: Vec<String>,
}
