//! Explicit controller registry.
//!
//! Hosts declare their controllers statically instead of the library
//! reflecting over classes at runtime: each registration names a root path,
//! a controller id, the owning module (if any) and the invocable action
//! names. "Discovery" then enumerates registrations at or below a root, in
//! registration order.

use crate::constants::MODULE_SENTINEL;
use crate::error::{PermsyncError, Result};

/// One registered controller: id, owning module and action names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDef {
    pub id: String,
    /// Id of the module that owns this controller, if any
    pub module: Option<String>,
    pub actions: Vec<String>,
}

impl ControllerDef {
    pub fn new(id: impl Into<String>, actions: &[&str]) -> Self {
        ControllerDef {
            id: id.into(),
            module: None,
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Externally invocable action names, in declaration order.
    ///
    /// Empty names and `_`-prefixed helpers are not actions; duplicates
    /// collapse to the first occurrence.
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            if action.is_empty() || action.starts_with('_') {
                continue;
            }
            if !names.contains(&action.as_str()) {
                names.push(action);
            }
        }
        names
    }
}

/// Registry of controllers keyed by root path
pub struct ControllerRegistry {
    app_id: String,
    roots: Vec<(String, Vec<ControllerDef>)>,
}

impl ControllerRegistry {
    /// `app_id` is the host application's own module id; controllers owned
    /// by it get no module segment in permission names
    pub fn new(app_id: impl Into<String>) -> Self {
        ControllerRegistry { app_id: app_id.into(), roots: Vec::new() }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Register a controller under a root path
    pub fn register(&mut self, path: &str, controller: ControllerDef) -> Result<()> {
        if path.is_empty() {
            return Err(PermsyncError::Config("empty controller path".into()));
        }
        if controller.id.is_empty() {
            return Err(PermsyncError::Config(format!(
                "controller under {} has an empty id",
                path
            )));
        }
        let path = path.trim_end_matches('/');
        match self.roots.iter_mut().find(|(p, _)| p == path) {
            Some((_, defs)) => defs.push(controller),
            None => self.roots.push((path.to_string(), vec![controller])),
        }
        Ok(())
    }

    /// All controllers registered at `root` or any path below it, in
    /// registration order
    pub fn controllers_under(&self, root: &str) -> Result<Vec<&ControllerDef>> {
        if root.is_empty() {
            return Err(PermsyncError::Config("empty controller path".into()));
        }
        let root = root.trim_end_matches('/');
        let mut found = Vec::new();
        for (path, defs) in &self.roots {
            if path_is_under(path, root) {
                found.extend(defs.iter());
            }
        }
        if found.is_empty() {
            return Err(PermsyncError::Discovery(format!(
                "no controllers registered under {}",
                root
            )));
        }
        Ok(found)
    }

    /// Controller ids per configured dir, prefixed with the effective module
    /// label where one applies
    pub fn list_controllers(
        &self,
        dirs: &[(String, Option<String>)],
    ) -> Result<Vec<(String, Vec<String>)>> {
        let mut result = Vec::with_capacity(dirs.len());
        for (path, label) in dirs {
            let label = effective_label(label.as_deref());
            let ids = self
                .controllers_under(path)?
                .iter()
                .map(|c| match &label {
                    Some(m) => format!("{}/{}", m, c.id),
                    None => c.id.clone(),
                })
                .collect();
            result.push((path.clone(), ids));
        }
        Ok(result)
    }
}

/// Apply the label rules: empty string means no module, a `@`-prefixed label
/// is used literally without resolving a host module
pub fn effective_label(label: Option<&str>) -> Option<String> {
    match label {
        None | Some("") => None,
        Some(l) => {
            let l = l.strip_prefix(MODULE_SENTINEL).unwrap_or(l);
            if l.is_empty() {
                None
            } else {
                Some(l.to_string())
            }
        }
    }
}

fn path_is_under(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}
