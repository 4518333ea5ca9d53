//! Permission and permission-collection records.
//!
//! Permission names are canonical: `controller:action` for application-level
//! controllers, `module:controller:action` for module controllers, or a bare
//! token for configuration-declared capability flags. Both record types are
//! keyed by `name` in storage, so writing a record is an upsert.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_NAME_LEN;
use crate::error::{PermsyncError, Result};

/// A single grantable authorization unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    pub module: Option<String>,
    pub controller: Option<String>,
    pub action: Option<String>,
    pub comment: String,
}

impl Permission {
    /// Build the permission for one controller action
    pub fn for_action(module: Option<&str>, controller: &str, action: &str) -> Self {
        let comment = match module {
            Some(m) => format!(
                "Allow access to action {} of controller {} of module {}",
                action, controller, m
            ),
            None => format!("Allow access to action {} of controller {}", action, controller),
        };
        Permission {
            name: permission_name(module, controller, action),
            module: module.map(str::to_string),
            controller: Some(controller.to_string()),
            action: Some(action.to_string()),
            comment,
        }
    }

    /// Build a configuration-declared permission (no controller binding)
    pub fn declared(name: &str, comment: &str) -> Self {
        Permission {
            name: name.to_string(),
            module: None,
            controller: None,
            action: None,
            comment: comment.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// All permissions of one controller, grantable as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCollection {
    pub name: String,
    pub comment: String,
    /// Member permission names, in discovery order
    pub permissions: Vec<String>,
}

impl PermissionCollection {
    /// Build the collection covering one controller's actions
    pub fn for_controller(module: Option<&str>, controller: &str, permissions: Vec<String>) -> Self {
        let name = match module {
            Some(m) => format!("Access to controller {}:{}", m, controller),
            None => format!("Access to controller {}", controller),
        };
        let comment = match module {
            Some(m) => format!(
                "Access to all actions of controller {} of module {}",
                controller, m
            ),
            None => format!("Access to all actions of controller {}", controller),
        };
        PermissionCollection { name, comment, permissions }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Canonical permission name for a (module, controller, action) triple
pub fn permission_name(module: Option<&str>, controller: &str, action: &str) -> String {
    match module {
        Some(m) => format!("{}:{}:{}", m, controller, action),
        None => format!("{}:{}", controller, action),
    }
}

/// Validate a permission or collection name before storage
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PermsyncError::Persistence("name cannot be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(PermsyncError::Persistence(format!(
            "name too long: {} bytes (max {})",
            name.len(),
            MAX_NAME_LEN
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(PermsyncError::Persistence(format!(
            "name contains control characters: {:?}",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_name() {
        assert_eq!(permission_name(None, "site", "index"), "site:index");
        assert_eq!(permission_name(Some("api"), "site", "index"), "api:site:index");
    }

    #[test]
    fn test_for_action() {
        let p = Permission::for_action(None, "site", "index");
        assert_eq!(p.name, "site:index");
        assert_eq!(p.module, None);
        assert_eq!(p.controller.as_deref(), Some("site"));
        assert_eq!(p.action.as_deref(), Some("index"));
        assert_eq!(p.comment, "Allow access to action index of controller site");

        let p = Permission::for_action(Some("api"), "site", "index");
        assert_eq!(p.name, "api:site:index");
        assert_eq!(
            p.comment,
            "Allow access to action index of controller site of module api"
        );
    }

    #[test]
    fn test_declared() {
        let p = Permission::declared("execute_order_66", "Special capability");
        assert_eq!(p.name, "execute_order_66");
        assert_eq!(p.module, None);
        assert_eq!(p.controller, None);
        assert_eq!(p.action, None);
    }

    #[test]
    fn test_collection_names() {
        let c = PermissionCollection::for_controller(None, "site", vec![]);
        assert_eq!(c.name, "Access to controller site");
        assert_eq!(c.comment, "Access to all actions of controller site");

        let c = PermissionCollection::for_controller(Some("api"), "site", vec![]);
        assert_eq!(c.name, "Access to controller api:site");
        assert_eq!(c.comment, "Access to all actions of controller site of module api");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("site:index").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_name("bad\nname").is_err());
    }
}
