//! Read operations (no permission checks, direct LMDB access)

use crate::constants::WILDCARD_PRINCIPAL;
use crate::db::read;
use crate::error::{err, Result};
use crate::keys::{principal_prefix, split_grant_key};
use crate::model::{Permission, PermissionCollection};

/// Get a permission record by name
pub fn get_permission(name: &str) -> Result<Option<Permission>> {
    read(|d, tx| d.permissions.get(tx, name).map_err(err))
}

/// List all permission records, in name order
pub fn list_permissions() -> Result<Vec<Permission>> {
    read(|d, tx| {
        let mut r = Vec::new();
        for item in d.permissions.iter(tx).map_err(err)? {
            let (_, p) = item.map_err(err)?;
            r.push(p);
        }
        Ok(r)
    })
}

/// Get a collection record by name
pub fn get_collection(name: &str) -> Result<Option<PermissionCollection>> {
    read(|d, tx| d.collections.get(tx, name).map_err(err))
}

/// List all collection records, in name order
pub fn list_collections() -> Result<Vec<PermissionCollection>> {
    read(|d, tx| {
        let mut r = Vec::new();
        for item in d.collections.iter(tx).map_err(err)? {
            let (_, c) = item.map_err(err)?;
            r.push(c);
        }
        Ok(r)
    })
}

/// Names granted directly to one principal, in key order
pub fn grants_for(principal: &str) -> Result<Vec<String>> {
    read(|d, tx| {
        let prefix = principal_prefix(principal);
        let mut r = Vec::new();
        for item in d.grants.prefix_iter(tx, &prefix[..]).map_err(err)? {
            let (k, _) = item.map_err(err)?;
            if let Some((_, name)) = split_grant_key(k) {
                r.push(name.to_string());
            }
        }
        Ok(r)
    })
}

/// Effective permission names for a principal: direct grants plus wildcard
/// grants, with granted collection names expanded to their members.
/// First occurrence wins, order preserved.
pub fn permissions_for(principal: &str) -> Result<Vec<String>> {
    let mut granted = grants_for(principal)?;
    if principal != WILDCARD_PRINCIPAL {
        granted.extend(grants_for(WILDCARD_PRINCIPAL)?);
    }
    let mut effective = Vec::new();
    for name in granted {
        match get_collection(&name)? {
            Some(collection) => {
                for member in collection.permissions {
                    push_unique(&mut effective, member);
                }
            }
            None => push_unique(&mut effective, name),
        }
    }
    Ok(effective)
}

/// Check whether a principal holds a permission, directly or through a
/// wildcard grant or a granted collection
pub fn has_permission(principal: &str, name: &str) -> Result<bool> {
    Ok(permissions_for(principal)?.iter().any(|n| n == name))
}

fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.iter().any(|n| *n == name) {
        names.push(name);
    }
}
