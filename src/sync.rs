//! Permission synchronization: the reconciliation pass, config-declared
//! permissions and grant seeding.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::DeclaredPermission;
use crate::constants::WILDCARD_PRINCIPAL;
use crate::error::{PermsyncError, Result};
use crate::model::{Permission, PermissionCollection};
use crate::registry::{effective_label, ControllerRegistry};
use crate::tx::transact;

/// Materialize permissions and collections for every controller under `path`
pub fn sync_controller_permissions(
    registry: &ControllerRegistry,
    path: &str,
    module_label: Option<&str>,
) -> Result<()> {
    sync_controller_permissions_with(registry, path, module_label, |_, _| {}, |_, _| {})
}

/// Like [`sync_controller_permissions`], invoking `on_permission` and
/// `on_collection` once per upserted record with the save outcome.
///
/// Failed saves are reported through the callback flag and the log; the pass
/// continues with the next record. A permission that failed to save is left
/// out of its controller's collection.
pub fn sync_controller_permissions_with<P, C>(
    registry: &ControllerRegistry,
    path: &str,
    module_label: Option<&str>,
    mut on_permission: P,
    mut on_collection: C,
) -> Result<()>
where
    P: FnMut(&Permission, bool),
    C: FnMut(&PermissionCollection, bool),
{
    if path.is_empty() {
        return Err(PermsyncError::Config("empty controller path".into()));
    }
    let label = effective_label(module_label);
    let controllers = registry.controllers_under(path)?;
    debug!("syncing {} controllers under {}", controllers.len(), path);

    for controller in controllers {
        // No explicit label: use the controller's own module, unless that is
        // the application itself
        let module = match &label {
            Some(l) => Some(l.as_str()),
            None => controller.module.as_deref().filter(|m| *m != registry.app_id()),
        };

        let mut members = Vec::new();
        for action in controller.action_names() {
            let permission = Permission::for_action(module, &controller.id, action);
            let saved = report(transact(|tx| tx.upsert_permission(&permission)), "permission", &permission.name);
            if saved {
                members.push(permission.name.clone());
            }
            on_permission(&permission, saved);
        }

        let collection = PermissionCollection::for_controller(module, &controller.id, members);
        let saved = report(transact(|tx| tx.upsert_collection(&collection)), "collection", &collection.name);
        on_collection(&collection, saved);
    }
    Ok(())
}

/// Upsert configuration-declared permissions, in declaration order.
///
/// Failures are reported through the callback flag; the loop continues.
pub fn init_config_permissions<F>(declared: &[DeclaredPermission], mut on_result: F)
where
    F: FnMut(&Permission, bool),
{
    for decl in declared {
        let permission = Permission::declared(&decl.name, &decl.comment);
        let saved = report(transact(|tx| tx.upsert_permission(&permission)), "permission", &permission.name);
        on_result(&permission, saved);
    }
}

/// Ensure every configured (principal, permission) pair exists.
///
/// Additive and idempotent: pairs outside the mapping are untouched.
pub fn seed_grants(grants: &BTreeMap<String, Vec<String>>) -> Result<()> {
    transact(|tx| {
        for (principal, names) in grants {
            for name in names {
                tx.put_grant(principal, name)?;
            }
        }
        Ok(())
    })
}

/// Seed permissions that apply to every principal
pub fn seed_grant_all(names: &[String]) -> Result<()> {
    transact(|tx| {
        for name in names {
            tx.put_grant(WILDCARD_PRINCIPAL, name)?;
        }
        Ok(())
    })
}

fn report(result: Result<()>, kind: &str, name: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("failed to save {} {}: {}", kind, name, e);
            false
        }
    }
}
