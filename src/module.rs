//! Module facade: configuration, controller registry and identity resolution
//! in one place.

use tracing::warn;

use crate::config::Config;
use crate::error::{PermsyncError, Result};
use crate::identity::{Identity, IdentityResolver};
use crate::model::{Permission, PermissionCollection};
use crate::read::has_permission;
use crate::registry::ControllerRegistry;
use crate::sync::{
    init_config_permissions, seed_grant_all, seed_grants, sync_controller_permissions_with,
};

/// The permissions module a host embeds: holds the configuration, the
/// controller registry and the identity resolver, and drives initialization
/// and synchronization over them
pub struct PermissionsModule {
    config: Config,
    registry: ControllerRegistry,
    identity: IdentityResolver,
}

impl PermissionsModule {
    pub fn new(config: Config, registry: ControllerRegistry, identity: IdentityResolver) -> Self {
        PermissionsModule { config, registry, identity }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Upsert config-declared permissions, then seed configured grants
    pub fn init(&self) -> Result<()> {
        init_config_permissions(&self.config.permissions, |_, _| {});
        seed_grant_all(&self.config.grant_all)?;
        seed_grants(&self.config.grant)
    }

    /// Run the synchronization pass for every configured controller root
    pub fn sync_all(&self) -> Result<()> {
        self.sync_all_with(|_, _| {}, |_, _| {})
    }

    /// Like [`sync_all`](Self::sync_all), with per-record callbacks.
    ///
    /// A root with nothing registered under it is logged and skipped;
    /// malformed configuration aborts.
    pub fn sync_all_with<P, C>(&self, mut on_permission: P, mut on_collection: C) -> Result<()>
    where
        P: FnMut(&Permission, bool),
        C: FnMut(&PermissionCollection, bool),
    {
        for dir in &self.config.controller_dirs {
            match sync_controller_permissions_with(
                &self.registry,
                &dir.path,
                dir.module.as_deref(),
                &mut on_permission,
                &mut on_collection,
            ) {
                Ok(()) => {}
                Err(e @ PermsyncError::Discovery(_)) => warn!("skipping {}: {}", dir.path, e),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Controller ids per configured root, label-prefixed where applicable
    pub fn list_controllers(&self) -> Result<Vec<(String, Vec<String>)>> {
        let dirs: Vec<(String, Option<String>)> = self
            .config
            .controller_dirs
            .iter()
            .map(|d| (d.path.clone(), d.module.clone()))
            .collect();
        self.registry.list_controllers(&dirs)
    }

    /// The current session identity, if any
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.current_identity()
    }

    /// Lookup by id; `None` falls back to the current identity
    pub fn find_identity_by_id(&self, id: Option<&str>) -> Result<Option<Identity>> {
        self.identity.find_identity_by_id(id)
    }

    /// Check whether the current identity holds a permission.
    /// No identity means no permissions
    pub fn identity_has_permission(&self, name: &str) -> Result<bool> {
        match self.current_identity() {
            Some(identity) => has_permission(&identity.id, name),
            None => Ok(false),
        }
    }
}
