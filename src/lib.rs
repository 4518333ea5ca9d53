//! Permsync - controller permission synchronization
//!
//! Hosts register controllers (id, owning module, action names) in a
//! [`ControllerRegistry`]; the synchronization pass materializes one
//! [`Permission`] record per action, groups each controller's permissions
//! into a [`PermissionCollection`], and seeds configuration-declared
//! permissions and grants. Records live in an embedded LMDB store, keyed by
//! name, so every pass is an idempotent upsert.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod identity;
pub mod keys;
pub mod model;
pub mod module;
pub mod read;
pub mod registry;
pub mod sync;
pub mod tx;

pub use config::{Config, ControllerDir, DeclaredPermission};
pub use db::{clear_all, init, test_lock};
pub use error::{PermsyncError, Result};
pub use identity::{Identity, IdentityResolver, IdentitySource, Resolvable};
pub use model::{permission_name, Permission, PermissionCollection};
pub use module::PermissionsModule;
pub use read::{
    get_collection, get_permission, grants_for, has_permission, list_collections,
    list_permissions, permissions_for,
};
pub use registry::{ControllerDef, ControllerRegistry};
pub use sync::{
    init_config_permissions, seed_grant_all, seed_grants, sync_controller_permissions,
    sync_controller_permissions_with,
};
pub use tx::{transact, Tx};
