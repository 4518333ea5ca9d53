//! Database types and global state

use std::path::Path;
use std::sync::{Mutex, OnceLock};

use heed::types::{Bytes, SerdeJson, Str, U64};
use heed::{Database, Env, EnvOpenOptions, RoTxn};

use crate::error::{err, PermsyncError, Result};
use crate::model::{Permission, PermissionCollection};

// Database type aliases
pub type DbPermissions = Database<Str, SerdeJson<Permission>>;
pub type DbCollections = Database<Str, SerdeJson<PermissionCollection>>;
pub type DbGrants = Database<Bytes, U64<byteorder::BigEndian>>;

/// All database handles
pub struct Dbs {
    /// name -> Permission record
    pub permissions: DbPermissions,
    /// name -> PermissionCollection record
    pub collections: DbCollections,
    /// grant key (see `keys`) -> seed epoch millis
    pub grants: DbGrants,
}

// Global state
pub static ENV: OnceLock<Env> = OnceLock::new();
pub static DBS: OnceLock<Dbs> = OnceLock::new();
pub static TEST_LOCK: Mutex<()> = Mutex::new(());
pub static INIT_PATH: OnceLock<String> = OnceLock::new();

/// Get the database handles, or error if not initialized
#[inline]
pub fn dbs() -> Result<&'static Dbs> {
    DBS.get()
        .ok_or_else(|| PermsyncError::Persistence("not initialized".into()))
}

/// Get the environment, or error if not initialized
#[inline]
pub fn env() -> Result<&'static Env> {
    ENV.get()
        .ok_or_else(|| PermsyncError::Persistence("not initialized".into()))
}

/// Execute a read-only operation
#[inline]
pub fn read<T, F: FnOnce(&Dbs, &RoTxn) -> Result<T>>(f: F) -> Result<T> {
    f(dbs()?, &env()?.read_txn().map_err(err)?)
}

/// Initialize the store. Idempotent for the same path
pub fn init(path: &str) -> Result<()> {
    if let Some(p) = INIT_PATH.get() {
        return if p == path {
            Ok(())
        } else {
            Err(PermsyncError::Persistence(format!("already initialized at {}", p)))
        };
    }
    std::fs::create_dir_all(path).map_err(err)?;
    // SAFETY: LMDB requires no other processes access this path concurrently during open.
    let e = unsafe {
        EnvOpenOptions::new()
            .map_size(1 << 30)
            .max_dbs(3)
            .open(Path::new(path))
            .map_err(err)?
    };
    let mut tx = e.write_txn().map_err(err)?;
    let d = Dbs {
        permissions: e.create_database(&mut tx, Some("permissions")).map_err(err)?,
        collections: e.create_database(&mut tx, Some("collections")).map_err(err)?,
        grants: e.create_database(&mut tx, Some("grants")).map_err(err)?,
    };
    tx.commit().map_err(err)?;
    let _ = (ENV.set(e), DBS.set(d), INIT_PATH.set(path.to_string()));
    Ok(())
}

/// Clear all databases (for testing)
pub fn clear_all() -> Result<()> {
    crate::tx::transact(|tx| {
        tx.dbs().permissions.clear(tx.tx()).map_err(err)?;
        tx.dbs().collections.clear(tx.tx()).map_err(err)?;
        tx.dbs().grants.clear(tx.tx()).map_err(err)
    })
}

/// Get the test lock (for single-threaded tests)
pub fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    TEST_LOCK.lock().unwrap_or_else(|p| p.into_inner())
}
