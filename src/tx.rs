//! Transaction wrapper for batched writes

use heed::RwTxn;

use crate::constants::MAX_PRINCIPAL_LEN;
use crate::db::{dbs, env, Dbs};
use crate::error::{err, PermsyncError, Result};
use crate::keys::grant_key;
use crate::model::{validate_name, Permission, PermissionCollection};

/// Transaction wrapper for batched writes
pub struct Tx {
    txn: Option<RwTxn<'static>>,
    dbs: &'static Dbs,
}

impl Tx {
    #[inline]
    pub(crate) fn new() -> Result<Self> {
        Ok(Tx {
            txn: Some(env()?.write_txn().map_err(err)?),
            dbs: dbs()?,
        })
    }

    #[inline]
    pub(crate) fn tx(&mut self) -> &mut RwTxn<'static> {
        self.txn.as_mut().unwrap()
    }

    #[inline]
    pub(crate) fn dbs(&self) -> &'static Dbs {
        self.dbs
    }

    #[inline]
    pub(crate) fn commit(mut self) -> Result<()> {
        self.txn.take().unwrap().commit().map_err(err)
    }

    /// Create or replace a permission record, keyed by name
    pub fn upsert_permission(&mut self, permission: &Permission) -> Result<()> {
        permission.validate()?;
        self.dbs
            .permissions
            .put(self.tx(), &permission.name, permission)
            .map_err(err)
    }

    /// Create or replace a collection record, keyed by name
    pub fn upsert_collection(&mut self, collection: &PermissionCollection) -> Result<()> {
        collection.validate()?;
        self.dbs
            .collections
            .put(self.tx(), &collection.name, collection)
            .map_err(err)
    }

    /// Ensure a (principal, permission) grant pair exists
    pub fn put_grant(&mut self, principal: &str, permission: &str) -> Result<()> {
        if principal.is_empty() {
            return Err(PermsyncError::Config("empty principal id".into()));
        }
        if principal.len() > MAX_PRINCIPAL_LEN {
            return Err(PermsyncError::Config(format!(
                "principal id too long: {} bytes (max {})",
                principal.len(),
                MAX_PRINCIPAL_LEN
            )));
        }
        validate_name(permission)?;
        self.dbs
            .grants
            .put(self.tx(), &grant_key(principal, permission), &current_epoch())
            .map_err(err)
    }
}

/// Run multiple operations in a single transaction
#[inline]
pub fn transact<T, F: FnOnce(&mut Tx) -> Result<T>>(f: F) -> Result<T> {
    let mut tx = Tx::new()?;
    let r = f(&mut tx)?;
    tx.commit()?;
    Ok(r)
}

fn current_epoch() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
