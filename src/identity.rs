//! Identity resolution through configurable indirection.
//!
//! Identity storage belongs to the host: the crate only needs "current
//! session identity" and "lookup by id", both supplied through the
//! configuration as either a direct value or a zero-argument closure.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The authenticated principal, as far as this crate cares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

/// Host-owned identity storage, lookup by primary key only
pub trait IdentitySource: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Identity>>;
}

/// A configuration value that is either a literal or a closure producing one
pub enum Resolvable<T> {
    Value(T),
    Lazy(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Resolvable<T> {
    pub fn lazy(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Resolvable::Lazy(Arc::new(f))
    }

    /// Invoke the closure, or clone the literal
    pub fn resolve(&self) -> T {
        match self {
            Resolvable::Value(v) => v.clone(),
            Resolvable::Lazy(f) => f(),
        }
    }
}

/// Resolves the current identity and the identity source from configured
/// indirections. The source is memoized: it is computed at most once per
/// resolver lifetime, even if the underlying closure would now return
/// something else (the source is a deploy-time constant, not a runtime
/// variable).
pub struct IdentityResolver {
    source: Resolvable<Arc<dyn IdentitySource>>,
    current: Option<Resolvable<Option<Identity>>>,
    resolved: OnceLock<Arc<dyn IdentitySource>>,
}

impl IdentityResolver {
    pub fn new(source: Resolvable<Arc<dyn IdentitySource>>) -> Self {
        IdentityResolver { source, current: None, resolved: OnceLock::new() }
    }

    /// Configure how the current session identity is obtained
    pub fn with_current(mut self, current: Resolvable<Option<Identity>>) -> Self {
        self.current = Some(current);
        self
    }

    /// The memoized identity source handle
    pub fn identity_source(&self) -> &Arc<dyn IdentitySource> {
        self.resolved.get_or_init(|| self.source.resolve())
    }

    /// The current session identity, re-resolved on every call
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.as_ref().and_then(|c| c.resolve())
    }

    /// Lookup by id; `None` falls back to the current identity
    pub fn find_identity_by_id(&self, id: Option<&str>) -> Result<Option<Identity>> {
        match id {
            None => Ok(self.current_identity()),
            Some(id) => self.identity_source().find_by_id(id),
        }
    }
}
