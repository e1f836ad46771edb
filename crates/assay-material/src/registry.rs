//! Index of live tracked materials.
//!
//! The registry owns weak references only. Each tracked material holds a
//! [`Registration`] guard; dropping the guard removes the entry, so the sweep
//! never sees a destroyed material. Keys are assigned in increasing order and
//! the sweep visits entries in key order, which makes it deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use crate::material::MaterialState;

/// Registry slot of one tracked material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegistryKey(pub u64);

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg#{}", self.0)
    }
}

type Entry = Weak<Mutex<MaterialState>>;

/// Process-wide (per context) index of live tracked materials.
#[derive(Default)]
pub struct MaterialRegistry {
    entries: Mutex<BTreeMap<RegistryKey, Entry>>,
    next_key: AtomicU64,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `state` and return the guard that removes it again.
    pub(crate) fn register(self: &Arc<Self>, state: &Arc<Mutex<MaterialState>>) -> Registration {
        let key = RegistryKey(self.next_key.fetch_add(1, Ordering::Relaxed) + 1);
        self.entries.lock().insert(key, Arc::downgrade(state));
        trace!(%key, "material registered");
        Registration {
            key,
            registry: Arc::downgrade(self),
        }
    }

    fn deregister(&self, key: RegistryKey) {
        if self.entries.lock().remove(&key).is_some() {
            trace!(%key, "material deregistered");
        }
    }

    /// Visit every live entry once, in registration order.
    ///
    /// The registry lock is held for the whole sweep, so no material can be
    /// registered or deregistered while it runs. `f` must not create or drop
    /// tracked materials. Stops at the first error. Returns the number of
    /// entries visited.
    pub(crate) fn sweep<E>(
        &self,
        mut f: impl FnMut(RegistryKey, &mut MaterialState) -> Result<(), E>,
    ) -> Result<usize, E> {
        let entries = self.entries.lock();
        let mut visited = 0;
        for (key, weak) in entries.iter() {
            let Some(state) = weak.upgrade() else {
                continue;
            };
            let mut guard = state.lock();
            f(*key, &mut *guard)?;
            visited += 1;
        }
        Ok(visited)
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn contains(&self, key: RegistryKey) -> bool {
        self.entries.lock().contains_key(&key)
    }

    /// Registered keys in sweep order.
    pub fn keys(&self) -> Vec<RegistryKey> {
        self.entries.lock().keys().copied().collect()
    }
}

impl fmt::Debug for MaterialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// Scoped registration of one material; deregisters on drop.
#[derive(Debug)]
pub struct Registration {
    key: RegistryKey,
    registry: Weak<MaterialRegistry>,
}

impl Registration {
    pub fn key(&self) -> RegistryKey {
        self.key
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.deregister(self.key);
        }
    }
}
