use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};

use super::{Attributes, Entity, EntityId, EntityKind, RegistryError};

struct RegistryState<K: EntityKind> {
    next_id: EntityId,
    entries: Vec<Arc<Entity<K>>>,
}

/// In-memory registry that creates entities of one kind family, assigns
/// their ids and keeps them in creation order.
///
/// Id assignment and the append happen under the same lock, so concurrent
/// `create` calls still observe unique, gapless ids. Ids are never reused,
/// even after `remove`.
pub struct Registry<K: EntityKind> {
    inner: Mutex<RegistryState<K>>,
}

impl<K: EntityKind> Default for Registry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> fmt::Debug for Registry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("family", &K::FAMILY)
            .field("count", &self.count())
            .field("next_id", &self.peek_next_id())
            .finish()
    }
}

impl<K: EntityKind> Registry<K> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryState {
                next_id: EntityId::FIRST,
                entries: Vec::new(),
            }),
        }
    }

    /// State is only written after validation succeeds and no caller code
    /// runs under the lock, so a poisoned guard still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, RegistryState<K>> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("{} registry lock was poisoned, recovering", K::FAMILY);
            poisoned.into_inner()
        })
    }

    /// Creates an entity from a caller-supplied tag.
    ///
    /// Returns `Err(RegistryError::UnknownKind)` if no strategy matches the
    /// tag and `Err(RegistryError::InvalidAttributes)` if the strategy
    /// rejects the attributes. Both leave the registry untouched.
    pub fn create(&self, tag: &str, attrs: &Attributes) -> Result<Arc<Entity<K>>, RegistryError> {
        let kind = K::from_tag(tag).ok_or_else(|| RegistryError::unknown_kind(K::FAMILY, tag))?;
        self.create_kind(kind, attrs)
    }

    /// Creates an entity for an already-resolved kind.
    pub fn create_kind(&self, kind: K, attrs: &Attributes) -> Result<Arc<Entity<K>>, RegistryError> {
        // Validation runs outside the lock and before any id is reserved.
        let record = kind.build(attrs)?;

        let mut guard = self.lock();
        let id = guard.next_id;

        if guard.entries.last().is_some_and(|last| last.id() >= id) {
            warn!("{} registry would assign duplicate identifier {}", K::FAMILY, id);
            return Err(RegistryError::DuplicateIdentifier(id));
        }

        let entity = Entity::new(id, kind, record);
        guard.next_id = id.next();
        guard.entries.push(Arc::clone(&entity));

        debug!("{} registry created {} {} (count={})", K::FAMILY, kind, id, guard.entries.len());
        Ok(entity)
    }

    /// Number of live entries: successful creations minus removals.
    pub fn count(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Owned snapshot of all entries in creation order. Changes to the
    /// returned vector never reach the registry.
    pub fn all(&self) -> Vec<Arc<Entity<K>>> {
        self.lock().entries.clone()
    }

    /// Lazy walk over the entries in creation order.
    ///
    /// Each step takes the lock briefly; calling `iter()` again starts from
    /// the first entry.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            registry: self,
            pos: 0,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<Arc<Entity<K>>> {
        let guard = self.lock();
        // Entries are sorted by id by construction.
        guard
            .entries
            .binary_search_by_key(&id, |e| e.id())
            .ok()
            .map(|idx| Arc::clone(&guard.entries[idx]))
    }

    /// First entity, in creation order, whose record matches `pred`.
    ///
    /// `pred` runs on a snapshot after the lock is released, so it may call
    /// back into the registry.
    pub fn find<F>(&self, mut pred: F) -> Option<Arc<Entity<K>>>
    where
        F: FnMut(&Entity<K>) -> bool,
    {
        self.all().into_iter().find(|e| pred(e))
    }

    /// Removes an entity. Its id is not handed out again.
    ///
    /// Returns `Err(RegistryError::UnknownEntity)` if no live entity has `id`.
    pub fn remove(&self, id: EntityId) -> Result<Arc<Entity<K>>, RegistryError> {
        let mut guard = self.lock();

        match guard.entries.binary_search_by_key(&id, |e| e.id()) {
            Ok(idx) => {
                let removed = guard.entries.remove(idx);
                debug!("{} registry removed {} (count={})", K::FAMILY, id, guard.entries.len());
                Ok(removed)
            }
            Err(_) => Err(RegistryError::UnknownEntity(id)),
        }
    }

    /// The id the next successful `create` will assign.
    pub fn peek_next_id(&self) -> EntityId {
        self.lock().next_id
    }

    fn entry_at(&self, pos: usize) -> Option<Arc<Entity<K>>> {
        self.lock().entries.get(pos).cloned()
    }
}

/// Iterator returned by [`Registry::iter`].
///
/// Positions are indices into the live entries, so a concurrent `remove`
/// may cause a later entry to be skipped.
pub struct Iter<'a, K: EntityKind> {
    registry: &'a Registry<K>,
    pos: usize,
}

impl<'a, K: EntityKind> Iterator for Iter<'a, K> {
    type Item = Arc<Entity<K>>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.registry.entry_at(self.pos)?;
        self.pos += 1;
        Some(entry)
    }
}

impl<'a, K: EntityKind> IntoIterator for &'a Registry<K> {
    type Item = Arc<Entity<K>>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::employees::EmployeeRole;

    #[test]
    fn poisoned_lock_is_recovered_with_state_intact() {
        let registry: Arc<Registry<EmployeeRole>> = Arc::new(Registry::new());
        registry.create_engineer("Alex").unwrap();
        registry.create_manager("Priya").unwrap();

        let poisoner = Arc::clone(&registry);
        let res = thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the registry lock");
        })
        .join();
        assert!(res.is_err());
        assert!(registry.inner.is_poisoned());

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.all().len(), 2);
        assert_eq!(registry.peek_next_id(), EntityId(3));
        let sam = registry.create_engineer("Sam").unwrap();
        assert_eq!(sam.id(), EntityId(3));
        assert_eq!(registry.count(), 3);
    }
}
