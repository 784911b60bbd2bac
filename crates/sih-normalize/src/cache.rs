//! Run-scoped key→id caches.

use std::collections::HashMap;

use sih_model::EntityKey;

/// Maps composite keys to store row ids for one normalization run.
///
/// Built empty at the start of every run and discarded with it — the
/// cache is never persisted or shared. Restarting a run against a
/// non-empty store therefore risks duplicate entities; the supported
/// path is re-running from a recreated schema.
#[derive(Debug, Default)]
pub struct KeyCache {
    map: HashMap<EntityKey, i64>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EntityKey) -> Option<i64> {
        self.map.get(key).copied()
    }

    pub fn insert(&mut self, key: EntityKey, id: i64) {
        self.map.insert(key, id);
    }

    /// Number of distinct entities seen so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up the key, or inserts the id produced by `create` on a miss.
    pub fn get_or_insert_with<E>(
        &mut self,
        key: EntityKey,
        create: impl FnOnce() -> Result<i64, E>,
    ) -> Result<i64, E> {
        if let Some(id) = self.get(&key) {
            return Ok(id);
        }
        let id = create()?;
        self.map.insert(key, id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_only_creates_once() {
        let mut cache = KeyCache::new();
        let key = EntityKey::derive(&["a"]);
        let mut calls = 0;
        let first: Result<i64, ()> = cache.get_or_insert_with(key, || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(first, Ok(7));
        let second: Result<i64, ()> = cache.get_or_insert_with(key, || {
            calls += 1;
            Ok(8)
        });
        assert_eq!(second, Ok(7));
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }
}
