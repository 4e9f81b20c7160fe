use std::collections::BTreeMap;

use anyhow::{Context, Result};
use substreams_entity_change::tables::Row;

/// Persisted entity, keyed by a deterministic string id.
pub trait Entity: prost::Message + Default {
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> &str;

    /// Writes every field of the entity into an entity change row.
    fn write_row(&self, row: &mut Row);
}

/// Point-lookup key-value store holding encoded entities. Last writer wins.
pub trait EntityStore {
    fn get(&self, entity_type: &str, id: &str) -> Option<Vec<u8>>;

    fn put(&mut self, entity_type: &str, id: &str, value: Vec<u8>);

    fn delete(&mut self, entity_type: &str, id: &str);
}

/// Typed access on top of any [`EntityStore`].
pub trait EntityStoreExt: EntityStore {
    fn load<E: Entity>(&self, id: &str) -> Result<Option<E>> {
        self.get(E::ENTITY_TYPE, id)
            .map(|raw| {
                E::decode(raw.as_slice())
                    .with_context(|| format!("failed to decode {} {}", E::ENTITY_TYPE, id))
            })
            .transpose()
    }

    fn save<E: Entity>(&mut self, entity: &E) {
        self.put(E::ENTITY_TYPE, entity.id(), entity.encode_to_vec());
    }

    fn remove<E: Entity>(&mut self, id: &str) {
        self.delete(E::ENTITY_TYPE, id);
    }
}

impl<S: EntityStore + ?Sized> EntityStoreExt for S {}

pub type EntityKey = (String, String);

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entities: BTreeMap<EntityKey, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of rows stored for one entity type.
    pub fn count(&self, entity_type: &str) -> usize {
        self.entities
            .keys()
            .filter(|(kind, _)| kind == entity_type)
            .count()
    }
}

impl EntityStore for MemoryStore {
    fn get(&self, entity_type: &str, id: &str) -> Option<Vec<u8>> {
        self.entities
            .get(&(entity_type.to_string(), id.to_string()))
            .cloned()
    }

    fn put(&mut self, entity_type: &str, id: &str, value: Vec<u8>) {
        self.entities
            .insert((entity_type.to_string(), id.to_string()), value);
    }

    fn delete(&mut self, entity_type: &str, id: &str) {
        self.entities
            .remove(&(entity_type.to_string(), id.to_string()));
    }
}

/// Write-back overlay over a base store. Holds the writes of a block until they are
/// committed; dropping it discards them.
pub struct StagedStore<'a, S: EntityStore> {
    base: &'a S,
    writes: BTreeMap<EntityKey, Option<Vec<u8>>>,
}

impl<'a, S: EntityStore> StagedStore<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self { base, writes: BTreeMap::new() }
    }

    /// Staged writes in key order. `None` marks a deletion.
    pub fn into_writes(self) -> BTreeMap<EntityKey, Option<Vec<u8>>> {
        self.writes
    }
}

impl<S: EntityStore> EntityStore for StagedStore<'_, S> {
    fn get(&self, entity_type: &str, id: &str) -> Option<Vec<u8>> {
        match self
            .writes
            .get(&(entity_type.to_string(), id.to_string()))
        {
            Some(staged) => staged.clone(),
            None => self.base.get(entity_type, id),
        }
    }

    fn put(&mut self, entity_type: &str, id: &str, value: Vec<u8>) {
        self.writes
            .insert((entity_type.to_string(), id.to_string()), Some(value));
    }

    fn delete(&mut self, entity_type: &str, id: &str) {
        self.writes
            .insert((entity_type.to_string(), id.to_string()), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb::tribute::v1::Adapter;

    fn adapter(id: &str, acl: &str) -> Adapter {
        Adapter { id: id.to_string(), acl: acl.to_string(), ..Default::default() }
    }

    #[test]
    fn test_typed_round_trip() {
        let mut store = MemoryStore::new();
        store.save(&adapter("a1", "7"));

        let loaded: Adapter = store.load("a1").unwrap().unwrap();
        assert_eq!(loaded.acl, "7");
        assert!(store.load::<Adapter>("a2").unwrap().is_none());

        store.remove::<Adapter>("a1");
        assert!(store.is_empty());
    }

    #[test]
    fn test_undecodable_entity_is_an_error() {
        let mut store = MemoryStore::new();
        store.put("Adapter", "a1", vec![0xff, 0xff, 0xff]);

        assert!(store.load::<Adapter>("a1").is_err());
    }

    #[test]
    fn test_staged_store_reads_its_own_writes() {
        let mut base = MemoryStore::new();
        base.save(&adapter("a1", "1"));
        base.save(&adapter("a2", "2"));

        let mut staged = StagedStore::new(&base);
        staged.save(&adapter("a1", "10"));
        staged.remove::<Adapter>("a2");

        assert_eq!(staged.load::<Adapter>("a1").unwrap().unwrap().acl, "10");
        assert!(staged.load::<Adapter>("a2").unwrap().is_none());

        let writes = staged.into_writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[&("Adapter".to_string(), "a2".to_string())], None);

        // the base is untouched until the writes are applied
        assert_eq!(base.load::<Adapter>("a1").unwrap().unwrap().acl, "1");
        assert_eq!(base.count("Adapter"), 2);
    }
}
