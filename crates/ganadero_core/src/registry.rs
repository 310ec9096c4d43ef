//! Read-only reference registries: breeds and feeds.
//!
//! Both are built once and then only borrowed by the engines.

use crate::error::{EngineError, Result};
use crate::genetics::HYBRID_ID_SEPARATOR;
use ganadero_data::{normalize_key, Breed, FeedItem};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Breed reference data indexed by id with a normalized name index.
///
/// Lookups try the exact id, then the normalized id/name, then a
/// deterministic substring match over the normalized keys.
#[derive(Debug, Clone, Default)]
pub struct BreedRegistry {
    breeds: BTreeMap<String, Breed>,
    index: BTreeMap<String, String>,
}

impl BreedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry. A later breed with a repeated id replaces the earlier one.
    pub fn from_breeds<I: IntoIterator<Item = Breed>>(breeds: I) -> Self {
        let mut registry = Self::new();
        for breed in breeds {
            registry.insert(breed);
        }
        registry
    }

    fn insert(&mut self, breed: Breed) {
        if breed.id.contains(HYBRID_ID_SEPARATOR) {
            tracing::warn!(breed = %breed.id, "Breed id clashes with hybrid ids, skipping");
            return;
        }
        if self.breeds.contains_key(&breed.id) {
            tracing::warn!(breed = %breed.id, "Duplicate breed id, keeping the last one");
        }
        for key in [normalize_key(&breed.id), normalize_key(&breed.name)] {
            if !key.is_empty() {
                self.index.entry(key).or_insert_with(|| breed.id.clone());
            }
        }
        self.breeds.insert(breed.id.clone(), breed);
    }

    /// Exact id lookup.
    pub fn get(&self, id: &str) -> Option<&Breed> {
        self.breeds.get(id)
    }

    /// Id, then normalized name, then substring fallback.
    pub fn lookup(&self, name: &str) -> Option<&Breed> {
        if let Some(breed) = self.breeds.get(name) {
            return Some(breed);
        }
        let key = normalize_key(name);
        if key.is_empty() {
            return None;
        }
        if let Some(id) = self.index.get(&key) {
            return self.breeds.get(id);
        }

        // Longest matching key wins; BTreeMap order breaks ties.
        let mut best: Option<(&String, &String)> = None;
        for (indexed, id) in &self.index {
            if indexed.contains(&key) || key.contains(indexed.as_str()) {
                match best {
                    Some((current, _)) if current.len() >= indexed.len() => {}
                    _ => best = Some((indexed, id)),
                }
            }
        }
        best.and_then(|(indexed, id)| {
            tracing::debug!(query = name, matched = %indexed, "Breed matched by substring");
            self.breeds.get(id)
        })
    }

    /// Like [`lookup`](Self::lookup) but a miss is an error.
    pub fn require(&self, name: &str) -> Result<&Breed> {
        self.lookup(name)
            .ok_or_else(|| EngineError::breed_not_found(name))
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breed> {
        self.breeds.values()
    }

    /// Writes the breeds as a pretty JSON array, in id order.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let breeds: Vec<&Breed> = self.breeds.values().collect();
        serde_json::to_writer_pretty(writer, &breeds)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let breeds: Vec<Breed> = serde_json::from_reader(reader)?;
        Ok(Self::from_breeds(breeds))
    }
}

/// Feed catalog keyed by id, preserving load order.
#[derive(Debug, Clone, Default)]
pub struct FeedCatalog {
    items: Vec<FeedItem>,
    by_id: HashMap<String, usize>,
}

impl FeedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<I: IntoIterator<Item = FeedItem>>(items: I) -> Self {
        let mut catalog = Self::new();
        for item in items {
            match catalog.by_id.get(&item.id) {
                Some(&idx) => catalog.items[idx] = item,
                None => {
                    catalog.by_id.insert(item.id.clone(), catalog.items.len());
                    catalog.items.push(item);
                }
            }
        }
        catalog
    }

    pub fn get(&self, id: &str) -> Option<&FeedItem> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedItem> {
        self.items.iter()
    }
}
