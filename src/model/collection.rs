//! Ordered, path-keyed resource collections with aggregate digests.

use crate::digest::{HashAlgorithm, MultiDigester};
use crate::error::{Result, SwidError};
use crate::model::path::ResourcePath;
use crate::model::resource::ResourceEntry;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// An ordered set of [`ResourceEntry`] records keyed by normalized path.
///
/// Iteration order is the natural sort order of the normalized path
/// strings, independent of insertion order, so two collections with
/// identical content produce identical aggregate digests no matter how
/// they were assembled. Inserting a second entry for an existing path
/// replaces the first (last-write-wins).
///
/// Not safe for concurrent mutation; document assembly is sequential
/// within one build invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "Vec<ResourceEntry>", from = "Vec<ResourceEntry>")]
pub struct ResourceCollection {
    entries: BTreeMap<ResourcePath, ResourceEntry>,
    /// Secondary index from raw input spelling to normalized key
    raw_index: HashMap<String, ResourcePath>,
    /// Lazily computed aggregate digests, cleared on any mutation
    digest_cache: RefCell<BTreeMap<HashAlgorithm, Vec<u8>>>,
}

impl ResourceCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry by its normalized path.
    ///
    /// Returns the replaced entry on a last-write-wins collision. Any
    /// previously computed aggregate digest is invalidated.
    pub fn add(&mut self, entry: ResourceEntry) -> Option<ResourceEntry> {
        self.digest_cache.borrow_mut().clear();
        let path = entry.path().clone();
        self.raw_index
            .insert(path.raw().to_string(), path.clone());
        let replaced = self.entries.insert(path, entry);
        if let Some(previous) = &replaced {
            tracing::warn!(
                path = %previous.path(),
                "resource path inserted twice; earlier entry replaced"
            );
        }
        replaced
    }

    /// Remove an entry by path string, invalidating derived digests
    pub fn remove(&mut self, path: &str) -> Option<ResourceEntry> {
        let key = self.resolve(path)?;
        self.digest_cache.borrow_mut().clear();
        self.raw_index.retain(|_, v| *v != key);
        self.entries.remove(&key)
    }

    /// Look up an entry by path string.
    ///
    /// The string is matched against the normalized form; the raw-string
    /// index lets producers that kept the original spelling resolve it
    /// without re-normalizing.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ResourceEntry> {
        let key = self.resolve(path)?;
        self.entries.get(&key)
    }

    fn resolve(&self, path: &str) -> Option<ResourcePath> {
        if let Some(known) = self.raw_index.get(path) {
            return Some(known.clone());
        }
        ResourcePath::new(path).ok()
    }

    /// Entries in normalized-path sort order (stable across runs)
    pub fn entries(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.values()
    }

    /// Normalized paths in sort order
    pub fn paths(&self) -> impl Iterator<Item = &ResourcePath> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all member resource sizes in bytes
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.entries.values().map(ResourceEntry::size).sum()
    }

    /// Compute the collection-level aggregate digest under `algorithm`.
    ///
    /// Feeds each entry's sha-512 digest bytes, in normalized-path sort
    /// order, into a fresh running hash and finalizes it. Two collections
    /// are content-equal iff their aggregate digests under the same
    /// algorithm are equal. The result is cached until the next mutation.
    ///
    /// Fails with [`SwidError::MissingDigest`] naming the first entry that
    /// lacks a sha-512 digest.
    pub fn aggregate_digest(&self, algorithm: HashAlgorithm) -> Result<Vec<u8>> {
        if let Some(cached) = self.digest_cache.borrow().get(&algorithm) {
            return Ok(cached.clone());
        }

        let mut digester = MultiDigester::new(&[algorithm]);
        for entry in self.entries.values() {
            let member = entry.digest(HashAlgorithm::Sha512).ok_or_else(|| {
                SwidError::MissingDigest {
                    path: entry.path().as_str().to_string(),
                }
            })?;
            digester.update(member);
        }
        let digest = digester
            .finalize()
            .digests
            .remove(&algorithm)
            .unwrap_or_default();

        self.digest_cache
            .borrow_mut()
            .insert(algorithm, digest.clone());
        Ok(digest)
    }
}

impl From<ResourceCollection> for Vec<ResourceEntry> {
    fn from(collection: ResourceCollection) -> Self {
        collection.entries.into_values().collect()
    }
}

impl From<Vec<ResourceEntry>> for ResourceCollection {
    fn from(entries: Vec<ResourceEntry>) -> Self {
        let mut collection = Self::new();
        for entry in entries {
            collection.add(entry);
        }
        collection
    }
}

impl PartialEq for ResourceCollection {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ResourceCollection {}

impl FromIterator<ResourceEntry> for ResourceCollection {
    fn from_iter<I: IntoIterator<Item = ResourceEntry>>(iter: I) -> Self {
        let mut collection = Self::new();
        for entry in iter {
            collection.add(entry);
        }
        collection
    }
}
