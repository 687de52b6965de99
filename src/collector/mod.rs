//! Resource collection from injected sources.
//!
//! Discovery collaborators (filesystem walkers, archive readers) supply
//! resources as `(path, content, optional version)` tuples; the collector
//! digests them and assembles a [`ResourceCollection`]. Digesting of
//! independent resources is embarrassingly parallel and runs across
//! worker threads; results are merged sequentially afterwards, which
//! preserves the collection's deterministic sorted-iteration order. The
//! first failing source aborts the whole collection — no partially
//! digested entry is ever inserted.

use crate::error::{Result, SwidError};
use crate::model::{DigestConfig, ResourceCollection, ResourceEntry, ResourcePath};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// One resource supplied by a discovery collaborator.
///
/// The collector makes no assumption about the content's origin; it only
/// needs a byte reader it can consume exactly once.
pub trait ResourceSource: Send + Sync {
    /// Path string identifying the resource (normalized by the collector)
    fn path(&self) -> &str;

    /// Open the content stream. Called exactly once per collection run.
    fn open(&self) -> Result<Box<dyn Read + '_>>;

    /// Optional resource version string
    fn version(&self) -> Option<&str> {
        None
    }
}

/// A filesystem-backed resource source.
#[derive(Debug, Clone)]
pub struct FileSource {
    /// Path string recorded in the collection
    tag_path: String,
    /// Location of the content on disk
    file_path: PathBuf,
    version: Option<String>,
}

impl FileSource {
    /// Create a source recording `tag_path` and reading from `file_path`.
    pub fn new(tag_path: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            tag_path: tag_path.into(),
            file_path: file_path.into(),
            version: None,
        }
    }

    /// Attach a version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl ResourceSource for FileSource {
    fn path(&self) -> &str {
        &self.tag_path
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        let file = File::open(&self.file_path)
            .map_err(|e| SwidError::io(self.file_path.clone(), e))?;
        Ok(Box::new(file))
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// An in-memory resource source, mainly useful to explicit callers and
/// tests.
#[derive(Debug, Clone)]
pub struct BytesSource {
    path: String,
    content: Vec<u8>,
    version: Option<String>,
}

impl BytesSource {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            version: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

impl ResourceSource for BytesSource {
    fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Box<dyn Read + '_>> {
        Ok(Box::new(self.content.as_slice()))
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

fn digest_source<S: ResourceSource + ?Sized>(
    source: &S,
    config: &DigestConfig,
) -> Result<ResourceEntry> {
    let path = ResourcePath::new(source.path())?;
    let reader = source.open()?;
    let entry = ResourceEntry::from_reader(path, reader, config)?;
    Ok(match source.version() {
        Some(version) => entry.with_version(version),
        None => entry,
    })
}

/// Digest every source and assemble a collection.
///
/// Sources are digested in parallel, one content stream per worker; the
/// entries are then inserted sequentially. Fails on the first source
/// error without inserting anything.
pub fn collect<S: ResourceSource>(
    sources: &[S],
    config: &DigestConfig,
) -> Result<ResourceCollection> {
    use rayon::prelude::*;

    tracing::debug!(sources = sources.len(), "collecting resources");
    let entries: Vec<ResourceEntry> = sources
        .par_iter()
        .map(|source| digest_source(source, config))
        .collect::<Result<_>>()?;

    Ok(entries.into_iter().collect())
}

/// Digest every source on the calling thread.
///
/// Same contract as [`collect`]; useful when the caller already runs
/// inside a worker pool.
pub fn collect_sequential<S: ResourceSource>(
    sources: &[S],
    config: &DigestConfig,
) -> Result<ResourceCollection> {
    let mut collection = ResourceCollection::new();
    for source in sources {
        collection.add(digest_source(source, config)?);
    }
    Ok(collection)
}

/// Walk a directory tree and collect every regular file beneath it.
///
/// Recorded paths are relative to `root`, so two checkouts of the same
/// content produce identical collections regardless of where they live
/// on disk.
pub fn collect_dir(root: &Path, config: &DigestConfig) -> Result<ResourceCollection> {
    let mut sources = Vec::new();
    walk_dir(root, root, &mut sources)?;
    collect(&sources, config)
}

fn walk_dir(root: &Path, dir: &Path, sources: &mut Vec<FileSource>) -> Result<()> {
    let mut dir_entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| SwidError::io(dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| SwidError::io(dir, e))?;
    // Deterministic traversal; the collection re-sorts anyway, but
    // error ordering should not depend on readdir order
    dir_entries.sort_by_key(std::fs::DirEntry::path);

    for dir_entry in dir_entries {
        let path = dir_entry.path();
        let file_type = dir_entry.file_type().map_err(|e| SwidError::io(&path, e))?;
        if file_type.is_dir() {
            walk_dir(root, &path, sources)?;
        } else if file_type.is_file() {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            sources.push(FileSource::new(relative.to_string_lossy(), &path));
        }
    }
    Ok(())
}
