//! Resource records and digest configuration.

use crate::digest::{HashAlgorithm, MultiDigester};
use crate::error::{Result, SwidError};
use crate::model::path::ResourcePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Digesting policy for resource construction.
///
/// `algorithms` lists every digest computed per resource; the default set
/// covers sha-256 for interoperability plus the sha-512 digest required for
/// collection aggregation. `allow_empty` is the empty-resource policy flag
/// (default: allow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Digest algorithms computed for every resource
    pub algorithms: Vec<HashAlgorithm>,
    /// Whether zero-length resources are accepted
    pub allow_empty: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            algorithms: vec![HashAlgorithm::Sha256, HashAlgorithm::Sha512],
            allow_empty: true,
        }
    }
}

impl DigestConfig {
    /// Replace the computed algorithm set
    #[must_use]
    pub fn with_algorithms(mut self, algorithms: Vec<HashAlgorithm>) -> Self {
        self.algorithms = algorithms;
        self
    }

    /// Reject zero-length resources
    #[must_use]
    pub const fn deny_empty(mut self) -> Self {
        self.allow_empty = false;
        self
    }
}

/// One file-like resource: normalized path, observed size, per-algorithm
/// digests, and an optional version string.
///
/// Created once when the resource's content stream has been read to
/// completion, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    path: ResourcePath,
    size: u64,
    digests: BTreeMap<HashAlgorithm, Vec<u8>>,
    version: Option<String>,
}

impl ResourceEntry {
    /// Build an entry by consuming a content stream exactly once.
    ///
    /// Size and every configured digest are observed in a single pass over
    /// the stream (fan-out, not one read per algorithm). Fails with
    /// [`SwidError::EmptyResource`] when the stream is empty and the policy
    /// disallows empty resources; IO failures surface with path context.
    pub fn from_reader<R: Read>(
        path: ResourcePath,
        reader: R,
        config: &DigestConfig,
    ) -> Result<Self> {
        let mut digester = MultiDigester::new(&config.algorithms);
        digester.consume(reader).map_err(|err| match err {
            SwidError::Io {
                path: None,
                message,
                source,
            } => SwidError::Io {
                path: Some(path.as_str().into()),
                message,
                source,
            },
            other => other,
        })?;
        let set = digester.finalize();

        if set.size == 0 && !config.allow_empty {
            return Err(SwidError::EmptyResource {
                path: path.as_str().to_string(),
            });
        }

        Ok(Self {
            path,
            size: set.size,
            digests: set.digests,
            version: None,
        })
    }

    /// Assemble an entry from already-known parts (codec decode path)
    #[must_use]
    pub fn from_parts(
        path: ResourcePath,
        size: u64,
        digests: BTreeMap<HashAlgorithm, Vec<u8>>,
        version: Option<String>,
    ) -> Self {
        Self {
            path,
            size,
            digests,
            version,
        }
    }

    /// Attach a version string (pre-insertion; entries are otherwise frozen)
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Digest bytes for one algorithm, if computed
    #[must_use]
    pub fn digest(&self, algorithm: HashAlgorithm) -> Option<&[u8]> {
        self.digests.get(&algorithm).map(Vec::as_slice)
    }

    /// All computed digests, keyed by algorithm
    #[must_use]
    pub const fn digests(&self) -> &BTreeMap<HashAlgorithm, Vec<u8>> {
        &self.digests
    }

    /// Whether this entry can participate in aggregate-digest computation
    #[must_use]
    pub fn has_aggregation_digest(&self) -> bool {
        self.digests.contains_key(&HashAlgorithm::Sha512)
    }
}
