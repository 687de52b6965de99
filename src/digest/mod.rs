//! Streaming digest engine.
//!
//! Computes cryptographic digests over byte streams for a closed set of
//! algorithms. The set is closed by construction: an unsupported algorithm
//! cannot be named in the API, so the only place an unknown algorithm can
//! appear is in decoded wire input, where the codecs reject it.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::collections::BTreeMap;
use std::io::Read;

/// Read buffer size for streaming digest computation
const CHUNK_SIZE: usize = 64 * 1024;

/// Supported digest algorithms.
///
/// Each variant carries its canonical name string, output length, CoSWID
/// algorithm identifier (IANA Named Information registry), and the XML
/// digest namespace, all fixed by the governing specifications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Every supported algorithm, in registry order
    pub const ALL: [Self; 3] = [Self::Sha256, Self::Sha384, Self::Sha512];

    /// Canonical algorithm name (IANA Named Information hash name)
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha-256",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
        }
    }

    /// Digest output length in bytes
    #[must_use]
    pub const fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// CoSWID algorithm identifier (IANA Named Information registry)
    #[must_use]
    pub const fn coswid_index(&self) -> u64 {
        match self {
            Self::Sha256 => 1,
            Self::Sha384 => 7,
            Self::Sha512 => 8,
        }
    }

    /// Look up an algorithm by its CoSWID identifier
    #[must_use]
    pub const fn from_coswid_index(index: u64) -> Option<Self> {
        match index {
            1 => Some(Self::Sha256),
            7 => Some(Self::Sha384),
            8 => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Look up an algorithm by its canonical name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha-256" => Some(Self::Sha256),
            "sha-384" => Some(Self::Sha384),
            "sha-512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// XML namespace URI for this algorithm's hash attribute
    #[must_use]
    pub const fn xml_namespace(&self) -> &'static str {
        match self {
            Self::Sha256 => "http://www.w3.org/2001/04/xmlenc#sha256",
            Self::Sha384 => "http://www.w3.org/2001/04/xmldsig-more#sha384",
            Self::Sha512 => "http://www.w3.org/2001/04/xmlenc#sha512",
        }
    }

    /// XML namespace prefix conventionally bound to this algorithm
    #[must_use]
    pub const fn xml_prefix(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
        }
    }

    /// Digest an entire byte slice
    #[must_use]
    pub fn digest_bytes(&self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(bytes).to_vec(),
            Self::Sha384 => Sha384::digest(bytes).to_vec(),
            Self::Sha512 => Sha512::digest(bytes).to_vec(),
        }
    }

    /// Digest a byte stream, consuming it exactly once.
    ///
    /// Streaming: the content is never held in memory all at once.
    pub fn digest_reader<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        let mut digester = MultiDigester::new(&[*self]);
        digester.consume(reader)?;
        let set = digester.finalize();
        // The single requested algorithm is always present
        Ok(set.digests.into_iter().next().map(|(_, d)| d).unwrap_or_default())
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Running hash state for one algorithm
enum HasherState {
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl HasherState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(chunk),
            Self::Sha384(h) => h.update(chunk),
            Self::Sha512(h) => h.update(chunk),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha384(h) => h.finalize().to_vec(),
            Self::Sha512(h) => h.finalize().to_vec(),
        }
    }
}

/// Digests and size observed from one pass over a content stream
#[derive(Debug, Clone)]
pub struct DigestSet {
    /// Total bytes consumed
    pub size: u64,
    /// Digest per requested algorithm
    pub digests: BTreeMap<HashAlgorithm, Vec<u8>>,
}

/// Fan-out digest accumulator.
///
/// Feeds each input chunk into one running hash per requested algorithm
/// plus a byte counter, so size and N digests come out of a single read of
/// the source rather than N separate reads.
pub struct MultiDigester {
    states: Vec<(HashAlgorithm, HasherState)>,
    size: u64,
}

impl MultiDigester {
    /// Create an accumulator for the given algorithms (duplicates ignored)
    #[must_use]
    pub fn new(algorithms: &[HashAlgorithm]) -> Self {
        let mut states: Vec<(HashAlgorithm, HasherState)> = Vec::new();
        for &alg in algorithms {
            if !states.iter().any(|(a, _)| *a == alg) {
                states.push((alg, HasherState::new(alg)));
            }
        }
        Self { states, size: 0 }
    }

    /// Feed one chunk into every running hash
    pub fn update(&mut self, chunk: &[u8]) {
        self.size += chunk.len() as u64;
        for (_, state) in &mut self.states {
            state.update(chunk);
        }
    }

    /// Consume a reader to completion in fixed-size chunks
    pub fn consume<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            self.update(&buf[..n]);
        }
        Ok(())
    }

    /// Bytes consumed so far
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Finalize every hash and return the observed size alongside
    #[must_use]
    pub fn finalize(self) -> DigestSet {
        let size = self.size;
        let digests = self
            .states
            .into_iter()
            .map(|(alg, state)| (alg, state.finalize()))
            .collect();
        DigestSet { size, digests }
    }
}
