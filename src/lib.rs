//! **A library for building, digesting, and serializing Software
//! Identification (SWID) tags.**
//!
//! `swid-tools` assembles machine-readable SWID tag documents — product
//! metadata, the entities behind it, and the digested resources that
//! constitute it — and serializes them to the two wire forms of the
//! ISO/IEC 19770-2 schema: CoSWID CBOR (RFC 9393) and SWID XML.
//!
//! ## Key Features
//!
//! - **Validated document building**: fluent builders accumulate tag,
//!   entity, link, and payload data, enforce the schema's invariants, and
//!   freeze into an immutable document tree. Cross-field validation is
//!   collect-all: one build reports every violated constraint.
//! - **Single-pass resource digesting**: each resource's size and all of
//!   its digests (SHA-2 family) come out of one streaming read, fanned
//!   out over parallel hash states.
//! - **Content-addressed collections**: resource collections iterate in
//!   normalized-path order and expose an aggregate digest over their
//!   members' sha-512 digests, so independently assembled collections
//!   with identical content compare equal — the basis for tamper
//!   detection and duplicate-build comparison.
//! - **Deterministic codecs**: the CBOR and XML codecs walk the frozen
//!   document in one canonical order and produce byte-identical output
//!   for repeated serializations; both also decode, and decoding runs
//!   the same validation as direct assembly.
//! - **Parallel collection**: the collector digests injected resource
//!   sources across worker threads and merges sequentially, keeping
//!   collection order deterministic.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the immutable document tree ([`SwidTag`]), resource
//!   records and collections, and the closed vocabularies fixed by the
//!   governing specifications.
//! - **[`builder`]**: mutable accumulation objects — the only way to
//!   construct documents.
//! - **[`digest`]**: the streaming digest engine and fan-out accumulator.
//! - **[`codec`]**: the [`TagCodec`] implementations for CoSWID CBOR and
//!   SWID XML.
//! - **[`collector`]**: parallel digesting over injected resource
//!   sources, plus a filesystem walker.
//!
//! ## Getting Started: Building and Serializing a Tag
//!
//! ```
//! use swid_tools::{
//!     BytesSource, CborCodec, DigestConfig, EntityBuilder, Role, SwidTagBuilder, TagCodec,
//!     VersionScheme, XmlCodec,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sources = [
//!         BytesSource::new("bin/app.exe", b"AA".to_vec()),
//!         BytesSource::new("lib/app.dll", b"BB".to_vec()),
//!     ];
//!     let resources = swid_tools::collect(&sources, &DigestConfig::default())?;
//!
//!     let tag = SwidTagBuilder::new()
//!         .name("coswid app")
//!         .tag_id("example.com-coswid-app-1.0.0")
//!         .version("1.0.0")
//!         .version_scheme(VersionScheme::MultipartNumeric)
//!         .entity(
//!             EntityBuilder::new()
//!                 .name("Example Corp")
//!                 .regid("example.com")
//!                 .role(Role::TagCreator)
//!                 .role(Role::SoftwareCreator)
//!                 .build()?,
//!         )
//!         .payload_resources(resources)
//!         .build()?;
//!
//!     let cbor = CborCodec::new().to_bytes(&tag)?;
//!     let xml = XmlCodec::new().to_bytes(&tag)?;
//!     assert_eq!(CborCodec::new().read(&cbor)?, XmlCodec::new().read(&xml)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Comparing Builds by Content
//!
//! ```
//! use swid_tools::{collect, BytesSource, DigestConfig, HashAlgorithm};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let build_a = collect(
//!         &[
//!             BytesSource::new("bin/app.exe", b"AA".to_vec()),
//!             BytesSource::new("lib/app.dll", b"BB".to_vec()),
//!         ],
//!         &DigestConfig::default(),
//!     )?;
//!     // Same content, opposite insertion order
//!     let build_b = collect(
//!         &[
//!             BytesSource::new("lib/app.dll", b"BB".to_vec()),
//!             BytesSource::new("bin/app.exe", b"AA".to_vec()),
//!         ],
//!         &DigestConfig::default(),
//!     )?;
//!
//!     assert_eq!(
//!         build_a.aggregate_digest(HashAlgorithm::Sha256)?,
//!         build_b.aggregate_digest(HashAlgorithm::Sha256)?,
//!     );
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Variable names like `old`/`new` or `alg`/`all` are clear in context
    clippy::similar_names
)]

pub mod builder;
pub mod codec;
pub mod collector;
pub mod digest;
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use builder::{EntityBuilder, EvidenceBuilder, LinkBuilder, PayloadBuilder, SwidTagBuilder};
pub use codec::{CborCodec, TagCodec, XmlCodec};
pub use collector::{collect, collect_dir, collect_sequential, BytesSource, FileSource, ResourceSource};
pub use digest::{DigestSet, HashAlgorithm, MultiDigester};
pub use error::{CodecErrorKind, Result, SwidError, ValidationErrors, ValidationIssue};
pub use model::{
    DigestConfig, Entity, Evidence, Link, LinkOwnership, LinkRel, LinkUse, Payload,
    ResourceCollection, ResourceEntry, ResourcePath, Role, SwidTag, TagType, VersionScheme,
};
