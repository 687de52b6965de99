//! CoSWID binary codec (RFC 9393, CBOR).
//!
//! Fields are keyed by the fixed integer indices of the CoSWID map-key
//! registry. One-or-many groups (entities, roles, files, hashes) follow
//! the CDDL convention: a single member is emitted bare, multiple members
//! as an array; the decoder accepts both shapes.

use crate::builder::{EntityBuilder, EvidenceBuilder, LinkBuilder, SwidTagBuilder};
use crate::codec::{TagCodec, REGID_NONE};
use crate::digest::HashAlgorithm;
use crate::error::{CodecErrorKind, Result, SwidError};
use crate::model::{
    Entity, Evidence, Link, LinkOwnership, LinkRel, LinkUse, Payload, ResourceCollection,
    ResourceEntry, ResourcePath, Role, SwidTag, TagType, VersionScheme,
};
use ciborium::value::Value;
use std::collections::BTreeMap;
use std::io::Write;

/// CoSWID map-key registry indices (RFC 9393)
mod key {
    pub const TAG_ID: u64 = 0;
    pub const SOFTWARE_NAME: u64 = 1;
    pub const ENTITY: u64 = 2;
    pub const EVIDENCE: u64 = 3;
    pub const LINK: u64 = 4;
    pub const PAYLOAD: u64 = 6;
    pub const HASH: u64 = 7;
    pub const CORPUS: u64 = 8;
    pub const PATCH: u64 = 9;
    pub const MEDIA: u64 = 10;
    pub const SUPPLEMENTAL: u64 = 11;
    pub const TAG_VERSION: u64 = 12;
    pub const SOFTWARE_VERSION: u64 = 13;
    pub const VERSION_SCHEME: u64 = 14;
    pub const LANG: u64 = 15;
    pub const FILE: u64 = 17;
    pub const SIZE: u64 = 20;
    pub const FILE_VERSION: u64 = 21;
    pub const FS_NAME: u64 = 24;
    pub const ENTITY_NAME: u64 = 31;
    pub const REG_ID: u64 = 32;
    pub const ROLE: u64 = 33;
    pub const THUMBPRINT: u64 = 34;
    pub const DATE: u64 = 35;
    pub const DEVICE_ID: u64 = 36;
    pub const ARTIFACT: u64 = 37;
    pub const HREF: u64 = 38;
    pub const OWNERSHIP: u64 = 39;
    pub const REL: u64 = 40;
    pub const MEDIA_TYPE: u64 = 41;
    pub const USE: u64 = 42;
}

/// CoSWID CBOR codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct CborCodec;

impl CborCodec {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TagCodec for CborCodec {
    fn format_name(&self) -> &'static str {
        "coswid-cbor"
    }

    fn write(&self, tag: &SwidTag, sink: &mut dyn Write) -> Result<()> {
        tracing::debug!(tag_id = tag.tag_id(), "encoding CoSWID CBOR tag");
        let value = encode_tag(tag);
        // Stage in a buffer so a failed encode emits nothing
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&value, &mut buf)
            .map_err(|e| SwidError::codec("CBOR write", CodecErrorKind::CborEncode(e.to_string())))?;
        sink.write_all(&buf)?;
        Ok(())
    }

    fn read(&self, bytes: &[u8]) -> Result<SwidTag> {
        let value: Value = ciborium::de::from_reader(bytes)
            .map_err(|e| SwidError::codec("CBOR read", CodecErrorKind::CborDecode(e.to_string())))?;
        decode_tag(&value)
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn int(value: u64) -> Value {
    Value::Integer(value.into())
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// Emit a one-or-many group: bare member when single, array otherwise
fn one_or_many(mut members: Vec<Value>) -> Value {
    if members.len() == 1 {
        members.remove(0)
    } else {
        Value::Array(members)
    }
}

fn encode_tag(tag: &SwidTag) -> Value {
    // Canonical walk order: tag attributes, entities, links, payload,
    // evidence. Map key order is emission order, fixed here.
    let mut map: Vec<(Value, Value)> = vec![
        (int(key::TAG_ID), text(tag.tag_id())),
        (int(key::TAG_VERSION), int(u64::from(tag.tag_version()))),
        (int(key::SOFTWARE_NAME), text(tag.name())),
    ];

    if let Some(version) = tag.version() {
        map.push((int(key::SOFTWARE_VERSION), text(version)));
    }
    if let Some(scheme) = tag.version_scheme() {
        let encoded = match scheme.coswid_index() {
            Some(index) => int(index),
            None => text(scheme.iso_name()),
        };
        map.push((int(key::VERSION_SCHEME), encoded));
    }
    if let Some(language) = tag.language() {
        map.push((int(key::LANG), text(language)));
    }
    match tag.tag_type() {
        TagType::Primary => {}
        TagType::Corpus => map.push((int(key::CORPUS), Value::Bool(true))),
        TagType::Patch => map.push((int(key::PATCH), Value::Bool(true))),
        TagType::Supplemental => map.push((int(key::SUPPLEMENTAL), Value::Bool(true))),
    }

    let entities: Vec<Value> = tag.entities().iter().map(encode_entity).collect();
    map.push((int(key::ENTITY), one_or_many(entities)));

    if !tag.links().is_empty() {
        let links: Vec<Value> = tag.links().iter().map(encode_link).collect();
        map.push((int(key::LINK), one_or_many(links)));
    }

    if let Some(payload) = tag.payload() {
        map.push((int(key::PAYLOAD), encode_resources(payload.resources(), &[])));
    }
    if let Some(evidence) = tag.evidence() {
        let mut extra: Vec<(Value, Value)> = Vec::new();
        if let Some(date) = evidence.date() {
            extra.push((int(key::DATE), text(date)));
        }
        if let Some(device_id) = evidence.device_id() {
            extra.push((int(key::DEVICE_ID), text(device_id)));
        }
        map.push((int(key::EVIDENCE), encode_resources(evidence.resources(), &extra)));
    }

    Value::Map(map)
}

fn encode_entity(entity: &Entity) -> Value {
    let mut map: Vec<(Value, Value)> = vec![
        (int(key::ENTITY_NAME), text(entity.name())),
        (
            int(key::REG_ID),
            text(entity.regid().unwrap_or(REGID_NONE)),
        ),
    ];
    let roles: Vec<Value> = entity
        .roles()
        .iter()
        .map(|r| int(r.coswid_index()))
        .collect();
    map.push((int(key::ROLE), one_or_many(roles)));
    if let Some(thumbprint) = entity.thumbprint() {
        map.push((int(key::THUMBPRINT), text(thumbprint)));
    }
    Value::Map(map)
}

fn encode_link(link: &Link) -> Value {
    let mut map: Vec<(Value, Value)> = vec![
        (int(key::HREF), text(link.href())),
        (int(key::REL), int(link.rel().coswid_index())),
    ];
    if let Some(artifact) = link.artifact() {
        map.push((int(key::ARTIFACT), text(artifact)));
    }
    if let Some(media) = link.media() {
        map.push((int(key::MEDIA), text(media)));
    }
    if let Some(media_type) = link.media_type() {
        map.push((int(key::MEDIA_TYPE), text(media_type)));
    }
    if let Some(ownership) = link.ownership() {
        map.push((int(key::OWNERSHIP), int(ownership.coswid_index())));
    }
    if let Some(link_use) = link.link_use() {
        map.push((int(key::USE), int(link_use.coswid_index())));
    }
    Value::Map(map)
}

/// Encode a resource collection as a payload/evidence map with flat file
/// entries in the collection's sorted order
fn encode_resources(resources: &ResourceCollection, extra: &[(Value, Value)]) -> Value {
    let mut map: Vec<(Value, Value)> = extra.to_vec();
    let files: Vec<Value> = resources.entries().map(encode_file).collect();
    if !files.is_empty() {
        map.push((int(key::FILE), one_or_many(files)));
    }
    Value::Map(map)
}

fn encode_file(entry: &ResourceEntry) -> Value {
    let mut map: Vec<(Value, Value)> = vec![
        (int(key::FS_NAME), text(entry.path().as_str())),
        (int(key::SIZE), int(entry.size())),
    ];
    if let Some(version) = entry.version() {
        map.push((int(key::FILE_VERSION), text(version)));
    }
    // hash-entry = [alg-id, hash-value]; BTreeMap order keeps the group
    // deterministic
    let hashes: Vec<Value> = entry
        .digests()
        .iter()
        .map(|(alg, digest)| {
            Value::Array(vec![int(alg.coswid_index()), Value::Bytes(digest.clone())])
        })
        .collect();
    if !hashes.is_empty() {
        map.push((int(key::HASH), one_or_many(hashes)));
    }
    Value::Map(map)
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_err(field: &str, message: impl Into<String>) -> SwidError {
    SwidError::codec(
        "CBOR read",
        CodecErrorKind::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        },
    )
}

fn as_map<'a>(value: &'a Value, field: &str) -> Result<&'a [(Value, Value)]> {
    value
        .as_map()
        .map(Vec::as_slice)
        .ok_or_else(|| decode_err(field, "expected a CBOR map"))
}

fn as_text<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .as_text()
        .ok_or_else(|| decode_err(field, "expected a text string"))
}

fn as_u64(value: &Value, field: &str) -> Result<u64> {
    let integer = value
        .as_integer()
        .ok_or_else(|| decode_err(field, "expected an unsigned integer"))?;
    u64::try_from(integer).map_err(|_| decode_err(field, "integer out of range"))
}

fn as_bytes<'a>(value: &'a Value, field: &str) -> Result<&'a [u8]> {
    value
        .as_bytes()
        .map(Vec::as_slice)
        .ok_or_else(|| decode_err(field, "expected a byte string"))
}

/// View a one-or-many group uniformly as a slice of members
fn group(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn decode_tag(value: &Value) -> Result<SwidTag> {
    let map = as_map(value, "tag")?;
    let mut builder = SwidTagBuilder::new();

    for (k, v) in map {
        let index = as_u64(k, "tag key")?;
        match index {
            key::TAG_ID => builder = builder.tag_id(as_text(v, "tagId")?),
            key::TAG_VERSION => {
                let raw = as_u64(v, "tagVersion")?;
                let tag_version = u32::try_from(raw)
                    .map_err(|_| decode_err("tagVersion", "out of range"))?;
                builder = builder.tag_version(tag_version);
            }
            key::SOFTWARE_NAME => builder = builder.name(as_text(v, "name")?),
            key::SOFTWARE_VERSION => builder = builder.version(as_text(v, "version")?),
            key::VERSION_SCHEME => builder = builder.version_scheme(decode_version_scheme(v)?),
            key::LANG => builder = builder.language(as_text(v, "lang")?),
            key::CORPUS => {
                if v.as_bool().unwrap_or(false) {
                    builder = builder.tag_type(TagType::Corpus);
                }
            }
            key::PATCH => {
                if v.as_bool().unwrap_or(false) {
                    builder = builder.tag_type(TagType::Patch);
                }
            }
            key::SUPPLEMENTAL => {
                if v.as_bool().unwrap_or(false) {
                    builder = builder.tag_type(TagType::Supplemental);
                }
            }
            key::ENTITY => {
                for member in group(v) {
                    builder = builder.entity(decode_entity(member)?);
                }
            }
            key::LINK => {
                for member in group(v) {
                    builder = builder.link(decode_link(member)?);
                }
            }
            key::PAYLOAD => {
                let resources = decode_resources(v)?;
                builder = builder.payload(Payload::from(resources));
            }
            key::EVIDENCE => builder = builder.evidence(decode_evidence(v)?),
            // Unknown registry keys are not silently meaningful; reject
            // rather than drop them
            other => {
                return Err(decode_err(
                    "tag",
                    format!("unsupported CoSWID map key {other}"),
                ));
            }
        }
    }

    builder.build()
}

fn decode_version_scheme(value: &Value) -> Result<VersionScheme> {
    match value {
        Value::Integer(_) => {
            let index = as_u64(value, "versionScheme")?;
            VersionScheme::from_coswid_index(index).ok_or_else(|| {
                decode_err("versionScheme", format!("unknown registry index {index}"))
            })
        }
        Value::Text(name) => VersionScheme::from_iso_name(name)
            .ok_or_else(|| decode_err("versionScheme", format!("unknown scheme '{name}'"))),
        _ => Err(decode_err("versionScheme", "expected integer or text")),
    }
}

fn decode_role(value: &Value) -> Result<Role> {
    match value {
        Value::Integer(_) => {
            let index = as_u64(value, "role")?;
            Role::from_coswid_index(index)
                .ok_or_else(|| decode_err("role", format!("unknown registry index {index}")))
        }
        Value::Text(name) => Role::from_iso_name(name)
            .ok_or_else(|| decode_err("role", format!("unknown role '{name}'"))),
        _ => Err(decode_err("role", "expected integer or text")),
    }
}

fn decode_entity(value: &Value) -> Result<Entity> {
    let map = as_map(value, "entity")?;
    let mut builder = EntityBuilder::new();

    for (k, v) in map {
        let index = as_u64(k, "entity key")?;
        match index {
            key::ENTITY_NAME => builder = builder.name(as_text(v, "entity.name")?),
            key::REG_ID => {
                let regid = as_text(v, "entity.regid")?;
                if regid != REGID_NONE {
                    builder = builder.regid(regid);
                }
            }
            key::ROLE => {
                for member in group(v) {
                    builder = builder.role(decode_role(member)?);
                }
            }
            key::THUMBPRINT => builder = builder.thumbprint(as_text(v, "entity.thumbprint")?),
            other => {
                return Err(decode_err(
                    "entity",
                    format!("unsupported CoSWID map key {other}"),
                ));
            }
        }
    }

    builder.build()
}

fn decode_link(value: &Value) -> Result<Link> {
    let map = as_map(value, "link")?;
    let mut builder = LinkBuilder::new();

    for (k, v) in map {
        let index = as_u64(k, "link key")?;
        match index {
            key::HREF => builder = builder.href(as_text(v, "link.href")?),
            key::REL => {
                let rel = match v {
                    Value::Text(name) => LinkRel::from_iso_name(name)
                        .ok_or_else(|| decode_err("link.rel", format!("unknown rel '{name}'")))?,
                    _ => {
                        let index = as_u64(v, "link.rel")?;
                        LinkRel::from_coswid_index(index).ok_or_else(|| {
                            decode_err("link.rel", format!("unknown registry index {index}"))
                        })?
                    }
                };
                builder = builder.rel(rel);
            }
            key::ARTIFACT => builder = builder.artifact(as_text(v, "link.artifact")?),
            key::MEDIA => builder = builder.media(as_text(v, "link.media")?),
            key::MEDIA_TYPE => builder = builder.media_type(as_text(v, "link.mediaType")?),
            key::OWNERSHIP => {
                let index = as_u64(v, "link.ownership")?;
                let ownership = LinkOwnership::from_coswid_index(index).ok_or_else(|| {
                    decode_err("link.ownership", format!("unknown registry index {index}"))
                })?;
                builder = builder.ownership(ownership);
            }
            key::USE => {
                let index = as_u64(v, "link.use")?;
                let link_use = LinkUse::from_coswid_index(index).ok_or_else(|| {
                    decode_err("link.use", format!("unknown registry index {index}"))
                })?;
                builder = builder.link_use(link_use);
            }
            other => {
                return Err(decode_err(
                    "link",
                    format!("unsupported CoSWID map key {other}"),
                ));
            }
        }
    }

    builder.build()
}

fn decode_resources(value: &Value) -> Result<ResourceCollection> {
    let map = as_map(value, "payload")?;
    let mut collection = ResourceCollection::new();
    for (k, v) in map {
        let index = as_u64(k, "payload key")?;
        match index {
            key::FILE => {
                for member in group(v) {
                    collection.add(decode_file(member)?);
                }
            }
            other => {
                return Err(decode_err(
                    "payload",
                    format!("unsupported CoSWID map key {other}"),
                ));
            }
        }
    }
    Ok(collection)
}

fn decode_evidence(value: &Value) -> Result<Evidence> {
    let map = as_map(value, "evidence")?;
    let mut builder = EvidenceBuilder::new();
    let mut collection = ResourceCollection::new();

    for (k, v) in map {
        let index = as_u64(k, "evidence key")?;
        match index {
            key::FILE => {
                for member in group(v) {
                    collection.add(decode_file(member)?);
                }
            }
            key::DATE => builder = builder.date(as_text(v, "evidence.date")?),
            key::DEVICE_ID => builder = builder.device_id(as_text(v, "evidence.deviceId")?),
            other => {
                return Err(decode_err(
                    "evidence",
                    format!("unsupported CoSWID map key {other}"),
                ));
            }
        }
    }

    Ok(builder.collection(collection).build())
}

/// Decode the one-or-many hash group: a single hash-entry is itself an
/// array `[alg-id, bytes]`, so the shapes are disambiguated by the first
/// element's type
fn hash_entries(value: &Value) -> Result<Vec<&Value>> {
    match value {
        Value::Array(items) => match items.first() {
            Some(Value::Integer(_)) => Ok(vec![value]),
            _ => Ok(items.iter().collect()),
        },
        _ => Err(decode_err("file.hash", "expected a hash entry array")),
    }
}

fn decode_file(value: &Value) -> Result<ResourceEntry> {
    let map = as_map(value, "file")?;
    let mut fs_name: Option<&str> = None;
    let mut size: u64 = 0;
    let mut version: Option<String> = None;
    let mut digests: BTreeMap<HashAlgorithm, Vec<u8>> = BTreeMap::new();

    for (k, v) in map {
        let index = as_u64(k, "file key")?;
        match index {
            key::FS_NAME => fs_name = Some(as_text(v, "file.fsName")?),
            key::SIZE => size = as_u64(v, "file.size")?,
            key::FILE_VERSION => version = Some(as_text(v, "file.version")?.to_string()),
            key::HASH => {
                for entry in hash_entries(v)? {
                    let pair = entry
                        .as_array()
                        .filter(|a| a.len() == 2)
                        .ok_or_else(|| decode_err("file.hash", "expected [alg-id, bytes]"))?;
                    let alg_index = as_u64(&pair[0], "file.hash")?;
                    let algorithm = HashAlgorithm::from_coswid_index(alg_index).ok_or_else(|| {
                        SwidError::codec(
                            "CBOR read",
                            CodecErrorKind::UnknownAlgorithm(alg_index.to_string()),
                        )
                    })?;
                    let digest = as_bytes(&pair[1], "file.hash")?;
                    if digest.len() != algorithm.output_len() {
                        return Err(decode_err(
                            "file.hash",
                            format!(
                                "{} digest must be {} bytes, got {}",
                                algorithm,
                                algorithm.output_len(),
                                digest.len()
                            ),
                        ));
                    }
                    digests.insert(algorithm, digest.to_vec());
                }
            }
            other => {
                return Err(decode_err(
                    "file",
                    format!("unsupported CoSWID map key {other}"),
                ));
            }
        }
    }

    let fs_name =
        fs_name.ok_or_else(|| SwidError::codec_missing_field("CBOR read", "file.fsName"))?;
    let path = ResourcePath::new(fs_name)?;
    Ok(ResourceEntry::from_parts(path, size, digests, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EntityBuilder, LinkBuilder, PayloadBuilder, SwidTagBuilder};
    use crate::model::DigestConfig;

    fn sample_tag() -> SwidTag {
        let payload = PayloadBuilder::new()
            .resource(
                ResourceEntry::from_reader(
                    ResourcePath::new("bin/app.exe").unwrap(),
                    &b"AA"[..],
                    &DigestConfig::default(),
                )
                .unwrap(),
            )
            .resource(
                ResourceEntry::from_reader(
                    ResourcePath::new("lib/app.dll").unwrap(),
                    &b"BB"[..],
                    &DigestConfig::default(),
                )
                .unwrap()
                .with_version("2.0"),
            )
            .build();

        SwidTagBuilder::new()
            .name("coswid app")
            .tag_id("tagId")
            .tag_version(1)
            .version("1.0.0")
            .version_scheme(VersionScheme::MultipartNumeric)
            .language("en-US")
            .entity(
                EntityBuilder::new()
                    .name("NIST")
                    .regid("nist.gov")
                    .role(Role::TagCreator)
                    .role(Role::SoftwareCreator)
                    .build()
                    .unwrap(),
            )
            .link(
                LinkBuilder::new()
                    .href("swid:parent-tag")
                    .rel(LinkRel::Parent)
                    .build()
                    .unwrap(),
            )
            .payload(payload)
            .build()
            .unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_logical_fields() {
        let tag = sample_tag();
        let codec = CborCodec::new();
        let bytes = codec.to_bytes(&tag).unwrap();
        let decoded = codec.read(&bytes).unwrap();
        assert_eq!(decoded, tag);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let tag = sample_tag();
        let codec = CborCodec::new();
        assert_eq!(codec.to_bytes(&tag).unwrap(), codec.to_bytes(&tag).unwrap());
    }

    #[test]
    fn test_absent_regid_writes_none_sentinel_and_reads_back_absent() {
        let tag = SwidTagBuilder::new()
            .name("app")
            .tag_id("id")
            .entity(
                EntityBuilder::new()
                    .name("Solo")
                    .role(Role::TagCreator)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let codec = CborCodec::new();
        let decoded = codec.read(&codec.to_bytes(&tag).unwrap()).unwrap();
        assert_eq!(decoded.entities()[0].regid(), None);
    }

    #[test]
    fn test_unknown_map_key_rejected_not_dropped() {
        let bogus = Value::Map(vec![(Value::Integer(999.into()), Value::Bool(true))]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&bogus, &mut bytes).unwrap();

        let err = CborCodec::new().read(&bytes).unwrap_err();
        assert!(matches!(err, SwidError::Codec { .. }));
    }

    #[test]
    fn test_decoded_document_passes_builder_validation() {
        // An entity-less tag decodes through the builder graph and fails
        // the same cross-field validation as direct assembly
        let bogus = Value::Map(vec![
            (Value::Integer(0.into()), Value::Text("id".into())),
            (Value::Integer(1.into()), Value::Text("app".into())),
        ]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&bogus, &mut bytes).unwrap();

        let err = CborCodec::new().read(&bytes).unwrap_err();
        assert!(matches!(err, SwidError::Validation(_)));
    }

    #[test]
    fn test_corpus_flag_roundtrip() {
        let tag = SwidTagBuilder::new()
            .name("installer")
            .tag_id("corpus-id")
            .tag_type(TagType::Corpus)
            .entity(
                EntityBuilder::new()
                    .name("x")
                    .role(Role::TagCreator)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let codec = CborCodec::new();
        let decoded = codec.read(&codec.to_bytes(&tag).unwrap()).unwrap();
        assert_eq!(decoded.tag_type(), TagType::Corpus);
    }

    #[test]
    fn test_bad_digest_length_rejected() {
        let file = Value::Map(vec![
            (Value::Integer(24.into()), Value::Text("a".into())),
            (Value::Integer(20.into()), Value::Integer(1.into())),
            (
                Value::Integer(7.into()),
                Value::Array(vec![Value::Integer(1.into()), Value::Bytes(vec![0u8; 4])]),
            ),
        ]);
        let payload = Value::Map(vec![(Value::Integer(17.into()), file)]);
        let root = Value::Map(vec![
            (Value::Integer(0.into()), Value::Text("id".into())),
            (Value::Integer(1.into()), Value::Text("app".into())),
            (Value::Integer(6.into()), payload),
        ]);
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&root, &mut bytes).unwrap();

        let err = CborCodec::new().read(&bytes).unwrap_err();
        assert!(matches!(err, SwidError::Codec { .. }), "got {err:?}");
    }
}
