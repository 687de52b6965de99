//! SWID XML codec (ISO/IEC 19770-2:2015).
//!
//! Serializes the frozen document as a `SoftwareIdentity` element under
//! the ISO 19770-2 namespace. Resource digests are emitted as
//! per-algorithm hash attributes (`SHA256:hash`, ...) bound to the W3C
//! xmlenc/xmldsig digest namespaces, hex-encoded. Payload files are
//! written flat with the full normalized path in `@name`.

use crate::builder::{EntityBuilder, EvidenceBuilder, LinkBuilder, SwidTagBuilder};
use crate::codec::{TagCodec, REGID_NONE};
use crate::digest::HashAlgorithm;
use crate::error::{CodecErrorKind, Result, SwidError};
use crate::model::{
    Entity, Link, LinkOwnership, LinkRel, LinkUse, Payload, ResourceCollection, ResourceEntry,
    ResourcePath, Role, SwidTag, TagType, VersionScheme,
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;
use std::io::Write;

/// ISO/IEC 19770-2:2015 schema namespace
const SWID_NS: &str = "http://standards.iso.org/iso/19770/-2/2015/schema.xsd";

/// SWID XML codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

impl XmlCodec {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TagCodec for XmlCodec {
    fn format_name(&self) -> &'static str {
        "swid-xml"
    }

    fn write(&self, tag: &SwidTag, sink: &mut dyn Write) -> Result<()> {
        tracing::debug!(tag_id = tag.tag_id(), "encoding SWID XML tag");
        // Stage in a buffer so a failed encode emits nothing
        let buf = encode_document(tag)?;
        sink.write_all(&buf)?;
        Ok(())
    }

    fn read(&self, bytes: &[u8]) -> Result<SwidTag> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            SwidError::codec("XML read", CodecErrorKind::Xml(format!("invalid UTF-8: {e}")))
        })?;
        decode_document(content)
    }
}

// ============================================================================
// Encoding
// ============================================================================

fn xml_err(e: impl std::fmt::Display) -> SwidError {
    SwidError::codec("XML write", CodecErrorKind::Xml(e.to_string()))
}

/// Digest algorithms referenced anywhere in the document, in registry
/// order, so namespace declarations stay deterministic
fn used_algorithms(tag: &SwidTag) -> Vec<HashAlgorithm> {
    let mut used = Vec::new();
    let collections = tag
        .payload()
        .map(Payload::resources)
        .into_iter()
        .chain(tag.evidence().map(|e| e.resources()));
    for collection in collections {
        for entry in collection.entries() {
            for alg in entry.digests().keys() {
                if !used.contains(alg) {
                    used.push(*alg);
                }
            }
        }
    }
    used.sort();
    used
}

fn encode_document(tag: &SwidTag) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_err)?;

    let mut root = BytesStart::new("SoftwareIdentity");
    root.push_attribute(("xmlns", SWID_NS));
    for alg in used_algorithms(tag) {
        root.push_attribute((
            format!("xmlns:{}", alg.xml_prefix()).as_str(),
            alg.xml_namespace(),
        ));
    }
    root.push_attribute(("name", tag.name()));
    root.push_attribute(("tagId", tag.tag_id()));
    root.push_attribute(("tagVersion", tag.tag_version().to_string().as_str()));
    if let Some(version) = tag.version() {
        root.push_attribute(("version", version));
    }
    if let Some(scheme) = tag.version_scheme() {
        root.push_attribute(("versionScheme", scheme.iso_name()));
    }
    if let Some(language) = tag.language() {
        root.push_attribute(("xml:lang", language));
    }
    match tag.tag_type() {
        TagType::Primary => {}
        TagType::Corpus => root.push_attribute(("corpus", "true")),
        TagType::Patch => root.push_attribute(("patch", "true")),
        TagType::Supplemental => root.push_attribute(("supplemental", "true")),
    }
    writer.write_event(Event::Start(root)).map_err(xml_err)?;

    for entity in tag.entities() {
        writer
            .write_event(Event::Empty(encode_entity(entity)))
            .map_err(xml_err)?;
    }
    for link in tag.links() {
        writer
            .write_event(Event::Empty(encode_link(link)))
            .map_err(xml_err)?;
    }

    if let Some(payload) = tag.payload() {
        writer
            .write_event(Event::Start(BytesStart::new("Payload")))
            .map_err(xml_err)?;
        write_files(&mut writer, payload.resources())?;
        writer
            .write_event(Event::End(BytesEnd::new("Payload")))
            .map_err(xml_err)?;
    }

    if let Some(evidence) = tag.evidence() {
        let mut open = BytesStart::new("Evidence");
        if let Some(date) = evidence.date() {
            open.push_attribute(("date", date));
        }
        if let Some(device_id) = evidence.device_id() {
            open.push_attribute(("deviceId", device_id));
        }
        writer.write_event(Event::Start(open)).map_err(xml_err)?;
        write_files(&mut writer, evidence.resources())?;
        writer
            .write_event(Event::End(BytesEnd::new("Evidence")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("SoftwareIdentity")))
        .map_err(xml_err)?;
    Ok(writer.into_inner())
}

fn encode_entity(entity: &Entity) -> BytesStart<'static> {
    let mut elem = BytesStart::new("Entity");
    elem.push_attribute(("name", entity.name()));
    elem.push_attribute(("regid", entity.regid().unwrap_or(REGID_NONE)));
    let roles = entity
        .roles()
        .iter()
        .map(Role::iso_name)
        .collect::<Vec<_>>()
        .join(" ");
    elem.push_attribute(("role", roles.as_str()));
    if let Some(thumbprint) = entity.thumbprint() {
        elem.push_attribute(("thumbprint", thumbprint));
    }
    elem
}

fn encode_link(link: &Link) -> BytesStart<'static> {
    let mut elem = BytesStart::new("Link");
    elem.push_attribute(("href", link.href()));
    elem.push_attribute(("rel", link.rel().iso_name()));
    if let Some(artifact) = link.artifact() {
        elem.push_attribute(("artifact", artifact));
    }
    if let Some(media) = link.media() {
        elem.push_attribute(("media", media));
    }
    // ISO names the MIME attribute `type`
    if let Some(media_type) = link.media_type() {
        elem.push_attribute(("type", media_type));
    }
    if let Some(ownership) = link.ownership() {
        elem.push_attribute(("ownership", ownership.iso_name()));
    }
    if let Some(link_use) = link.link_use() {
        elem.push_attribute(("use", link_use.iso_name()));
    }
    elem
}

fn write_files(writer: &mut Writer<Vec<u8>>, resources: &ResourceCollection) -> Result<()> {
    for entry in resources.entries() {
        let mut elem = BytesStart::new("File");
        elem.push_attribute(("name", entry.path().as_str()));
        elem.push_attribute(("size", entry.size().to_string().as_str()));
        if let Some(version) = entry.version() {
            elem.push_attribute(("version", version));
        }
        for (alg, digest) in entry.digests() {
            elem.push_attribute((
                format!("{}:hash", alg.xml_prefix()).as_str(),
                hex::encode(digest).as_str(),
            ));
        }
        writer.write_event(Event::Empty(elem)).map_err(xml_err)?;
    }
    Ok(())
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_err(field: &str, message: impl Into<String>) -> SwidError {
    SwidError::codec(
        "XML read",
        CodecErrorKind::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        },
    )
}

fn local_name(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    name.rsplit(':').next().unwrap_or(&name).to_string()
}

/// Collect an element's attributes as (key, unescaped value) pairs
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes().filter_map(std::result::Result::ok) {
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| SwidError::codec("XML read", CodecErrorKind::Xml(err.to_string())))?
            .to_string();
        out.push((key, value));
    }
    Ok(out)
}

/// Which section file elements currently belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Payload,
    Evidence,
}

fn decode_document(content: &str) -> Result<SwidTag> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut builder = SwidTagBuilder::new();
    let mut section = Section::None;
    let mut payload_files = ResourceCollection::new();
    let mut evidence_files = ResourceCollection::new();
    let mut evidence_date: Option<String> = None;
    let mut evidence_device_id: Option<String> = None;
    let mut saw_payload = false;
    let mut saw_evidence = false;
    let mut saw_root = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                match local_name(e.name().as_ref()).as_str() {
                    "SoftwareIdentity" => {
                        saw_root = true;
                        builder = decode_root_attributes(builder, e)?;
                    }
                    "Entity" => builder = builder.entity(decode_entity(e)?),
                    "Link" => builder = builder.link(decode_link(e)?),
                    "Payload" => {
                        saw_payload = true;
                        section = Section::Payload;
                    }
                    "Evidence" => {
                        saw_evidence = true;
                        section = Section::Evidence;
                        for (key, value) in attributes(e)? {
                            match key.as_str() {
                                "date" => evidence_date = Some(value),
                                "deviceId" => evidence_device_id = Some(value),
                                _ => {}
                            }
                        }
                    }
                    "File" => {
                        let entry = decode_file(e)?;
                        match section {
                            Section::Payload => {
                                payload_files.add(entry);
                            }
                            Section::Evidence => {
                                evidence_files.add(entry);
                            }
                            Section::None => {
                                return Err(decode_err(
                                    "File",
                                    "file element outside Payload or Evidence",
                                ));
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if matches!(local_name(e.name().as_ref()).as_str(), "Payload" | "Evidence") {
                    section = Section::None;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(SwidError::codec(
                    "XML read",
                    CodecErrorKind::Xml(e.to_string()),
                ));
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err(SwidError::codec_missing_field("XML read", "SoftwareIdentity"));
    }
    if saw_payload {
        builder = builder.payload(Payload::from(payload_files));
    }
    if saw_evidence {
        let mut evidence = EvidenceBuilder::new().collection(evidence_files);
        if let Some(date) = evidence_date {
            evidence = evidence.date(date);
        }
        if let Some(device_id) = evidence_device_id {
            evidence = evidence.device_id(device_id);
        }
        builder = builder.evidence(evidence.build());
    }

    builder.build()
}

fn decode_root_attributes(
    mut builder: SwidTagBuilder,
    e: &BytesStart<'_>,
) -> Result<SwidTagBuilder> {
    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => builder = builder.name(value),
            "tagId" => builder = builder.tag_id(value),
            "tagVersion" => {
                let tag_version = value
                    .parse::<u32>()
                    .map_err(|_| decode_err("tagVersion", format!("'{value}' is not a u32")))?;
                builder = builder.tag_version(tag_version);
            }
            "version" => builder = builder.version(value),
            "versionScheme" => {
                let scheme = VersionScheme::from_iso_name(&value)
                    .ok_or_else(|| decode_err("versionScheme", format!("unknown scheme '{value}'")))?;
                builder = builder.version_scheme(scheme);
            }
            "xml:lang" | "lang" => builder = builder.language(value),
            "corpus" if value == "true" => builder = builder.tag_type(TagType::Corpus),
            "patch" if value == "true" => builder = builder.tag_type(TagType::Patch),
            "supplemental" if value == "true" => {
                builder = builder.tag_type(TagType::Supplemental);
            }
            // Namespace declarations and unknown attributes carry no
            // document content
            _ => {}
        }
    }
    Ok(builder)
}

fn decode_entity(e: &BytesStart<'_>) -> Result<Entity> {
    let mut builder = EntityBuilder::new();
    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => builder = builder.name(value),
            "regid" => {
                if value != REGID_NONE {
                    builder = builder.regid(value);
                }
            }
            "role" => {
                for token in value.split_whitespace() {
                    let role = Role::from_iso_name(token)
                        .ok_or_else(|| decode_err("entity.role", format!("unknown role '{token}'")))?;
                    builder = builder.role(role);
                }
            }
            "thumbprint" => builder = builder.thumbprint(value),
            _ => {}
        }
    }
    builder.build()
}

fn decode_link(e: &BytesStart<'_>) -> Result<Link> {
    let mut builder = LinkBuilder::new();
    for (key, value) in attributes(e)? {
        match key.as_str() {
            "href" => builder = builder.href(value),
            "rel" => {
                let rel = LinkRel::from_iso_name(&value)
                    .ok_or_else(|| decode_err("link.rel", format!("unknown rel '{value}'")))?;
                builder = builder.rel(rel);
            }
            "artifact" => builder = builder.artifact(value),
            "media" => builder = builder.media(value),
            "type" => builder = builder.media_type(value),
            "ownership" => {
                let ownership = LinkOwnership::from_iso_name(&value).ok_or_else(|| {
                    decode_err("link.ownership", format!("unknown ownership '{value}'"))
                })?;
                builder = builder.ownership(ownership);
            }
            "use" => {
                let link_use = LinkUse::from_iso_name(&value)
                    .ok_or_else(|| decode_err("link.use", format!("unknown use '{value}'")))?;
                builder = builder.link_use(link_use);
            }
            _ => {}
        }
    }
    builder.build()
}

fn decode_file(e: &BytesStart<'_>) -> Result<ResourceEntry> {
    let mut name: Option<String> = None;
    let mut size: u64 = 0;
    let mut version: Option<String> = None;
    let mut digests: BTreeMap<HashAlgorithm, Vec<u8>> = BTreeMap::new();

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "name" => name = Some(value),
            "size" => {
                size = value
                    .parse::<u64>()
                    .map_err(|_| decode_err("file.size", format!("'{value}' is not a u64")))?;
            }
            "version" => version = Some(value),
            other => {
                // Per-algorithm hash attributes use the conventional
                // prefixes (SHA256:hash, ...)
                if let Some(prefix) = other.strip_suffix(":hash") {
                    let algorithm = HashAlgorithm::ALL
                        .into_iter()
                        .find(|alg| alg.xml_prefix() == prefix)
                        .ok_or_else(|| {
                            SwidError::codec(
                                "XML read",
                                CodecErrorKind::UnknownAlgorithm(prefix.to_string()),
                            )
                        })?;
                    let digest = hex::decode(&value).map_err(|_| {
                        decode_err("file.hash", "hash attribute is not valid hex")
                    })?;
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
                    digests.insert(algorithm, digest);
                }
            }
        }
    }

    let name = name.ok_or_else(|| SwidError::codec_missing_field("XML read", "file.name"))?;
    let path = ResourcePath::new(name)?;
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
                .unwrap(),
            )
            .build();

        SwidTagBuilder::new()
            .name("coswid app")
            .tag_id("tagId")
            .version("1.0.0")
            .version_scheme(VersionScheme::MultipartNumeric)
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
                    .href("https://example.com/eula.html")
                    .rel(LinkRel::SeeAlso)
                    .media_type("text/html")
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
        let codec = XmlCodec::new();
        let bytes = codec.to_bytes(&tag).unwrap();
        let decoded = codec.read(&bytes).unwrap();
        assert_eq!(decoded, tag);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let tag = sample_tag();
        let codec = XmlCodec::new();
        assert_eq!(codec.to_bytes(&tag).unwrap(), codec.to_bytes(&tag).unwrap());
    }

    #[test]
    fn test_output_carries_iso_namespace_and_roles() {
        let tag = sample_tag();
        let xml = String::from_utf8(XmlCodec::new().to_bytes(&tag).unwrap()).unwrap();

        assert!(xml.contains(SWID_NS));
        assert!(xml.contains(r#"role="tagCreator softwareCreator""#));
        assert!(xml.contains(r#"tagId="tagId""#));
        // Files appear in normalized sort order
        let bin = xml.find("bin/app.exe").unwrap();
        let lib = xml.find("lib/app.dll").unwrap();
        assert!(bin < lib);
    }

    #[test]
    fn test_digest_namespaces_declared_once() {
        let tag = sample_tag();
        let xml = String::from_utf8(XmlCodec::new().to_bytes(&tag).unwrap()).unwrap();
        assert!(xml.contains(r#"xmlns:SHA256="http://www.w3.org/2001/04/xmlenc#sha256""#));
        assert!(xml.contains(r#"xmlns:SHA512="http://www.w3.org/2001/04/xmlenc#sha512""#));
        assert_eq!(xml.matches("xmlns:SHA256=").count(), 1);
    }

    #[test]
    fn test_regid_none_sentinel_roundtrip() {
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

        let xml = String::from_utf8(XmlCodec::new().to_bytes(&tag).unwrap()).unwrap();
        assert!(xml.contains(r#"regid="none""#));

        let decoded = XmlCodec::new().read(xml.as_bytes()).unwrap();
        assert_eq!(decoded.entities()[0].regid(), None);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let xml = format!(
            r#"<SoftwareIdentity xmlns="{SWID_NS}" name="a" tagId="b" tagVersion="0">
  <Entity name="x" regid="none" role="overlord"/>
</SoftwareIdentity>"#
        );
        let err = XmlCodec::new().read(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SwidError::Codec { .. }));
    }

    #[test]
    fn test_file_outside_section_rejected() {
        let xml = format!(
            r#"<SoftwareIdentity xmlns="{SWID_NS}" name="a" tagId="b" tagVersion="0">
  <Entity name="x" regid="none" role="tagCreator"/>
  <File name="stray.bin" size="1"/>
</SoftwareIdentity>"#
        );
        let err = XmlCodec::new().read(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, SwidError::Codec { .. }));
    }

    #[test]
    fn test_escaping_roundtrip() {
        let tag = SwidTagBuilder::new()
            .name(r#"app <with> "specials" & more"#)
            .tag_id("id")
            .entity(
                EntityBuilder::new()
                    .name("A & B Co")
                    .role(Role::TagCreator)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let codec = XmlCodec::new();
        let decoded = codec.read(&codec.to_bytes(&tag).unwrap()).unwrap();
        assert_eq!(decoded.name(), tag.name());
        assert_eq!(decoded.entities()[0].name(), "A & B Co");
    }
}
