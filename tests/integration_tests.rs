//! Integration tests for swid-tools
//!
//! These tests verify end-to-end functionality of resource collection,
//! tag building, and codec serialization.

use swid_tools::{
    collect, collect_dir, BytesSource, CborCodec, DigestConfig, EntityBuilder, HashAlgorithm,
    LinkBuilder, LinkRel, PayloadBuilder, ResourceCollection, ResourceEntry, ResourcePath, Role,
    SwidError, SwidTag, SwidTagBuilder, TagCodec, VersionScheme, XmlCodec,
};

// ============================================================================
// Test Fixtures
// ============================================================================

fn entry(path: &str, content: &[u8]) -> ResourceEntry {
    ResourceEntry::from_reader(
        ResourcePath::new(path).unwrap(),
        content,
        &DigestConfig::default(),
    )
    .unwrap()
}

fn nist_entity() -> swid_tools::Entity {
    EntityBuilder::new()
        .name("NIST")
        .regid("nist.gov")
        .role(Role::TagCreator)
        .role(Role::SoftwareCreator)
        .build()
        .unwrap()
}

/// The end-to-end scenario tag: "coswid app" with the two-file payload
fn sample_tag() -> SwidTag {
    let payload = PayloadBuilder::new()
        .resource(entry("bin/app.exe", b"AA"))
        .resource(entry("lib/app.dll", b"BB"))
        .build();

    SwidTagBuilder::new()
        .name("coswid app")
        .tag_id("tagId")
        .version("1.0.0")
        .version_scheme(VersionScheme::MultipartNumeric)
        .entity(nist_entity())
        .payload(payload)
        .build()
        .unwrap()
}

// ============================================================================
// Collection Tests
// ============================================================================

mod collection_tests {
    use super::*;

    // sha-256 / sha-512 of b"AA", and the aggregates derived from them
    const AA_SHA256: &str = "58bb119c35513a451d24dc20ef0e9031ec85b35bfc919d263e7e5d9868909cb5";
    const AA_SHA512: &str = "282154720abd4fa76ad7cd5f8806aa8a19aefb6d10042b0d57a311b86087de4d\
                             e3186a92019d6ee51035106ee088dc6007beb7be46994d1463999968fbe9760e";
    const AGG_SINGLE: &str = "abe1f3bf9b5b68b1796a316bef14c65e206041fbcc754780107f5ea5298580c6";
    const AGG_PAIR: &str = "4fd7718092cdf611249d087f7d4bb2de1c0863e55d66eb7740af507a54c32ab4";

    #[test]
    fn test_known_content_produces_known_digests() {
        let e = entry("bin/app.exe", b"AA");
        assert_eq!(e.size(), 2);
        assert_eq!(
            hex::encode(e.digest(HashAlgorithm::Sha256).unwrap()),
            AA_SHA256
        );
        assert_eq!(
            hex::encode(e.digest(HashAlgorithm::Sha512).unwrap()),
            AA_SHA512
        );
    }

    #[test]
    fn test_single_resource_aggregate_is_rehashed_member_digest() {
        let mut collection = ResourceCollection::new();
        collection.add(entry("bin/app.exe", b"AA"));
        assert_eq!(
            hex::encode(collection.aggregate_digest(HashAlgorithm::Sha256).unwrap()),
            AGG_SINGLE
        );
    }

    #[test]
    fn test_entries_order_and_aggregate_stable_across_insertion_orders() {
        let mut forward = ResourceCollection::new();
        forward.add(entry("bin/app.exe", b"AA"));
        forward.add(entry("lib/app.dll", b"BB"));

        let mut reversed = ResourceCollection::new();
        reversed.add(entry("lib/app.dll", b"BB"));
        reversed.add(entry("bin/app.exe", b"AA"));

        for collection in [&forward, &reversed] {
            let paths: Vec<_> = collection.paths().map(ToString::to_string).collect();
            assert_eq!(paths, ["bin/app.exe", "lib/app.dll"], "lexical path order");
            assert_eq!(
                hex::encode(collection.aggregate_digest(HashAlgorithm::Sha256).unwrap()),
                AGG_PAIR
            );
        }
    }

    #[test]
    fn test_replacement_keeps_size_and_changes_aggregate_iff_content_differs() {
        let mut collection = ResourceCollection::new();
        collection.add(entry("bin/app.exe", b"AA"));
        let original = collection.aggregate_digest(HashAlgorithm::Sha256).unwrap();

        // Equal-after-normalization path, same content: aggregate unchanged
        collection.add(entry(r".\bin\app.exe", b"AA"));
        assert_eq!(collection.len(), 1);
        assert_eq!(
            collection.aggregate_digest(HashAlgorithm::Sha256).unwrap(),
            original
        );

        // Same path, different content: aggregate changes
        collection.add(entry("bin/app.exe", b"AB"));
        assert_eq!(collection.len(), 1);
        assert_ne!(
            collection.aggregate_digest(HashAlgorithm::Sha256).unwrap(),
            original
        );
    }

    #[test]
    fn test_parallel_collector_matches_manual_assembly() {
        let collected = collect(
            &[
                BytesSource::new("lib/app.dll", b"BB".to_vec()),
                BytesSource::new("bin/app.exe", b"AA".to_vec()),
            ],
            &DigestConfig::default(),
        )
        .unwrap();

        assert_eq!(
            hex::encode(collected.aggregate_digest(HashAlgorithm::Sha256).unwrap()),
            AGG_PAIR
        );
    }
}

// ============================================================================
// Builder Tests
// ============================================================================

mod builder_tests {
    use super::*;

    #[test]
    fn test_tag_without_tag_creator_fails_then_succeeds_with_one() {
        let licensor = EntityBuilder::new()
            .name("Licensor Inc")
            .role(Role::Licensor)
            .build()
            .unwrap();

        let err = SwidTagBuilder::new()
            .name("coswid app")
            .tag_id("tagId")
            .entity(licensor.clone())
            .build()
            .unwrap_err();
        match err {
            SwidError::Validation(errors) => {
                assert!(errors.mentions_field("entity"));
                assert!(errors
                    .issues()
                    .iter()
                    .any(|i| i.reason.contains("tagCreator")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let tag = SwidTagBuilder::new()
            .name("coswid app")
            .tag_id("tagId")
            .entity(licensor)
            .entity(nist_entity())
            .build()
            .unwrap();
        assert_eq!(tag.entities().len(), 2);
        assert_eq!(tag.tag_creator().unwrap().name(), "NIST");
    }

    #[test]
    fn test_entity_order_is_preserved() {
        let tag = SwidTagBuilder::new()
            .name("app")
            .tag_id("id")
            .entity(
                EntityBuilder::new()
                    .name("Second Fiddle")
                    .role(Role::Distributor)
                    .build()
                    .unwrap(),
            )
            .entity(nist_entity())
            .build()
            .unwrap();

        let names: Vec<_> = tag.entities().iter().map(|e| e.name()).collect();
        assert_eq!(names, ["Second Fiddle", "NIST"]);
    }
}

// ============================================================================
// Codec Tests
// ============================================================================

mod codec_tests {
    use super::*;

    #[test]
    fn test_both_codecs_decode_to_the_same_logical_field_set() {
        let tag = sample_tag();

        let cbor_bytes = CborCodec::new().to_bytes(&tag).unwrap();
        let xml_bytes = XmlCodec::new().to_bytes(&tag).unwrap();

        let from_cbor = CborCodec::new().read(&cbor_bytes).unwrap();
        let from_xml = XmlCodec::new().read(&xml_bytes).unwrap();

        assert_eq!(from_cbor, tag);
        assert_eq!(from_xml, tag);
        assert_eq!(from_cbor, from_xml);

        // Same logical field set, independent of the model's PartialEq
        assert_eq!(
            serde_json::to_value(&from_cbor).unwrap(),
            serde_json::to_value(&from_xml).unwrap()
        );
    }

    #[test]
    fn test_serialization_is_deterministic_per_codec() {
        let tag = sample_tag();
        for codec in [&CborCodec::new() as &dyn TagCodec, &XmlCodec::new()] {
            let first = codec.to_bytes(&tag).unwrap();
            let second = codec.to_bytes(&tag).unwrap();
            assert_eq!(first, second, "{} must be deterministic", codec.format_name());
        }
    }

    #[test]
    fn test_reserializing_a_decoded_document_is_stable() {
        // Load-bearing for external verification: decode then re-serialize
        // must reproduce the original bytes
        let tag = sample_tag();
        for codec in [&CborCodec::new() as &dyn TagCodec, &XmlCodec::new()] {
            let bytes = codec.to_bytes(&tag).unwrap();
            let decoded = codec.read(&bytes).unwrap();
            assert_eq!(codec.to_bytes(&decoded).unwrap(), bytes);
        }
    }

    #[test]
    fn test_payload_aggregate_survives_both_codecs() {
        let tag = sample_tag();
        let expected = tag
            .payload()
            .unwrap()
            .resources()
            .aggregate_digest(HashAlgorithm::Sha256)
            .unwrap();

        for codec in [&CborCodec::new() as &dyn TagCodec, &XmlCodec::new()] {
            let decoded = codec.read(&codec.to_bytes(&tag).unwrap()).unwrap();
            let aggregate = decoded
                .payload()
                .unwrap()
                .resources()
                .aggregate_digest(HashAlgorithm::Sha256)
                .unwrap();
            assert_eq!(aggregate, expected, "{}", codec.format_name());
        }
    }

    #[test]
    fn test_links_roundtrip_through_both_codecs() {
        let tag = SwidTagBuilder::new()
            .name("patched app")
            .tag_id("patch-1")
            .tag_type(swid_tools::TagType::Patch)
            .entity(nist_entity())
            .link(
                LinkBuilder::new()
                    .href("swid:base-tag")
                    .rel(LinkRel::Patches)
                    .build()
                    .unwrap(),
            )
            .link(
                LinkBuilder::new()
                    .href("https://example.com/release-notes")
                    .rel(LinkRel::SeeAlso)
                    .media_type("text/html")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        for codec in [&CborCodec::new() as &dyn TagCodec, &XmlCodec::new()] {
            let decoded = codec.read(&codec.to_bytes(&tag).unwrap()).unwrap();
            assert_eq!(decoded.links().len(), 2);
            assert_eq!(decoded.links()[0].rel(), LinkRel::Patches);
            assert_eq!(decoded, tag, "{}", codec.format_name());
        }
    }
}

// ============================================================================
// Filesystem Collection Tests
// ============================================================================

mod collector_tests {
    use super::*;

    #[test]
    fn test_collect_dir_to_serialized_tag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("bin/app.exe"), b"AA").unwrap();
        std::fs::write(dir.path().join("lib/app.dll"), b"BB").unwrap();

        let resources = collect_dir(dir.path(), &DigestConfig::default()).unwrap();
        assert_eq!(resources.len(), 2);

        let tag = SwidTagBuilder::new()
            .name("coswid app")
            .tag_id("tagId")
            .entity(nist_entity())
            .payload_resources(resources)
            .build()
            .unwrap();

        let xml = String::from_utf8(XmlCodec::new().to_bytes(&tag).unwrap()).unwrap();
        let bin = xml.find(r#"name="bin/app.exe""#).unwrap();
        let lib = xml.find(r#"name="lib/app.dll""#).unwrap();
        assert!(bin < lib, "files serialize in sorted path order");

        let decoded = XmlCodec::new().read(xml.as_bytes()).unwrap();
        assert_eq!(decoded, tag);
    }

    #[test]
    fn test_two_identical_trees_digest_identically() {
        let make_tree = || {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(dir.path().join("bin")).unwrap();
            std::fs::write(dir.path().join("bin/app.exe"), b"AA").unwrap();
            std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
            dir
        };

        let a = collect_dir(make_tree().path(), &DigestConfig::default()).unwrap();
        let b = collect_dir(make_tree().path(), &DigestConfig::default()).unwrap();
        assert_eq!(
            a.aggregate_digest(HashAlgorithm::Sha512).unwrap(),
            b.aggregate_digest(HashAlgorithm::Sha512).unwrap()
        );
    }
}
