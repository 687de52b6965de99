//! The root tag builder and its terminal build step.

use crate::error::{Result, SwidError, ValidationIssue};
use crate::model::{
    Entity, Evidence, Link, Payload, ResourceCollection, Role, SwidTag, TagType, VersionScheme,
};
use std::sync::OnceLock;
use uuid::Uuid;

fn language_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^[A-Za-z]{2,8}(-[A-Za-z0-9]{1,8})*$").expect("static regex")
    })
}

/// Fluent builder for the root [`SwidTag`] document.
///
/// Accumulates tag attributes, entities, links, and the payload/evidence
/// sections, then freezes into an immutable document via the terminal
/// [`build`](Self::build). Cross-field validation is collect-all: the
/// returned [`SwidError::Validation`] enumerates every violated
/// constraint, not just the first.
///
/// `build` consumes the builder, so a second build of the same root is a
/// compile error. Code that must hold the builder behind a shared handle
/// uses [`build_shared`](Self::build_shared), which reports the same
/// condition at runtime as [`SwidError::AlreadyBuilt`].
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct SwidTagBuilder {
    name: Option<String>,
    tag_id: Option<String>,
    tag_version: u32,
    version: Option<String>,
    version_scheme: Option<VersionScheme>,
    tag_type: TagType,
    language: Option<String>,
    entities: Vec<Entity>,
    links: Vec<Link>,
    payload: Option<Payload>,
    evidence: Option<Evidence>,
    built: bool,
}

impl SwidTagBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the software product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the unique tag identifier.
    pub fn tag_id(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = Some(tag_id.into());
        self
    }

    /// Generate a fresh UUID tag identifier.
    pub fn random_tag_id(mut self) -> Self {
        self.tag_id = Some(Uuid::new_v4().to_string());
        self
    }

    /// Set the re-issue counter for this tag identifier.
    pub const fn tag_version(mut self, tag_version: u32) -> Self {
        self.tag_version = tag_version;
        self
    }

    /// Set the software version string.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Declare the structure of the version string.
    pub const fn version_scheme(mut self, scheme: VersionScheme) -> Self {
        self.version_scheme = Some(scheme);
        self
    }

    /// Set the tag type (defaults to primary).
    pub const fn tag_type(mut self, tag_type: TagType) -> Self {
        self.tag_type = tag_type;
        self
    }

    /// Set the BCP-47 language tag.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Append an entity. Entity order is semantically meaningful and is
    /// preserved through serialization.
    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Append a link.
    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    /// Attach the payload section.
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach a payload built directly from a resource collection.
    pub fn payload_resources(mut self, resources: ResourceCollection) -> Self {
        self.payload = Some(Payload::from(resources));
        self
    }

    /// Attach the evidence section.
    pub fn evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = Some(evidence);
        self
    }

    /// Validate every cross-field constraint and freeze into a
    /// [`SwidTag`]. Consumes the builder.
    pub fn build(self) -> Result<SwidTag> {
        self.freeze()
    }

    /// Freeze in place for builders held behind shared handles.
    ///
    /// The first successful call freezes the builder; any later call
    /// fails with [`SwidError::AlreadyBuilt`] instead of silently handing
    /// out a diverging document snapshot.
    pub fn build_shared(&mut self) -> Result<SwidTag> {
        if self.built {
            return Err(SwidError::AlreadyBuilt);
        }
        let tag = self.clone().freeze()?;
        self.built = true;
        Ok(tag)
    }

    fn freeze(self) -> Result<SwidTag> {
        let mut issues = Vec::new();

        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            issues.push(ValidationIssue::new("name", "must not be empty"));
        }

        let tag_id = self.tag_id.unwrap_or_default();
        if tag_id.trim().is_empty() {
            issues.push(ValidationIssue::new("tagId", "must not be empty"));
        }

        if self.entities.is_empty() {
            issues.push(ValidationIssue::new(
                "entity",
                "at least one entity is required",
            ));
        } else if !self
            .entities
            .iter()
            .any(|e| e.has_role(Role::TagCreator))
        {
            issues.push(ValidationIssue::new(
                "entity",
                "at least one entity with role tagCreator is required",
            ));
        }

        match (&self.version, self.version_scheme) {
            (Some(version), Some(scheme)) => {
                if !scheme.validates(version) {
                    issues.push(ValidationIssue::new(
                        "version",
                        format!("'{version}' is not well-formed under scheme {scheme}"),
                    ));
                }
            }
            (None, Some(_)) => {
                issues.push(ValidationIssue::new(
                    "versionScheme",
                    "declared without a version",
                ));
            }
            _ => {}
        }

        if let Some(language) = &self.language {
            if !language_re().is_match(language) {
                issues.push(ValidationIssue::new(
                    "lang",
                    format!("'{language}' is not a well-formed BCP-47 tag"),
                ));
            }
        }

        if !issues.is_empty() {
            return Err(SwidError::validation(issues));
        }

        Ok(SwidTag {
            name,
            tag_id,
            tag_version: self.tag_version,
            version: self.version,
            version_scheme: self.version_scheme,
            tag_type: self.tag_type,
            language: self.language,
            entities: self.entities,
            links: self.links,
            payload: self.payload,
            evidence: self.evidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EntityBuilder;

    fn tag_creator() -> Entity {
        EntityBuilder::new()
            .name("Example Corp")
            .regid("example.com")
            .role(Role::TagCreator)
            .build()
            .unwrap()
    }

    fn minimal_builder() -> SwidTagBuilder {
        SwidTagBuilder::new()
            .name("example app")
            .tag_id("example.com-app-1.0.0")
            .entity(tag_creator())
    }

    #[test]
    fn test_minimal_tag_builds() {
        let tag = minimal_builder().build().unwrap();
        assert_eq!(tag.name(), "example app");
        assert_eq!(tag.tag_version(), 0);
        assert_eq!(tag.tag_type(), TagType::Primary);
        assert!(tag.tag_creator().is_some());
    }

    #[test]
    fn test_missing_tag_creator_named_in_error() {
        let distributor = EntityBuilder::new()
            .name("Shop")
            .role(Role::Distributor)
            .build()
            .unwrap();
        let err = SwidTagBuilder::new()
            .name("app")
            .tag_id("id")
            .entity(distributor)
            .build()
            .unwrap_err();

        match err {
            SwidError::Validation(errors) => {
                assert!(errors.mentions_field("entity"));
                assert!(errors.issues()[0].reason.contains("tagCreator"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_collect_all_reports_every_violation() {
        let err = SwidTagBuilder::new()
            .version_scheme(VersionScheme::Semver)
            .build()
            .unwrap_err();

        match err {
            SwidError::Validation(errors) => {
                assert!(errors.mentions_field("name"));
                assert!(errors.mentions_field("tagId"));
                assert!(errors.mentions_field("entity"));
                assert!(errors.mentions_field("versionScheme"));
                assert_eq!(errors.len(), 4);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_version_must_match_declared_scheme() {
        let err = minimal_builder()
            .version("1.0.0-beta.1")
            .version_scheme(VersionScheme::MultipartNumeric)
            .build()
            .unwrap_err();
        assert!(matches!(err, SwidError::Validation(e) if e.mentions_field("version")));

        let tag = minimal_builder()
            .version("1.0.0-beta.1")
            .version_scheme(VersionScheme::Semver)
            .build()
            .unwrap();
        assert_eq!(tag.version(), Some("1.0.0-beta.1"));
    }

    #[test]
    fn test_bad_language_rejected() {
        let err = minimal_builder().language("not a language").build().unwrap_err();
        assert!(matches!(err, SwidError::Validation(e) if e.mentions_field("lang")));
    }

    #[test]
    fn test_build_shared_second_call_fails() {
        let mut builder = minimal_builder();
        let first = builder.build_shared();
        assert!(first.is_ok());

        let second = builder.build_shared();
        assert!(matches!(second, Err(SwidError::AlreadyBuilt)));
    }

    #[test]
    fn test_build_shared_failed_validation_can_retry() {
        let mut builder = SwidTagBuilder::new();
        assert!(builder.build_shared().is_err());

        // A failed validation does not freeze the builder
        builder = builder.name("app").tag_id("id").entity(tag_creator());
        assert!(builder.build_shared().is_ok());
    }

    #[test]
    fn test_random_tag_id_is_uuid() {
        let tag = SwidTagBuilder::new()
            .name("app")
            .random_tag_id()
            .entity(tag_creator())
            .build()
            .unwrap();
        assert!(Uuid::parse_str(tag.tag_id()).is_ok());
    }
}
