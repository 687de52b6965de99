//! The immutable SWID tag document tree.

use crate::model::collection::ResourceCollection;
use crate::model::entity::Entity;
use crate::model::link::Link;
use crate::model::vocab::{Role, TagType, VersionScheme};
use serde::{Deserialize, Serialize};

/// Payload section: the resources that constitute the software product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub(crate) resources: ResourceCollection,
}

impl Payload {
    #[must_use]
    pub const fn resources(&self) -> &ResourceCollection {
        &self.resources
    }
}

impl From<ResourceCollection> for Payload {
    fn from(resources: ResourceCollection) -> Self {
        Self { resources }
    }
}

/// Evidence section: resources observed on a live system, as opposed to
/// the payload a product ships with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub(crate) resources: ResourceCollection,
    pub(crate) date: Option<String>,
    pub(crate) device_id: Option<String>,
}

impl Evidence {
    #[must_use]
    pub const fn resources(&self) -> &ResourceCollection {
        &self.resources
    }

    /// Observation timestamp, if recorded
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Identifier of the device the evidence was gathered on
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }
}

/// A frozen SWID tag document.
///
/// Produced exclusively by the terminal build step of
/// [`SwidTagBuilder`](crate::builder::SwidTagBuilder); immutable once
/// built, so every codec serializing the same document observes the same
/// state. Entity order is insertion order and is semantically meaningful;
/// payload and evidence resources iterate in their collections' sorted
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwidTag {
    pub(crate) name: String,
    pub(crate) tag_id: String,
    pub(crate) tag_version: u32,
    pub(crate) version: Option<String>,
    pub(crate) version_scheme: Option<VersionScheme>,
    pub(crate) tag_type: TagType,
    pub(crate) language: Option<String>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) links: Vec<Link>,
    pub(crate) payload: Option<Payload>,
    pub(crate) evidence: Option<Evidence>,
}

impl SwidTag {
    /// Software product name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique tag identifier (UUID or opaque string)
    #[must_use]
    pub fn tag_id(&self) -> &str {
        &self.tag_id
    }

    /// Monotonically increasing re-issue counter for the same `tag_id`
    #[must_use]
    pub const fn tag_version(&self) -> u32 {
        self.tag_version
    }

    /// Software version string
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub const fn version_scheme(&self) -> Option<VersionScheme> {
        self.version_scheme
    }

    #[must_use]
    pub const fn tag_type(&self) -> TagType {
        self.tag_type
    }

    /// BCP-47 language tag
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Entities in builder-insertion order
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Links in builder-insertion order
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    #[must_use]
    pub const fn evidence(&self) -> Option<&Evidence> {
        self.evidence.as_ref()
    }

    /// The first entity carrying the tagCreator role.
    ///
    /// Always present on a built document; the terminal build rejects tags
    /// without one.
    #[must_use]
    pub fn tag_creator(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.has_role(Role::TagCreator))
    }
}
