//! Builders for the payload and evidence sections.

use crate::model::{Evidence, Payload, ResourceCollection, ResourceEntry};

/// Fluent builder for [`Payload`].
///
/// A payload is a frozen view over a [`ResourceCollection`]; the builder
/// either wraps a collection assembled elsewhere (the collector, an
/// archive walker) or accumulates entries directly.
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct PayloadBuilder {
    resources: ResourceCollection,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the payload from an existing collection, replacing any
    /// previously accumulated entries.
    pub fn collection(mut self, resources: ResourceCollection) -> Self {
        self.resources = resources;
        self
    }

    /// Add one resource entry (last-write-wins on path collision).
    pub fn resource(mut self, entry: ResourceEntry) -> Self {
        self.resources.add(entry);
        self
    }

    /// Freeze into a [`Payload`]. Nothing to validate: collection-level
    /// invariants are enforced by the collection itself.
    pub fn build(self) -> Payload {
        Payload {
            resources: self.resources,
        }
    }
}

/// Fluent builder for [`Evidence`].
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct EvidenceBuilder {
    resources: ResourceCollection,
    date: Option<String>,
    device_id: Option<String>,
}

impl EvidenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the evidence from an existing collection.
    pub fn collection(mut self, resources: ResourceCollection) -> Self {
        self.resources = resources;
        self
    }

    /// Add one observed resource entry.
    pub fn resource(mut self, entry: ResourceEntry) -> Self {
        self.resources.add(entry);
        self
    }

    /// Record the observation timestamp.
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Record the device the evidence was gathered on.
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Freeze into an [`Evidence`] section.
    pub fn build(self) -> Evidence {
        Evidence {
            resources: self.resources,
            date: self.date,
            device_id: self.device_id,
        }
    }
}
