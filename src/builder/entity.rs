//! Builder for entity records.

use crate::error::{Result, SwidError, ValidationIssue};
use crate::model::{Entity, Role};

/// Fluent builder for [`Entity`].
///
/// Role values are constrained by the closed [`Role`] vocabulary at the
/// type level; `build()` checks the remaining local constraints (name
/// present, at least one role) and reports every violation at once.
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct EntityBuilder {
    name: Option<String>,
    regid: Option<String>,
    roles: Vec<Role>,
    thumbprint: Option<String>,
}

impl EntityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the registration identifier.
    pub fn regid(mut self, regid: impl Into<String>) -> Self {
        self.regid = Some(regid.into());
        self
    }

    /// Set the signing certificate thumbprint.
    pub fn thumbprint(mut self, thumbprint: impl Into<String>) -> Self {
        self.thumbprint = Some(thumbprint.into());
        self
    }

    /// Add a role. Duplicates are ignored; insertion order is kept.
    pub fn role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    /// Add several roles at once.
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        for role in roles {
            self = self.role(role);
        }
        self
    }

    /// Validate and freeze into an [`Entity`].
    pub fn build(self) -> Result<Entity> {
        let mut issues = Vec::new();

        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            issues.push(ValidationIssue::new("entity.name", "must not be empty"));
        }
        if self.roles.is_empty() {
            issues.push(ValidationIssue::new(
                "entity.role",
                "at least one role is required",
            ));
        }
        if let Some(regid) = &self.regid {
            if regid.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    "entity.regid",
                    "must not be empty when present",
                ));
            }
        }

        if !issues.is_empty() {
            return Err(SwidError::validation(issues));
        }

        Ok(Entity {
            name,
            regid: self.regid,
            roles: self.roles,
            thumbprint: self.thumbprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_entity() {
        let entity = EntityBuilder::new()
            .name("Example Corp")
            .role(Role::TagCreator)
            .build()
            .unwrap();
        assert_eq!(entity.name(), "Example Corp");
        assert_eq!(entity.regid(), None);
        assert_eq!(entity.roles(), &[Role::TagCreator]);
    }

    #[test]
    fn test_missing_name_and_roles_reported_together() {
        let err = EntityBuilder::new().build().unwrap_err();
        match err {
            SwidError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.mentions_field("entity.name"));
                assert!(errors.mentions_field("entity.role"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_roles_collapse() {
        let entity = EntityBuilder::new()
            .name("x")
            .role(Role::Distributor)
            .role(Role::Distributor)
            .role(Role::Licensor)
            .build()
            .unwrap();
        assert_eq!(entity.roles(), &[Role::Distributor, Role::Licensor]);
    }

    #[test]
    fn test_blank_regid_rejected() {
        let err = EntityBuilder::new()
            .name("x")
            .role(Role::TagCreator)
            .regid("  ")
            .build()
            .unwrap_err();
        assert!(matches!(err, SwidError::Validation(e) if e.mentions_field("entity.regid")));
    }
}
