//! The canonical vessel aggregate and its builder.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::VesselValidationError;
use crate::types::departure::Departure;
use crate::types::references::{CategoryReference, PortReference, ScopeReference, VesselId};
use crate::types::visibility::Visibility;

/// Canonical representation of a vessel.
///
/// A `Vessel` can only be obtained through [`VesselBuilder::build`], which enforces the
/// invariants: name, category and creation scope are present and non-blank, visibility
/// defaults to [`Visibility::Scoped`], and the last departure is either complete or absent.
///
/// There are no setters. Changing a vessel means building a new instance, typically from
/// [`Vessel::to_builder`], which keeps the identifier.
///
/// The identifier is `None` for a vessel that has not been stored yet; every vessel read
/// back from the registry carries one.
///
/// # Example
///
/// ```
/// use vessel_registry_shared::{Vessel, Visibility};
///
/// let vessel = Vessel::builder()
///     .with_name("Le_Name")
///     .with_category("Cargo")
///     .with_visibility(Visibility::Global)
///     .with_creation_scope("Le_center")
///     .build()
///     .expect("valid vessel");
///
/// assert_eq!(vessel.name(), "Le_Name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "VesselDocument")]
pub struct Vessel {
    id: Option<VesselId>,
    name: String,
    category: CategoryReference,
    visibility: Visibility,
    creation_scope: ScopeReference,
    last_departure: Option<Departure>,
}

impl Vessel {
    /// Start building a vessel without identifier.
    pub fn builder() -> VesselBuilder {
        VesselBuilder::default()
    }

    /// Builder pre-filled with every field of this vessel, identifier included.
    pub fn to_builder(&self) -> VesselBuilder {
        VesselBuilder::from_vessel(self)
    }

    /// Same vessel carrying another identifier.
    pub fn with_id(self, id: VesselId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Same vessel without identifier.
    pub fn without_id(self) -> Self {
        Self { id: None, ..self }
    }

    pub fn id(&self) -> Option<VesselId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &CategoryReference {
        &self.category
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn creation_scope(&self) -> &ScopeReference {
        &self.creation_scope
    }

    pub fn last_departure(&self) -> Option<&Departure> {
        self.last_departure.as_ref()
    }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.name)?;
        if let Some(id) = self.id {
            write!(f, "#{}, ", id)?;
        }
        match self.visibility {
            Visibility::Global => write!(f, "visible to all)"),
            Visibility::Scoped => write!(f, "visible to {} only)", self.creation_scope),
        }
    }
}

/// Builder for [`Vessel`].
#[derive(Debug, Clone, Default)]
pub struct VesselBuilder {
    id: Option<VesselId>,
    name: Option<String>,
    category: Option<CategoryReference>,
    visibility: Option<Visibility>,
    creation_scope: Option<ScopeReference>,
    last_departure: Option<Departure>,
}

impl VesselBuilder {
    /// Builder pre-filled from an existing vessel.
    pub fn from_vessel(vessel: &Vessel) -> Self {
        Self {
            id: vessel.id,
            name: Some(vessel.name.clone()),
            category: Some(vessel.category.clone()),
            visibility: Some(vessel.visibility),
            creation_scope: Some(vessel.creation_scope.clone()),
            last_departure: vessel.last_departure.clone(),
        }
    }

    pub fn with_id(mut self, id: VesselId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryReference>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_creation_scope(mut self, scope: impl Into<ScopeReference>) -> Self {
        self.creation_scope = Some(scope.into());
        self
    }

    /// Set the last departure. Port and time can only be given together.
    pub fn with_departure(mut self, port: impl Into<PortReference>, time: DateTime<Utc>) -> Self {
        self.last_departure = Some(Departure::new(port.into(), time));
        self
    }

    /// Clear the last departure.
    pub fn without_departure(mut self) -> Self {
        self.last_departure = None;
        self
    }

    /// Validate the collected fields and build the vessel.
    ///
    /// # Returns
    ///
    /// * `Ok(Vessel)` - If every mandatory field is present and non-blank
    /// * `Err(VesselValidationError)` - Naming the first field that fails
    pub fn build(self) -> Result<Vessel, VesselValidationError> {
        let name = self.name.ok_or(VesselValidationError::missing("name"))?;
        if name.trim().is_empty() {
            return Err(VesselValidationError::empty("name"));
        }
        let category = self
            .category
            .ok_or(VesselValidationError::missing("category"))?;
        if category.is_blank() {
            return Err(VesselValidationError::empty("category"));
        }
        let creation_scope = self
            .creation_scope
            .ok_or(VesselValidationError::missing("creation scope"))?;
        if creation_scope.is_blank() {
            return Err(VesselValidationError::empty("creation scope"));
        }
        if let Some(departure) = &self.last_departure {
            if departure.port().is_blank() {
                return Err(VesselValidationError::empty("departure port"));
            }
        }

        Ok(Vessel {
            id: self.id,
            name,
            category,
            visibility: self.visibility.unwrap_or_default(),
            creation_scope,
            last_departure: self.last_departure,
        })
    }
}

/// Wire form of a vessel; deserialized values go through the builder.
#[derive(Deserialize)]
struct VesselDocument {
    #[serde(default)]
    id: Option<VesselId>,
    name: Option<String>,
    category: Option<CategoryReference>,
    #[serde(default)]
    visibility: Option<Visibility>,
    creation_scope: Option<ScopeReference>,
    #[serde(default)]
    last_departure: Option<Departure>,
}

impl TryFrom<VesselDocument> for Vessel {
    type Error = VesselValidationError;

    fn try_from(doc: VesselDocument) -> Result<Self, Self::Error> {
        VesselBuilder {
            id: doc.id,
            name: doc.name,
            category: doc.category,
            visibility: doc.visibility,
            creation_scope: doc.creation_scope,
            last_departure: doc.last_departure,
        }
        .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_builder() -> VesselBuilder {
        Vessel::builder()
            .with_name("Le_Name")
            .with_category("Cargo")
            .with_creation_scope("Le_center")
    }

    #[test]
    fn test_build_defaults_visibility_to_scoped() {
        let vessel = base_builder().build().unwrap();

        assert_eq!(vessel.visibility(), Visibility::Scoped);
        assert!(vessel.id().is_none());
        assert!(vessel.last_departure().is_none());
    }

    #[test]
    fn test_build_requires_name() {
        let result = Vessel::builder()
            .with_category("Cargo")
            .with_creation_scope("Le_center")
            .build();

        assert_eq!(result.unwrap_err(), VesselValidationError::MissingField("name"));
    }

    #[test]
    fn test_build_rejects_blank_name() {
        let result = base_builder().with_name("  ").build();

        assert_eq!(result.unwrap_err(), VesselValidationError::EmptyField("name"));
    }

    #[test]
    fn test_build_requires_category() {
        let result = Vessel::builder()
            .with_name("Le_Name")
            .with_creation_scope("Le_center")
            .build();

        assert_eq!(result.unwrap_err(), VesselValidationError::MissingField("category"));
    }

    #[test]
    fn test_build_requires_creation_scope() {
        let result = Vessel::builder()
            .with_name("Le_Name")
            .with_category("Cargo")
            .with_visibility(Visibility::Global)
            .build();

        assert_eq!(
            result.unwrap_err(),
            VesselValidationError::MissingField("creation scope")
        );
    }

    #[test]
    fn test_build_rejects_blank_departure_port() {
        let result = base_builder().with_departure("", Utc::now()).build();

        assert_eq!(
            result.unwrap_err(),
            VesselValidationError::EmptyField("departure port")
        );
    }

    #[test]
    fn test_to_builder_keeps_identifier() {
        let id = VesselId::generate();
        let original = base_builder().with_id(id).build().unwrap();

        let renamed = original.to_builder().with_name("Le_Name_modified").build().unwrap();

        assert_eq!(renamed.id(), Some(id));
        assert_eq!(renamed.name(), "Le_Name_modified");
        assert_ne!(renamed, original);
    }

    #[test]
    fn test_structural_equality() {
        let time = Utc::now() - Duration::hours(1);
        let a = base_builder().with_departure("brest", time).build().unwrap();
        let b = base_builder().with_departure("brest", time).build().unwrap();

        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_id(VesselId::generate()));
    }

    #[test]
    fn test_display() {
        let id = VesselId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let scoped = base_builder().with_id(id).build().unwrap();
        let global = base_builder().with_visibility(Visibility::Global).build().unwrap();

        assert_eq!(
            scoped.to_string(),
            "Le_Name (#550e8400-e29b-41d4-a716-446655440000, visible to Le_center only)"
        );
        assert_eq!(global.to_string(), "Le_Name (visible to all)");
    }

    #[test]
    fn test_serialization() {
        let vessel = base_builder()
            .with_id(VesselId::generate())
            .with_departure("brest", Utc::now())
            .build()
            .unwrap();

        let json = serde_json::to_string(&vessel).unwrap();
        let deserialized: Vessel = serde_json::from_str(&json).unwrap();

        assert_eq!(vessel, deserialized);
    }

    #[test]
    fn test_deserialization_enforces_invariants() {
        let json = r#"{"name": "Le_Name", "category": "Cargo"}"#;

        assert!(serde_json::from_str::<Vessel>(json).is_err());
    }

    #[test]
    fn test_deserialization_defaults_visibility() {
        let json = r#"{"name": "Le_Name", "category": "Cargo", "creation_scope": "Le_center"}"#;

        let vessel: Vessel = serde_json::from_str(json).unwrap();

        assert_eq!(vessel.visibility(), Visibility::Scoped);
    }
}
