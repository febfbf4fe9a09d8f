//! Argument validation helpers shared by the service, the coordinators and the router.

use vessel_registry_shared::VesselId;

use crate::errors::VesselRepositoryError;

/// Parse and validate a vessel identifier.
///
/// # Returns
///
/// * `Ok(VesselId)` - Parsed identifier
/// * `Err(VesselRepositoryError::InvalidArgument)` - If the identifier is empty or not a UUID
///
/// # Example
///
/// ```
/// use vessel_registry_repository::parse_vessel_id;
///
/// let id = parse_vessel_id("550e8400-e29b-41d4-a716-446655440000").expect("valid UUID");
/// assert!(parse_vessel_id("invalid").is_err());
/// ```
pub fn parse_vessel_id(value: &str) -> Result<VesselId, VesselRepositoryError> {
    require_non_blank("vessel id", value)?;
    VesselId::parse(value).map_err(|e| {
        VesselRepositoryError::invalid_argument(format!("vessel id must be a valid UUID: {}", e))
    })
}

/// Reject empty or blank caller-supplied keys.
pub fn require_non_blank(field_name: &str, value: &str) -> Result<(), VesselRepositoryError> {
    if value.trim().is_empty() {
        return Err(VesselRepositoryError::invalid_argument(format!(
            "{} is required",
            field_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vessel_id() {
        let id = parse_vessel_id("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_parse_vessel_id_empty() {
        assert_eq!(
            parse_vessel_id("").unwrap_err(),
            VesselRepositoryError::InvalidArgument("vessel id is required".to_string())
        );
    }

    #[test]
    fn test_parse_vessel_id_malformed() {
        assert!(matches!(
            parse_vessel_id("not-a-uuid").unwrap_err(),
            VesselRepositoryError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("scope", "123").is_ok());
        assert!(require_non_blank("scope", "  ").is_err());
    }
}
