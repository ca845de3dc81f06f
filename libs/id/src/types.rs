//! Typed ID definitions for platform resources.
//!
//! Each ID wraps the UUID the device cloud assigned to the resource.

use crate::define_uuid;

// =============================================================================
// Device Cloud
// =============================================================================

define_uuid!(InstanceUuid);
define_uuid!(RecipeUuid);

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "7f2c1a9e-4b2d-4c6f-9a3e-1d8b6c2f0e57";

    #[test]
    fn test_parse_roundtrip() {
        let id = InstanceUuid::parse(RAW).unwrap();
        assert_eq!(id.to_string(), RAW);
        assert_eq!(InstanceUuid::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(InstanceUuid::parse(""), Err(crate::IdError::Empty));
    }

    #[test]
    fn test_parse_garbage() {
        let err = RecipeUuid::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, crate::IdError::InvalidUuid(_)));
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        assert_ne!(InstanceUuid::new(), InstanceUuid::new());
    }

    #[test]
    fn test_serde_string_form() {
        let id = RecipeUuid::parse(RAW).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{RAW}\""));

        let back: RecipeUuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let result: Result<InstanceUuid, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
