//! Shared deserialization helpers

use serde::{Deserialize, Deserializer};

/// Deserialize an optional string field, coalescing empty strings to `None`
///
/// The device pads many optional response fields with empty strings instead
/// of omitting them.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        field: Option<String>,
    }

    #[test]
    fn test_empty_string_becomes_none() {
        let probe: Probe = serde_json::from_str(r#"{"field": ""}"#).unwrap();
        assert_eq!(probe.field, None);
    }

    #[test]
    fn test_missing_field_becomes_none() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.field, None);
    }

    #[test]
    fn test_populated_field_is_kept() {
        let probe: Probe = serde_json::from_str(r#"{"field": "KD-55X9005A"}"#).unwrap();
        assert_eq!(probe.field, Some("KD-55X9005A".to_string()));
    }
}
