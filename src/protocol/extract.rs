use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Fixed property schema returned by the lookup handler. Deserialization is
/// strict on presence: upstream JSON missing a required field is rejected as a
/// malformed extraction rather than forwarded as partial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyData {
    pub estimated_value: f64,
    pub square_footage: f64,
    pub year_built: i32,
    pub lot_size: String,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub property_type: String,
    pub last_sale_date: String,
    pub last_sale_price: f64,
}

/// Client-facing lookup result: `{"propertyData": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReport {
    pub property_data: PropertyData,
}

/// Strip optional Markdown code-fence delimiters wrapping machine-generated
/// JSON. A leading ``` marker (optionally tagged `json`) and a trailing ```
/// are removed; text without fences passes through untouched, so the
/// transform is idempotent.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse fence-stripped completion text into the fixed property schema.
///
/// # Errors
///
/// Returns [`GatewayError::MalformedExtraction`] when the stripped text is not
/// valid JSON for the schema. The failure is not recovered locally; it
/// propagates to the handler's error envelope.
pub fn parse_property_report(content: &str) -> Result<PropertyReport, GatewayError> {
    let stripped = strip_code_fence(content);
    serde_json::from_str(stripped)
        .map_err(|err| GatewayError::MalformedExtraction(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"propertyData": {"estimatedValue": 350000, "squareFootage": 2000, "yearBuilt": 1990, "lotSize": "0.5 acres", "bedrooms": 4, "bathrooms": 2.5, "propertyType": "Residential", "lastSaleDate": "2023-01-01", "lastSalePrice": 340000}}"#;

    #[test]
    fn test_strip_fence_with_json_tag() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        assert_eq!(strip_code_fence(&fenced), PAYLOAD);
    }

    #[test]
    fn test_strip_fence_without_tag() {
        let fenced = format!("```\n{PAYLOAD}\n```");
        assert_eq!(strip_code_fence(&fenced), PAYLOAD);
    }

    #[test]
    fn test_strip_is_noop_without_fences() {
        assert_eq!(strip_code_fence(PAYLOAD), PAYLOAD);
        assert_eq!(strip_code_fence(&format!("  {PAYLOAD}\n")), PAYLOAD);
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        let from_fenced = parse_property_report(&fenced).unwrap();
        let from_plain = parse_property_report(PAYLOAD).unwrap();
        assert_eq!(from_fenced, from_plain);
        assert_eq!(from_plain.property_data.estimated_value, 350_000.0);
        assert_eq!(from_plain.property_data.year_built, 1990);
        assert_eq!(from_plain.property_data.bathrooms, 2.5);
        assert_eq!(from_plain.property_data.lot_size, "0.5 acres");
    }

    #[test]
    fn test_serialized_field_names_are_camel_case() {
        let report = parse_property_report(PAYLOAD).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["propertyData"]["estimatedValue"].is_number());
        assert!(json["propertyData"]["lastSaleDate"].is_string());
    }

    #[test]
    fn test_non_json_content_is_malformed() {
        let err = parse_property_report("Sorry, I could not find that property.").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedExtraction(_)));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let partial = r#"{"propertyData": {"estimatedValue": 350000}}"#;
        let err = parse_property_report(partial).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedExtraction(_)));
    }

    #[test]
    fn test_unterminated_fence_still_parses() {
        let fenced = format!("```json\n{PAYLOAD}");
        assert!(parse_property_report(&fenced).is_ok());
    }
}
