//! Import result types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Placeholder label for a row error that names no product
pub const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Identifier of one import attempt within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptId(pub u64);

impl AttemptId {
    pub fn next(self) -> Self {
        AttemptId(self.0 + 1)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Summary returned by the import service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub products_created: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products_updated: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants_created: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants_updated: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<RowError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_id: Option<String>,
}

impl ImportResult {
    pub fn row_errors(&self) -> &[RowError] {
        self.errors.as_deref().unwrap_or(&[])
    }

    pub fn has_row_errors(&self) -> bool {
        !self.row_errors().is_empty()
    }

    /// Download token, if the service produced a result artifact
    pub fn download_id(&self) -> Option<&str> {
        self.download_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Validation failure for one product or row.
///
/// The service reports row problems in a few shapes: product-level groups
/// (`product` + `errors`), parse failures (`row` + `error`) and variant
/// conflicts (`sku` + `error`). All of them land here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RowError {
    pub fn new(product: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            product: Some(product.into()),
            errors,
            ..Default::default()
        }
    }

    /// Display label for the group
    pub fn label(&self) -> String {
        if let Some(product) = non_empty(&self.product) {
            return product.to_string();
        }
        if let Some(sku) = non_empty(&self.sku) {
            return format!("SKU {}", sku);
        }
        if let Some(row) = self.row {
            return format!("Row {}", row);
        }
        UNKNOWN_PRODUCT.to_string()
    }

    /// All messages for this row, in order
    pub fn messages(&self) -> Vec<&str> {
        let mut messages: Vec<&str> = self.errors.iter().map(String::as_str).collect();
        if let Some(error) = non_empty(&self.error) {
            messages.push(error);
        }
        messages
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "products_created": 3,
            "products_updated": 1,
            "variants_created": 7,
            "variants_updated": 0,
            "errors": [{"product": "tee", "errors": ["Variant at index 0 must have Variant ID or SKU"]}],
            "download_id": "abc123"
        }"#;

        let result: ImportResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.products_created, 3);
        assert_eq!(result.variants_created, 7);
        assert!(result.has_row_errors());
        assert_eq!(result.row_errors()[0].label(), "tee");
        assert_eq!(result.download_id(), Some("abc123"));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let result: ImportResult =
            serde_json::from_str(r#"{"products_created": null, "errors": []}"#).unwrap();
        assert_eq!(result.products_created, 0);
        assert_eq!(result.variants_updated, 0);
        assert!(!result.has_row_errors());
        assert_eq!(result.download_id(), None);
    }

    #[test]
    fn test_row_error_shapes() {
        let errors: Vec<RowError> = serde_json::from_str(
            r#"[
                {"product": null, "errors": ["Product must have at least Handle or Title"]},
                {"row": 4, "status": "error", "error": "Invalid price"},
                {"sku": "TEE-RED-M", "error": "Duplicate SKU already exists in Shopify"},
                {"errors": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(errors[0].label(), UNKNOWN_PRODUCT);
        assert_eq!(errors[1].label(), "Row 4");
        assert_eq!(errors[1].messages(), vec!["Invalid price"]);
        assert_eq!(errors[2].label(), "SKU TEE-RED-M");
        assert!(errors[3].messages().is_empty());
    }

    #[test]
    fn test_attempt_ids_increase() {
        let first = AttemptId(1);
        assert!(first.next() > first);
        assert_eq!(first.next().to_string(), "#2");
    }
}
