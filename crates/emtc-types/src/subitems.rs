//! Sub-document input normalization.
//!
//! Field devices send household members and purchase items either as a JSON
//! array of objects or as the JSON-encoded text the store itself persists
//! (clients that echo a record back after reading it). Both shapes collapse
//! into one `Vec<T>` here, so nothing past the boundary sees the difference.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Accepted wire shapes for an embedded sub-document list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubItemsInput<T> {
    Items(Vec<T>),
    Encoded(String),
}

impl<T: DeserializeOwned> SubItemsInput<T> {
    /// Resolve to the canonical list.
    pub fn normalize(self, field: &'static str) -> Result<Vec<T>, ValidationError> {
        match self {
            SubItemsInput::Items(items) => Ok(items),
            SubItemsInput::Encoded(text) => {
                serde_json::from_str(&text).map_err(|e| ValidationError::Malformed {
                    field,
                    detail: format!("undecodable sub-item list: {e}"),
                })
            }
        }
    }
}

impl<T> From<Vec<T>> for SubItemsInput<T> {
    fn from(items: Vec<T>) -> Self {
        SubItemsInput::Items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize, Serialize)]
    struct Line {
        name: String,
        qty: u32,
    }

    #[test]
    fn test_array_and_encoded_agree() {
        let array: SubItemsInput<Line> =
            serde_json::from_value(serde_json::json!([{"name": "Shirt", "qty": 2}]))
                .expect("array form");
        let encoded: SubItemsInput<Line> =
            serde_json::from_value(serde_json::json!("[{\"name\":\"Shirt\",\"qty\":2}]"))
                .expect("encoded form");

        let a = array.normalize("items").expect("normalize array");
        let b = encoded.normalize("items").expect("normalize encoded");
        assert_eq!(a, b);
        assert_eq!(a[0].name, "Shirt");
    }

    #[test]
    fn test_garbage_string_rejected() {
        let input: SubItemsInput<Line> = SubItemsInput::Encoded("not json".into());
        let err = input.normalize("items").expect_err("should fail");
        assert!(matches!(err, ValidationError::Malformed { field: "items", .. }));
    }

    #[test]
    fn test_unknown_keys_in_items_ignored() {
        let input: SubItemsInput<Line> = serde_json::from_value(serde_json::json!([
            {"name": "Saree", "qty": 1, "legacy_field": true}
        ]))
        .expect("extra keys are tolerated");
        assert_eq!(input.normalize("items").expect("normalize").len(), 1);
    }
}
