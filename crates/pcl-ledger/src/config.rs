use serde::{Deserialize, Serialize};

/// Schema rules applied to records before admission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Field whose value must be unique across the ledger.
    pub key_field: String,
    /// Fields every record must carry.
    pub required_fields: Vec<String>,
    /// Fields that must hold a finite, non-negative number when present.
    pub numeric_fields: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            key_field: "productID".into(),
            required_fields: vec![
                "productID".into(),
                "productName".into(),
                "description".into(),
                "price".into(),
            ],
            numeric_fields: vec!["price".into()],
        }
    }
}

impl LedgerConfig {
    /// A schema that only enforces the unique key.
    pub fn keyed_by(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            required_fields: vec![],
            numeric_fields: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_describes_products() {
        let c = LedgerConfig::default();
        assert_eq!(c.key_field, "productID");
        assert_eq!(c.required_fields.len(), 4);
        assert_eq!(c.numeric_fields, vec!["price".to_string()]);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let c: LedgerConfig = serde_json::from_str(r#"{"key_field":"sku"}"#).unwrap();
        assert_eq!(c.key_field, "sku");
        assert_eq!(c.numeric_fields, vec!["price".to_string()]);
    }

    #[test]
    fn keyed_by_has_no_other_rules() {
        let c = LedgerConfig::keyed_by("id");
        assert!(c.required_fields.is_empty());
        assert!(c.numeric_fields.is_empty());
    }
}
