use pcl_types::{FieldValue, Record};

use crate::block::Block;
use crate::config::LedgerConfig;
use crate::error::LedgerError;

/// Admission checks for incoming records.
///
/// Pure: reads the record and a ledger snapshot, never mutates either.
pub struct RecordValidator<'a> {
    config: &'a LedgerConfig,
}

impl<'a> RecordValidator<'a> {
    pub fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    /// Run structural checks, then the uniqueness check against `existing`.
    pub fn validate(&self, record: &Record, existing: &[Block]) -> Result<(), LedgerError> {
        let key = self.validate_fields(record)?;
        self.ensure_unique(key, existing)
    }

    /// Structural checks only. Returns the record's key on success.
    pub fn validate_fields<'r>(&self, record: &'r Record) -> Result<&'r str, LedgerError> {
        let key_field = self.config.key_field.as_str();
        let key = match record.get(key_field) {
            None => return Err(LedgerError::invalid_field(key_field, "missing")),
            Some(FieldValue::Text(key)) if key.trim().is_empty() => {
                return Err(LedgerError::invalid_field(key_field, "must not be empty"))
            }
            Some(FieldValue::Text(key)) => key.as_str(),
            Some(_) => return Err(LedgerError::invalid_field(key_field, "must be text")),
        };

        for field in &self.config.required_fields {
            if !record.contains(field) {
                return Err(LedgerError::invalid_field(field, "missing"));
            }
        }

        // NaN and infinities have no JSON form, so no field may carry one.
        for (name, value) in record.iter() {
            if let FieldValue::Number(n) = value {
                if !n.is_finite() {
                    return Err(LedgerError::invalid_field(name, "must be finite"));
                }
            }
        }

        for field in &self.config.numeric_fields {
            let Some(value) = record.get(field) else {
                continue;
            };
            match value.as_f64() {
                None => return Err(LedgerError::invalid_field(field, "must be a number")),
                Some(n) if n < 0.0 => {
                    return Err(LedgerError::invalid_field(field, "must not be negative"))
                }
                Some(_) => {}
            }
        }

        Ok(key)
    }

    /// Fails with `DuplicateKey` if any existing record carries `key`
    /// (case-sensitive exact match).
    pub fn ensure_unique(&self, key: &str, existing: &[Block]) -> Result<(), LedgerError> {
        let key_field = self.config.key_field.as_str();
        let taken = existing
            .iter()
            .any(|block| block.record().text(key_field) == Some(key));
        if taken {
            return Err(LedgerError::DuplicateKey {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::builder::ChainBuilder;

    fn product(id: &str, price: f64) -> Record {
        Record::new()
            .with("productID", id)
            .with("productName", "Widget")
            .with("description", "A widget")
            .with("price", price)
    }

    fn ledger_with(ids: &[&str]) -> Vec<Block> {
        let mut blocks = Vec::new();
        for id in ids {
            ChainBuilder::append(&mut blocks, product(id, 1.0), Utc::now());
        }
        blocks
    }

    #[test]
    fn accepts_well_formed_record() {
        let config = LedgerConfig::default();
        let validator = RecordValidator::new(&config);
        validator.validate(&product("123456", 699.99), &[]).unwrap();
    }

    #[test]
    fn rejects_missing_key() {
        let config = LedgerConfig::default();
        let record = Record::new().with("productName", "x").with("price", 1.0);
        let err = RecordValidator::new(&config)
            .validate(&record, &[])
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidField {
                field: "productID".into(),
                reason: "missing".into()
            }
        );
    }

    #[test]
    fn rejects_blank_key() {
        let config = LedgerConfig::default();
        let err = RecordValidator::new(&config)
            .validate(&product("   ", 1.0), &[])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidField { field, .. } if field == "productID"));
    }

    #[test]
    fn rejects_numeric_key() {
        let config = LedgerConfig::default();
        let record = product("1", 1.0).with("productID", 42i64);
        let err = RecordValidator::new(&config)
            .validate(&record, &[])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidField { reason, .. } if reason == "must be text"));
    }

    #[test]
    fn rejects_missing_required_field() {
        let config = LedgerConfig::default();
        let record = Record::new().with("productID", "1").with("price", 2.0);
        let err = RecordValidator::new(&config)
            .validate(&record, &[])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidField { field, .. } if field == "productName"));
    }

    #[test]
    fn rejects_bad_prices() {
        let config = LedgerConfig::default();
        let validator = RecordValidator::new(&config);

        for price in [f64::NAN, f64::INFINITY, -0.01] {
            let err = validator.validate(&product("1", price), &[]).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidField { field, .. } if field == "price"));
        }

        let textual = product("1", 1.0).with("price", "12.50");
        let err = validator.validate(&textual, &[]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidField { reason, .. } if reason == "must be a number"));
    }

    #[test]
    fn rejects_non_finite_values_in_any_field() {
        let config = LedgerConfig::default();
        let validator = RecordValidator::new(&config);

        for weight in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = validator
                .validate(&product("1", 1.0).with("weight", weight), &[])
                .unwrap_err();
            assert_eq!(
                err,
                LedgerError::InvalidField {
                    field: "weight".into(),
                    reason: "must be finite".into()
                }
            );
        }

        let keyed = LedgerConfig::keyed_by("sku");
        let record = Record::new().with("sku", "A-1").with("ratio", f64::NAN);
        assert!(RecordValidator::new(&keyed).validate(&record, &[]).is_err());
    }

    #[test]
    fn unlisted_numeric_fields_may_be_negative() {
        let config = LedgerConfig::default();
        RecordValidator::new(&config)
            .validate(&product("1", 1.0).with("discount", -2.5), &[])
            .unwrap();
    }

    #[test]
    fn integer_and_zero_prices_are_accepted() {
        let config = LedgerConfig::default();
        let validator = RecordValidator::new(&config);
        validator.validate(&product("1", 0.0), &[]).unwrap();
        validator
            .validate(&product("2", 1.0).with("price", 15i64), &[])
            .unwrap();
    }

    #[test]
    fn rejects_duplicate_key() {
        let config = LedgerConfig::default();
        let existing = ledger_with(&["123456", "777"]);
        let err = RecordValidator::new(&config)
            .validate(&product("777", 5.0), &existing)
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateKey { key: "777".into() });
    }

    #[test]
    fn key_match_is_case_sensitive() {
        let config = LedgerConfig::default();
        let existing = ledger_with(&["abc"]);
        RecordValidator::new(&config)
            .validate(&product("ABC", 5.0), &existing)
            .unwrap();
    }

    #[test]
    fn keyed_by_config_skips_product_fields() {
        let config = LedgerConfig::keyed_by("sku");
        let record = Record::new().with("sku", "A-1");
        RecordValidator::new(&config).validate(&record, &[]).unwrap();
    }
}
