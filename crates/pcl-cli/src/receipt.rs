use std::fmt::Write as _;

use chrono::SecondsFormat;
use pcl_ledger::Block;
use pcl_types::FieldValue;

use crate::session::{DESCRIPTION_FIELD, NAME_FIELD, PRICE_FIELD};

/// Plain-text receipt listing every stored product.
pub fn render(blocks: &[Block], key_field: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Products Receipt");
    let _ = writeln!(out, "================");

    for (position, block) in blocks.iter().enumerate() {
        let record = block.record();
        let field = |name: &str| {
            record
                .get(name)
                .map(FieldValue::to_string)
                .unwrap_or_else(|| "-".into())
        };
        let price = record
            .get(PRICE_FIELD)
            .and_then(FieldValue::as_f64)
            .map(|p| format!("${p:.2}"))
            .unwrap_or_else(|| "-".into());

        let _ = writeln!(out);
        let _ = writeln!(out, "Product #{}", position + 1);
        let _ = writeln!(out, "  Product ID: {}", field(key_field));
        let _ = writeln!(out, "  Product Name: {}", field(NAME_FIELD));
        let _ = writeln!(out, "  Description: {}", field(DESCRIPTION_FIELD));
        let _ = writeln!(out, "  Price: {price}");
        let _ = writeln!(
            out,
            "  Timestamp: {}",
            block.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
    }

    out
}
