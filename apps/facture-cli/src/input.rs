//! Reading a document from JSON.
//!
//! ```json
//! {
//!   "kind": "invoice",
//!   "fixedSurcharge": "1,000",
//!   "lines": [
//!     { "designation": "Audit", "quantity": 2, "unitPriceExclTax": "100", "taxRatePercent": 19 }
//!   ]
//! }
//! ```
//!
//! `kind` defaults to `invoice`, `fixedSurcharge` to the configured stamp
//! duty. A row without a designation is labelled by its position.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use facture_core::validation::{
    parse_number, validate_fixed_surcharge, validate_line_items, RawLineItem,
};
use facture_core::{CoreResult, Document, DocumentKind, InvoicingSettings};

/// Document payload as found in the input file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub fixed_surcharge: Option<Value>,
    #[serde(default)]
    pub lines: Vec<RawLineItem>,
}

impl DocumentInput {
    /// Validates every field and builds the document.
    pub fn into_document(self, settings: &InvoicingSettings) -> CoreResult<Document> {
        let fixed_surcharge = match &self.fixed_surcharge {
            Some(raw) => {
                let amount = parse_number("fixedSurcharge", raw)?;
                validate_fixed_surcharge(amount)?;
                amount
            }
            None => settings.fixed_surcharge,
        };

        let items = validate_line_items(&self.lines)?;

        let mut document = Document::new(self.kind, fixed_surcharge);
        for (index, (raw, item)) in self.lines.iter().zip(items).enumerate() {
            let label = match raw.designation.as_deref() {
                Some(d) => d.to_string(),
                None => format!("Line {}", index + 1),
            };
            document.add_line(&label, item)?;
        }

        debug!(
            kind = ?document.kind(),
            lines = document.line_count(),
            fixed_surcharge,
            "Document loaded"
        );

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facture_core::{CoreError, ValidationError};
    use serde_json::json;

    fn parse(value: Value) -> DocumentInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_from_settings() {
        let input = parse(json!({
            "lines": [{"quantity": 2, "unitPriceExclTax": 100, "taxRatePercent": 19}]
        }));
        let doc = input.into_document(&InvoicingSettings::default()).unwrap();

        assert_eq!(doc.kind(), DocumentKind::Invoice);
        assert_eq!(doc.fixed_surcharge(), 1.0);
        assert_eq!(doc.lines()[0].designation, "Line 1");
        assert_eq!(doc.totals().total_incl_tax, 239.0);
    }

    #[test]
    fn test_explicit_kind_and_surcharge() {
        let input = parse(json!({
            "kind": "credit_note",
            "fixedSurcharge": "0,600",
            "lines": [{"designation": "Return", "quantity": "1", "unitPriceExclTax": "50", "taxRatePercent": "19"}]
        }));
        let doc = input.into_document(&InvoicingSettings::default()).unwrap();

        assert_eq!(doc.kind(), DocumentKind::CreditNote);
        assert_eq!(doc.fixed_surcharge(), 0.6);
        assert_eq!(doc.lines()[0].designation, "Return");
        assert!(doc.ledger_totals().total_incl_tax < 0.0);
    }

    #[test]
    fn test_bad_row_reports_index() {
        let input = parse(json!({
            "lines": [
                {"quantity": 1, "unitPriceExclTax": 1, "taxRatePercent": 19},
                {"quantity": 1, "unitPriceExclTax": 1}
            ]
        }));
        let err = input
            .into_document(&InvoicingSettings::default())
            .unwrap_err();

        match err {
            CoreError::InvalidLine { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source.field(), "taxRatePercent");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_surcharge_rejected() {
        let input = parse(json!({"fixedSurcharge": -1, "lines": []}));
        let err = input
            .into_document(&InvoicingSettings::default())
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Negative { .. })
        ));
    }
}
