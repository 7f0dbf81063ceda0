//! # Document
//!
//! An editable invoice or credit note with memoized totals.
//!
//! ## Recompute Once Per Change
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Document Operations                                  │
//! │                                                                         │
//! │  Caller Action            Method                  Cache                 │
//! │  ─────────────            ──────                  ─────                 │
//! │                                                                         │
//! │  Add row ────────────────► add_line() ──────────► invalidated          │
//! │  Edit row ───────────────► update_line() ───────► invalidated          │
//! │  Delete row ─────────────► remove_line() ───────► invalidated          │
//! │  Change stamp duty ──────► set_fixed_surcharge()► invalidated          │
//! │  Reset ──────────────────► clear() ─────────────► invalidated          │
//! │                                                                         │
//! │  Render totals ──────────► totals() ────────────► filled on first read │
//! │                                                                         │
//! │  Unrelated re-renders read the cached value; no recomputation.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cache is a `OnceCell`, so a `Document` is `Send` but not `Sync`.
//! Share one across threads behind a `Mutex`.

use std::cell::OnceCell;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::compute_document_totals;
use crate::settings::InvoicingSettings;
use crate::types::{DocumentKind, DocumentTotals, LineBreakdown, LineItem};
use crate::validation::{validate_designation, validate_fixed_surcharge};
use crate::MAX_DOCUMENT_LINES;

/// A row on a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    /// Line id (UUID v4), stable across edits.
    pub id: String,

    /// Product or service label.
    pub designation: String,

    /// Quantity, unit price and rate.
    pub item: LineItem,
}

/// Per-row amounts keyed by line id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLineBreakdown {
    pub id: String,
    pub designation: String,
    #[serde(flatten)]
    pub amounts: LineBreakdown,
}

/// An invoice or credit note being edited.
///
/// ## Invariants
/// - At most [`MAX_DOCUMENT_LINES`] lines
/// - Every designation passed [`validate_designation`]
/// - `totals()` always equals `compute_document_totals` over the current
///   lines and surcharge
///
/// Deserialization goes through [`DocumentRecord`] and re-checks the line
/// limit, designations, line id uniqueness and the stamp duty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DocumentRecord")]
pub struct Document {
    kind: DocumentKind,
    lines: Vec<DocumentLine>,
    fixed_surcharge: f64,
    created_at: DateTime<Utc>,

    #[serde(skip)]
    totals_cache: OnceCell<DocumentTotals>,
}

/// Stored form of a [`Document`], before its invariants are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub lines: Vec<DocumentLine>,
    pub fixed_surcharge: f64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DocumentRecord> for Document {
    type Error = CoreError;

    fn try_from(record: DocumentRecord) -> CoreResult<Self> {
        if record.lines.len() > MAX_DOCUMENT_LINES {
            return Err(CoreError::DocumentTooLarge {
                max: MAX_DOCUMENT_LINES,
            });
        }

        validate_fixed_surcharge(record.fixed_surcharge)?;

        let mut lines = Vec::with_capacity(record.lines.len());
        for (index, line) in record.lines.into_iter().enumerate() {
            validate_designation(&line.designation)
                .map_err(|source| CoreError::InvalidLine { index, source })?;

            if lines.iter().any(|l: &DocumentLine| l.id == line.id) {
                return Err(CoreError::DuplicateLineId(line.id));
            }

            lines.push(DocumentLine {
                designation: line.designation.trim().to_string(),
                ..line
            });
        }

        Ok(Document {
            kind: record.kind,
            lines,
            fixed_surcharge: record.fixed_surcharge,
            created_at: record.created_at,
            totals_cache: OnceCell::new(),
        })
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new(kind: DocumentKind, fixed_surcharge: f64) -> Self {
        Document {
            kind,
            lines: Vec::new(),
            fixed_surcharge,
            created_at: Utc::now(),
            totals_cache: OnceCell::new(),
        }
    }

    /// Creates an empty document using the configured stamp duty.
    pub fn from_settings(kind: DocumentKind, settings: &InvoicingSettings) -> Self {
        Self::new(kind, settings.fixed_surcharge)
    }

    /// Appends a line and returns its generated id.
    ///
    /// ## Errors
    /// - `Validation` if the designation is blank or too long
    /// - `DocumentTooLarge` past [`MAX_DOCUMENT_LINES`]
    pub fn add_line(&mut self, designation: &str, item: LineItem) -> CoreResult<String> {
        validate_designation(designation)?;

        if self.lines.len() >= MAX_DOCUMENT_LINES {
            return Err(CoreError::DocumentTooLarge {
                max: MAX_DOCUMENT_LINES,
            });
        }

        let id = Uuid::new_v4().to_string();
        self.lines.push(DocumentLine {
            id: id.clone(),
            designation: designation.trim().to_string(),
            item,
        });
        self.invalidate();

        Ok(id)
    }

    /// Replaces the amounts of an existing line. The designation is kept.
    pub fn update_line(&mut self, id: &str, item: LineItem) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))?;

        line.item = item;
        self.invalidate();
        Ok(())
    }

    /// Removes a line by id.
    pub fn remove_line(&mut self, id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.id != id);

        if self.lines.len() == initial_len {
            return Err(CoreError::LineNotFound(id.to_string()));
        }

        self.invalidate();
        Ok(())
    }

    /// Changes the per-document stamp duty.
    pub fn set_fixed_surcharge(&mut self, amount: f64) {
        self.fixed_surcharge = amount;
        self.invalidate();
    }

    /// Removes all lines. Kind and surcharge are kept.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.invalidate();
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn fixed_surcharge(&self) -> f64 {
        self.fixed_surcharge
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Document totals, computed at most once between two mutations.
    pub fn totals(&self) -> DocumentTotals {
        *self.totals_cache.get_or_init(|| {
            let items: Vec<LineItem> = self.lines.iter().map(|l| l.item).collect();
            let totals = compute_document_totals(&items, self.fixed_surcharge);
            debug!(
                kind = ?self.kind,
                lines = items.len(),
                total_incl_tax = totals.total_incl_tax,
                "Document totals recomputed"
            );
            totals
        })
    }

    /// Totals signed for posting: negated for credit notes.
    pub fn ledger_totals(&self) -> DocumentTotals {
        self.totals().scaled(self.kind.sign())
    }

    /// Per-row HT / TVA / TTC, in line order.
    pub fn breakdown(&self) -> Vec<DocumentLineBreakdown> {
        self.lines
            .iter()
            .map(|l| DocumentLineBreakdown {
                id: l.id.clone(),
                designation: l.designation.clone(),
                amounts: l.item.breakdown(),
            })
            .collect()
    }

    /// Whether `totals()` would be served from the cache.
    pub fn has_cached_totals(&self) -> bool {
        self.totals_cache.get().is_some()
    }

    fn invalidate(&mut self) {
        self.totals_cache = OnceCell::new();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxRate;

    fn vat19(qty: f64, price: f64) -> LineItem {
        LineItem::new(qty, price, TaxRate::from_percent(19.0))
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new(DocumentKind::Invoice, 1.0);
        assert!(doc.is_empty());
        assert_eq!(doc.line_count(), 0);
        assert_eq!(doc.totals().total_incl_tax, 1.0);
    }

    #[test]
    fn test_add_update_remove() {
        let mut doc = Document::new(DocumentKind::Invoice, 1.0);
        let id = doc.add_line("  Audit  ", vat19(2.0, 100.0)).unwrap();
        assert_eq!(doc.lines()[0].designation, "Audit");
        assert_eq!(doc.totals().total_incl_tax, 239.0);

        doc.update_line(&id, vat19(1.0, 100.0)).unwrap();
        assert_eq!(doc.totals().total_excl_tax, 100.0);
        assert_eq!(doc.totals().total_tax, 19.0);

        doc.remove_line(&id).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.totals().total_incl_tax, 1.0);
    }

    #[test]
    fn test_unknown_line_id() {
        let mut doc = Document::new(DocumentKind::Invoice, 0.0);
        assert!(matches!(
            doc.update_line("missing", vat19(1.0, 1.0)),
            Err(CoreError::LineNotFound(_))
        ));
        assert!(matches!(
            doc.remove_line("missing"),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_blank_designation_rejected() {
        let mut doc = Document::new(DocumentKind::Invoice, 0.0);
        assert!(matches!(
            doc.add_line("   ", vat19(1.0, 1.0)),
            Err(CoreError::Validation(_))
        ));
        assert!(doc.is_empty());
    }

    #[test]
    fn test_line_limit() {
        let mut doc = Document::new(DocumentKind::Invoice, 0.0);
        for _ in 0..MAX_DOCUMENT_LINES {
            doc.add_line("Item", vat19(1.0, 1.0)).unwrap();
        }
        assert!(matches!(
            doc.add_line("One too many", vat19(1.0, 1.0)),
            Err(CoreError::DocumentTooLarge { .. })
        ));
    }

    #[test]
    fn test_cache_invalidated_by_every_mutation() {
        let mut doc = Document::new(DocumentKind::Invoice, 1.0);
        let id = doc.add_line("A", vat19(1.0, 10.0)).unwrap();

        assert!(!doc.has_cached_totals());
        let first = doc.totals();
        assert!(doc.has_cached_totals());
        assert_eq!(doc.totals(), first);

        doc.set_fixed_surcharge(0.5);
        assert!(!doc.has_cached_totals());
        assert_eq!(doc.totals().fixed_surcharge, 0.5);

        doc.update_line(&id, vat19(3.0, 10.0)).unwrap();
        assert!(!doc.has_cached_totals());
        assert_eq!(doc.totals().total_excl_tax, 30.0);

        doc.clear();
        assert!(!doc.has_cached_totals());
        assert_eq!(doc.totals().total_incl_tax, 0.5);
    }

    #[test]
    fn test_totals_match_engine() {
        let mut doc = Document::new(DocumentKind::Invoice, 1.0);
        let items = [vat19(2.0, 100.0), vat19(0.5, 7.25), vat19(3.0, 0.0)];
        for item in items {
            doc.add_line("Row", item).unwrap();
        }
        assert_eq!(doc.totals(), compute_document_totals(&items, 1.0));
    }

    #[test]
    fn test_credit_note_ledger_totals() {
        let mut doc = Document::new(DocumentKind::CreditNote, 1.0);
        doc.add_line("Returned goods", vat19(2.0, 100.0)).unwrap();

        assert_eq!(doc.totals().total_incl_tax, 239.0);
        let ledger = doc.ledger_totals();
        assert_eq!(ledger.total_excl_tax, -200.0);
        assert_eq!(ledger.total_tax, -38.0);
        assert_eq!(ledger.total_incl_tax, -239.0);
    }

    #[test]
    fn test_breakdown_follows_line_order() {
        let mut doc = Document::new(DocumentKind::Invoice, 0.0);
        let a = doc.add_line("A", vat19(1.0, 100.0)).unwrap();
        let b = doc
            .add_line("B", LineItem::new(2.0, 5.0, TaxRate::zero()))
            .unwrap();

        let rows = doc.breakdown();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, a);
        assert_eq!(rows[0].amounts.total_incl_tax, 119.0);
        assert_eq!(rows[1].id, b);
        assert_eq!(rows[1].amounts.tax, 0.0);
    }

    #[test]
    fn test_from_settings_uses_stamp_duty() {
        let settings = InvoicingSettings::default();
        let doc = Document::from_settings(DocumentKind::Invoice, &settings);
        assert_eq!(doc.fixed_surcharge(), settings.fixed_surcharge);
    }

    #[test]
    fn test_serde_skips_cache() {
        let mut doc = Document::new(DocumentKind::Invoice, 1.0);
        doc.add_line("A", vat19(1.0, 10.0)).unwrap();
        let _ = doc.totals();

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("totalsCache").is_none());
        assert_eq!(json["kind"], "invoice");

        let back: Document = serde_json::from_value(json).unwrap();
        assert!(!back.has_cached_totals());
        assert_eq!(back.totals(), doc.totals());
    }

    fn stored(lines: Vec<serde_json::Value>, surcharge: f64) -> serde_json::Value {
        serde_json::json!({
            "kind": "invoice",
            "lines": lines,
            "fixedSurcharge": surcharge,
            "createdAt": "2024-01-01T00:00:00Z"
        })
    }

    fn stored_line(id: &str, designation: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "designation": designation,
            "item": {"quantity": 1.0, "unitPriceExclTax": 10.0, "taxRate": 19.0}
        })
    }

    #[test]
    fn test_deserialize_rejects_broken_documents() {
        let too_many = (0..MAX_DOCUMENT_LINES + 1)
            .map(|i| stored_line(&i.to_string(), "Item"))
            .collect();
        let err = serde_json::from_value::<Document>(stored(too_many, 1.0)).unwrap_err();
        assert!(err.to_string().contains("more than 500 lines"));

        let blank = vec![stored_line("a", "Ok"), stored_line("b", "   ")];
        let err = serde_json::from_value::<Document>(stored(blank, 1.0)).unwrap_err();
        assert!(err.to_string().contains("Line 1: designation is required"));

        let err = serde_json::from_value::<Document>(stored(vec![], -3.0)).unwrap_err();
        assert!(err.to_string().contains("fixedSurcharge must not be negative"));

        let duplicate = vec![stored_line("a", "One"), stored_line("a", "Two")];
        let err = serde_json::from_value::<Document>(stored(duplicate, 1.0)).unwrap_err();
        assert!(err.to_string().contains("Duplicate line id: a"));
    }

    #[test]
    fn test_deserialize_accepts_valid_document() {
        let mut doc: Document =
            serde_json::from_value(stored(vec![stored_line("a", "  Audit ")], 1.0)).unwrap();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.lines()[0].designation, "Audit");
        assert!((doc.totals().total_incl_tax - 12.9).abs() < 1e-9);
        assert!(doc.update_line("a", vat19(2.0, 10.0)).is_ok());
    }
}
