//! # Domain Types
//!
//! Strongly-typed records for the invoicing arithmetic.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │ DocumentTotals  │   │TaxInclusiveSplit│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  quantity       │   │  totalExclTax   │   │  amountInclTax  │       │
//! │  │  unitPriceExcl  │──►│  totalTax       │   │  amountExclTax  │       │
//! │  │  taxRate        │   │  fixedSurcharge │   │  taxAmount      │       │
//! │  └─────────────────┘   │  totalInclTax   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    TaxRate      │   │  DocumentKind   │                              │
//! │  │  percent (f64)  │   │  Invoice        │                              │
//! │  │  19.0 = 19%     │   │  CreditNote     │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are plain `f64`. The engine never rounds; rounding to the
//! currency's display precision happens at presentation time.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Tax Rate
// =============================================================================

/// VAT rate expressed as a percentage.
///
/// `TaxRate::from_percent(19.0)` is 19%. Serializes as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(f64);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percent(percent: f64) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> f64 {
        self.0
    }

    /// Returns `1 + rate/100`, the factor between HT and TTC.
    ///
    /// Always `>= 1` for non-negative rates.
    #[inline]
    pub fn inclusive_factor(&self) -> f64 {
        1.0 + self.0 / 100.0
    }

    /// Zero tax rate (exempt lines).
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0.0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of an invoice or credit note.
///
/// Only the three inputs are stored. HT, TVA and TTC for the row are derived
/// on demand so they can never drift from the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Number of units. Fractional quantities (kg, hours) are allowed.
    pub quantity: f64,

    /// Price of one unit, tax-exclusive.
    pub unit_price_excl_tax: f64,

    /// VAT rate applied to this row.
    pub tax_rate: TaxRate,
}

impl LineItem {
    /// Creates a line item. No validation happens here; see
    /// [`crate::validation::validate_line_item`] for the boundary checks.
    #[inline]
    pub const fn new(quantity: f64, unit_price_excl_tax: f64, tax_rate: TaxRate) -> Self {
        LineItem {
            quantity,
            unit_price_excl_tax,
            tax_rate,
        }
    }

    /// `quantity × unit price`, tax-exclusive.
    #[inline]
    pub fn line_total_excl_tax(&self) -> f64 {
        self.quantity * self.unit_price_excl_tax
    }

    /// VAT carried by this row: `line_total_excl_tax × rate / 100`.
    #[inline]
    pub fn line_tax(&self) -> f64 {
        self.line_total_excl_tax() * self.tax_rate.percent() / 100.0
    }

    /// Row total including VAT.
    #[inline]
    pub fn line_total_incl_tax(&self) -> f64 {
        self.line_total_excl_tax() + self.line_tax()
    }

    /// Per-row HT / TVA / TTC view, as rendered in the line table.
    pub fn breakdown(&self) -> LineBreakdown {
        let total_excl_tax = self.line_total_excl_tax();
        let tax = self.line_tax();
        LineBreakdown {
            total_excl_tax,
            tax,
            total_incl_tax: total_excl_tax + tax,
        }
    }
}

/// Derived amounts for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub total_excl_tax: f64,
    pub tax: f64,
    pub total_incl_tax: f64,
}

// =============================================================================
// Document Totals
// =============================================================================

/// Aggregate amounts for a whole document.
///
/// ## Invariant
/// `total_incl_tax == total_excl_tax + total_tax + fixed_surcharge`.
/// The surcharge is counted once per document, never per line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    /// Sum of all row HT amounts.
    pub total_excl_tax: f64,
    /// Sum of all row VAT amounts.
    pub total_tax: f64,
    /// Flat stamp duty.
    pub fixed_surcharge: f64,
    /// Grand total.
    pub total_incl_tax: f64,
}

impl DocumentTotals {
    /// Multiplies every component by `factor`.
    ///
    /// Used to post a credit note as a reversal (`factor = -1`). The
    /// additive invariant is preserved because each component is scaled.
    pub fn scaled(&self, factor: f64) -> Self {
        DocumentTotals {
            total_excl_tax: self.total_excl_tax * factor,
            total_tax: self.total_tax * factor,
            fixed_surcharge: self.fixed_surcharge * factor,
            total_incl_tax: self.total_incl_tax * factor,
        }
    }
}

// =============================================================================
// Tax-Inclusive Split
// =============================================================================

/// Result of extracting HT and TVA from a TTC amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxInclusiveSplit {
    pub amount_incl_tax: f64,
    pub rate: TaxRate,
    pub amount_excl_tax: f64,
    pub tax_amount: f64,
}

// =============================================================================
// Document Kind
// =============================================================================

/// The kind of document a set of lines belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Sales invoice.
    #[default]
    Invoice,
    /// Credit note ("avoir"): reverses all or part of a prior sale.
    CreditNote,
}

impl DocumentKind {
    /// `1.0` for invoices, `-1.0` for credit notes.
    ///
    /// Lines are always entered with positive amounts; the sign is applied
    /// only when the document is posted to a ledger.
    #[inline]
    pub const fn sign(&self) -> f64 {
        match self {
            DocumentKind::Invoice => 1.0,
            DocumentKind::CreditNote => -1.0,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
