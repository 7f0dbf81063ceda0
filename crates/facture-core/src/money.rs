//! # Money Module
//!
//! The monetary computation engine: document totals and the reverse VAT
//! split.
//!
//! ## Forward and Reverse
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FORWARD (invoice / credit note lines)                                  │
//! │                                                                         │
//! │    qty × unit HT ──► row HT ──► row HT × rate/100 ──► row TVA           │
//! │                        │                                │               │
//! │                        ▼                                ▼               │
//! │                   Σ HT ─────────► + Σ TVA ───────► + stamp ──► TTC      │
//! │                                                                         │
//! │  REVERSE (settings preview)                                             │
//! │                                                                         │
//! │    TTC ──► TTC / (1 + rate/100) ──► HT ──► TTC − HT ──► TVA             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both functions are total: they never fail and never round. Non-finite
//! inputs propagate to non-finite outputs. Validation belongs to
//! [`crate::validation`], rounding to the presentation layer.

use crate::types::{DocumentTotals, LineItem, TaxInclusiveSplit, TaxRate};

/// Aggregates a sequence of lines and a flat surcharge into document totals.
///
/// Lines are summed in input order so results are reproducible across
/// platforms. The surcharge is added once, after the line sums.
///
/// ## Example
/// ```rust
/// use facture_core::money::compute_document_totals;
/// use facture_core::types::{LineItem, TaxRate};
///
/// let totals = compute_document_totals(&[], 1.0);
/// assert_eq!(totals.total_excl_tax, 0.0);
/// assert_eq!(totals.total_tax, 0.0);
/// assert_eq!(totals.total_incl_tax, 1.0);
///
/// let lines = [
///     LineItem::new(2.0, 100.0, TaxRate::from_percent(19.0)),
///     LineItem::new(1.0, 50.0, TaxRate::zero()),
/// ];
/// let totals = compute_document_totals(&lines, 1.0);
/// assert_eq!(totals.total_excl_tax, 250.0);
/// assert_eq!(totals.total_tax, 38.0);
/// assert_eq!(totals.total_incl_tax, 289.0);
/// ```
pub fn compute_document_totals(lines: &[LineItem], fixed_surcharge: f64) -> DocumentTotals {
    let (total_excl_tax, total_tax) = lines
        .iter()
        .fold((0.0_f64, 0.0_f64), |(excl, tax), line| {
            (excl + line.line_total_excl_tax(), tax + line.line_tax())
        });

    DocumentTotals {
        total_excl_tax,
        total_tax,
        fixed_surcharge,
        total_incl_tax: total_excl_tax + total_tax + fixed_surcharge,
    }
}

/// Splits a tax-inclusive amount into its HT and TVA parts.
///
/// `amount_excl_tax = amount_incl_tax / (1 + rate/100)` and
/// `tax_amount = amount_incl_tax - amount_excl_tax`. For a zero rate the
/// divisor is exactly `1.0`, so the HT amount equals the input and the tax
/// is exactly zero. Negative amounts are accepted (reversals).
///
/// ## Example
/// ```rust
/// use facture_core::money::split_tax_inclusive_amount;
/// use facture_core::types::TaxRate;
///
/// let split = split_tax_inclusive_amount(119.0, TaxRate::from_percent(19.0));
/// assert!((split.amount_excl_tax - 100.0).abs() < 1e-9);
/// assert!((split.tax_amount - 19.0).abs() < 1e-9);
///
/// let exempt = split_tax_inclusive_amount(42.5, TaxRate::zero());
/// assert_eq!(exempt.amount_excl_tax, 42.5);
/// assert_eq!(exempt.tax_amount, 0.0);
/// ```
pub fn split_tax_inclusive_amount(amount_incl_tax: f64, rate: TaxRate) -> TaxInclusiveSplit {
    let amount_excl_tax = amount_incl_tax / rate.inclusive_factor();

    TaxInclusiveSplit {
        amount_incl_tax,
        rate,
        amount_excl_tax,
        tax_amount: amount_incl_tax - amount_excl_tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
