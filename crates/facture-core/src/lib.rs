//! # facture-core: Pure Invoicing Arithmetic
//!
//! This crate holds the monetary logic behind the invoicing screens: line
//! totals, VAT aggregation, the flat stamp duty, and the reverse VAT split
//! used by the settings preview. Everything here is a pure function of its
//! inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Facture Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Front-end / facture-cli (callers)                    │   │
//! │  │   Invoice form ──► Credit note form ──► Settings preview        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ untyped payloads                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ facture-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌──────────┐ ┌──────────┐ ┌─────────────────┐  │   │
//! │  │  │ validation │►│  types   │►│  money   │◄│    document     │  │   │
//! │  │  │ RawLineItem│ │ LineItem │ │  totals  │ │ memoized totals │  │   │
//! │  │  └────────────┘ └──────────┘ │  split   │ └─────────────────┘  │   │
//! │  │                              └──────────┘                       │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, TaxRate, DocumentTotals, ...)
//! - [`money`] - The computation engine
//! - [`validation`] - Boundary validation of loosely-typed payloads
//! - [`document`] - Editable document with memoized totals
//! - [`settings`] - Invoicing configuration
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use facture_core::money::compute_document_totals;
//! use facture_core::types::{LineItem, TaxRate};
//!
//! let lines = [LineItem::new(2.0, 100.0, TaxRate::from_percent(19.0))];
//! let totals = compute_document_totals(&lines, 1.0);
//!
//! assert_eq!(totals.total_excl_tax, 200.0);
//! assert_eq!(totals.total_tax, 38.0);
//! assert_eq!(totals.total_incl_tax, 239.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod money;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{Document, DocumentLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{compute_document_totals, split_tax_inclusive_amount};
pub use settings::InvoicingSettings;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat stamp duty added once per document unless configured otherwise.
pub const DEFAULT_FIXED_SURCHARGE: f64 = 1.0;

/// VAT rate pre-selected for new lines and used by the settings preview.
pub const DEFAULT_TAX_RATE_PERCENT: f64 = 19.0;

/// Decimal places shown for amounts (millimes).
pub const DEFAULT_DISPLAY_DECIMALS: u8 = 3;

/// Maximum number of lines on a single document.
pub const MAX_DOCUMENT_LINES: usize = 500;

/// Maximum quantity accepted for a single line at the boundary.
///
/// Guards against typos such as an extra zero or a pasted barcode.
pub const MAX_LINE_QUANTITY: f64 = 1_000_000.0;
