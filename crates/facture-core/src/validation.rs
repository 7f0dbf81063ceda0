//! # Validation Module
//!
//! Turns loosely-typed payloads into the strongly-typed records the engine
//! works on.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form / backend payload                                       │
//! │  └── Anything goes: numbers, "12,5", "", null, missing keys            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── parse_number: Value ──► f64                                       │
//! │  ├── range checks per field                                            │
//! │  └── RawLineItem ──► LineItem                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: money (engine)                                               │
//! │  └── Never sees partially-populated or mistyped data                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unset Tax Rate
//! A missing or blank rate is rejected with [`ValidationError::Required`].
//! It is never read as 0%. Callers that want a default rate must supply it
//! explicitly.
//!
//! ## Usage
//! ```rust
//! use facture_core::validation::{validate_line_item, RawLineItem};
//! use serde_json::json;
//!
//! let raw: RawLineItem = serde_json::from_value(json!({
//!     "designation": "Consulting",
//!     "quantity": "2",
//!     "unitPriceExclTax": "100,000",
//!     "taxRatePercent": 19
//! })).unwrap();
//!
//! let line = validate_line_item(&raw).unwrap();
//! assert_eq!(line.line_total_excl_tax(), 200.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, ValidationError};
use crate::types::{LineItem, TaxRate};
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a line designation.
pub const MAX_DESIGNATION_LEN: usize = 200;

// =============================================================================
// Raw Payloads
// =============================================================================

/// A line item as it arrives from a form or the backend, before validation.
///
/// Numeric fields are kept as raw JSON so numeric strings and blanks can be
/// told apart from real numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit_price_excl_tax: Option<Value>,
    #[serde(default)]
    pub tax_rate_percent: Option<Value>,
}

// =============================================================================
// Number Parsing
// =============================================================================

/// Reads a JSON value as a finite `f64`.
///
/// ## Accepted
/// - JSON numbers
/// - Strings holding a number, surrounding whitespace ignored, with either
///   `.` or `,` as decimal separator (`"12,5"` is 12.5)
///
/// ## Rejected
/// - `null` and blank strings: `Required`
/// - Booleans, arrays, objects, non-numeric strings: `InvalidFormat`
/// - `"NaN"`, `"inf"` and similar: `NotFinite`
pub fn parse_number(field: &str, value: &Value) -> ValidationResult<f64> {
    let number = match value {
        Value::Null => return Err(required(field)),
        Value::Number(n) => n.as_f64().ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "number is not representable".to_string(),
        })?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(required(field));
            }
            if s.matches(',').count() > 1 || (s.contains(',') && s.contains('.')) {
                return Err(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: format!("'{}' is not a number", s),
                });
            }
            s.replace(',', ".")
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: format!("'{}' is not a number", s),
                })?
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "expected a number".to_string(),
            })
        }
    };

    if !number.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    Ok(number)
}

/// Like [`parse_number`], treating an absent key the same as `null`.
fn parse_required(field: &str, value: Option<&Value>) -> ValidationResult<f64> {
    match value {
        Some(v) => parse_number(field, v),
        None => Err(required(field)),
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

// =============================================================================
// Field Validators
// =============================================================================

fn ensure_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Finite and `>= 0`
/// - At most [`MAX_LINE_QUANTITY`]
///
/// ## Example
/// ```rust
/// use facture_core::validation::validate_quantity;
///
/// assert!(validate_quantity(0.0).is_ok());
/// assert!(validate_quantity(2.5).is_ok());
/// assert!(validate_quantity(-1.0).is_err());
/// ```
pub fn validate_quantity(qty: f64) -> ValidationResult<()> {
    ensure_non_negative("quantity", qty)?;

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0.0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tax-exclusive unit price. Zero is allowed (free items).
pub fn validate_unit_price(price: f64) -> ValidationResult<()> {
    ensure_non_negative("unitPriceExclTax", price)
}

/// Validates a VAT rate percentage.
///
/// ## Rules
/// - Between 0 and 100 inclusive
pub fn validate_tax_rate_percent(percent: f64) -> ValidationResult<()> {
    ensure_rate_in_range("taxRatePercent", percent)
}

/// Rate bounds check reported under a caller-chosen key.
pub(crate) fn ensure_rate_in_range(field: &str, percent: f64) -> ValidationResult<()> {
    ensure_finite(field, percent)?;

    if !(0.0..=100.0).contains(&percent) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates the per-document stamp duty.
pub fn validate_fixed_surcharge(amount: f64) -> ValidationResult<()> {
    ensure_non_negative("fixedSurcharge", amount)
}

/// Validates a line designation (product or service label).
///
/// ## Example
/// ```rust
/// use facture_core::validation::validate_designation;
///
/// assert!(validate_designation("Maintenance contract").is_ok());
/// assert!(validate_designation("   ").is_err());
/// ```
pub fn validate_designation(designation: &str) -> ValidationResult<()> {
    let designation = designation.trim();

    if designation.is_empty() {
        return Err(required("designation"));
    }

    if designation.chars().count() > MAX_DESIGNATION_LEN {
        return Err(ValidationError::TooLong {
            field: "designation".to_string(),
            max: MAX_DESIGNATION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a raw row and builds the typed [`LineItem`].
///
/// The designation is checked only when present; the engine does not need
/// it. [`crate::document::Document::add_line`] requires it.
pub fn validate_line_item(raw: &RawLineItem) -> ValidationResult<LineItem> {
    if let Some(designation) = &raw.designation {
        validate_designation(designation)?;
    }

    let quantity = parse_required("quantity", raw.quantity.as_ref())?;
    validate_quantity(quantity)?;

    let unit_price = parse_required("unitPriceExclTax", raw.unit_price_excl_tax.as_ref())?;
    validate_unit_price(unit_price)?;

    let rate = parse_required("taxRatePercent", raw.tax_rate_percent.as_ref())?;
    validate_tax_rate_percent(rate)?;

    Ok(LineItem::new(quantity, unit_price, TaxRate::from_percent(rate)))
}

/// Validates every row, stopping at the first bad one.
///
/// The error carries the zero-based row index so the form can flag it.
pub fn validate_line_items(raw: &[RawLineItem]) -> Result<Vec<LineItem>, CoreError> {
    raw.iter()
        .enumerate()
        .map(|(index, row)| {
            validate_line_item(row).map_err(|source| CoreError::InvalidLine { index, source })
        })
        .collect()
}

/// Validates the inputs of the settings page's TTC → HT/TVA preview.
///
/// Both the amount and the rate are required. The amount may be negative.
pub fn validate_split_request(
    amount_incl_tax: Option<&Value>,
    rate_percent: Option<&Value>,
) -> ValidationResult<(f64, TaxRate)> {
    let amount = parse_required("amountInclTax", amount_incl_tax)?;

    let rate = parse_required("taxRatePercent", rate_percent)?;
    validate_tax_rate_percent(rate)?;

    Ok((amount, TaxRate::from_percent(rate)))
}

// =============================================================================
// Unit Tests
// =============================================================================
