//! # Invoicing Settings
//!
//! The values behind the invoicing configuration page: stamp duty, default
//! VAT rate, and display precision. Loading them from somewhere is the
//! caller's concern; this module only defines and checks them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::split_tax_inclusive_amount;
use crate::types::{TaxInclusiveSplit, TaxRate};
use crate::validation::{ensure_rate_in_range, validate_fixed_surcharge, ValidationResult};
use crate::{DEFAULT_DISPLAY_DECIMALS, DEFAULT_FIXED_SURCHARGE, DEFAULT_TAX_RATE_PERCENT};

/// Largest supported number of display decimals.
pub const MAX_DISPLAY_DECIMALS: u8 = 6;

/// Invoicing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoicingSettings {
    /// Flat stamp duty added once per document.
    pub fixed_surcharge: f64,

    /// Rate pre-selected for new lines and used by the preview.
    pub default_tax_rate: TaxRate,

    /// Decimal places used when amounts are displayed.
    pub display_decimals: u8,

    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Default for InvoicingSettings {
    /// 1.000 TND stamp duty, 19% VAT, three decimals.
    fn default() -> Self {
        InvoicingSettings {
            fixed_surcharge: DEFAULT_FIXED_SURCHARGE,
            default_tax_rate: TaxRate::from_percent(DEFAULT_TAX_RATE_PERCENT),
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
            currency_code: "TND".to_string(),
        }
    }
}

impl InvoicingSettings {
    /// Checks every field.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_fixed_surcharge(self.fixed_surcharge)?;
        ensure_rate_in_range("defaultTaxRate", self.default_tax_rate.percent())?;

        if self.display_decimals > MAX_DISPLAY_DECIMALS {
            return Err(ValidationError::OutOfRange {
                field: "displayDecimals".to_string(),
                min: 0.0,
                max: MAX_DISPLAY_DECIMALS as f64,
            });
        }

        let code = self.currency_code.as_str();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidFormat {
                field: "currencyCode".to_string(),
                reason: "must be three uppercase letters".to_string(),
            });
        }

        Ok(())
    }

    /// TTC → HT/TVA preview shown next to the default rate.
    pub fn preview_split(&self, amount_incl_tax: f64) -> TaxInclusiveSplit {
        split_tax_inclusive_amount(amount_incl_tax, self.default_tax_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = InvoicingSettings::default();
        assert_eq!(settings.fixed_surcharge, 1.0);
        assert_eq!(settings.default_tax_rate.percent(), 19.0);
        assert_eq!(settings.display_decimals, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut settings = InvoicingSettings::default();
        settings.fixed_surcharge = -1.0;
        assert_eq!(settings.validate().unwrap_err().field(), "fixedSurcharge");

        let mut settings = InvoicingSettings::default();
        settings.default_tax_rate = TaxRate::from_percent(150.0);
        assert_eq!(settings.validate().unwrap_err().field(), "defaultTaxRate");

        let mut settings = InvoicingSettings::default();
        settings.display_decimals = 9;
        assert_eq!(settings.validate().unwrap_err().field(), "displayDecimals");

        let mut settings = InvoicingSettings::default();
        settings.currency_code = "tnd".to_string();
        assert_eq!(settings.validate().unwrap_err().field(), "currencyCode");
    }

    #[test]
    fn test_preview_split_uses_default_rate() {
        let split = InvoicingSettings::default().preview_split(119.0);
        assert!((split.amount_excl_tax - 100.0).abs() < 1e-9);
        assert!((split.tax_amount - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_settings_json_roundtrip_shape() {
        let json = serde_json::to_value(InvoicingSettings::default()).unwrap();
        assert_eq!(json["fixedSurcharge"], 1.0);
        assert_eq!(json["defaultTaxRate"], 19.0);
        assert_eq!(json["currencyCode"], "TND");
    }
}
