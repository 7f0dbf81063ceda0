//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to the
//! defaults in [`InvoicingSettings::default`].
//!
//! | Variable | Default |
//! |---|---|
//! | `FACTURE_FIXED_SURCHARGE` | `1.0` |
//! | `FACTURE_DEFAULT_TAX_RATE` | `19` |
//! | `FACTURE_DISPLAY_DECIMALS` | `3` |
//! | `FACTURE_CURRENCY` | `TND` |

use std::env;
use std::str::FromStr;

use facture_core::{InvoicingSettings, TaxRate, ValidationError};

pub const ENV_FIXED_SURCHARGE: &str = "FACTURE_FIXED_SURCHARGE";
pub const ENV_DEFAULT_TAX_RATE: &str = "FACTURE_DEFAULT_TAX_RATE";
pub const ENV_DISPLAY_DECIMALS: &str = "FACTURE_DISPLAY_DECIMALS";
pub const ENV_CURRENCY: &str = "FACTURE_CURRENCY";

/// Load settings from the process environment.
pub fn load() -> Result<InvoicingSettings, ConfigError> {
    load_from(|key| env::var(key).ok())
}

/// Load settings through an arbitrary lookup, so tests need not touch the
/// process environment.
pub fn load_from<F>(lookup: F) -> Result<InvoicingSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = InvoicingSettings::default();

    let settings = InvoicingSettings {
        fixed_surcharge: parse_or(&lookup, ENV_FIXED_SURCHARGE, defaults.fixed_surcharge)?,

        default_tax_rate: TaxRate::from_percent(parse_or(
            &lookup,
            ENV_DEFAULT_TAX_RATE,
            defaults.default_tax_rate.percent(),
        )?),

        display_decimals: parse_or(&lookup, ENV_DISPLAY_DECIMALS, defaults.display_decimals)?,

        currency_code: lookup(ENV_CURRENCY)
            .map(|v| v.trim().to_uppercase())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.currency_code),
    };

    settings.validate()?;

    Ok(settings)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        _ => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid settings: {0}")]
    Invalid(#[from] ValidationError),
}
