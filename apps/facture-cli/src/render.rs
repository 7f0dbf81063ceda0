//! Presentation: rounding and text layout.
//!
//! This is the only place amounts are rounded. Everything coming out of
//! `facture-core` is unrounded.

use serde::Serialize;

use facture_core::document::DocumentLineBreakdown;
use facture_core::{Document, DocumentKind, DocumentTotals, InvoicingSettings, TaxInclusiveSplit};

/// Formats an amount with the configured number of decimals and currency.
pub fn format_amount(amount: f64, settings: &InvoicingSettings) -> String {
    let decimals = settings.display_decimals as usize;
    let mut text = format!("{:.*}", decimals, amount);
    // "-0.000" after rounding a tiny negative
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }
    format!("{} {}", text, settings.currency_code)
}

/// JSON view of a computed document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub kind: DocumentKind,
    pub lines: Vec<DocumentLineBreakdown>,
    pub totals: DocumentTotals,
    pub ledger_totals: DocumentTotals,
}

impl DocumentReport {
    pub fn new(document: &Document) -> Self {
        DocumentReport {
            kind: document.kind(),
            lines: document.breakdown(),
            totals: document.totals(),
            ledger_totals: document.ledger_totals(),
        }
    }
}

/// Text table of rows followed by the totals block.
pub fn document_text(document: &Document, settings: &InvoicingSettings) -> String {
    let mut out = String::new();

    let title = match document.kind() {
        DocumentKind::Invoice => "INVOICE",
        DocumentKind::CreditNote => "CREDIT NOTE",
    };
    out.push_str(title);
    out.push('\n');

    for (line, row) in document.lines().iter().zip(document.breakdown()) {
        out.push_str(&format!(
            "  {:<30} {:>10} x {:>16} @ {:>6}  HT {:>18}  TVA {:>16}  TTC {:>18}\n",
            row.designation,
            line.item.quantity,
            format_amount(line.item.unit_price_excl_tax, settings),
            line.item.tax_rate.to_string(),
            format_amount(row.amounts.total_excl_tax, settings),
            format_amount(row.amounts.tax, settings),
            format_amount(row.amounts.total_incl_tax, settings),
        ));
    }

    out.push_str(&totals_text(&document.totals(), settings));

    // Lines are entered positive; the ledger sign only shows here.
    if document.kind() == DocumentKind::CreditNote {
        out.push_str(&format!(
            "Posted TTC    {:>20}\n",
            format_amount(document.ledger_totals().total_incl_tax, settings)
        ));
    }
    out
}

/// The totals block alone.
pub fn totals_text(totals: &DocumentTotals, settings: &InvoicingSettings) -> String {
    format!(
        "Total HT      {:>20}\nTotal TVA     {:>20}\nStamp duty    {:>20}\nTotal TTC     {:>20}\n",
        format_amount(totals.total_excl_tax, settings),
        format_amount(totals.total_tax, settings),
        format_amount(totals.fixed_surcharge, settings),
        format_amount(totals.total_incl_tax, settings),
    )
}

/// The reverse VAT split.
pub fn split_text(split: &TaxInclusiveSplit, settings: &InvoicingSettings) -> String {
    format!(
        "TTC           {:>20}\nRate          {:>20}\nHT            {:>20}\nTVA           {:>20}\n",
        format_amount(split.amount_incl_tax, settings),
        split.rate.to_string(),
        format_amount(split.amount_excl_tax, settings),
        format_amount(split.tax_amount, settings),
    )
}
