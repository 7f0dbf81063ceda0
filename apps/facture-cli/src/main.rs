//! # facture
//!
//! Command-line front-end for the invoicing engine.
//!
//! ```text
//! facture totals --input invoice.json     # per-row and document totals
//! facture totals --input - --json         # read stdin, print JSON
//! facture split --amount 119 --rate 19    # TTC → HT / TVA
//! facture settings                        # effective configuration
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize logging (stderr, `RUST_LOG`, default INFO)
//! 2. Load settings from `FACTURE_*` environment variables
//! 3. Run the subcommand

mod config;
mod error;
mod input;
mod render;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Read};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use facture_core::split_tax_inclusive_amount;
use facture_core::validation::validate_split_request;
use facture_core::InvoicingSettings;

use crate::error::CliError;
use crate::input::DocumentInput;
use crate::render::DocumentReport;

#[derive(Parser, Debug)]
#[command(name = "facture", version, about = "Invoice totals and VAT calculations")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute per-row amounts and document totals
    Totals {
        /// Input file, `-` for stdin
        #[arg(short = 'i', long = "input", default_value = "-")]
        input: String,
    },

    /// Split a tax-inclusive amount into HT and TVA
    Split {
        /// Tax-inclusive amount
        #[arg(short = 'a', long = "amount", allow_hyphen_values = true)]
        amount: String,

        /// VAT rate in percent (defaults to the configured rate)
        #[arg(short = 'r', long = "rate")]
        rate: Option<String>,
    },

    /// Print the effective invoicing settings
    Settings,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            warn!(error = %err, "Command failed");
            if json {
                match serde_json::to_string_pretty(&err.report()) {
                    Ok(report) => eprintln!("{}", report),
                    Err(_) => eprintln!("error: {}", err),
                }
            } else {
                eprintln!("error: {}", err);
            }
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(use_ansi(&io::stderr()))
        .with_target(false)
        .init();
}

/// Colour only when the log stream is a terminal.
fn use_ansi(stream: &impl IsTerminal) -> bool {
    stream.is_terminal()
}

fn run(cli: Cli) -> Result<String, CliError> {
    let settings = config::load()?;
    debug!(?settings, "Settings loaded");

    match cli.command {
        Command::Totals { input } => totals(&input, &settings, cli.json),
        Command::Split { amount, rate } => split(&amount, rate.as_deref(), &settings, cli.json),
        Command::Settings => Ok(format!("{}\n", serde_json::to_string_pretty(&settings)?)),
    }
}

fn totals(input: &str, settings: &InvoicingSettings, json: bool) -> Result<String, CliError> {
    let raw = read_input(input)?;
    let payload: DocumentInput = serde_json::from_str(&raw)?;
    let document = payload.into_document(settings)?;

    info!(
        lines = document.line_count(),
        total_incl_tax = document.totals().total_incl_tax,
        "Totals computed"
    );

    if json {
        Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&DocumentReport::new(&document))?
        ))
    } else {
        Ok(render::document_text(&document, settings))
    }
}

fn split(
    amount: &str,
    rate: Option<&str>,
    settings: &InvoicingSettings,
    json: bool,
) -> Result<String, CliError> {
    let rate = match rate {
        Some(r) => Value::String(r.to_string()),
        None => {
            info!(rate = %settings.default_tax_rate, "No rate given, using configured default");
            Value::from(settings.default_tax_rate.percent())
        }
    };
    let amount = Value::String(amount.to_string());

    let (amount, rate) = validate_split_request(Some(&amount), Some(&rate))?;
    let result = split_tax_inclusive_amount(amount, rate);

    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&result)?))
    } else {
        Ok(render::split_text(&result, settings))
    }
}

fn read_input(input: &str) -> Result<String, CliError> {
    let mut reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(BufReader::new(File::open(input)?))
    };

    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    Ok(raw)
}
