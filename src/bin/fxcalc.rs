//! fxcalc CLI - evaluate expressions and convert currencies from the shell
//!
//! ## Example Usage
//!
//! ```bash
//! # Evaluate an arithmetic expression
//! fxcalc eval "(2+3)*4"
//!
//! # Convert 100 USD to JPY using the live feed
//! fxcalc convert 100 USD JPY
//!
//! # Show the current rate table without touching the network
//! fxcalc rates --offline
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use fxcalc::prelude::*;
use fxcalc::types::flag_for;

#[derive(Parser)]
#[command(name = "fxcalc", version, about = "Currency-conversion calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an arithmetic expression
    Eval {
        /// Expression built from digits, + - * / ( ) and decimal points
        expression: String,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: f64,
        from: String,
        to: String,
        /// Use the built-in fallback table instead of fetching the feed
        #[arg(long)]
        offline: bool,
    },
    /// Print the current rate table
    Rates {
        /// Use the built-in fallback table instead of fetching the feed
        #[arg(long)]
        offline: bool,
        /// Emit the table as JSON instead of a formatted listing
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Eval { expression } => {
            let value = evaluate(&sanitize(&expression))?;
            println!("{}", format_number(value));
        }
        Command::Convert {
            amount,
            from,
            to,
            offline,
        } => {
            let table = load_table(offline)?;
            let converted = table.convert(amount, &from, &to)?;
            println!(
                "{} {} = {} {}",
                format_number(amount),
                from.to_uppercase(),
                format_number(converted),
                to.to_uppercase()
            );
        }
        Command::Rates { offline, json } => {
            let table = load_table(offline)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }
            println!("1 unit in {BASE_CURRENCY} (fetched {})", table.fetched_at());
            for code in table.codes() {
                let flag = flag_for(&code).unwrap_or("  ");
                let rate = table.get(&code).unwrap_or_default();
                println!("{flag} {code:<5} {}", format_number(rate));
            }
        }
    }

    Ok(())
}

fn load_table(offline: bool) -> anyhow::Result<RateTable> {
    if offline {
        return Ok(fallback_table());
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let source = BotCsvSource::new()?;
    match runtime.block_on(source.fetch()) {
        Ok(table) => Ok(table),
        Err(e) => {
            log::warn!("rate fetch failed, using fallback table: {e}");
            Ok(fallback_table())
        }
    }
}
