//! CLI module for the BizDash client
//!
//! Read commands go through the cached coordinator; write commands
//! (`upload`, `quick-*`) always hit the API.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::dashboard::endpoints::{DEFAULT_DAYS, DEFAULT_PRODUCT_LIMIT};
use crate::domain::DataKind;

pub use commands::run;

/// BizDash - small-business analytics from the command line
#[derive(Parser)]
#[command(name = "bizdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API base URL (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log level filter (overrides configuration)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show headline KPIs
    Kpis(DaysArgs),

    /// Show the daily revenue trend
    RevenueTrend(DaysArgs),

    /// Show top products by revenue
    Products {
        #[arg(long, default_value_t = DEFAULT_PRODUCT_LIMIT)]
        limit: u32,
    },

    /// Show customer segmentation
    Customers,

    /// Load KPIs, revenue trend, top products and customer analytics together
    Overview {
        #[arg(long, default_value_t = DEFAULT_DAYS)]
        days: u32,
        #[arg(long, default_value_t = DEFAULT_PRODUCT_LIMIT)]
        limit: u32,
    },

    /// Import a CSV file (sales, customers or expenses)
    Upload {
        kind: DataKind,
        file: PathBuf,
    },

    /// Record a single sale
    QuickSale {
        #[arg(long)]
        product: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Record a single customer
    QuickCustomer {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
    },

    /// Record a single expense
    QuickExpense {
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        category: Option<String>,
    },

    /// Download the CSV template for an import type
    Template {
        kind: DataKind,
        /// Write to this file instead of stdout; a directory gets `<kind>_template.csv`
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct DaysArgs {
    /// Number of days to analyze
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    pub days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overview_help_lists_every_section() {
        use clap::CommandFactory;
        let command = Cli::command();
        let about = command
            .find_subcommand("overview")
            .and_then(|overview| overview.get_about())
            .unwrap()
            .to_string();

        assert!(about.contains("KPIs"));
        assert!(about.contains("revenue trend"));
        assert!(about.contains("top products"));
        assert!(about.contains("customer analytics"));
    }

    #[test]
    fn test_parse_kpis_default_days() {
        let cli = Cli::try_parse_from(["bizdash", "kpis"]).unwrap();
        match cli.command {
            Command::Kpis(args) => assert_eq!(args.days, DEFAULT_DAYS),
            _ => panic!("expected kpis"),
        }
    }

    #[test]
    fn test_parse_upload_kind() {
        let cli = Cli::try_parse_from(["bizdash", "upload", "expenses", "march.csv"]).unwrap();
        match cli.command {
            Command::Upload { kind, file } => {
                assert_eq!(kind, DataKind::Expenses);
                assert_eq!(file, PathBuf::from("march.csv"));
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["bizdash", "template", "invoices"]).is_err());
    }

    #[test]
    fn test_parse_quick_sale() {
        let cli = Cli::try_parse_from([
            "bizdash",
            "--base-url",
            "http://localhost:9000/api/v1",
            "quick-sale",
            "--product",
            "Widget A",
            "--amount",
            "29.99",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000/api/v1"));
        match cli.command {
            Command::QuickSale { product, amount, .. } => {
                assert_eq!(product, "Widget A");
                assert_eq!(amount, 29.99);
            }
            _ => panic!("expected quick-sale"),
        }
    }
}
