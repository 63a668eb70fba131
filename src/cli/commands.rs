//! Command handlers
//!
//! Every handler prints pretty JSON (or CSV for `template`) to stdout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::future::join_all;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::{Cli, Command};
use crate::config::AppConfig;
use crate::domain::{DataKind, QuickCustomer, QuickExpense, QuickSale, RequestStatus};
use crate::infrastructure::dashboard::DashboardApi;
use crate::infrastructure::logging;

/// Loads configuration, installs logging and dispatches the command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    logging::init_logging(&config.logging);

    let api = crate::create_dashboard_api(&config)?;

    match cli.command {
        Command::Kpis(args) => print_json(&api.get_kpis(args.days).await?),
        Command::RevenueTrend(args) => print_json(&api.get_revenue_trend(args.days).await?),
        Command::Products { limit } => print_json(&api.get_product_performance(limit).await?),
        Command::Customers => print_json(&api.get_customer_analytics().await?),
        Command::Overview { days, limit } => overview(&api, days, limit).await,
        Command::Upload { kind, file } => upload(&api, kind, &file).await,
        Command::QuickSale {
            product,
            amount,
            customer,
            category,
        } => {
            let mut sale = QuickSale::new(product, amount);
            if let Some(customer) = customer {
                sale = sale.with_customer(customer);
            }
            if let Some(category) = category {
                sale = sale.with_category(category);
            }
            print_json(&api.quick_sale(sale).await?)
        }
        Command::QuickCustomer { id, name, email } => {
            let mut customer = QuickCustomer::new(id, name);
            if let Some(email) = email {
                customer = customer.with_email(email);
            }
            print_json(&api.quick_customer(customer).await?)
        }
        Command::QuickExpense {
            description,
            amount,
            category,
        } => {
            let mut expense = QuickExpense::new(description, amount);
            if let Some(category) = category {
                expense = expense.with_category(category);
            }
            print_json(&api.quick_expense(expense).await?)
        }
        Command::Template { kind, output } => {
            let csv = api.csv_template(kind).await?.to_csv();
            match output {
                Some(output) => {
                    let path = template_destination(kind, &output);
                    tokio::fs::write(&path, csv)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(kind = %kind, path = %path.display(), "Template written");
                    Ok(())
                }
                None => {
                    print!("{}", csv);
                    Ok(())
                }
            }
        }
    }
}

/// Loads the main dashboard sections concurrently through their consumers
///
/// A failing section is reported inline instead of failing the command.
async fn overview(api: &DashboardApi, days: u32, limit: u32) -> anyhow::Result<()> {
    let sections = [
        ("kpis", api.kpis(days)),
        ("revenue_trend", api.revenue_trend(days)),
        ("top_products", api.product_performance(limit)),
        ("customers", api.customer_analytics()),
    ];

    let states = join_all(sections.iter().map(|(_, consumer)| consumer.settled())).await;

    let mut report = serde_json::Map::new();
    for ((name, _), state) in sections.iter().zip(states) {
        let section = match state.status {
            RequestStatus::Success => json!({
                "status": state.status.to_string(),
                "data": state.data.as_deref(),
            }),
            _ => json!({
                "status": state.status.to_string(),
                "error": state.error_message,
            }),
        };
        report.insert(name.to_string(), section);
    }

    print_json(&report)
}

async fn upload(api: &DashboardApi, kind: DataKind, file: &Path) -> anyhow::Result<()> {
    let result = api.upload_csv_file(kind, file).await?;

    if result.has_errors() {
        for error in &result.errors {
            tracing::warn!(kind = %kind, "Import row error: {}", error);
        }
    }

    print_json(&result)
}

/// A directory destination gets the kind's default template file name
fn template_destination(kind: DataKind, output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(kind.template_file_name())
    } else {
        output.to_path_buf()
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
