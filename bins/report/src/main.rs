//! Splitbook balance report
//!
//! Loads a ledger snapshot, computes every group's balances and settlements,
//! and prints them as JSON on stdout. Logs go to stderr.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use splitbook_core::insight::{MonthlyContext, YearMonth, build_monthly_context};
use splitbook_core::ledger::{BalanceService, GroupStatement, SettlementView};
use splitbook_shared::config::{InsightConfig, LoggingConfig};
use splitbook_shared::{AppConfig, AppError};

mod snapshot;

use snapshot::SnapshotStore;

#[derive(Debug, Serialize)]
struct Report {
    groups: Vec<GroupReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insight: Option<MonthlyContext>,
}

#[derive(Debug, Serialize)]
struct GroupReport {
    name: Option<String>,
    #[serde(flatten)]
    statement: GroupStatement,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let store = Arc::new(SnapshotStore::load(&config.snapshot.path).await?);
    info!(
        path = %config.snapshot.path.display(),
        groups = store.groups().len(),
        "Snapshot loaded"
    );

    let report = build_report(&store, config.insight.as_ref()).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn build_report(
    store: &Arc<SnapshotStore>,
    insight: Option<&InsightConfig>,
) -> anyhow::Result<Report> {
    let balances = BalanceService::new(Arc::clone(store));

    let mut groups = Vec::with_capacity(store.groups().len());
    for (group_id, name) in store.groups() {
        let statement = balances
            .group_statement(*group_id)
            .await
            .map_err(AppError::from)
            .with_context(|| format!("failed to report on group {group_id}"))?;
        groups.push(GroupReport {
            name: name.clone(),
            statement,
        });
    }

    let insight = match insight {
        Some(request) => Some(monthly_context(store, request, &groups)?),
        None => None,
    };

    Ok(Report { groups, insight })
}

fn monthly_context(
    store: &SnapshotStore,
    request: &InsightConfig,
    groups: &[GroupReport],
) -> anyhow::Result<MonthlyContext> {
    let month: YearMonth = request.month.parse().map_err(AppError::from)?;
    let settlements: Vec<SettlementView> = groups
        .iter()
        .flat_map(|g| g.statement.settlements.iter().cloned())
        .collect();
    let expenses = store.expenses()?;
    let budgets = store.budgets_for(request.member, month);

    info!(member = %request.member, %month, "Building monthly context");
    Ok(build_monthly_context(
        request.member,
        month,
        &expenses,
        &budgets,
        &settlements,
    ))
}
