//! plotgrid CLI
//!
//! Shows the claimed grid and builds wallet links for new claims.
//!
//! Usage:
//!   plotgrid grid [--json]
//!   plotgrid claim --x <col> --y <row> --color <token>
//!
//! Pass `--fixture <file>` to read records from a JSON file instead of the
//! ledger.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use plotgrid_core::{
    build_claim_submission, ClaimSink, Coordinate, GridReconciler, GridSnapshot, MemorySource,
    ReconcileConfig, Reconciliation, GRID_SIZE,
};
use plotgrid_rpc::{RpcClient, RpcConfig, WalletLinkSink};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "plotgrid", version, about = "View and claim cells on the plot grid")]
struct Cli {
    /// Ledger API base URL
    #[arg(long, env = "PLOTGRID_API_URL", global = true)]
    api_url: Option<String>,

    /// Wallet base URL for transfer links
    #[arg(long, env = "PLOTGRID_WALLET_URL", global = true)]
    wallet_url: Option<String>,

    /// Read records from a JSON fixture instead of the ledger
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Accept records whose x or y is 0
    #[arg(long, global = true)]
    allow_zero: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile and print the grid
    Grid {
        /// Print the snapshot and stats as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a wallet link claiming one cell
    Claim {
        /// Column
        #[arg(long)]
        x: usize,
        /// Row
        #[arg(long)]
        y: usize,
        /// Color token, e.g. "#112233"
        #[arg(long)]
        color: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "plotgrid_cli=info,plotgrid_core=info,plotgrid_rpc=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = RpcConfig::from_lookup(|key| match key {
        "PLOTGRID_API_URL" => cli.api_url.clone(),
        "PLOTGRID_WALLET_URL" => cli.wallet_url.clone(),
        _ => std::env::var(key).ok(),
    })?;

    let report = reconcile(&cli, &config).await?;

    match &cli.command {
        Command::Grid { json } => {
            if *json {
                let out = serde_json::json!({
                    "snapshot": report.snapshot,
                    "stats": report.stats,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render(&report.snapshot));
                eprintln!(
                    "{} references, {} applied, {} superseded, {} skipped",
                    report.stats.references,
                    report.stats.applied,
                    report.stats.superseded,
                    report.stats.skipped_total()
                );
            }
        }
        Command::Claim { x, y, color } => {
            let target = Coordinate::new(*x, *y).ok_or_else(|| {
                anyhow!("({x}, {y}) is outside the {GRID_SIZE}x{GRID_SIZE} grid")
            })?;
            let existing = report.snapshot.get(target);
            if let Some(claim) = existing {
                println!("Current: {} (quantity {})", claim.color, claim.quantity);
            }

            let Some(submission) = build_claim_submission(target, existing, color) else {
                bail!("color must not be empty");
            };

            let link = WalletLinkSink::new(config.wallet_url.clone()).submit(&submission)?;
            println!("Claim {} with quantity {}:", target, submission.quantity);
            println!("{link}");
        }
    }

    Ok(())
}

async fn reconcile(cli: &Cli, config: &RpcConfig) -> anyhow::Result<Reconciliation> {
    let reconciler = GridReconciler::new(ReconcileConfig {
        reject_zero_coordinates: !cli.allow_zero,
        resolve_timeout: config.resolve_timeout,
        ..Default::default()
    });

    let report = match &cli.fixture {
        Some(path) => {
            let source = MemorySource::load(path)
                .with_context(|| format!("loading fixture {}", path.display()))?;
            reconciler.reconcile_with_report(&source).await?
        }
        None => {
            tracing::info!("Fetching grid from {}", config.api_url);
            let client = RpcClient::new(config)?;
            reconciler.reconcile_with_report(&client).await?
        }
    };
    Ok(report)
}

/// One text line per row, `#` for a claimed cell, then the claims.
fn render(grid: &GridSnapshot) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        out.extend(row.iter().map(|cell| if cell.is_some() { '#' } else { '.' }));
        out.push('\n');
    }
    for claim in grid.claims() {
        out.push_str(&format!(
            "{} {} quantity={}\n",
            claim.coordinate, claim.color, claim.quantity
        ));
    }
    out
}
