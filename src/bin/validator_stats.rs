//! Validator reports
//!
//! Usage:
//!   validator_stats analyze [--elected] [--balances] [--filter.field identity|website]
//!                           [--filter.value V] [--filter.mode contains|equals] [--export csv]
//!   validator_stats leaderboard
//!   validator_stats daily
//!
//! Shared flags: --network, --nodes, --node, --concurrency, --timeout, --export-path, --verbose

use dotenv::dotenv;
use env_logger::{Builder, Target};
use log::{error, info};
use shardstats::args::ArgMap;
use shardstats::collector_core::BoundedCollector;
use shardstats::config::{ConfigError, RuntimeConfig, ValidatorConfig};
use shardstats::render::{ChartRenderer, CsvExporter, CsvFileWriter, JsonChartWriter};
use shardstats::rpc_core::{ChainClient, HarmonyRpcClient};
use shardstats::validators::{DailyCreations, Leaderboard, ValidatorAnalyzer, ValidatorEngine};
use shardstats::StatsError;
use std::sync::Arc;

const USAGE: &str = "Usage: validator_stats <analyze|leaderboard|daily> [--network <name>] \
                     [--elected] [--balances] [--filter.field <website|identity>] [--filter.value V] \
                     [--filter.mode <contains|equals>] \
                     [--export csv] [--concurrency N] [--timeout SECS] [--nodes URL,..|--node URL] \
                     [--export-path DIR] [--verbose]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Analyze,
    Leaderboard,
    Daily,
}

impl Command {
    fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(|s| s.to_lowercase()).as_deref() {
            Some("analyze") => Ok(Command::Analyze),
            Some("leaderboard") => Ok(Command::Leaderboard),
            Some("daily") => Ok(Command::Daily),
            Some(other) => Err(ConfigError::InvalidValue(format!("unknown command '{}'. {}", other, USAGE))),
            None => Err(ConfigError::MissingVariable(format!("command. {}", USAGE))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = ArgMap::from_env_args();
    if args.is_set("help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let command = Command::parse(args.positional().first().map(|s| s.as_str()))?;
    let mut runtime = RuntimeConfig::from_env(&args)?;
    let validator_config = ValidatorConfig::from_args(&args)?;

    // `rust_log` already folds in RUST_LOG and --verbose
    Builder::new()
        .parse_filters(&runtime.rust_log)
        .target(Target::Stderr)
        .init();

    let http = match runtime.network.discovery_node.clone() {
        Some(node) => HarmonyRpcClient::discover(&node, runtime.timeout_secs).await?,
        None => HarmonyRpcClient::new(runtime.network.nodes.clone(), runtime.timeout_secs)?,
    };
    runtime.network.nodes = http.nodes().to_vec();

    info!("🚀 Validator statistics: {:?}", command);
    info!("   ├─ Network: {}", runtime.network.name);
    info!("   ├─ Beacon node: {}", runtime.network.nodes.first().map(|s| s.as_str()).unwrap_or("-"));
    info!("   ├─ Concurrency: {}", runtime.concurrency.get());
    info!("   └─ Export path: {}", runtime.export_path.display());

    let client: Arc<dyn ChainClient> = Arc::new(http);
    let collector = BoundedCollector::new(runtime.concurrency);

    let outcome: Result<(), StatsError> = match command {
        Command::Analyze => {
            let exporter: Arc<dyn CsvExporter> = Arc::new(CsvFileWriter::new(&runtime.export_path));
            let analyzer = ValidatorAnalyzer::new(
                ValidatorEngine::new(client, collector),
                exporter,
                validator_config,
                runtime.export_format,
            );
            analyzer.run().await.map(|report| {
                info!("✅ Analyze complete");
                info!("   ├─ Checked: {}", report.checked);
                info!("   ├─ Matching: {}", report.matching());
                info!("   └─ Balance lookups failed: {}", report.balance_failures());
            })
        }
        Command::Leaderboard => {
            let renderer: Arc<dyn ChartRenderer> = Arc::new(JsonChartWriter::new(&runtime.export_path));
            Leaderboard::new(client, renderer, runtime.network.name.clone())
                .run()
                .await
                .map(|report| {
                    info!("✅ Leaderboard: {} of {} eligible shown", report.entries.len(), report.eligible)
                })
        }
        Command::Daily => {
            let renderer: Arc<dyn ChartRenderer> = Arc::new(JsonChartWriter::new(&runtime.export_path));
            DailyCreations::new(client, renderer, collector, runtime.network.name.clone())
                .run()
                .await
                .map(|report| {
                    let days = report.per_date.len();
                    info!("✅ Daily chart: {} validators over {} day(s)", report.total, days)
                })
        }
    };

    if let Err(e) = outcome {
        error!("❌ {:?} failed: {}", command, e);
        return Err(e.into());
    }

    Ok(())
}
