//! TPS report per shard
//!
//! Usage:
//!   tps_stats [--network mainnet] [--shard all|<id>] [--from N] [--to N] [--count N]
//!             [--block-time 8] [--concurrency 100] [--timeout 60] [--nodes a,b,..|--node URL]
//!             [--export-path export] [--verbose]
//!
//! Writes one chart per shard to `<export-path>/charts/shard-<id>-block-<from>-to-<to>.json`.

use dotenv::dotenv;
use env_logger::{Builder, Target};
use log::{error, info};
use shardstats::args::ArgMap;
use shardstats::collector_core::BoundedCollector;
use shardstats::config::{RuntimeConfig, TpsConfig};
use shardstats::render::{ChartRenderer, JsonChartWriter};
use shardstats::rpc_core::{ChainClient, HarmonyRpcClient};
use shardstats::tps::TpsAnalyzer;
use std::sync::Arc;

const USAGE: &str = "Usage: tps_stats [--network <name>] [--shard all|<id>] [--from N] [--to N] [--count N] \
                     [--block-time SECS] [--concurrency N] [--timeout SECS] [--nodes URL,..|--node URL] \
                     [--export-path DIR] [--verbose]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = ArgMap::from_env_args();
    if args.is_set("help") {
        println!("{}", USAGE);
        return Ok(());
    }

    // Argument validation happens before the first remote call, except the
    // shard bound which needs the discovered shard count under --node
    let mut runtime = RuntimeConfig::from_env(&args)?;
    if runtime.network.discovery_node.is_none() {
        TpsConfig::from_args(&args, &runtime.network)?;
    }

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
    let tps = TpsConfig::from_args(&args, &runtime.network)?;

    info!("🚀 Harmony TX/s Report");
    info!("   ├─ Network: {}", runtime.network.name);
    info!("   ├─ Shards: {:?}", tps.shards.targets());
    info!("   ├─ Block time: {}s", tps.block_time_secs);
    info!("   ├─ Concurrency: {}", runtime.concurrency.get());
    info!("   ├─ Timeout: {}s", runtime.timeout_secs);
    info!("   └─ Export path: {}", runtime.export_path.display());

    let client: Arc<dyn ChainClient> = Arc::new(http);
    let renderer: Arc<dyn ChartRenderer> = Arc::new(JsonChartWriter::new(&runtime.export_path));

    let analyzer = Arc::new(TpsAnalyzer::new(
        client,
        renderer,
        BoundedCollector::new(runtime.concurrency),
        runtime.network.name.clone(),
        tps.block_time_secs,
    ));

    let outcomes = analyzer.run(&tps.shards, tps.range).await;
    let total = outcomes.len();
    let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();

    info!("📊 Summary");
    for (shard, outcome) in &outcomes {
        match outcome {
            Ok(report) => info!(
                "   ├─ Shard {}: {}/{} blocks, peak {:.2} TPS",
                shard,
                report.series.len(),
                report.submitted,
                report.peak_tps()
            ),
            Err(e) => info!("   ├─ Shard {}: failed ({})", shard, e),
        }
    }
    info!("   └─ {} of {} shard(s) succeeded", total - failed, total);

    if failed > 0 {
        error!("❌ {} shard(s) failed", failed);
        return Err(format!("{} of {} shard(s) failed", failed, total).into());
    }

    Ok(())
}
