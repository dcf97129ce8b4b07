//! Per-Shard TPS Orchestrator
//!
//! For each target shard:
//! 1. Fetch the chain head (failure aborts this shard only)
//! 2. Resolve the block range against it
//! 3. Collect transaction counts for every block, K at a time
//! 4. Keep successful lookups, sorted by block number
//! 5. Hand the X/Y series to the chart renderer
//!
//! A failed block lookup drops that point from the series and nothing more.

use super::shards::ShardSelection;
use super::BlockResult;
use crate::collector_core::{BlockRange, BoundedCollector, RangeSpec};
use crate::error::StatsError;
use crate::render::{ChartRenderer, ContinuousChart};
use crate::rpc_core::{ChainClient, RpcError};
use std::path::PathBuf;
use std::sync::Arc;

/// Finished analysis of one shard
#[derive(Debug, Clone)]
pub struct ShardReport {
    pub shard_id: u32,
    pub range: BlockRange,
    /// Block lookups issued
    pub submitted: usize,
    /// Successful results, ascending by block number
    pub series: Vec<BlockResult>,
    pub chart_path: PathBuf,
}

impl ShardReport {
    pub fn failed(&self) -> usize {
        self.submitted - self.series.len()
    }

    pub fn peak_tps(&self) -> f64 {
        self.series.iter().map(|r| r.tps).fold(0.0, f64::max)
    }
}

pub struct TpsAnalyzer {
    client: Arc<dyn ChainClient>,
    renderer: Arc<dyn ChartRenderer>,
    collector: BoundedCollector,
    network: String,
    block_time_secs: u64,
}

impl TpsAnalyzer {
    pub fn new(
        client: Arc<dyn ChainClient>,
        renderer: Arc<dyn ChartRenderer>,
        collector: BoundedCollector,
        network: impl Into<String>,
        block_time_secs: u64,
    ) -> Self {
        Self {
            client,
            renderer,
            collector,
            network: network.into(),
            block_time_secs,
        }
    }

    /// Analyse every selected shard concurrently
    ///
    /// Returns one outcome per shard, ascending by shard id.
    pub async fn run(
        self: &Arc<Self>,
        shards: &ShardSelection,
        range: RangeSpec,
    ) -> Vec<(u32, Result<ShardReport, StatsError>)> {
        let mut handles = Vec::new();

        for shard in shards.targets() {
            let analyzer = Arc::clone(self);
            let handle = tokio::spawn(async move { analyzer.analyze_shard(shard, range).await });
            handles.push((shard, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (shard, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => Err(StatsError::Rpc(RpcError::from(join_error))),
            };

            if let Err(e) = &outcome {
                log::error!("❌ Shard {} analysis failed: {}", shard, e);
            }
            outcomes.push((shard, outcome));
        }

        outcomes
    }

    pub async fn analyze_shard(&self, shard: u32, range: RangeSpec) -> Result<ShardReport, StatsError> {
        let latest = self.client.current_block_head(shard).await?;
        let range = range.resolve(latest)?;

        log::info!("🔍 Shard {}: blocks {} - {} (head {})", shard, range.from, range.to, latest);
        log::info!("   ├─ Lookups: {}", range.len());
        log::info!("   └─ Concurrency limit: {}", self.collector.limit().get());

        let results = self.collect_blocks(shard, range).await;
        let submitted = results.len();

        let mut series: Vec<BlockResult> = results.into_iter().filter(|r| r.successful).collect();
        series.sort_by_key(|r| r.block_number);

        let chart = series_chart(&self.network, shard, range, &series);
        let chart_path = self.renderer.render_continuous(&chart)?;

        let report = ShardReport {
            shard_id: shard,
            range,
            submitted,
            series,
            chart_path,
        };

        log::info!("✅ Shard {} complete", shard);
        log::info!("   ├─ Successful: {}/{}", report.series.len(), report.submitted);
        log::info!("   ├─ Peak TPS: {:.2}", report.peak_tps());
        log::info!("   └─ Chart: {}", report.chart_path.display());

        Ok(report)
    }

    async fn collect_blocks(&self, shard: u32, range: BlockRange) -> Vec<BlockResult> {
        let client = Arc::clone(&self.client);
        let block_time_secs = self.block_time_secs;

        let collected = self
            .collector
            .collect(range.blocks().collect(), move |block| {
                let client = Arc::clone(&client);
                async move { client.transaction_count_at_block(shard, block).await }
            })
            .await;

        collected
            .into_iter()
            .map(|c| match c.outcome {
                Ok(tx_count) => {
                    log::debug!("   ├─ shard {} block {}: {} txs", shard, c.item, tx_count);
                    BlockResult::success(shard, c.item, tx_count, block_time_secs)
                }
                Err(e) => {
                    log::warn!("⚠️  Shard {} block {} lookup failed: {}", shard, c.item, e);
                    BlockResult::failure(shard, c.item)
                }
            })
            .collect()
    }
}

/// Chart input for an ordered series of successful results
pub fn series_chart(network: &str, shard: u32, range: BlockRange, series: &[BlockResult]) -> ContinuousChart {
    ContinuousChart {
        file_name: format!("shard-{}-block-{}-to-{}", shard, range.from, range.to),
        series_title: "Transactions Per Second".to_string(),
        x_label: "Block #".to_string(),
        y_label: "Transactions Per Second".to_string(),
        x_values: series.iter().map(|r| r.block_number as f64).collect(),
        y_values: series.iter().map(|r| r.tps).collect(),
        details: vec![
            "Harmony TX/s Report".to_string(),
            format!("Network: {}", network),
            format!("Shard: {}", shard),
            format!("Blocks: {} - {}", range.from, range.to),
        ],
    }
}
