//! Daily validator creation chart
//!
//! Counts validators per creation block, resolves each block's timestamp,
//! then buckets the counts per UTC date. Both maps keep first-insertion order.

use crate::collector_core::BoundedCollector;
use crate::error::StatsError;
use crate::render::{ChartRenderer, TimeSeriesChart};
use crate::rpc_core::{BlockInfo, ChainClient, ValidatorRecord};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DailyReport {
    pub per_date: IndexMap<NaiveDate, usize>,
    pub total: usize,
    /// Creation blocks whose timestamp lookup failed
    pub failed_blocks: usize,
    pub chart_path: PathBuf,
}

/// Validators created at each block, skipping unknown creation heights
pub fn count_per_block(records: &[ValidatorRecord]) -> IndexMap<u64, usize> {
    let mut counts = IndexMap::new();
    for record in records {
        if record.creation_height < 0 {
            continue;
        }
        *counts.entry(record.creation_height as u64).or_insert(0) += 1;
    }
    counts
}

/// `blocks` must already be sorted by block number
pub fn count_per_date(blocks: &[BlockInfo], per_block: &IndexMap<u64, usize>) -> IndexMap<NaiveDate, usize> {
    let mut counts = IndexMap::new();
    for block in blocks {
        let created = per_block.get(&block.block_number).copied().unwrap_or(0);
        *counts.entry(block.timestamp.date_naive()).or_insert(0) += created;
    }
    counts
}

pub fn daily_chart(network: &str, per_date: &IndexMap<NaiveDate, usize>, total: usize) -> TimeSeriesChart {
    TimeSeriesChart {
        file_name: format!("validators/{}-daily", network.to_lowercase()),
        series_title: "Validator Count".to_string(),
        x_label: "Date".to_string(),
        y_label: String::new(),
        dates: per_date.keys().copied().collect(),
        values: per_date.values().map(|&c| c as f64).collect(),
        details: vec![format!("Validators: {} total", total)],
    }
}

pub struct DailyCreations {
    client: Arc<dyn ChainClient>,
    renderer: Arc<dyn ChartRenderer>,
    collector: BoundedCollector,
    network: String,
}

impl DailyCreations {
    pub fn new(
        client: Arc<dyn ChainClient>,
        renderer: Arc<dyn ChartRenderer>,
        collector: BoundedCollector,
        network: impl Into<String>,
    ) -> Self {
        Self {
            client,
            renderer,
            collector,
            network: network.into(),
        }
    }

    pub async fn run(&self) -> Result<DailyReport, StatsError> {
        log::info!("📅 Generating daily validator chart for {}", self.network);

        let listing = self.client.all_validators().await?;
        let per_block = count_per_block(&listing);
        for (block, count) in &per_block {
            log::debug!("   ├─ block {}: {} created", block, count);
        }

        log::info!("   └─ Retrieving block information for {} block(s)", per_block.len());

        let blocks = self.block_infos(per_block.keys().copied().collect()).await;
        let failed_blocks = per_block.len() - blocks.len();

        let per_date = count_per_date(&blocks, &per_block);
        let total: usize = per_date.values().sum();
        for (date, count) in &per_date {
            log::debug!("   ├─ {}: {} created", date, count);
        }

        let chart_path = self.renderer.render_time_series(&daily_chart(&self.network, &per_date, total))?;

        log::info!("✅ Daily chart complete");
        log::info!("   ├─ Validators: {} total", total);
        log::info!("   ├─ Failed block lookups: {}", failed_blocks);
        log::info!("   └─ Chart: {}", chart_path.display());

        Ok(DailyReport {
            per_date,
            total,
            failed_blocks,
            chart_path,
        })
    }

    /// Successful lookups only, ascending by block number
    async fn block_infos(&self, block_numbers: Vec<u64>) -> Vec<BlockInfo> {
        let client = Arc::clone(&self.client);
        let collected = self
            .collector
            .collect(block_numbers, move |block| {
                let client = Arc::clone(&client);
                async move { client.block_info(block).await }
            })
            .await;

        let mut blocks: Vec<BlockInfo> = collected
            .into_iter()
            .filter_map(|c| match c.outcome {
                Ok(info) => Some(info),
                Err(e) => {
                    log::warn!("⚠️  Block {} lookup failed: {}", c.item, e);
                    None
                }
            })
            .collect();

        blocks.sort_by_key(|b| b.block_number);
        blocks
    }
}
