//! In-memory chain client and recording renderer shared by integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use shardstats::collector_core::{BoundedCollector, ConcurrencyLimit};
use shardstats::render::{BarChart, ChartRenderer, ContinuousChart, CsvExporter, RenderError, TimeSeriesChart};
use shardstats::rpc_core::{BlockInfo, ChainClient, RpcError, ValidatorRecord};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

fn jitter(max_ms: u64) -> u64 {
    if max_ms == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=max_ms)
}

pub fn collector(limit: usize) -> BoundedCollector {
    BoundedCollector::new(ConcurrencyLimit::new(limit).unwrap())
}

#[derive(Default)]
pub struct MockChain {
    pub heads: HashMap<u32, u64>,
    /// Transaction count per (shard, block); unknown blocks report `block % 7`
    pub tx_counts: HashMap<(u32, u64), u64>,
    pub failing_blocks: HashSet<(u32, u64)>,
    pub validators: Vec<ValidatorRecord>,
    /// Addresses without an entry fail their balance lookup
    pub balances: HashMap<String, Decimal>,
    /// Blocks without an entry fail their info lookup
    pub block_times: HashMap<u64, DateTime<Utc>>,
    pub max_latency_ms: u64,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = jitter(self.max_latency_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn current_block_head(&self, shard: u32) -> Result<u64, RpcError> {
        self.heads.get(&shard).copied().ok_or(RpcError::UnknownShard(shard))
    }

    async fn transaction_count_at_block(&self, shard: u32, block_number: u64) -> Result<u64, RpcError> {
        self.simulate_latency().await;

        if self.failing_blocks.contains(&(shard, block_number)) {
            return Err(RpcError::Transport(format!("block {} unavailable", block_number)));
        }

        Ok(self
            .tx_counts
            .get(&(shard, block_number))
            .copied()
            .unwrap_or(block_number % 7))
    }

    async fn all_validators(&self) -> Result<Vec<ValidatorRecord>, RpcError> {
        Ok(self.validators.clone())
    }

    async fn total_balance(&self, address: &str) -> Result<Decimal, RpcError> {
        self.simulate_latency().await;
        self.balances
            .get(address)
            .copied()
            .ok_or_else(|| RpcError::Rpc {
                code: -32000,
                message: format!("no balance for {}", address),
            })
    }

    async fn block_info(&self, block_number: u64) -> Result<BlockInfo, RpcError> {
        self.simulate_latency().await;
        self.block_times
            .get(&block_number)
            .map(|timestamp| BlockInfo {
                block_number,
                timestamp: *timestamp,
            })
            .ok_or_else(|| RpcError::Decode(format!("block {} not found", block_number)))
    }
}

/// Captures every chart and CSV handed over instead of writing files
#[derive(Default)]
pub struct RecordingRenderer {
    pub continuous: Mutex<Vec<ContinuousChart>>,
    pub time_series: Mutex<Vec<TimeSeriesChart>>,
    pub bars: Mutex<Vec<BarChart>>,
    pub csv: Mutex<Vec<(String, Vec<Vec<String>>)>>,
}

impl RecordingRenderer {
    pub fn continuous_charts(&self) -> Vec<ContinuousChart> {
        self.continuous.lock().unwrap().clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render_continuous(&self, chart: &ContinuousChart) -> Result<PathBuf, RenderError> {
        self.continuous.lock().unwrap().push(chart.clone());
        Ok(PathBuf::from(&chart.file_name))
    }

    fn render_time_series(&self, chart: &TimeSeriesChart) -> Result<PathBuf, RenderError> {
        self.time_series.lock().unwrap().push(chart.clone());
        Ok(PathBuf::from(&chart.file_name))
    }

    fn render_bar_chart(&self, chart: &BarChart) -> Result<PathBuf, RenderError> {
        self.bars.lock().unwrap().push(chart.clone());
        Ok(PathBuf::from(&chart.file_name))
    }
}

impl CsvExporter for RecordingRenderer {
    fn write_csv(&self, file_name: &str, rows: &[Vec<String>]) -> Result<PathBuf, RenderError> {
        self.csv.lock().unwrap().push((file_name.to_string(), rows.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

pub fn validator(name: &str, bls_keys: usize, reward: i64) -> ValidatorRecord {
    ValidatorRecord {
        name: name.to_string(),
        address: format!("one1{}", name.to_lowercase()),
        identity: name.to_lowercase(),
        bls_public_keys: (0..bls_keys).map(|k| format!("{}-bls-{}", name, k)).collect(),
        lifetime_rewards: Decimal::from(reward),
        ..Default::default()
    }
}
