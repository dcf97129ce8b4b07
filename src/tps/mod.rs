//! Per-shard transactions-per-second analysis
//!
//! ```text
//! shard 0 ─┐
//! shard 1 ─┼─ head → BlockRange → BoundedCollector(tx count) → sort → chart
//! shard N ─┘
//! ```
//!
//! Shards run concurrently with no bound; blocks inside a shard are bounded
//! by the process concurrency limit.

pub mod analyzer;
pub mod shards;

pub use analyzer::{ShardReport, TpsAnalyzer};
pub use shards::ShardSelection;

/// Outcome of one block lookup
#[derive(Debug, Clone, PartialEq)]
pub struct BlockResult {
    pub shard_id: u32,
    pub block_number: u64,
    pub tx_count: u64,
    pub tps: f64,
    pub successful: bool,
}

impl BlockResult {
    pub fn success(shard_id: u32, block_number: u64, tx_count: u64, block_time_secs: u64) -> Self {
        Self {
            shard_id,
            block_number,
            tx_count,
            tps: transactions_per_second(tx_count, block_time_secs),
            successful: true,
        }
    }

    pub fn failure(shard_id: u32, block_number: u64) -> Self {
        Self {
            shard_id,
            block_number,
            tx_count: 0,
            tps: 0.0,
            successful: false,
        }
    }
}

/// `tx_count / block_time`, zero for empty blocks
pub fn transactions_per_second(tx_count: u64, block_time_secs: u64) -> f64 {
    if tx_count == 0 || block_time_secs == 0 {
        return 0.0;
    }
    tx_count as f64 / block_time_secs as f64
}
