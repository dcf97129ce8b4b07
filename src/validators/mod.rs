//! Validator aggregation and reports
//!
//! ```text
//! all_validators() ─► elected stage ─► balance stage (BoundedCollector)
//!                                          │
//!                                          ▼
//!                               field filter ─► analyze CSV
//!
//! all_validators() ─► 1 BLS key ─► sort by reward ─► top 20 ─► bar chart
//!
//! all_validators() ─► count per creation block ─► block_info (BoundedCollector)
//!                                          ─► count per date ─► time series
//! ```

pub mod analyze;
pub mod daily;
pub mod engine;
pub mod export;
pub mod filter;
pub mod leaderboard;

pub use analyze::{AnalyzeReport, ValidatorAnalyzer};
pub use daily::{DailyCreations, DailyReport};
pub use engine::ValidatorEngine;
pub use filter::{FilterCriteria, FilterField, FilterMode};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardReport};

use crate::rpc_core::{RpcError, ValidatorRecord};
use rust_decimal::Decimal;

/// A validator listing entry, optionally enriched with its wallet balance
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorResult {
    pub record: ValidatorRecord,
    /// Set only when the balance lookup was requested and succeeded
    pub balance: Option<Decimal>,
    pub error: Option<RpcError>,
}

impl ValidatorResult {
    pub fn new(record: ValidatorRecord) -> Self {
        Self {
            record,
            balance: None,
            error: None,
        }
    }

    pub fn is_error_free(&self) -> bool {
        self.error.is_none()
    }
}
