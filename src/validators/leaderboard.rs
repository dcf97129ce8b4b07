//! Lifetime rewards leaderboard
//!
//! Only validators running exactly one BLS key are eligible. The rest of the
//! listing is sorted by lifetime reward, descending, and the top entries are
//! rendered as a bar chart.

use crate::error::StatsError;
use crate::render::{BarChart, BarValue, ChartRenderer};
use crate::rpc_core::{ChainClient, ValidatorRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

pub const LEADERBOARD_SIZE: usize = 20;
pub const LABEL_MAX_CHARS: usize = 50;

const LEADERBOARD_TITLE: &str = "Open Staking Validator Leaderboard - Lifetime Rewards";

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub label: String,
    pub address: String,
    pub lifetime_rewards: Decimal,
}

#[derive(Debug, Clone)]
pub struct LeaderboardReport {
    /// Validators with exactly one BLS key
    pub eligible: usize,
    pub entries: Vec<LeaderboardEntry>,
    pub chart_path: PathBuf,
}

/// Soft breaks after `.` and around `-` for long names, then cap the length
pub fn format_label(name: &str) -> String {
    let name = if name.chars().count() >= 10 {
        name.replace('.', ". ").replace('-', " - ")
    } else {
        name.to_string()
    };
    truncate(&name, LABEL_MAX_CHARS)
}

pub fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// Eligible validators, highest lifetime reward first, capped at `limit`
pub fn rank(records: Vec<ValidatorRecord>, limit: usize) -> Vec<LeaderboardEntry> {
    let mut eligible: Vec<ValidatorRecord> = records
        .into_iter()
        .filter(|r| r.bls_public_keys.len() == 1)
        .collect();

    eligible.sort_by(|a, b| b.lifetime_rewards.cmp(&a.lifetime_rewards));

    eligible
        .into_iter()
        .take(limit)
        .map(|r| LeaderboardEntry {
            label: format_label(&r.name),
            address: r.address,
            lifetime_rewards: r.lifetime_rewards,
        })
        .collect()
}

pub fn leaderboard_chart(network: &str, entries: &[LeaderboardEntry]) -> BarChart {
    BarChart {
        file_name: format!("validators/{}-leaderboard", network.to_lowercase()),
        title: LEADERBOARD_TITLE.to_string(),
        y_label: "Lifetime Rewards".to_string(),
        bars: entries
            .iter()
            .map(|e| BarValue {
                label: e.label.clone(),
                value: e.lifetime_rewards.to_f64().unwrap_or_default(),
            })
            .collect(),
    }
}

pub struct Leaderboard {
    client: Arc<dyn ChainClient>,
    renderer: Arc<dyn ChartRenderer>,
    network: String,
}

impl Leaderboard {
    pub fn new(
        client: Arc<dyn ChainClient>,
        renderer: Arc<dyn ChartRenderer>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            client,
            renderer,
            network: network.into(),
        }
    }

    pub async fn run(&self) -> Result<LeaderboardReport, StatsError> {
        log::info!("🏆 Generating validator leaderboard for {}", self.network);

        let listing = self.client.all_validators().await?;
        let eligible = listing.iter().filter(|r| r.bls_public_keys.len() == 1).count();
        log::info!("   ├─ Validators: {}", listing.len());
        log::info!("   └─ Eligible (1 BLS key): {}", eligible);

        let entries = rank(listing, LEADERBOARD_SIZE);
        for (position, entry) in entries.iter().enumerate() {
            log::debug!("   {}. {} - {}", position + 1, entry.label, entry.lifetime_rewards);
        }

        let chart_path = self.renderer.render_bar_chart(&leaderboard_chart(&self.network, &entries))?;
        log::info!("✅ Leaderboard written to {}", chart_path.display());

        Ok(LeaderboardReport {
            eligible,
            entries,
            chart_path,
        })
    }
}
