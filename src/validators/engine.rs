//! Validator Aggregation Engine
//!
//! Stages over a base listing, each independently toggled:
//! 1. Elected filter - keep validators seated in committee
//! 2. Balance enrichment - one `total_balance` lookup per validator, K at a time
//! 3. Field filter - website / identity match
//!
//! Output keeps the listing order. A failed balance lookup marks the record
//! with its error; the record itself is never dropped.

use super::filter::FilterCriteria;
use super::ValidatorResult;
use crate::collector_core::BoundedCollector;
use crate::rpc_core::{ChainClient, RpcError, ValidatorRecord};
use std::sync::Arc;

pub struct ValidatorEngine {
    client: Arc<dyn ChainClient>,
    collector: BoundedCollector,
}

impl ValidatorEngine {
    pub fn new(client: Arc<dyn ChainClient>, collector: BoundedCollector) -> Self {
        Self { client, collector }
    }

    pub async fn listing(&self) -> Result<Vec<ValidatorRecord>, RpcError> {
        let records = self.client.all_validators().await?;
        log::info!("📋 Fetched {} validators", records.len());
        Ok(records)
    }

    pub fn elected_only(records: Vec<ValidatorRecord>) -> Vec<ValidatorRecord> {
        records.into_iter().filter(|r| r.currently_in_committee).collect()
    }

    /// Look up every validator's total wallet balance
    pub async fn enrich_balances(&self, records: Vec<ValidatorRecord>) -> Vec<ValidatorResult> {
        let items: Vec<(usize, String)> = records
            .iter()
            .enumerate()
            .map(|(index, r)| (index, r.address.clone()))
            .collect();

        log::info!("💰 Looking up {} wallet balances", items.len());

        let client = Arc::clone(&self.client);
        let collected = self
            .collector
            .collect(items, move |(_, address)| {
                let client = Arc::clone(&client);
                async move { client.total_balance(&address).await }
            })
            .await;

        let mut results: Vec<ValidatorResult> = records.into_iter().map(ValidatorResult::new).collect();
        let mut failed = 0usize;

        // Each index is written by exactly one collected entry
        for c in collected {
            let (index, address) = c.item;
            let Some(result) = results.get_mut(index) else {
                continue;
            };
            match c.outcome {
                Ok(balance) => {
                    log::debug!("   ├─ {}: {}", address, balance);
                    result.balance = Some(balance);
                }
                Err(e) => {
                    log::warn!("⚠️  Balance lookup failed for {}: {}", address, e);
                    result.error = Some(e);
                    failed += 1;
                }
            }
        }

        log::info!("   └─ Balances: {} ok, {} failed", results.len() - failed, failed);
        results
    }

    /// Run the enabled stages over a base listing
    pub async fn aggregate(
        &self,
        records: Vec<ValidatorRecord>,
        elected: bool,
        balances: bool,
        filter: &FilterCriteria,
    ) -> Vec<ValidatorResult> {
        let records = if elected {
            let elected_records = Self::elected_only(records);
            log::info!("   ├─ Elected: {}", elected_records.len());
            elected_records
        } else {
            records
        };

        let results = if balances {
            self.enrich_balances(records).await
        } else {
            records.into_iter().map(ValidatorResult::new).collect()
        };

        if !filter.is_active() {
            return results;
        }

        results.into_iter().filter(|r| filter.matches(&r.record)).collect()
    }
}
