//! JSON-RPC 2.0 client for Harmony-style sharded nodes
//!
//! One endpoint per shard, a single `reqwest::Client` shared by every call.
//! The client timeout is the only bound on a hung lookup.
//!
//! Methods used:
//! - `hmyv2_blockNumber`
//! - `hmyv2_getBlockTransactionCountByNumber`
//! - `hmyv2_getAllValidatorInformation` (paged, beacon chain)
//! - `hmyv2_getBalance` (every shard, summed)
//! - `hmyv2_getBlockByNumber` (beacon chain)
//! - `hmyv2_getShardingStructure` (endpoint discovery from a single node)

use super::client::{ChainClient, RpcError};
use super::types::{parse_atto, parse_timestamp, parse_u64, BlockInfo, Delegation, ValidatorRecord};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const BEACON_SHARD: u32 = 0;

/// Hard stop for validator paging in case a node never returns an empty page
const MAX_VALIDATOR_PAGES: u32 = 1_000;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct WireShardEndpoint {
    #[serde(rename = "shardID")]
    shard_id: u32,
    http: String,
}

#[derive(Debug, Deserialize)]
struct WireDelegation {
    #[serde(rename = "delegator-address")]
    delegator_address: String,
    #[serde(default)]
    amount: Value,
}

#[derive(Debug, Deserialize)]
struct WireValidator {
    address: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    identity: String,
    #[serde(default)]
    website: String,
    #[serde(rename = "bls-public-keys", default)]
    bls_public_keys: Vec<String>,
    #[serde(rename = "creation-height", default)]
    creation_height: Value,
    #[serde(default)]
    delegations: Vec<WireDelegation>,
}

#[derive(Debug, Deserialize)]
struct WireLifetime {
    #[serde(rename = "reward-accumulated", default)]
    reward_accumulated: Value,
}

#[derive(Debug, Deserialize)]
struct WireValidatorInformation {
    validator: WireValidator,
    #[serde(rename = "currently-in-committee", default)]
    currently_in_committee: bool,
    #[serde(rename = "total-delegation", default)]
    total_delegation: Value,
    #[serde(default)]
    lifetime: Option<WireLifetime>,
}

impl WireValidatorInformation {
    fn into_record(self) -> Result<ValidatorRecord, RpcError> {
        let delegations = self
            .validator
            .delegations
            .into_iter()
            .map(|d| {
                Ok(Delegation {
                    delegator_address: d.delegator_address,
                    amount: parse_atto(&d.amount)?,
                })
            })
            .collect::<Result<Vec<_>, RpcError>>()?;

        let creation_height = match &self.validator.creation_height {
            Value::Null => -1,
            value => parse_u64(value).map(|h| h as i64).unwrap_or(-1),
        };

        let lifetime_rewards = match &self.lifetime {
            Some(lifetime) => parse_atto(&lifetime.reward_accumulated)?,
            None => Decimal::ZERO,
        };

        Ok(ValidatorRecord {
            name: self.validator.name,
            address: self.validator.address,
            identity: self.validator.identity,
            website: self.validator.website,
            bls_public_keys: self.validator.bls_public_keys,
            delegations,
            total_delegation: parse_atto(&self.total_delegation)?,
            lifetime_rewards,
            currently_in_committee: self.currently_in_committee,
            creation_height,
        })
    }
}

pub struct HarmonyRpcClient {
    http: reqwest::Client,
    nodes: Vec<String>,
    next_id: AtomicU64,
}

impl HarmonyRpcClient {
    pub fn new(nodes: Vec<String>, timeout_secs: u64) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            nodes,
            next_id: AtomicU64::new(1),
        })
    }

    /// Build a client from one node's view of the sharding structure
    pub async fn discover(node: &str, timeout_secs: u64) -> Result<Self, RpcError> {
        let mut client = Self::new(vec![node.to_string()], timeout_secs)?;
        client.nodes = client.sharding_structure().await?;
        Ok(client)
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// HTTP endpoint per shard, ordered by shard id
    pub async fn sharding_structure(&self) -> Result<Vec<String>, RpcError> {
        let mut shards: Vec<WireShardEndpoint> = self
            .call(BEACON_SHARD, "hmyv2_getShardingStructure", json!([]))
            .await?;
        shards.sort_by_key(|s| s.shard_id);

        if shards.is_empty() {
            return Err(RpcError::Decode("sharding structure lists no shards".to_string()));
        }
        // Shard ids index `nodes`, so a gap would misroute every later shard
        for (expected, shard) in shards.iter().enumerate() {
            if shard.shard_id != expected as u32 {
                return Err(RpcError::Decode(format!("sharding structure has no shard {}", expected)));
            }
        }

        log::info!("🔎 Discovered {} shard endpoint(s)", shards.len());
        Ok(shards.into_iter().map(|s| s.http).collect())
    }

    fn node(&self, shard: u32) -> Result<&str, RpcError> {
        self.nodes
            .get(shard as usize)
            .map(|s| s.as_str())
            .ok_or(RpcError::UnknownShard(shard))
    }

    async fn call_raw(&self, shard: u32, method: &str, params: Value) -> Result<Value, RpcError> {
        let node = self.node(shard)?;
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        log::debug!("→ {} shard={} node={}", method, shard, node);

        let response = self.http.post(node).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(RpcError::Transport(format!("{} returned HTTP {}", node, response.status())));
        }

        let body: RpcResponse = response.json().await?;

        if let Some(err) = body.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result
            .ok_or_else(|| RpcError::Decode(format!("{} returned neither result nor error", method)))
    }

    async fn call<T>(&self, shard: u32, method: &str, params: Value) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
    {
        let value = self.call_raw(shard, method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl ChainClient for HarmonyRpcClient {
    async fn current_block_head(&self, shard: u32) -> Result<u64, RpcError> {
        let value = self.call_raw(shard, "hmyv2_blockNumber", json!([])).await?;
        parse_u64(&value)
    }

    async fn transaction_count_at_block(&self, shard: u32, block_number: u64) -> Result<u64, RpcError> {
        let value = self
            .call_raw(shard, "hmyv2_getBlockTransactionCountByNumber", json!([block_number]))
            .await?;
        parse_u64(&value)
    }

    async fn all_validators(&self) -> Result<Vec<ValidatorRecord>, RpcError> {
        let mut records = Vec::new();

        for page in 0..MAX_VALIDATOR_PAGES {
            let batch: Vec<WireValidatorInformation> = self
                .call(BEACON_SHARD, "hmyv2_getAllValidatorInformation", json!([page]))
                .await?;

            if batch.is_empty() {
                break;
            }

            log::debug!("   ├─ validator page {}: {} records", page, batch.len());

            for info in batch {
                records.push(info.into_record()?);
            }
        }

        Ok(records)
    }

    async fn total_balance(&self, address: &str) -> Result<Decimal, RpcError> {
        let mut total = Decimal::ZERO;

        for shard in 0..self.nodes.len() as u32 {
            let value = self.call_raw(shard, "hmyv2_getBalance", json!([address])).await?;
            total += parse_atto(&value)?;
        }

        Ok(total)
    }

    async fn block_info(&self, block_number: u64) -> Result<BlockInfo, RpcError> {
        let value = self
            .call_raw(
                BEACON_SHARD,
                "hmyv2_getBlockByNumber",
                json!([block_number, { "fullTx": false, "inclTx": false }]),
            )
            .await?;

        let timestamp = value
            .get("timestamp")
            .ok_or_else(|| RpcError::Decode(format!("block {} has no timestamp", block_number)))?;

        Ok(BlockInfo {
            block_number,
            timestamp: parse_timestamp(timestamp)?,
        })
    }
}
