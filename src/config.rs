//! Runtime configuration from environment variables and command-line flags
//!
//! Precedence: command-line flag > environment variable > default.
//! Every value is validated here so that malformed input fails before any
//! remote call is issued.
//!
//! Environment variables:
//! - `STATS_NETWORK` (default: mainnet)
//! - `STATS_NODES` - comma-separated RPC endpoint per shard (default: derived from network)
//! - `STATS_NODE` - single node to discover shard endpoints from, used when `STATS_NODES` is unset
//! - `STATS_SHARD_COUNT` - shard count when endpoints are derived (default: 4)
//! - `STATS_TIMEOUT_SECS` (default: 60)
//! - `STATS_CONCURRENCY` (default: 100)
//! - `STATS_EXPORT_PATH` (default: export)
//! - `STATS_EXPORT_FORMAT` (default: none, supported: csv)
//! - `RUST_LOG` (default: info)

use crate::args::ArgMap;
use crate::collector_core::fanout::ConcurrencyLimit;
use crate::collector_core::range::RangeSpec;
use crate::tps::shards::ShardSelection;
use crate::validators::filter::{FilterCriteria, FilterField, FilterMode};
use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing configuration: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Result<Option<Self>, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "" => Ok(None),
            "csv" => Ok(Some(ExportFormat::Csv)),
            other => Err(ConfigError::InvalidValue(format!(
                "unsupported export format '{}' (supported: csv)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: String,
    /// RPC endpoint per shard, indexed by shard id
    pub nodes: Vec<String>,
    /// Node to query for the sharding structure; `nodes` stays empty until discovery runs
    pub discovery_node: Option<String>,
}

impl NetworkConfig {
    pub fn shard_count(&self) -> u32 {
        self.nodes.len() as u32
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub network: NetworkConfig,
    pub timeout_secs: u64,
    pub concurrency: ConcurrencyLimit,
    pub export_path: PathBuf,
    pub export_format: Option<ExportFormat>,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct TpsConfig {
    pub shards: ShardSelection,
    pub range: RangeSpec,
    pub block_time_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub filter: FilterCriteria,
    pub elected: bool,
    pub balances: bool,
}

/// Flag first, then environment variable
fn setting<E>(args: &ArgMap, flag: &str, var: &str, env_lookup: &E) -> Option<String>
where
    E: Fn(&str) -> Option<String>,
{
    args.get(flag)
        .map(|s| s.to_string())
        .or_else(|| env_lookup(var))
        .filter(|s| !s.trim().is_empty())
}

fn parse_setting<T, E>(args: &ArgMap, flag: &str, var: &str, env_lookup: &E) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    E: Fn(&str) -> Option<String>,
{
    match setting(args, flag, var, env_lookup) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(format!("{} has an invalid value: '{}'", flag, raw))),
        None => Ok(None),
    }
}

/// Normalise user-facing network aliases
pub fn normalized_network_name(raw: &str) -> Option<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "main" | "mainnet" => Some("mainnet"),
        "test" | "testnet" => Some("testnet"),
        "stress" | "stressnet" => Some("stressnet"),
        "dev" | "devnet" => Some("devnet"),
        "pangaea" | "pga" => Some("pangaea"),
        "local" | "localnet" => Some("localnet"),
        _ => None,
    }
}

fn endpoint_prefix(network: &str) -> Option<&'static str> {
    match network {
        "mainnet" => Some("t"),
        "testnet" => Some("b"),
        "stressnet" => Some("stn"),
        "devnet" => Some("ps"),
        "pangaea" => Some("os"),
        _ => None,
    }
}

/// Public API endpoints for a known network
pub fn derived_nodes(network: &str, shard_count: u32) -> Option<Vec<String>> {
    let prefix = endpoint_prefix(network)?;
    Some(
        (0..shard_count)
            .map(|shard| format!("https://api.s{}.{}.hmny.io", shard, prefix))
            .collect(),
    )
}

impl RuntimeConfig {
    pub fn from_env(args: &ArgMap) -> Result<Self, ConfigError> {
        Self::from_sources(args, |var| env::var(var).ok())
    }

    pub fn from_sources<E>(args: &ArgMap, env_lookup: E) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let raw_network = setting(args, "network", "STATS_NETWORK", &env_lookup)
            .unwrap_or_else(|| "mainnet".to_string());
        let name = normalized_network_name(&raw_network).ok_or_else(|| {
            ConfigError::InvalidValue(format!(
                "unknown network '{}'. Valid options: localnet, devnet, testnet, stressnet, pangaea \
                 or mainnet",
                raw_network
            ))
        })?;

        let explicit_nodes: Vec<String> = setting(args, "nodes", "STATS_NODES", &env_lookup)
            .map(|s| {
                s.split(',')
                    .map(|node| node.trim().to_string())
                    .filter(|node| !node.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let discovery_node = setting(args, "node", "STATS_NODE", &env_lookup)
            .map(|node| node.trim().to_string())
            .filter(|node| !node.is_empty());

        let (nodes, discovery_node) = if !explicit_nodes.is_empty() {
            (explicit_nodes, None)
        } else if let Some(node) = discovery_node {
            (Vec::new(), Some(node))
        } else {
            let shard_count =
                parse_setting::<u32, _>(args, "shard-count", "STATS_SHARD_COUNT", &env_lookup)?.unwrap_or(4);
            if shard_count == 0 {
                return Err(ConfigError::InvalidValue("shard count must be at least 1".to_string()));
            }
            let nodes = derived_nodes(name, shard_count).ok_or_else(|| {
                ConfigError::MissingVariable(format!("STATS_NODES or STATS_NODE (required for {})", name))
            })?;
            (nodes, None)
        };

        for node in nodes.iter().chain(discovery_node.iter()) {
            if !node.starts_with("http://") && !node.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "node '{}' must start with http:// or https://",
                    node
                )));
            }
        }

        let timeout_secs = parse_setting::<u64, _>(args, "timeout", "STATS_TIMEOUT_SECS", &env_lookup)?
            .unwrap_or(60);

        let concurrency = parse_setting::<usize, _>(args, "concurrency", "STATS_CONCURRENCY", &env_lookup)?
            .unwrap_or(100);
        let concurrency = ConcurrencyLimit::new(concurrency)?;

        let export_path: PathBuf = setting(args, "export-path", "STATS_EXPORT_PATH", &env_lookup)
            .unwrap_or_else(|| "export".to_string())
            .into();

        let export_format = match setting(args, "export", "STATS_EXPORT_FORMAT", &env_lookup) {
            Some(raw) => ExportFormat::parse(&raw)?,
            None => None,
        };

        let rust_log = if args.is_set("verbose") {
            "debug".to_string()
        } else {
            env_lookup("RUST_LOG").unwrap_or_else(|| "info".to_string())
        };

        Ok(Self {
            network: NetworkConfig {
                name: name.to_string(),
                nodes,
                discovery_node,
            },
            timeout_secs,
            concurrency,
            export_path,
            export_format,
            rust_log,
        })
    }
}

impl TpsConfig {
    pub fn from_args(args: &ArgMap, network: &NetworkConfig) -> Result<Self, ConfigError> {
        let shards = ShardSelection::parse(args.get("shard").unwrap_or("all"), network.shard_count())?;

        let range = RangeSpec {
            from: args.get_parsed::<u64>("from")?,
            to: args.get_parsed::<u64>("to")?,
            count: args.get_parsed::<u64>("count")?,
        };

        let block_time_secs = args.get_parsed::<u64>("block-time")?.unwrap_or(8);
        if block_time_secs == 0 {
            return Err(ConfigError::InvalidValue("--block-time must be greater than 0".to_string()));
        }

        Ok(Self {
            shards,
            range,
            block_time_secs,
        })
    }
}

impl ValidatorConfig {
    pub fn from_args(args: &ArgMap) -> Result<Self, ConfigError> {
        let field = FilterField::parse(args.get("filter.field").unwrap_or(""))?;
        let mode = FilterMode::parse(args.get("filter.mode").unwrap_or("contains"))?;
        let value = args.get("filter.value").unwrap_or("").to_string();

        Ok(Self {
            filter: FilterCriteria { field, value, mode },
            elected: args.is_set("elected"),
            balances: args.is_set("balances"),
        })
    }
}
