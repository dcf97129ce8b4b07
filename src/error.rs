//! Crate-level error type for a single unit of work (one shard, one report)

use crate::collector_core::range::RangeError;
use crate::config::ConfigError;
use crate::render::RenderError;
use crate::rpc_core::RpcError;

#[derive(Debug)]
pub enum StatsError {
    Config(ConfigError),
    Range(RangeError),
    Rpc(RpcError),
    Render(RenderError),
}

impl From<ConfigError> for StatsError {
    fn from(err: ConfigError) -> Self {
        StatsError::Config(err)
    }
}

impl From<RangeError> for StatsError {
    fn from(err: RangeError) -> Self {
        StatsError::Range(err)
    }
}

impl From<RpcError> for StatsError {
    fn from(err: RpcError) -> Self {
        StatsError::Rpc(err)
    }
}

impl From<RenderError> for StatsError {
    fn from(err: RenderError) -> Self {
        StatsError::Render(err)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Config(e) => write!(f, "Configuration error: {}", e),
            StatsError::Range(e) => write!(f, "Range error: {}", e),
            StatsError::Rpc(e) => write!(f, "RPC error: {}", e),
            StatsError::Render(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for StatsError {}
