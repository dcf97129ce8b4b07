use super::types::{BlockInfo, ValidatorRecord};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Failure of a single remote call
///
/// `Clone` so a failed lookup can be stored on its result record.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    Transport(String),
    Rpc { code: i64, message: String },
    Decode(String),
    UnknownShard(u32),
    /// The lookup task itself died before reporting (panic or cancellation)
    TaskFailed(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RpcError::Decode(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RpcError {
    fn from(err: tokio::task::JoinError) -> Self {
        RpcError::TaskFailed(err.to_string())
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "Transport error: {}", msg),
            RpcError::Rpc { code, message } => write!(f, "RPC error {}: {}", code, message),
            RpcError::Decode(msg) => write!(f, "Decode error: {}", msg),
            RpcError::UnknownShard(shard) => write!(f, "No RPC endpoint configured for shard {}", shard),
            RpcError::TaskFailed(msg) => write!(f, "Lookup task failed: {}", msg),
        }
    }
}

impl std::error::Error for RpcError {}

/// Remote data source for block and validator statistics
///
/// Every call is independent; the caller decides how many run at once.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current chain head for a shard
    async fn current_block_head(&self, shard: u32) -> Result<u64, RpcError>;

    /// Number of transactions included in a block
    async fn transaction_count_at_block(&self, shard: u32, block_number: u64) -> Result<u64, RpcError>;

    /// Full validator listing from the beacon chain, in listing order
    async fn all_validators(&self) -> Result<Vec<ValidatorRecord>, RpcError>;

    /// Wallet balance summed across every shard
    async fn total_balance(&self, address: &str) -> Result<Decimal, RpcError>;

    /// Beacon chain block header info
    async fn block_info(&self, block_number: u64) -> Result<BlockInfo, RpcError>;
}
