//! Remote chain client seam
//!
//! Everything the aggregation pipeline needs from the network goes through
//! [`ChainClient`]. The production implementation talks JSON-RPC over HTTP;
//! tests substitute an in-memory client.

pub mod client;
pub mod http_client;
pub mod types;

pub use client::{ChainClient, RpcError};
pub use http_client::HarmonyRpcClient;
pub use types::{BlockInfo, Delegation, ValidatorRecord};
