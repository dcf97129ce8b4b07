//! Sharded chain statistics
//!
//! Fans out many independent RPC lookups (per-block transaction counts,
//! per-validator balances, per-block timestamps), collects them under a
//! bounded in-flight limit and hands ordered datasets to chart and CSV
//! renderers.
//!
//! ```text
//! args + env ─► config ─► collector_core (range, fan-out) ─► tps / validators
//!                                ▲                                  │
//!                          rpc_core::ChainClient                    ▼
//!                                                     render (charts, CSV)
//! ```

pub mod args;
pub mod collector_core;
pub mod config;
pub mod error;
pub mod render;
pub mod rpc_core;
pub mod tps;
pub mod validators;

pub use error::StatsError;
