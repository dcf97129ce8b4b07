use crate::config::ConfigError;

/// Shards targeted by one TPS run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardSelection {
    All { shard_count: u32 },
    Single(u32),
}

impl ShardSelection {
    /// Accepts `all` or a shard id below `shard_count`
    pub fn parse(raw: &str, shard_count: u32) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("all") {
            return Ok(ShardSelection::All { shard_count });
        }

        let shard: u32 = raw.parse().map_err(|_| {
            ConfigError::InvalidValue(format!("--shard must be 'all' or a shard id, got '{}'", raw))
        })?;

        if shard >= shard_count {
            return Err(ConfigError::InvalidValue(format!(
                "shard {} does not exist (network has {} shards)",
                shard, shard_count
            )));
        }

        Ok(ShardSelection::Single(shard))
    }

    pub fn targets(&self) -> Vec<u32> {
        match self {
            ShardSelection::All { shard_count } => (0..*shard_count).collect(),
            ShardSelection::Single(shard) => vec![*shard],
        }
    }
}
