//! Minimal command-line flag map
//!
//! Accepts `--key value` pairs and bare `--flag` switches. Anything that does
//! not start with `--` and does not follow a key is kept as a positional
//! argument (e.g. the `analyze` in `validator_stats analyze`).
//!
//! Keys listed in [`SWITCHES`] never take the following token as a value, so
//! `--elected analyze` is a switch plus a positional. They still accept an
//! explicit `--elected=false`.

use crate::config::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

/// Flags that carry no value
pub const SWITCHES: [&str; 4] = ["elected", "balances", "verbose", "help"];

#[derive(Debug, Clone, Default)]
pub struct ArgMap {
    values: HashMap<String, String>,
    switches: Vec<String>,
    positional: Vec<String>,
}

impl ArgMap {
    /// Parse the current process arguments (program name skipped)
    pub fn from_env_args() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = ArgMap::default();
        let mut iter = args.into_iter().map(Into::into).peekable();

        while let Some(arg) = iter.next() {
            if let Some(key) = arg.strip_prefix("--") {
                if let Some((k, v)) = key.split_once('=') {
                    map.values.insert(k.to_string(), v.to_string());
                    continue;
                }

                if SWITCHES.contains(&key) {
                    map.switches.push(key.to_string());
                    continue;
                }

                // A following token that is not itself a flag is this key's value.
                // Negative numbers ("-5") are values, not flags.
                match iter.peek() {
                    Some(next) if !next.starts_with("--") => {
                        let value = iter.next().unwrap_or_default();
                        map.values.insert(key.to_string(), value);
                    }
                    _ => map.switches.push(key.to_string()),
                }
            } else {
                map.positional.push(arg);
            }
        }

        map
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Parse a flag value, surfacing malformed input instead of falling back
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue(format!("--{} has an invalid value: '{}'", key, raw))),
            None => Ok(None),
        }
    }

    /// `--flag` and `--flag=true` enable a switch
    pub fn is_set(&self, key: &str) -> bool {
        if self.switches.iter().any(|s| s == key) {
            return true;
        }
        matches!(self.get(key).map(|v| v.to_lowercase()), Some(v) if v == "true" || v == "1")
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }
}
