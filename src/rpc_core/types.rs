//! Domain records returned by the chain client, plus JSON value decoding
//! for the numeric encodings the RPC nodes use (plain numbers, decimal
//! strings and `0x` hex strings).

use super::client::RpcError;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Decimal places of the native token's base unit (atto)
pub const ATTO_SCALE: u32 = 18;

#[derive(Debug, Clone, PartialEq)]
pub struct Delegation {
    pub delegator_address: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatorRecord {
    pub name: String,
    pub address: String,
    pub identity: String,
    pub website: String,
    pub bls_public_keys: Vec<String>,
    pub delegations: Vec<Delegation>,
    pub total_delegation: Decimal,
    pub lifetime_rewards: Decimal,
    pub currently_in_committee: bool,
    /// Negative when the node did not report a creation height
    pub creation_height: i64,
}

impl ValidatorRecord {
    /// Amount the validator delegated to itself, zero if none
    pub fn self_delegation(&self) -> Decimal {
        self.delegations
            .iter()
            .find(|d| d.delegator_address == self.address)
            .map(|d| d.amount)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    pub block_number: u64,
    pub timestamp: DateTime<Utc>,
}

fn parse_integer(raw: &str) -> Result<i128, RpcError> {
    let raw = raw.trim();
    let parsed = if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16)
    } else {
        raw.parse::<i128>()
    };
    parsed.map_err(|_| RpcError::Decode(format!("not an integer: '{}'", raw)))
}

fn integer_from_value(value: &Value) -> Result<i128, RpcError> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            match parse_integer(&text) {
                Ok(v) => Ok(v),
                // Some nodes serialise large amounts in float notation (1.5e+21)
                Err(_) => Decimal::from_scientific(&text)
                    .or_else(|_| text.parse::<Decimal>())
                    .ok()
                    .and_then(|d| d.trunc().to_i128())
                    .ok_or_else(|| RpcError::Decode(format!("not an integer: '{}'", text))),
            }
        }
        Value::String(s) => parse_integer(s),
        other => Err(RpcError::Decode(format!("expected a number, got {}", other))),
    }
}

/// Decode a block number / count
pub fn parse_u64(value: &Value) -> Result<u64, RpcError> {
    let v = integer_from_value(value)?;
    u64::try_from(v).map_err(|_| RpcError::Decode(format!("value out of range for u64: {}", v)))
}

/// Decode an atto-denominated amount into whole tokens; `null` is zero
pub fn parse_atto(value: &Value) -> Result<Decimal, RpcError> {
    if value.is_null() {
        return Ok(Decimal::ZERO);
    }
    let raw = integer_from_value(value)?;
    Decimal::try_from_i128_with_scale(raw, ATTO_SCALE)
        .map(|d| d.normalize())
        .map_err(|e| RpcError::Decode(format!("amount {} does not fit: {}", raw, e)))
}

pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>, RpcError> {
    let secs = integer_from_value(value)?;
    let secs = i64::try_from(secs)
        .map_err(|_| RpcError::Decode(format!("timestamp out of range: {}", secs)))?;
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| RpcError::Decode(format!("timestamp out of range: {}", secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_parse_u64_encodings() {
        assert_eq!(parse_u64(&json!(42)).unwrap(), 42);
        assert_eq!(parse_u64(&json!("0x2a")).unwrap(), 42);
        assert_eq!(parse_u64(&json!("42")).unwrap(), 42);
        assert!(parse_u64(&json!(-1)).is_err());
        assert!(parse_u64(&json!(true)).is_err());
    }

    #[test]
    fn test_parse_atto_amounts() {
        // 1.5 tokens
        let amount = parse_atto(&json!(1_500_000_000_000_000_000u64)).unwrap();
        assert_eq!(amount, Decimal::from_str("1.5").unwrap());

        // Larger than u64, kept exact
        let big: Value = serde_json::from_str("2000000000000000000000000").unwrap();
        assert_eq!(parse_atto(&big).unwrap(), Decimal::from(2_000_000));

        assert_eq!(parse_atto(&json!("0xde0b6b3a7640000")).unwrap(), Decimal::ONE);
        assert_eq!(parse_atto(&Value::Null).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_self_delegation() {
        let validator = ValidatorRecord {
            address: "one1self".to_string(),
            delegations: vec![
                Delegation { delegator_address: "one1other".to_string(), amount: Decimal::from(5) },
                Delegation { delegator_address: "one1self".to_string(), amount: Decimal::from(10) },
            ],
            ..Default::default()
        };
        assert_eq!(validator.self_delegation(), Decimal::from(10));

        let no_self = ValidatorRecord { address: "one1x".to_string(), ..Default::default() };
        assert_eq!(no_self.self_delegation(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp(&json!(1_600_000_000)).unwrap();
        assert_eq!(ts.timestamp(), 1_600_000_000);
    }
}
