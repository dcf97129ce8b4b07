use super::ValidatorResult;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub const CSV_HEADERS: [&str; 8] = [
    "Name",
    "Address",
    "Identity",
    "BLS Key Count",
    "BLS Keys",
    "Self Delegation",
    "Total Delegation",
    "Lifetime Rewards",
];

pub const BALANCE_HEADER: &str = "Wallet Balance";

/// `validators/validators-2020-06-01-12-30-00-UTC.csv`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("validators/validators-{}-UTC.csv", now.format("%Y-%m-%d-%H-%M-%S"))
}

fn amount(value: Decimal) -> String {
    format!("{:.6}", value)
}

/// Header row followed by one row per validator
///
/// With `include_balance`, a validator whose balance lookup failed gets an
/// empty balance cell.
pub fn csv_rows(results: &[ValidatorResult], include_balance: bool) -> Vec<Vec<String>> {
    let mut headers: Vec<String> = CSV_HEADERS.iter().map(|h| h.to_string()).collect();
    if include_balance {
        headers.push(BALANCE_HEADER.to_string());
    }

    let mut rows = Vec::with_capacity(results.len() + 1);
    rows.push(headers);

    for result in results {
        let record = &result.record;
        let mut row = vec![
            record.name.clone(),
            record.address.clone(),
            record.identity.clone(),
            record.bls_public_keys.len().to_string(),
            record.bls_public_keys.join("\n"),
            amount(record.self_delegation()),
            amount(record.total_delegation),
            amount(record.lifetime_rewards),
        ];

        if include_balance {
            row.push(result.balance.map(amount).unwrap_or_default());
        }

        rows.push(row);
    }

    rows
}
