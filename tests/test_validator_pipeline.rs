//! Integration tests for validator aggregation, leaderboard and daily chart

mod common;

use chrono::{TimeZone, Utc};
use common::{collector, validator, MockChain, RecordingRenderer};
use rust_decimal::Decimal;
use shardstats::config::{ExportFormat, ValidatorConfig};
use shardstats::render::{ChartRenderer, CsvFileWriter, JsonChartWriter};
use shardstats::validators::{
    DailyCreations, FilterCriteria, FilterField, FilterMode, Leaderboard, ValidatorAnalyzer, ValidatorEngine,
};
use std::sync::Arc;
use tempfile::TempDir;

fn listing(count: usize) -> Vec<shardstats::rpc_core::ValidatorRecord> {
    (0..count).map(|i| validator(&format!("v{:02}", i), 1, (i as i64 + 1) * 10)).collect()
}

#[tokio::test]
async fn test_leaderboard_top_20_single_bls() {
    // Test: 25 eligible validators plus a high-reward multi-key one
    let mut chain = MockChain::new();
    chain.validators = listing(25);
    chain.validators.push(validator("whale", 3, 1_000_000));
    let chain = Arc::new(chain);
    let renderer = Arc::new(RecordingRenderer::default());

    let report = Leaderboard::new(chain, renderer.clone(), "mainnet").run().await.unwrap();

    assert_eq!(report.eligible, 25);
    assert_eq!(report.entries.len(), 20);
    assert!(report.entries.iter().all(|e| e.label != "whale"));

    let rewards: Vec<Decimal> = report.entries.iter().map(|e| e.lifetime_rewards).collect();
    assert_eq!(rewards[0], Decimal::from(250));
    assert_eq!(rewards[19], Decimal::from(60));
    assert!(rewards.windows(2).all(|w| w[0] > w[1]));

    let bars = renderer.bars.lock().unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].file_name, "validators/mainnet-leaderboard");
    assert_eq!(bars[0].bars.len(), 20);
    assert_eq!(bars[0].bars[0].value, 250.0);
}

#[tokio::test]
async fn test_balance_enrichment_keeps_order_and_marks_failures() {
    let mut chain = MockChain::new();
    chain.validators = listing(12);
    chain.max_latency_ms = 5;
    for (i, v) in chain.validators.iter().enumerate() {
        if i != 3 && i != 8 {
            chain.balances.insert(v.address.clone(), Decimal::from(i as i64));
        }
    }
    let expected: Vec<String> = chain.validators.iter().map(|v| v.address.clone()).collect();
    let chain = Arc::new(chain);

    let engine = ValidatorEngine::new(chain.clone(), collector(4));
    let records = engine.listing().await.unwrap();
    let results = engine.enrich_balances(records).await;

    let addresses: Vec<String> = results.iter().map(|r| r.record.address.clone()).collect();
    assert_eq!(addresses, expected);

    for (i, result) in results.iter().enumerate() {
        if i == 3 || i == 8 {
            assert!(result.error.is_some());
            assert_eq!(result.balance, None);
        } else {
            assert!(result.is_error_free());
            assert_eq!(result.balance, Some(Decimal::from(i as i64)));
        }
    }
    assert!(chain.peak() <= 4);
}

#[tokio::test]
async fn test_stages_filter_and_elected() {
    let mut chain = MockChain::new();
    let mut foobar = validator("Foobar", 1, 5);
    foobar.currently_in_committee = true;
    let mut foo = validator("Foo", 1, 5);
    foo.currently_in_committee = true;
    let mut anonymous = validator("anon", 1, 5);
    anonymous.identity = String::new();
    anonymous.currently_in_committee = true;
    let benched = validator("Foobaz", 1, 5);
    chain.validators = vec![foobar, benched, foo, anonymous];
    let chain = Arc::new(chain);

    let engine = ValidatorEngine::new(chain, collector(2));

    let contains = FilterCriteria {
        field: FilterField::Identity,
        value: "FOO".to_string(),
        mode: Some(FilterMode::Contains),
    };
    let records = engine.listing().await.unwrap();
    let results = engine.aggregate(records, true, false, &contains).await;
    let names: Vec<&str> = results.iter().map(|r| r.record.name.as_str()).collect();
    assert_eq!(names, vec!["Foobar", "Foo", "anon"]);

    let equals = FilterCriteria {
        mode: Some(FilterMode::Equals),
        ..contains
    };
    let records = engine.listing().await.unwrap();
    let results = engine.aggregate(records, false, false, &equals).await;
    let names: Vec<&str> = results.iter().map(|r| r.record.name.as_str()).collect();
    assert_eq!(names, vec!["Foo", "anon"]);
}

#[tokio::test]
async fn test_analyze_exports_csv() {
    let dir = TempDir::new().unwrap();

    let mut chain = MockChain::new();
    chain.validators = listing(3);
    chain.balances.insert(chain.validators[0].address.clone(), Decimal::from(42));
    let chain = Arc::new(chain);

    let config = ValidatorConfig {
        filter: FilterCriteria::default(),
        elected: false,
        balances: true,
    };
    let analyzer = ValidatorAnalyzer::new(
        ValidatorEngine::new(chain, collector(10)),
        Arc::new(CsvFileWriter::new(dir.path())),
        config,
        Some(ExportFormat::Csv),
    );

    let report = analyzer.run().await.unwrap();
    assert_eq!(report.checked, 3);
    assert_eq!(report.matching(), 3);
    assert_eq!(report.balance_failures(), 2);

    let path = report.csv_path.unwrap();
    assert!(path.starts_with(dir.path().join("validators")));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 9);
    assert_eq!(&headers[8], "Wallet Balance");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][8], "42.000000");
    assert_eq!(&rows[1][8], "");
}

#[tokio::test]
async fn test_analyze_without_export_writes_nothing() {
    let mut chain = MockChain::new();
    chain.validators = listing(2);
    let chain = Arc::new(chain);
    let exporter = Arc::new(RecordingRenderer::default());

    let config = ValidatorConfig {
        filter: FilterCriteria::default(),
        elected: false,
        balances: false,
    };
    let engine = ValidatorEngine::new(chain, collector(2));
    let analyzer = ValidatorAnalyzer::new(engine, exporter.clone(), config, None);
    let report = analyzer.run().await.unwrap();

    assert!(report.csv_path.is_none());
    assert!(exporter.csv.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_daily_buckets_by_date() {
    let mut chain = MockChain::new();
    let heights = [100i64, 100, 200, 300, 300, 300, 400, -1];
    chain.validators = heights
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let mut v = validator(&format!("d{}", i), 1, 1);
            v.creation_height = *h;
            v
        })
        .collect();
    chain.block_times.insert(100, Utc.with_ymd_and_hms(2020, 5, 1, 1, 0, 0).unwrap());
    chain.block_times.insert(200, Utc.with_ymd_and_hms(2020, 5, 1, 23, 0, 0).unwrap());
    chain.block_times.insert(300, Utc.with_ymd_and_hms(2020, 5, 3, 12, 0, 0).unwrap());
    // block 400 lookup fails
    chain.max_latency_ms = 3;
    let chain = Arc::new(chain);
    let renderer = Arc::new(RecordingRenderer::default());

    let report = DailyCreations::new(chain, renderer.clone(), collector(2), "mainnet")
        .run()
        .await
        .unwrap();

    let pairs: Vec<(String, usize)> = report.per_date.iter().map(|(d, c)| (d.to_string(), *c)).collect();
    assert_eq!(pairs, vec![("2020-05-01".to_string(), 3), ("2020-05-03".to_string(), 3)]);
    assert_eq!(report.total, 6);
    assert_eq!(report.failed_blocks, 1);

    let charts = renderer.time_series.lock().unwrap();
    assert_eq!(charts[0].file_name, "validators/mainnet-daily");
    assert_eq!(charts[0].values, vec![3.0, 3.0]);
    assert_eq!(charts[0].details, vec!["Validators: 6 total"]);
}

#[tokio::test]
async fn test_leaderboard_chart_file() {
    let dir = TempDir::new().unwrap();

    let mut chain = MockChain::new();
    chain.validators = listing(3);
    let chain = Arc::new(chain);
    let renderer: Arc<dyn ChartRenderer> = Arc::new(JsonChartWriter::new(dir.path()));

    let report = Leaderboard::new(chain, renderer, "Testnet").run().await.unwrap();

    assert_eq!(report.chart_path, dir.path().join("charts/validators/testnet-leaderboard.json"));
    let doc: serde_json::Value = serde_json::from_slice(&std::fs::read(&report.chart_path).unwrap()).unwrap();
    assert_eq!(doc["chart"]["bars"].as_array().unwrap().len(), 3);
}
