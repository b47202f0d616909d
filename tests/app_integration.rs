use chrono::Local;
use folio::store::HistoryStore;
use folio::store::csv::CsvHistoryLog;
use std::fs;
use std::path::Path;

// Adds automatic logging to tests
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Yahoo mock serving a chart response for one symbol.
    pub async fn mount_chart(mock_server: &MockServer, symbol: &str, price: f64, currency: &str) {
        let url_path = format!("/v8/finance/chart/{symbol}");
        let body = format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "meta": {{
                            "regularMarketPrice": {price},
                            "currency": "{currency}"
                        }}
                    }}]
                }}
            }}"#
        );

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(mock_server)
            .await;
    }

    /// TEFAS mock answering every history query with one priced day.
    pub async fn mount_fund_price(mock_server: &MockServer, code: &str, price: f64) {
        let body = format!(
            r#"{{"data": [{{"TARIH": "1754352000000", "FONKODU": "{code}", "FIYAT": {price}}}]}}"#
        );

        Mock::given(method("POST"))
            .and(path("/api/DB/BindHistoryInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(mock_server)
            .await;
    }
}

const REGISTRY_HEADER: &str = "ticker,asset_type,quantity,purchase_price,currency,annual_interest_rate,start_date,manual_current_value,manual_total_cost\n";

fn write_config(dir: &Path, yahoo_url: &str, tefas_url: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    let registry_path = dir.join("assets.csv");
    let history_path = dir.join("daily_log.csv");
    let config_content = format!(
        r#"
registry_path: "{}"
history_path: "{}"
home_currency: "TRY"
throttle_ms: 0
providers:
  yahoo:
    base_url: {}
  tefas:
    base_url: {}
"#,
        registry_path.display(),
        history_path.display(),
        yahoo_url,
        tefas_url,
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path
}

#[test_log::test(tokio::test)]
async fn test_full_run_with_mocked_providers() {
    let yahoo = wiremock::MockServer::start().await;
    let tefas = wiremock::MockServer::start().await;
    test_utils::mount_chart(&yahoo, "AAPL", 150.0, "USD").await;
    test_utils::mount_chart(&yahoo, "USDTRY=X", 40.0, "TRY").await;
    test_utils::mount_fund_price(&tefas, "AFT", 12.5).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let registry_content = format!(
        "{REGISTRY_HEADER}\
         AAPL,stock,10,100,USD,,,,\n\
         AFT,fund,100,10,,,,,\n\
         VADELI,deposit,10000,,,12,2020-01-01,,\n"
    );
    fs::write(dir.path().join("assets.csv"), registry_content).expect("Failed to write registry");

    let config_path = write_config(dir.path(), &yahoo.uri(), &tefas.uri());

    let result = folio::run_command(
        folio::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Run failed with: {:?}", result.err());

    let log = CsvHistoryLog::new(dir.path().join("daily_log.csv"));
    let snapshots = log.read_all().expect("Failed to read history log");

    let today = Local::now().date_naive();
    assert_eq!(snapshots.len(), 3);
    assert!(snapshots.iter().all(|s| s.date == today));

    let aapl = snapshots.iter().find(|s| s.ticker == "AAPL").unwrap();
    assert_eq!(aapl.value, 10.0 * 150.0 * 40.0);

    let fund = snapshots.iter().find(|s| s.ticker == "AFT").unwrap();
    assert_eq!(fund.value, 100.0 * 12.5);

    let deposit = snapshots.iter().find(|s| s.ticker == "VADELI").unwrap();
    assert!(deposit.value > 10000.0);
}

#[test_log::test(tokio::test)]
async fn test_rerun_same_day_keeps_one_entry_per_asset() {
    let yahoo = wiremock::MockServer::start().await;
    let tefas = wiremock::MockServer::start().await;
    test_utils::mount_chart(&yahoo, "THYAO.IS", 120.0, "TRY").await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let registry_content = format!("{REGISTRY_HEADER}THYAO.IS,stock,10,100,,,,,\n");
    fs::write(dir.path().join("assets.csv"), registry_content).expect("Failed to write registry");

    let config_path = write_config(dir.path(), &yahoo.uri(), &tefas.uri());
    let config_str = config_path.to_str().unwrap();

    folio::run_command(folio::AppCommand::Run, Some(config_str))
        .await
        .expect("First run failed");
    folio::run_command(folio::AppCommand::Run, Some(config_str))
        .await
        .expect("Second run failed");

    let log = CsvHistoryLog::new(dir.path().join("daily_log.csv"));
    let snapshots = log.read_all().expect("Failed to read history log");

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].ticker, "THYAO.IS");
    assert_eq!(snapshots[0].value, 1200.0);
}

#[test_log::test(tokio::test)]
async fn test_missing_fx_rate_aborts_without_persisting() {
    let yahoo = wiremock::MockServer::start().await;
    let tefas = wiremock::MockServer::start().await;
    // Quote resolves, but the USDTRY=X rate endpoint stays unmocked, so the
    // rate lookup fails and the run must abort before writing anything.
    test_utils::mount_chart(&yahoo, "AAPL", 150.0, "USD").await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let registry_content = format!("{REGISTRY_HEADER}AAPL,stock,10,100,USD,,,,\n");
    fs::write(dir.path().join("assets.csv"), registry_content).expect("Failed to write registry");

    let config_path = write_config(dir.path(), &yahoo.uri(), &tefas.uri());

    let result = folio::run_command(
        folio::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
    assert!(!dir.path().join("daily_log.csv").exists());
}

#[test_log::test(tokio::test)]
async fn test_missing_price_degrades_that_asset_to_zero() {
    let yahoo = wiremock::MockServer::start().await;
    let tefas = wiremock::MockServer::start().await;
    test_utils::mount_chart(&yahoo, "GARAN.IS", 50.0, "TRY").await;
    // No mock for DELISTED.IS: the chart endpoint 404s for it.

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let registry_content = format!(
        "{REGISTRY_HEADER}\
         GARAN.IS,stock,20,40,,,,,\n\
         DELISTED.IS,stock,5,10,,,,,\n"
    );
    fs::write(dir.path().join("assets.csv"), registry_content).expect("Failed to write registry");

    let config_path = write_config(dir.path(), &yahoo.uri(), &tefas.uri());

    let result = folio::run_command(
        folio::AppCommand::Run,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Run failed with: {:?}", result.err());

    let log = CsvHistoryLog::new(dir.path().join("daily_log.csv"));
    let snapshots = log.read_all().expect("Failed to read history log");

    assert_eq!(snapshots.len(), 2);
    let garan = snapshots.iter().find(|s| s.ticker == "GARAN.IS").unwrap();
    assert_eq!(garan.value, 1000.0);
    let delisted = snapshots.iter().find(|s| s.ticker == "DELISTED.IS").unwrap();
    assert_eq!(delisted.value, 0.0);
}
