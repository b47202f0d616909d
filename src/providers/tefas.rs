use crate::core::price::FundPriceProvider;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Fund price provider backed by the TEFAS fund history endpoint.
///
/// One call covers exactly one calendar day; funds publish no price on
/// non-trading days and the endpoint then returns an empty data array.
pub struct TefasProvider {
    base_url: String,
}

impl TefasProvider {
    pub fn new(base_url: &str) -> Self {
        TefasProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TefasHistoryResponse {
    data: Vec<TefasPriceRow>,
}

#[derive(Debug, Deserialize)]
struct TefasPriceRow {
    #[serde(alias = "FIYAT")]
    price: f64,
}

#[async_trait]
impl FundPriceProvider for TefasProvider {
    async fn price_on(&self, code: &str, date: NaiveDate) -> Result<Option<f64>> {
        let url = format!("{}/api/DB/BindHistoryInfo", self.base_url);
        // TEFAS expects dd.mm.yyyy on both range bounds.
        let day = date.format("%d.%m.%Y").to_string();
        debug!("Requesting fund price for {} on {} from {}", code, day, url);

        let client = reqwest::Client::builder().user_agent("folio/1.0").build()?;
        let form = [
            ("fontip", "YAT"),
            ("fonkod", code),
            ("bastarih", day.as_str()),
            ("bittarih", day.as_str()),
        ];

        let response = with_retry(|| async { client.post(&url).form(&form).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to send request for fund: {code}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for fund: {}",
                response.status(),
                code
            ));
        }

        let response_text = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for fund: {code}"))?;

        let history: TefasHistoryResponse =
            serde_json::from_str(&response_text).with_context(|| {
                format!("Failed to parse TEFAS response for fund: {code}. Response: '{response_text}'")
            })?;

        Ok(history.data.last().map(|row| row.price))
    }
}
