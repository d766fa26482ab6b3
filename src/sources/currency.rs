// src/sources/currency.rs
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::sources::client::{build_client, check_status, FetchConfig};
use crate::utils::error::{FetchError, RateError};

/// Yahoo symbol quoting USD per 1 EUR.
pub const DEFAULT_PAIR: &str = "EUR=X";
const YAHOO_CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

/// Source of the latest quote for a currency-pair symbol.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// `Ok(None)` means the provider answered but had no price.
    async fn quote(&self, symbol: &str) -> Result<Option<f64>, FetchError>;
}

/// `1 / quote`, or `None` when the quote is missing, zero or not finite.
pub fn inverse_rate(quote: Option<f64>) -> Option<f64> {
    quote
        .filter(|q| q.is_finite() && *q != 0.0)
        .map(|q| 1.0 / q)
}

/// Converts an EUR→USD quote into USD→EUR.
pub async fn usd_per_eur(provider: &dyn RateProvider, symbol: &str) -> Result<f64, RateError> {
    let quote = provider.quote(symbol).await?;
    tracing::debug!("Quote for {}: {:?}", symbol, quote);
    inverse_rate(quote).ok_or_else(|| RateError::Unavailable(symbol.to_string()))
}

// --- Yahoo chart API ---
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Live market price, falling back to the last daily close.
fn price_from_chart(response: ChartResponse) -> Option<f64> {
    let result = response.chart.result?.into_iter().next()?;
    if let Some(price) = result.meta.regular_market_price {
        return Some(price);
    }
    tracing::warn!("No regularMarketPrice in chart response, using last close");
    result
        .indicators?
        .quote
        .into_iter()
        .next()?
        .close
        .into_iter()
        .rev()
        .flatten()
        .next()
}

pub struct YahooRateProvider {
    client: reqwest::Client,
    base: Url,
}

impl YahooRateProvider {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(config)?,
            base: Url::parse(YAHOO_CHART_BASE)?,
        })
    }
}

#[async_trait]
impl RateProvider for YahooRateProvider {
    async fn quote(&self, symbol: &str) -> Result<Option<f64>, FetchError> {
        let mut url = self.base.join(symbol)?;
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");

        tracing::info!("Requesting quote for {}", symbol);
        let response = self.client.get(url.clone()).send().await?;
        check_status(response.status(), &url)?;

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        Ok(price_from_chart(chart))
    }
}
