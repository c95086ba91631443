//! Yahoo Finance chart API client.
//!
//! Fetches three months of daily bars and turns them into a gap-free
//! [`PriceSeries`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::PriceSource;
use crate::error::{AppError, Result};
use crate::types::{PricePoint, PriceSeries};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const HISTORY_RANGE: &str = "3mo";

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Yahoo uses hyphens instead of dots for share classes (BRK-B, not BRK.B).
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

/// Turn a chart response into a series, dropping bars without a usable close.
fn parse_chart(symbol: &str, data: YahooChartResponse) -> Result<PriceSeries> {
    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let result = data
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| AppError::ExternalApi("No results in response".to_string()))?;

    let timestamps = result
        .timestamp
        .ok_or_else(|| AppError::ExternalApi("No timestamps in response".to_string()))?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ExternalApi("No quote data in response".to_string()))?;

    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &time) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        if !close.is_finite() || close <= 0.0 {
            continue;
        }

        points.push(PricePoint {
            time,
            close,
            high: highs.get(i).copied().flatten(),
            low: lows.get(i).copied().flatten(),
            volume: volumes.get(i).copied().flatten().map(|v| v as f64),
        });
    }

    if points.is_empty() {
        return Err(AppError::ExternalApi(format!("No price data for {}", symbol)));
    }

    Ok(PriceSeries::new(symbol, points))
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/{}?interval=1d&range={}&includePrePost=false",
            BASE_URL, yahoo_symbol, HISTORY_RANGE
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error: {}",
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        let series = parse_chart(&yahoo_symbol, data)?;

        debug!("Fetched {} daily bars for {}", series.len(), yahoo_symbol);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<PriceSeries> {
        let data: YahooChartResponse = serde_json::from_str(json).unwrap();
        parse_chart("AAPL", data)
    }

    #[test]
    fn test_normalize_yahoo_symbol() {
        assert_eq!(normalize_yahoo_symbol("aapl"), "AAPL");
        assert_eq!(normalize_yahoo_symbol("brk.b"), "BRK-B");
        assert_eq!(normalize_yahoo_symbol(" msft "), "MSFT");
    }

    #[test]
    fn test_parse_chart_skips_missing_closes() {
        let series = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1,2,3,4],
                "indicators":{"quote":[{
                    "high":[11.0,null,13.0,14.0],
                    "low":[9.0,null,11.0,12.0],
                    "close":[10.0,null,12.0,0.0],
                    "volume":[100,200,null,400]
                }]}
            }],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.closes(), vec![10.0, 12.0]);
        assert_eq!(series.points[0].high, Some(11.0));
        assert_eq!(series.points[0].volume, Some(100.0));
        assert_eq!(series.points[1].time, 3);
        assert_eq!(series.points[1].volume, None);
    }

    #[test]
    fn test_parse_chart_api_error() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(msg) if msg.contains("No data found")));
    }

    #[test]
    fn test_parse_chart_without_prices() {
        let err = parse(
            r#"{"chart":{"result":[{"timestamp":[1],"indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }
}
