use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::{ForecastResult, IndicatorBundle, PriceSeries};

/// Buy and sell marker positions into the analysed price series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub buy: Vec<usize>,
    pub sell: Vec<usize>,
}

impl SignalSet {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// Latest traded volume compared to the series average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAnalysis {
    pub average_volume: f64,
    pub latest_volume: f64,
    /// Percent above (positive) or below (negative) the average.
    pub change_pct: f64,
}

impl VolumeAnalysis {
    pub fn from_volumes(volumes: &[f64]) -> Option<Self> {
        let latest_volume = *volumes.last()?;
        let average_volume = volumes.iter().sum::<f64>() / volumes.len() as f64;
        let change_pct = if average_volume > 0.0 {
            (latest_volume - average_volume) / average_volume * 100.0
        } else {
            0.0
        };

        Some(Self {
            average_volume,
            latest_volume,
            change_pct,
        })
    }
}

/// Whether the regular trading session is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub open: bool,
    pub label: String,
}

impl MarketStatus {
    /// Weekdays between 09:00 and 16:00 count as open.
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        let weekday = !matches!(time.weekday(), Weekday::Sat | Weekday::Sun);
        let hour = time.hour();
        let open = weekday && (9..16).contains(&hour);

        Self {
            open,
            label: if open { "Market Open" } else { "Market Closed" }.to_string(),
        }
    }

    pub fn now() -> Self {
        Self::at(&chrono::Local::now())
    }
}

/// Everything computed for one ticker in a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub symbol: String,
    pub current_price: f64,
    pub history: PriceSeries,
    pub indicators: IndicatorBundle,
    pub signals: SignalSet,
    pub forecast: ForecastResult,
    /// False when training failed and the forecast fell back to identity.
    pub forecast_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeAnalysis>,
    pub market: MarketStatus,
    /// Unix timestamp in milliseconds.
    pub generated_at: i64,
}
