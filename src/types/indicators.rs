use serde::{Deserialize, Serialize};

/// One Bollinger band reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBand {
    /// Band width as a percentage of the middle band.
    pub fn width_pct(&self) -> f64 {
        if self.middle == 0.0 {
            return 0.0;
        }
        (self.upper - self.lower) / self.middle * 100.0
    }
}

/// Latest MACD line and signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
}

/// MACD line, signal and histogram aligned with the input prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Latest scalar readings, as shown on a summary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    pub rsi: f64,
    pub macd: MacdValue,
    pub bollinger: BollingerBand,
    pub band_width_pct: f64,
}

/// Indicator series, each aligned by index to the source prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorBundle {
    pub rsi: Vec<f64>,
    pub macd: MacdSeries,
    pub bollinger: Vec<BollingerBand>,
    pub ema20: Vec<f64>,
    pub ema50: Vec<f64>,
    pub latest: IndicatorSummary,
}
