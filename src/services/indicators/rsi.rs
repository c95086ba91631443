//! Relative Strength Index (RSI).
//!
//! Measures momentum by comparing the magnitude of recent gains to recent
//! losses. Values range from 0 to 100:
//! - Below 30: oversold
//! - Above 70: overbought

/// Default look-back period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Reading reported when there is not enough data.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Wilder-smoothed average gain and loss.
struct WilderAverages {
    period: f64,
    avg_gain: f64,
    avg_loss: f64,
}

impl WilderAverages {
    /// Seed from the first `period` price changes. Missing changes count as zero.
    fn seed(changes: &[f64], period: usize) -> Self {
        let (gain, loss) = changes
            .iter()
            .take(period)
            .fold((0.0, 0.0), |(g, l), &c| (g + c.max(0.0), l + (-c).max(0.0)));

        Self {
            period: period as f64,
            avg_gain: gain / period as f64,
            avg_loss: loss / period as f64,
        }
    }

    fn push(&mut self, change: f64) {
        self.avg_gain = (self.avg_gain * (self.period - 1.0) + change.max(0.0)) / self.period;
        self.avg_loss = (self.avg_loss * (self.period - 1.0) + (-change).max(0.0)) / self.period;
    }

    fn value(&self) -> f64 {
        if self.avg_loss == 0.0 {
            // No losses: saturate on any gain, stay neutral on a flat line.
            return if self.avg_gain > 0.0 { 100.0 } else { NEUTRAL_RSI };
        }
        let rs = self.avg_gain / self.avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

fn changes(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

/// RSI of the whole series, reported at its last value.
///
/// Returns [`NEUTRAL_RSI`] when `values` is shorter than `period`.
pub fn rsi(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return NEUTRAL_RSI;
    }

    let changes = changes(values);
    let mut averages = WilderAverages::seed(&changes, period);
    for &change in changes.iter().skip(period) {
        averages.push(change);
    }
    averages.value()
}

/// RSI at every index of `values`.
///
/// The first `period` entries are padded with [`NEUTRAL_RSI`]; from index
/// `period` on, entry `i` equals `rsi(&values[..=i], period)`.
pub fn rsi_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![NEUTRAL_RSI; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    let changes = changes(values);
    let mut averages = WilderAverages::seed(&changes, period);
    out[period] = averages.value();

    for i in (period + 1)..values.len() {
        averages.push(changes[i - 1]);
        out[i] = averages.value();
    }

    out
}
