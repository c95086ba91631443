use serde::{Deserialize, Serialize};

/// A single daily sample of a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Unix timestamp in seconds.
    pub time: i64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(time: i64, close: f64) -> Self {
        Self {
            time,
            close,
            high: None,
            low: None,
            volume: None,
        }
    }
}

/// Ordered, gap-free daily series for one ticker.
///
/// Index position is the trading-day offset. Samples with a missing or
/// non-finite close never make it into a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, dropping samples whose close is not a finite number.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let points = points
            .into_iter()
            .filter(|p| p.close.is_finite())
            .collect();

        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Build a series from bare closes with consecutive daily timestamps.
    pub fn from_closes(symbol: impl Into<String>, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(i as i64 * 86_400, close))
            .collect();
        Self::new(symbol, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Close prices in order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Volumes in order, or `None` when any sample lacks one.
    pub fn volumes(&self) -> Option<Vec<f64>> {
        if self.points.is_empty() {
            return None;
        }
        self.points.iter().map(|p| p.volume).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filters_non_finite_closes() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint::new(1, 10.0),
                PricePoint::new(2, f64::NAN),
                PricePoint::new(3, 12.0),
                PricePoint::new(4, f64::INFINITY),
            ],
        );
        assert_eq!(series.closes(), vec![10.0, 12.0]);
    }

    #[test]
    fn test_from_closes() {
        let series = PriceSeries::from_closes("MSFT", &[1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.points[2].time, 2 * 86_400);
        assert_eq!(series.last_close(), Some(3.0));
    }

    #[test]
    fn test_volumes_require_every_sample() {
        let mut series = PriceSeries::from_closes("X", &[1.0, 2.0]);
        assert!(series.volumes().is_none());

        series.points[0].volume = Some(100.0);
        series.points[1].volume = Some(300.0);
        assert_eq!(series.volumes(), Some(vec![100.0, 300.0]));
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let json = serde_json::to_string(&PricePoint::new(5, 1.5)).unwrap();
        assert_eq!(json, r#"{"time":5,"close":1.5}"#);
    }
}
