//! Synthetic random-walk prices, served when the upstream source is down.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::PriceSource;
use crate::error::Result;
use crate::types::{PricePoint, PriceSeries};

const SECONDS_PER_DAY: i64 = 86_400;

/// Random walk with a small upward drift.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    pub base_price: f64,
    pub days: usize,
    /// Width of the uniform daily change around the drift.
    pub volatility: f64,
    /// Daily drift.
    pub trend: f64,
    seed: Option<u64>,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            base_price: 100.0,
            days: 90,
            volatility: 0.02,
            trend: 0.001,
            seed: None,
        }
    }
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate a series ending today.
    pub fn generate(&self, symbol: &str) -> PriceSeries {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let today = Utc::now().timestamp() / SECONDS_PER_DAY * SECONDS_PER_DAY;
        let mut price = self.base_price;
        let mut points = Vec::with_capacity(self.days + 1);
        points.push(self.point(today - self.days as i64 * SECONDS_PER_DAY, price, &mut rng));

        for day in (0..self.days).rev() {
            let change = (rng.gen::<f64>() - 0.5) * self.volatility + self.trend;
            price *= 1.0 + change;
            points.push(self.point(today - day as i64 * SECONDS_PER_DAY, price, &mut rng));
        }

        PriceSeries::new(symbol.to_uppercase(), points)
    }

    fn point(&self, time: i64, close: f64, rng: &mut StdRng) -> PricePoint {
        PricePoint {
            time,
            close,
            high: Some(close * 1.02),
            low: Some(close * 0.98),
            volume: Some(rng.gen_range(0..1_000_000u32) as f64),
        }
    }
}

#[async_trait]
impl PriceSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries> {
        Ok(self.generate(symbol))
    }
}
