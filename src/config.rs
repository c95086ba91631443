use std::env;
use std::time::Duration;

/// Forecast model hyperparameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Sliding window length used to build feature vectors.
    pub window_size: usize,
    /// Number of trailing prices carried forward during inference.
    pub context_size: usize,
    /// Series shorter than this are returned unchanged.
    pub min_history: usize,
    /// Number of future steps to predict.
    pub horizon: usize,
    /// Hidden layer widths, input side first.
    pub hidden_units: Vec<usize>,
    /// Dropout rate applied after the first hidden layer.
    pub dropout_rate: f64,
    /// Training epochs.
    pub epochs: usize,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Fraction of samples held out for validation (taken from the end).
    pub validation_split: f64,
    /// RMSprop learning rate.
    pub learning_rate: f64,
    /// Seed for weight init, dropout and shuffling. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            context_size: 30,
            min_history: 30,
            horizon: 5,
            hidden_units: vec![128, 64, 32],
            dropout_rate: 0.3,
            epochs: 50,
            batch_size: 32,
            validation_split: 0.1,
            learning_rate: 0.01,
            seed: None,
        }
    }
}

impl ForecastConfig {
    /// Clamp values into a usable range.
    ///
    /// The context must hold at least one full window, and the minimum history
    /// must leave at least one training sample after the first window.
    pub fn normalized(mut self) -> Self {
        self.window_size = self.window_size.max(2);
        self.context_size = self.context_size.max(self.window_size);
        self.min_history = self
            .min_history
            .max(self.context_size)
            .max(self.window_size + 1);
        self.hidden_units.retain(|&units| units > 0);
        self.dropout_rate = self.dropout_rate.clamp(0.0, 0.9);
        self.epochs = self.epochs.max(1);
        self.batch_size = self.batch_size.max(1);
        self.validation_split = self.validation_split.clamp(0.0, 0.5);
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            self.learning_rate = 0.01;
        }
        self
    }

    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            window_size: parse_env("FORECAST_WINDOW_SIZE").unwrap_or(defaults.window_size),
            context_size: parse_env("FORECAST_CONTEXT_SIZE").unwrap_or(defaults.context_size),
            min_history: parse_env("FORECAST_MIN_HISTORY").unwrap_or(defaults.min_history),
            horizon: parse_env("FORECAST_HORIZON").unwrap_or(defaults.horizon),
            hidden_units: env::var("FORECAST_HIDDEN_UNITS")
                .ok()
                .map(|s| parse_units(&s))
                .filter(|units| !units.is_empty())
                .unwrap_or(defaults.hidden_units),
            dropout_rate: parse_env("FORECAST_DROPOUT").unwrap_or(defaults.dropout_rate),
            epochs: parse_env("FORECAST_EPOCHS").unwrap_or(defaults.epochs),
            batch_size: parse_env("FORECAST_BATCH_SIZE").unwrap_or(defaults.batch_size),
            validation_split: parse_env("FORECAST_VALIDATION_SPLIT")
                .unwrap_or(defaults.validation_split),
            learning_rate: parse_env("FORECAST_LEARNING_RATE").unwrap_or(defaults.learning_rate),
            seed: parse_env("FORECAST_SEED"),
        }
        .normalized()
    }
}

/// Signal detection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Maximum number of buy (and of sell) markers kept after thinning.
    pub max_signals: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self { max_signals: 5 }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Freshness window for cached price series and analysis reports.
    pub cache_ttl: Duration,
    /// Serve a synthetic series when the upstream source fails.
    pub synthetic_fallback: bool,
    /// Forecast model settings.
    pub forecast: ForecastConfig,
    /// Signal detection settings.
    pub signals: SignalConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cache_ttl: Duration::from_secs(5 * 60),
            synthetic_fallback: true,
            forecast: ForecastConfig::default(),
            signals: SignalConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env("PORT").unwrap_or(defaults.port),
            cache_ttl: parse_env("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            synthetic_fallback: env::var("SYNTHETIC_FALLBACK")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.synthetic_fallback),
            forecast: ForecastConfig::from_env(),
            signals: SignalConfig {
                max_signals: parse_env("SIGNAL_MAX_MARKERS")
                    .unwrap_or(defaults.signals.max_signals),
            },
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse a comma separated list of layer widths, e.g. "128,64,32".
fn parse_units(s: &str) -> Vec<usize> {
    s.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .filter(|&units: &usize| units > 0)
        .collect()
}
