pub mod analysis;
pub mod cache;
pub mod features;
pub mod forecast;
pub mod indicators;
pub mod signals;

pub use analysis::{normalize_symbol, AnalysisService, Fetched};
pub use cache::Cache;
pub use features::{build_features, FeatureExtractor};
pub use forecast::{Forecaster, Predictor};
pub use indicators::compute_indicators;
pub use signals::{detect_signals, thin_signals, SignalDetector};
