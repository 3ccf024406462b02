pub mod analysis;
pub mod backtest;
pub mod sentiment;
pub mod stocks;
pub mod validation;

pub use analysis::{classify_articles, AnalysisService};
pub use backtest::BacktestService;
pub use sentiment::HttpSentimentClassifier;
pub use stocks::HttpPriceClient;
pub use validation::ValidationOrchestrator;
