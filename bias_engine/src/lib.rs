pub mod backtest;
pub mod config;
pub mod errors;
pub mod holders;
pub mod models;
pub mod providers;
pub mod routers;
pub mod scoring;
pub mod services;

pub use config::{load_config, AppConfig};
pub use errors::{BiasEngineError, Result};
pub use holders::{ClassificationHistoryHolder, PriceSeriesHolder};
pub use models::{
    BacktestResult, ClassificationRecord, CompanyAnalysis, Horizon, HorizonReturn, NewsArticle,
    PricePoint, RiskLabel, ScoredArticle, Sentiment, ValidationResult, WeightedSentiment,
};
pub use providers::{ClassificationHistoryStore, PriceSeriesProvider, SentimentClassifier};
pub use services::{AnalysisService, BacktestService, ValidationOrchestrator};

#[derive(Clone)]
pub struct AppState {
    pub analysis: AnalysisService,
    pub backtest: BacktestService,
    pub validation: ValidationOrchestrator,
    pub max_concurrent_requests: usize,
}
