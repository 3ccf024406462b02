use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bias_engine::routers::create_routes;
use bias_engine::services::{HttpPriceClient, HttpSentimentClassifier};
use bias_engine::{
    load_config, AnalysisService, AppState, BacktestService, ClassificationHistoryHolder,
    ValidationOrchestrator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    // Настройка структурированного логирования
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bias_engine=info,warn"));

    // Файловый слой только если задан log_dir; guard держим до конца main
    let (file_layer, _guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "bias_engine.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true))
        .with(file_layer)
        .init();

    let classifier = Arc::new(HttpSentimentClassifier::from_config(&config)?);
    let prices = Arc::new(HttpPriceClient::from_config(&config)?);
    let history = Arc::new(ClassificationHistoryHolder::new());

    let state = AppState {
        analysis: AnalysisService::new(classifier, history.clone(), &config),
        backtest: BacktestService::new(history, prices.clone(), config.backtest.clone()),
        validation: ValidationOrchestrator::new(
            prices,
            config.scoring.risk_classifier(),
            config.validation.clone(),
        ),
        max_concurrent_requests: config.max_concurrent_requests,
    };

    let app = create_routes(state);
    tracing::info!("Сервер запущен на http://{}", config.server_addr);
    axum::Server::bind(&config.server_addr.parse()?)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
