// Проверка методологии: каждую неделю за последние N месяцев сравниваем
// метку риска с реальной доходностью на горизонте из конфигурации.
use std::sync::Arc;

use chrono::{Months, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bias_engine::services::HttpPriceClient;
use bias_engine::{load_config, ValidationOrchestrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bias_engine=info,warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config()?;
    let prices = Arc::new(HttpPriceClient::from_config(&config)?);
    let orchestrator = ValidationOrchestrator::new(
        prices,
        config.scoring.risk_classifier(),
        config.validation.clone(),
    );

    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_months(Months::new(config.validation.lookback_months))
        .ok_or_else(|| anyhow::anyhow!("Невозможно вычислить начало периода"))?;

    for result in orchestrator.run(start, end).await {
        println!("\n=== {} ({}) ===", result.company, result.ticker);
        println!("Точность: {:.1}%", result.accuracy);
        println!(
            "Средняя доходность за {} дней: {:.2}%",
            orchestrator.config().horizon_days, result.avg_return
        );
        println!(
            "Верных прогнозов: {}/{} (пропущено недель: {})",
            result.correct_count(),
            result.test_periods,
            result.skipped_periods
        );
    }

    Ok(())
}
