use std::sync::Arc;

use chrono::NaiveDate;

use crate::backtest::{price_window, BacktestEvaluator, PriceSeries};
use crate::config::BacktestConfig;
use crate::errors::{BiasEngineError, Result};
use crate::models::BacktestResult;
use crate::providers::{ClassificationHistoryStore, PriceSeriesProvider};

#[derive(Clone)]
pub struct BacktestService {
    history: Arc<dyn ClassificationHistoryStore>,
    prices: Arc<dyn PriceSeriesProvider>,
    evaluator: BacktestEvaluator,
    config: BacktestConfig,
}

impl BacktestService {
    pub fn new(
        history: Arc<dyn ClassificationHistoryStore>,
        prices: Arc<dyn PriceSeriesProvider>,
        config: BacktestConfig,
    ) -> Self {
        BacktestService {
            history,
            prices,
            evaluator: BacktestEvaluator::from_config(&config),
            config,
        }
    }

    pub async fn run_backtest(
        &self,
        company: &str,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BacktestResult> {
        if start > end {
            return Err(BiasEngineError::InvalidDateRange(format!("{} позже {}", start, end)));
        }

        tracing::info!("Бэктест {} ({}) с {} по {}", company, ticker, start, end);

        let records = self.history.query(company, start, end).await?;
        if records.is_empty() {
            return Err(BiasEngineError::NoHistoricalData(company.to_string()));
        }
        tracing::info!("Найдено {} исторических анализов", records.len());

        // Все цены одним запросом, с запасом по краям
        let (from, to) = price_window(start, end, self.config.lead_days, self.config.trail_days)?;
        let prices = self.prices.get_range(ticker, from, to).await?;
        if prices.is_empty() {
            return Err(BiasEngineError::PriceDataUnavailable(format!(
                "{} с {} по {}",
                ticker, from, to
            )));
        }
        tracing::info!("Получено {} дней котировок", prices.len());

        let series = PriceSeries::from_points(prices);
        Ok(self.evaluator.evaluate(company, ticker, &records, &series))
    }
}
