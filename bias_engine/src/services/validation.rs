use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::backtest::validation::summarize;
use crate::backtest::{cadence_dates, stand_in_signal};
use crate::config::ValidationConfig;
use crate::errors::{BiasEngineError, Result};
use crate::models::{Prediction, ValidationResult};
use crate::providers::PriceSeriesProvider;
use crate::scoring::RiskClassifier;

/// Еженедельный прогон по датам без сохранённой истории: проверка методологии,
/// а не боевой скоринг.
#[derive(Clone)]
pub struct ValidationOrchestrator {
    prices: Arc<dyn PriceSeriesProvider>,
    classifier: RiskClassifier,
    config: ValidationConfig,
}

impl ValidationOrchestrator {
    pub fn new(prices: Arc<dyn PriceSeriesProvider>, classifier: RiskClassifier, config: ValidationConfig) -> Self {
        ValidationOrchestrator {
            prices,
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub async fn validate_company(
        &self,
        company: &str,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ValidationResult> {
        if start >= end {
            return Err(BiasEngineError::InvalidDateRange(format!("{} не раньше {}", start, end)));
        }

        let dates = cadence_dates(start, end, self.config.weekday, self.config.cadence_days);
        let horizon = Days::new(self.config.horizon_days as u64);

        let mut predictions = Vec::new();
        let mut skipped = 0;
        let mut failures = 0;

        for date in &dates {
            let Some(close_date) = date.checked_add_days(horizon) else {
                skipped += 1;
                continue;
            };

            let (open, close) = tokio::join!(
                self.prices.get_on_date(ticker, *date),
                self.prices.get_on_date(ticker, close_date)
            );

            let (open, close) = match (open, close) {
                (Ok(Some(open)), Ok(Some(close))) if open.open > 0.0 => (open, close),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Не удалось получить цены {} на {}: {}", ticker, date, e);
                    failures += 1;
                    skipped += 1;
                    continue;
                }
                _ => {
                    tracing::debug!("Нет цен {} на {}", ticker, date);
                    skipped += 1;
                    continue;
                }
            };

            let actual_return = (close.close - open.open) / open.open * 100.0;
            let sentiment = stand_in_signal(actual_return);
            let predicted_risk = self.classifier.classify(sentiment, 1.0);
            let correct = self.config.rule_set.is_correct(predicted_risk, actual_return);

            tracing::info!(
                "  {}: sentiment={:.2}, риск={}, доходность={:.2}%, верно={}",
                date,
                sentiment,
                predicted_risk,
                actual_return,
                correct
            );

            predictions.push(Prediction {
                date: *date,
                sentiment,
                predicted_risk,
                actual_return,
                correct,
            });
        }

        if !dates.is_empty() && failures == dates.len() {
            return Err(BiasEngineError::PriceDataUnavailable(format!(
                "сервис котировок недоступен для {}",
                ticker
            )));
        }

        Ok(summarize(company, ticker, predictions, skipped))
    }

    /// Прогон по всем компаниям из конфигурации. Ошибка по одной компании
    /// не останавливает остальные.
    pub async fn run(&self, start: NaiveDate, end: NaiveDate) -> Vec<ValidationResult> {
        let mut results = Vec::new();
        for (company, ticker) in &self.config.companies {
            match self.validate_company(company, ticker, start, end).await {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("Проверка {} ({}) не удалась: {}", company, ticker, e),
            }
        }
        results
    }
}
