use chrono::{Days, NaiveDate};

use crate::backtest::accuracy::{accuracy_percentage, AccuracyRuleSet};
use crate::backtest::lookup::{PriceSeries, PriceWindowLookup, ReturnCalculator};
use crate::config::BacktestConfig;
use crate::errors::{BiasEngineError, Result};
use crate::models::{BacktestResult, ClassificationRecord, Horizon, HorizonAccuracy};

/// Диапазон цен для бэктеста: несколько дней до начала (открытия) и
/// запас после конца для 30-дневных закрытий.
pub fn price_window(
    start: NaiveDate,
    end: NaiveDate,
    lead_days: u32,
    trail_days: u32,
) -> Result<(NaiveDate, NaiveDate)> {
    let from = start
        .checked_sub_days(Days::new(lead_days as u64))
        .ok_or_else(|| BiasEngineError::InvalidDateRange(format!("{} - {} дней", start, lead_days)))?;
    let to = end
        .checked_add_days(Days::new(trail_days as u64))
        .ok_or_else(|| BiasEngineError::InvalidDateRange(format!("{} + {} дней", end, trail_days)))?;
    Ok((from, to))
}

#[derive(Debug, Clone, Copy)]
pub struct BacktestEvaluator {
    lookup: PriceWindowLookup,
    returns: ReturnCalculator,
    rules: AccuracyRuleSet,
}

impl BacktestEvaluator {
    pub fn new(lookup: PriceWindowLookup, rules: AccuracyRuleSet) -> Self {
        BacktestEvaluator {
            lookup,
            returns: ReturnCalculator::new(lookup),
            rules,
        }
    }

    pub fn from_config(config: &BacktestConfig) -> Self {
        Self::new(config.lookup(), config.rule_set)
    }

    /// Возвращает обогащённую копию записи, оригинал не трогается.
    pub fn enrich(&self, record: &ClassificationRecord, series: &PriceSeries) -> ClassificationRecord {
        let mut enriched = ClassificationRecord::new(
            record.company.clone(),
            record.date,
            record.sentiment_avg,
            record.risk_label,
            record.article_count,
        );

        // Неположительное открытие считаем отсутствующим
        let Some(open) = self.lookup.resolve(series, record.date).filter(|p| p.open > 0.0) else {
            tracing::debug!("Нет цены открытия для {} на {}", record.company, record.date);
            return enriched;
        };

        enriched.open_price = Some(open.open);
        for horizon in Horizon::ALL {
            *enriched.horizon_mut(horizon) =
                self.returns
                    .forward_return(record.date, open.open, series, horizon.days());
        }
        enriched
    }

    pub fn score_horizon(&self, records: &[ClassificationRecord], horizon: Horizon) -> HorizonAccuracy {
        let mut correct = 0;
        let mut evaluated = 0;

        for record in records {
            // NoData пропускаем, вычисленный 0% оцениваем как обычно
            let Some(actual) = record.horizon(horizon).return_pct() else {
                continue;
            };
            if self.rules.is_correct(record.risk_label, actual) {
                correct += 1;
            }
            evaluated += 1;
        }

        HorizonAccuracy {
            horizon,
            correct,
            evaluated,
            accuracy: accuracy_percentage(correct, evaluated),
        }
    }

    pub fn evaluate(
        &self,
        company: &str,
        ticker: &str,
        records: &[ClassificationRecord],
        series: &PriceSeries,
    ) -> BacktestResult {
        let entries: Vec<ClassificationRecord> = records
            .iter()
            .map(|record| self.enrich(record, series))
            .collect();

        for (i, entry) in entries.iter().enumerate() {
            tracing::debug!(
                "Анализ {}: дата={}, sentiment={:.2}, риск={}, доходность 7D={:?}",
                i + 1,
                entry.date,
                entry.sentiment_avg,
                entry.risk_label,
                entry.return_7d.return_pct()
            );
        }

        let records_without_price = entries.iter().filter(|e| e.open_price.is_none()).count();

        let result = BacktestResult {
            company: company.to_string(),
            ticker: ticker.to_string(),
            total_analyses: entries.len(),
            records_without_price,
            accuracy_1d: self.score_horizon(&entries, Horizon::OneDay),
            accuracy_7d: self.score_horizon(&entries, Horizon::SevenDays),
            accuracy_30d: self.score_horizon(&entries, Horizon::ThirtyDays),
            entries,
        };

        tracing::info!(
            "Бэктест {} завершён: 1D={:.1}%, 7D={:.1}%, 30D={:.1}%, без цен: {}",
            company,
            result.accuracy_1d.accuracy,
            result.accuracy_7d.accuracy,
            result.accuracy_30d.accuracy,
            records_without_price
        );

        result
    }
}
