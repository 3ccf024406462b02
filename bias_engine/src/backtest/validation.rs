use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::backtest::accuracy::accuracy_percentage;
use crate::models::{Prediction, ValidationResult};

/// Даты прогона: каждая точка прижата к `weekday`, шаг `cadence_days`.
pub fn cadence_dates(start: NaiveDate, end: NaiveDate, weekday: Weekday, cadence_days: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    let step = Days::new(cadence_days.max(1) as u64);

    while current < end {
        while current.weekday() != weekday {
            match current.succ_opt() {
                Some(next) => current = next,
                None => return dates,
            }
        }
        if current > end {
            break;
        }
        dates.push(current);

        match current.checked_add_days(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// Заглушка методологии: исторической тональности нет, поэтому сигнал
/// выводится из самой реализованной доходности. Точность прогона проверяет
/// только согласованность порогов и правил, а не предсказательную силу.
pub fn stand_in_signal(actual_return: f64) -> f64 {
    actual_return / 100.0
}

pub fn summarize(
    company: &str,
    ticker: &str,
    predictions: Vec<Prediction>,
    skipped_periods: usize,
) -> ValidationResult {
    let correct = predictions.iter().filter(|p| p.correct).count();
    let avg_return = if predictions.is_empty() {
        0.0
    } else {
        predictions.iter().map(|p| p.actual_return).sum::<f64>() / predictions.len() as f64
    };

    ValidationResult {
        company: company.to_string(),
        ticker: ticker.to_string(),
        test_periods: predictions.len(),
        skipped_periods,
        accuracy: accuracy_percentage(correct, predictions.len()),
        avg_return,
        predictions,
    }
}
