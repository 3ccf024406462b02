use serde::{Deserialize, Serialize};

use crate::models::RiskLabel;

/// Правила проверки направления прогноза. Два набора различаются только
/// коридором для ModerateRisk и намеренно не объединены.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyRuleSet {
    /// ModerateRisk верен при |r| < 5
    Backtest,
    /// ModerateRisk верен при -2 < r < 5
    Validation,
}

impl AccuracyRuleSet {
    pub fn is_correct(self, predicted: RiskLabel, return_pct: f64) -> bool {
        match predicted {
            RiskLabel::SafeInvestment => return_pct > 2.0,
            RiskLabel::VeryHighRisk => return_pct < -2.0,
            RiskLabel::HighRisk => return_pct < 0.0,
            RiskLabel::ModerateRisk => match self {
                AccuracyRuleSet::Backtest => return_pct.abs() < 5.0,
                AccuracyRuleSet::Validation => return_pct > -2.0 && return_pct < 5.0,
            },
        }
    }
}

/// Процент верных прогнозов; без оценённых записей ровно 0.
pub fn accuracy_percentage(correct: usize, evaluated: usize) -> f64 {
    if evaluated == 0 {
        return 0.0;
    }
    correct as f64 / evaluated as f64 * 100.0
}
