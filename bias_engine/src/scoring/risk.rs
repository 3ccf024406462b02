use serde::{Deserialize, Serialize};

use crate::models::{RiskLabel, WeightedSentiment};

/// Пороги скорректированной оценки, строго по убыванию: safe > moderate > high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub safe: f64,
    pub moderate: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            safe: 0.3,
            moderate: 0.0,
            high: -0.3,
        }
    }
}

impl RiskThresholds {
    pub fn is_descending(&self) -> bool {
        self.safe > self.moderate && self.moderate > self.high
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new(thresholds: RiskThresholds) -> Self {
        RiskClassifier { thresholds }
    }

    /// Низкий консенсус приглушает сигнал
    pub fn classify(&self, value: f64, consensus: f64) -> RiskLabel {
        self.classify_adjusted(value * consensus)
    }

    pub fn classify_sentiment(&self, sentiment: &WeightedSentiment) -> RiskLabel {
        self.classify_adjusted(sentiment.adjusted())
    }

    pub fn classify_adjusted(&self, adjusted: f64) -> RiskLabel {
        match adjusted {
            x if x > self.thresholds.safe => RiskLabel::SafeInvestment,
            x if x > self.thresholds.moderate => RiskLabel::ModerateRisk,
            x if x > self.thresholds.high => RiskLabel::HighRisk,
            _ => RiskLabel::VeryHighRisk,
        }
    }
}
