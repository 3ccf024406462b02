use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Распределение тональности от внешнего классификатора.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl Sentiment {
    /// Подставляется вместо ответа классификатора при ошибке или таймауте.
    pub const NEUTRAL: Sentiment = Sentiment {
        positive: 0.33,
        neutral: 0.34,
        negative: 0.33,
    };

    pub fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Sentiment {
            positive,
            neutral,
            negative,
        }
    }

    /// Направленная оценка статьи в диапазоне -1.0..1.0
    pub fn score(&self) -> f64 {
        self.positive - self.negative
    }
}

/// Статья до классификации, как её отдаёт источник новостей.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: Option<String>,
    pub source: String,
    #[serde(default)]
    pub body: String,
    pub published_at: DateTime<Utc>,
}

impl NewsArticle {
    /// Текст для классификатора: тело статьи, а если его нет, заголовок.
    pub fn classifier_text(&self) -> &str {
        if self.body.trim().is_empty() {
            &self.title
        } else {
            &self.body
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: NewsArticle,
    pub sentiment: Sentiment,
    /// Назначается `ImpactScorer`, во входных данных не ожидается.
    #[serde(default)]
    pub impact_score: Option<f64>,
    /// true, если вместо ответа классификатора подставлен нейтральный sentiment
    #[serde(default)]
    pub degraded: bool,
}

impl ScoredArticle {
    pub fn new(article: NewsArticle, sentiment: Sentiment) -> Self {
        ScoredArticle {
            article,
            sentiment,
            impact_score: None,
            degraded: false,
        }
    }

    pub fn degraded(article: NewsArticle) -> Self {
        ScoredArticle {
            article,
            sentiment: Sentiment::NEUTRAL,
            impact_score: None,
            degraded: true,
        }
    }

    pub fn source(&self) -> &str {
        &self.article.source
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.article.published_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedSentiment {
    pub value: f64,
    pub consensus: f64,
}

impl WeightedSentiment {
    pub const EMPTY: WeightedSentiment = WeightedSentiment {
        value: 0.0,
        consensus: 0.0,
    };

    pub fn adjusted(&self) -> f64 {
        self.value * self.consensus
    }
}

/// Метка риска, от самой благоприятной к самой рискованной.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Safe Investment")]
    SafeInvestment,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Very High Risk")]
    VeryHighRisk,
}

impl RiskLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::SafeInvestment => "Safe Investment",
            RiskLabel::ModerateRisk => "Moderate Risk",
            RiskLabel::HighRisk => "High Risk",
            RiskLabel::VeryHighRisk => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default)]
    pub volume: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "30D")]
    ThirtyDays,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::OneDay, Horizon::SevenDays, Horizon::ThirtyDays];

    pub fn days(&self) -> u64 {
        match self {
            Horizon::OneDay => 1,
            Horizon::SevenDays => 7,
            Horizon::ThirtyDays => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::OneDay => "1D",
            Horizon::SevenDays => "7D",
            Horizon::ThirtyDays => "30D",
        }
    }
}

/// Доходность на горизонте. Нулевая доходность и отсутствие данных различаются.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HorizonReturn {
    Computed { close: f64, return_pct: f64 },
    #[default]
    NoData,
}

impl HorizonReturn {
    pub fn return_pct(&self) -> Option<f64> {
        match self {
            HorizonReturn::Computed { return_pct, .. } => Some(*return_pct),
            HorizonReturn::NoData => None,
        }
    }

    pub fn close(&self) -> Option<f64> {
        match self {
            HorizonReturn::Computed { close, .. } => Some(*close),
            HorizonReturn::NoData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub company: String,
    pub date: NaiveDate,
    pub sentiment_avg: f64,
    pub risk_label: RiskLabel,
    pub article_count: usize,

    // Заполняются только при бэктесте
    #[serde(default)]
    pub open_price: Option<f64>,
    #[serde(default)]
    pub return_1d: HorizonReturn,
    #[serde(default)]
    pub return_7d: HorizonReturn,
    #[serde(default)]
    pub return_30d: HorizonReturn,
}

impl ClassificationRecord {
    pub fn new(
        company: impl Into<String>,
        date: NaiveDate,
        sentiment_avg: f64,
        risk_label: RiskLabel,
        article_count: usize,
    ) -> Self {
        ClassificationRecord {
            company: company.into(),
            date,
            sentiment_avg,
            risk_label,
            article_count,
            open_price: None,
            return_1d: HorizonReturn::NoData,
            return_7d: HorizonReturn::NoData,
            return_30d: HorizonReturn::NoData,
        }
    }

    pub fn horizon(&self, horizon: Horizon) -> &HorizonReturn {
        match horizon {
            Horizon::OneDay => &self.return_1d,
            Horizon::SevenDays => &self.return_7d,
            Horizon::ThirtyDays => &self.return_30d,
        }
    }

    pub fn horizon_mut(&mut self, horizon: Horizon) -> &mut HorizonReturn {
        match horizon {
            Horizon::OneDay => &mut self.return_1d,
            Horizon::SevenDays => &mut self.return_7d,
            Horizon::ThirtyDays => &mut self.return_30d,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyAnalysis {
    pub company: String,
    /// Отсортированы по impact score, самые влиятельные первыми
    pub articles: Vec<ScoredArticle>,
    pub weighted_sentiment: f64,
    pub consensus: f64,
    pub risk_label: RiskLabel,
    pub total_articles: usize,
    pub degraded_articles: usize,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizonAccuracy {
    pub horizon: Horizon,
    pub correct: usize,
    pub evaluated: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub company: String,
    pub ticker: String,
    pub total_analyses: usize,
    pub records_without_price: usize,
    pub accuracy_1d: HorizonAccuracy,
    pub accuracy_7d: HorizonAccuracy,
    pub accuracy_30d: HorizonAccuracy,
    pub entries: Vec<ClassificationRecord>,
}

impl BacktestResult {
    pub fn accuracy(&self, horizon: Horizon) -> &HorizonAccuracy {
        match horizon {
            Horizon::OneDay => &self.accuracy_1d,
            Horizon::SevenDays => &self.accuracy_7d,
            Horizon::ThirtyDays => &self.accuracy_30d,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub sentiment: f64,
    pub predicted_risk: RiskLabel,
    pub actual_return: f64,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub company: String,
    pub ticker: String,
    pub test_periods: usize,
    pub skipped_periods: usize,
    pub accuracy: f64,
    pub avg_return: f64,
    pub predictions: Vec<Prediction>,
}

impl ValidationResult {
    pub fn correct_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.correct).count()
    }
}
