use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ScoredArticle, Sentiment};

/// Веса компонентов impact score. По умолчанию 30/20/30/20.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactWeights {
    pub credibility: f64,
    pub recency: f64,
    pub magnitude: f64,
    pub confidence: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        ImpactWeights {
            credibility: 0.3,
            recency: 0.2,
            magnitude: 0.3,
            confidence: 0.2,
        }
    }
}

impl ImpactWeights {
    pub fn total(&self) -> f64 {
        self.credibility + self.recency + self.magnitude + self.confidence
    }
}

/// Известные финансовые издания и их достоверность
pub fn default_credibility_table() -> HashMap<String, f64> {
    [
        ("Reuters", 1.0),
        ("Bloomberg", 1.0),
        ("Wall Street Journal", 1.0),
        ("Financial Times", 0.95),
        ("CNBC", 0.9),
        ("Barron's", 0.9),
        ("MarketWatch", 0.85),
        ("Forbes", 0.85),
        ("Investor's Business", 0.8),
        ("Seeking Alpha", 0.75),
        ("Yahoo Finance", 0.75),
        ("Motley Fool", 0.7),
        ("Investing.com", 0.7),
    ]
    .into_iter()
    .map(|(source, credibility)| (source.to_string(), credibility))
    .collect()
}

pub const DEFAULT_CREDIBILITY: f64 = 0.5;

/// Таблица достоверности источников. Сравнение без учёта регистра.
#[derive(Debug, Clone)]
pub struct SourceCredibility {
    table: HashMap<String, f64>,
    default: f64,
}

impl SourceCredibility {
    pub fn new(table: HashMap<String, f64>, default: f64) -> Self {
        let table = table
            .into_iter()
            .map(|(source, credibility)| (normalize_source(&source), credibility))
            .collect();
        SourceCredibility { table, default }
    }

    pub fn lookup(&self, source: &str) -> f64 {
        self.table
            .get(&normalize_source(source))
            .copied()
            .unwrap_or(self.default)
    }
}

impl Default for SourceCredibility {
    fn default() -> Self {
        SourceCredibility::new(default_credibility_table(), DEFAULT_CREDIBILITY)
    }
}

fn normalize_source(source: &str) -> String {
    source.trim().to_lowercase()
}

/// Компоненты impact score, каждый в диапазоне 0..1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactComponents {
    pub credibility: f64,
    pub recency: f64,
    pub magnitude: f64,
    pub confidence: f64,
}

impl ImpactComponents {
    pub fn combine(&self, weights: &ImpactWeights) -> f64 {
        self.credibility * weights.credibility
            + self.recency * weights.recency
            + self.magnitude * weights.magnitude
            + self.confidence * weights.confidence
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImpactScorer {
    credibility: SourceCredibility,
    weights: ImpactWeights,
}

impl ImpactScorer {
    pub fn new(credibility: SourceCredibility, weights: ImpactWeights) -> Self {
        ImpactScorer {
            credibility,
            weights,
        }
    }

    /// Затухает вдвое примерно за первые сутки. Статьи "из будущего" считаются свежими.
    pub fn recency(published_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let hours_old = ((now - published_at).num_seconds() as f64 / 3600.0).max(0.0);
        1.0 / (1.0 + hours_old / 24.0)
    }

    /// Насколько тональность далека от нейтральной
    pub fn magnitude(sentiment: &Sentiment) -> f64 {
        sentiment.score().abs()
    }

    /// Уверенность модели в самом вероятном классе
    pub fn confidence(sentiment: &Sentiment) -> f64 {
        sentiment
            .positive
            .max(sentiment.neutral)
            .max(sentiment.negative)
    }

    pub fn components(&self, article: &ScoredArticle, now: DateTime<Utc>) -> ImpactComponents {
        ImpactComponents {
            credibility: self.credibility.lookup(article.source()),
            recency: Self::recency(article.published_at(), now),
            magnitude: Self::magnitude(&article.sentiment),
            confidence: Self::confidence(&article.sentiment),
        }
    }

    pub fn score(&self, article: &ScoredArticle, now: DateTime<Utc>) -> f64 {
        self.components(article, now).combine(&self.weights)
    }

    pub fn assign(&self, articles: &mut [ScoredArticle], now: DateTime<Utc>) {
        for article in articles.iter_mut() {
            article.impact_score = Some(self.score(article, now));
        }
    }

    /// Назначает impact score и сортирует статьи, самые влиятельные первыми
    pub fn rank_by_impact(
        &self,
        mut articles: Vec<ScoredArticle>,
        now: DateTime<Utc>,
    ) -> Vec<ScoredArticle> {
        self.assign(&mut articles, now);
        articles.sort_by(|a, b| {
            let a = a.impact_score.unwrap_or(0.0);
            let b = b.impact_score.unwrap_or(0.0);
            b.total_cmp(&a)
        });
        articles
    }
}
