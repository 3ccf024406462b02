use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use futures::stream::{self, StreamExt};

use crate::config::AppConfig;
use crate::errors::{BiasEngineError, Result};
use crate::models::{ClassificationRecord, CompanyAnalysis, NewsArticle, ScoredArticle, Sentiment};
use crate::providers::{ClassificationHistoryStore, SentimentClassifier};
use crate::scoring::{ImpactScorer, RiskClassifier, WeightedAggregator};

/// Прогоняет статьи через классификатор пулом из `max_concurrent` задач.
///
/// Каждая задача пишет только в свой слот по индексу статьи. Ошибка или
/// таймаут одного вызова заменяется нейтральной оценкой и не отменяет остальные.
pub async fn classify_articles(
    classifier: Arc<dyn SentimentClassifier>,
    articles: Vec<NewsArticle>,
    max_concurrent: usize,
    call_timeout: Duration,
) -> Vec<ScoredArticle> {
    let mut slots: Vec<Option<Sentiment>> = vec![None; articles.len()];

    {
        let tasks: Vec<_> = articles
            .iter()
            .enumerate()
            .map(|(idx, article)| {
                let classifier = classifier.clone();
                let text = article.classifier_text().to_string();
                async move {
                    let outcome = match tokio::time::timeout(call_timeout, classifier.analyze(&text)).await {
                        Ok(result) => result,
                        Err(_) => Err(BiasEngineError::ClassifierTimeout(call_timeout.as_secs())),
                    };
                    (idx, outcome)
                }
            })
            .collect();

        let mut results = stream::iter(tasks).buffer_unordered(max_concurrent.max(1));
        while let Some((idx, outcome)) = results.next().await {
            match outcome {
                Ok(sentiment) => {
                    tracing::debug!("Обработана статья {}", idx);
                    slots[idx] = Some(sentiment);
                }
                Err(e) => {
                    tracing::warn!("Ошибка анализа статьи {}: {}, используем нейтральную оценку", idx, e);
                }
            }
        }
    }

    articles
        .into_iter()
        .zip(slots)
        .map(|(article, slot)| match slot {
            Some(sentiment) => ScoredArticle::new(article, sentiment),
            None => ScoredArticle::degraded(article),
        })
        .collect()
}

#[derive(Clone)]
pub struct AnalysisService {
    classifier: Arc<dyn SentimentClassifier>,
    history: Arc<dyn ClassificationHistoryStore>,
    scorer: ImpactScorer,
    risk: RiskClassifier,
    max_concurrent: usize,
    classifier_timeout: Duration,
}

impl AnalysisService {
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        history: Arc<dyn ClassificationHistoryStore>,
        config: &AppConfig,
    ) -> Self {
        AnalysisService {
            classifier,
            history,
            scorer: config.scoring.impact_scorer(),
            risk: config.scoring.risk_classifier(),
            max_concurrent: config.max_concurrent_requests,
            classifier_timeout: config.classifier_timeout(),
        }
    }

    /// Анализ на сегодня; результат сохраняется в историю.
    pub async fn analyze_company(&self, company: &str, articles: Vec<NewsArticle>) -> Result<CompanyAnalysis> {
        let today = Utc::now().date_naive();
        self.run(company, articles, today).await
    }

    /// Та же оценка, но запись в истории датируется прошедшим днём.
    /// Нужна для наполнения истории перед бэктестом.
    pub async fn record_historical_analysis(
        &self,
        company: &str,
        date: NaiveDate,
        articles: Vec<NewsArticle>,
    ) -> Result<CompanyAnalysis> {
        tracing::info!("Историческая оценка {} на {}", company, date);
        self.run(company, articles, date).await
    }

    async fn run(&self, company: &str, articles: Vec<NewsArticle>, record_date: NaiveDate) -> Result<CompanyAnalysis> {
        if articles.is_empty() {
            return Err(BiasEngineError::NoArticles(company.to_string()));
        }

        let started = std::time::Instant::now();
        let scored = classify_articles(
            self.classifier.clone(),
            articles,
            self.max_concurrent,
            self.classifier_timeout,
        )
        .await;
        tracing::info!("Классифицировано {} статей за {:?}", scored.len(), started.elapsed());

        let analysis = self.score(company, scored, Utc::now());

        self.history
            .append(ClassificationRecord::new(
                company,
                record_date,
                analysis.weighted_sentiment,
                analysis.risk_label,
                analysis.total_articles,
            ))
            .await?;

        Ok(analysis)
    }

    /// Синхронная часть: impact score, агрегирование и метка риска.
    pub fn score(&self, company: &str, articles: Vec<ScoredArticle>, now: DateTime<Utc>) -> CompanyAnalysis {
        let articles = self.scorer.rank_by_impact(articles, now);
        let weighted = WeightedAggregator::aggregate(&articles);
        let risk_label = self.risk.classify_sentiment(&weighted);
        let degraded_articles = articles.iter().filter(|a| a.degraded).count();

        tracing::info!(
            "{}: sentiment={:.3}, consensus={:.3}, риск={}, статей={}, с заглушкой={}",
            company,
            weighted.value,
            weighted.consensus,
            risk_label,
            articles.len(),
            degraded_articles
        );

        CompanyAnalysis {
            company: company.to_string(),
            total_articles: articles.len(),
            articles,
            weighted_sentiment: weighted.value,
            consensus: weighted.consensus,
            risk_label,
            degraded_articles,
            last_updated: now,
        }
    }
}
