use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use anyhow::Result;
use chrono::Weekday;
use config::Config;
use serde::Deserialize;

use crate::backtest::{AccuracyRuleSet, PriceWindowLookup};
use crate::scoring::impact::{default_credibility_table, DEFAULT_CREDIBILITY};
use crate::scoring::{ImpactScorer, ImpactWeights, RiskClassifier, RiskThresholds, SourceCredibility};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_addr: String,
    pub nlp_service_url: String,
    pub stock_service_url: String,
    pub stock_request_timeout_secs: u64,
    /// Размер пула воркеров классификатора
    pub max_concurrent_requests: usize,
    /// Таймаут одного вызова классификатора
    pub classifier_timeout_secs: u64,
    /// Если задан, логи дополнительно пишутся в ротируемый файл
    pub log_dir: Option<String>,
    pub scoring: ScoringConfig,
    pub backtest: BacktestConfig,
    pub validation: ValidationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server_addr: "0.0.0.0:8080".to_string(),
            nlp_service_url: "http://localhost:8000".to_string(),
            stock_service_url: "http://localhost:8001".to_string(),
            stock_request_timeout_secs: 30,
            max_concurrent_requests: 10,
            classifier_timeout_secs: 15,
            log_dir: None,
            scoring: ScoringConfig::default(),
            backtest: BacktestConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub impact_weights: ImpactWeights,
    /// Достоверность источника, 0..1
    pub source_credibility: HashMap<String, f64>,
    /// Для источников, которых нет в таблице
    pub default_credibility: f64,
    pub thresholds: RiskThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            impact_weights: ImpactWeights::default(),
            source_credibility: default_credibility_table(),
            default_credibility: DEFAULT_CREDIBILITY,
            thresholds: RiskThresholds::default(),
        }
    }
}

impl ScoringConfig {
    pub fn impact_scorer(&self) -> ImpactScorer {
        ImpactScorer::new(
            SourceCredibility::new(self.source_credibility.clone(), self.default_credibility),
            self.impact_weights,
        )
    }

    pub fn risk_classifier(&self) -> RiskClassifier {
        RiskClassifier::new(self.thresholds)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Сколько дней вперёд искать цену, если на дату торгов не было
    pub forward_tolerance_days: u32,
    /// Дней до начала периода (цены открытия)
    pub lead_days: u32,
    /// Дней после конца периода (закрытия на 30 дней вперёд)
    pub trail_days: u32,
    pub rule_set: AccuracyRuleSet,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            forward_tolerance_days: 5,
            lead_days: 5,
            trail_days: 35,
            rule_set: AccuracyRuleSet::Backtest,
        }
    }
}

impl BacktestConfig {
    pub fn lookup(&self) -> PriceWindowLookup {
        PriceWindowLookup::new(self.forward_tolerance_days)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub weekday: Weekday,
    pub cadence_days: u32,
    pub horizon_days: u32,
    pub lookback_months: u32,
    pub rule_set: AccuracyRuleSet,
    /// Компания -> тикер
    pub companies: BTreeMap<String, String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        let companies = [
            ("Tesla", "TSLA"),
            ("Apple", "AAPL"),
            ("Google", "GOOGL"),
            ("Microsoft", "MSFT"),
            ("Amazon", "AMZN"),
        ]
        .into_iter()
        .map(|(company, ticker)| (company.to_string(), ticker.to_string()))
        .collect();

        ValidationConfig {
            weekday: Weekday::Mon,
            cadence_days: 7,
            horizon_days: 7,
            lookback_months: 3,
            rule_set: AccuracyRuleSet::Validation,
            companies,
        }
    }
}

impl AppConfig {
    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    pub fn stock_request_timeout(&self) -> Duration {
        Duration::from_secs(self.stock_request_timeout_secs)
    }

    /// Валидация конфигурации
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_requests == 0 || self.max_concurrent_requests > 50 {
            return Err(anyhow::anyhow!("max_concurrent_requests must be between 1 and 50"));
        }

        if self.classifier_timeout_secs == 0 {
            return Err(anyhow::anyhow!("classifier_timeout_secs must be positive"));
        }

        if self.nlp_service_url.is_empty() || self.stock_service_url.is_empty() {
            return Err(anyhow::anyhow!("service URLs cannot be empty"));
        }

        let weights = &self.scoring.impact_weights;
        let all_weights = [weights.credibility, weights.recency, weights.magnitude, weights.confidence];
        if all_weights.iter().any(|w| *w < 0.0) || weights.total() <= 0.0 {
            return Err(anyhow::anyhow!("impact weights must be non-negative with a positive sum"));
        }

        let credibility_in_range = |c: f64| (0.0..=1.0).contains(&c);
        if !credibility_in_range(self.scoring.default_credibility)
            || !self.scoring.source_credibility.values().all(|c| credibility_in_range(*c))
        {
            return Err(anyhow::anyhow!("source credibility must be between 0 and 1"));
        }

        if !self.scoring.thresholds.is_descending() {
            return Err(anyhow::anyhow!("risk thresholds must be strictly descending"));
        }

        if self.validation.cadence_days == 0 || self.validation.horizon_days == 0 {
            return Err(anyhow::anyhow!("validation cadence and horizon must be positive"));
        }

        Ok(())
    }
}

pub fn load_config() -> Result<AppConfig> {
    // Загружаем .env файл
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(
            config::Environment::with_prefix("BIAS_ENGINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;

    Ok(config)
}
