//! Внешние зависимости движка. Движок работает только через эти трейты.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{ClassificationRecord, PricePoint, Sentiment};

/// Модель тональности: текст -> распределение positive/neutral/negative.
#[async_trait]
pub trait SentimentClassifier: Send + Sync + 'static {
    async fn analyze(&self, text: &str) -> Result<Sentiment>;
}

#[async_trait]
pub trait PriceSeriesProvider: Send + Sync + 'static {
    /// Дневные цены за период по возрастанию дат; в ряду бывают пропуски.
    async fn get_range(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>>;

    /// `Ok(None)`, если цены на дату нет.
    async fn get_on_date(&self, ticker: &str, date: NaiveDate) -> Result<Option<PricePoint>>;
}

#[async_trait]
pub trait ClassificationHistoryStore: Send + Sync + 'static {
    /// Записи компании в диапазоне дат включительно, по возрастанию дат.
    async fn query(&self, company: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ClassificationRecord>>;

    async fn append(&self, record: ClassificationRecord) -> Result<()>;
}
