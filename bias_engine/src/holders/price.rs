use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::backtest::{PriceSeries, PriceWindowLookup};
use crate::errors::Result;
use crate::models::PricePoint;
use crate::providers::PriceSeriesProvider;

/// Цены по тикерам в памяти процесса. Поиск цены на дату идёт вперёд
/// в пределах `lookup`, как у внешнего сервиса котировок.
#[derive(Clone)]
pub struct PriceSeriesHolder {
    prices: Arc<Mutex<HashMap<String, Vec<PricePoint>>>>,
    lookup: PriceWindowLookup,
}

impl Default for PriceSeriesHolder {
    fn default() -> Self {
        PriceSeriesHolder::new(PriceWindowLookup::default())
    }
}

impl PriceSeriesHolder {
    pub fn new(lookup: PriceWindowLookup) -> Self {
        PriceSeriesHolder {
            prices: Arc::new(Mutex::new(HashMap::new())),
            lookup,
        }
    }

    pub async fn add(&self, ticker: &str, price: PricePoint) -> Result<()> {
        let mut prices = self.prices.lock().await;
        prices.entry(ticker.to_string()).or_default().push(price);
        Ok(())
    }

    pub async fn extend<I>(&self, ticker: &str, points: I) -> Result<()>
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let mut prices = self.prices.lock().await;
        prices.entry(ticker.to_string()).or_default().extend(points);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        let mut prices = self.prices.lock().await;
        prices.clear();
        Ok(())
    }

    pub async fn get(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        let prices = self.prices.lock().await;
        Ok(prices.get(ticker).cloned().unwrap_or_default())
    }

    pub async fn len(&self, ticker: &str) -> Result<usize> {
        let prices = self.prices.lock().await;
        Ok(prices.get(ticker).map_or(0, |p| p.len()))
    }
}

#[async_trait]
impl PriceSeriesProvider for PriceSeriesHolder {
    async fn get_range(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>> {
        let prices = self.prices.lock().await;
        let mut range: Vec<PricePoint> = prices
            .get(ticker)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        range.sort_by_key(|p| p.date);
        Ok(range)
    }

    async fn get_on_date(&self, ticker: &str, date: NaiveDate) -> Result<Option<PricePoint>> {
        let prices = self.prices.lock().await;
        let Some(points) = prices.get(ticker) else {
            return Ok(None);
        };
        let series = PriceSeries::from_points(points.iter().cloned());
        Ok(self.lookup.resolve(&series, date).cloned())
    }
}
