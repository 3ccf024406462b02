use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::errors::{BiasEngineError, Result};
use crate::models::PricePoint;
use crate::providers::PriceSeriesProvider;

/// Клиент сервиса котировок (`/stock_data`, `/stock_price`).
#[derive(Clone)]
pub struct HttpPriceClient {
    client: Client,
    base_url: String,
}

// Ответ /stock_price: сервис сам выбирает ближайший торговый день
#[derive(Deserialize)]
struct StockPriceResponse {
    actual_date: NaiveDate,
    open: f64,
    close: f64,
    high: f64,
    low: f64,
    #[serde(default)]
    volume: i64,
}

impl From<StockPriceResponse> for PricePoint {
    fn from(r: StockPriceResponse) -> Self {
        PricePoint {
            date: r.actual_date,
            open: r.open,
            close: r.close,
            high: r.high,
            low: r.low,
            volume: r.volume,
        }
    }
}

impl HttpPriceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new().timeout(timeout).build()?;
        Ok(HttpPriceClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.stock_service_url, config.stock_request_timeout())
    }
}

#[async_trait]
impl PriceSeriesProvider for HttpPriceClient {
    async fn get_range(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<PricePoint>> {
        let payload = json!({
            "ticker": ticker,
            "start_date": start.format("%Y-%m-%d").to_string(),
            "end_date": end.format("%Y-%m-%d").to_string(),
        });

        tracing::info!("Запрос цен {} с {} по {}", ticker, start, end);

        let response = self
            .client
            .post(format!("{}/stock_data", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Неизвестная ошибка".to_string());
            return Err(BiasEngineError::ApiError(format!(
                "сервис котировок вернул {} - {}",
                status, error_text
            )));
        }

        let mut prices: Vec<PricePoint> = response.json().await?;
        prices.sort_by_key(|p| p.date);
        tracing::info!("Получено {} дней котировок {}", prices.len(), ticker);
        Ok(prices)
    }

    async fn get_on_date(&self, ticker: &str, date: NaiveDate) -> Result<Option<PricePoint>> {
        let payload = json!({
            "ticker": ticker,
            "date": date.format("%Y-%m-%d").to_string(),
        });

        let response = self
            .client
            .post(format!("{}/stock_price", self.base_url))
            .json(&payload)
            .send()
            .await?;

        // Любой не-200 ответ означает, что цены на дату нет
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Нет цены {} на {}: {}", ticker, date, status);
            return Ok(None);
        }

        let price: StockPriceResponse = response.json().await?;
        Ok(Some(price.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> HttpPriceClient {
        HttpPriceClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn range_is_sorted_by_date() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stock_data"))
            .and(body_string_contains("\"start_date\":\"2025-03-01\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"date": "2025-03-04", "open": 11.0, "close": 12.0, "high": 12.5, "low": 10.5, "volume": 900},
                {"date": "2025-03-03", "open": 10.0, "close": 11.0, "high": 11.5, "low": 9.5, "volume": 1000}
            ])))
            .mount(&server)
            .await;

        let prices = client(&server.uri())
            .get_range("AAPL", date(2025, 3, 1), date(2025, 3, 10))
            .await
            .unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].date, date(2025, 3, 3));
        assert_eq!(prices[1].volume, 900);
    }

    #[tokio::test]
    async fn range_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stock_data"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = client(&server.uri())
            .get_range("AAPL", date(2025, 3, 1), date(2025, 3, 10))
            .await;
        assert!(matches!(result, Err(BiasEngineError::ApiError(_))));
    }

    #[tokio::test]
    async fn price_on_date_uses_actual_trading_day() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stock_price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ticker": "TSLA",
                "requested_date": "2025-03-08",
                "actual_date": "2025-03-10",
                "open": 250.0, "close": 255.0, "high": 260.0, "low": 248.0
            })))
            .mount(&server)
            .await;

        let price = client(&server.uri())
            .get_on_date("TSLA", date(2025, 3, 8))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(price.date, date(2025, 3, 10));
        assert_eq!(price.close, 255.0);
        assert_eq!(price.volume, 0);
    }

    #[tokio::test]
    async fn missing_price_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stock_price"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let price = client(&server.uri()).get_on_date("TSLA", date(2025, 3, 8)).await.unwrap();
        assert!(price.is_none());
    }

    #[tokio::test]
    async fn price_server_error_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/stock_price"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream failed"))
            .mount(&server)
            .await;

        let price = client(&server.uri()).get_on_date("TSLA", date(2025, 3, 8)).await.unwrap();
        assert!(price.is_none());
    }

    #[tokio::test]
    async fn unreachable_price_service_is_an_error() {
        // Порт без сервера: ошибка транспорта, а не отсутствие цены
        let result = client("http://127.0.0.1:1").get_on_date("TSLA", date(2025, 3, 8)).await;
        assert!(matches!(result, Err(BiasEngineError::HttpError(_))));
    }
}
