use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::errors::BiasEngineError;
use crate::models::NewsArticle;
use crate::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub company: String,
    pub articles: Vec<NewsArticle>,
}

#[derive(Deserialize)]
pub struct BacktestRequest {
    pub company: String,
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub max_concurrent_requests: usize,
    pub available_endpoints: Vec<String>,
}

fn error_body(error_type: &str, e: &BiasEngineError) -> Json<Value> {
    Json(json!({
        "status": "error",
        "message": e.to_string(),
        "error_type": error_type
    }))
}

fn to_json<T: Serialize>(value: &T) -> Result<Json<Value>, StatusCode> {
    serde_json::to_value(value).map(Json).map_err(|e| {
        tracing::error!("Ошибка сериализации ответа: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

// Оценка риска по уже собранным статьям
pub async fn analyze_company(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>, StatusCode> {
    if req.company.trim().is_empty() {
        tracing::warn!("Пустое название компании");
        return Err(StatusCode::BAD_REQUEST);
    }

    tracing::info!("Анализ {} по {} статьям", req.company, req.articles.len());

    match state.analysis.analyze_company(&req.company, req.articles).await {
        Ok(analysis) => to_json(&analysis),
        Err(e) => {
            tracing::error!("Ошибка анализа: {}", e);
            Ok(error_body("analysis_error", &e))
        }
    }
}

pub async fn run_backtest(
    State(state): State<AppState>,
    Json(req): Json<BacktestRequest>,
) -> Result<Json<Value>, StatusCode> {
    if req.start_date > req.end_date {
        tracing::warn!("Некорректный период: {} - {}", req.start_date, req.end_date);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state
        .backtest
        .run_backtest(&req.company, &req.ticker, req.start_date, req.end_date)
        .await
    {
        Ok(result) => to_json(&result),
        Err(e) => {
            tracing::error!("Ошибка бэктеста: {}", e);
            Ok(error_body("backtest_error", &e))
        }
    }
}

pub async fn run_validation(
    State(state): State<AppState>,
    Json(req): Json<BacktestRequest>,
) -> Result<Json<Value>, StatusCode> {
    if req.start_date >= req.end_date {
        tracing::warn!("Некорректный период: {} - {}", req.start_date, req.end_date);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state
        .validation
        .validate_company(&req.company, &req.ticker, req.start_date, req.end_date)
        .await
    {
        Ok(result) => to_json(&result),
        Err(e) => {
            tracing::error!("Ошибка проверки методологии: {}", e);
            Ok(error_body("validation_error", &e))
        }
    }
}

// Проверка здоровья сервиса
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Bias Engine API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ready".to_string(),
        max_concurrent_requests: state.max_concurrent_requests,
        available_endpoints: vec![
            "/".to_string(),
            "/status".to_string(),
            "/api/analyze".to_string(),
            "/api/backtest".to_string(),
            "/api/validate".to_string(),
        ],
    })
}

// Создание маршрутов
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/status", get(get_status))
        .route("/api/analyze", post(analyze_company))
        .route("/api/backtest", post(run_backtest))
        .route("/api/validate", post(run_validation))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}
