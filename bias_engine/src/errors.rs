// errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiasEngineError {
    #[error("Ошибка HTTP запроса: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Ошибка regex: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Классификатор не ответил за {0} с")]
    ClassifierTimeout(u64),

    #[error("Нет статей для анализа компании {0}")]
    NoArticles(String),

    #[error("Нет исторических анализов для {0}")]
    NoHistoricalData(String),

    #[error("Данные о ценах недоступны: {0}")]
    PriceDataUnavailable(String),

    #[error("Некорректный диапазон дат: {0}")]
    InvalidDateRange(String),

    #[error("Некорректный формат данных: {0}")]
    InvalidDataFormat(String),

    #[error("API вернул ошибку: {0}")]
    ApiError(String),
}

// Определяем псевдоним Result с фиксированным типом ошибки
pub type Result<T> = std::result::Result<T, BiasEngineError>;
