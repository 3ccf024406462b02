pub mod history;
pub mod price;

pub use history::ClassificationHistoryHolder;
pub use price::PriceSeriesHolder;
