pub mod accuracy;
pub mod evaluator;
pub mod lookup;
pub mod validation;

pub use accuracy::{accuracy_percentage, AccuracyRuleSet};
pub use evaluator::{price_window, BacktestEvaluator};
pub use lookup::{PriceSeries, PriceWindowLookup, ReturnCalculator};
pub use validation::{cadence_dates, stand_in_signal};
