pub mod aggregate;
pub mod impact;
pub mod risk;

pub use aggregate::WeightedAggregator;
pub use impact::{ImpactComponents, ImpactScorer, ImpactWeights, SourceCredibility};
pub use risk::{RiskClassifier, RiskThresholds};
