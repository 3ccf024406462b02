use crate::models::{ScoredArticle, WeightedSentiment};

/// Сводит оценки статей в одну оценку по компании, взвешивая по impact score.
pub struct WeightedAggregator;

impl WeightedAggregator {
    /// Статья без назначенного impact score входит с нулевым весом.
    pub fn aggregate(articles: &[ScoredArticle]) -> WeightedSentiment {
        Self::aggregate_scores(
            articles
                .iter()
                .map(|a| (a.sentiment.score(), a.impact_score.unwrap_or(0.0))),
        )
    }

    /// Пары (оценка, вес). Нулевой суммарный вес даёт (0, 0).
    pub fn aggregate_scores<I>(scored: I) -> WeightedSentiment
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let scored: Vec<(f64, f64)> = scored.into_iter().collect();

        let total_weight: f64 = scored.iter().map(|(_, weight)| weight).sum();
        if scored.is_empty() || total_weight == 0.0 {
            return WeightedSentiment::EMPTY;
        }

        let mean = scored
            .iter()
            .map(|(score, weight)| score * weight)
            .sum::<f64>()
            / total_weight;

        // Взвешенная дисперсия вокруг того же среднего
        let variance = scored
            .iter()
            .map(|(score, weight)| weight * (score - mean).powi(2))
            .sum::<f64>()
            / total_weight;
        let std_dev = variance.sqrt();

        WeightedSentiment {
            value: mean,
            consensus: 1.0 / (1.0 + std_dev),
        }
    }
}
