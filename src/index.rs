use crate::types::config::IndexConfig;
use crate::types::scoring::{Badge, Dimension, FinalIndex, Points, Ratings, Tier};
use tracing::info;

/// Sums the four dimension totals into the attractiveness index.
pub fn compose(ratings: &Ratings, config: &IndexConfig) -> FinalIndex {
    let sum: Points = ratings.tables().map(|table| table.total()).sum();
    let value = sum.round() as i64;
    let tier = if value > config.favorable_threshold {
        Tier::Favorable
    } else {
        Tier::Unfavorable
    };
    info!(index = value, %tier, "composed attractiveness index");
    FinalIndex { value, tier }
}

pub fn badges(ratings: &Ratings, config: &IndexConfig) -> Vec<Badge> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let threshold = match dimension {
                Dimension::Visibility => config.badges.visibility,
                Dimension::Access => config.badges.access,
                Dimension::Population => config.badges.population,
                Dimension::District => config.badges.district,
            };
            let total = ratings.table(dimension).total();
            Badge {
                dimension,
                total,
                tier: if total > threshold {
                    Tier::Favorable
                } else {
                    Tier::Unfavorable
                },
            }
        })
        .collect()
}
