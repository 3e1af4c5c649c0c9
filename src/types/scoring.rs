use crate::types::measurement::RawValue;
use serde::Serialize;
use std::fmt;

pub type Points = f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Access,
    Visibility,
    Population,
    District,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Visibility,
        Dimension::Access,
        Dimension::Population,
        Dimension::District,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Dimension::Access => "Access",
            Dimension::Visibility => "Visibility",
            Dimension::Population => "Population",
            Dimension::District => "District",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedRow {
    pub label: String,
    pub raw: RawValue,
    pub score: Points,
    pub cap: Points,
}

impl RatedRow {
    pub fn new(label: &str, raw: RawValue, score: Points, cap: Points) -> Self {
        debug_assert!(
            (0.0..=cap).contains(&score),
            "{label}: score {score} outside [0, {cap}]"
        );
        Self {
            label: label.to_string(),
            raw,
            score,
            cap,
        }
    }
}

/// Rated rows of one dimension. The total is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingTable {
    dimension: Dimension,
    rows: Vec<RatedRow>,
    total: Points,
}

impl RatingTable {
    pub fn new(dimension: Dimension, rows: Vec<RatedRow>) -> Self {
        let total = rows.iter().map(|row| row.score).sum();
        Self {
            dimension,
            rows,
            total,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn rows(&self) -> &[RatedRow] {
        &self.rows
    }

    pub fn total(&self) -> Points {
        self.total
    }

    pub fn max_total(&self) -> Points {
        self.rows.iter().map(|row| row.cap).sum()
    }

    #[cfg(test)]
    pub fn row(&self, label: &str) -> Option<&RatedRow> {
        self.rows.iter().find(|row| row.label == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ratings {
    pub visibility: RatingTable,
    pub access: RatingTable,
    pub population: RatingTable,
    pub district: RatingTable,
}

impl Ratings {
    pub fn table(&self, dimension: Dimension) -> &RatingTable {
        match dimension {
            Dimension::Access => &self.access,
            Dimension::Visibility => &self.visibility,
            Dimension::Population => &self.population,
            Dimension::District => &self.district,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &RatingTable> {
        Dimension::ALL.into_iter().map(|dimension| self.table(dimension))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Favorable,
    Unfavorable,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Favorable => f.write_str("favorable"),
            Tier::Unfavorable => f.write_str("unfavorable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalIndex {
    pub value: i64,
    pub tier: Tier,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Badge {
    pub dimension: Dimension,
    pub total: Points,
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_total_is_sum_of_row_scores() {
        let table = RatingTable::new(
            Dimension::District,
            vec![
                RatedRow::new("hotel", RawValue::Count(3), 1.5, 6.0),
                RatedRow::new("cinema", RawValue::Count(1), 2.0, 2.0),
            ],
        );
        assert!((table.total() - 3.5).abs() < f64::EPSILON);
        assert!((table.max_total() - 8.0).abs() < f64::EPSILON);
        assert_eq!(table.row("cinema").map(|row| row.score), Some(2.0));
    }

    #[test]
    fn empty_table_totals_zero() {
        let table = RatingTable::new(Dimension::Access, Vec::new());
        assert_eq!(table.total(), 0.0);
    }
}
