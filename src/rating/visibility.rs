use crate::error::{Result, ScoreError};
use crate::types::config::{CityProfile, Coefficients, TransitFlow};
use crate::types::measurement::{MeasurementTable, RawValue};
use crate::types::scoring::{Dimension, Points, RatedRow, RatingTable};

const SECTION: &str = "visibility";

/// Commercial fabric around the premises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityInputs {
    pub shops: u64,
    pub restaurants_bars: u64,
    pub malls: u64,
    /// Daily transit validations at nearby stations, when published.
    pub validations: Option<u64>,
}

impl VisibilityInputs {
    pub fn from_table(table: &MeasurementTable) -> Result<Self> {
        let inputs = Self {
            shops: table.count(SECTION, "shops")?,
            restaurants_bars: table.count(SECTION, "restaurants_bars")?,
            malls: table.count(SECTION, "malls")?,
            validations: table.optional_count(SECTION, "validations")?,
        };
        if inputs.restaurants_bars > inputs.shops {
            return Err(ScoreError::invalid_measurement(
                "visibility.restaurants_bars",
                format!(
                    "{} restaurants/bars exceed the {} shops counted",
                    inputs.restaurants_bars, inputs.shops
                ),
            ));
        }
        Ok(inputs)
    }

    /// Share of restaurants and bars among nearby shops, in percent.
    ///
    /// Undefined when no shop was counted.
    pub fn restaurant_bar_share(&self) -> RawValue {
        if self.shops == 0 {
            return RawValue::Undefined;
        }
        let percent = self.restaurants_bars as f64 / self.shops as f64 * 100.0;
        RawValue::Percent((percent * 100.0).round() / 100.0)
    }
}

fn shops_score(shops: u64) -> Points {
    match shops {
        100.. => 20.0,
        70..=99 => 15.0,
        40..=69 => 10.0,
        10..=39 => 5.0,
        _ => 0.0,
    }
}

/// Rewards a moderate mix: both a bar-only street and no bars at all score low.
fn restaurant_bar_score(share: RawValue, coefficients: Coefficients) -> Points {
    let RawValue::Percent(percent) = share else {
        return 0.0;
    };
    let points = if percent >= 90.0 {
        0
    } else if percent >= 70.0 {
        1
    } else if percent >= 50.0 {
        coefficients.bar_mid
    } else if percent >= 20.0 {
        coefficients.bar_max
    } else if percent >= 10.0 {
        coefficients.bar_mid
    } else {
        0
    };
    Points::from(points)
}

fn transit_row(flow: TransitFlow, validations: Option<u64>) -> Result<Option<RatedRow>> {
    match flow {
        TransitFlow::Validations { high, medium } => {
            let validations = validations
                .ok_or_else(|| ScoreError::MissingCategory(format!("{SECTION}.validations")))?;
            let score = if validations >= high {
                10.0
            } else if validations >= medium {
                5.0
            } else {
                0.0
            };
            Ok(Some(RatedRow::new(
                "Transit flow",
                RawValue::Count(validations),
                score,
                10.0,
            )))
        }
        TransitFlow::Unavailable => Ok(Some(RatedRow::new(
            "Transit flow",
            RawValue::Undefined,
            0.0,
            0.0,
        ))),
        TransitFlow::Absent => Ok(None),
    }
}

pub fn rate(
    inputs: &VisibilityInputs,
    profile: &CityProfile,
    coefficients: Coefficients,
) -> Result<RatingTable> {
    let share = inputs.restaurant_bar_share();
    let bar_cap = Points::from(coefficients.bar_max.max(coefficients.bar_mid).max(1));
    let mall = if inputs.malls > 1 {
        Points::from(coefficients.mall)
    } else {
        0.0
    };

    let mut rows = vec![
        RatedRow::new(
            "Nearby shops",
            RawValue::Count(inputs.shops),
            shops_score(inputs.shops),
            20.0,
        ),
        RatedRow::new(
            "Restaurants/bars share",
            share,
            restaurant_bar_score(share, coefficients),
            bar_cap,
        ),
        RatedRow::new(
            "Malls",
            RawValue::Count(inputs.malls),
            mall,
            Points::from(coefficients.mall),
        ),
    ];
    rows.extend(transit_row(profile.transit_flow, inputs.validations)?);

    Ok(RatingTable::new(Dimension::Visibility, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ScoringConfig;

    fn rate_for(department: u32, inputs: &VisibilityInputs) -> RatingTable {
        let cfg = ScoringConfig::default();
        let profile = cfg.profile_for_department(department);
        rate(inputs, &profile, cfg.coefficients(&profile)).expect("inputs should rate")
    }

    fn with_share(percent: u64) -> VisibilityInputs {
        VisibilityInputs {
            shops: 100,
            restaurants_bars: percent,
            malls: 0,
            validations: None,
        }
    }

    #[test]
    fn shop_count_thresholds() {
        for (shops, expected) in [(0, 0.0), (9, 0.0), (10, 5.0), (40, 10.0), (69, 10.0), (70, 15.0), (99, 15.0), (100, 20.0)] {
            assert_eq!(shops_score(shops), expected, "shops {shops}");
        }
    }

    #[test]
    fn restaurant_share_bands_are_not_monotonic() {
        let sparse = Coefficients::SPARSE;
        let cases = [
            (5.0, 0.0),
            (10.0, 4.0),
            (19.99, 4.0),
            (20.0, 7.0),
            (49.0, 7.0),
            (50.0, 4.0),
            (69.0, 4.0),
            (70.0, 1.0),
            (89.0, 1.0),
            (90.0, 0.0),
            (100.0, 0.0),
        ];
        for (percent, expected) in cases {
            assert_eq!(
                restaurant_bar_score(RawValue::Percent(percent), sparse),
                expected,
                "share {percent}%"
            );
        }
    }

    #[test]
    fn no_shops_yields_undefined_share_scoring_zero() {
        let inputs = VisibilityInputs::default();
        assert_eq!(inputs.restaurant_bar_share(), RawValue::Undefined);

        let table = rate_for(33, &inputs);
        let row = table
            .row("Restaurants/bars share")
            .expect("share row should exist");
        assert_eq!(row.raw, RawValue::Undefined);
        assert_eq!(row.score, 0.0);
    }

    #[test]
    fn share_is_rounded_to_two_decimals() {
        let inputs = VisibilityInputs {
            shops: 3,
            restaurants_bars: 1,
            ..VisibilityInputs::default()
        };
        assert_eq!(inputs.restaurant_bar_share(), RawValue::Percent(33.33));
    }

    #[test]
    fn paris_scenario_totals_thirty_four() {
        let inputs = VisibilityInputs {
            shops: 120,
            restaurants_bars: 30,
            malls: 2,
            validations: Some(25_000),
        };
        let table = rate_for(75, &inputs);
        assert_eq!(table.row("Nearby shops").map(|row| row.score), Some(20.0));
        assert_eq!(table.row("Restaurants/bars share").map(|row| row.score), Some(3.0));
        assert_eq!(table.row("Malls").map(|row| row.score), Some(1.0));
        assert_eq!(table.row("Transit flow").map(|row| row.score), Some(10.0));
        assert_eq!(table.total(), 34.0);
    }

    #[test]
    fn paris_validation_thresholds() {
        for (validations, expected) in [(9_999, 0.0), (10_000, 5.0), (19_999, 5.0), (20_000, 10.0)] {
            let inputs = VisibilityInputs {
                validations: Some(validations),
                ..VisibilityInputs::default()
            };
            let table = rate_for(75, &inputs);
            assert_eq!(
                table.row("Transit flow").map(|row| row.score),
                Some(expected),
                "validations {validations}"
            );
        }
    }

    #[test]
    fn paris_without_validations_is_rejected() {
        let cfg = ScoringConfig::default();
        let profile = cfg.profile_for_department(75);
        let err = rate(&VisibilityInputs::default(), &profile, cfg.coefficients(&profile))
            .expect_err("validations are required for Paris");
        assert!(matches!(err, ScoreError::MissingCategory(ref name) if name == "visibility.validations"));
    }

    #[test]
    fn lille_transit_row_is_fixed_at_zero() {
        let inputs = VisibilityInputs {
            validations: Some(50_000),
            ..with_share(25)
        };
        let table = rate_for(59, &inputs);
        let row = table.row("Transit flow").expect("lille shows the transit row");
        assert_eq!(row.score, 0.0);
        assert_eq!(row.raw, RawValue::Undefined);
        assert_eq!(table.row("Restaurants/bars share").map(|row| row.score), Some(3.0));
    }

    #[test]
    fn other_departments_use_sparse_coefficients_without_transit_row() {
        let inputs = VisibilityInputs {
            malls: 2,
            ..with_share(25)
        };
        for department in [33, 13] {
            let table = rate_for(department, &inputs);
            assert!(table.row("Transit flow").is_none());
            assert_eq!(table.row("Restaurants/bars share").map(|row| row.score), Some(7.0));
            assert_eq!(table.row("Malls").map(|row| row.score), Some(3.0));
            assert_eq!(table.total(), 20.0 + 7.0 + 3.0);
        }
    }

    #[test]
    fn single_mall_scores_nothing() {
        let inputs = VisibilityInputs {
            shops: 10,
            malls: 1,
            ..VisibilityInputs::default()
        };
        assert_eq!(rate_for(33, &inputs).row("Malls").map(|row| row.score), Some(0.0));
    }

    #[test]
    fn from_table_rejects_more_restaurants_than_shops() {
        let table: MeasurementTable = [("shops", 5.0), ("restaurants_bars", 6.0), ("malls", 0.0)]
            .into_iter()
            .collect();
        let err = VisibilityInputs::from_table(&table).expect_err("inconsistent counts");
        assert!(err.is_validation());
    }

    #[test]
    fn rating_is_idempotent() {
        let inputs = VisibilityInputs {
            shops: 45,
            restaurants_bars: 12,
            malls: 3,
            validations: Some(12_000),
        };
        assert_eq!(rate_for(75, &inputs), rate_for(75, &inputs));
    }
}
