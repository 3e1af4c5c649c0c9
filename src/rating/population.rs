use crate::error::Result;
use crate::types::measurement::{MeasurementTable, RawValue};
use crate::types::scoring::{Dimension, Points, RatedRow, RatingTable};

const SECTION: &str = "population";

/// Census figures of the IRIS unit containing the premises.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopulationInputs {
    pub active_population: u64,
    pub median_income: f64,
}

impl PopulationInputs {
    pub fn from_table(table: &MeasurementTable) -> Result<Self> {
        Ok(Self {
            active_population: table.count(SECTION, "active_population")?,
            median_income: table.amount(SECTION, "median_income")?,
        })
    }
}

// 1000..2000 outscores 2000+. Possibly swapped upstream; unconfirmed.
fn active_population_score(active: u64) -> Points {
    match active {
        2000.. => 6.0,
        1000..=1999 => 10.0,
        200..=999 => 4.0,
        _ => 0.0,
    }
}

fn median_income_score(income: f64) -> Points {
    if income >= 30_000.0 {
        10.0
    } else if income >= 25_000.0 {
        8.0
    } else if income >= 20_000.0 {
        6.0
    } else if income >= 15_000.0 {
        4.0
    } else if income >= 10_000.0 {
        2.0
    } else {
        0.0
    }
}

pub fn rate(inputs: &PopulationInputs) -> RatingTable {
    RatingTable::new(
        Dimension::Population,
        vec![
            RatedRow::new(
                "Active population",
                RawValue::Count(inputs.active_population),
                active_population_score(inputs.active_population),
                10.0,
            ),
            RatedRow::new(
                "Median income",
                RawValue::Amount(inputs.median_income),
                median_income_score(inputs.median_income),
                10.0,
            ),
        ],
    )
}
