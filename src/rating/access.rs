use crate::error::Result;
use crate::types::measurement::{MeasurementTable, RawValue};
use crate::types::scoring::{Dimension, Points, RatedRow, RatingTable};

const SECTION: &str = "access";

/// Transport and parking counts around the premises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessCounts {
    pub train: u64,
    pub metro_tram: u64,
    pub bus: u64,
    pub bike_share: u64,
    pub parking: u64,
}

impl AccessCounts {
    pub fn from_table(table: &MeasurementTable) -> Result<Self> {
        Ok(Self {
            train: table.count(SECTION, "train")?,
            metro_tram: table.count(SECTION, "metro_tram")?,
            bus: table.count(SECTION, "bus")?,
            bike_share: table.count(SECTION, "bike_share")?,
            parking: table.count(SECTION, "parking")?,
        })
    }
}

/// Two points per stop up to three stops, then a flat cap.
fn per_stop(count: u64, cap: Points) -> Points {
    if count > 3 {
        cap
    } else {
        count as Points * 2.0
    }
}

pub fn rate(counts: &AccessCounts) -> RatingTable {
    let train = if counts.train > 1 { 4.0 } else { 0.0 };
    RatingTable::new(
        Dimension::Access,
        vec![
            RatedRow::new("Train station", RawValue::Count(counts.train), train, 4.0),
            RatedRow::new(
                "Metro/Tram",
                RawValue::Count(counts.metro_tram),
                per_stop(counts.metro_tram, 7.0),
                7.0,
            ),
            RatedRow::new("Bus", RawValue::Count(counts.bus), per_stop(counts.bus, 7.0), 7.0),
            RatedRow::new(
                "Bike share",
                RawValue::Count(counts.bike_share),
                per_stop(counts.bike_share, 6.0),
                6.0,
            ),
            RatedRow::new(
                "Parking",
                RawValue::Count(counts.parking),
                per_stop(counts.parking, 6.0),
                6.0,
            ),
        ],
    )
}
