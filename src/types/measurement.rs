use crate::error::{Result, ScoreError};
use crate::rating::access::AccessCounts;
use crate::rating::district::DistrictCounts;
use crate::rating::population::PopulationInputs;
use crate::rating::visibility::VisibilityInputs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A validated WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ScoreError::InvalidCoordinates(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ScoreError::InvalidCoordinates(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Raw value carried by a measurement row.
///
/// `Undefined` marks a proportion whose denominator was zero. It is kept
/// distinct from `Percent(0.0)` so reports never show a fabricated 0%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Count(u64),
    Amount(f64),
    Percent(f64),
    Undefined,
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Count(count) => write!(f, "{count}"),
            RawValue::Amount(amount) => write!(f, "{amount:.0}"),
            RawValue::Percent(percent) => write!(f, "{percent:.2}%"),
            RawValue::Undefined => f.write_str("n/a"),
        }
    }
}

/// Label to number table as handed over by a data collaborator.
///
/// Typed rater inputs are extracted with [`MeasurementTable::count`] and
/// [`MeasurementTable::amount`]; nothing is zero-filled here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MeasurementTable(BTreeMap<String, f64>);

impl<'a> FromIterator<(&'a str, f64)> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        )
    }
}

impl MeasurementTable {
    fn value(&self, section: &str, label: &str) -> Result<Option<f64>> {
        let Some(value) = self.0.get(label).copied() else {
            return Ok(None);
        };
        let category = format!("{section}.{label}");
        if !value.is_finite() {
            return Err(ScoreError::invalid_measurement(&category, "value is not finite"));
        }
        if value < 0.0 {
            return Err(ScoreError::invalid_measurement(
                &category,
                format!("value {value} is negative"),
            ));
        }
        Ok(Some(value))
    }

    pub fn amount(&self, section: &str, label: &str) -> Result<f64> {
        self.value(section, label)?
            .ok_or_else(|| ScoreError::MissingCategory(format!("{section}.{label}")))
    }

    pub fn count(&self, section: &str, label: &str) -> Result<u64> {
        self.optional_count(section, label)?
            .ok_or_else(|| ScoreError::MissingCategory(format!("{section}.{label}")))
    }

    pub fn optional_count(&self, section: &str, label: &str) -> Result<Option<u64>> {
        match self.value(section, label)? {
            Some(value) if value.fract() != 0.0 => Err(ScoreError::invalid_measurement(
                &format!("{section}.{label}"),
                format!("count {value} is not a whole number"),
            )),
            Some(value) => Ok(Some(value as u64)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationSection {
    pub latitude: f64,
    pub longitude: f64,
    pub department: u32,
    pub city: Option<String>,
    pub iris: Option<String>,
}

/// On-disk form of a scoring context, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextFile {
    pub location: LocationSection,
    #[serde(default)]
    pub access: MeasurementTable,
    #[serde(default)]
    pub visibility: MeasurementTable,
    #[serde(default)]
    pub population: MeasurementTable,
    #[serde(default)]
    pub district: MeasurementTable,
}

/// Validated input bundle of one scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationContext {
    pub coordinates: Coordinates,
    pub department: u32,
    pub city: Option<String>,
    pub iris: Option<String>,
    pub access: AccessCounts,
    pub visibility: VisibilityInputs,
    pub population: PopulationInputs,
    pub district: DistrictCounts,
}

impl TryFrom<ContextFile> for LocationContext {
    type Error = ScoreError;

    fn try_from(file: ContextFile) -> Result<Self> {
        Ok(Self {
            coordinates: Coordinates::new(file.location.latitude, file.location.longitude)?,
            department: file.location.department,
            city: file.location.city,
            iris: file.location.iris,
            access: AccessCounts::from_table(&file.access)?,
            visibility: VisibilityInputs::from_table(&file.visibility)?,
            population: PopulationInputs::from_table(&file.population)?,
            district: DistrictCounts::from_table(&file.district)?,
        })
    }
}
