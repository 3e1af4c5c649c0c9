//! Builds a scoring context from local point datasets.

pub mod dataset;

use crate::error::{Result, ScoreError};
use crate::proximity::{count_by_label, count_within, filter_within};
use crate::rating::access::AccessCounts;
use crate::rating::district::DistrictCounts;
use crate::rating::population::PopulationInputs;
use crate::rating::visibility::VisibilityInputs;
use crate::types::config::{Amenity, CityProfile, ScoringConfig, TransitFlow};
use crate::types::measurement::{Coordinates, LocationContext};
use dataset::{
    EquipmentRecord, PopulationRecord, ShopRecord, StationRecord, TransitMode, TransitStop,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyFile {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub iris: String,
    #[serde(default)]
    pub datasets: DatasetPaths,
}

/// CSV datasets, relative to the survey file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetPaths {
    pub shops: Option<PathBuf>,
    pub transit: Option<PathBuf>,
    pub bike_share: Option<PathBuf>,
    pub parking: Option<PathBuf>,
    pub amenities: Option<PathBuf>,
    pub population: Option<PathBuf>,
}

pub fn load_survey(path: &Path) -> Result<SurveyFile> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ScoreError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn load_optional<T: serde::de::DeserializeOwned>(
    base_dir: &Path,
    path: Option<&PathBuf>,
    name: &str,
) -> Result<Vec<T>> {
    match path {
        Some(path) => {
            let rows = dataset::load(&base_dir.join(path))?;
            debug!(dataset = name, rows = rows.len(), "loaded dataset");
            Ok(rows)
        }
        None => {
            warn!(dataset = name, "dataset not provided; counting zero");
            Ok(Vec::new())
        }
    }
}

pub fn build_context(
    survey: &SurveyFile,
    base_dir: &Path,
    config: &ScoringConfig,
) -> Result<LocationContext> {
    let profile = config
        .profile_by_name(&survey.city)
        .ok_or_else(|| ScoreError::UnknownCity(survey.city.clone()))?;
    let origin = Coordinates::new(survey.latitude, survey.longitude)?;
    let paths = &survey.datasets;

    let shops: Vec<ShopRecord> = load_optional(base_dir, paths.shops.as_ref(), "shops")?;
    let transit: Vec<TransitStop> = load_optional(base_dir, paths.transit.as_ref(), "transit")?;
    let bikes: Vec<StationRecord> =
        load_optional(base_dir, paths.bike_share.as_ref(), "bike_share")?;
    let parking: Vec<StationRecord> = load_optional(base_dir, paths.parking.as_ref(), "parking")?;
    let amenities: Vec<EquipmentRecord> =
        load_optional(base_dir, paths.amenities.as_ref(), "amenities")?;

    let population_path = paths
        .population
        .as_ref()
        .ok_or_else(|| ScoreError::MissingCategory("datasets.population".to_string()))?;
    let population: Vec<PopulationRecord> = dataset::load(&base_dir.join(population_path))?;

    let radius = config.radius(profile);
    let stops = nearby_stops(&transit, origin, radius.transit_m)?;
    let (train, district) = amenity_counts(&amenities, profile, origin, radius.amenity_m)?;

    let metro_tram: Vec<&TransitStop> = stops
        .iter()
        .copied()
        .filter(|stop| matches!(stop.mode, TransitMode::Metro | TransitMode::Tram))
        .collect();
    let access = AccessCounts {
        train,
        metro_tram: metro_tram.len() as u64,
        bus: stops
            .iter()
            .filter(|stop| stop.mode == TransitMode::Bus)
            .count() as u64,
        bike_share: count_within(&bikes, origin, radius.transit_m)? as u64,
        parking: count_within(&parking, origin, radius.parking_m)? as u64,
    };

    let validations = match profile.transit_flow {
        TransitFlow::Validations { .. } => Some(
            metro_tram
                .iter()
                .filter_map(|stop| stop.validations)
                .sum::<u64>(),
        ),
        TransitFlow::Unavailable | TransitFlow::Absent => None,
    };
    let visibility = commerce_counts(&shops, config, origin, radius.commerce_m, validations)?;
    let population = population_for_iris(&population, &survey.iris)?;

    debug!(?access, ?visibility, ?district, "survey counts");

    Ok(LocationContext {
        coordinates: origin,
        department: profile.department,
        city: Some(profile.name.clone()),
        iris: Some(survey.iris.clone()),
        access,
        visibility,
        population,
        district,
    })
}

/// Stops within the radius, de-duplicated on name and mode.
fn nearby_stops(
    transit: &[TransitStop],
    origin: Coordinates,
    radius_m: f64,
) -> Result<Vec<&TransitStop>> {
    let mut seen = HashSet::new();
    Ok(filter_within(transit, origin, radius_m)?
        .into_iter()
        .filter(|stop| seen.insert((stop.name.trim().to_uppercase(), stop.mode)))
        .collect())
}

fn amenity_counts(
    amenities: &[EquipmentRecord],
    profile: &CityProfile,
    origin: Coordinates,
    radius_m: f64,
) -> Result<(u64, DistrictCounts)> {
    let mut train = 0;
    let mut district = DistrictCounts::default();
    for (label, count) in count_by_label(amenities, origin, radius_m)? {
        match profile.equipment.get(&label) {
            Some(Amenity::Train) => train += count,
            Some(amenity) => district.add(*amenity, count),
            None => debug!(equipment = %label, count, "equipment not scored"),
        }
    }
    Ok((train, district))
}

fn commerce_counts(
    shops: &[ShopRecord],
    config: &ScoringConfig,
    origin: Coordinates,
    radius_m: f64,
    validations: Option<u64>,
) -> Result<VisibilityInputs> {
    let nearby = filter_within(shops, origin, radius_m)?;
    Ok(VisibilityInputs {
        shops: nearby.len() as u64,
        restaurants_bars: nearby
            .iter()
            .filter(|shop| kind_in(&config.survey.restaurant_kinds, shop))
            .count() as u64,
        malls: nearby
            .iter()
            .filter(|shop| kind_in(&config.survey.mall_kinds, shop))
            .count() as u64,
        validations,
    })
}

fn kind_in(kinds: &[String], shop: &ShopRecord) -> bool {
    kinds
        .iter()
        .any(|kind| kind.eq_ignore_ascii_case(shop.kind.trim()))
}

fn population_for_iris(records: &[PopulationRecord], iris: &str) -> Result<PopulationInputs> {
    let record = records
        .iter()
        .find(|record| record.iris.trim() == iris.trim())
        .ok_or_else(|| ScoreError::IrisNotFound(iris.to_string()))?;
    if !record.median_income.is_finite() || record.median_income < 0.0 {
        return Err(ScoreError::invalid_measurement(
            "population.median_income",
            format!("{} is not a valid income", record.median_income),
        ));
    }
    Ok(PopulationInputs {
        active_population: record.active_population,
        median_income: record.median_income,
    })
}
