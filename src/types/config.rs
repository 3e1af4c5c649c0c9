use crate::error::ScoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub radius: RadiusConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default = "default_cities")]
    pub cities: Vec<CityProfile>,
    #[serde(default)]
    pub survey: SurveyConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            radius: RadiusConfig::default(),
            visibility: VisibilityConfig::default(),
            cities: default_cities(),
            survey: SurveyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_favorable_threshold")]
    pub favorable_threshold: i64,
    #[serde(default)]
    pub badges: BadgeThresholds,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            favorable_threshold: default_favorable_threshold(),
            badges: BadgeThresholds::default(),
        }
    }
}

fn default_favorable_threshold() -> i64 {
    70
}

/// A dimension badge is favorable when its total is strictly above the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BadgeThresholds {
    #[serde(default = "default_wide_badge")]
    pub visibility: f64,
    #[serde(default = "default_wide_badge")]
    pub access: f64,
    #[serde(default = "default_narrow_badge")]
    pub population: f64,
    #[serde(default = "default_narrow_badge")]
    pub district: f64,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            visibility: default_wide_badge(),
            access: default_wide_badge(),
            population: default_narrow_badge(),
            district: default_narrow_badge(),
        }
    }
}

fn default_wide_badge() -> f64 {
    15.0
}

fn default_narrow_badge() -> f64 {
    10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RadiusConfig {
    #[serde(default = "default_walk_radius")]
    pub transit_m: f64,
    #[serde(default = "default_walk_radius")]
    pub parking_m: f64,
    #[serde(default = "default_walk_radius")]
    pub amenity_m: f64,
    #[serde(default = "default_commerce_radius")]
    pub commerce_m: f64,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            transit_m: default_walk_radius(),
            parking_m: default_walk_radius(),
            amenity_m: default_walk_radius(),
            commerce_m: default_commerce_radius(),
        }
    }
}

fn default_walk_radius() -> f64 {
    400.0
}

fn default_commerce_radius() -> f64 {
    200.0
}

/// City-level radius overrides; unset fields keep the global `[radius]` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadiusOverride {
    pub transit_m: Option<f64>,
    pub parking_m: Option<f64>,
    pub amenity_m: Option<f64>,
    pub commerce_m: Option<f64>,
}

impl RadiusConfig {
    pub fn with_override(self, city: RadiusOverride) -> Self {
        Self {
            transit_m: city.transit_m.unwrap_or(self.transit_m),
            parking_m: city.parking_m.unwrap_or(self.parking_m),
            amenity_m: city.amenity_m.unwrap_or(self.amenity_m),
            commerce_m: city.commerce_m.unwrap_or(self.commerce_m),
        }
    }
}

/// Points awarded by the restaurant/bar and mall rows of the visibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coefficients {
    pub bar_max: u32,
    pub bar_mid: u32,
    pub mall: u32,
}

impl Coefficients {
    /// Dense city centres saturate the bar and mall signals.
    pub const DENSE: Coefficients = Coefficients {
        bar_max: 3,
        bar_mid: 2,
        mall: 1,
    };

    pub const SPARSE: Coefficients = Coefficients {
        bar_max: 7,
        bar_mid: 4,
        mall: 3,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct VisibilityConfig {
    #[serde(default = "default_coefficients")]
    pub default_coefficients: Coefficients,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            default_coefficients: default_coefficients(),
        }
    }
}

fn default_coefficients() -> Coefficients {
    Coefficients::SPARSE
}

/// How the transit-flow row of the visibility table is produced for a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TransitFlow {
    /// Daily validations are scored: 10 points from `high`, 5 from `medium`.
    Validations { high: u64, medium: u64 },
    /// The row is shown but the signal is not published, so it scores 0.
    Unavailable,
    #[default]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Train,
    CityHall,
    PostOffice,
    NurserySchool,
    SecondarySchool,
    University,
    Sports,
    Cinema,
    Museum,
    Library,
    Hotel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    pub name: String,
    pub department: u32,
    pub coefficients: Option<Coefficients>,
    #[serde(default)]
    pub radius: RadiusOverride,
    #[serde(default)]
    pub transit_flow: TransitFlow,
    /// Equipment labels of the amenity dataset mapped to scored categories.
    #[serde(default = "default_equipment")]
    pub equipment: BTreeMap<String, Amenity>,
}

impl CityProfile {
    fn fallback(department: u32) -> Self {
        Self {
            name: format!("department {department}"),
            department,
            coefficients: None,
            radius: RadiusOverride::default(),
            transit_flow: TransitFlow::Absent,
            equipment: default_equipment(),
        }
    }
}

fn default_cities() -> Vec<CityProfile> {
    vec![
        CityProfile {
            name: "Paris".to_string(),
            department: 75,
            coefficients: Some(Coefficients::DENSE),
            radius: RadiusOverride::default(),
            transit_flow: TransitFlow::Validations {
                high: 20_000,
                medium: 10_000,
            },
            equipment: default_equipment(),
        },
        CityProfile {
            name: "Bordeaux".to_string(),
            department: 33,
            coefficients: None,
            radius: RadiusOverride::default(),
            transit_flow: TransitFlow::Absent,
            equipment: default_equipment(),
        },
        CityProfile {
            name: "Lille".to_string(),
            department: 59,
            coefficients: Some(Coefficients::DENSE),
            radius: RadiusOverride::default(),
            transit_flow: TransitFlow::Unavailable,
            equipment: default_equipment(),
        },
    ]
}

fn default_equipment() -> BTreeMap<String, Amenity> {
    [
        ("Gare", Amenity::Train),
        ("Mairie", Amenity::CityHall),
        ("Bureau de poste", Amenity::PostOffice),
        ("École maternelle", Amenity::NurserySchool),
        ("Enseignement Secondaire", Amenity::SecondarySchool),
        ("Enseignement supérieur", Amenity::University),
        ("Zone Sports", Amenity::Sports),
        ("Cinéma", Amenity::Cinema),
        ("Espace Culturel", Amenity::Museum),
        ("Bibliothèque", Amenity::Library),
        ("Hôtel", Amenity::Hotel),
    ]
    .into_iter()
    .map(|(label, amenity)| (label.to_string(), amenity))
    .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    #[serde(default = "default_mall_kinds")]
    pub mall_kinds: Vec<String>,
    #[serde(default = "default_restaurant_kinds")]
    pub restaurant_kinds: Vec<String>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            mall_kinds: default_mall_kinds(),
            restaurant_kinds: default_restaurant_kinds(),
        }
    }
}

fn default_mall_kinds() -> Vec<String> {
    vec!["department_store".to_string(), "supermarket".to_string()]
}

fn default_restaurant_kinds() -> Vec<String> {
    vec!["bar".to_string(), "restaurant".to_string()]
}

impl ScoringConfig {
    /// Profile for a department, or a default profile when none is configured.
    pub fn profile_for_department(&self, department: u32) -> CityProfile {
        self.cities
            .iter()
            .find(|city| city.department == department)
            .cloned()
            .unwrap_or_else(|| CityProfile::fallback(department))
    }

    pub fn profile_by_name(&self, name: &str) -> Option<&CityProfile> {
        self.cities
            .iter()
            .find(|city| city.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn coefficients(&self, profile: &CityProfile) -> Coefficients {
        profile
            .coefficients
            .unwrap_or(self.visibility.default_coefficients)
    }

    pub fn radius(&self, profile: &CityProfile) -> RadiusConfig {
        self.radius.with_override(profile.radius)
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        validate_radius("radius", &self.radius)?;

        if self.index.favorable_threshold < 0 {
            return Err(ScoreError::ConfigParse(
                "index.favorable_threshold cannot be negative".to_string(),
            ));
        }

        validate_coefficients("visibility.default_coefficients", &self.visibility.default_coefficients)?;

        let mut departments = HashSet::new();
        let mut names = HashSet::new();
        for city in &self.cities {
            let name = city.name.trim();
            if name.is_empty() {
                return Err(ScoreError::ConfigParse(
                    "cities entries must have a non-empty name".to_string(),
                ));
            }
            if !names.insert(name.to_lowercase()) {
                return Err(ScoreError::ConfigParse(format!(
                    "cities contains duplicate name: {name}"
                )));
            }
            if !departments.insert(city.department) {
                return Err(ScoreError::ConfigParse(format!(
                    "cities contains duplicate department: {}",
                    city.department
                )));
            }
            validate_radius(&format!("cities.{name}.radius"), &self.radius(city))?;
            if let Some(coefficients) = &city.coefficients {
                validate_coefficients(&format!("cities.{name}.coefficients"), coefficients)?;
            }
            if let TransitFlow::Validations { high, medium } = city.transit_flow {
                if medium > high {
                    return Err(ScoreError::ConfigParse(format!(
                        "cities.{name}.transit_flow: medium ({medium}) cannot exceed high ({high})"
                    )));
                }
            }
        }

        if self.survey.mall_kinds.iter().any(|kind| kind.trim().is_empty()) {
            return Err(ScoreError::ConfigParse(
                "survey.mall_kinds entries must be non-empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_radius(prefix: &str, radius: &RadiusConfig) -> Result<(), ScoreError> {
    for (name, meters) in [
        ("transit_m", radius.transit_m),
        ("parking_m", radius.parking_m),
        ("amenity_m", radius.amenity_m),
        ("commerce_m", radius.commerce_m),
    ] {
        if !meters.is_finite() || meters <= 0.0 {
            return Err(ScoreError::ConfigParse(format!(
                "{prefix}.{name} must be a positive number of meters"
            )));
        }
    }
    Ok(())
}

fn validate_coefficients(name: &str, coefficients: &Coefficients) -> Result<(), ScoreError> {
    if coefficients.bar_mid > coefficients.bar_max {
        return Err(ScoreError::ConfigParse(format!(
            "{name}: bar_mid ({}) cannot exceed bar_max ({})",
            coefficients.bar_mid, coefficients.bar_max
        )));
    }
    Ok(())
}
