use crate::error::Result;
use crate::proximity::{Labeled, Located};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

/// Business from the open shops base.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitMode {
    #[serde(alias = "METRO", alias = "M")]
    Metro,
    #[serde(alias = "TRAM", alias = "T")]
    Tram,
    #[serde(alias = "BUS", alias = "B")]
    Bus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitStop {
    pub latitude: f64,
    pub longitude: f64,
    pub mode: TransitMode,
    pub name: String,
    /// Daily validations, published for some networks only.
    #[serde(default)]
    pub validations: Option<u64>,
}

/// Bike-share station or parking facility.
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub latitude: f64,
    pub longitude: f64,
}

/// Row of the permanent equipment base.
#[derive(Debug, Clone, Deserialize)]
pub struct EquipmentRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub equipment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopulationRecord {
    pub iris: String,
    pub active_population: u64,
    pub median_income: f64,
}

macro_rules! impl_located {
    ($($record:ty),+) => {
        $(
            impl Located for $record {
                fn latitude(&self) -> f64 {
                    self.latitude
                }

                fn longitude(&self) -> f64 {
                    self.longitude
                }
            }
        )+
    };
}

impl_located!(ShopRecord, TransitStop, StationRecord, EquipmentRecord);

impl Labeled for EquipmentRecord {
    fn label(&self) -> &str {
        &self.equipment
    }
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_transit_stops_with_optional_validations() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("transit.csv");
        fs::write(
            &path,
            "latitude,longitude,mode,name,validations\n\
             48.857,2.352,metro,Hotel de Ville,31000\n\
             48.858,2.351,bus,Rivoli,\n",
        )
        .expect("csv should write");

        let stops: Vec<TransitStop> = load(&path).expect("csv should load");
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].mode, TransitMode::Metro);
        assert_eq!(stops[0].validations, Some(31_000));
        assert_eq!(stops[1].validations, None);
    }

    #[test]
    fn load_accepts_network_mode_codes() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("transit.csv");
        fs::write(
            &path,
            "latitude,longitude,mode,name\n\
             44.841,-0.573,TRAM,Hotel de Ville\n\
             44.842,-0.574,BUS,Gambetta\n\
             50.637,3.063,M,Rihour\n\
             50.638,3.064,T,Gare Lille Flandres\n\
             50.639,3.065,B,Republique\n",
        )
        .expect("csv should write");

        let stops: Vec<TransitStop> = load(&path).expect("csv should load");
        let modes: Vec<TransitMode> = stops.iter().map(|stop| stop.mode).collect();
        assert_eq!(
            modes,
            vec![
                TransitMode::Tram,
                TransitMode::Bus,
                TransitMode::Metro,
                TransitMode::Tram,
                TransitMode::Bus,
            ]
        );
    }

    #[test]
    fn load_rejects_unknown_transit_mode() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("transit.csv");
        fs::write(&path, "latitude,longitude,mode,name\n48.857,2.352,ferry,Quai\n")
            .expect("csv should write");

        let result: Result<Vec<TransitStop>> = load(&path);
        assert!(result.is_err());
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir should be created");
        let result: Result<Vec<ShopRecord>> = load(&dir.path().join("absent.csv"));
        assert!(result.is_err());
    }
}
