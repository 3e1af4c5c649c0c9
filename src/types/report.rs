use crate::types::measurement::Coordinates;
use crate::types::scoring::{Badge, FinalIndex, Ratings};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LocationSummary {
    pub city: String,
    pub department: u32,
    pub coordinates: Coordinates,
    pub iris: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttractivenessReport {
    pub version: String,
    pub generated_at: String,
    pub location: LocationSummary,
    pub index: FinalIndex,
    pub badges: Vec<Badge>,
    pub ratings: Ratings,
}

impl AttractivenessReport {
    pub fn new(
        location: LocationSummary,
        ratings: Ratings,
        index: FinalIndex,
        badges: Vec<Badge>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
            location,
            index,
            badges,
            ratings,
        }
    }
}
