use crate::error::Result;
use crate::types::config::Amenity;
use crate::types::measurement::{MeasurementTable, RawValue};
use crate::types::scoring::{Dimension, Points, RatedRow, RatingTable};

const SECTION: &str = "district";

/// Public equipment counted around the premises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistrictCounts {
    pub city_hall: u64,
    pub post_office: u64,
    pub nursery_school: u64,
    pub secondary_school: u64,
    pub university: u64,
    pub sports: u64,
    pub cinema: u64,
    pub museum: u64,
    pub library: u64,
    pub hotel: u64,
}

impl DistrictCounts {
    pub fn from_table(table: &MeasurementTable) -> Result<Self> {
        Ok(Self {
            city_hall: table.count(SECTION, "city_hall")?,
            post_office: table.count(SECTION, "post_office")?,
            nursery_school: table.count(SECTION, "nursery_school")?,
            secondary_school: table.count(SECTION, "secondary_school")?,
            university: table.count(SECTION, "university")?,
            sports: table.count(SECTION, "sports")?,
            cinema: table.count(SECTION, "cinema")?,
            museum: table.count(SECTION, "museum")?,
            library: table.count(SECTION, "library")?,
            hotel: table.count(SECTION, "hotel")?,
        })
    }

    /// Adds `count` to the slot of a district amenity. Access amenities are ignored.
    pub fn add(&mut self, amenity: Amenity, count: u64) {
        let slot = match amenity {
            Amenity::CityHall => &mut self.city_hall,
            Amenity::PostOffice => &mut self.post_office,
            Amenity::NurserySchool => &mut self.nursery_school,
            Amenity::SecondarySchool => &mut self.secondary_school,
            Amenity::University => &mut self.university,
            Amenity::Sports => &mut self.sports,
            Amenity::Cinema => &mut self.cinema,
            Amenity::Museum => &mut self.museum,
            Amenity::Library => &mut self.library,
            Amenity::Hotel => &mut self.hotel,
            Amenity::Train => return,
        };
        *slot += count;
    }
}

fn presence(label: &str, count: u64, points: Points) -> RatedRow {
    let score = if count >= 1 { points } else { 0.0 };
    RatedRow::new(label, RawValue::Count(count), score, points)
}

pub fn rate(counts: &DistrictCounts) -> RatingTable {
    let university = counts.university.min(4) as Points;
    let hotel = if counts.hotel >= 12 {
        6.0
    } else {
        counts.hotel as Points * 0.5
    };

    RatingTable::new(
        Dimension::District,
        vec![
            presence("City hall", counts.city_hall, 1.0),
            presence("Post office", counts.post_office, 1.0),
            presence("Nursery school", counts.nursery_school, 1.0),
            presence("Secondary school", counts.secondary_school, 1.0),
            RatedRow::new(
                "University",
                RawValue::Count(counts.university),
                university,
                4.0,
            ),
            presence("Sports venue", counts.sports, 1.0),
            presence("Cinema", counts.cinema, 2.0),
            presence("Museum", counts.museum, 2.0),
            presence("Library", counts.library, 1.0),
            RatedRow::new("Hotel", RawValue::Count(counts.hotel), hotel, 6.0),
        ],
    )
}
