//! Great-circle filtering of located records around an origin.

use crate::error::{Result, ScoreError};
use crate::types::measurement::Coordinates;
use geo::{Distance, Geodesic, Point};
use std::collections::BTreeMap;

/// Anything with a raw latitude/longitude, typically a dataset row.
pub trait Located {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

/// A row that also carries a category label.
pub trait Labeled: Located {
    fn label(&self) -> &str;
}

impl Located for (f64, f64) {
    fn latitude(&self) -> f64 {
        self.0
    }

    fn longitude(&self) -> f64 {
        self.1
    }
}

/// Geodesic distance on the WGS84 ellipsoid, in meters.
pub fn distance_m(a: Coordinates, b: Coordinates) -> f64 {
    Geodesic.distance(
        Point::new(a.longitude, a.latitude),
        Point::new(b.longitude, b.latitude),
    )
}

fn check_radius(radius_m: f64) -> Result<()> {
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(ScoreError::InvalidRadius(format!(
            "{radius_m} is not a non-negative distance in meters"
        )));
    }
    Ok(())
}

fn position<T: Located>(index: usize, row: &T) -> Result<Coordinates> {
    Coordinates::new(row.latitude(), row.longitude()).map_err(|err| match err {
        ScoreError::InvalidCoordinates(reason) => {
            ScoreError::InvalidCoordinates(format!("row {index}: {reason}"))
        }
        other => other,
    })
}

/// Rows strictly closer than `radius_m` to `origin`, in dataset order.
pub fn filter_within<'a, T: Located>(
    dataset: &'a [T],
    origin: Coordinates,
    radius_m: f64,
) -> Result<Vec<&'a T>> {
    check_radius(radius_m)?;
    let mut kept = Vec::new();
    for (index, row) in dataset.iter().enumerate() {
        if distance_m(position(index, row)?, origin) < radius_m {
            kept.push(row);
        }
    }
    Ok(kept)
}

pub fn count_within<T: Located>(points: &[T], origin: Coordinates, radius_m: f64) -> Result<usize> {
    filter_within(points, origin, radius_m).map(|rows| rows.len())
}

/// Number of rows per label within `radius_m` of `origin`.
pub fn count_by_label<T: Labeled>(
    dataset: &[T],
    origin: Coordinates,
    radius_m: f64,
) -> Result<BTreeMap<String, u64>> {
    let mut counts = BTreeMap::new();
    for row in filter_within(dataset, origin, radius_m)? {
        *counts.entry(row.label().to_string()).or_insert(0) += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Equipment {
        lat: f64,
        lon: f64,
        kind: &'static str,
    }

    impl Located for Equipment {
        fn latitude(&self) -> f64 {
            self.lat
        }

        fn longitude(&self) -> f64 {
            self.lon
        }
    }

    impl Labeled for Equipment {
        fn label(&self) -> &str {
            self.kind
        }
    }

    fn origin() -> Coordinates {
        Coordinates::new(48.8566, 2.3522).expect("valid origin")
    }

    // One degree of latitude is roughly 111 km, so 0.001° is about 111 m.
    fn north_of_origin(meters: f64) -> (f64, f64) {
        (48.8566 + meters / 111_200.0, 2.3522)
    }

    #[test]
    fn distance_matches_known_city_pair() {
        let paris = origin();
        let lille = Coordinates::new(50.6292, 3.0573).expect("valid");
        let km = distance_m(paris, lille) / 1000.0;
        assert!((200.0..208.0).contains(&km), "paris-lille {km} km");
        assert_eq!(distance_m(paris, paris), 0.0);
    }

    #[test]
    fn count_within_keeps_only_points_inside_radius() {
        let points = vec![
            north_of_origin(50.0),
            north_of_origin(350.0),
            north_of_origin(450.0),
            north_of_origin(2_000.0),
        ];
        assert_eq!(count_within(&points, origin(), 400.0).expect("valid input"), 2);
        assert_eq!(count_within(&points, origin(), 0.0).expect("valid input"), 0);
    }

    #[test]
    fn origin_itself_is_not_within_zero_radius() {
        let points = vec![(48.8566, 2.3522)];
        assert_eq!(count_within(&points, origin(), 0.0).expect("valid input"), 0);
        assert_eq!(count_within(&points, origin(), 1.0).expect("valid input"), 1);
    }

    #[test]
    fn malformed_coordinates_are_reported_with_row_index() {
        let points = vec![north_of_origin(10.0), (f64::NAN, 2.35)];
        let err = count_within(&points, origin(), 400.0).expect_err("nan latitude");
        assert!(matches!(err, ScoreError::InvalidCoordinates(ref reason) if reason.starts_with("row 1")));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let points: Vec<(f64, f64)> = Vec::new();
        assert!(matches!(
            count_within(&points, origin(), -5.0),
            Err(ScoreError::InvalidRadius(_))
        ));
    }

    #[test]
    fn count_by_label_groups_nearby_rows() {
        let (near_lat, near_lon) = north_of_origin(100.0);
        let (far_lat, far_lon) = north_of_origin(900.0);
        let dataset = vec![
            Equipment { lat: near_lat, lon: near_lon, kind: "Mairie" },
            Equipment { lat: near_lat, lon: near_lon, kind: "Hôtel" },
            Equipment { lat: near_lat, lon: near_lon, kind: "Hôtel" },
            Equipment { lat: far_lat, lon: far_lon, kind: "Cinéma" },
        ];
        let counts = count_by_label(&dataset, origin(), 400.0).expect("valid input");
        assert_eq!(counts.get("Hôtel"), Some(&2));
        assert_eq!(counts.get("Mairie"), Some(&1));
        assert!(!counts.contains_key("Cinéma"));
    }

    #[test]
    fn filter_within_preserves_dataset_order() {
        let points = vec![north_of_origin(300.0), north_of_origin(100.0)];
        let kept = filter_within(&points, origin(), 400.0).expect("valid input");
        assert_eq!(kept, vec![&points[0], &points[1]]);
    }
}
