//! Great-circle distance and proximity queries over trails.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{round_tenth, Coordinates, NearbyTrail, Trail};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

pub const DEFAULT_NEARBY_RADIUS_MILES: f64 = 50.0;

/// Haversine distance in miles, rounded to one decimal.
///
/// ```ignore
/// let d = distance_miles(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
/// assert_eq!(d, 69.1);
/// ```
pub fn distance_miles(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round_tenth(EARTH_RADIUS_MILES * c)
}

/// Trails within `max_distance` miles of `origin`, nearest first.
///
/// Trails without coordinates are skipped. Equal distances are ordered by
/// trail id so results are reproducible.
pub fn nearby(trails: &[Trail], origin: Coordinates, max_distance: f64) -> Vec<NearbyTrail> {
    let mut results: Vec<NearbyTrail> = trails
        .iter()
        .filter_map(|trail| {
            let coords = trail.coordinates?;
            let distance = distance_miles(origin, coords);
            (distance <= max_distance).then(|| NearbyTrail {
                trail: trail.clone(),
                distance,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
            .then(a.trail.id.cmp(&b.trail.id))
    });

    results
}

/// Coordinates of every trail that has them, in catalog order.
pub fn bounds(trails: &[Trail]) -> Vec<Coordinates> {
    trails.iter().filter_map(|t| t.coordinates).collect()
}

/// Bounding box around a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub south_west: Coordinates,
    pub north_east: Coordinates,
}

/// Smallest box containing every point; `None` leaves the map untouched.
pub fn viewport(points: &[Coordinates]) -> Option<Viewport> {
    let first = *points.first()?;
    let (mut south_west, mut north_east) = (first, first);

    for p in &points[1..] {
        south_west.lat = south_west.lat.min(p.lat);
        south_west.lon = south_west.lon.min(p.lon);
        north_east.lat = north_east.lat.max(p.lat);
        north_east.lon = north_east.lon.max(p.lon);
    }

    Some(Viewport {
        south_west,
        north_east,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn trail_at(id: i64, coordinates: Option<(f64, f64)>) -> Trail {
        Trail {
            id,
            name: format!("Trail {}", id),
            location: "Test Park".to_string(),
            length: 2.0,
            difficulty: Difficulty::Easy,
            elevation: 0,
            rating: 4.0,
            review_count: 0,
            features: vec![],
            coordinates: coordinates.map(Coordinates::from),
            estimated_time: String::new(),
            season: String::new(),
            description: String::new(),
            tips: String::new(),
            permits: false,
            dogs: false,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Coordinates::new(40.3428, -105.6836);
        assert_eq!(distance_miles(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(37.7749, -119.4194);
        let b = Coordinates::new(36.0544, -112.0963);
        assert_eq!(distance_miles(a, b), distance_miles(b, a));
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_miles(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert_eq!(d, 69.1);
    }

    #[test]
    fn test_nearby_orders_by_distance_then_id() {
        let origin = Coordinates::new(37.7459, -119.5571);
        let trails = vec![
            trail_at(11, Some((37.7459, -119.5571))),
            trail_at(2, Some((37.7749, -119.4194))),
            trail_at(7, Some((37.7459, -119.5571))),
            trail_at(4, None),
            trail_at(12, Some((36.0544, -112.0963))),
        ];

        let results = nearby(&trails, origin, DEFAULT_NEARBY_RADIUS_MILES);
        let ids: Vec<i64> = results.iter().map(|r| r.trail.id).collect();

        assert_eq!(ids, vec![7, 11, 2]);
        assert_eq!(results[0].distance, 0.0);
        assert!(results[2].distance > 0.0);
    }

    #[test]
    fn test_nearby_radius_is_inclusive() {
        let origin = Coordinates::new(0.0, 0.0);
        let trails = vec![trail_at(1, Some((1.0, 0.0)))];
        assert_eq!(nearby(&trails, origin, 69.1).len(), 1);
        assert!(nearby(&trails, origin, 69.0).is_empty());
    }

    #[test]
    fn test_bounds_skips_missing_coordinates() {
        let trails = vec![
            trail_at(1, Some((40.0, -105.0))),
            trail_at(2, None),
            trail_at(3, Some((34.0, -117.0))),
        ];
        let points = bounds(&trails);
        assert_eq!(points.len(), 2);

        let vp = viewport(&points).unwrap();
        assert_eq!(vp.south_west, Coordinates::new(34.0, -117.0));
        assert_eq!(vp.north_east, Coordinates::new(40.0, -105.0));
    }

    #[test]
    fn test_bounds_of_empty_input() {
        assert!(bounds(&[]).is_empty());
        assert!(viewport(&[]).is_none());
    }
}
