//! Composite trail queries and stable sorting.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::{Difficulty, LengthBand, Trail};

use super::{filter_by_difficulty, filter_by_feature, filter_by_length, search};

/// Field a trail list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    Name,
    Location,
    Length,
    Difficulty,
    Elevation,
    #[default]
    Rating,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "name" => Ok(SortKey::Name),
            "location" => Ok(SortKey::Location),
            "length" => Ok(SortKey::Length),
            "difficulty" => Ok(SortKey::Difficulty),
            "elevation" => Ok(SortKey::Elevation),
            "rating" => Ok(SortKey::Rating),
            other => Err(format!("Cannot sort by '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Unknown sort order '{}'", other)),
        }
    }
}

/// Total order on a single key. Strings, difficulty included, compare
/// case-insensitively.
fn compare(key: SortKey, a: &Trail, b: &Trail) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Location => a.location.to_lowercase().cmp(&b.location.to_lowercase()),
        SortKey::Length => a.length.total_cmp(&b.length),
        SortKey::Difficulty => a.difficulty.as_str().cmp(b.difficulty.as_str()),
        SortKey::Elevation => a.elevation.cmp(&b.elevation),
        SortKey::Rating => a.rating.total_cmp(&b.rating),
    }
}

/// Stable sort: trails with equal keys keep their input order in either
/// direction.
pub fn sort(mut trails: Vec<Trail>, key: SortKey, order: SortOrder) -> Vec<Trail> {
    trails.sort_by(|a, b| match order {
        SortOrder::Asc => compare(key, a, b),
        SortOrder::Desc => compare(key, b, a),
    });
    trails
}

/// Search, then difficulty, length and feature filters, then an optional sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailQuery {
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub length: Option<LengthBand>,
    pub feature: Option<String>,
    pub sort: Option<(SortKey, SortOrder)>,
}

impl TrailQuery {
    pub fn apply(&self, trails: Vec<Trail>) -> Vec<Trail> {
        let trails = search(self.search.as_deref(), trails);
        let trails = filter_by_difficulty(self.difficulty, trails);
        let trails = filter_by_length(self.length, trails);
        let trails = filter_by_feature(self.feature.as_deref(), trails);

        match self.sort {
            Some((key, order)) => sort(trails, key, order),
            None => trails,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::trail;
    use super::*;

    fn names(trails: &[Trail]) -> Vec<&str> {
        trails.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_sort_strings_case_insensitively() {
        let trails = vec![
            trail(1, "bear lake", 1.0, Difficulty::Easy),
            trail(2, "Angels Landing", 1.0, Difficulty::Easy),
            trail(3, "Cascade", 1.0, Difficulty::Easy),
        ];
        let sorted = sort(trails, SortKey::Name, SortOrder::Asc);
        assert_eq!(names(&sorted), vec!["Angels Landing", "bear lake", "Cascade"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut trails = vec![
            trail(1, "First", 2.0, Difficulty::Easy),
            trail(2, "Second", 5.0, Difficulty::Easy),
            trail(3, "Third", 2.0, Difficulty::Easy),
            trail(4, "Fourth", 2.0, Difficulty::Easy),
        ];
        trails[1].rating = 4.9;

        let desc = sort(trails.clone(), SortKey::Rating, SortOrder::Desc);
        assert_eq!(names(&desc), vec!["Second", "First", "Third", "Fourth"]);

        let asc = sort(trails, SortKey::Length, SortOrder::Asc);
        assert_eq!(names(&asc), vec!["First", "Third", "Fourth", "Second"]);
    }

    #[test]
    fn test_sort_difficulty_by_name() {
        let trails = vec![
            trail(1, "H", 1.0, Difficulty::Hard),
            trail(2, "E", 1.0, Difficulty::Easy),
            trail(3, "M", 1.0, Difficulty::Moderate),
        ];
        let sorted = sort(trails, SortKey::Difficulty, SortOrder::Asc);
        assert_eq!(names(&sorted), vec!["E", "H", "M"]);
    }

    #[test]
    fn test_query_applies_every_filter() {
        let mut a = trail(1, "Lake Loop", 2.0, Difficulty::Easy);
        a.features = vec!["lake".to_string()];
        let mut b = trail(2, "Lake Ridge", 4.0, Difficulty::Easy);
        b.features = vec!["lake".to_string()];
        let mut c = trail(3, "Lake Summit", 4.0, Difficulty::Hard);
        c.features = vec!["lake".to_string()];
        let d = trail(4, "Lake Meadow", 4.0, Difficulty::Easy);

        let query = TrailQuery {
            search: Some("lake".to_string()),
            difficulty: Some(Difficulty::Easy),
            length: Some(LengthBand::Medium),
            feature: Some("lake".to_string()),
            sort: None,
        };

        let results = query.apply(vec![a, b, c, d]);
        assert_eq!(names(&results), vec!["Lake Ridge"]);
    }

    #[test]
    fn test_default_query_is_identity() {
        let trails = vec![
            trail(2, "B", 1.0, Difficulty::Easy),
            trail(1, "A", 1.0, Difficulty::Easy),
        ];
        assert_eq!(TrailQuery::default().apply(trails.clone()), trails);
    }

    #[test]
    fn test_parse_sort_params() {
        assert_eq!("Rating".parse::<SortKey>(), Ok(SortKey::Rating));
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("color".parse::<SortKey>().is_err());
    }
}
