//! In-memory query surface over the trail collection.
//!
//! The filter functions are pure: they take a trail list by value and return
//! the subset that qualifies. An absent or empty argument is the identity.

mod query;
mod source;

pub use query::*;
pub use source::*;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{round_tenth, Difficulty, LengthBand, Trail};

/// Where the loaded catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    Source(std::path::PathBuf),
    Builtin,
}

/// The trail collection, owned by whoever composes the service.
#[derive(Debug, Clone)]
pub struct Catalog {
    trails: Vec<Trail>,
    origin: CatalogOrigin,
}

impl Catalog {
    pub fn new(trails: Vec<Trail>, origin: CatalogOrigin) -> Self {
        Self { trails, origin }
    }

    pub fn trails(&self) -> &[Trail] {
        &self.trails
    }

    pub fn origin(&self) -> &CatalogOrigin {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn by_id(&self, id: i64) -> Option<&Trail> {
        by_id(id, &self.trails)
    }

    pub fn query(&self, query: &TrailQuery) -> Vec<Trail> {
        query.apply(self.trails.clone())
    }

    /// Catalog trails whose ids are in `ids`, in catalog order.
    pub fn saved_trails(&self, ids: &[i64]) -> Vec<Trail> {
        self.trails
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect()
    }

    /// Overwrite a trail's derived rating and review count.
    ///
    /// Unknown ids are ignored. The seed rating stays in place while a
    /// trail has no reviews.
    pub fn apply_review_aggregate(&mut self, id: i64, average: f64, count: usize) {
        if let Some(trail) = self.trails.iter_mut().find(|t| t.id == id) {
            trail.review_count = count;
            if count > 0 {
                trail.rating = average;
            }
        }
    }
}

/// Case-insensitive substring match on name, location or any feature tag.
pub fn search(query: Option<&str>, trails: Vec<Trail>) -> Vec<Trail> {
    let needle = match query.map(str::trim) {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return trails,
    };

    trails
        .into_iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle)
                || t.location.to_lowercase().contains(&needle)
                || t.features.iter().any(|f| f.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn filter_by_difficulty(value: Option<Difficulty>, trails: Vec<Trail>) -> Vec<Trail> {
    match value {
        Some(d) => trails.into_iter().filter(|t| t.difficulty == d).collect(),
        None => trails,
    }
}

pub fn filter_by_length(band: Option<LengthBand>, trails: Vec<Trail>) -> Vec<Trail> {
    match band {
        Some(b) => trails.into_iter().filter(|t| t.length_band() == b).collect(),
        None => trails,
    }
}

pub fn filter_by_feature(tag: Option<&str>, trails: Vec<Trail>) -> Vec<Trail> {
    match tag.map(str::trim) {
        Some(tag) if !tag.is_empty() => trails.into_iter().filter(|t| t.has_feature(tag)).collect(),
        _ => trails,
    }
}

pub fn by_id(id: i64, trails: &[Trail]) -> Option<&Trail> {
    trails.iter().find(|t| t.id == id)
}

/// Aggregate figures for a set of trails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailStats {
    pub count: usize,
    pub total_length: f64,
    pub average_length: f64,
    pub average_rating: f64,
    pub difficulty_histogram: BTreeMap<Difficulty, usize>,
}

/// `None` when there is nothing to aggregate.
pub fn stats(trails: &[Trail]) -> Option<TrailStats> {
    if trails.is_empty() {
        return None;
    }

    let count = trails.len();
    let total_length: f64 = trails.iter().map(|t| t.length).sum();
    let total_rating: f64 = trails.iter().map(|t| t.rating).sum();

    let mut difficulty_histogram = BTreeMap::new();
    for trail in trails {
        *difficulty_histogram.entry(trail.difficulty).or_insert(0) += 1;
    }

    Some(TrailStats {
        count,
        total_length: round_tenth(total_length),
        average_length: round_tenth(total_length / count as f64),
        average_rating: round_tenth(total_rating / count as f64),
        difficulty_histogram,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::{Coordinates, Difficulty, Trail};

    pub fn trail(id: i64, name: &str, length: f64, difficulty: Difficulty) -> Trail {
        Trail {
            id,
            name: name.to_string(),
            location: "Test Park".to_string(),
            length,
            difficulty,
            elevation: 100,
            rating: 4.0,
            review_count: 0,
            features: vec![],
            coordinates: Some(Coordinates::new(40.0, -105.0)),
            estimated_time: "1 hour".to_string(),
            season: "Year-round".to_string(),
            description: String::new(),
            tips: String::new(),
            permits: false,
            dogs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::trail;
    use super::*;

    fn three_trails() -> Vec<Trail> {
        let mut a = trail(1, "Emerald Lake", 2.0, Difficulty::Easy);
        a.features = vec!["scenic-views".to_string(), "Wildlife".to_string()];
        a.rating = 4.8;
        let mut b = trail(2, "Cascade Falls", 4.5, Difficulty::Moderate);
        b.location = "Yosemite National Park".to_string();
        b.features = vec!["waterfall".to_string()];
        b.rating = 4.6;
        let mut c = trail(3, "Devil's Backbone", 8.0, Difficulty::Hard);
        c.rating = 4.4;
        vec![a, b, c]
    }

    #[test]
    fn test_search_matches_name_location_and_features() {
        assert_eq!(search(Some("EMERALD"), three_trails()).len(), 1);
        assert_eq!(search(Some("yosemite"), three_trails())[0].id, 2);
        assert_eq!(search(Some("wild"), three_trails())[0].id, 1);
        assert!(search(Some("glacier"), three_trails()).is_empty());
    }

    #[test]
    fn test_empty_arguments_are_identity() {
        assert_eq!(search(None, three_trails()), three_trails());
        assert_eq!(search(Some("  "), three_trails()), three_trails());
        assert_eq!(filter_by_difficulty(None, three_trails()), three_trails());
        assert_eq!(filter_by_length(None, three_trails()), three_trails());
        assert_eq!(filter_by_feature(Some(""), three_trails()), three_trails());
    }

    #[test]
    fn test_filter_by_difficulty_is_exact() {
        let trails = three_trails();
        let hard = filter_by_difficulty(Some(Difficulty::Hard), trails.clone());
        for t in &trails {
            let included = hard.iter().any(|h| h.id == t.id);
            assert_eq!(included, t.difficulty == Difficulty::Hard);
        }
    }

    #[test]
    fn test_filter_by_length_bands() {
        let short = filter_by_length(Some(LengthBand::Short), three_trails());
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].length, 2.0);

        let edges = vec![
            trail(10, "Three", 3.0, Difficulty::Easy),
            trail(11, "Six", 6.0, Difficulty::Easy),
        ];
        assert_eq!(filter_by_length(Some(LengthBand::Medium), edges.clone()).len(), 2);
        assert!(filter_by_length(Some(LengthBand::Short), edges.clone()).is_empty());
        assert!(filter_by_length(Some(LengthBand::Long), edges).is_empty());
    }

    #[test]
    fn test_filter_by_feature_is_whole_tag() {
        assert_eq!(filter_by_feature(Some("WATERFALL"), three_trails()).len(), 1);
        assert!(filter_by_feature(Some("water"), three_trails()).is_empty());
    }

    #[test]
    fn test_stats_example() {
        let s = stats(&three_trails()).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.total_length, 14.5);
        assert_eq!(s.average_length, 4.8);
        assert_eq!(s.average_rating, 4.6);
        assert_eq!(s.difficulty_histogram.get(&Difficulty::Hard), Some(&1));
        assert_eq!(s.difficulty_histogram.len(), 3);
    }

    #[test]
    fn test_stats_of_empty_input_is_none() {
        assert!(stats(&[]).is_none());
    }

    #[test]
    fn test_histogram_serializes_difficulty_names() {
        let s = stats(&three_trails()).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["difficultyHistogram"]["moderate"], 1);
        assert_eq!(json["averageLength"], 4.8);
    }

    #[test]
    fn test_apply_review_aggregate() {
        let mut catalog = Catalog::new(three_trails(), CatalogOrigin::Builtin);
        catalog.apply_review_aggregate(2, 4.0, 2);
        catalog.apply_review_aggregate(99, 1.0, 1);

        let t = catalog.by_id(2).unwrap();
        assert_eq!(t.rating, 4.0);
        assert_eq!(t.review_count, 2);
        assert_eq!(catalog.by_id(1).unwrap().rating, 4.8);
    }

    #[test]
    fn test_saved_trails_keep_catalog_order() {
        let catalog = Catalog::new(three_trails(), CatalogOrigin::Builtin);
        let saved = catalog.saved_trails(&[3, 1, 42]);
        let ids: Vec<i64> = saved.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
