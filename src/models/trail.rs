//! Trail model matching the frontend Trail record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Trail difficulty, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{}'", other)),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Named length band used for filtering.
///
/// Band edges belong to `Medium`: 3.0 and 6.0 miles are both medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBand {
    Short,
    Medium,
    Long,
}

impl LengthBand {
    pub fn classify(length: f64) -> Self {
        if length < 3.0 {
            LengthBand::Short
        } else if length <= 6.0 {
            LengthBand::Medium
        } else {
            LengthBand::Long
        }
    }
}

impl FromStr for LengthBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(LengthBand::Short),
            "medium" => Ok(LengthBand::Medium),
            "long" => Ok(LengthBand::Long),
            other => Err(format!("Unknown length range '{}'", other)),
        }
    }
}

/// A `(latitude, longitude)` pair in degrees, serialized as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(c: Coordinates) -> Self {
        (c.lat, c.lon)
    }
}

/// A catalog entry describing a hiking route.
///
/// Immutable after load except for `rating` and `review_count`, which are
/// recomputed from the review ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Miles
    pub length: f64,
    pub difficulty: Difficulty,
    /// Feet of elevation gain
    #[serde(default)]
    pub elevation: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: usize,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub permits: bool,
    #[serde(default)]
    pub dogs: bool,
}

impl Trail {
    /// Check the record-level invariants not expressed by the types.
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("trail {} has an empty name", self.id));
        }
        if !(self.length > 0.0) {
            return Err(format!("trail {} has non-positive length {}", self.id, self.length));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("trail {} has rating {} outside 0-5", self.id, self.rating));
        }
        if let Some(coords) = self.coordinates {
            if !coords.is_valid() {
                return Err(format!("trail {} has invalid coordinates", self.id));
            }
        }
        Ok(())
    }

    pub fn length_band(&self) -> LengthBand {
        LengthBand::classify(self.length)
    }

    /// Case-insensitive exact tag match.
    pub fn has_feature(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.features.iter().any(|f| f.to_lowercase() == tag)
    }
}

/// The trail source document shape, `{ "trails": [...] }`.
///
/// Records are kept as raw JSON so one malformed entry cannot reject the
/// whole document.
#[derive(Debug, Deserialize)]
pub struct TrailDocument {
    #[serde(default)]
    pub trails: Vec<serde_json::Value>,
}

/// A trail annotated with its distance from a search origin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyTrail {
    #[serde(flatten)]
    pub trail: Trail,
    /// Miles, rounded to one decimal
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_band_edges_are_medium() {
        assert_eq!(LengthBand::classify(2.99), LengthBand::Short);
        assert_eq!(LengthBand::classify(3.0), LengthBand::Medium);
        assert_eq!(LengthBand::classify(6.0), LengthBand::Medium);
        assert_eq!(LengthBand::classify(6.01), LengthBand::Long);
    }

    #[test]
    fn test_has_feature_folds_unicode_case() {
        let mut trail: Trail = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Cañón Loop",
            "location": "Somewhere",
            "length": 2.0,
            "difficulty": "easy",
            "features": ["Cañón-Views"]
        }))
        .unwrap();

        assert!(trail.has_feature("CAÑÓN-VIEWS"));
        assert!(!trail.has_feature("cañón"));

        trail.features = vec!["ÉTÉ".to_string()];
        assert!(trail.has_feature("été"));
    }

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Moderate ".parse::<Difficulty>(), Ok(Difficulty::Moderate));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_trail_deserializes_with_optional_fields_absent() {
        let trail: Trail = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Ridge Loop",
            "location": "Somewhere",
            "length": 4.2,
            "difficulty": "Moderate",
            "features": ["ridge"]
        }))
        .unwrap();

        assert_eq!(trail.difficulty, Difficulty::Moderate);
        assert!(trail.coordinates.is_none());
        assert_eq!(trail.rating, 0.0);
        assert!(!trail.dogs);
        assert!(trail.check().is_ok());
    }

    #[test]
    fn test_coordinates_round_trip_as_pair() {
        let coords: Coordinates = serde_json::from_str("[40.3428, -105.6836]").unwrap();
        assert_eq!(coords, Coordinates::new(40.3428, -105.6836));
        assert_eq!(serde_json::to_string(&coords).unwrap(), "[40.3428,-105.6836]");
    }

    #[test]
    fn test_check_rejects_bad_length_and_rating() {
        let mut trail: Trail = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "A", "location": "B", "length": 0.0,
            "difficulty": "easy", "features": []
        }))
        .unwrap();
        assert!(trail.check().is_err());

        trail.length = 1.0;
        trail.rating = 5.5;
        assert!(trail.check().is_err());
    }

    #[test]
    fn test_has_feature_is_exact_tag_match() {
        let trail: Trail = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "A", "location": "B", "length": 1.0,
            "difficulty": "easy", "features": ["Dog-Friendly", "waterfall"]
        }))
        .unwrap();
        assert!(trail.has_feature("dog-friendly"));
        assert!(!trail.has_feature("dog"));
    }
}
