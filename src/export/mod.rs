//! CSV export of saved trails.

use crate::models::Trail;

pub const CSV_HEADER: [&str; 7] = [
    "name",
    "location",
    "length",
    "difficulty",
    "elevation",
    "rating",
    "features",
];

pub const EXPORT_FILENAME: &str = "my-saved-trails.csv";

/// One row per trail under a fixed header. Every field is double-quoted and
/// embedded quotes are doubled.
pub fn saved_trails_csv(trails: &[Trail]) -> String {
    let mut rows = Vec::with_capacity(trails.len() + 1);
    rows.push(CSV_HEADER.join(","));

    for trail in trails {
        let fields = [
            trail.name.clone(),
            trail.location.clone(),
            trail.length.to_string(),
            trail.difficulty.to_string(),
            trail.elevation.to_string(),
            trail.rating.to_string(),
            trail.features.join(", "),
        ];
        let quoted: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        rows.push(quoted.join(","));
    }

    rows.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
