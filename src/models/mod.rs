//! Data models for the Trailhead application.
//!
//! JSON field names are camelCase to match the browser front-end.

mod review;
mod trail;
mod weather;

pub use review::*;
pub use trail::*;
pub use weather::*;

/// Round to one decimal place, the precision used for every displayed
/// distance, length and rating.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::round_tenth;

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(14.5 / 3.0), 4.8);
        assert_eq!(round_tenth(4.25), 4.3);
        assert_eq!(round_tenth(0.0), 0.0);
    }
}
