//! Hiking advice derived from conditions and trail attributes.

use crate::models::{Difficulty, Trail, WeatherReport};

pub fn advice(weather: &WeatherReport, trail: &Trail) -> Vec<String> {
    let mut tips = Vec::new();

    if weather.temperature > 85 {
        tips.push("Very hot! Start early, bring extra water, and take frequent breaks.");
    } else if weather.temperature < 40 {
        tips.push("Cold conditions! Dress in layers and watch for ice on trails.");
    }

    if weather.wind_speed > 20 {
        tips.push("High winds expected. Be cautious on exposed ridges and peaks.");
    }

    if weather.humidity > 80 {
        tips.push("High humidity will make it feel hotter. Stay hydrated!");
    }

    if trail.difficulty == Difficulty::Hard && weather.temperature > 80 {
        tips.push("Challenging trail in hot weather - consider postponing or starting very early.");
    }

    if trail.has_feature("waterfall") && weather.precipitation > 0.1 {
        tips.push("Recent rain may make trails muddy and waterfall areas slippery.");
    }

    if trail.elevation > 1000 && weather.temperature < 50 {
        tips.push("Higher elevation will be colder. Bring extra layers!");
    }

    tips.into_iter().map(String::from).collect()
}
