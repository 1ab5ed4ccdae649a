//! Open-Meteo (WMO) weather codes mapped onto OpenWeather-style labels and icon ids,
//! so the fallback provider renders with the same icon set as the primary.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeEntry {
    pub code: i32,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Returned for any code outside the table.
pub const UNKNOWN: WeatherCodeEntry = WeatherCodeEntry {
    code: -1,
    label: "Unknown",
    icon: "04d",
};

const ENTRIES: &[(i32, &str, &str)] = &[
    (0, "Clear sky", "01d"),
    (1, "Mainly clear", "02d"),
    (2, "Partly cloudy", "02d"),
    (3, "Overcast", "04d"),
    (45, "Fog", "50d"),
    (48, "Depositing rime fog", "50d"),
    (51, "Light drizzle", "09d"),
    (53, "Moderate drizzle", "09d"),
    (55, "Dense drizzle", "09d"),
    (56, "Freezing drizzle", "09d"),
    (57, "Dense freezing drizzle", "09d"),
    (61, "Slight rain", "10d"),
    (63, "Rain", "10d"),
    (65, "Heavy rain", "10d"),
    (66, "Freezing rain", "10d"),
    (67, "Heavy freezing rain", "10d"),
    (71, "Slight snow fall", "13d"),
    (73, "Snow fall", "13d"),
    (75, "Heavy snow fall", "13d"),
    (77, "Snow grains", "13d"),
    (80, "Rain showers", "09d"),
    (81, "Heavy rain showers", "09d"),
    (82, "Violent rain showers", "09d"),
    (85, "Snow showers", "13d"),
    (86, "Heavy snow showers", "13d"),
    (95, "Thunderstorm", "11d"),
    (96, "Thunderstorm with hail", "11d"),
    (99, "Thunderstorm with heavy hail", "11d"),
];

static TABLE: LazyLock<HashMap<i32, WeatherCodeEntry>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|&(code, label, icon)| (code, WeatherCodeEntry { code, label, icon }))
        .collect()
});

/// Look up a weather code. Never fails: unknown codes map to [`UNKNOWN`].
pub fn normalize(code: i32) -> WeatherCodeEntry {
    TABLE.get(&code).copied().unwrap_or(UNKNOWN)
}
