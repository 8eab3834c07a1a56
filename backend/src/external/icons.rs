//! Provider icon codes mapped onto the shared glyph vocabulary

use shared::WeatherIcon;

/// AccuWeather icon numbers (day 1-32, night 33-44)
pub const ACCUWEATHER_ICONS: &[(u8, WeatherIcon)] = &[
    (1, WeatherIcon::Clear),          // Sunny
    (2, WeatherIcon::Clear),          // Mostly sunny
    (3, WeatherIcon::PartlyCloudy),   // Partly sunny
    (4, WeatherIcon::PartlyCloudy),   // Intermittent clouds
    (5, WeatherIcon::Fog),            // Hazy sunshine
    (6, WeatherIcon::Cloudy),         // Mostly cloudy
    (7, WeatherIcon::Overcast),       // Cloudy
    (8, WeatherIcon::Overcast),       // Dreary
    (11, WeatherIcon::Fog),           // Fog
    (12, WeatherIcon::Showers),       // Showers
    (13, WeatherIcon::Showers),       // Mostly cloudy w/ showers
    (14, WeatherIcon::Showers),       // Partly sunny w/ showers
    (15, WeatherIcon::Thunderstorm),  // T-storms
    (16, WeatherIcon::Thunderstorm),  // Mostly cloudy w/ t-storms
    (17, WeatherIcon::Thunderstorm),  // Partly sunny w/ t-storms
    (18, WeatherIcon::Rain),          // Rain
    (19, WeatherIcon::Snow),          // Flurries
    (20, WeatherIcon::Snow),          // Mostly cloudy w/ flurries
    (21, WeatherIcon::Snow),          // Partly sunny w/ flurries
    (22, WeatherIcon::Snow),          // Snow
    (23, WeatherIcon::Snow),          // Mostly cloudy w/ snow
    (24, WeatherIcon::Snow),          // Ice
    (25, WeatherIcon::Snow),          // Sleet
    (26, WeatherIcon::Rain),          // Freezing rain
    (29, WeatherIcon::Snow),          // Rain and snow
    (30, WeatherIcon::Clear),         // Hot
    (31, WeatherIcon::Clear),         // Cold
    (32, WeatherIcon::Clear),         // Windy
    (33, WeatherIcon::Clear),         // Clear
    (34, WeatherIcon::Clear),         // Mostly clear
    (35, WeatherIcon::PartlyCloudy),  // Partly cloudy
    (36, WeatherIcon::PartlyCloudy),  // Intermittent clouds
    (37, WeatherIcon::Fog),           // Hazy moonlight
    (38, WeatherIcon::Cloudy),        // Mostly cloudy
    (39, WeatherIcon::Showers),       // Partly cloudy w/ showers
    (40, WeatherIcon::Showers),       // Mostly cloudy w/ showers
    (41, WeatherIcon::Thunderstorm),  // Partly cloudy w/ t-storms
    (42, WeatherIcon::Thunderstorm),  // Mostly cloudy w/ t-storms
    (43, WeatherIcon::Snow),          // Mostly cloudy w/ flurries
    (44, WeatherIcon::Snow),          // Mostly cloudy w/ snow
];

/// Map an AccuWeather icon number, falling back to clear for unknown codes
pub fn accuweather_icon(code: u8) -> WeatherIcon {
    ACCUWEATHER_ICONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, icon)| *icon)
        .unwrap_or(WeatherIcon::Clear)
}

/// Icon for a day summary: any precipitation is rain, then heavy cloud
pub fn summary_icon(precip_mm: f64, cloud_cover_pct: f64) -> WeatherIcon {
    if precip_mm > 0.0 {
        WeatherIcon::Rain
    } else if cloud_cover_pct > 50.0 {
        WeatherIcon::Cloudy
    } else {
        WeatherIcon::PartlyCloudy
    }
}

/// Icon for a climate-normal day, checked in order: rain chance, cloud, frost
pub fn normals_icon(precip_prob_pct: f64, cloud_cover_pct: f64, min_temp_c: f64) -> WeatherIcon {
    if precip_prob_pct > 40.0 {
        WeatherIcon::Rain
    } else if cloud_cover_pct > 50.0 {
        WeatherIcon::Cloudy
    } else if min_temp_c < 0.0 {
        WeatherIcon::Snow
    } else {
        WeatherIcon::PartlyCloudy
    }
}

/// Rough precipitation estimate from a rain probability percentage.
///
/// Not a physical conversion: 100% maps to 25.4 mm (one inch).
pub fn precip_from_probability(probability_pct: f64) -> f64 {
    (probability_pct * 0.254).max(0.0)
}
