//! WMO weather codes as reported by Open-Meteo.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Map a WMO weather code to its display text. Unmapped codes read "Unknown".
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Heavy drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        71 => "Light snow",
        73 => "Snow",
        75 => "Heavy snow",
        80 | 81 => "Rain showers",
        82 => "Heavy rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Heavy thunderstorm",
        _ => "Unknown",
    }
}
