//! WMO weather condition codes as reported by Open-Meteo.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

pub const UNKNOWN_WEATHER: &str = "Unknown weather";

/// Every code the provider documents, in ascending order.
pub const CANONICAL_CODES: [i32; 28] = [
    0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82, 85,
    86, 95, 96, 99,
];

/// Human-readable phrase for a condition code.
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: Light",
        53 => "Drizzle: Moderate",
        55 => "Drizzle: Dense intensity",
        56 => "Freezing Drizzle: Light",
        57 => "Freezing Drizzle: Dense intensity",
        61 => "Rain: Slight",
        63 => "Rain: Moderate",
        65 => "Rain: Heavy intensity",
        66 => "Freezing Rain: Light",
        67 => "Freezing Rain: Heavy intensity",
        71 => "Snow fall: Slight",
        73 => "Snow fall: Moderate",
        75 => "Snow fall: Heavy intensity",
        77 => "Snow grains",
        80 => "Rain showers: Slight",
        81 => "Rain showers: Moderate",
        82 => "Rain showers: Violent",
        85 => "Snow showers: Slight",
        86 => "Snow showers: Heavy",
        95 => "Thunderstorm: Slight or moderate",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => UNKNOWN_WEATHER,
    }
}

/// Like [`describe`], for readings the provider may have left null.
pub fn describe_opt(code: Option<i32>) -> &'static str {
    code.map(describe).unwrap_or(UNKNOWN_WEATHER)
}

/// Icon asset file shared by a group of codes, e.g. all drizzle variants use `51.png`.
pub fn icon_asset(code: i32) -> Option<&'static str> {
    let file = match code {
        0 => "0.png",
        1 => "1.png",
        2 => "2.png",
        3 => "3.png",
        45 | 48 => "45.png",
        51 | 53 | 55 | 56 | 57 => "51.png",
        61 | 63 | 65 | 66 | 67 => "61.png",
        71 | 73 | 75 | 77 | 85 | 86 => "71.png",
        80..=82 => "80.png",
        95 | 96 | 99 => "95.png",
        _ => return None,
    };
    Some(file)
}

pub const DEFAULT_ICON_ASSET: &str = "default.png";
