//! Pure display transforms applied to decoded weather data.
//!
//! Nothing here touches the network or any state; the orchestration layers
//! call these on every successful fetch.

use url::Url;

use crate::model::{LocationCandidate, SearchResultEntry, WeatherSnapshot};

/// Render a Fahrenheit temperature for display: floor, no decimal point.
pub fn format_temperature(temp_f: f64) -> String {
    format!("{}", temp_f.floor() as i64)
}

/// Rewrite a scheme-relative provider icon ref into an absolute 128x128 URL.
///
/// The provider hands out `//cdn.../64x64/...` paths; the display wants the
/// larger variant. Returns `None` when the rewritten string does not parse
/// as a URL, in which case the caller renders without an icon.
pub fn rewrite_icon_url(icon_ref: &str) -> Option<Url> {
    let upscaled = icon_ref.replacen("64x64", "128x128", 1);
    Url::parse(&format!("https:{upscaled}")).ok()
}

/// Compose a search candidate and its weather snapshot into a display entry.
pub fn entry_from(candidate: LocationCandidate, snapshot: WeatherSnapshot) -> SearchResultEntry {
    let formatted_temperature = format_temperature(snapshot.temperature_f);
    let icon_url = rewrite_icon_url(&snapshot.condition_icon_ref);

    SearchResultEntry { candidate, snapshot, formatted_temperature, icon_url }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_is_floored_without_decimal_point() {
        assert_eq!(format_temperature(72.9), "72");
        assert_eq!(format_temperature(72.0), "72");
        assert_eq!(format_temperature(0.4), "0");
    }

    #[test]
    fn negative_temperature_floors_downward() {
        assert_eq!(format_temperature(-5.5), "-6");
    }

    #[test]
    fn icon_rewrite_upscales_and_makes_absolute() {
        let url = rewrite_icon_url("//cdn.weatherapi.com/weather/64x64/day/113.png")
            .expect("rewrite should produce a valid URL");
        assert_eq!(
            url.as_str(),
            "https://cdn.weatherapi.com/weather/128x128/day/113.png"
        );
    }

    #[test]
    fn icon_rewrite_leaves_refs_without_size_segment_intact() {
        let url = rewrite_icon_url("//cdn.weatherapi.com/weather/day/113.png")
            .expect("ref without 64x64 still forms a valid URL");
        assert_eq!(url.as_str(), "https://cdn.weatherapi.com/weather/day/113.png");
    }

    #[test]
    fn icon_rewrite_rejects_unparseable_ref() {
        assert!(rewrite_icon_url("").is_none());
    }

    #[test]
    fn entry_carries_derived_fields() {
        let candidate = LocationCandidate {
            id: None,
            name: "Union City".to_string(),
            region: "New Jersey".to_string(),
            country: "United States of America".to_string(),
            lat: 40.78,
            lon: -74.02,
        };
        let snapshot = WeatherSnapshot {
            location_name: "Union City".to_string(),
            region: "New Jersey".to_string(),
            country: "United States of America".to_string(),
            temperature_f: 48.7,
            feels_like_f: 44.2,
            humidity_pct: 61,
            uv_index: 2.0,
            condition_text: "Sunny".to_string(),
            condition_icon_ref: "//cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
            condition_code: 1000,
        };

        let entry = entry_from(candidate, snapshot);
        assert_eq!(entry.formatted_temperature, "48");
        assert_eq!(
            entry.icon_url.as_ref().map(Url::as_str),
            Some("https://cdn.weatherapi.com/weather/128x128/day/113.png")
        );
        assert_eq!(entry.key(), "40.78,-74.02");
    }
}
