use serde::{Deserialize, Serialize};
use url::Url;

/// Decoded current-weather conditions for one query at one point in time.
///
/// Produced only by a successful [`crate::client::WeatherService`] call;
/// temperature fields are Fahrenheit degrees exactly as the provider sent
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub region: String,
    pub country: String,
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub uv_index: f64,
    pub condition_text: String,
    /// Scheme-relative icon path, e.g. `//cdn.weatherapi.com/weather/64x64/day/113.png`.
    pub condition_icon_ref: String,
    pub condition_code: i64,
}

/// A location match from the search endpoint, not yet enriched with weather.
///
/// The provider may omit `id`; list identity comes from [`LocationCandidate::key`]
/// instead, which is stable across re-renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub id: Option<i64>,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl LocationCandidate {
    /// Deterministic identity for list rendering: the provider id when
    /// present, otherwise the coordinate pair.
    pub fn key(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => self.coordinate_query(),
        }
    }

    /// The `"<lat>,<lon>"` form of this candidate, usable as a weather query.
    pub fn coordinate_query(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// A candidate enriched with its weather snapshot and display fields.
///
/// Built by [`crate::enrich::entry_from`]; list order is the provider's
/// relevance order and is never re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultEntry {
    pub candidate: LocationCandidate,
    pub snapshot: WeatherSnapshot,
    /// Floor of `temperature_f`, rendered without a decimal point.
    pub formatted_temperature: String,
    /// Absolute 128x128 icon URL; `None` when the provider ref does not
    /// rewrite into a valid URL (the entry still renders without an icon).
    pub icon_url: Option<Url>,
}

impl SearchResultEntry {
    pub fn key(&self) -> String {
        self.candidate.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: Option<i64>) -> LocationCandidate {
        LocationCandidate {
            id,
            name: "Union City".to_string(),
            region: "New Jersey".to_string(),
            country: "United States of America".to_string(),
            lat: 40.78,
            lon: -74.02,
        }
    }

    #[test]
    fn key_prefers_provider_id() {
        assert_eq!(candidate(Some(315)).key(), "315");
    }

    #[test]
    fn key_falls_back_to_coordinates() {
        assert_eq!(candidate(None).key(), "40.78,-74.02");
    }

    #[test]
    fn key_is_stable_across_calls() {
        let c = candidate(None);
        assert_eq!(c.key(), c.key());
    }

    #[test]
    fn coordinate_query_matches_provider_format() {
        assert_eq!(candidate(Some(1)).coordinate_query(), "40.78,-74.02");
    }
}
