//! The fixed U.S. state reference set and name resolution over it.
//!
//! Centroids are approximate geographic centres used for coarse "nearby
//! state" suggestions, not for containment.

use rapidfuzz::distance::levenshtein;

use crate::{GeoPoint, geo_math::haversine_between};

/// One entry of the state reference set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsState {
    /// Full name, e.g. `"New York"`.
    pub name: &'static str,
    /// Two-letter postal abbreviation.
    pub abbreviation: &'static str,
    /// Approximate geographic centre.
    pub centroid: GeoPoint,
}

impl UsState {
    const fn new(name: &'static str, abbreviation: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            abbreviation,
            centroid: GeoPoint::from_static(lat, lng),
        }
    }
}

/// The fifty states, alphabetical by name.
pub const US_STATES: [UsState; 50] = [
    UsState::new("Alabama", "AL", 32.806671, -86.79113),
    UsState::new("Alaska", "AK", 61.370716, -152.404419),
    UsState::new("Arizona", "AZ", 33.729759, -111.431221),
    UsState::new("Arkansas", "AR", 34.969704, -92.373123),
    UsState::new("California", "CA", 36.116203, -119.681564),
    UsState::new("Colorado", "CO", 39.059811, -105.311104),
    UsState::new("Connecticut", "CT", 41.597782, -72.755371),
    UsState::new("Delaware", "DE", 39.318523, -75.507141),
    UsState::new("Florida", "FL", 27.766279, -81.686783),
    UsState::new("Georgia", "GA", 33.040619, -83.643074),
    UsState::new("Hawaii", "HI", 21.094318, -157.498337),
    UsState::new("Idaho", "ID", 44.240459, -114.478828),
    UsState::new("Illinois", "IL", 40.349457, -88.986137),
    UsState::new("Indiana", "IN", 39.849426, -86.258278),
    UsState::new("Iowa", "IA", 42.011539, -93.210526),
    UsState::new("Kansas", "KS", 38.5266, -96.726486),
    UsState::new("Kentucky", "KY", 37.66814, -84.670067),
    UsState::new("Louisiana", "LA", 31.169546, -91.867805),
    UsState::new("Maine", "ME", 44.693947, -69.381927),
    UsState::new("Maryland", "MD", 39.063946, -76.802101),
    UsState::new("Massachusetts", "MA", 42.230171, -71.530106),
    UsState::new("Michigan", "MI", 43.326618, -84.536095),
    UsState::new("Minnesota", "MN", 45.694454, -93.900192),
    UsState::new("Mississippi", "MS", 32.741646, -89.678696),
    UsState::new("Missouri", "MO", 38.456085, -92.288368),
    UsState::new("Montana", "MT", 46.921925, -110.454353),
    UsState::new("Nebraska", "NE", 41.12537, -98.268082),
    UsState::new("Nevada", "NV", 38.313515, -117.055374),
    UsState::new("New Hampshire", "NH", 43.452492, -71.563896),
    UsState::new("New Jersey", "NJ", 40.298904, -74.521011),
    UsState::new("New Mexico", "NM", 34.840515, -106.248482),
    UsState::new("New York", "NY", 42.165726, -74.948051),
    UsState::new("North Carolina", "NC", 35.630066, -79.806419),
    UsState::new("North Dakota", "ND", 47.528912, -99.784012),
    UsState::new("Ohio", "OH", 40.388783, -82.764915),
    UsState::new("Oklahoma", "OK", 35.565342, -96.928917),
    UsState::new("Oregon", "OR", 44.572021, -122.070938),
    UsState::new("Pennsylvania", "PA", 40.590752, -77.209755),
    UsState::new("Rhode Island", "RI", 41.680893, -71.51178),
    UsState::new("South Carolina", "SC", 33.856892, -80.945007),
    UsState::new("South Dakota", "SD", 44.299782, -99.438828),
    UsState::new("Tennessee", "TN", 35.747845, -86.692345),
    UsState::new("Texas", "TX", 31.054487, -97.563461),
    UsState::new("Utah", "UT", 40.150032, -111.862434),
    UsState::new("Vermont", "VT", 44.045876, -72.710686),
    UsState::new("Virginia", "VA", 37.769337, -78.169968),
    UsState::new("Washington", "WA", 47.400902, -121.490494),
    UsState::new("West Virginia", "WV", 38.491226, -80.954456),
    UsState::new("Wisconsin", "WI", 44.268543, -89.616508),
    UsState::new("Wyoming", "WY", 42.755966, -107.30249),
];

const DISTRICT_OF_COLUMBIA: (&str, &str) = ("District of Columbia", "DC");

/// Case-fold and collapse runs of whitespace.
fn normalise(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Find a state by full name or abbreviation, ignoring case and spacing.
///
/// # Examples
/// ```
/// use venuemap_core::states::resolve_us_state;
///
/// assert_eq!(resolve_us_state(" new   york ").map(|s| s.abbreviation), Some("NY"));
/// assert_eq!(resolve_us_state("tx").map(|s| s.name), Some("Texas"));
/// assert!(resolve_us_state("Ontario").is_none());
/// ```
#[must_use]
pub fn resolve_us_state(input: &str) -> Option<&'static UsState> {
    let needle = normalise(input);
    if needle.is_empty() {
        return None;
    }
    US_STATES.iter().find(|state| {
        state.name.eq_ignore_ascii_case(&needle) || state.abbreviation.eq_ignore_ascii_case(&needle)
    })
}

/// Accepted spellings of a state: `[full name, abbreviation]`.
///
/// The District of Columbia is recognised alongside the fifty states.
/// Unknown input yields an empty list.
#[must_use]
pub fn state_synonyms(input: &str) -> Vec<&'static str> {
    if let Some(state) = resolve_us_state(input) {
        return vec![state.name, state.abbreviation];
    }
    let needle = normalise(input);
    let (name, abbreviation) = DISTRICT_OF_COLUMBIA;
    if name.eq_ignore_ascii_case(&needle)
        || abbreviation.eq_ignore_ascii_case(&needle)
        || needle == "d.c."
        || needle == "washington dc"
        || needle == "washington, dc"
    {
        return vec![name, abbreviation];
    }
    Vec::new()
}

/// Rank states by how closely their names resemble `state_name`.
///
/// Similarity is the Levenshtein edit distance between the case-folded,
/// whitespace-collapsed input and each lower-cased state name; an exact
/// abbreviation match counts as distance zero. Ties are broken
/// alphabetically. Blank input yields an empty list.
///
/// # Examples
/// ```
/// use venuemap_core::states::nearest_us_states;
///
/// assert_eq!(nearest_us_states("Pensylvania", 1), vec!["Pennsylvania"]);
/// assert_eq!(nearest_us_states("ny", 1), vec!["New York"]);
/// assert!(nearest_us_states("  ", 3).is_empty());
/// ```
#[must_use]
pub fn nearest_us_states(state_name: &str, count: usize) -> Vec<&'static str> {
    let needle = normalise(state_name);
    if needle.is_empty() || count == 0 {
        return Vec::new();
    }
    let mut ranked: Vec<(usize, &'static str)> = US_STATES
        .iter()
        .map(|state| {
            let distance = if state.abbreviation.eq_ignore_ascii_case(&needle) {
                0
            } else {
                levenshtein::distance(needle.chars(), state.name.to_lowercase().chars())
            };
            (distance, state.name)
        })
        .collect();
    ranked.sort_unstable();
    ranked
        .into_iter()
        .take(count)
        .map(|(_, name)| name)
        .collect()
}

/// Rank the other states by centroid distance from the resolved state.
///
/// Input unknown to [`resolve_us_state`] yields an empty list.
#[must_use]
pub fn neighbouring_us_states(state_name: &str, count: usize) -> Vec<&'static str> {
    let Some(origin) = resolve_us_state(state_name) else {
        return Vec::new();
    };
    let mut ranked: Vec<(f64, &'static str)> = US_STATES
        .iter()
        .filter(|state| state.name != origin.name)
        .map(|state| (haversine_between(origin.centroid, state.centroid), state.name))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    ranked
        .into_iter()
        .take(count)
        .map(|(_, name)| name)
        .collect()
}
