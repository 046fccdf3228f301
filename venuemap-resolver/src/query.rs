//! Query-level location preprocessing.
//!
//! A search query arrives with a parsed location (city, state, country and
//! the remaining free text). [`resolve_query_location`] rewrites that
//! location from the override table, or from a state name spelled out in the
//! query, and reports the strict-match hints downstream filters apply.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use venuemap_core::states::{US_STATES, state_synonyms};

use crate::matcher::{collapse_whitespace, find_alias};

/// Location fields extracted from a query by an upstream parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ParsedLocation {
    /// Parsed city, if any.
    pub city: Option<String>,
    /// Parsed state, if any.
    pub state: Option<String>,
    /// Parsed country, if any.
    pub country: Option<String>,
    /// Query text left after the location was removed.
    #[cfg_attr(feature = "serde", serde(alias = "restOfQuery"))]
    pub rest_of_query: String,
}

/// A rewritten query location plus strict-match hints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocationOverrides {
    /// Location after overrides.
    pub location: ParsedLocation,
    /// City a result must match exactly.
    pub force_city_exact: Option<String>,
    /// Spellings a result's state must match one of.
    pub force_state_any: Vec<&'static str>,
    /// Cities a result may match instead of `force_city_exact`.
    pub force_city_any: Vec<&'static str>,
    /// Override-table key that fired, if any.
    pub matched_alias: Option<&'static str>,
}

const NYC_KEYS: [&str; 3] = ["nyc", "new york city", "newyorkcity"];
const NYC_CITIES: [&str; 2] = ["New York", "Brooklyn"];

struct StatePattern {
    name: &'static str,
    pattern: Regex,
}

// Longest names first so "west virginia" beats "virginia".
static STATE_NAMES: LazyLock<Vec<StatePattern>> = LazyLock::new(|| {
    let mut states: Vec<StatePattern> = US_STATES
        .iter()
        .filter_map(|state| {
            let source = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(state.name));
            RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .inspect_err(|err| log::error!("state pattern {source:?} failed: {err}"))
                .ok()
                .map(|pattern| StatePattern {
                    name: state.name,
                    pattern,
                })
        })
        .collect();
    states.sort_by(|a, b| b.name.len().cmp(&a.name.len()).then(a.name.cmp(b.name)));
    states
});

fn strip_rest(rest: &str, strip: impl FnOnce(&str) -> String) -> String {
    if rest.is_empty() {
        String::new()
    } else {
        strip(rest)
    }
}

/// Rewrite a parsed query location using the override table.
///
/// Resolution order:
///
/// 1. An alias from the override table (including standalone `DC` and `LA`)
///    replaces the city, state and country, is stripped from
///    `rest_of_query`, and sets the exact-city hint when the place names a
///    single city. New York City aliases accept either `New York` or
///    `Brooklyn`.
/// 2. Otherwise a full state name written in the query sets the state and is
///    stripped from `rest_of_query`.
/// 3. Otherwise the parsed location passes through unchanged.
///
/// In every case the state hint lists the canonical name and abbreviation of
/// the resulting state, when it is a known one.
///
/// # Examples
/// ```
/// use venuemap_resolver::{ParsedLocation, resolve_query_location};
///
/// let parsed = ParsedLocation {
///     rest_of_query: "jazz clubs nyc".into(),
///     ..ParsedLocation::default()
/// };
/// let resolved = resolve_query_location("jazz clubs nyc", &parsed);
/// assert_eq!(resolved.location.state.as_deref(), Some("New York"));
/// assert_eq!(resolved.location.rest_of_query, "jazz clubs");
/// assert_eq!(resolved.force_city_any, vec!["New York", "Brooklyn"]);
/// assert_eq!(resolved.force_state_any, vec!["New York", "NY"]);
/// ```
#[must_use]
pub fn resolve_query_location(raw_query: &str, parsed: &ParsedLocation) -> LocationOverrides {
    if let Some(alias) = find_alias(raw_query) {
        let place = alias.place;
        log::debug!("query {raw_query:?} matched alias {:?}", alias.key);
        let city = place
            .city
            .map(str::to_owned)
            .or_else(|| parsed.city.clone());
        let force_city_exact = if place.forces_exact_city() {
            city.clone()
        } else {
            None
        };
        let force_city_any = if NYC_KEYS.contains(&alias.key) {
            NYC_CITIES.to_vec()
        } else {
            Vec::new()
        };
        return LocationOverrides {
            location: ParsedLocation {
                city,
                state: Some(place.state.to_owned()),
                country: Some(place.country.to_owned()),
                rest_of_query: strip_rest(&parsed.rest_of_query, |rest| alias.strip_from(rest)),
            },
            force_city_exact,
            force_state_any: state_synonyms(place.state),
            force_city_any,
            matched_alias: Some(alias.key),
        };
    }

    let lowered = raw_query.to_lowercase();
    if let Some(state) = STATE_NAMES.iter().find(|state| state.pattern.is_match(&lowered)) {
        log::debug!("query {raw_query:?} names state {:?}", state.name);
        return LocationOverrides {
            location: ParsedLocation {
                city: parsed.city.clone(),
                state: Some(state.name.to_owned()),
                country: parsed.country.clone(),
                rest_of_query: strip_rest(&parsed.rest_of_query, |rest| {
                    collapse_whitespace(&state.pattern.replace_all(rest, " "))
                }),
            },
            force_state_any: state_synonyms(state.name),
            ..LocationOverrides::default()
        };
    }

    LocationOverrides {
        location: parsed.clone(),
        force_state_any: parsed
            .state
            .as_deref()
            .map(state_synonyms)
            .unwrap_or_default(),
        ..LocationOverrides::default()
    }
}
