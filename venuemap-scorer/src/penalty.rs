//! Penalties for unwanted cities and terms.

use std::collections::HashSet;

use regex::Regex;
use venuemap_core::MatchAttributes;

use crate::config::PenaltyConfig;

const CITY_PENALTY: f64 = 0.2;
const WORD_PENALTY: f64 = 0.35;
const WORD_PENALTY_STRICT: f64 = 0.6;
const SUBSTRING_PENALTY: f64 = 0.2;
const SUBSTRING_PENALTY_STRICT: f64 = 0.35;

#[derive(Debug)]
struct PenalisedTerm {
    term: String,
    whole_word: Regex,
}

/// Penalty lists compiled once per scoring call.
#[derive(Debug)]
pub(crate) struct Penalties {
    cities: HashSet<String>,
    terms: Vec<PenalisedTerm>,
    strict: bool,
}

impl Penalties {
    /// Normalise both lists, dropping blanks and repeats so that a term
    /// listed twice penalises once.
    pub(crate) fn compile(config: &PenaltyConfig) -> Self {
        let cities = config
            .cities
            .iter()
            .map(|city| city.trim().to_lowercase())
            .filter(|city| !city.is_empty())
            .collect();
        let mut seen = HashSet::new();
        let terms = config
            .terms
            .iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty() && seen.insert(term.clone()))
            .filter_map(|term| {
                let pattern = format!(r"(^|\b){}(\b|$)", regex::escape(&term));
                Regex::new(&pattern)
                    .inspect_err(|err| log::warn!("ignoring penalty term {term:?}: {err}"))
                    .ok()
                    .map(|whole_word| PenalisedTerm { term, whole_word })
            })
            .collect();
        Self {
            cities,
            terms,
            strict: config.strict,
        }
    }

    /// Total penalty for a hit whose city is `city`.
    #[expect(clippy::float_arithmetic, reason = "penalties accumulate per term")]
    pub(crate) fn of(&self, city: Option<&str>, attributes: &MatchAttributes) -> f64 {
        let city_penalty = match city {
            Some(name) if self.cities.contains(&name.trim().to_lowercase()) => CITY_PENALTY,
            _ => 0.0,
        };
        if self.terms.is_empty() {
            return city_penalty;
        }
        let text = attributes
            .text_fields()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let (word, substring) = if self.strict {
            (WORD_PENALTY_STRICT, SUBSTRING_PENALTY_STRICT)
        } else {
            (WORD_PENALTY, SUBSTRING_PENALTY)
        };
        self.terms.iter().fold(city_penalty, |total, term| {
            if term.whole_word.is_match(&text) {
                total + word
            } else if text.contains(&term.term) {
                total + substring
            } else {
                total
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn attributes(headline: &str) -> MatchAttributes {
        MatchAttributes {
            headline: Some(headline.to_owned()),
            company: Some("Acme Staffing".to_owned()),
            ..MatchAttributes::default()
        }
    }

    fn penalties(strict: bool) -> Penalties {
        Penalties::compile(&PenaltyConfig {
            cities: vec![" Newark ".to_owned()],
            terms: vec!["Intern".to_owned(), String::new()],
            strict,
        })
    }

    #[rstest]
    #[case("Summer intern wanted", false, 0.35)]
    #[case("Summer intern wanted", true, 0.6)]
    #[case("Internship programme", false, 0.2)]
    #[case("Internship programme", true, 0.35)]
    #[case("Open mic night", false, 0.0)]
    fn term_penalties_depend_on_match_kind(
        #[case] headline: &str,
        #[case] strict: bool,
        #[case] expected: f64,
    ) {
        assert_eq!(penalties(strict).of(None, &attributes(headline)), expected);
    }

    #[rstest]
    fn city_penalty_is_case_insensitive() {
        let penalty = penalties(false).of(Some("NEWARK"), &attributes("Open mic night"));
        assert_eq!(penalty, 0.2);
    }

    #[rstest]
    fn terms_match_company_text() {
        let compiled = Penalties::compile(&PenaltyConfig {
            terms: vec!["staffing".to_owned()],
            ..PenaltyConfig::default()
        });
        assert_eq!(compiled.of(None, &attributes("Jazz night")), 0.35);
    }

    #[rstest]
    fn repeated_terms_penalise_once() {
        let compiled = Penalties::compile(&PenaltyConfig {
            terms: vec!["intern".to_owned(), " Intern ".to_owned(), "INTERN".to_owned()],
            ..PenaltyConfig::default()
        });
        assert_eq!(compiled.terms.len(), 1);
        assert_eq!(compiled.of(None, &attributes("Summer intern wanted")), 0.35);
    }
}
