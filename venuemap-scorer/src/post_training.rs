//! Term-based curation of search matches for a query category.
//!
//! A [`PostTrainingProfile`] holds lowercase term lists tuned for one kind of
//! query ("music venues", "wedding planners"). Matches mentioning an exclude
//! term are dropped. With `require_positive`, the survivors are reordered
//! into tiers: clean positives, positives carrying a demote term, auxiliary
//! matches, then the rest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::search_match::SearchMatch;

/// Term lists applied by [`apply_post_training`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostTrainingProfile {
    /// An inactive profile leaves matches untouched.
    pub active: bool,
    /// Drop matches whose company, title or headline mention any of these.
    pub exclude_terms: Vec<String>,
    /// Rank positives mentioning any of these after the other positives.
    pub demote_terms: Vec<String>,
    /// Reorder into tiers instead of only filtering.
    pub require_positive: bool,
    /// Positive when found in the company.
    pub include_company_terms: Vec<String>,
    /// Positive when found in the title.
    pub include_title_terms: Vec<String>,
    /// Positive when found in the website.
    pub include_website_terms: Vec<String>,
    /// Positive when found in the company industry.
    pub include_industry_terms: Vec<String>,
    /// Auxiliary when found in the company.
    pub aux_company_terms: Vec<String>,
    /// Auxiliary when found in the title.
    pub aux_title_terms: Vec<String>,
    /// Auxiliary when found in the website.
    pub aux_website_terms: Vec<String>,
    /// Auxiliary when found in the company industry.
    pub aux_industry_terms: Vec<String>,
}

/// Normalised terms for one signal. Company and title terms together are
/// also sought in the headline and free-text metadata.
struct Signal {
    company: Vec<String>,
    title: Vec<String>,
    website: Vec<String>,
    industry: Vec<String>,
    company_or_title: Vec<String>,
}

impl Signal {
    fn new(
        company_terms: &[String],
        title_terms: &[String],
        website_terms: &[String],
        industry_terms: &[String],
    ) -> Self {
        let company = normalise(company_terms);
        let title = normalise(title_terms);
        let company_or_title = company.iter().chain(&title).cloned().collect();
        Self {
            company,
            title,
            website: normalise(website_terms),
            industry: normalise(industry_terms),
            company_or_title,
        }
    }

    fn found_in(&self, candidate: &SearchMatch) -> bool {
        [
            ("company", &self.company),
            ("title", &self.title),
            ("headline", &self.company_or_title),
            ("website", &self.website),
            ("companyIndustry", &self.industry),
            ("metadata", &self.company_or_title),
        ]
        .into_iter()
        .any(|(field, terms)| mentions(candidate, field, terms))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tier {
    Positive,
    DemotedPositive,
    Aux,
    Rest,
}

/// Filter and reorder `matches` with `profile`, returning at most
/// `final_limit` of them.
///
/// An inactive profile or an empty input is returned unchanged. Without
/// `require_positive` the surviving matches keep their order. Otherwise
/// each tier is taken in input order, and a match whose [`SearchMatch::key`]
/// is empty or already taken is skipped.
///
/// # Examples
/// ```
/// use venuemap_scorer::{PostTrainingProfile, SearchMatch, apply_post_training};
///
/// let profile = PostTrainingProfile {
///     active: true,
///     exclude_terms: vec!["karaoke".to_owned()],
///     ..PostTrainingProfile::default()
/// };
/// let matches = vec![
///     SearchMatch::new("1", [("company", "Karaoke Palace")]),
///     SearchMatch::new("2", [("company", "The Jazz Cellar")]),
/// ];
/// let kept = apply_post_training(matches, &profile, 10);
/// assert_eq!(kept.len(), 1);
/// ```
#[must_use]
pub fn apply_post_training(
    matches: Vec<SearchMatch>,
    profile: &PostTrainingProfile,
    final_limit: usize,
) -> Vec<SearchMatch> {
    if !profile.active || matches.is_empty() {
        return matches;
    }
    let before = matches.len();
    let exclude = normalise(&profile.exclude_terms);
    let mut allowed: Vec<SearchMatch> = matches
        .into_iter()
        .filter(|candidate| {
            !["company", "title", "headline"]
                .into_iter()
                .any(|field| mentions(candidate, field, &exclude))
        })
        .collect();
    if !profile.require_positive {
        allowed.truncate(final_limit);
        log::debug!("post-training kept {} of {before} matches", allowed.len());
        return allowed;
    }

    let positive = Signal::new(
        &profile.include_company_terms,
        &profile.include_title_terms,
        &profile.include_website_terms,
        &profile.include_industry_terms,
    );
    let aux = Signal::new(
        &profile.aux_company_terms,
        &profile.aux_title_terms,
        &profile.aux_website_terms,
        &profile.aux_industry_terms,
    );
    let demote = normalise(&profile.demote_terms);
    let tiers: Vec<Tier> = allowed
        .iter()
        .map(|candidate| {
            if positive.found_in(candidate) {
                let demoted = ["company", "title", "headline"]
                    .into_iter()
                    .any(|field| mentions(candidate, field, &demote));
                if demoted { Tier::DemotedPositive } else { Tier::Positive }
            } else if aux.found_in(candidate) {
                Tier::Aux
            } else {
                Tier::Rest
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for tier in [Tier::Positive, Tier::DemotedPositive, Tier::Aux, Tier::Rest] {
        for (index, candidate) in allowed.iter().enumerate() {
            if order.len() >= final_limit {
                break;
            }
            if tiers.get(index) != Some(&tier) {
                continue;
            }
            let key = candidate.key();
            if !key.is_empty() && seen.insert(key) {
                order.push(index);
            }
        }
    }

    let mut slots: Vec<Option<SearchMatch>> = allowed.into_iter().map(Some).collect();
    let ordered: Vec<SearchMatch> = order
        .into_iter()
        .filter_map(|index| slots.get_mut(index).and_then(Option::take))
        .collect();
    log::debug!("post-training kept {} of {before} matches", ordered.len());
    ordered
}

fn normalise(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

fn mentions(candidate: &SearchMatch, field: &str, terms: &[String]) -> bool {
    if terms.is_empty() {
        return false;
    }
    candidate.metadata_text(field).is_some_and(|text| {
        let lowered = text.to_lowercase();
        terms.iter().any(|term| lowered.contains(term.as_str()))
    })
}
