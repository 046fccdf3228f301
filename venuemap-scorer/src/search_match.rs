//! Raw search-index matches and the title-prefix category filter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One match returned by the search index, before hydration into a [`Hit`].
///
/// Only `id` and `metadata` are interpreted; every other top-level field is
/// carried through untouched.
///
/// [`Hit`]: venuemap_core::Hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Index document id, usually a string but numbers are accepted.
    #[serde(default)]
    pub id: Value,
    /// Free-form document fields such as `company`, `title` or `contactId`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Remaining top-level fields, `score` and `title` among them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchMatch {
    /// Build a match from an id and metadata pairs.
    #[must_use]
    pub fn new<'a>(id: &str, metadata: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            id: Value::from(id),
            metadata: Some(
                metadata
                    .into_iter()
                    .map(|(key, value)| (key.to_owned(), Value::from(value)))
                    .collect(),
            ),
            extra: Map::new(),
        }
    }

    /// Text of a metadata field. Arrays yield their first non-null entry and
    /// other scalars their JSON rendering.
    #[must_use]
    pub fn metadata_text(&self, key: &str) -> Option<String> {
        self.metadata.as_ref()?.get(key).and_then(text_of)
    }

    /// Deduplication key: `contactId` when present and non-empty, else `id`.
    #[must_use]
    pub fn key(&self) -> String {
        self.metadata_text("contactId")
            .filter(|contact| !contact.is_empty())
            .or_else(|| text_of(&self.id))
            .unwrap_or_default()
    }

    /// The top-level `title`, falling back to `metadata.title` when that is
    /// missing or blank.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.extra
            .get("title")
            .and_then(text_of)
            .filter(|title| !title.trim().is_empty())
            .or_else(|| self.metadata_text("title"))
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Array(entries) => entries.iter().find(|entry| !entry.is_null()).map(render),
        other => Some(other.to_string()),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Keep the matches whose title starts with one of `prefixes`, ignoring case
/// and surrounding whitespace.
///
/// Blank prefixes are dropped; with none left every match is kept. Matches
/// without a usable title are kept only when `keep_untitled` is set.
///
/// # Examples
/// ```
/// use venuemap_scorer::{SearchMatch, filter_by_title_prefixes};
///
/// let matches = vec![
///     SearchMatch::new("1", [("title", "Music Venue")]),
///     SearchMatch::new("2", [("title", "Restaurant")]),
/// ];
/// let kept = filter_by_title_prefixes(matches, &["music"], false);
/// assert_eq!(kept.len(), 1);
/// ```
#[must_use]
pub fn filter_by_title_prefixes<S: AsRef<str>>(
    matches: Vec<SearchMatch>,
    prefixes: &[S],
    keep_untitled: bool,
) -> Vec<SearchMatch> {
    let wanted: Vec<String> = prefixes
        .iter()
        .map(|prefix| prefix.as_ref().trim().to_lowercase())
        .filter(|prefix| !prefix.is_empty())
        .collect();
    if wanted.is_empty() {
        return matches;
    }
    let before = matches.len();
    let kept: Vec<SearchMatch> = matches
        .into_iter()
        .filter(|candidate| match candidate.title() {
            Some(title) if !title.trim().is_empty() => {
                let lowered = title.trim().to_lowercase();
                wanted.iter().any(|prefix| lowered.starts_with(prefix.as_str()))
            }
            _ => keep_untitled,
        })
        .collect();
    log::debug!("title prefixes kept {} of {before} matches", kept.len());
    kept
}
