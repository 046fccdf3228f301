//! Word-boundary alias matching over free text.
//!
//! Two short tokens are handled before the table: a standalone `DC` (in any
//! of `DC`, `D.C.`, `D C`) always means Washington, and a standalone `LA`
//! means Los Angeles unless the text names Louisiana or one of its larger
//! cities. Otherwise the longest table key found on word boundaries wins.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::places::{LOS_ANGELES, OVERRIDES, OverrideEntry, Place, WASHINGTON_DC};

/// An alias located in a piece of text.
#[derive(Debug, Clone, Copy)]
pub struct AliasHit {
    /// The table key, or `"dc"`/`"la"` for the special tokens.
    pub key: &'static str,
    /// Place the alias resolves to.
    pub place: &'static Place,
    remover: &'static Regex,
}

impl AliasHit {
    /// Remove every occurrence of the alias from `text` and collapse the
    /// remaining whitespace.
    #[must_use]
    pub fn strip_from(&self, text: &str) -> String {
        collapse_whitespace(&self.remover.replace_all(text, " "))
    }
}

struct CompiledAlias {
    entry: OverrideEntry,
    pattern: Regex,
}

fn case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .inspect_err(|err| log::error!("alias pattern {pattern:?} failed to compile: {err}"))
        .ok()
}

static DC_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| case_insensitive(r"(^|[^a-z])d\.?\s*c\.?([^a-z]|$)"));
static DC_REMOVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| case_insensitive(r"(?-u:\b)D\.?\s*C\.?(?-u:\b)"));
static LA_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| case_insensitive(r"(^|[^a-z])l\.?\s*a\.?([^a-z]|$)"));
static LA_REMOVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| case_insensitive(r"(?-u:\b)L\.?\s*A\.?(?-u:\b)"));
static LOUISIANA: LazyLock<Option<Regex>> = LazyLock::new(|| {
    case_insensitive(r"(?-u:\b)(?:louisiana|new orleans|baton rouge|shreveport)(?-u:\b)")
});

static ALIASES: LazyLock<Vec<CompiledAlias>> = LazyLock::new(|| {
    OVERRIDES
        .iter()
        .filter_map(|entry| {
            let pattern = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(entry.key));
            case_insensitive(&pattern).map(|pattern| CompiledAlias {
                entry: *entry,
                pattern,
            })
        })
        .collect()
});

fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

fn special(
    token: &'static LazyLock<Option<Regex>>,
    remover: &'static LazyLock<Option<Regex>>,
    key: &'static str,
    place: &'static Place,
    text: &str,
) -> Option<AliasHit> {
    if !matches(token, text) {
        return None;
    }
    let remover = remover.as_ref()?;
    Some(AliasHit {
        key,
        place,
        remover,
    })
}

/// Find the alias `text` refers to, if any.
///
/// # Examples
/// ```
/// use venuemap_resolver::find_alias;
///
/// assert_eq!(find_alias("jazz in Philly").map(|hit| hit.key), Some("philly"));
/// assert_eq!(find_alias("Shreveport, LA").map(|hit| hit.key), None);
/// assert_eq!(find_alias("bars near L.A.").and_then(|hit| hit.place.city), Some("Los Angeles"));
/// ```
#[must_use]
pub fn find_alias(text: &str) -> Option<AliasHit> {
    select_alias(text, None)
}

/// Find the alias `text` refers to among places in `state`.
///
/// `state` is a canonical full name such as `"North Carolina"`. Aliases for
/// places elsewhere are skipped, so a hit in Wilmington, North Carolina is
/// not mistaken for Wilmington, Delaware, and `LA` only means Los Angeles
/// for California.
///
/// # Examples
/// ```
/// use venuemap_resolver::find_alias_in_state;
///
/// assert!(find_alias_in_state("Wilmington, NC", "North Carolina").is_none());
/// assert!(find_alias_in_state("Lafayette, LA", "Louisiana").is_none());
/// assert_eq!(
///     find_alias_in_state("Wilmington, DE", "Delaware").map(|hit| hit.key),
///     Some("wilmington")
/// );
/// ```
#[must_use]
pub fn find_alias_in_state(text: &str, state: &str) -> Option<AliasHit> {
    select_alias(text, Some(state))
}

fn select_alias(text: &str, state: Option<&str>) -> Option<AliasHit> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let in_state = |place: &Place| state.is_none_or(|wanted| place.state.eq_ignore_ascii_case(wanted));
    if in_state(&WASHINGTON_DC)
        && let Some(hit) = special(&DC_TOKEN, &DC_REMOVE, "dc", &WASHINGTON_DC, &lowered)
    {
        return Some(hit);
    }
    if in_state(&LOS_ANGELES)
        && !matches(&LOUISIANA, &lowered)
        && let Some(hit) = special(&LA_TOKEN, &LA_REMOVE, "la", &LOS_ANGELES, &lowered)
    {
        return Some(hit);
    }
    ALIASES
        .iter()
        .filter(|alias| in_state(alias.entry.place) && alias.pattern.is_match(&lowered))
        // First entry wins among equal lengths.
        .fold(None::<&CompiledAlias>, |best, alias| match best {
            Some(current) if current.entry.key.len() >= alias.entry.key.len() => Some(current),
            _ => Some(alias),
        })
        .map(|alias| AliasHit {
            key: alias.entry.key,
            place: alias.entry.place,
            remover: &alias.pattern,
        })
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
