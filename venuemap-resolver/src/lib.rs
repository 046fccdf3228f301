//! Location override resolution for venuemap hits and queries.
//!
//! Upstream geocoders sometimes place a venue in the wrong city, at
//! `(0, 0)`, or nowhere at all. This crate keeps a static table of aliases
//! (`"philly"`, `"nyc"`, `"washington dc"`) mapped to canonical places and
//! uses it two ways:
//!
//! - [`apply_hardcoded_location_overrides`] corrects individual hits whose
//!   coordinates disagree with the place they name.
//! - [`resolve_query_location`] rewrites the location parsed from a search
//!   query and reports strict-match hints for downstream filters.
//!
//! The table and its compiled patterns are process-wide constants.

#![forbid(unsafe_code)]

mod matcher;
mod overrides;
mod places;
mod query;

pub use matcher::{AliasHit, find_alias, find_alias_in_state};
pub use overrides::{
    Correction, CorrectionReason, ResolveOutcome, ResolvedHit, apply_hardcoded_location_overrides,
};
pub use places::{OVERRIDES, OverrideEntry, Place, UNITED_STATES};
pub use query::{LocationOverrides, ParsedLocation, resolve_query_location};
