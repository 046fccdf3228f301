//! Search hits as supplied by the host, before scoring.

use crate::{EngineError, GeoPoint};

/// Free-text and numeric signals attached to a hit.
///
/// Numeric signals are expected in `[0, 1]`; scorers clamp them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MatchAttributes {
    /// Caller-supplied text relevance.
    pub text_relevance: f64,
    /// Degree to which the hit's category matched the query.
    pub category_match: f64,
    /// Recency signal.
    pub freshness: f64,
    /// City the hit claims to be in.
    pub city: Option<String>,
    /// State or region the hit claims to be in.
    pub state: Option<String>,
    /// Country the hit claims to be in.
    pub country: Option<String>,
    /// Headline text.
    pub headline: Option<String>,
    /// Job or listing title.
    pub title: Option<String>,
    /// Company or venue operator.
    pub company: Option<String>,
}

impl MatchAttributes {
    /// Iterate over the free-text fields searched for penalised terms.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [&self.headline, &self.title, &self.company]
            .into_iter()
            .filter_map(|field| field.as_deref())
    }
}

/// A raw geographic search hit.
///
/// # Examples
/// ```
/// use venuemap_core::Hit;
///
/// let hit = Hit::new("venue-1", Some(39.95), Some(-75.16)).with_location_key("Philadelphia, PA");
/// assert_eq!(hit.location_key.as_deref(), Some("Philadelphia, PA"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// Caller's identifier; also the final ranking tie-break.
    pub id: String,
    /// Raw latitude, if geocoded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lat: Option<f64>,
    /// Raw longitude, if geocoded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lng: Option<f64>,
    /// Free-text place name or address used for override matching.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location_key: Option<String>,
    /// Signals feeding the score.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: MatchAttributes,
}

impl Hit {
    /// Construct a hit with default attributes.
    pub fn new(id: impl Into<String>, lat: Option<f64>, lng: Option<f64>) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
            location_key: None,
            attributes: MatchAttributes::default(),
        }
    }

    /// Attach a location key.
    #[must_use]
    pub fn with_location_key(mut self, key: impl Into<String>) -> Self {
        self.location_key = Some(key.into());
        self
    }

    /// Replace the match attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: MatchAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Return the text the override table is matched against.
    ///
    /// The location key wins; otherwise the hit's `"city, state"` pair is
    /// joined from whichever parts are present.
    #[must_use]
    pub fn match_key(&self) -> Option<String> {
        if let Some(key) = self.location_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Some(key.to_owned());
        }
        let parts: Vec<&str> = [&self.attributes.city, &self.attributes.state]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Validate the raw coordinates.
    ///
    /// Returns `Ok(None)` when neither component is present.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidInput`] when only one component is
    /// present and [`EngineError::InvalidCoordinate`] when the pair is out of
    /// range.
    pub fn coordinates(&self) -> Result<Option<GeoPoint>, EngineError> {
        match (self.lat, self.lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng).map(Some),
            _ => Err(EngineError::invalid_input(
                "latitude and longitude must be supplied together",
            )),
        }
    }
}
