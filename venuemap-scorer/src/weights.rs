//! Score components and their weights.

use std::{collections::BTreeMap, fmt, str::FromStr};

use venuemap_core::EngineError;

/// A signal contributing to a hit's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreComponent {
    /// Caller-supplied text relevance.
    Text,
    /// Category match, clamped to `[0, 1]`.
    Category,
    /// Recency, clamped to `[0, 1]`.
    Freshness,
    /// Exponential decay with distance from the configured origin.
    Distance,
    /// Agreement between the hit's and the query's location.
    Location,
}

impl ScoreComponent {
    /// Every component, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Category,
        Self::Freshness,
        Self::Distance,
        Self::Location,
    ];

    /// Return the configuration key for this component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Category => "category",
            Self::Freshness => "freshness",
            Self::Distance => "distance",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreComponent {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|component| component.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| {
                EngineError::invalid_config(format!("weights.{key}"), "unknown score component")
            })
    }
}

/// Weight applied to each [`ScoreComponent`].
///
/// # Examples
/// ```
/// use venuemap_scorer::{ScoreComponent, ScoreWeights};
///
/// let weights = ScoreWeights::default().with(ScoreComponent::Distance, 0.3);
/// assert_eq!(weights.get(ScoreComponent::Distance), 0.3);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    values: [f64; 5],
}

impl ScoreWeights {
    /// All weights zero. Not valid on its own.
    #[must_use]
    pub const fn zero() -> Self {
        Self { values: [0.0; 5] }
    }

    /// Return a copy with `component` set to `weight`.
    #[must_use]
    pub fn with(mut self, component: ScoreComponent, weight: f64) -> Self {
        if let Some(slot) = self.values.get_mut(component as usize) {
            *slot = weight;
        }
        self
    }

    /// Weight of `component`.
    #[must_use]
    pub fn get(&self, component: ScoreComponent) -> f64 {
        self.values
            .get(component as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Build weights from a `component -> weight` map.
    ///
    /// Unknown components are logged and ignored; absent components weigh
    /// zero.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, f64>) -> Self {
        map.iter()
            .fold(Self::zero(), |weights, (key, &weight)| match key.parse() {
                Ok(component) => weights.with(component, weight),
                Err(_) => {
                    log::warn!("ignoring unknown score component {key:?}");
                    weights
                }
            })
    }

    /// Check every weight lies in `[0, 1]` and the total is positive.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] naming the first offending
    /// weight, or `weights` when they sum to zero.
    #[expect(
        clippy::float_arithmetic,
        reason = "validation sums weights to ensure a non-zero total"
    )]
    pub fn validate(&self) -> Result<(), EngineError> {
        for component in ScoreComponent::ALL {
            let weight = self.get(component);
            if !(weight.is_finite() && (0.0..=1.0).contains(&weight)) {
                return Err(EngineError::invalid_config(
                    format!("weights.{component}"),
                    format!("must be finite and within [0, 1], got {weight}"),
                ));
            }
        }
        let total: f64 = self.values.iter().sum();
        if total > 0.0 {
            Ok(())
        } else {
            Err(EngineError::invalid_config(
                "weights",
                "must sum to more than zero",
            ))
        }
    }

    /// Weighted sum of component values.
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted sum of score components"
    )]
    #[must_use]
    pub fn combine(&self, components: &[f64; 5]) -> f64 {
        self.values
            .iter()
            .zip(components)
            .map(|(weight, value)| weight * value)
            .sum()
    }
}

impl Default for ScoreWeights {
    /// Text relevance and location agreement at full weight.
    fn default() -> Self {
        Self::zero()
            .with(ScoreComponent::Text, 1.0)
            .with(ScoreComponent::Location, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use venuemap_core::ErrorKind;

    #[rstest]
    #[case("text", ScoreComponent::Text)]
    #[case(" Distance ", ScoreComponent::Distance)]
    #[case("LOCATION", ScoreComponent::Location)]
    fn parses_component_names(#[case] raw: &str, #[case] expected: ScoreComponent) {
        assert_eq!(raw.parse::<ScoreComponent>().expect("known"), expected);
    }

    #[rstest]
    fn unknown_component_is_config_error() {
        let err = "popularity".parse::<ScoreComponent>().expect_err("unknown");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[rstest]
    fn map_ignores_unknown_and_defaults_missing() {
        let map = BTreeMap::from([
            ("text".to_owned(), 0.7),
            ("popularity".to_owned(), 0.9),
        ]);
        let weights = ScoreWeights::from_map(&map);
        assert_eq!(weights.get(ScoreComponent::Text), 0.7);
        assert_eq!(weights.get(ScoreComponent::Category), 0.0);
    }

    #[rstest]
    #[case(ScoreComponent::Text, 1.5, "weights.text")]
    #[case(ScoreComponent::Freshness, -0.1, "weights.freshness")]
    #[case(ScoreComponent::Distance, f64::NAN, "weights.distance")]
    fn rejects_out_of_range_weights(
        #[case] component: ScoreComponent,
        #[case] weight: f64,
        #[case] field: &str,
    ) {
        let err = ScoreWeights::default()
            .with(component, weight)
            .validate()
            .expect_err("invalid weight");
        assert!(matches!(err, EngineError::InvalidConfig { field: ref f, .. } if f == field));
    }

    #[rstest]
    fn rejects_all_zero_weights() {
        let err = ScoreWeights::zero().validate().expect_err("zero total");
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[rstest]
    fn combines_as_weighted_sum() {
        let weights = ScoreWeights::zero()
            .with(ScoreComponent::Text, 0.5)
            .with(ScoreComponent::Distance, 0.25);
        assert_eq!(weights.combine(&[1.0, 9.0, 9.0, 0.5, 9.0]), 0.625);
    }
}
