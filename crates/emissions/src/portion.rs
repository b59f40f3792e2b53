use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::EstimationUnavailable;

/// Grams used when no keyword rule matches.
pub const DEFAULT_PORTION_GRAMS: f64 = 100.0;

/// Keyword groups checked in order; the first group with a keyword
/// contained in the lowercased name decides the weight.
pub static FALLBACK_RULES: &[(&[&str], f64)] = &[
    (&["rice", "pasta", "grain"], 150.0),
    (&["meat", "chicken", "fish"], 200.0),
    (&["vegetable", "fruit"], 100.0),
    (&["sauce", "oil", "dressing"], 50.0),
    (&["spice", "seasoning"], 10.0),
];

/// Deterministic portion estimate in grams.
pub fn fallback_weight(ingredient_name: &str) -> f64 {
    let name = ingredient_name.to_lowercase();

    FALLBACK_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, grams)| *grams)
        .unwrap_or(DEFAULT_PORTION_GRAMS)
}

/// Weights in grams keyed by ingredient name, as returned by an estimator.
pub type PortionEstimates = HashMap<String, f64>;

/// External weight prediction for a whole dish.
///
/// Implementations may fail for any reason; callers must be ready to fall
/// back to [`fallback_weight`] for the entire ingredient list.
#[async_trait]
pub trait PortionEstimator: Send + Sync {
    async fn estimate(
        &self,
        dish_name: &str,
        ingredients: &[String],
    ) -> Result<PortionEstimates, EstimationUnavailable>;

    /// Whether a call is worth attempting at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Estimator that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEstimator;

#[async_trait]
impl PortionEstimator for NoEstimator {
    async fn estimate(
        &self,
        _dish_name: &str,
        _ingredients: &[String],
    ) -> Result<PortionEstimates, EstimationUnavailable> {
        Err(EstimationUnavailable::Disabled)
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[async_trait]
impl<T: PortionEstimator + ?Sized> PortionEstimator for std::sync::Arc<T> {
    async fn estimate(
        &self,
        dish_name: &str,
        ingredients: &[String],
    ) -> Result<PortionEstimates, EstimationUnavailable> {
        (**self).estimate(dish_name, ingredients).await
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// Which strategy produced the weights of a calculation.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortionSource {
    Fallback,
    Enhanced,
}

/// Resolved weights, one per ingredient, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct PortionPlan {
    pub source: PortionSource,
    pub grams: Vec<f64>,
}

impl PortionPlan {
    pub fn fallback(ingredients: &[String]) -> Self {
        Self {
            source: PortionSource::Fallback,
            grams: ingredients.iter().map(|i| fallback_weight(i)).collect(),
        }
    }

    /// Resolve estimator output against the requested ingredients.
    ///
    /// All or nothing: every ingredient needs a finite, positive weight.
    /// Names are compared trimmed and case-insensitively, so two estimates
    /// that collapse to the same name make the answer unusable.
    pub fn from_estimates(
        ingredients: &[String],
        estimates: &PortionEstimates,
    ) -> Result<Self, EstimationUnavailable> {
        let mut by_key: HashMap<String, f64> = HashMap::with_capacity(estimates.len());
        for (name, grams) in estimates {
            if by_key.insert(estimate_key(name), *grams).is_some() {
                return Err(EstimationUnavailable::MalformedResponse(format!(
                    "ambiguous weight for \"{}\"",
                    name.trim()
                )));
            }
        }

        let grams = ingredients
            .iter()
            .map(|name| {
                let grams = by_key
                    .get(&estimate_key(name))
                    .copied()
                    .ok_or_else(|| EstimationUnavailable::MissingIngredient(name.to_owned()))?;

                if !grams.is_finite() || grams <= 0.0 {
                    return Err(EstimationUnavailable::InvalidWeight {
                        name: name.to_owned(),
                        grams,
                    });
                }

                Ok(grams)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: PortionSource::Enhanced,
            grams,
        })
    }
}

fn estimate_key(name: &str) -> String {
    name.trim().to_lowercase()
}
