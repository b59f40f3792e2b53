use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::classifier::{normalize, ClassifierService};
use crate::error::{EmissionsError, Result};
use crate::portion::{NoEstimator, PortionEstimator, PortionPlan, PortionSource};
use crate::reference::{Category, ReferenceTable};

/// Unaccounted preparation and packaging overhead.
pub const WASTE_MULTIPLIER: f64 = 1.2;

/// Share of embodied emissions assumed avoided by rescuing the dish.
pub const COUNTERFACTUAL_WASTE_RATIO: f64 = 0.7;

#[derive(Validate, Debug, Clone)]
pub struct CalculateInput {
    #[validate(custom(function = "not_blank"))]
    pub dish_name: String,
    #[validate(
        length(min = 1, message = "must contain at least one ingredient"),
        custom(function = "no_blank_entries")
    )]
    pub ingredients: Vec<String>,
}

impl CalculateInput {
    pub fn new(dish_name: impl Into<String>, ingredients: Vec<String>) -> Self {
        Self {
            dish_name: dish_name.into(),
            ingredients,
        }
    }
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

fn no_blank_entries(values: &[String]) -> std::result::Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::new("blank_entry")
            .with_message("must not contain empty entries".into()));
    }
    Ok(())
}

/// One ingredient as it flowed through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub weight_grams: f64,
    pub category: Option<Category>,
    pub emissions_factor: f64,
}

impl Ingredient {
    pub fn emissions_kg_co2e(&self) -> f64 {
        (self.weight_grams / 1000.0) * self.emissions_factor
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BreakdownEntry {
    #[serde(rename = "ingredient")]
    pub ingredient_name: String,
    #[serde(rename = "emissions")]
    pub emissions_kg_co2e: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsResult {
    #[serde(rename = "total")]
    pub total_kg_co2e: f64,
    #[serde(rename = "saved")]
    pub saved_kg_co2e: f64,
    pub breakdown: Vec<BreakdownEntry>,
    pub portion_source: PortionSource,
}

/// Pure aggregation over already-resolved portions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    table: ReferenceTable,
    classifier: ClassifierService,
}

impl Aggregator {
    pub fn new(table: ReferenceTable) -> Self {
        Self {
            table,
            classifier: ClassifierService::new(table),
        }
    }

    pub fn table(&self) -> ReferenceTable {
        self.table
    }

    pub fn classify(&self, ingredient_name: &str) -> Option<Category> {
        self.classifier.classify(ingredient_name)
    }

    /// Classify `name` and attach its factor and weight.
    pub fn ingredient(&self, name: &str, weight_grams: f64) -> Ingredient {
        let category = self.classify(name);

        Ingredient {
            name: name.to_owned(),
            weight_grams,
            category,
            emissions_factor: self.table.factor(category, &normalize(name)),
        }
    }

    /// Validates input, then sums per-ingredient emissions and applies the
    /// waste multiplier and the counterfactual ratio.
    pub fn aggregate(&self, input: &CalculateInput, portions: &PortionPlan) -> Result<EmissionsResult> {
        input.validate()?;

        if portions.grams.len() != input.ingredients.len() {
            return Err(EmissionsError::InvalidInput(format!(
                "expected {} portions, got {}",
                input.ingredients.len(),
                portions.grams.len()
            )));
        }

        let breakdown: Vec<BreakdownEntry> = input
            .ingredients
            .iter()
            .zip(&portions.grams)
            .map(|(name, grams)| {
                let ingredient = self.ingredient(name, *grams);
                let emissions = ingredient.emissions_kg_co2e();
                tracing::trace!(
                    ingredient = %ingredient.name,
                    category = ?ingredient.category,
                    factor = ingredient.emissions_factor,
                    grams = ingredient.weight_grams,
                    emissions,
                    "Ingredient classified"
                );

                BreakdownEntry {
                    ingredient_name: ingredient.name,
                    emissions_kg_co2e: emissions,
                }
            })
            .collect();

        let raw_total: f64 = breakdown.iter().map(|b| b.emissions_kg_co2e).sum();
        let total = raw_total * WASTE_MULTIPLIER;

        Ok(EmissionsResult {
            total_kg_co2e: total,
            saved_kg_co2e: total * COUNTERFACTUAL_WASTE_RATIO,
            breakdown,
            portion_source: portions.source,
        })
    }
}

/// Emissions Calculator
///
/// Runs the full pipeline for one dish. The enhanced estimator is consulted
/// first when available; any failure or incomplete answer switches the whole
/// request to the keyword fallback.
pub struct Calculator<P = NoEstimator> {
    aggregator: Aggregator,
    estimator: P,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(ReferenceTable::standard(), NoEstimator)
    }
}

impl<P: PortionEstimator> Calculator<P> {
    pub fn new(table: ReferenceTable, estimator: P) -> Self {
        Self {
            aggregator: Aggregator::new(table),
            estimator,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn estimator(&self) -> &P {
        &self.estimator
    }

    #[tracing::instrument(skip(self, input), fields(dish = %input.dish_name, count = input.ingredients.len()))]
    pub async fn calculate(&self, input: &CalculateInput) -> Result<EmissionsResult> {
        input.validate()?;

        let portions = self.portions(input).await;
        let result = self.aggregator.aggregate(input, &portions)?;

        tracing::debug!(
            total = result.total_kg_co2e,
            saved = result.saved_kg_co2e,
            source = ?result.portion_source,
            "Emissions calculated"
        );

        Ok(result)
    }

    /// Deterministic calculation that never touches the estimator.
    pub fn calculate_fallback(&self, input: &CalculateInput) -> Result<EmissionsResult> {
        self.aggregator
            .aggregate(input, &PortionPlan::fallback(&input.ingredients))
    }

    async fn portions(&self, input: &CalculateInput) -> PortionPlan {
        if !self.estimator.is_available() {
            return PortionPlan::fallback(&input.ingredients);
        }

        let resolved = self
            .estimator
            .estimate(&input.dish_name, &input.ingredients)
            .await
            .and_then(|estimates| PortionPlan::from_estimates(&input.ingredients, &estimates));

        match resolved {
            Ok(plan) => plan,
            Err(reason) => {
                tracing::warn!(%reason, "Enhanced portion estimation unavailable, using fallback");
                PortionPlan::fallback(&input.ingredients)
            }
        }
    }
}
