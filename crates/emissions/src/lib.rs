//! Carbon emissions estimation for rescued dishes.
//!
//! A dish name and a free-form ingredient list go in; a per-ingredient
//! breakdown, a total and a "saved" figure (kg CO2e) come out. Weights come
//! from a pluggable [`PortionEstimator`] or from deterministic keyword rules.

pub mod aggregator;
pub mod classifier;
pub mod error;
#[cfg(feature = "generative")]
pub mod generative;
pub mod impact;
pub mod portion;
pub mod reference;

pub use aggregator::{
    Aggregator, BreakdownEntry, CalculateInput, Calculator, EmissionsResult, Ingredient,
    COUNTERFACTUAL_WASTE_RATIO, WASTE_MULTIPLIER,
};
pub use classifier::ClassifierService;
pub use error::{EmissionsError, EstimationUnavailable, Result};
#[cfg(feature = "generative")]
pub use generative::{GenerativeConfig, GenerativeEstimator};
pub use impact::{ImpactSummary, ListingEmissions};
pub use portion::{
    fallback_weight, NoEstimator, PortionEstimates, PortionEstimator, PortionPlan, PortionSource,
};
pub use reference::{Category, ReferenceTable, DEFAULT_FACTOR};
