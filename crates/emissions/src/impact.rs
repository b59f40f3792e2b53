use serde::{Deserialize, Serialize};

use crate::aggregator::EmissionsResult;
use crate::error::{EmissionsError, Result};

/// Car travel equivalent of one kg of CO2e, in km.
pub const DRIVING_KM_PER_KG_CO2E: f64 = 4.0;

/// Stored emissions figures of one rescued listing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ListingEmissions {
    pub total: f64,
    pub saved: f64,
}

impl From<&EmissionsResult> for ListingEmissions {
    fn from(result: &EmissionsResult) -> Self {
        Self {
            total: result.total_kg_co2e,
            saved: result.saved_kg_co2e,
        }
    }
}

/// Running impact across rescued listings, as shown to consumers.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub listings: usize,
    pub total_kg_co2e: f64,
    pub saved_kg_co2e: f64,
    pub driving_km_equivalent: f64,
}

impl ImpactSummary {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a EmissionsResult>) -> Self {
        results
            .into_iter()
            .map(ListingEmissions::from)
            .fold(Self::default(), |summary, listing| summary.with(listing))
    }

    /// Summarise stored figures; negative or non-finite values are rejected.
    pub fn from_listings(listings: &[ListingEmissions]) -> Result<Self> {
        listings.iter().enumerate().try_fold(Self::default(), |summary, (i, listing)| {
            let valid = |v: f64| v.is_finite() && v >= 0.0;
            if !valid(listing.total) || !valid(listing.saved) {
                return Err(EmissionsError::InvalidInput(format!(
                    "results[{i}] must hold non-negative figures"
                )));
            }
            Ok(summary.with(*listing))
        })
    }

    fn with(self, listing: ListingEmissions) -> Self {
        let saved = self.saved_kg_co2e + listing.saved;

        Self {
            listings: self.listings + 1,
            total_kg_co2e: self.total_kg_co2e + listing.total,
            saved_kg_co2e: saved,
            driving_km_equivalent: saved * DRIVING_KM_PER_KG_CO2E,
        }
    }
}
