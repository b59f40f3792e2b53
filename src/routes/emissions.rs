use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use savor_emissions::{CalculateInput, EmissionsResult, ImpactSummary, ListingEmissions};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::AppState;

/// Request payload for an emissions calculation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub dish_name: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

impl TryFrom<CalculateRequest> for CalculateInput {
    type Error = ApiError;

    fn try_from(request: CalculateRequest) -> Result<Self, Self::Error> {
        let dish_name = request
            .dish_name
            .ok_or_else(|| ApiError::InvalidInput("dishName is required".to_string()))?;
        let ingredients = request
            .ingredients
            .ok_or_else(|| ApiError::InvalidInput("ingredients is required".to_string()))?;

        Ok(CalculateInput::new(dish_name, ingredients))
    }
}

/// POST /api/emissions/calculate
///
/// # Returns
/// - 200 OK: total, saved and per-ingredient breakdown in kg CO2e
/// - 400 Bad Request: missing or empty dish name / ingredient list
#[tracing::instrument(skip_all)]
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<EmissionsResult>, ApiError> {
    let Json(request) = payload?;
    let input = CalculateInput::try_from(request)?;

    tracing::info!(
        dish = %input.dish_name,
        ingredients = input.ingredients.len(),
        "Emissions calculation requested"
    );

    let result = state.calculator.calculate(&input).await?;

    Ok(Json(result))
}

/// Request payload for an impact summary
#[derive(Debug, Clone, Deserialize)]
pub struct ImpactRequest {
    pub results: Vec<ListingEmissions>,
}

/// POST /api/emissions/impact
///
/// Sums stored `{ total, saved }` figures of rescued listings.
pub async fn impact(
    payload: Result<Json<ImpactRequest>, JsonRejection>,
) -> Result<Json<ImpactSummary>, ApiError> {
    let Json(request) = payload?;
    let summary = ImpactSummary::from_listings(&request.results)?;

    Ok(Json(summary))
}
