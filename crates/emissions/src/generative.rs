use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::error::EstimationUnavailable;
use crate::portion::{PortionEstimates, PortionEstimator};

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[\s\S]*\}").unwrap_or_else(|e| panic!("invalid JSON block pattern: {e}"))
});

#[derive(Debug, Clone)]
pub struct GenerativeConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Portion estimator backed by a generative-language `generateContent` API.
///
/// Sends one prompt per dish and expects a JSON object of the form
/// `{"ingredients": [{"name": "...", "weight": 200}]}` somewhere in the
/// first candidate's text.
pub struct GenerativeEstimator {
    config: GenerativeConfig,
    client: reqwest::Client,
}

impl GenerativeEstimator {
    pub fn new(config: GenerativeConfig) -> Result<Self, EstimationUnavailable> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EstimationUnavailable::Transport(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl PortionEstimator for GenerativeEstimator {
    #[tracing::instrument(skip(self, ingredients), fields(model = %self.config.model, count = ingredients.len()))]
    async fn estimate(
        &self,
        dish_name: &str,
        ingredients: &[String],
    ) -> Result<PortionEstimates, EstimationUnavailable> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(dish_name, ingredients) }] }]
        });

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| EstimationUnavailable::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EstimationUnavailable::Status(status.as_u16()));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| EstimationUnavailable::MalformedResponse(e.without_url().to_string()))?;

        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| EstimationUnavailable::MalformedResponse("empty candidate".to_string()))?;

        tracing::debug!(len = text.len(), "Received portion estimate");

        parse_estimates(&text)
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

pub fn build_prompt(dish_name: &str, ingredients: &[String]) -> String {
    format!(
        "Estimate the typical weight in grams for each ingredient in this dish:\n\
         Dish: {dish_name}\n\
         Ingredients: {}\n\n\
         Consider typical serving sizes and recipe proportions.\n\
         Use the ingredient names exactly as given.\n\
         Return as JSON:\n\
         {{\"ingredients\": [{{\"name\": \"ingredient1\", \"weight\": 200}}, {{\"name\": \"ingredient2\", \"weight\": 150}}]}}",
        ingredients.join(", ")
    )
}

/// Extract the first `{...}` block of `text` and read the weights out of it.
pub fn parse_estimates(text: &str) -> Result<PortionEstimates, EstimationUnavailable> {
    let block = JSON_BLOCK.find(text).map(|m| m.as_str()).unwrap_or(text);

    let parsed: EstimateBody = serde_json::from_str(block)
        .map_err(|e| EstimationUnavailable::MalformedResponse(e.to_string()))?;

    Ok(parsed
        .ingredients
        .into_iter()
        .map(|i| (i.name, i.weight))
        .collect())
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct EstimateBody {
    ingredients: Vec<EstimatedIngredient>,
}

#[derive(Deserialize)]
struct EstimatedIngredient {
    name: String,
    weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let estimates =
            parse_estimates(r#"{"ingredients":[{"name":"chicken","weight":180},{"name":"rice","weight":120.5}]}"#)
                .unwrap();

        assert_eq!(estimates.get("chicken"), Some(&180.0));
        assert_eq!(estimates.get("rice"), Some(&120.5));
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let text = "Sure! Here you go:\n```json\n{\"ingredients\": [{\"name\": \"rice\", \"weight\": 150}]}\n```\nEnjoy.";
        let estimates = parse_estimates(text).unwrap();
        assert_eq!(estimates.get("rice"), Some(&150.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_estimates("I cannot help with that."),
            Err(EstimationUnavailable::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_estimates(r#"{"weights": {"rice": 150}}"#),
            Err(EstimationUnavailable::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_estimates(r#"{"ingredients": [{"name": "rice", "weight": "lots"}]}"#),
            Err(EstimationUnavailable::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_prompt_lists_dish_and_ingredients() {
        let prompt = build_prompt("Chicken Rice", &["chicken".to_string(), "rice".to_string()]);
        assert!(prompt.contains("Dish: Chicken Rice"));
        assert!(prompt.contains("Ingredients: chicken, rice"));
        assert!(prompt.contains("\"ingredients\""));
    }

    #[test]
    fn test_url_and_availability() {
        let estimator = GenerativeEstimator::new(GenerativeConfig {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/".to_string(),
            model: "gemini-pro".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        assert_eq!(
            estimator.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
        assert!(!estimator.is_available());
    }
}
