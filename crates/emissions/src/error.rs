use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmissionsError>;

/// Errors surfaced to callers of the calculator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmissionsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<validator::ValidationErrors> for EmissionsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {message}")
            })
            .collect();
        fields.sort();

        EmissionsError::InvalidInput(fields.join(", "))
    }
}

/// The enhanced portion estimator could not be used for this request.
///
/// Always recovered by the calculator, which switches the whole request to
/// the keyword fallback. Never returned to callers of `calculate`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationUnavailable {
    #[error("enhanced estimation is disabled")]
    Disabled,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("no weight returned for ingredient '{0}'")]
    MissingIngredient(String),

    #[error("invalid weight {grams} for ingredient '{name}'")]
    InvalidWeight { name: String, grams: f64 },
}
