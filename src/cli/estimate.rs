use anyhow::Result;
use savor_emissions::CalculateInput;

/// One-off calculation printed as JSON on stdout.
pub async fn estimate(
    config: savor::config::Config,
    dish_name: String,
    ingredients: Vec<String>,
) -> Result<()> {
    let calculator = savor::build_calculator(&config.estimator);
    let input = CalculateInput::new(dish_name, ingredients);

    let result = calculator.calculate(&input).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
