use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use savor_emissions::{
    CalculateInput, Calculator, EmissionsError, EstimationUnavailable, PortionEstimates,
    PortionEstimator, PortionSource, ReferenceTable,
};

/// Estimator returning a fixed answer and counting calls.
struct CannedEstimator {
    answer: Result<PortionEstimates, EstimationUnavailable>,
    calls: AtomicUsize,
}

impl CannedEstimator {
    fn new(answer: Result<PortionEstimates, EstimationUnavailable>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortionEstimator for CannedEstimator {
    async fn estimate(
        &self,
        _dish_name: &str,
        _ingredients: &[String],
    ) -> Result<PortionEstimates, EstimationUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

fn input(dish: &str, items: &[&str]) -> CalculateInput {
    CalculateInput::new(dish, items.iter().map(|s| s.to_string()).collect())
}

fn estimates(pairs: &[(&str, f64)]) -> PortionEstimates {
    pairs.iter().map(|(n, g)| (n.to_string(), *g)).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_default_calculator_matches_reference_scenario() {
    let result = Calculator::default()
        .calculate(&input("Chicken Rice", &["chicken", "rice"]))
        .await
        .unwrap();

    assert_close(result.total_kg_co2e, 1.854);
    assert_close(result.saved_kg_co2e, 1.2978);
    assert_eq!(result.portion_source, PortionSource::Fallback);
}

#[tokio::test]
async fn test_enhanced_weights_are_used_when_complete() {
    let estimator = CannedEstimator::new(Ok(estimates(&[("chicken", 250.0), ("rice", 100.0)])));
    let calculator = Calculator::new(ReferenceTable::standard(), estimator);

    let result = calculator
        .calculate(&input("Chicken Rice", &["chicken", "rice"]))
        .await
        .unwrap();

    // 250g * 5.7 + 100g * 2.7 = 1.425 + 0.27
    assert_eq!(result.portion_source, PortionSource::Enhanced);
    assert_close(result.breakdown[0].emissions_kg_co2e, 1.425);
    assert_close(result.breakdown[1].emissions_kg_co2e, 0.27);
    assert_close(result.total_kg_co2e, 1.695 * 1.2);
    assert_eq!(calculator.estimator().calls(), 1);
}

#[tokio::test]
async fn test_partial_answer_falls_back_for_whole_list() {
    let estimator = CannedEstimator::new(Ok(estimates(&[("chicken", 250.0)])));
    let calculator = Calculator::new(ReferenceTable::standard(), estimator);

    let result = calculator
        .calculate(&input("Chicken Rice", &["chicken", "rice"]))
        .await
        .unwrap();

    assert_eq!(result.portion_source, PortionSource::Fallback);
    assert_close(result.breakdown[0].emissions_kg_co2e, 1.14);
    assert_close(result.breakdown[1].emissions_kg_co2e, 0.405);
}

#[tokio::test]
async fn test_failing_estimator_falls_back() {
    for failure in [
        EstimationUnavailable::Transport("connection refused".to_string()),
        EstimationUnavailable::Status(503),
        EstimationUnavailable::MalformedResponse("expected value".to_string()),
    ] {
        let calculator =
            Calculator::new(ReferenceTable::standard(), CannedEstimator::new(Err(failure)));

        let result = calculator
            .calculate(&input("Mystery Dish", &["unobtainium"]))
            .await
            .unwrap();

        assert_eq!(result.portion_source, PortionSource::Fallback);
        assert_close(result.total_kg_co2e, 0.36);
        assert_close(result.saved_kg_co2e, 0.252);
    }
}

#[tokio::test]
async fn test_invalid_input_never_reaches_estimator() {
    let estimator = Arc::new(CannedEstimator::new(Ok(estimates(&[]))));
    let calculator = Calculator::new(ReferenceTable::standard(), estimator.clone());

    let err = calculator.calculate(&input("Dish", &[])).await.unwrap_err();

    assert!(matches!(err, EmissionsError::InvalidInput(_)));
    assert_eq!(estimator.calls(), 0);
}

#[tokio::test]
async fn test_breakdown_preserves_order_and_names() {
    let items = [
        "Olive Oil",
        "grilled chicken",
        "xyz123",
        "Basmati rice",
        "buttermilk",
        "mixed seasoning",
    ];
    let result = Calculator::default()
        .calculate(&input("Feast", &items))
        .await
        .unwrap();

    assert_eq!(result.breakdown.len(), items.len());
    for (entry, name) in result.breakdown.iter().zip(items) {
        assert_eq!(entry.ingredient_name, name);
        assert!(entry.emissions_kg_co2e >= 0.0);
    }
}

#[tokio::test]
async fn test_saved_is_seventy_percent_of_total() {
    let cases: [&[&str]; 4] = [
        &["beef stew"],
        &["lamb", "potatoes", "onions"],
        &["exotic beef cut", "cheese", "vegetable oil"],
        &["apples", "bananas", "seasoning", "pasta"],
    ];

    let calculator = Calculator::default();
    for items in cases {
        let result = calculator.calculate(&input("Dish", items)).await.unwrap();
        assert!(result.total_kg_co2e >= 0.0);
        assert_close(result.saved_kg_co2e, 0.7 * result.total_kg_co2e);
    }
}

#[tokio::test]
async fn test_fallback_is_bit_identical_across_runs() {
    let calculator = Calculator::default();
    let dish = input("Chicken Rice", &["chicken", "rice", "exotic beef cut", "unobtainium"]);

    let first = calculator.calculate(&dish).await.unwrap();
    let second = calculator.calculate(&dish).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total_kg_co2e.to_bits(), second.total_kg_co2e.to_bits());
    assert_eq!(first.saved_kg_co2e.to_bits(), second.saved_kg_co2e.to_bits());
}

#[tokio::test]
async fn test_concurrent_calculations_are_independent() {
    let calculator = Arc::new(Calculator::default());
    let dishes = vec![
        input("Chicken Rice", &["chicken", "rice"]),
        input("Mystery Dish", &["unobtainium"]),
        input("Chicken Rice", &["chicken", "rice"]),
    ];

    let results = futures::future::join_all(dishes.iter().map(|dish| {
        let calculator = calculator.clone();
        async move { calculator.calculate(dish).await }
    }))
    .await;

    let totals: Vec<f64> = results
        .into_iter()
        .map(|r| r.unwrap().total_kg_co2e)
        .collect();
    assert_close(totals[0], 1.854);
    assert_close(totals[1], 0.36);
    assert_eq!(totals[0].to_bits(), totals[2].to_bits());
}
