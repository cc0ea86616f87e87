use coinsort::{Categoriser, CategoriserError, LabeledExample, Prediction, TfidfSgdCategoriser, THRESH};

fn training_set() -> Vec<LabeledExample> {
    vec![
        LabeledExample::new("Shopping", "Shopping"),
        LabeledExample::new("Transport first", "Transport"),
        LabeledExample::new("Transport again", "Transport"),
        LabeledExample::new("Groceries", "Shopping"),
        LabeledExample::new("House", "House"),
        LabeledExample::new("Training", "Training"),
        LabeledExample::new("Transport/Car", "Car"),
        LabeledExample::new("School", "School"),
        LabeledExample::new("Childcare", "School"),
    ]
}

fn setup_test_categoriser() -> TfidfSgdCategoriser {
    let mut categoriser = TfidfSgdCategoriser::new();
    categoriser
        .fit(&training_set())
        .expect("Failed to fit categoriser");
    categoriser
}

fn assert_threshold_property(predictions: &[Prediction]) {
    assert!(!predictions.is_empty());
    if predictions[0].probability > THRESH {
        assert_eq!(predictions.len(), 1);
    } else {
        let all_but_last: f32 = predictions[..predictions.len() - 1]
            .iter()
            .map(|p| p.probability)
            .sum();
        assert!(all_but_last < THRESH);
    }
}

#[test]
fn test_predict_training_descriptions() -> Result<(), Box<dyn std::error::Error>> {
    let categoriser = setup_test_categoriser();

    let predictions = categoriser.predict("Shopping")?;
    assert_eq!(predictions[0].category, "Shopping");

    let predictions = categoriser.predict("Transport")?;
    assert_eq!(predictions[0].category, "Transport");

    Ok(())
}

#[test]
fn test_unseen_token_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let categoriser = setup_test_categoriser();

    let first = categoriser.predict("X")?;
    let second = categoriser.predict("X")?;
    assert!(!first.is_empty());
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_threshold_property_holds_across_inputs() -> Result<(), Box<dyn std::error::Error>> {
    let categoriser = setup_test_categoriser();

    for input in [
        "Shopping",
        "Transport",
        "Groceries",
        "House",
        "School",
        "X",
        "something entirely different",
        "",
    ] {
        let predictions = categoriser.predict(input)?;
        assert_threshold_property(&predictions);
    }

    Ok(())
}

#[test]
fn test_predict_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let categoriser = setup_test_categoriser();

    for input in ["Shopping", "Transport again", "unseen merchant"] {
        assert_eq!(categoriser.predict(input)?, categoriser.predict(input)?);
    }

    Ok(())
}

#[test]
fn test_serialize_round_trip_preserves_predictions() -> Result<(), Box<dyn std::error::Error>> {
    let categoriser = setup_test_categoriser();
    let restored = TfidfSgdCategoriser::from_bytes(&categoriser.to_bytes()?)?;

    for input in ["Shopping", "Transport", "Childcare", "X", "unseen text"] {
        assert_eq!(categoriser.predict(input)?, restored.predict(input)?);
    }

    Ok(())
}

#[test]
fn test_training_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
    let first = setup_test_categoriser();
    let second = setup_test_categoriser();

    for input in ["Shopping", "Transport", "School"] {
        assert_eq!(first.predict(input)?, second.predict(input)?);
    }

    Ok(())
}

#[test]
fn test_single_label_training_set() -> Result<(), Box<dyn std::error::Error>> {
    let mut categoriser = TfidfSgdCategoriser::new();
    categoriser.fit(&[
        LabeledExample::new("COLES SUPERMARKET", "Groceries"),
        LabeledExample::new("WOOLWORTHS METRO", "Groceries"),
        LabeledExample::new("ALDI STORE", "Groceries"),
    ])?;

    let predictions = categoriser.predict("anything at all")?;
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].category, "Groceries");
    assert_eq!(predictions[0].probability, 1.0);

    Ok(())
}

#[test]
fn test_empty_training_set_fails() {
    let mut categoriser = TfidfSgdCategoriser::new();
    let result = categoriser.fit(&[]);
    assert!(matches!(result, Err(CategoriserError::Train(_))));
}

#[test]
fn test_untrained_predict_fails() {
    let categoriser = TfidfSgdCategoriser::new();
    let result = categoriser.predict("Shopping");
    assert!(matches!(result, Err(CategoriserError::NotTrained)));
}

#[test]
fn test_malformed_state_is_rejected() {
    let result = TfidfSgdCategoriser::from_bytes(b"{\"wrong\": \"shape\"}");
    assert!(matches!(result, Err(CategoriserError::MalformedState(_))));
}

#[test]
fn test_refit_replaces_previous_state() -> Result<(), Box<dyn std::error::Error>> {
    let mut categoriser = setup_test_categoriser();
    categoriser.fit(&[
        LabeledExample::new("QANTAS AIRWAYS", "Holidays"),
        LabeledExample::new("JETSTAR FLIGHTS", "Holidays"),
        LabeledExample::new("COLES SUPERMARKET", "Groceries"),
    ])?;

    let info = categoriser.info();
    assert_eq!(info.categories, vec!["Holidays", "Groceries"]);

    let predictions = categoriser.predict("QANTAS AIRWAYS")?;
    assert_eq!(predictions[0].category, "Holidays");

    Ok(())
}
