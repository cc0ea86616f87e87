use coinsort::{
    Categoriser, CategoriserError, Implementation, LabeledExample, ModelRecord, RecordError,
    TrainOptions,
};
use time::macros::date;

fn training_set() -> Vec<LabeledExample> {
    vec![
        LabeledExample::new("COLES SUPERMARKET", "Groceries"),
        LabeledExample::new("WOOLWORTHS METRO", "Groceries"),
        LabeledExample::new("METRO TRAINS", "Transport"),
        LabeledExample::new("MYKI TOP UP", "Transport"),
    ]
}

fn calibrated() -> ModelRecord {
    ModelRecord::calibrate(
        "test-model",
        "tfidf-sgd",
        date!(2017 - 01 - 01),
        date!(2017 - 06 - 30),
        &training_set(),
        TrainOptions::default(),
    )
    .expect("Failed to calibrate record")
}

#[test]
fn test_calibrate_produces_usable_record() -> Result<(), Box<dyn std::error::Error>> {
    let record = calibrated();
    assert_eq!(record.version, 1);
    assert_eq!(record.implementation, Implementation::TfidfSgd);
    assert!(record.id.is_none());

    let categoriser = record.categoriser()?;
    let predictions = categoriser.predict("COLES SUPERMARKET")?;
    assert_eq!(predictions[0].category, "Groceries");

    Ok(())
}

#[test]
fn test_unknown_implementation_is_rejected() {
    let result = ModelRecord::calibrate(
        "bad",
        "sklearn",
        date!(2017 - 01 - 01),
        date!(2017 - 06 - 30),
        &training_set(),
        TrainOptions::default(),
    );
    assert!(matches!(result, Err(RecordError::UnknownImplementation(_))));
}

#[test]
fn test_empty_training_data_creates_no_record() {
    let result = ModelRecord::calibrate(
        "empty",
        "tfidf-sgd",
        date!(2017 - 01 - 01),
        date!(2017 - 06 - 30),
        &[],
        TrainOptions::default(),
    );
    assert!(matches!(result, Err(RecordError::Calibration(_))));
}

#[test]
fn test_recalibrate_bumps_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut record = calibrated();
    record.recalibrate(&training_set(), TrainOptions::default(), 1)?;
    assert_eq!(record.version, 2);

    let categoriser = record.categoriser()?;
    assert_eq!(
        categoriser.predict("MYKI TOP UP")?[0].category,
        "Transport"
    );

    Ok(())
}

#[test]
fn test_stale_version_is_rejected() {
    let mut record = calibrated();
    let before = record.state().to_vec();

    let result = record.recalibrate(&training_set(), TrainOptions::default(), 7);
    assert!(matches!(
        result,
        Err(RecordError::VersionConflict {
            expected: 7,
            actual: 1
        })
    ));
    assert_eq!(record.version, 1);
    assert_eq!(record.state(), before.as_slice());
}

#[test]
fn test_failed_recalibration_preserves_state() {
    let mut record = calibrated();
    let before = record.state().to_vec();

    let result = record.recalibrate(&[], TrainOptions::default(), 1);
    assert!(matches!(result, Err(RecordError::Calibration(_))));
    assert_eq!(record.version, 1);
    assert_eq!(record.state(), before.as_slice());
}

#[test]
fn test_from_parts_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let record = calibrated();
    let restored = ModelRecord::from_parts(
        Some(12),
        record.name.clone(),
        record.implementation.name(),
        record.training_from,
        record.training_to,
        record.version,
        record.state().to_vec(),
    )?;

    assert_eq!(restored.id, Some(12));
    let original = record.categoriser()?;
    let rehydrated = restored.categoriser()?;
    assert_eq!(
        original.predict("COLES SUPERMARKET")?,
        rehydrated.predict("COLES SUPERMARKET")?
    );

    Ok(())
}

#[test]
fn test_from_parts_with_garbage_state_fails_on_rehydration() {
    let record = ModelRecord::from_parts(
        Some(1),
        "corrupt",
        "tfidf-sgd",
        date!(2017 - 01 - 01),
        date!(2017 - 06 - 30),
        3,
        b"not a model".to_vec(),
    )
    .expect("record assembly does not parse state");

    let result = record.categoriser();
    assert!(matches!(result, Err(CategoriserError::MalformedState(_))));
}

#[test]
fn test_frequency_implementation_calibrates() -> Result<(), Box<dyn std::error::Error>> {
    let record = ModelRecord::calibrate(
        "baseline",
        "frequency",
        date!(2017 - 01 - 01),
        date!(2017 - 06 - 30),
        &training_set(),
        TrainOptions::default(),
    )?;

    let categoriser = record.categoriser()?;
    let predictions = categoriser.predict("ignored text")?;
    assert!(!predictions.is_empty());

    Ok(())
}
