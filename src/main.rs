use std::time::Instant;

use clap::Parser;
use log::info;
use time::macros::date;

use coinsort::{
    validate, Category, CategorySet, LabeledExample, ModelRecord, TrainOptions, ValidationExample,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Implementation to calibrate (tfidf-sgd or frequency)
    #[arg(short, long, default_value = "tfidf-sgd")]
    implementation: String,

    /// Training epochs for the demo calibration
    #[arg(long, default_value_t = 200)]
    epochs: usize,

    /// Extra descriptions to classify after the built-in demo inputs
    #[arg(short, long)]
    classify: Vec<String>,
}

fn sample_transactions() -> Vec<LabeledExample> {
    [
        ("COLES SUPERMARKET 0483", "Groceries"),
        ("WOOLWORTHS METRO 1179", "Groceries"),
        ("ALDI STORE 44", "Groceries"),
        ("METRO TRAINS MELBOURNE", "Transport"),
        ("MYKI TOP UP", "Transport"),
        ("SHELL COLES EXPRESS FUEL", "Car"),
        ("VICROADS REGO RENEWAL", "Car"),
        ("AGL ENERGY PAYMENT", "Utilities"),
        ("YARRA VALLEY WATER", "Utilities"),
        ("NETFLIX SUBSCRIPTION", "Entertainment"),
        ("SPOTIFY PREMIUM", "Entertainment"),
        ("RENT PAYMENT REF 5521", "Housing"),
    ]
    .into_iter()
    .map(|(description, category)| LabeledExample::new(description, category))
    .collect()
}

fn demo_categories(examples: &[LabeledExample]) -> CategorySet {
    let mut names: Vec<&str> = Vec::new();
    for example in examples {
        if !names.contains(&example.category.as_str()) {
            names.push(&example.category);
        }
    }
    CategorySet::new(names.into_iter().enumerate().map(|(idx, name)| Category {
        id: idx as i64 + 1,
        name: name.to_string(),
    }))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Transaction Categoriser Demo ===");

    let examples = sample_transactions();
    let categories = demo_categories(&examples);

    let start_time = Instant::now();
    info!("Calibrating model...");
    let record = ModelRecord::calibrate(
        "demo",
        &args.implementation,
        date!(2017 - 01 - 01),
        date!(2017 - 12 - 31),
        &examples,
        TrainOptions {
            epochs: args.epochs,
            ..TrainOptions::default()
        },
    )?;
    let build_time = start_time.elapsed();
    info!("=== Model Calibrated Successfully (took {:.2?}) ===\n", build_time);

    let categoriser = record.categoriser()?;

    let mut test_inputs = vec![
        // Clear single-category cases
        "COLES SUPERMARKET 0099",
        "MYKI TOP UP AUTO",
        "AGL ENERGY",
        "NETFLIX.COM",
        "RENT PAYMENT REF 5522",
        // Mixed-category cases
        "COLES EXPRESS FUEL",
        "METRO STORE 12",
        // Edge cases
        "TRANSFER 00817",
        "PAYPAL *UNKNOWN MERCHANT",
    ]
    .into_iter()
    .map(str::to_string)
    .collect::<Vec<_>>();
    test_inputs.extend(args.classify);

    info!("=== Running Classifications ({} inputs) ===\n", test_inputs.len());
    let classify_start = Instant::now();

    for (i, text) in test_inputs.iter().enumerate() {
        info!(
            "\nTest {}/{} (elapsed: {:.2?}):",
            i + 1,
            test_inputs.len(),
            classify_start.elapsed()
        );
        process_input(&categoriser, &categories, text)?;
    }
    let classify_time = classify_start.elapsed();

    info!("\n=== Validating Against Training Window ===");
    let validation_examples: Vec<ValidationExample> = examples
        .iter()
        .map(|example| ValidationExample {
            description: example.description.clone(),
            category_id: categories.get(&example.category).map(|category| category.id),
        })
        .collect();
    let report = validate(&record, &categories, &validation_examples)?;
    println!(
        "\nValidation: {}/{} matched ({:.0}%)",
        report.matched,
        report.examined,
        report.accuracy() * 100.0
    );
    for failure in &report.failures {
        match &failure.modelled {
            Some(suggestion) => println!(
                "  missed {:?}: modelled {} ({}%)",
                failure.example.description, suggestion.name, suggestion.score
            ),
            None => println!(
                "  missed {:?}: no live category matched",
                failure.example.description
            ),
        }
    }

    let total_time = start_time.elapsed();
    info!("\n=== Demo Complete ===");
    info!("Total time: {:.2?}", total_time);
    info!("Calibration time: {:.2?}", build_time);
    info!("Classification time: {:.2?}", classify_time);
    info!(
        "Average time per classification: {:.2?}",
        classify_time / test_inputs.len() as u32
    );

    Ok(())
}

fn process_input(
    categoriser: &coinsort::AnyCategoriser,
    categories: &CategorySet,
    text: &str,
) -> anyhow::Result<()> {
    use coinsort::Categoriser;

    info!("\nProcessing: {}", text);

    let predictions = categoriser.predict(text)?;
    let suggestions = categories.resolve_all(&predictions);

    println!("\nInput: {}", text);
    if suggestions.len() == 1 {
        println!("  Suggested category: {} ({}%)", suggestions[0].name, suggestions[0].score);
    } else {
        println!("  Low confidence, candidates:");
        for suggestion in &suggestions {
            println!("    {}: {}%", suggestion.name, suggestion.score);
        }
    }

    Ok(())
}
