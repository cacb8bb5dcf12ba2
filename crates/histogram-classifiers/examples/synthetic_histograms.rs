use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use histogram_classifiers::config::{ModelConfig, ModelType};
use histogram_classifiers::metrics::evaluate;
use histogram_classifiers::models::factory::build_model;
use histogram_classifiers::{Dataset, Histogram};

const FEATURE_COUNT: usize = 16;

/// Histogram of `words` draws concentrated on `peak`'s neighborhood.
fn sample_histogram(rng: &mut StdRng, peak: usize, words: usize) -> Histogram {
    let mut histogram = vec![0u32; FEATURE_COUNT];
    for _ in 0..words {
        let word = if rng.gen_bool(0.7) {
            (peak + rng.gen_range(0..3)) % FEATURE_COUNT
        } else {
            rng.gen_range(0..FEATURE_COUNT)
        };
        histogram[word] += 1;
    }
    histogram
}

/// Two "image categories" whose visual words peak at different positions.
fn synthetic_dataset(rng: &mut StdRng, per_class: usize) -> Dataset {
    [("bikes", 2), ("cars", 10)]
        .into_iter()
        .map(|(name, peak)| {
            let histograms: Vec<Histogram> = (0..per_class)
                .map(|_| sample_histogram(rng, peak, 40))
                .collect();
            (name, histograms)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let names: Vec<String> = std::env::args().skip(1).collect();
    let names = if names.is_empty() {
        vec!["tree".to_string(), "naive_bayes".to_string(), "svm".to_string()]
    } else {
        names
    };

    let mut rng = StdRng::seed_from_u64(7);
    let train = synthetic_dataset(&mut rng, 60);
    let test = synthetic_dataset(&mut rng, 20);
    train.log_summary();

    for name in names {
        let model_type: ModelType = name.parse().map_err(anyhow::Error::msg)?;
        let mut model = build_model(ModelConfig::new(FEATURE_COUNT, model_type))?;

        model
            .learn(&train)
            .with_context(|| format!("training {} failed", name))?;
        let evaluation = evaluate(model.as_ref(), &test)?;

        println!(
            "{:<12} accuracy={:.3} confusion={:?}",
            model.name(),
            evaluation.accuracy(),
            evaluation.confusion.as_slice()
        );
    }
    Ok(())
}
