//! Benchmarks for the training hot paths: one full epoch loop and the
//! inference forward pass.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scalar_rnn_trainer_rs::{config::TrainerConfig, normalize::standardize, trainer::Trainer};

fn shift_sequences() -> (Vec<f64>, Vec<f64>) {
    let mut input = vec![1.0, 2.0, 3.0, 4.0];
    let mut target = vec![2.0, 3.0, 4.0, 5.0];
    standardize(&mut input);
    standardize(&mut target);
    (input, target)
}

/// Benchmark a bounded training run on the shift-by-one fixture.
fn bench_train_200_epochs(c: &mut Criterion) {
    let (input, target) = shift_sequences();

    c.bench_function("train_shift_200_epochs", |b| {
        b.iter(|| {
            let config = TrainerConfig::builder()
                .dropout_rate(0.0)
                .max_epochs(200)
                .build();
            let mut trainer = Trainer::new(input.len(), config, 42).unwrap();
            let report = trainer.train(black_box(&input), black_box(&target)).unwrap();
            black_box(report);
        });
    });
}

/// Benchmark the inference forward pass over a longer sequence.
fn bench_forward_pass(c: &mut Criterion) {
    let config = TrainerConfig::builder().dropout_rate(0.0).build();
    let mut trainer = Trainer::new(1024, config, 42).unwrap();
    let input: Vec<f64> = (0..1024).map(|i| (i as f64 * 0.01).sin()).collect();

    c.bench_function("forward_1024_timesteps", |b| {
        b.iter(|| {
            let predictions = trainer.predict(black_box(&input)).unwrap();
            black_box(predictions.len());
        });
    });
}

criterion_group!(benches, bench_train_200_epochs, bench_forward_pass);
criterion_main!(benches);
