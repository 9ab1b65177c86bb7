//! Benchmarks for training, classification and evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use sms_bayes::classify::classify;
use sms_bayes::evaluate::{evaluate, sweep};
use sms_bayes::message::{Label, Message};
use sms_bayes::model::Model;

const SPAM_WORDS: &[&str] = &[
    "win", "free", "prize", "call", "now", "claim", "urgent", "cash", "txt", "reply",
];
const HAM_WORDS: &[&str] = &[
    "ok", "see", "you", "later", "lunch", "home", "meeting", "sorry", "love", "tonight",
];
const SHARED_WORDS: &[&str] = &["the", "a", "to", "and", "for", "is", "in", "u", "me", "it"];

/// Synthetic corpus of `n` messages, roughly 13% spam like the UCI dataset.
fn corpus(n: usize, seed: u64) -> Vec<Message> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let label = if rng.gen_bool(0.13) { Label::Spam } else { Label::Ham };
            let own = if label.is_spam() { SPAM_WORDS } else { HAM_WORDS };
            let len = rng.gen_range(4..20);
            let words: Vec<&str> = (0..len)
                .map(|_| {
                    let pool = if rng.gen_bool(0.6) { own } else { SHARED_WORDS };
                    *pool.choose(&mut rng).unwrap()
                })
                .collect();
            Message::new(label, words.join(" "))
        })
        .collect()
}

fn bench_train(c: &mut Criterion) {
    let messages = corpus(5_000, 0);
    c.bench_function("train_5k", |bench| {
        bench.iter(|| black_box(Model::train(&messages).unwrap()))
    });
}

fn bench_classify(c: &mut Criterion) {
    let model = Model::train(&corpus(5_000, 0)).unwrap();
    c.bench_function("classify_one", |bench| {
        bench.iter(|| {
            black_box(classify("URGENT! Call now to claim your free prize", 1.0, &model).unwrap())
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let model = Model::train(&corpus(4_000, 0)).unwrap();
    let held_out = corpus(1_000, 1);

    c.bench_function("evaluate_1k", |bench| {
        bench.iter(|| black_box(evaluate(&model, 1.0, &held_out).unwrap()))
    });

    let alphas = [0.1, 0.25, 0.5, 0.75, 1.0];
    c.bench_function("sweep_5x1k", |bench| {
        bench.iter(|| black_box(sweep(&model, &alphas, &held_out).unwrap()))
    });
}

criterion_group!(benches, bench_train, bench_classify, bench_evaluate);
criterion_main!(benches);
