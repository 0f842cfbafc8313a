//! Benchmark suite for tutor-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tutor_algo::{match_pronunciation, QuizAttemptRecord, TopicSelector};

fn bench_match_cascade(c: &mut Criterion) {
    c.bench_function("match_pronunciation/toddler", |b| {
        b.iter(|| match_pronunciation(black_box("RED"), black_box("WED")))
    });
    c.bench_function("match_pronunciation/fuzzy_sentence", |b| {
        b.iter(|| {
            match_pronunciation(
                black_box("YELLOW"),
                black_box("I think it is a yeyo banana and a lellow star"),
            )
        })
    });
}

fn bench_topic_selection(c: &mut Criterion) {
    let selector = TopicSelector::default();
    let history: Vec<QuizAttemptRecord> = ["abc", "numbers", "colors", "shapes", "mixed"]
        .iter()
        .cycle()
        .take(200)
        .enumerate()
        .map(|(i, cat)| QuizAttemptRecord::new(*cat, (i % 6) as f64, 5.0))
        .collect();
    let mut rng = rand::rng();

    c.bench_function("TopicSelector::select_topics/200", |b| {
        b.iter(|| selector.select_topics(black_box(&history), &mut rng))
    });
}

criterion_group!(benches, bench_match_cascade, bench_topic_selection);
criterion_main!(benches);
