//! Performance benchmarks for rating calculations and match recording

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scoreboard::config::RecorderConfig;
use scoreboard::metrics::MetricsCollector;
use scoreboard::rating::{expected_score, update_ratings, WinTally};
use scoreboard::storage::InMemoryMatchStore;
use scoreboard::types::{GameScore, PlayerIdentity};
use scoreboard::{EloRatingCalculator, MatchOutcome, MatchRecorder, RatingCalculator};
use std::sync::Arc;

fn bench_rating_calculations(c: &mut Criterion) {
    let calculator = EloRatingCalculator::default();
    let pairs = [(1000.0, 1000.0), (1200.0, 950.0), (2400.0, 800.0)];

    c.bench_function("expected_score", |b| {
        b.iter(|| {
            for (a, b_rating) in pairs {
                black_box(expected_score(black_box(a), black_box(b_rating)));
            }
        })
    });

    let mut group = c.benchmark_group("update_ratings");
    for outcome in [MatchOutcome::Win, MatchOutcome::Draw, MatchOutcome::Loss] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", outcome)),
            &outcome,
            |b, &outcome| {
                b.iter(|| {
                    for (a, b_rating) in pairs {
                        black_box(update_ratings(
                            black_box(a),
                            black_box(b_rating),
                            outcome,
                            32.0,
                        ));
                    }
                })
            },
        );
    }
    group.finish();

    c.bench_function("calculator_update", |b| {
        b.iter(|| {
            black_box(calculator.update_ratings(
                black_box(1016.0),
                black_box(984.0),
                MatchOutcome::Loss,
            ))
        })
    });
}

fn bench_win_tally(c: &mut Criterion) {
    let mut group = c.benchmark_group("win_tally");
    for size in [1usize, 5, 50] {
        let games: Vec<GameScore> = (0..size)
            .map(|i| GameScore::new((i % 7) as u32, (i % 5) as u32))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &games, |b, games| {
            b.iter(|| black_box(WinTally::from_games(black_box(games)).outcome()))
        });
    }
    group.finish();
}

fn bench_match_recording(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let recorder = MatchRecorder::new(
        Arc::new(InMemoryMatchStore::new()),
        Arc::new(EloRatingCalculator::default()),
        RecorderConfig::default(),
        Arc::new(MetricsCollector::new().unwrap()),
    );
    let player = PlayerIdentity::new(1, "alice");
    let games = [GameScore::new(6, 4), GameScore::new(3, 6), GameScore::new(6, 2)];

    c.bench_function("record_match_in_memory", |b| {
        b.iter(|| {
            runtime
                .block_on(recorder.record_match(&player, "bob", &games))
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_rating_calculations,
    bench_win_tally,
    bench_match_recording
);
criterion_main!(benches);
