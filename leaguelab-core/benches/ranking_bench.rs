//! Criterion benchmarks for the ranking engine.
//!
//! Benchmarks:
//! 1. Sequential ranking across table sizes
//! 2. Competition ranking on a tie-heavy table
//! 3. CSV table decode

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use leaguelab_core::data::{read_table, write_table};
use leaguelab_core::domain::{TeamRecord, TieMode};
use leaguelab_core::engine::compute_ranking_with;
use leaguelab_core::scoring::RulePreset;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_table(n: u32) -> Vec<TeamRecord> {
    (1..=n)
        .map(|pos| {
            let won = (n - pos) % 30;
            let drawn = (pos * 7) % 12;
            let lost = 38u32.saturating_sub(won + drawn);
            TeamRecord {
                name: format!("Club {pos}"),
                original_position: pos,
                played: won + drawn + lost,
                won,
                drawn,
                lost,
                goals_for: 40 + pos % 20,
                goals_against: 30 + pos % 15,
                original_points: won * 3 + drawn,
            }
        })
        .collect()
}

// ── 1. Sequential ranking ────────────────────────────────────────────

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_sequential");
    let rule = RulePreset::TwoPointsForWin.to_rule();

    for &size in &[20u32, 100, 1000] {
        let table = make_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| compute_ranking_with(black_box(table), &rule, TieMode::Sequential))
        });
    }
    group.finish();
}

// ── 2. Competition ranking ───────────────────────────────────────────

fn bench_competition(c: &mut Criterion) {
    let rule = RulePreset::TwoPointsForWin.to_rule();
    let table = make_table(1000);
    c.bench_function("rank_competition_1000", |b| {
        b.iter(|| compute_ranking_with(black_box(&table), &rule, TieMode::Competition))
    });
}

// ── 3. CSV decode ────────────────────────────────────────────────────

fn bench_csv_decode(c: &mut Criterion) {
    let mut buf = Vec::new();
    write_table(&mut buf, &make_table(20)).unwrap();
    c.bench_function("read_table_20", |b| {
        b.iter(|| read_table(black_box(buf.as_slice())))
    });
}

criterion_group!(benches, bench_sequential, bench_competition, bench_csv_decode);
criterion_main!(benches);
