//! Criterion benchmarks for claim resolution, direct and through the full
//! fixed tick.
//!
//! Run with: cargo bench -p turf --bench claim_bench --features turf/bench

use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use turf::arena::ArenaLayout;
use turf::config::MatchConfig;
use turf::paint::{resolve_claim, Claim};
use turf::team::{TeamId, TeamRoster};
use turf::test_harness::TestArena;
use turf::tile_registry::TileRegistry;

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_claim");
    let roster = TeamRoster::default();
    let base = TileRegistry::from_surface(ArenaLayout::default().hex_positions());

    group.bench_function("bare_surface", |b| {
        b.iter_batched(
            || base.clone(),
            |mut reg| {
                black_box(resolve_claim(
                    &mut reg,
                    &roster,
                    &Claim::new(Vec3::new(1.0, 2.0, 1.0), 0.5, TeamId(0)),
                ))
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("enemy_overwrite", |b| {
        let mut painted = base.clone();
        resolve_claim(
            &mut painted,
            &roster,
            &Claim::new(Vec3::new(1.0, 2.0, 1.0), 0.5, TeamId(1)),
        )
        .expect("roster team with finite origin");
        b.iter_batched(
            || painted.clone(),
            |mut reg| {
                black_box(resolve_claim(
                    &mut reg,
                    &roster,
                    &Claim::new(Vec3::new(1.2, 2.0, 1.0), 0.5, TeamId(0)),
                ))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_fixed_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("turf_tick");
    group.sample_size(50);

    let mut arena = TestArena::with_hex_arena(MatchConfig::default());
    let mut i = 0u32;
    group.bench_function("tick_with_16_claims", |b| {
        b.iter(|| {
            for k in 0..16u32 {
                i = i.wrapping_add(1);
                let x = (i.wrapping_mul(7).wrapping_add(k) % 17) as f32 - 8.0;
                let z = (i.wrapping_mul(3).wrapping_add(k * 5) % 17) as f32 - 8.0;
                arena.submit_claim(TeamId((k % 2) as u8), Vec3::new(x, 2.0, z), 0.5);
            }
            arena.tick(1);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_fixed_tick);
criterion_main!(benches);
