//! Reach + arbitration benchmark.
//!
//! The collision check runs on every job intake; this keeps an eye on
//! the cost of the pure compute path (projection, reach, overlap).

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use duolift::layout::ShaftLayout;
use duolift::task::TaskKind;
use duolift_control::arbiter::{check_crossing, PeerSnapshot};
use duolift_control::reach::{compute_reach, Reach};

fn bench_compute_reach(c: &mut Criterion) {
    let layout = ShaftLayout::default();

    c.bench_function("compute_reach_full_move", |b| {
        b.iter(|| {
            compute_reach(
                black_box(TaskKind::FullMove),
                black_box(10),
                black_box(90),
                black_box(5),
                &layout,
            )
        })
    });

    c.bench_function("compute_reach_service_rows", |b| {
        b.iter(|| {
            compute_reach(
                black_box(TaskKind::BringAway),
                black_box(0),
                black_box(layout.service_top_row),
                black_box(50),
                &layout,
            )
        })
    });
}

fn bench_arbitration(c: &mut Criterion) {
    let layout = ShaftLayout::default();
    let peer = PeerSnapshot {
        reach: Reach { low: 5, high: 50 },
        active: true,
    };

    c.bench_function("validate_collision_path", |b| {
        b.iter(|| {
            let reach = compute_reach(
                black_box(TaskKind::MoveTo),
                black_box(30),
                black_box(0),
                black_box(80),
                &layout,
            );
            check_crossing(black_box(&reach), black_box(&peer))
        })
    });

    c.bench_function("check_crossing_sweep", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for low in 0..64i32 {
                let probe = Reach {
                    low,
                    high: low + 10,
                };
                if check_crossing(black_box(&probe), &peer) {
                    hits += 1;
                }
            }
            hits
        })
    });
}

criterion_group!(benches, bench_compute_reach, bench_arbitration);
criterion_main!(benches);
