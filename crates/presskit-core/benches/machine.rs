//! Benchmarks for the gesture state machine.
//!
//! Covers the per-sample hot path (tap and drag cycles) and deadline
//! processing while a press is held with auto-repeat running.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use presskit_core::{
    GestureActions, GestureConfiguration, GestureStateMachine, PointerSample, Rect, Timestamp,
};
use std::time::Duration;

const BOUNDS: Rect = Rect::from_size(200.0, 60.0);

// =============================================================================
// Sample Benchmarks
// =============================================================================

fn bench_tap_cycle(c: &mut Criterion) {
    let mut machine = GestureStateMachine::with_actions(GestureActions::new().on_press(|| {}));
    let mut t = 0u64;

    c.bench_function("tap_cycle", |b| {
        b.iter(|| {
            machine.on_pointer_down(black_box(PointerSample::at(100.0, 30.0, t)));
            machine.on_pointer_up(black_box(PointerSample::at(100.0, 30.0, t + 10)), BOUNDS);
            t += 1000;
            machine.poll(Timestamp::from_millis(t));
        });
    });
}

fn bench_drag_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_samples");

    for moves in [8u64, 64, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(moves), moves, |b, &moves| {
            b.iter(|| {
                let mut machine =
                    GestureStateMachine::with_actions(GestureActions::new().on_drag(|_| {}));
                machine.on_pointer_down(PointerSample::at(0.0, 30.0, 0));
                for i in 1..=moves {
                    machine.on_pointer_move(PointerSample::at(i as f32, 30.0, i));
                }
                machine.on_pointer_up(PointerSample::at(moves as f32, 30.0, moves + 1), BOUNDS);
                black_box(machine.phase())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Deadline Benchmarks
// =============================================================================

fn bench_held_repeat(c: &mut Criterion) {
    let mut group = c.benchmark_group("held_repeat");
    let config = GestureConfiguration::default()
        .repeat_start_delay(Duration::from_millis(10))
        .repeat_interval(Duration::from_millis(10));

    for held_ms in [100u64, 1000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(held_ms), held_ms, |b, &held_ms| {
            b.iter(|| {
                let mut machine =
                    GestureStateMachine::new(config, GestureActions::new().on_repeat(|| {}));
                machine.on_pointer_down(PointerSample::at(100.0, 30.0, 0));
                machine.advance_to(Timestamp::from_millis(held_ms));
                black_box(machine.repeat_timer().tick_count())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tap_cycle, bench_drag_samples, bench_held_repeat);
criterion_main!(benches);
