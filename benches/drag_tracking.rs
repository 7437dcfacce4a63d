// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the floating preview's drag tracking.
//!
//! Measures:
//! - A full mouse drag (press, many moves, release)
//! - Stream availability resolution done on every update

use criterion::{criterion_group, criterion_main, Criterion};
use iced::Point;
use proctor_lens::webcam::{
    DragController, FallbackStreamSlot, PointerKind, StreamAvailability, StreamHandle,
    StreamSources, WindowCursor,
};
use std::hint::black_box;

const MOVES_PER_DRAG: usize = 500;

fn bench_drag_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_tracking");

    for kind in [PointerKind::Mouse, PointerKind::Touch] {
        group.bench_function(format!("drag_{}", kind.label()), |b| {
            let mut cursor = WindowCursor::default();
            b.iter(|| {
                let mut drag = DragController::new(Point::new(24.0, 96.0));
                drag.begin_drag(Point::new(40.0, 110.0), kind, &mut cursor);
                for step in 0..MOVES_PER_DRAG {
                    let offset = step as f32;
                    black_box(drag.on_pointer_move(Point::new(40.0 + offset, 110.0 + offset)));
                }
                drag.end_drag(&mut cursor);
                black_box(drag.position())
            });
        });
    }

    group.finish();
}

fn bench_availability(c: &mut Criterion) {
    let fallback = FallbackStreamSlot::new();
    fallback.publish(StreamHandle::new("/dev/video0"));
    let sources = StreamSources::new(fallback);

    c.bench_function("stream_availability_resolve", |b| {
        b.iter(|| {
            StreamAvailability::resolve(black_box(sources.has_stream()), black_box(false))
        });
    });
}

criterion_group!(benches, bench_drag_gesture, bench_availability);
criterion_main!(benches);
