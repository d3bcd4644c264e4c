use std::hint::black_box;

use courier::{Context, Handler, Registry};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn bench_get_or_create(c: &mut Criterion) {
    let registry = Registry::new();
    registry.get_or_create("bus");
    c.bench_function("registry_get_existing", |b| {
        b.iter(|| black_box(registry.get_or_create(black_box("bus"))))
    });
    c.bench_function("registry_lookup_missing", |b| {
        b.iter(|| black_box(registry.lookup(black_box("ghost"))))
    });
}

fn bench_schedule_cancel(c: &mut Criterion) {
    let registry = Registry::new();
    let bus = registry.get_or_create("bus").unwrap();
    let handler = Handler::new(|_| Ok(()));
    let ctx: Context = std::sync::Arc::new(0u8);

    c.bench_function("schedule_then_cancel", |b| {
        b.iter(|| {
            bus.schedule("tick", Some(handler.clone()), Some(ctx.clone()))
                .cancel("tick", Some(&handler), Some(&ctx));
        })
    });
}

fn bench_deliver_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("deliver_fanout");
    let args = [json!(42), json!("payload")];

    for subscribers in [0usize, 1, 16, 256] {
        let registry = Registry::new();
        let bus = registry.get_or_create("bus").unwrap();
        bus.declare("tick");
        for _ in 0..subscribers {
            bus.on(
                "tick",
                Handler::new(|d| {
                    black_box(d.args().len());
                    Ok(())
                }),
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| b.iter(|| bus.deliver("tick", black_box(&args)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_get_or_create,
    bench_schedule_cancel,
    bench_deliver_fanout
);
criterion_main!(benches);
