use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use crossbeam_channel::unbounded;
use matmul_strategies::{
    Operands, ProcessPool, multiply_joined, multiply_mixed, multiply_sequential, seeded_inputs,
    spawn_detached,
};

const WORKER_BIN: &str = env!("CARGO_BIN_EXE_matmul-strategies");
const WORKERS: usize = 4;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies");
    group.sample_size(20);

    for size in [64, 100, 256] {
        let (a, b) = seeded_inputs(size, "1211553", "2003").expect("seeded inputs");
        let baseline = multiply_sequential(&a, &b);
        let pool = ProcessPool::with_program(WORKER_BIN, WORKERS);
        let ops = Operands::new(Arc::new(a.clone()), Arc::new(b.clone()), Arc::new(baseline));

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |bench, _| {
            bench.iter(|| multiply_sequential(black_box(&a), black_box(&b)))
        });

        group.bench_with_input(BenchmarkId::new("processes", size), &size, |bench, _| {
            bench.iter(|| pool.multiply(black_box(&a), black_box(&b)).expect("process run"))
        });

        group.bench_with_input(BenchmarkId::new("joined", size), &size, |bench, _| {
            bench.iter(|| multiply_joined(black_box(&a), black_box(&b), WORKERS).expect("joined run"))
        });

        // Mixed and detached are timed to full completion, not to return.
        group.bench_with_input(BenchmarkId::new("mixed", size), &size, |bench, _| {
            bench.iter(|| {
                let (tx, _rx) = unbounded();
                let handle = multiply_mixed(&ops, WORKERS, &tx).expect("mixed run");
                handle.wait();
                handle.result()
            })
        });

        group.bench_with_input(BenchmarkId::new("detached", size), &size, |bench, _| {
            bench.iter(|| {
                let (tx, _rx) = unbounded();
                let handle = spawn_detached(&ops, WORKERS, &tx).expect("detached run");
                handle.wait();
                handle.result()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
