use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::unbounded;
use matmul_strategies::{
    Error, Matrix, Operands, ProcessPool, Role, RowRange, Verdict, multiply_joined,
    multiply_mixed, multiply_sequential, partition, seeded_inputs, spawn_detached, verify,
};

const WORKER_BIN: &str = env!("CARGO_BIN_EXE_matmul-strategies");

fn assert_matrices_equal(expected: &Matrix, actual: &Matrix, name: &str) {
    assert_eq!(expected.size(), actual.size(), "{}: size mismatch", name);
    for i in 0..expected.size() {
        for j in 0..expected.size() {
            assert_eq!(
                expected.get(i, j),
                actual.get(i, j),
                "{}: mismatch at ({}, {})",
                name,
                i,
                j
            );
        }
    }
}

fn sixteen() -> Matrix {
    Matrix::from_rows(vec![
        vec![1, 2, 3, 4],
        vec![5, 6, 7, 8],
        vec![9, 10, 11, 12],
        vec![13, 14, 15, 16],
    ])
    .unwrap()
}

fn operands(a: Matrix, b: Matrix) -> Operands {
    let baseline = multiply_sequential(&a, &b);
    Operands::new(Arc::new(a), Arc::new(b), Arc::new(baseline))
}

// ============================================================
// Four-by-four, two workers: every strategy agrees
// ============================================================

#[test]
fn test_4x4_all_strategies() {
    let m = sixteen();
    let expected = multiply_sequential(&m, &m);
    assert_eq!(expected.get(0, 0), 90);

    let processes = ProcessPool::with_program(WORKER_BIN, 2)
        .multiply(&m, &m)
        .unwrap();
    assert_matrices_equal(&expected, &processes, "processes 4x4");

    let joined = multiply_joined(&m, &m, 2).unwrap();
    assert_matrices_equal(&expected, &joined, "joined 4x4");

    let ops = operands(m.clone(), m.clone());
    let (tx, rx) = unbounded();

    let mixed = multiply_mixed(&ops, 2, &tx).unwrap();
    let detached = spawn_detached(&ops, 2, &tx).unwrap();
    drop(tx);

    mixed.wait();
    detached.wait();
    assert_matrices_equal(&expected, &mixed.result().unwrap(), "mixed 4x4");
    assert_matrices_equal(&expected, &detached.result().unwrap(), "detached 4x4");

    let reports: Vec<_> = rx.iter().collect();
    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|r| r.verdict == Verdict::Identical));
}

// ============================================================
// Default-sized run with the driver's seeds
// ============================================================

#[test]
fn test_seeded_100x100() {
    let (a, b) = seeded_inputs(100, "1211553", "2003").unwrap();
    let expected = multiply_sequential(&a, &b);

    let processes = ProcessPool::with_program(WORKER_BIN, 4)
        .multiply(&a, &b)
        .unwrap();
    assert!(verify(&processes, &expected).is_identical());

    let joined = multiply_joined(&a, &b, 4).unwrap();
    assert!(verify(&joined, &expected).is_identical());
}

// ============================================================
// Uneven partitions
// ============================================================

#[test]
fn test_uneven_partition_sizes() {
    let lens: Vec<usize> = partition(10, 4).iter().map(RowRange::len).collect();
    assert_eq!(lens, vec![2, 2, 2, 4]);
}

#[test]
fn test_uneven_worker_counts() {
    let test_cases = [(10, 4), (7, 3), (11, 5), (13, 13), (9, 1)];

    for (n, workers) in test_cases {
        let a = Matrix::from_digits(n, "31415926").unwrap();
        let b = Matrix::from_digits(n, "2718281").unwrap();
        let expected = multiply_sequential(&a, &b);
        let name = format!("n={} workers={}", n, workers);

        let processes = ProcessPool::with_program(WORKER_BIN, workers)
            .multiply(&a, &b)
            .unwrap();
        assert_matrices_equal(&expected, &processes, &format!("processes {}", name));

        let joined = multiply_joined(&a, &b, workers).unwrap();
        assert_matrices_equal(&expected, &joined, &format!("joined {}", name));
    }
}

// ============================================================
// Detached lifecycle
// ============================================================

#[test]
fn test_detached_only_complete_after_wait() {
    let (a, b) = seeded_inputs(40, "1211553", "2003").unwrap();
    let ops = operands(a, b);
    let (tx, rx) = unbounded();

    let handle = spawn_detached(&ops, 4, &tx).unwrap();
    drop(tx);

    // Whatever has been published so far must already be correct.
    let early = handle.slots().snapshot();
    for worker in 0..handle.slots().workers() {
        if let Some(rows) = handle.slots().rows(worker) {
            assert_eq!(rows, ops.baseline.rows(handle.slots().range(worker)));
        }
    }
    assert_eq!(early.size(), 40);

    assert!(handle.wait_timeout(Duration::from_secs(60)));
    assert!(handle.is_finished());
    assert_matrices_equal(&ops.baseline, &handle.result().unwrap(), "detached 40x40");

    let mut seen: Vec<usize> = rx.iter().map(|r| r.worker).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);
}

#[test]
fn test_mixed_roles() {
    let (a, b) = seeded_inputs(20, "1211553", "2003").unwrap();
    let ops = operands(a, b);
    let (tx, rx) = unbounded();

    let handle = multiply_mixed(&ops, 4, &tx).unwrap();
    handle.wait();
    drop(tx);

    let mut reports: Vec<_> = rx.iter().collect();
    reports.sort_by_key(|r| r.worker);
    for report in &reports {
        let role = if report.worker < 2 {
            Role::Detached
        } else {
            Role::Joined
        };
        assert_eq!(report.role, role, "worker {}", report.worker);
        assert_eq!(report.verdict, Verdict::Identical);
    }
    assert_eq!(reports.len(), 4);
}

// ============================================================
// Process worker failures
// ============================================================

#[test]
fn test_process_spawn_failure_aborts() {
    let m = sixteen();
    let pool = ProcessPool::with_program("/definitely/not/a/worker", 2);
    assert!(matches!(
        pool.multiply(&m, &m),
        Err(Error::Spawn { worker: 0, .. })
    ));
}

#[test]
fn test_process_worker_rejects_bad_subcommand() {
    // Without the worker subcommand the binary never answers with a frame.
    let m = sixteen();
    let pool = ProcessPool::with_program(WORKER_BIN, 1).args(["--definitely-not-a-flag"]);
    match pool.multiply(&m, &m) {
        Err(Error::IncompleteResult { worker: 0, .. }) | Err(Error::Spawn { worker: 0, .. }) => {}
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_process_worker_failure_exit() {
    // A real worker answers with a valid frame, then the wrapper exits 3.
    let m = sixteen();
    let script = format!("\"{}\" worker; exit 3", WORKER_BIN);
    let pool = ProcessPool::with_program("sh", 1).args(["-c", script.as_str()]);
    match pool.multiply(&m, &m) {
        Err(Error::WorkerExit { worker: 0, status }) => assert_eq!(status.code(), Some(3)),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

// ============================================================
// Zero workers is a caller bug, never an all-zero result
// ============================================================

#[test]
#[should_panic(expected = "worker count must be positive")]
fn test_joined_zero_workers_panics() {
    let m = sixteen();
    let _ = multiply_joined(&m, &m, 0);
}

#[test]
#[should_panic(expected = "worker count must be positive")]
fn test_process_zero_workers_panics() {
    let m = sixteen();
    let _ = ProcessPool::with_program(WORKER_BIN, 0).multiply(&m, &m);
}

#[test]
#[should_panic(expected = "worker count must be positive")]
fn test_detached_zero_workers_panics() {
    let ops = operands(sixteen(), sixteen());
    let (tx, _rx) = unbounded();
    let _ = spawn_detached(&ops, 0, &tx);
}
