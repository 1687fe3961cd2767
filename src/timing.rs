use std::time::{Duration, Instant};

/// Runs `f` once and returns its output with the wall-clock time it took.
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}
