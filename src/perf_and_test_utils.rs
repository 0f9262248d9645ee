//! Utilities to generate random sequences and queries, and to time query
//! batches in the perf binaries.

use std::time::Instant;

use rand::Rng;

pub fn type_of<T>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

/// Generates a sequence of `n` random symbols in `[0, sigma)`.
pub fn gen_sequence(n: usize, sigma: usize) -> Vec<u8> {
    assert!((1..=256).contains(&sigma));
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(0..sigma) as u8).collect()
}

/// Generates `n_queries` random positions in `[0, n]`.
pub fn gen_queries(n_queries: usize, n: usize) -> Vec<usize> {
    let mut rng = rand::thread_rng();
    (0..n_queries).map(|_| rng.gen_range(0..=n)).collect()
}

/// Generates `n_queries` rank queries `(pos, symbol)`. Each symbol is drawn
/// from the sequence itself so that the queried symbol always occurs.
pub fn gen_rank_queries(n_queries: usize, sequence: &[u8]) -> Vec<(usize, u8)> {
    let mut rng = rand::thread_rng();
    (0..n_queries)
        .map(|_| {
            let pos = rng.gen_range(0..sequence.len());
            (pos, sequence[pos])
        })
        .collect()
}

/// Generates `n_queries` non-empty position ranges `(l, r)` with
/// `l < r <= n`.
pub fn gen_range_queries(n_queries: usize, n: usize) -> Vec<(usize, usize)> {
    assert!(n > 0);
    let mut rng = rand::thread_rng();
    (0..n_queries)
        .map(|_| {
            let l = rng.gen_range(0..n);
            let r = rng.gen_range(l + 1..=n);
            (l, r)
        })
        .collect()
}

/// Measures the latency of batches of queries over a number of runs.
pub struct TimingQueries {
    timings: Vec<u128>, // nanosecs of each run
    n_queries: usize,
    start: Option<Instant>,
}

impl TimingQueries {
    pub fn new(n_runs: usize, n_queries: usize) -> Self {
        Self {
            timings: Vec::with_capacity(n_runs),
            n_queries,
            start: None,
        }
    }

    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        let start = self.start.take().expect("stop without a matching start");
        self.timings.push(start.elapsed().as_nanos());
    }

    /// Returns `(min, max, avg)` time per query in nanoseconds over the
    /// recorded runs.
    pub fn get(&self) -> (u128, u128, u128) {
        let n = self.n_queries.max(1) as u128;
        let min = self.timings.iter().min().copied().unwrap_or(0) / n;
        let max = self.timings.iter().max().copied().unwrap_or(0) / n;
        let avg =
            self.timings.iter().sum::<u128>() / (self.timings.len().max(1) as u128) / n;
        (min, max, avg)
    }
}
