#![allow(dead_code)]
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt::Debug;
use std::sync::Arc;

/// Keys for the benchmarks. `nth` is strictly increasing, so the even
/// positions make a duplicate-free key set and the odd positions fall
/// between its keys without ever matching one.
pub trait BenchData: Clone + Debug + Ord {
    fn nth(n: usize) -> Self;

    fn present(size: usize) -> Vec<Self> {
        (0..size).map(|n| Self::nth(2 * n)).collect()
    }

    fn absent(size: usize) -> Vec<Self> {
        (0..size).map(|n| Self::nth(2 * n + 1)).collect()
    }
}

impl BenchData for i64 {
    fn nth(n: usize) -> Self {
        n as i64 * 3 - 1_000_000
    }
}

impl BenchData for String {
    fn nth(n: usize) -> Self {
        format!("key-{:010}", n)
    }
}

impl<T: BenchData> BenchData for Arc<T> {
    fn nth(n: usize) -> Self {
        Arc::new(T::nth(n))
    }
}

/// A fixed shuffle, so insertion order never follows key order.
pub fn reorder<A: Clone>(items: &[A]) -> Vec<A> {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut out = items.to_vec();
    out.shuffle(&mut rng);
    out
}
