//! Shared generators for the integration suites.
//!
//! Every generator is deterministic: chaotic maps from fixed initial
//! conditions, noise from a seeded ChaCha stream.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const N: usize = 500;
pub const E: usize = 3;
pub const TAU: usize = 1;

/// Uncoupled logistic map `x[t+1] = r x[t] (1 - x[t])`.
pub fn logistic(n: usize, r: f64, x0: f64) -> Vec<f64> {
    let mut x = vec![0.0; n];
    x[0] = x0;
    for t in 0..n - 1 {
        x[t + 1] = x[t] * (r - r * x[t]);
    }
    x
}

/// Driver x (r = 3.8) forcing y (r = 3.5) with strength `beta`.
pub fn coupled_pair(n: usize, beta: f64) -> (Vec<f64>, Vec<f64>) {
    let (rx, ry) = (3.8, 3.5);
    let mut x = vec![0.0; n];
    let mut y = vec![0.0; n];
    x[0] = 0.4;
    y[0] = 0.2;
    for t in 0..n - 1 {
        x[t + 1] = x[t] * (rx - rx * x[t]);
        y[t + 1] = y[t] * (ry - ry * y[t] - beta * x[t]);
    }
    (x, y)
}

/// Chain X -> Y -> Z of logistic maps (r = 3.8) mixed with strength `c`.
pub fn causal_chain(n: usize, c: f64) -> [Vec<f64>; 3] {
    let r = 3.8;
    let mut x = vec![0.0; n];
    let mut y = vec![0.0; n];
    let mut z = vec![0.0; n];
    x[0] = 0.4;
    y[0] = 0.2;
    z[0] = 0.3;
    for t in 0..n - 1 {
        let fx = x[t] * (r - r * x[t]);
        let fy = y[t] * (r - r * y[t]);
        let fz = z[t] * (r - r * z[t]);
        x[t + 1] = fx;
        y[t + 1] = (1.0 - c) * fy + c * fx;
        z[t + 1] = (1.0 - c) * fz + c * fy;
    }
    [x, y, z]
}

/// `n` uniform samples in [0, 1).
pub fn uniform(n: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
    (0..n).map(|_| rng.gen::<f64>()).collect()
}

/// Two independent uniform series from one seeded stream.
pub fn independent_pair(n: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let a = uniform(n, &mut rng);
    let b = uniform(n, &mut rng);
    (a, b)
}
