//! Copula-entropy CCM: bootstrap libraries scored by mutual information.

mod helpers;

use manifold_ccm::{
    causality_matrix, pairwise_causality, CausalityEngine, CcmConfig, CcmError, Metric,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use helpers::{causal_chain, coupled_pair, independent_pair, logistic, E, N, TAU};

fn ce(seed: u64) -> CcmConfig {
    CcmConfig::copula_entropy().with_embedding(E, TAU).with_seed(seed)
}

#[test]
fn coupling_direction_is_recovered() {
    let (x, y) = coupled_pair(N, 0.1);
    let x_to_y = pairwise_causality(&x, &y, &ce(42), None).unwrap();
    let y_to_x = pairwise_causality(&y, &x, &ce(42), None).unwrap();
    assert!(x_to_y > y_to_x, "mi(x->y) = {x_to_y}, mi(y->x) = {y_to_x}");
    assert!(x_to_y > 0.8, "mi(x->y) = {x_to_y}");
    assert!(y_to_x < 0.1, "mi(y->x) = {y_to_x}");
}

#[test]
fn causal_chain_is_resolved() {
    let series = causal_chain(N, 0.1).to_vec();
    let m = causality_matrix(&series, &ce(42), None).unwrap();
    let (x, y, z) = (0, 1, 2);

    assert!(m.get(y, x) > 0.6, "X->Y = {}", m.get(y, x));
    assert!(m.get(z, y) > 0.55, "Y->Z = {}", m.get(z, y));
    assert!(m.get(x, y) < 0.1, "Y->X = {}", m.get(x, y));
    assert!(m.get(y, z) < 0.1, "Z->Y = {}", m.get(y, z));
}

#[test]
fn constant_cause_carries_no_information() {
    let effect = logistic(N, 3.8, 0.4);
    let mi = pairwise_causality(&vec![0.5; N], &effect, &ce(42), None).unwrap();
    assert!((0.0..0.1).contains(&mi), "mi = {mi}");
}

#[test]
fn independent_discrete_series_carry_no_information() {
    let (a, b) = independent_pair(N, 42);
    let levels = |s: Vec<f64>| -> Vec<f64> { s.into_iter().map(|v| (3.0 * v).floor()).collect() };
    let mi = pairwise_causality(&levels(a), &levels(b), &ce(42), None).unwrap();
    assert!((0.0..0.1).contains(&mi), "mi = {mi}");
}

#[test]
fn independent_noise_carries_no_information() {
    let (a, b) = independent_pair(N, 42);
    let mi = pairwise_causality(&a, &b, &ce(42), None).unwrap();
    assert!((0.0..0.1).contains(&mi), "mi = {mi}");
}

#[test]
fn identical_series_share_information() {
    let x = logistic(N, 3.8, 0.4);
    let mi = pairwise_causality(&x, &x, &ce(7), Some(300)).unwrap();
    assert!(mi > 1.0, "mi = {mi}");
}

#[test]
fn euclidean_metric_agrees_on_direction() {
    let (x, y) = coupled_pair(N, 0.1);
    let config = CcmConfig {
        metric: Metric::Euclidean,
        ..ce(3)
    };
    let x_to_y = pairwise_causality(&x, &y, &config, Some(400)).unwrap();
    let y_to_x = pairwise_causality(&y, &x, &config, Some(400)).unwrap();
    assert!(x_to_y > y_to_x, "mi(x->y) = {x_to_y}, mi(y->x) = {y_to_x}");
}

#[test]
fn scores_are_never_negative() {
    for seed in 0..5 {
        let (a, b) = independent_pair(200, seed);
        let mi = pairwise_causality(&a, &b, &ce(seed), None).unwrap();
        assert!(mi >= 0.0, "seed {seed}: {mi}");
    }
}

#[test]
fn sampling_with_replacement_is_supported() {
    let (x, y) = coupled_pair(300, 0.1);
    let config = CcmConfig {
        replace: true,
        ..ce(8)
    };
    let a = pairwise_causality(&x, &y, &config, None).unwrap();
    let b = pairwise_causality(&x, &y, &config, None).unwrap();
    assert_eq!(a, b);
    assert!(a.is_finite());
}

#[test]
fn explicit_library_larger_than_embedding_fails() {
    let (x, y) = coupled_pair(100, 0.1);
    let err = pairwise_causality(&x, &y, &ce(1), Some(99)).unwrap_err();
    assert_eq!(err, CcmError::InvalidLibrarySize { requested: 99, available: 98 });
}

#[test]
fn caller_rng_drives_the_draws() {
    let (x, y) = coupled_pair(300, 0.1);
    let engine = CausalityEngine::new(CcmConfig::copula_entropy().with_embedding(E, TAU)).unwrap();
    let a = engine
        .causality_with_rng(&x, &y, Some(120), &mut ChaCha8Rng::seed_from_u64(5))
        .unwrap();
    let b = engine
        .causality_with_rng(&x, &y, Some(120), &mut ChaCha8Rng::seed_from_u64(5))
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn matrix_is_identical_across_thread_counts() {
    let series = causal_chain(300, 0.1).to_vec();
    let config = ce(42);
    let build = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| causality_matrix(&series, &config, Some(150)).unwrap())
    };
    assert_eq!(build(1), build(4));
}
