//! Permutation significance of cross-map skill.

mod helpers;

use manifold_ccm::{permutation_significance, CausalityEngine, CcmConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use helpers::{coupled_pair, independent_pair, E, N, TAU};

#[test]
fn strong_coupling_is_significant() {
    let (x, y) = coupled_pair(N, 0.1);
    let config = CcmConfig::classic().with_embedding(E, TAU).with_seed(42);
    let (rho, p) = permutation_significance(&x, &y, &config, 100).unwrap();
    assert!(rho > 0.8, "rho = {rho}");
    assert!(p < 0.05, "p = {p}");
}

#[test]
fn p_value_stays_in_unit_interval() {
    let engine = CausalityEngine::new(CcmConfig::classic().with_embedding(E, TAU)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for seed in 0..3 {
        let (a, b) = independent_pair(150, seed);
        let test = engine.permutation_test(&a, &b, 30, &mut rng).unwrap();
        assert!((0.0..=1.0).contains(&test.p_value), "p = {}", test.p_value);
        assert_eq!(test.null_distribution.len(), 30);
    }
}

#[test]
fn copula_entropy_test_is_reproducible() {
    let (x, y) = coupled_pair(200, 0.1);
    let config = CcmConfig::copula_entropy().with_embedding(E, TAU).with_seed(4);
    let a = permutation_significance(&x, &y, &config, 10).unwrap();
    let b = permutation_significance(&x, &y, &config, 10).unwrap();
    assert_eq!(a, b);
    assert!((0.0..=1.0).contains(&a.1));
}
