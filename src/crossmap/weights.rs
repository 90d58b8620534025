/// Normalized exponential-kernel weights for neighbor distances sorted ascending.
///
/// With a zero nearest distance, the zero-distance neighbors share the weight
/// equally and every other neighbor gets 0. Otherwise `w_j = exp(-d_j / d_min)`
/// rescaled to sum to 1. Empty input gives an empty vector.
pub fn kernel_weights(distances: &[f64]) -> Vec<f64> {
    let Some(&min_dist) = distances.first() else {
        return Vec::new();
    };

    if min_dist == 0.0 {
        let zeros = distances.iter().filter(|&&d| d == 0.0).count() as f64;
        return distances
            .iter()
            .map(|&d| if d == 0.0 { 1.0 / zeros } else { 0.0 })
            .collect();
    }

    let raw: Vec<f64> = distances.iter().map(|&d| (-d / min_dist).exp()).collect();
    // the nearest term is exp(-1), so the sum never underflows to zero
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn zero_distance_ties_share_weight() {
        let w = kernel_weights(&[0.0, 0.0, 0.3, 1.0]);
        assert_eq!(w, vec![0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn single_neighbor_gets_everything() {
        assert_eq!(kernel_weights(&[2.5]), vec![1.0]);
        assert_eq!(kernel_weights(&[0.0]), vec![1.0]);
    }

    #[test]
    fn closer_neighbors_weigh_more() {
        let w = kernel_weights(&[1.0, 2.0, 4.0]);
        assert!(w[0] > w[1] && w[1] > w[2]);
        assert_relative_eq!(w[0] / w[1], std::f64::consts::E, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn weights_sum_to_one(
            mut d in prop::collection::vec(0.0f64..100.0, 1..12),
            zeros in 0usize..4,
        ) {
            for slot in d.iter_mut().take(zeros) {
                *slot = 0.0;
            }
            d.sort_by(f64::total_cmp);
            let w = kernel_weights(&d);
            let sum: f64 = w.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
            prop_assert!(w.iter().all(|&x| x >= 0.0));
        }
    }
}
