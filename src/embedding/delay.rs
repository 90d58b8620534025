use crate::error::{CcmError, Result};

/// Shadow manifold of one series plus the series values aligned to each vector.
///
/// Vector i is `(s[i], s[i+tau], ..., s[i+(E-1)tau])` and `targets[i]` is
/// `s[i+(E-1)tau]`, the time position of its last coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub dimension: usize,
    pub delay: usize,
    pub points: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl Embedding {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Leading offset `(E-1)*tau` between series time and vector index.
    pub fn offset(&self) -> usize {
        (self.dimension - 1) * self.delay
    }

    /// Vectors and targets at `indices`, in that order. Repeats are kept.
    pub fn select(&self, indices: &[usize]) -> Embedding {
        Embedding {
            dimension: self.dimension,
            delay: self.delay,
            points: indices.iter().map(|&i| self.points[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    /// The first `len` vectors.
    pub fn prefix(&self, len: usize) -> Result<Embedding> {
        if len > self.len() {
            return Err(CcmError::InvalidLibrarySize {
                requested: len,
                available: self.len(),
            });
        }
        Ok(Embedding {
            dimension: self.dimension,
            delay: self.delay,
            points: self.points[..len].to_vec(),
            targets: self.targets[..len].to_vec(),
        })
    }
}

/// Number of delay vectors a series of length `n` yields, if any.
pub fn embedding_len(n: usize, dimension: usize, delay: usize) -> Option<usize> {
    let span = (dimension.checked_sub(1)?).checked_mul(delay)?;
    n.checked_sub(span).filter(|&len| len > 0)
}

/// Time-delay embedding of `series` with dimension E and delay tau.
pub fn embed(series: &[f64], dimension: usize, delay: usize) -> Result<Embedding> {
    if dimension == 0 {
        return Err(CcmError::invalid("embedding_dim", dimension, ">= 1"));
    }
    if delay == 0 {
        return Err(CcmError::invalid("tau", delay, ">= 1"));
    }
    let n_points = embedding_len(series.len(), dimension, delay).ok_or(
        CcmError::InsufficientLength {
            len: series.len(),
            dimension,
            delay,
        },
    )?;

    let points = (0..n_points)
        .map(|i| (0..dimension).map(|d| series[i + d * delay]).collect())
        .collect();
    let offset = (dimension - 1) * delay;
    let targets = series[offset..offset + n_points].to_vec();

    Ok(Embedding {
        dimension,
        delay,
        points,
        targets,
    })
}

/// Criterion for [`optimal_delay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayMethod {
    /// First zero crossing of the autocorrelation.
    Autocorrelation,
    /// First local minimum of the binned average mutual information.
    MutualInformation,
}

/// Criterion for [`optimal_dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionMethod {
    /// False nearest neighbors.
    FalseNearestNeighbors,
    /// Cao's E1 saturation.
    Cao,
}

/// Estimate a delay for the embedding. Falls back to 1 for short or flat series.
pub fn optimal_delay(series: &[f64], max_lag: Option<usize>, method: DelayMethod) -> usize {
    let y = series;
    let n = y.len();
    if n < 4 {
        return 1;
    }
    let ml = max_lag.unwrap_or(n / 4).min(n / 2);

    match method {
        DelayMethod::Autocorrelation => {
            let mean_val: f64 = y.iter().sum::<f64>() / n as f64;
            let var: f64 = y.iter().map(|x| (x - mean_val).powi(2)).sum::<f64>();
            if var < 1e-15 {
                return 1;
            }

            for lag in 1..ml {
                let acf: f64 = y[..n - lag]
                    .iter()
                    .zip(y[lag..].iter())
                    .map(|(a, b)| (a - mean_val) * (b - mean_val))
                    .sum::<f64>()
                    / var;
                if acf <= 0.0 {
                    return lag;
                }
            }
            ml.max(1)
        }
        DelayMethod::MutualInformation => {
            let n_bins = 16usize;
            let min_val = y.iter().cloned().fold(f64::INFINITY, f64::min);
            let max_val = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let range = max_val - min_val;
            if range < 1e-15 {
                return 1;
            }

            let bin_idx = |v: f64| -> usize {
                let b = ((v - min_val) / range * n_bins as f64) as usize;
                b.min(n_bins - 1)
            };

            let mut prev_mi = f64::INFINITY;
            for lag in 1..ml {
                let n_pairs = n - lag;
                let mut joint = vec![vec![0usize; n_bins]; n_bins];
                let mut margin_a = vec![0usize; n_bins];
                let mut margin_b = vec![0usize; n_bins];

                for i in 0..n_pairs {
                    let bi = bin_idx(y[i]);
                    let bj = bin_idx(y[i + lag]);
                    joint[bi][bj] += 1;
                    margin_a[bi] += 1;
                    margin_b[bj] += 1;
                }

                let total = n_pairs as f64;
                let mut mi = 0.0;
                for bi in 0..n_bins {
                    for bj in 0..n_bins {
                        if joint[bi][bj] > 0 {
                            let pij = joint[bi][bj] as f64 / total;
                            let pi = margin_a[bi] as f64 / total;
                            let pj = margin_b[bj] as f64 / total;
                            mi += pij * (pij / (pi * pj)).ln();
                        }
                    }
                }

                if mi > prev_mi {
                    return (lag - 1).max(1);
                }
                prev_mi = mi;
            }
            ml.max(1)
        }
    }
}

fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn chebyshev(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}

/// Nearest other vector of `points[i]` under `dist`.
fn nearest_other(points: &[Vec<f64>], i: usize, dist: fn(&[f64], &[f64]) -> f64) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (j, p) in points.iter().enumerate() {
        if j == i {
            continue;
        }
        let d = dist(&points[i], p);
        if d < best.1 {
            best = (j, d);
        }
    }
    best
}

/// Estimate the embedding dimension for a given delay.
///
/// Returns 2 when the series is too short to test `max_dim` dimensions.
pub fn optimal_dimension(
    series: &[f64],
    delay: usize,
    max_dim: usize,
    method: DimensionMethod,
    threshold: f64,
) -> Result<usize> {
    if delay == 0 {
        return Err(CcmError::invalid("tau", delay, ">= 1"));
    }
    if max_dim < 2 {
        return Err(CcmError::invalid("max_dim", max_dim, ">= 2"));
    }
    let y = series;
    let n = y.len();
    let tau = delay;
    if n < (max_dim + 1) * tau + 2 {
        return Ok(2);
    }

    let lagged = |dim: usize, n_points: usize| -> Vec<Vec<f64>> {
        (0..n_points)
            .map(|i| (0..dim).map(|d| y[i + d * tau]).collect())
            .collect()
    };

    match method {
        DimensionMethod::Cao => {
            let mut prev_e = 0.0;
            for dim in 1..=max_dim {
                let n_points = n - dim * tau;
                if n_points < 2 {
                    return Ok(dim.max(2));
                }
                let embedded = lagged(dim, n_points);

                let mut e_sum = 0.0;
                let mut count = 0;
                for i in 0..n_points {
                    let (best_j, best_dist) = nearest_other(&embedded, i, chebyshev);
                    if best_dist > 1e-15 {
                        let d_next = (y[i + dim * tau] - y[best_j + dim * tau]).abs();
                        e_sum += d_next / best_dist;
                        count += 1;
                    }
                }
                let e = if count > 0 { e_sum / count as f64 } else { 1.0 };

                if dim > 1 && prev_e > 1e-15 && (e / prev_e - 1.0).abs() < threshold {
                    return Ok(dim);
                }
                prev_e = e;
            }
            Ok(max_dim)
        }
        DimensionMethod::FalseNearestNeighbors => {
            for dim in 1..max_dim {
                let n_points = n - (dim + 1) * tau;
                if n_points < 2 {
                    return Ok(dim.max(2));
                }
                let embedded = lagged(dim, n_points);

                let mut fnn_count = 0;
                let mut total = 0;
                for i in 0..n_points {
                    let (best_j, best_sq) = nearest_other(&embedded, i, squared_euclidean);
                    let best_dist = best_sq.sqrt();
                    if best_dist > 1e-15 {
                        let extra_dist = (y[i + dim * tau] - y[best_j + dim * tau]).abs();
                        if extra_dist / best_dist > 15.0 {
                            fnn_count += 1;
                        }
                        total += 1;
                    }
                }

                let fnn_ratio = if total > 0 {
                    fnn_count as f64 / total as f64
                } else {
                    0.0
                };
                if fnn_ratio < threshold {
                    return Ok(dim + 1);
                }
            }
            Ok(max_dim)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn vectors_and_targets_align() {
        let s: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let emb = embed(&s, 3, 2).unwrap();
        assert_eq!(emb.len(), 6);
        assert_eq!(emb.points[0], vec![0.0, 2.0, 4.0]);
        assert_eq!(emb.points[5], vec![5.0, 7.0, 9.0]);
        assert_eq!(emb.targets, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(emb.offset(), 4);
    }

    #[test]
    fn too_short_is_an_error() {
        let s = [1.0, 2.0, 3.0, 4.0];
        let err = embed(&s, 3, 2).unwrap_err();
        assert_eq!(
            err,
            CcmError::InsufficientLength {
                len: 4,
                dimension: 3,
                delay: 2
            }
        );
        assert!(embed(&s[..1], 2, 1).is_err());
        assert!(embed(&[], 1, 1).is_err());
    }

    #[test]
    fn select_keeps_duplicates() {
        let s: Vec<f64> = (0..6).map(|i| i as f64 * 10.0).collect();
        let emb = embed(&s, 2, 1).unwrap();
        let sub = emb.select(&[3, 3, 0]);
        assert_eq!(sub.targets, vec![40.0, 40.0, 10.0]);
        assert_eq!(sub.points[2], vec![0.0, 10.0]);
    }

    #[test]
    fn prefix_beyond_length_fails() {
        let s: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let emb = embed(&s, 2, 1).unwrap();
        assert!(emb.prefix(5).is_ok());
        assert!(matches!(
            emb.prefix(6),
            Err(CcmError::InvalidLibrarySize { requested: 6, available: 5 })
        ));
    }

    #[test]
    fn delay_of_sine_is_near_quarter_period() {
        let s: Vec<f64> = (0..400)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 40.0).sin())
            .collect();
        let lag = optimal_delay(&s, None, DelayMethod::Autocorrelation);
        assert!((9..=11).contains(&lag), "lag = {lag}");
    }

    #[test]
    fn mutual_information_delay_of_sine() {
        let s: Vec<f64> = (0..400)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 40.0).sin())
            .collect();
        let lag = optimal_delay(&s, None, DelayMethod::MutualInformation);
        assert!((4..=16).contains(&lag), "lag = {lag}");
        assert_eq!(optimal_delay(&[0.5; 50], None, DelayMethod::MutualInformation), 1);
    }

    fn henon_x(n: usize) -> Vec<f64> {
        let (mut x, mut y) = (0.1, 0.1);
        let mut out = Vec::with_capacity(n);
        for t in 0..n + 100 {
            let xn = 1.0 - 1.4 * x * x + y;
            y = 0.3 * x;
            x = xn;
            if t >= 100 {
                out.push(x);
            }
        }
        out
    }

    #[test]
    fn false_neighbors_dimension_of_maps() {
        let mut logistic = vec![0.4; 600];
        for t in 0..599 {
            logistic[t + 1] = 3.8 * logistic[t] * (1.0 - logistic[t]);
        }
        let dim = optimal_dimension(&logistic, 1, 8, DimensionMethod::FalseNearestNeighbors, 0.1)
            .unwrap();
        assert_eq!(dim, 2);

        let dim = optimal_dimension(&henon_x(800), 1, 8, DimensionMethod::FalseNearestNeighbors, 0.1)
            .unwrap();
        assert!((2..=4).contains(&dim), "dim = {dim}");
    }

    #[test]
    fn cao_dimension_of_henon() {
        let dim = optimal_dimension(&henon_x(800), 1, 8, DimensionMethod::Cao, 0.1).unwrap();
        assert!((2..=6).contains(&dim), "dim = {dim}");
    }

    #[test]
    fn dimension_rejects_bad_arguments() {
        let s = henon_x(100);
        assert!(optimal_dimension(&s, 0, 8, DimensionMethod::Cao, 0.1).is_err());
        assert!(optimal_dimension(&s, 1, 1, DimensionMethod::Cao, 0.1).is_err());
    }

    #[test]
    fn dimension_short_series_defaults_to_two() {
        let s = [0.1, 0.2, 0.3];
        assert_eq!(
            optimal_dimension(&s, 1, 10, DimensionMethod::FalseNearestNeighbors, 0.01).unwrap(),
            2
        );
    }

    proptest! {
        #[test]
        fn embedding_length_matches_formula(
            n in 1usize..200,
            dim in 1usize..6,
            tau in 1usize..5,
        ) {
            let s: Vec<f64> = (0..n).map(|i| i as f64).collect();
            match embed(&s, dim, tau) {
                Ok(emb) => {
                    prop_assert_eq!(emb.len(), n - (dim - 1) * tau);
                    prop_assert_eq!(emb.targets.len(), emb.len());
                    for (p, t) in emb.points.iter().zip(&emb.targets) {
                        prop_assert_eq!(p[dim - 1], *t);
                    }
                }
                Err(e) => {
                    prop_assert!(n <= (dim - 1) * tau);
                    let is_short = matches!(e, CcmError::InsufficientLength { .. });
                    prop_assert!(is_short);
                }
            }
        }
    }
}
