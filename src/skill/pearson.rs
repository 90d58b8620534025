use super::SkillMetric;

/// Pearson correlation between predicted and observed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pearson;

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Pearson correlation coefficient over the common prefix of `a` and `b`.
///
/// `NaN` when fewer than two points are available or either side is constant.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return f64::NAN;
    }
    let (a, b) = (&a[..n], &b[..n]);
    if is_constant(a) || is_constant(b) {
        return f64::NAN;
    }

    let mean_a: f64 = a.iter().sum::<f64>() / n as f64;
    let mean_b: f64 = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

impl SkillMetric for Pearson {
    fn name(&self) -> &'static str {
        "pearson"
    }

    fn score(&self, predicted: &[f64], observed: &[f64]) -> f64 {
        correlation(predicted, observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_and_inverse() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        let c = [4.0, 3.0, 2.0, 1.0];
        assert_relative_eq!(correlation(&a, &b), 1.0, epsilon = 1e-12);
        assert_relative_eq!(correlation(&a, &c), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn known_value() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert_relative_eq!(correlation(&a, &b), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_nan() {
        assert!(correlation(&[1.0], &[2.0]).is_nan());
        assert!(correlation(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).is_nan());
        assert!(Pearson.score(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]).is_nan());
    }
}
