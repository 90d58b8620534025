/// The k nearest library points of one query, closest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSet {
    pub indices: Vec<usize>,
    pub distances: Vec<f64>,
}

impl NeighborSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Smallest selected distance.
    pub fn min_distance(&self) -> Option<f64> {
        self.distances.first().copied()
    }
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Brute-force k-nearest search of `query` among `library`.
///
/// `exclude` names a library position that is never admitted (the query itself).
/// Equal distances keep library order. Non-finite distances are never admitted,
/// so the set is shorter than `k` when too few candidates exist.
pub fn nearest_neighbors(
    library: &[Vec<f64>],
    query: &[f64],
    k: usize,
    exclude: Option<usize>,
) -> NeighborSet {
    let mut best: Vec<(usize, f64)> = Vec::with_capacity(k + 1);
    if k == 0 {
        return NeighborSet {
            indices: Vec::new(),
            distances: Vec::new(),
        };
    }

    for (j, point) in library.iter().enumerate() {
        if exclude == Some(j) {
            continue;
        }
        let d = euclidean(point, query);
        if !d.is_finite() {
            continue;
        }
        if best.len() == k && d >= best[k - 1].1 {
            continue;
        }
        // after every candidate with an equal or smaller distance
        let pos = best.partition_point(|&(_, bd)| bd <= d);
        best.insert(pos, (j, d));
        best.truncate(k);
    }

    let (indices, distances) = best.into_iter().unzip();
    NeighborSet { indices, distances }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn picks_closest_in_order() {
        let lib = line(&[0.0, 5.0, 1.0, 3.0, 10.0]);
        let nn = nearest_neighbors(&lib, &[0.9], 3, None);
        assert_eq!(nn.indices, vec![2, 0, 3]);
        assert!((nn.distances[0] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn excludes_self() {
        let lib = line(&[0.0, 1.0, 2.0]);
        let nn = nearest_neighbors(&lib, &lib[1], 2, Some(1));
        assert!(!nn.indices.contains(&1));
        assert_eq!(nn.len(), 2);
    }

    #[test]
    fn ties_keep_library_order() {
        let lib = line(&[2.0, -2.0, 2.0, -2.0]);
        let nn = nearest_neighbors(&lib, &[0.0], 3, None);
        assert_eq!(nn.indices, vec![0, 1, 2]);
    }

    #[test]
    fn short_library_returns_what_exists() {
        let lib = line(&[1.0, 2.0]);
        let nn = nearest_neighbors(&lib, &lib[0], 4, Some(0));
        assert_eq!(nn.indices, vec![1]);
        assert_eq!(nn.min_distance(), Some(1.0));
    }

    #[test]
    fn euclidean_in_three_dimensions() {
        assert!((euclidean(&[0.0, 0.0, 0.0], &[1.0, 2.0, 2.0]) - 3.0).abs() < 1e-12);
    }
}
