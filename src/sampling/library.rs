use rand::seq::index;
use rand::Rng;

use crate::config::CcmConfig;
use crate::error::{CcmError, Result};

/// One bootstrap library: positions into the embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDraw {
    pub size: usize,
    pub indices: Vec<usize>,
}

/// Library-size ladder and random index subsets for convergence analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySampler {
    embedding_dim: usize,
    lib_sizes: Option<Vec<usize>>,
    n_samples: usize,
    replace: bool,
}

impl LibrarySampler {
    pub fn new(embedding_dim: usize, n_samples: usize, replace: bool) -> Self {
        Self {
            embedding_dim,
            lib_sizes: None,
            n_samples,
            replace,
        }
    }

    pub fn from_config(config: &CcmConfig) -> Self {
        Self {
            embedding_dim: config.embedding_dim,
            lib_sizes: config.lib_sizes.clone(),
            n_samples: config.n_samples,
            replace: config.replace,
        }
    }

    pub fn with_lib_sizes(mut self, lib_sizes: Vec<usize>) -> Self {
        self.lib_sizes = Some(lib_sizes);
        self
    }

    /// Library sizes to test for an embedding of `n` vectors.
    ///
    /// An explicit `lib_size` must fit in `2..=n`. Configured sizes outside that
    /// range are skipped. Without either, sizes run from E+1 below `n` in about
    /// twenty steps.
    pub fn ladder(&self, lib_size: Option<usize>, n: usize) -> Result<Vec<usize>> {
        if let Some(size) = lib_size {
            if size < 2 || size > n {
                return Err(CcmError::InvalidLibrarySize {
                    requested: size,
                    available: n,
                });
            }
            return Ok(vec![size]);
        }
        if let Some(sizes) = &self.lib_sizes {
            return Ok(sizes.iter().copied().filter(|&l| (2..=n).contains(&l)).collect());
        }
        let step = (n / 20).max(1);
        Ok((self.embedding_dim + 1..n).step_by(step).collect())
    }

    /// `size` positions from `0..n`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, n: usize, size: usize) -> Vec<usize> {
        if self.replace {
            (0..size).map(|_| rng.gen_range(0..n)).collect()
        } else {
            index::sample(rng, n, size.min(n)).into_vec()
        }
    }

    /// Every draw for every ladder size, taken in ladder order from `rng`.
    pub fn plan<R: Rng + ?Sized>(&self, ladder: &[usize], n: usize, rng: &mut R) -> Vec<LibraryDraw> {
        ladder
            .iter()
            .flat_map(|&size| std::iter::repeat(size).take(self.n_samples))
            .map(|size| LibraryDraw {
                size,
                indices: self.draw(rng, n, size),
            })
            .collect()
    }
}
