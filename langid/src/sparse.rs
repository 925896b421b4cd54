//! Sparse feature vectors.

/// A sparse vector of `f64` weights.
///
/// Entries are kept sorted by index and zero weights are never stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Creates an all-zero vector.
    ///
    /// # Arguments
    ///
    /// * `dim` - Number of dimensions.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: vec![],
        }
    }

    /// Creates a vector from `(index, weight)` pairs.
    ///
    /// Pairs may come in any order. Weights sharing an index are added and zero weights are
    /// dropped.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of `0..dim`.
    pub fn from_pairs<I>(dim: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut entries: Vec<(u32, f64)> = pairs.into_iter().collect();
        entries.sort_by_key(|&(idx, _)| idx);
        let mut merged: Vec<(u32, f64)> = Vec::with_capacity(entries.len());
        for (idx, w) in entries {
            assert!((idx as usize) < dim, "index {idx} out of range for dim {dim}");
            match merged.last_mut() {
                Some((last, acc)) if *last == idx => *acc += w,
                _ => merged.push((idx, w)),
            }
        }
        merged.retain(|&(_, w)| w != 0.0);
        Self {
            dim,
            entries: merged,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the non-zero entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|&(idx, w)| (idx as usize, w))
    }

    /// Gets the weight at `idx`, zero if absent.
    pub fn get(&self, idx: usize) -> f64 {
        let Ok(idx) = u32::try_from(idx) else {
            return 0.0;
        };
        self.entries
            .binary_search_by_key(&idx, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Sum of all entries.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Scales the vector to unit L2 norm. A zero vector is left untouched.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    /// Multiplies every entry by the weight stored for its index in `weights`.
    pub(crate) fn scale_by(&mut self, weights: &[f64]) {
        for (idx, w) in &mut self.entries {
            *w *= weights[*idx as usize];
        }
        self.entries.retain(|&(_, w)| w != 0.0);
    }

    /// Dot product of two sparse vectors.
    pub fn dot(&self, other: &Self) -> f64 {
        let mut a = self.entries.iter().peekable();
        let mut b = other.entries.iter().peekable();
        let mut acc = 0.0;
        while let (Some(&&(i, x)), Some(&&(j, y))) = (a.peek(), b.peek()) {
            match i.cmp(&j) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => {
                    acc += x * y;
                    a.next();
                    b.next();
                }
            }
        }
        acc
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for &(idx, w) in &self.entries {
            dense[idx as usize] = w;
        }
        dense
    }
}
