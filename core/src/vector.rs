use crate::TermId;
use std::collections::BTreeMap;

/// Sparse weight vector over the index's term dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    weights: BTreeMap<TermId, f64>,
}

impl SparseVector {
    pub fn new() -> Self { Self::default() }

    /// Overwrite the weight at `dim`.
    pub fn set(&mut self, dim: TermId, weight: f64) {
        self.weights.insert(dim, weight);
    }

    /// Weight at `dim`, 0 when unset.
    pub fn get(&self, dim: TermId) -> f64 {
        self.weights.get(&dim).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, dim: TermId) -> bool { self.weights.contains_key(&dim) }

    /// Number of explicitly stored dimensions.
    pub fn nnz(&self) -> usize { self.weights.len() }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, f64)> + '_ {
        self.weights.iter().map(|(&d, &w)| (d, w))
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool { self.weights.values().all(|&w| w == 0.0) }

    /// Scale to unit L2 norm. The zero vector is left as is.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for w in self.weights.values_mut() {
                *w /= norm;
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.nnz() <= other.nnz() { (self, other) } else { (other, self) };
        small.iter().map(|(d, w)| w * large.get(d)).sum()
    }
}

impl FromIterator<(TermId, f64)> for SparseVector {
    fn from_iter<T: IntoIterator<Item = (TermId, f64)>>(iter: T) -> Self {
        Self { weights: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_to_unit_length() {
        let v: SparseVector = [(0, 3.0), (4, 4.0)].into_iter().collect();
        let v = v.normalized();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v.get(0) - 0.6).abs() < 1e-12);
        assert!((v.get(4) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_is_not_divided() {
        let mut v: SparseVector = [(1, 0.0), (2, 0.0)].into_iter().collect();
        v.normalize();
        assert!(v.is_zero());
        assert_eq!(v.norm(), 0.0);
        assert!(v.iter().all(|(_, w)| w == 0.0 && !w.is_nan()));
    }

    #[test]
    fn dot_only_counts_shared_dimensions() {
        let a: SparseVector = [(0, 1.0), (1, 2.0)].into_iter().collect();
        let b: SparseVector = [(1, 3.0), (5, 7.0)].into_iter().collect();
        assert_eq!(a.dot(&b), 6.0);
        assert_eq!(b.dot(&a), 6.0);
        assert_eq!(a.get(5), 0.0);
    }
}
