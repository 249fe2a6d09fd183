use serde::{Deserialize, Serialize};

/// Guards the cosine denominator against zero-length vectors.
pub const COSINE_EPSILON: f64 = 1e-10;

/// A dense feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    data: Vec<f64>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Arithmetic mean of a non-empty set of equal-length vectors.
    ///
    /// Returns `None` for an empty set or mismatched dimensions.
    pub fn mean_of<'a, I>(vectors: I) -> Option<FeatureVector>
    where
        I: IntoIterator<Item = &'a FeatureVector>,
    {
        let mut iter = vectors.into_iter();
        let first = iter.next()?;
        let mut sum = first.data.clone();
        let mut count = 1usize;

        for v in iter {
            if v.dim() != sum.len() {
                return None;
            }
            for (acc, x) in sum.iter_mut().zip(v.data.iter()) {
                *acc += x;
            }
            count += 1;
        }

        let n = count as f64;
        for x in &mut sum {
            *x /= n;
        }
        Some(FeatureVector::new(sum))
    }
}

/// Dot product over the common prefix of two slices
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Euclidean distance; `f64::INFINITY` when dimensions differ
#[inline]
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// `dot(a, b) / (|a| * |b| + COSINE_EPSILON)`; 0.0 when dimensions differ
#[inline]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    dot(a, b) / (norm(a) * norm(b) + COSINE_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine() {
        assert!((cosine(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let zero = [0.0; 3];
        assert_eq!(cosine(&zero, &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine(&zero, &zero), 0.0);
    }

    #[test]
    fn test_l2_distance() {
        assert!((l2_distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_dimensions() {
        assert_eq!(l2_distance(&[1.0], &[1.0, 2.0]), f64::INFINITY);
        assert_eq!(cosine(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_mean_of() {
        let a = FeatureVector::new(vec![1.0, 2.0]);
        let b = FeatureVector::new(vec![3.0, 6.0]);
        let mean = FeatureVector::mean_of([&a, &b]).unwrap();
        assert_eq!(mean.as_slice(), &[2.0, 4.0]);

        assert!(FeatureVector::mean_of(std::iter::empty::<&FeatureVector>()).is_none());

        let c = FeatureVector::new(vec![1.0]);
        assert!(FeatureVector::mean_of([&a, &c]).is_none());
    }
}
