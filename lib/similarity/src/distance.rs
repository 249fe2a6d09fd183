//! Vector-to-vector scores used for ranking
//!
//! Both functions combine the same three terms: the epsilon-guarded cosine,
//! the Euclidean distance and the angle `acos(cosine)`. Every term is
//! symmetric, so both scores are symmetric in their arguments.
//!
//! Inputs must have equal length. Mismatched inputs get the worst possible
//! score (`f64::INFINITY` distance, `0.0` similarity).

use tripsim_core::vector::{cosine, l2_distance};

/// Angle between two vectors in radians, from an already computed cosine
#[inline]
fn angle(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos()
}

/// Triangle-area based dissimilarity: `(1 - cos) * euclid * theta`.
///
/// Lower is more similar and 0 is the minimum. Collinear vectors pointing the
/// same way have `theta == 0` and score 0 whatever their magnitudes, so
/// `ts_ss([1, 0], [10, 0])` is (numerically) 0.
///
/// # Returns
/// Distance in `[0, inf)`
pub fn ts_ss(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    let cos = cosine(a, b);
    let euclid = l2_distance(a, b);
    (1.0 - cos) * euclid * angle(cos)
}

/// Composite similarity: `(1 + cos) / (1 + theta) / (1 + euclid)`.
///
/// # Returns
/// Similarity in `(0, 2]`, higher is more similar
pub fn tsss_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let cos = cosine(a, b);
    let euclid = l2_distance(a, b);
    (1.0 + cos) * (1.0 / (1.0 + angle(cos))) * (1.0 / (1.0 + euclid))
}
