//! Log-likelihood-ratio association score.
//!
//! Dunning's G² statistic on a 2×2 contingency table, computed through the
//! unnormalized-entropy formulation, then squashed into `[0, 1)`:
//!
//! ```text
//! G² = 2 · (H(rows) + H(cols) − H(matrix))
//! score = 1 − 1 / (1 + G²)
//! ```
//!
//! # Example
//!
//! ```
//! use llr_similarity::llr::{log_likelihood, log_likelihood_ratio};
//!
//! let raw = log_likelihood(1, 0, 0, 1);
//! assert!((raw - 2.772588722239781).abs() < 1e-12);
//!
//! let score = log_likelihood_ratio(1, 0, 0, 1);
//! assert!(score > 0.0 && score < 1.0);
//! ```
//!
//! # References
//!
//! Dunning, T. (1993). "Accurate Methods for the Statistics of Surprise and
//! Coincidence". Computational Linguistics 19(1).

/// `x · ln(x)`, with the limit value 0 for `x <= 0`.
#[inline]
pub fn x_log_x(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else {
        x * x.ln()
    }
}

/// Unnormalized Shannon entropy of two counts.
#[inline]
pub fn entropy2(a: f64, b: f64) -> f64 {
    x_log_x(a + b) - x_log_x(a) - x_log_x(b)
}

/// Unnormalized Shannon entropy of four counts.
#[inline]
pub fn entropy4(a: f64, b: f64, c: f64, d: f64) -> f64 {
    x_log_x(a + b + c + d) - x_log_x(a) - x_log_x(b) - x_log_x(c) - x_log_x(d)
}

/// Raw G² statistic for the table `[[k11, k12], [k21, k22]]`.
///
/// Never negative: rounding can push the matrix entropy slightly above the
/// row and column entropies for independent tables, which is clamped to 0.
#[allow(clippy::similar_names)]
pub fn log_likelihood(k11: u64, k12: u64, k21: u64, k22: u64) -> f64 {
    let (k11, k12, k21, k22) = (k11 as f64, k12 as f64, k21 as f64, k22 as f64);

    let row_entropy = entropy2(k11 + k12, k21 + k22);
    let column_entropy = entropy2(k11 + k21, k12 + k22);
    let matrix_entropy = entropy4(k11, k12, k21, k22);

    if row_entropy + column_entropy < matrix_entropy {
        return 0.0;
    }
    2.0 * (row_entropy + column_entropy - matrix_entropy)
}

/// Normalized association score in `[0, 1)`.
///
/// Monotonic in [`log_likelihood`]; 0 for a statistically independent
/// table, approaching 1 for strongly associated pairs.
pub fn log_likelihood_ratio(k11: u64, k12: u64, k21: u64, k22: u64) -> f64 {
    normalize(log_likelihood(k11, k12, k21, k22))
}

/// Map a raw G² value onto `[0, 1)`.
#[inline]
pub fn normalize(raw: f64) -> f64 {
    1.0 - 1.0 / (1.0 + raw)
}

#[cfg(test)]
#[path = "llr_tests.rs"]
mod tests;
