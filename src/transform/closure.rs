//! Closure operator for compositional data.
//!
//! Closing a vector divides each entry by the vector's sum, so the result
//! sums to one while every within-vector ratio is unchanged. This is the
//! canonical representative of a composition; all log-ratio transforms in
//! this crate close their inverse output before returning it.

/// Close a vector: divide each entry by the sum.
///
/// A zero (or non-finite) sum produces non-finite output. That is
/// deliberate: a degenerate group must stay visible downstream instead of
/// silently becoming zeros. Callers are expected to filter degenerate groups
/// beforehand (see [`crate::zero`]).
pub fn close(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    values.iter().map(|v| v / total).collect()
}

/// Close a column per group of row indices, order-preserving.
///
/// `groups` partitions (a subset of) the indices of `values`; each group is
/// closed independently and written back into the output at its original
/// positions. Indices not covered by any group keep their input value.
pub fn close_grouped(values: &[f64], groups: &[Vec<usize>]) -> Vec<f64> {
    let mut out = values.to_vec();
    for group in groups {
        let total: f64 = group.iter().map(|&idx| values[idx]).sum();
        for &idx in group {
            out[idx] = values[idx] / total;
        }
    }
    out
}
