//! Ring neighborhood: each particle only sees itself and the particles directly
//! before and after it in index order, with wraparound.

/// Indices of the neighborhood of particle `i` in a ring of `n`, in tie-break order:
/// left neighbor, self, right neighbor. `None` when `i` is not a particle of the ring.
pub fn ring_neighbors(i: usize, n: usize) -> Option<[usize; 3]> {
    (i < n).then(|| [(i + n - 1) % n, i, (i + 1) % n])
}

/// Strict "better than" for objective values. NaN ranks worse than every number, so a
/// NaN best is always replaced and never replaces anything.
pub fn is_better(candidate: f64, incumbent: f64) -> bool {
    candidate < incumbent || (incumbent.is_nan() && !candidate.is_nan())
}

/// Index of the particle holding the minimal value in the neighborhood of `i`. Candidates
/// are scanned in [`ring_neighbors`] order and only a strictly better value replaces the
/// current choice, so the first minimal candidate wins ties.
pub(crate) fn neighborhood_best(i: usize, f_values: &[f64]) -> Option<usize> {
    let [left, this, right] = ring_neighbors(i, f_values.len())?;
    Some([this, right].into_iter().fold(left, |best, idx| {
        if is_better(f_values[idx], f_values[best]) {
            idx
        } else {
            best
        }
    }))
}

/// For every particle, the index of the particle holding its local best position. Empty for
/// an empty slice.
pub fn local_best_indices(f_values: &[f64]) -> Vec<usize> {
    (0..f_values.len())
        .filter_map(|i| neighborhood_best(i, f_values))
        .collect()
}
