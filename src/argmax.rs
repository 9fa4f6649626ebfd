// src/argmax.rs
//
// Max / argmax over action rows of the Q-table.
//
// Tie-breaking matters for reproducibility: when several entries attain the
// maximum, the lowest index wins. The greedy policy, the derived optimal
// actions and the test expectations all rely on this.

/// Maximum of a non-empty slice.
///
/// `NEG_INFINITY` entries (inadmissible actions) participate normally and
/// lose to any finite value.
pub fn max_value(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty(), "max_value over empty slice");
    let mut best = f64::NEG_INFINITY;
    for &v in values {
        if v > best {
            best = v;
        }
    }
    best
}

/// Index of the first element attaining the maximum of a non-empty slice.
pub fn argmax(values: &[f64]) -> usize {
    debug_assert!(!values.is_empty(), "argmax over empty slice");
    let mut best_index = 0;
    let mut best = values[0];
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > best {
            best = v;
            best_index = i;
        }
    }
    best_index
}

/// Maximum and its first attaining index, in one pass.
pub fn max_and_argmax(values: &[f64]) -> (f64, usize) {
    let index = argmax(values);
    (values[index], index)
}
