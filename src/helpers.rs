use std::cmp::Ordering;

/// Helper for safe float comparison with NaN handling
pub fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Index of the maximum value, keeping the first index on ties
pub fn argmax_first(values: &[u64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Index of the minimum value, keeping the first index on ties
pub fn argmin_first(values: &[u64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate() {
        if value < values[best] {
            best = i;
        }
    }
    best
}
