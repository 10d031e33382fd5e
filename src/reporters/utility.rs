use std::collections::BTreeMap;

use crate::reporters::types::ValueCount;

fn tally<T: Ord>(values: impl IntoIterator<Item = T>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value and its count. Returns `None` for empty input.
///
/// Ties go to the smallest value in ascending order.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<ValueCount<T>> {
    let mut best: Option<ValueCount<T>> = None;
    for (value, count) in tally(values) {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(ValueCount::new(value, count));
        }
    }
    best
}

/// Every distinct value with its count, most frequent first.
///
/// Equal counts are ordered by value ascending.
pub fn value_counts<T: Ord>(values: impl IntoIterator<Item = T>) -> Vec<ValueCount<T>> {
    let mut counts: Vec<_> = tally(values)
        .into_iter()
        .map(|(value, count)| ValueCount::new(value, count))
        .collect();
    // Stable sort keeps the ascending value order within equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Arithmetic mean. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
