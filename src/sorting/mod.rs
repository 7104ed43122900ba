//! Sort preference subsystem: preference store and controller

pub mod controller;
pub mod preference_store;

pub use controller::{SortingController, SortingControllerBuilder, SortingState};
pub use preference_store::{PreferenceStore, SyncState};

use crate::core::{FieldSource, SortConfig, compare_keys};
use std::cmp::Ordering;

/// Stable-sorted copy of `items` under `config`
///
/// Each record's key is resolved once. Elements the comparator considers
/// equal keep their input order. The input is left untouched.
///
/// Mixed-kind columns do not form a total order, which `slice::sort_by` is
/// allowed to reject with a panic. A bottom-up merge sort only ever asks
/// "is the right element strictly smaller", so any answer yields a
/// permutation of the input.
pub fn sort_records<T>(items: &[T], config: &SortConfig) -> Vec<T>
where
    T: FieldSource + Clone,
{
    let keys: Vec<_> = items
        .iter()
        .map(|item| item.field_value(&config.field))
        .collect();

    merge_order(keys.len(), |a, b| {
        compare_keys(keys[a].as_ref(), keys[b].as_ref(), config.direction)
    })
    .into_iter()
    .map(|i| items[i].clone())
    .collect()
}

/// Stable ordering of `0..len` under `compare`
fn merge_order<F>(len: usize, mut compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut order: Vec<usize> = (0..len).collect();
    let mut merged = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        merged.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            while i < mid && j < end {
                if compare(order[j], order[i]) == Ordering::Less {
                    merged.push(order[j]);
                    j += 1;
                } else {
                    merged.push(order[i]);
                    i += 1;
                }
            }
            merged.extend_from_slice(&order[i..mid]);
            merged.extend_from_slice(&order[j..end]);
            start = end;
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }

    order
}
