//! Data-parallel collection primitives.
//!
//! Each job is written against these few operations instead of a specific
//! engine. With the `parallel` feature the work is spread over the rayon
//! pool; without it the same code runs on the calling thread. Both
//! variants return identical results: maps are order-preserving and keyed
//! reductions are commutative.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Redistribute `(key, value)` records so every key owns its values.
///
/// Keys come back in ascending order; values keep their input order.
pub fn group_by_key<K, V, I>(records: I) -> BTreeMap<K, Vec<V>>
where
    K: Ord,
    I: IntoIterator<Item = (K, V)>,
{
    let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for (key, value) in records {
        groups.entry(key).or_default().push(value);
    }
    groups
}

/// Count the keys emitted for every input element.
///
/// `emit` hands each key to the supplied sink, which lets it stream keys
/// borrowed from the input without collecting them first. Workers fold into
/// private maps which are merged pairwise afterwards, so no counter is
/// shared while counting.
pub fn count_by_key<T, K, F>(inputs: &[T], emit: F) -> HashMap<K, u64>
where
    T: Sync,
    K: Eq + Hash + Send,
    F: Fn(&T, &mut dyn FnMut(K)) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let counts = inputs
        .par_iter()
        .fold(HashMap::new, |mut acc, input| {
            emit(input, &mut |key| *acc.entry(key).or_insert(0) += 1);
            acc
        })
        .reduce(HashMap::new, merge_counts);

    #[cfg(not(feature = "parallel"))]
    let counts = inputs.iter().fold(HashMap::new(), |mut acc, input| {
        emit(input, &mut |key| *acc.entry(key).or_insert(0) += 1);
        acc
    });

    counts
}

#[cfg(feature = "parallel")]
fn merge_counts<K: Eq + Hash>(
    mut left: HashMap<K, u64>,
    right: HashMap<K, u64>,
) -> HashMap<K, u64> {
    if left.len() < right.len() {
        return merge_counts(right, left);
    }
    for (key, count) in right {
        *left.entry(key).or_insert(0) += count;
    }
    left
}

/// Apply `f` to every input and concatenate the outputs in input order.
pub fn flat_map<T, R, F, I>(inputs: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> I + Sync + Send,
    I: IntoIterator<Item = R>,
{
    #[cfg(feature = "parallel")]
    let out = inputs
        .par_iter()
        .flat_map_iter(|input| f(input))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let out = inputs.iter().flat_map(|input| f(input)).collect();

    out
}

/// Apply a fallible `f` to every input, stopping at the first error.
///
/// # Errors
///
/// Returns an error produced by `f`. Under the `parallel` feature which
/// error wins is unspecified when several inputs fail.
pub fn try_map<T, R, E, F>(inputs: &[T], f: F) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    let out = inputs.par_iter().map(|input| f(input)).collect();

    #[cfg(not(feature = "parallel"))]
    let out = inputs.iter().map(|input| f(input)).collect();

    out
}
