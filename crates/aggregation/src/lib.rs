//! Grouping and summation primitives shared by every analysis.
//!
//! All functions emit groups in FIRST-SEEN key order and accumulate in input
//! order, so identical inputs always produce byte-identical outputs. Keys
//! that never occur are absent from the output; callers that need a known
//! key universe (the incentive evaluator's (rep, product) grid) enumerate it
//! themselves and look results up with a zero default.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;

/// Sums one Decimal projection per distinct key.
pub fn group_sum<R, K, KF, VF>(records: &[R], mut key: KF, mut value: VF) -> Vec<(K, Decimal)>
where
    K: Eq + Hash + Clone,
    KF: FnMut(&R) -> K,
    VF: FnMut(&R) -> Decimal,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Decimal)> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&slot) => groups[slot].1 += value(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, value(record)));
            }
        }
    }

    groups
}

/// Sums `N` Decimal projections at once per distinct key.
pub fn group_sum_many<R, K, KF, VF, const N: usize>(
    records: &[R],
    mut key: KF,
    mut values: VF,
) -> Vec<(K, [Decimal; N])>
where
    K: Eq + Hash + Clone,
    KF: FnMut(&R) -> K,
    VF: FnMut(&R) -> [Decimal; N],
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, [Decimal; N])> = Vec::new();

    for record in records {
        let k = key(record);
        let vals = values(record);
        match index.get(&k) {
            Some(&slot) => {
                for (acc, v) in groups[slot].1.iter_mut().zip(vals) {
                    *acc += v;
                }
            }
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vals));
            }
        }
    }

    groups
}

/// Counts records per distinct key.
pub fn group_count<R, K, KF>(records: &[R], mut key: KF) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    KF: FnMut(&R) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, usize)> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, 1));
            }
        }
    }

    groups
}

/// Sums a single projection over all records.
pub fn sum_by<R, VF>(records: &[R], value: VF) -> Decimal
where
    VF: Fn(&R) -> Decimal,
{
    records.iter().map(value).sum()
}
