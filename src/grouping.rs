//! Order-preserving partition of items by key.

use std::collections::HashMap;
use std::hash::Hash;

/// Partition `items` into groups sharing the same key.
///
/// Groups are returned in the order their key is first seen, and members keep
/// their input order inside each group. No group is ever empty.
///
/// ```rust
/// use fuelprice_sdk::grouping::group_by;
/// let groups = group_by(vec![3, 4, 5, 6, 7], |n| n % 2);
/// assert_eq!(groups, vec![(1, vec![3, 5, 7]), (0, vec![4, 6])]);
/// ```
pub fn group_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let k = key(&item);
        match slots.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}
