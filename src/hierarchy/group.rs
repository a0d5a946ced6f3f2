use ahash::AHashMap;

use crate::boundary::BoundaryFeature;

use super::key::{normalize_key, UNMATCHED_KEY};

/// Partition of one level's features into groups keyed by the normalized
/// name of their parent. Insertion order within a group is preserved; it is
/// the enumeration order the matcher scans in, nothing more.
#[derive(Debug, Default)]
pub struct GroupTable {
    groups: AHashMap<String, Vec<usize>>,
}

impl GroupTable {
    /// Group `features` by `label(idx)`. Features whose selector yields no
    /// usable label fall out of every group; they stay reachable through the
    /// spatial-index path only.
    pub fn build<'a, F>(features: &'a [BoundaryFeature], label: F) -> Self
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let mut groups: AHashMap<String, Vec<usize>> = AHashMap::new();
        for idx in 0..features.len() {
            let key = normalize_key(label(idx));
            if key == UNMATCHED_KEY {
                continue;
            }
            groups.entry(key).or_default().push(idx);
        }
        Self { groups }
    }

    /// Members of the group for `key`, in insertion order.
    pub fn get(&self, key: &str) -> Option<&[usize]> {
        if key == UNMATCHED_KEY {
            return None;
        }
        self.groups.get(key).map(Vec::as_slice)
    }

    #[inline] pub fn len(&self) -> usize { self.groups.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.groups.is_empty() }
}
