// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Deletion: walk both tries to the leaf holding `payload`, remove it from
//! the payload bag, then prune upward only as far as nodes actually empty
//! out.
//!
//! Every failure mode here — key not found, payload not found in an
//! otherwise-live leaf — is tolerated rather than surfaced as an `Err`.
//! The caller's view of what's "in" the index can legitimately lag a
//! concurrent mutation in systems built on top of this one, so a missing
//! key on delete is logged and treated as a no-op rather than a bug.

use crate::arena::NodeIdx;
use crate::key::{SpaceKey, TimeKey};

use super::Index;

impl<D: PartialEq> Index<D> {
    /// Removes one occurrence of `payload` stored under `(time, space)`.
    ///
    /// If the key or the payload isn't present, logs a warning and
    /// returns without modifying the index.
    pub fn delete(&mut self, time: TimeKey, space: SpaceKey, payload: &D) {
        let Some((temporal_parents, temp_leaf_idx)) = self.walk_temporal_path(time) else {
            log::warn!("delete: no temporal path for encoded_time={:?}; skipping", time);
            return;
        };

        let Some((lead3, spatial_parents, spat_leaf_idx)) = self.walk_spatial_path(temp_leaf_idx, space) else {
            log::warn!("delete: no spatial path for s2_id={:?}; skipping", space);
            return;
        };

        let bag = &mut self.spat_leaf.get_mut(spat_leaf_idx).payloads;
        let Some(pos) = bag.iter().position(|p| p == payload) else {
            log::warn!("delete: payload not found in leaf bag; skipping");
            return;
        };
        bag.remove(pos);

        if !self.spat_leaf.get(spat_leaf_idx).payloads.is_empty() {
            return;
        }

        self.disable_spat_leaf(spat_leaf_idx);

        if !self.prune_spatial_internals(&spatial_parents, space) {
            return; // some ancestor still has other children; stop here
        }

        self.temp_leaf.get_mut(temp_leaf_idx).child[lead3 as usize] = None;
        if !self.temp_leaf.get(temp_leaf_idx).has_no_children() {
            return;
        }

        self.disable_temp_leaf(temp_leaf_idx);
        self.prune_temporal_internals(&temporal_parents, time);
    }

    /// Path of parent nodes for `time`, `parents[d - 1]` being the node at
    /// depth `d - 1` for `d` in `1..=lt`. `None` if the key isn't present.
    fn walk_temporal_path(&self, time: TimeKey) -> Option<(Vec<NodeIdx>, NodeIdx)> {
        let lt = self.config.time_bits();
        let mut parents = Vec::with_capacity(lt as usize);
        let mut u = super::ROOT_IDX;
        for d in 1..=lt {
            parents.push(u);
            let bit = time.bit(d, lt);
            u = self.temp_internal.get(u).child[bit as usize]?;
        }
        Some((parents, u))
    }

    /// Path of parent nodes for `space` under the subtrie rooted at
    /// `temp_leaf_idx`. `None` if the key isn't present.
    fn walk_spatial_path(&self, temp_leaf_idx: NodeIdx, space: SpaceKey) -> Option<(u8, Vec<NodeIdx>, NodeIdx)> {
        let ls = self.config.space_bits();
        let s2_level = u32::from(self.config.s2_level);
        let lead3 = space.lead3(ls);

        let mut u = self.temp_leaf.get(temp_leaf_idx).child[lead3 as usize]?;
        let mut parents = Vec::with_capacity(s2_level as usize);
        for d in 1..=s2_level {
            parents.push(u);
            let bit = space.group2(d, ls);
            u = self.spat_internal.get(u).child[bit as usize]?;
        }
        Some((lead3, parents, u))
    }

    /// Clears the child slot leading to the now-empty spatial leaf, then
    /// walks back up clearing and disabling internal nodes that are left
    /// with no children. Returns `true` if pruning reached all the way up
    /// to the temporal leaf's fan-out (i.e. the whole subtrie is gone).
    fn prune_spatial_internals(&mut self, parents: &[NodeIdx], space: SpaceKey) -> bool {
        let s2_level = u32::from(self.config.s2_level);
        let ls = self.config.space_bits();

        for d in (1..=s2_level).rev() {
            let parent = parents[(d - 1) as usize];
            let bit = space.group2(d, ls);
            self.spat_internal.get_mut(parent).child[bit as usize] = None;
            if !self.spat_internal.get(parent).has_no_children() {
                return false;
            }
            self.spat_internal.disable_one();
        }
        true
    }

    fn prune_temporal_internals(&mut self, parents: &[NodeIdx], time: TimeKey) {
        let lt = self.config.time_bits();
        for d in (1..=lt).rev() {
            let parent = parents[(d - 1) as usize];
            let bit = time.bit(d, lt);
            self.temp_internal.get_mut(parent).child[bit as usize] = None;
            if !self.temp_internal.get(parent).has_no_children() {
                return;
            }
            self.temp_internal.disable_one();
        }
    }

    fn disable_spat_leaf(&mut self, idx: NodeIdx) {
        let leaf = self.spat_leaf.get(idx);
        let (prev, next) = (leaf.prev, leaf.next);
        self.spat_leaf.get_mut(idx).prev = None;
        self.spat_leaf.get_mut(idx).next = None;

        match prev {
            Some(p) => self.spat_leaf.get_mut(p).next = next,
            None => self.spat_head = next,
        }
        match next {
            Some(n) => self.spat_leaf.get_mut(n).prev = prev,
            None => self.spat_tail = prev,
        }
        if self.last_live_spat_leaf == Some(idx) {
            self.last_live_spat_leaf = prev.or(next).or(self.spat_head);
        }
        self.spat_leaf.disable_one();
    }

    fn disable_temp_leaf(&mut self, idx: NodeIdx) {
        let leaf = self.temp_leaf.get(idx);
        let (prev, next) = (leaf.prev, leaf.next);
        self.temp_leaf.get_mut(idx).prev = None;
        self.temp_leaf.get_mut(idx).next = None;

        match prev {
            Some(p) => self.temp_leaf.get_mut(p).next = next,
            None => self.temp_head = next,
        }
        match next {
            Some(n) => self.temp_leaf.get_mut(n).prev = prev,
            None => self.temp_tail = prev,
        }
        self.temp_leaf.disable_one();
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, TemporalResolution};
    use crate::index::Index;

    fn test_index() -> Index<u32> {
        Index::new(Config::new(10, TemporalResolution::Year).unwrap())
    }

    #[test]
    fn delete_removes_single_payload_and_leaf() {
        let mut idx = test_index();
        let t = idx.encode_time(&[2001]).unwrap();
        let s = idx.encode_space(23.18, 72.63);
        idx.insert(t, s, 7u32);
        assert_eq!(idx.live_leaf_count(), 1);

        idx.delete(t, s, &7u32);
        assert_eq!(idx.live_leaf_count(), 0);
        assert_eq!(idx.data_count(), 0);
        assert_eq!(idx.live_internal_count(), 1); // back down to just the root
    }

    #[test]
    fn delete_keeps_leaf_alive_while_other_payloads_remain() {
        let mut idx = test_index();
        let t = idx.encode_time(&[2001]).unwrap();
        let s = idx.encode_space(23.18, 72.63);
        idx.insert(t, s, 1u32);
        idx.insert(t, s, 2u32);

        idx.delete(t, s, &1u32);
        assert_eq!(idx.live_leaf_count(), 1);
        assert_eq!(idx.data_count(), 1);
    }

    #[test]
    fn delete_unknown_key_is_a_no_op() {
        let mut idx = test_index();
        let t = idx.encode_time(&[2001]).unwrap();
        let s = idx.encode_space(23.18, 72.63);
        idx.insert(t, s, 1u32);

        let other_t = idx.encode_time(&[2002]).unwrap();
        idx.delete(other_t, s, &1u32);
        assert_eq!(idx.live_leaf_count(), 1);
        assert_eq!(idx.data_count(), 1);
    }

    #[test]
    fn insert_delete_reinsert_preserves_list_integrity() {
        let mut idx = test_index();
        let years = [2000, 2001, 2002, 2003, 2004];
        for &y in &years {
            let t = idx.encode_time(&[y]).unwrap();
            let s = idx.encode_space(10.0 + f64::from(y) * 0.1, 72.0);
            idx.insert(t, s, y);
        }

        let mid_t = idx.encode_time(&[2002]).unwrap();
        let mid_s = idx.encode_space(10.0 + 2002.0 * 0.1, 72.0);
        idx.delete(mid_t, mid_s, &2002u32);
        assert_eq!(idx.live_leaf_count(), 4);

        idx.insert(mid_t, mid_s, 2002u32);
        assert_eq!(idx.live_leaf_count(), 5);

        let mut cur = idx.temp_head;
        let mut seen = Vec::new();
        while let Some(c) = cur {
            let leaf = idx.temp_leaf.get(c);
            seen.push(leaf.encoded_time.0);
            cur = leaf.next;
        }
        let mut expected: Vec<u32> = years.iter().map(|&y| y - 2000).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }
}
