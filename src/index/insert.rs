// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Insertion: descend both tries, extending whichever prefix is missing,
//! then splice the new leaf into its linked-list ordering.
//!
//! The splice step is the one place this module diverges structurally
//! from a textbook trie: finding a leaf's ordering neighbours by walking
//! back up to the nearest point where the path diverged from an existing
//! key, then descending the sibling subtree to its extreme leaf, avoids
//! ever re-walking the whole list on insert.

use crate::arena::NodeIdx;
use crate::key::{SpaceKey, TimeKey};
use crate::node::{SpatInternal, SpatLeaf, TempInternal, TempLeaf};

use super::{Index, ROOT_IDX};

/// Where the temporal descent first found a missing child.
struct TemporalDivergence {
    depth: u32,
    bit: u8,
    parent: NodeIdx,
}

/// Where the spatial descent first found a missing child.
enum SpatialDivergence {
    /// Diverged at the temporal leaf's 8-way fan-out (depth 0).
    Lead3 { temp_leaf_idx: NodeIdx, lead3: u8 },
    /// Diverged within the 2-bit quad groups, at 1-indexed `depth`.
    Group2 { depth: u32, bit: u8, parent: NodeIdx },
}

impl<D> Index<D> {
    /// Inserts `payload` under `(time, space)`, creating whatever trie
    /// nodes and leaves are missing along the way.
    pub fn insert(&mut self, time: TimeKey, space: SpaceKey, payload: D) {
        let temp_leaf_idx = self.insert_temporal(time);
        let spat_leaf_idx = self.insert_spatial(temp_leaf_idx, time, space);
        self.spat_leaf.get_mut(spat_leaf_idx).payloads.push(payload);
    }

    fn insert_temporal(&mut self, time: TimeKey) -> NodeIdx {
        match self.descend_temporal(time) {
            Ok(leaf_idx) => leaf_idx,
            Err(div) => {
                let leaf_idx = self.extend_temporal(time, div.depth, div.parent);
                let (prev, next) = self.temporal_link_targets(leaf_idx, &div);
                self.link_temp(leaf_idx, prev, next);
                leaf_idx
            }
        }
    }

    fn insert_spatial(&mut self, temp_leaf_idx: NodeIdx, time: TimeKey, space: SpaceKey) -> NodeIdx {
        match self.descend_spatial(temp_leaf_idx, space) {
            Ok(leaf_idx) => leaf_idx,
            Err(div) => {
                let leaf_idx = match &div {
                    SpatialDivergence::Lead3 { temp_leaf_idx, lead3 } => {
                        let root = self.spat_internal.push(SpatInternal::default());
                        self.temp_leaf.get_mut(*temp_leaf_idx).child[*lead3 as usize] = Some(root);
                        self.extend_spatial_2bit_groups(root, 1, time, space)
                    }
                    SpatialDivergence::Group2 { depth, bit, parent } => {
                        let _ = bit; // recomputed from `space` inside the extend loop
                        self.extend_spatial_2bit_groups(*parent, *depth, time, space)
                    }
                };
                let (prev, next) = self.spatial_link_targets(leaf_idx, &div);
                self.link_spat(leaf_idx, prev, next);
                leaf_idx
            }
        }
    }

    /// Walks the temporal trie to the leaf for `time`. `Err` carries the
    /// first missing child slot along the path.
    fn descend_temporal(&self, time: TimeKey) -> Result<NodeIdx, TemporalDivergence> {
        let lt = self.config.time_bits();
        let mut u = ROOT_IDX;
        for d in 1..=lt {
            let bit = time.bit(d, lt);
            match self.temp_internal.get(u).child[bit as usize] {
                Some(next) if d == lt => return Ok(next),
                Some(next) => u = next,
                None => return Err(TemporalDivergence { depth: d, bit, parent: u }),
            }
        }
        unreachable!("loop always returns by d == lt")
    }

    /// Walks the spatial trie rooted at `temp_leaf_idx` to the leaf for
    /// `space`. `Err` carries where the path first went missing.
    fn descend_spatial(&self, temp_leaf_idx: NodeIdx, space: SpaceKey) -> Result<NodeIdx, SpatialDivergence> {
        let ls = self.config.space_bits();
        let s2_level = u32::from(self.config.s2_level);
        let lead3 = space.lead3(ls);

        let mut u = match self.temp_leaf.get(temp_leaf_idx).child[lead3 as usize] {
            Some(idx) => idx,
            None => return Err(SpatialDivergence::Lead3 { temp_leaf_idx, lead3 }),
        };

        for d in 1..=s2_level {
            let bit = space.group2(d, ls);
            match self.spat_internal.get(u).child[bit as usize] {
                Some(next) if d == s2_level => return Ok(next),
                Some(next) => u = next,
                None => return Err(SpatialDivergence::Group2 { depth: d, bit, parent: u }),
            }
        }
        unreachable!("loop always returns by d == s2_level")
    }

    /// Creates internal nodes (and the terminal leaf) for depths
    /// `depth..=lt`, starting from the existing node `parent` at depth
    /// `depth - 1`. Returns the new leaf's index.
    fn extend_temporal(&mut self, time: TimeKey, depth: u32, parent: NodeIdx) -> NodeIdx {
        let lt = self.config.time_bits();
        let mut u = parent;
        let mut leaf_idx = None;
        for d in depth..=lt {
            let bit = time.bit(d, lt);
            if d != lt {
                let new_idx = self.temp_internal.push(TempInternal::default());
                self.temp_internal.get_mut(u).child[bit as usize] = Some(new_idx);
                u = new_idx;
            } else {
                let new_leaf = self.temp_leaf.push(TempLeaf::new(time));
                self.temp_internal.get_mut(u).child[bit as usize] = Some(new_leaf);
                leaf_idx = Some(new_leaf);
            }
        }
        leaf_idx.expect("loop always reaches d == lt")
    }

    /// Creates internal nodes (and the terminal leaf) for quad-depths
    /// `start_depth..=s2_level`, starting from existing node `parent0` at
    /// depth `start_depth - 1`. Returns the new leaf's index.
    fn extend_spatial_2bit_groups(
        &mut self,
        parent0: NodeIdx,
        start_depth: u32,
        time: TimeKey,
        space: SpaceKey,
    ) -> NodeIdx {
        let ls = self.config.space_bits();
        let s2_level = u32::from(self.config.s2_level);
        let mut u = parent0;
        let mut leaf_idx = None;
        for d in start_depth..=s2_level {
            let bit = space.group2(d, ls);
            if d != s2_level {
                let new_idx = self.spat_internal.push(SpatInternal::default());
                self.spat_internal.get_mut(u).child[bit as usize] = Some(new_idx);
                u = new_idx;
            } else {
                let new_leaf = self.spat_leaf.push(SpatLeaf::new(time, space));
                self.spat_internal.get_mut(u).child[bit as usize] = Some(new_leaf);
                leaf_idx = Some(new_leaf);
            }
        }
        leaf_idx.expect("loop always reaches d == s2_level")
    }

    fn temporal_link_targets(
        &self,
        leaf_idx: NodeIdx,
        div: &TemporalDivergence,
    ) -> (Option<NodeIdx>, Option<NodeIdx>) {
        match self.temp_leaf.live_len() {
            1 => (None, None),
            2 => {
                let other = self
                    .temp_head
                    .expect("a single live leaf must already be tracked as head");
                if self.temp_leaf.get(other).encoded_time < self.temp_leaf.get(leaf_idx).encoded_time {
                    (Some(other), None)
                } else {
                    (None, Some(other))
                }
            }
            _ => self.temporal_neighbor_via_trie(div.depth, div.bit, div.parent),
        }
    }

    /// Finds the new leaf's immediate predecessor/successor by descending
    /// the sibling subtree at the divergence point to its extreme leaf.
    fn temporal_neighbor_via_trie(&self, depth: u32, bit: u8, parent: NodeIdx) -> (Option<NodeIdx>, Option<NodeIdx>) {
        let lt = self.config.time_bits();
        let sibling_bit = 1 - bit;
        let sibling = self.temp_internal.get(parent).child[sibling_bit as usize].expect(
            "parent must retain the sibling subtree: it was reached through a live path, \
             and the only missing child is the one just filled",
        );

        if bit == 0 {
            // The new leaf's key is smaller than everything under the sibling: it
            // becomes the predecessor of the sibling subtree's left-most leaf.
            let succ = self.leftmost_temporal_leaf(sibling, depth, lt);
            let prev = self.temp_leaf.get(succ).prev;
            (prev, Some(succ))
        } else {
            let pred = self.rightmost_temporal_leaf(sibling, depth, lt);
            let next = self.temp_leaf.get(pred).next;
            (Some(pred), next)
        }
    }

    /// `u` is the sibling subtree root found at depth `depth`. If that
    /// depth is already the leaf depth, `u` IS the leaf; otherwise descend
    /// further, always preferring the lower child, to the leaf depth.
    fn leftmost_temporal_leaf(&self, mut u: NodeIdx, mut depth: u32, lt: u32) -> NodeIdx {
        if depth == lt {
            return u;
        }
        loop {
            let node = self.temp_internal.get(u);
            let bit = if node.child[0].is_some() { 0 } else { 1 };
            let next = node.child[bit].expect("reached internal node must retain a live child");
            depth += 1;
            if depth == lt {
                return next;
            }
            u = next;
        }
    }

    /// `u` is the sibling subtree root found at depth `depth`. If that
    /// depth is already the leaf depth, `u` IS the leaf; otherwise descend
    /// further, always preferring the higher child, to the leaf depth.
    fn rightmost_temporal_leaf(&self, mut u: NodeIdx, mut depth: u32, lt: u32) -> NodeIdx {
        if depth == lt {
            return u;
        }
        loop {
            let node = self.temp_internal.get(u);
            let bit = if node.child[1].is_some() { 1 } else { 0 };
            let next = node.child[bit].expect("reached internal node must retain a live child");
            depth += 1;
            if depth == lt {
                return next;
            }
            u = next;
        }
    }

    fn spatial_link_targets(
        &mut self,
        leaf_idx: NodeIdx,
        div: &SpatialDivergence,
    ) -> (Option<NodeIdx>, Option<NodeIdx>) {
        match self.spat_leaf.live_len() {
            1 => (None, None),
            2 => {
                let other = self
                    .spat_head
                    .expect("a single live leaf must already be tracked as head");
                if self.spat_leaf.get(other).order_key() < self.spat_leaf.get(leaf_idx).order_key() {
                    (Some(other), None)
                } else {
                    (None, Some(other))
                }
            }
            _ => match div {
                // Divergence at quad-depth >= 2 has a well-formed sibling to
                // descend; shallower divergences (the lead-3 fan-out, or the
                // very first quad group) fall back to scanning from the most
                // recently inserted live leaf instead.
                SpatialDivergence::Group2 { depth, bit, parent } if *depth >= 2 => {
                    self.spatial_neighbor_via_trie(*depth, *bit, *parent)
                }
                _ => self.spatial_neighbor_via_pivot_scan(leaf_idx),
            },
        }
    }

    fn spatial_neighbor_via_trie(&self, depth: u32, bit: u8, parent: NodeIdx) -> (Option<NodeIdx>, Option<NodeIdx>) {
        let s2_level = u32::from(self.config.s2_level);
        let parent_node = self.spat_internal.get(parent);

        let (sib_bit, prefer_low) = match bit {
            0 => (
                (1..=3).find(|&i| parent_node.child[i].is_some()).expect(
                    "parent must retain a sibling: it was reached through a live path, \
                     and only bit 0 was missing",
                ),
                true,
            ),
            3 => (
                (0..=2).rev().find(|&i| parent_node.child[i].is_some()).expect(
                    "parent must retain a sibling: it was reached through a live path, \
                     and only bit 3 was missing",
                ),
                false,
            ),
            _ => {
                if let Some(i) = ((bit as usize + 1)..=3).find(|&i| parent_node.child[i].is_some()) {
                    (i, true)
                } else {
                    let i = (0..bit as usize)
                        .rev()
                        .find(|&i| parent_node.child[i].is_some())
                        .expect("if no larger sibling exists a smaller one must, since the parent is live");
                    (i, false)
                }
            }
        };

        let sib = parent_node.child[sib_bit].expect("sib_bit was chosen to be Some");
        if prefer_low {
            let succ = self.spatial_extreme_from(sib, depth, s2_level, true);
            let prev = self.spat_leaf.get(succ).prev;
            (prev, Some(succ))
        } else {
            let pred = self.spatial_extreme_from(sib, depth, s2_level, false);
            let next = self.spat_leaf.get(pred).next;
            (Some(pred), next)
        }
    }

    /// `node` is the sibling subtree root found at quad-depth `depth`. If
    /// that depth is already the leaf depth, `node` IS the leaf; otherwise
    /// descend further, always preferring the lowest (or highest) present
    /// child, to the leaf depth.
    fn spatial_extreme_from(&self, node: NodeIdx, depth: u32, s2_level: u32, prefer_low: bool) -> NodeIdx {
        if depth == s2_level {
            return node;
        }
        self.resolve_extreme_spatial(node, depth, s2_level, prefer_low)
    }

    pub(super) fn resolve_extreme_spatial(&self, mut u: NodeIdx, mut depth: u32, s2_level: u32, prefer_low: bool) -> NodeIdx {
        loop {
            let node = self.spat_internal.get(u);
            let bit = if prefer_low {
                (0..4).find(|&i| node.child[i].is_some())
            } else {
                (0..4).rev().find(|&i| node.child[i].is_some())
            }
            .expect("reached internal node must retain a live child");
            let next = node.child[bit].expect("checked Some above");
            depth += 1;
            if depth == s2_level {
                return next;
            }
            u = next;
        }
    }

    /// Finds the new leaf's neighbours by scanning out from the most
    /// recently inserted live leaf, rather than via trie structure. Used
    /// when the divergence point is too shallow to have a well-defined
    /// sibling subtree (see [`SpatialDivergence`]).
    fn spatial_neighbor_via_pivot_scan(&self, leaf_idx: NodeIdx) -> (Option<NodeIdx>, Option<NodeIdx>) {
        let new_key = self.spat_leaf.get(leaf_idx).order_key();
        let Some(pivot) = self.last_live_spat_leaf.or(self.spat_head) else {
            return (None, None);
        };
        let pivot_key = self.spat_leaf.get(pivot).order_key();

        if pivot_key < new_key {
            let mut prev = pivot;
            loop {
                match self.spat_leaf.get(prev).next {
                    Some(next) if self.spat_leaf.get(next).order_key() < new_key => prev = next,
                    other => return (Some(prev), other),
                }
            }
        } else {
            let mut next = pivot;
            loop {
                match self.spat_leaf.get(next).prev {
                    Some(prev) if self.spat_leaf.get(prev).order_key() > new_key => next = prev,
                    other => return (other, Some(next)),
                }
            }
        }
    }

    fn link_temp(&mut self, leaf_idx: NodeIdx, prev: Option<NodeIdx>, next: Option<NodeIdx>) {
        self.temp_leaf.get_mut(leaf_idx).prev = prev;
        self.temp_leaf.get_mut(leaf_idx).next = next;
        match prev {
            Some(p) => self.temp_leaf.get_mut(p).next = Some(leaf_idx),
            None => self.temp_head = Some(leaf_idx),
        }
        match next {
            Some(n) => self.temp_leaf.get_mut(n).prev = Some(leaf_idx),
            None => self.temp_tail = Some(leaf_idx),
        }
    }

    pub(super) fn link_spat(&mut self, leaf_idx: NodeIdx, prev: Option<NodeIdx>, next: Option<NodeIdx>) {
        self.spat_leaf.get_mut(leaf_idx).prev = prev;
        self.spat_leaf.get_mut(leaf_idx).next = next;
        match prev {
            Some(p) => self.spat_leaf.get_mut(p).next = Some(leaf_idx),
            None => self.spat_head = Some(leaf_idx),
        }
        match next {
            Some(n) => self.spat_leaf.get_mut(n).prev = Some(leaf_idx),
            None => self.spat_tail = Some(leaf_idx),
        }
        self.last_live_spat_leaf = Some(leaf_idx);
    }
}
