// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Range scan: sweep the temporal linked list from the first leaf at or
//! after `t_start`, and at each stop probe the spatial subtrie against a
//! precomputed covering.

use crate::arena::NodeIdx;
use crate::key::{SpaceKey, TimeKey};
use crate::spatial::Covering;

use super::{Index, ROOT_IDX};

impl<D: Clone> Index<D> {
    /// Collects every payload stored under a time in `[t_start, t_end)`
    /// and a space covered by `covering`.
    ///
    /// `covering` is typically produced by [`Index::rectangle_to_cells`];
    /// passing a hand-built one lets callers reuse a covering across
    /// several time windows.
    #[must_use]
    pub fn range_search(&self, covering: &Covering, t_start: TimeKey, t_end: TimeKey) -> Vec<D> {
        let mut results = Vec::new();
        if t_start >= t_end {
            return results;
        }

        let Some(mut leaf) = self.find_start_leaf(t_start) else {
            return results;
        };

        loop {
            let leaf_time = self.temp_leaf.get(leaf).encoded_time;
            if leaf_time >= t_end {
                break;
            }
            self.spatial_probe(leaf, covering, &mut results);
            match self.temp_leaf.get(leaf).next {
                Some(next) => leaf = next,
                None => break,
            }
        }

        results
    }

    /// Finds the first temporal leaf with `encoded_time >= t_start`, or
    /// `None` if no such leaf exists.
    fn find_start_leaf(&self, t_start: TimeKey) -> Option<NodeIdx> {
        self.temp_head?;

        let lt = self.config.time_bits();
        let mut u = ROOT_IDX;
        for d in 1..=lt {
            let bit = t_start.bit(d, lt);
            match self.temp_internal.get(u).child[bit as usize] {
                Some(next) if d == lt => return self.correct_start_leaf(next, t_start),
                Some(next) => u = next,
                None => return self.descend_to_nearest_leaf(u, d, lt, t_start),
            }
        }
        unreachable!("loop always returns by d == lt")
    }

    /// The exact key's path went missing at depth `d`: descend the
    /// remaining depths deterministically (preferring the higher bit,
    /// then correct for over/undershoot against the linked list).
    fn descend_to_nearest_leaf(&self, mut u: NodeIdx, from_depth: u32, lt: u32, t_start: TimeKey) -> Option<NodeIdx> {
        for d in from_depth..=lt {
            let node = self.temp_internal.get(u);
            let bit = if node.child[1].is_some() { 1 } else { 0 };
            let next = node.child[bit].expect("reached internal node must retain a live child");
            if d == lt {
                return self.correct_start_leaf(next, t_start);
            }
            u = next;
        }
        unreachable!("loop always returns by d == lt")
    }

    fn correct_start_leaf(&self, leaf: NodeIdx, t_start: TimeKey) -> Option<NodeIdx> {
        if self.temp_leaf.get(leaf).encoded_time >= t_start {
            let mut cur = leaf;
            while let Some(p) = self.temp_leaf.get(cur).prev {
                if self.temp_leaf.get(p).encoded_time >= t_start {
                    cur = p;
                } else {
                    break;
                }
            }
            Some(cur)
        } else {
            let mut cur = leaf;
            loop {
                match self.temp_leaf.get(cur).next {
                    Some(next) => {
                        cur = next;
                        if self.temp_leaf.get(cur).encoded_time >= t_start {
                            return Some(cur);
                        }
                    }
                    None => return None,
                }
            }
        }
    }

    /// Harvests every payload at `temp_leaf_idx` whose space falls under
    /// one of `covering`'s cells.
    fn spatial_probe(&self, temp_leaf_idx: NodeIdx, covering: &Covering, out: &mut Vec<D>) {
        let ls = self.config.space_bits();
        let s2_level = u32::from(self.config.s2_level);

        for (&level, cell_ids) in covering {
            for &raw_cell_id in cell_ids {
                let truncated = SpaceKey(raw_cell_id >> (64 - ls));
                let lead3 = truncated.lead3(ls);

                let Some(mut u) = self.temp_leaf.get(temp_leaf_idx).child[lead3 as usize] else {
                    continue;
                };

                let mut reached_depth = 0u32;
                let mut missing = false;
                for d in 1..=u32::from(level) {
                    let bit = truncated.group2(d, ls);
                    match self.spat_internal.get(u).child[bit as usize] {
                        Some(next) => {
                            u = next;
                            reached_depth = d;
                        }
                        None => {
                            missing = true;
                            break;
                        }
                    }
                }
                if missing {
                    continue;
                }

                if u32::from(level) == s2_level {
                    out.extend(self.spat_leaf.get(u).payloads.iter().cloned());
                } else {
                    self.harvest_subtree(u, reached_depth, s2_level, out);
                }
            }
        }
    }

    /// `node` is a spatial-internal subtree root at quad-depth `depth`,
    /// standing in for a coarser covering cell than the index's full S2
    /// level: harvest every leaf in its contiguous linked-list run by
    /// walking from its left-most to its right-most descendant.
    fn harvest_subtree(&self, node: NodeIdx, depth: u32, s2_level: u32, out: &mut Vec<D>) {
        let leftmost = self.resolve_extreme_spatial(node, depth, s2_level, true);
        let rightmost = self.resolve_extreme_spatial(node, depth, s2_level, false);

        let mut cur = leftmost;
        loop {
            out.extend(self.spat_leaf.get(cur).payloads.iter().cloned());
            if cur == rightmost {
                break;
            }
            match self.spat_leaf.get(cur).next {
                Some(next) => cur = next,
                None => break,
            }
        }
    }
}
