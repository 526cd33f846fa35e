// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The composite temporal-spatial trie: construction, configuration, and
//! the read-only observability accessors. The mutating/query operations
//! (`insert`, `delete`, `range_search`) live in the sibling `insert`,
//! `delete`, and `range` modules as `impl<D> Index<D>` blocks, mirroring
//! how the donor codebase splits one large type's behaviour across files
//! by operation family.

mod delete;
mod insert;
mod range;

use crate::arena::{Arena, NodeIdx};
use crate::config::Config;
use crate::error::Result;
use crate::key::{SpaceKey, TimeKey};
use crate::node::{SpatInternal, SpatLeaf, TempInternal, TempLeaf};
use crate::spatial::Covering;

pub use crate::config::{TemporalResolution, DEFAULT_MAX_CELLS};

const ROOT_IDX: NodeIdx = 0;

/// A main-memory composite index over `(encoded time, encoded S2 cell)`
/// keys, supporting insert, delete, and spatio-temporal range scan.
///
/// `D` is the opaque payload type; it need only support equality (for
/// [`Index::delete`]) and, for range scans, cloning the harvested results
/// out of the index.
#[derive(Debug)]
pub struct Index<D> {
    config: Config,

    temp_internal: Arena<TempInternal>,
    temp_leaf: Arena<TempLeaf>,
    spat_internal: Arena<SpatInternal>,
    spat_leaf: Arena<SpatLeaf<D>>,

    /// Head/tail of the temporal linked list (strictly increasing
    /// `encoded_time`).
    temp_head: Option<NodeIdx>,
    temp_tail: Option<NodeIdx>,

    /// Head/tail of the spatial linked list (strictly increasing
    /// `(encoded_time, s2_id)`).
    spat_head: Option<NodeIdx>,
    spat_tail: Option<NodeIdx>,

    /// The most recently inserted *live* spatial leaf, used as the scan
    /// pivot for the small-scale linked-list insertion path (§9's
    /// resolved open question: the reference's `SPAT_LEAF_IDX - 2` pivot
    /// is not robust against disabled slots).
    last_live_spat_leaf: Option<NodeIdx>,
}

impl<D> Index<D> {
    /// Creates an empty index for the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut temp_internal = Arena::new();
        temp_internal.push(TempInternal::default()); // root, at index 0

        Self {
            config,
            temp_internal,
            temp_leaf: Arena::new(),
            spat_internal: Arena::new(),
            spat_leaf: Arena::new(),
            temp_head: None,
            temp_tail: None,
            spat_head: None,
            spat_tail: None,
            last_live_spat_leaf: None,
        }
    }

    /// Validates `s2_level` and `resolution`, then builds an empty index.
    /// The fallible counterpart to [`Index::new`] for callers that have
    /// not already constructed a [`Config`].
    pub fn open(s2_level: u8, resolution: &str) -> Result<Self> {
        Ok(Self::new(Config::from_names(s2_level, resolution)?))
    }

    /// Sets the maximum number of S2 cells a covering may contain.
    pub fn set_max_cells(&mut self, max_cells: usize) {
        self.config.max_cells = max_cells;
    }

    /// Encodes calendar fields into a [`TimeKey`] under this index's
    /// configured resolution.
    pub fn encode_time(&self, fields: &[u32]) -> Result<TimeKey> {
        crate::key::encode_time(&self.config, fields)
    }

    /// Encodes a lat/lng coordinate into a [`SpaceKey`] under this
    /// index's configured S2 level.
    #[must_use]
    pub fn encode_space(&self, lat: f64, lng: f64) -> SpaceKey {
        crate::spatial::encode_space(lat, lng, self.config.s2_level, self.config.space_bits())
    }

    /// Computes a level-grouped S2 covering for the rectangle spanned by
    /// `left_bottom` and `right_upper` (each `(lat, lng)` in degrees).
    #[must_use]
    pub fn rectangle_to_cells(&self, left_bottom: (f64, f64), right_upper: (f64, f64)) -> Covering {
        crate::spatial::rectangle_to_cells(
            left_bottom,
            right_upper,
            self.config.s2_level,
            self.config.max_cells,
        )
    }

    /// Number of live internal (branch) nodes across both tries, counting
    /// temporal leaves as routing nodes — only spatial leaves are "true"
    /// leaves of the combined structure.
    #[must_use]
    pub fn live_internal_count(&self) -> usize {
        self.temp_internal.live_len() + self.temp_leaf.live_len() + self.spat_internal.live_len()
    }

    /// Number of live spatial leaves (the data-bearing nodes).
    #[must_use]
    pub fn live_leaf_count(&self) -> usize {
        self.spat_leaf.live_len()
    }

    /// `live_internal_count() + live_leaf_count()`.
    #[must_use]
    pub fn total_node_count(&self) -> usize {
        self.live_internal_count() + self.live_leaf_count()
    }

    /// Total number of payloads stored across all spatial leaves.
    #[must_use]
    pub fn data_count(&self) -> usize {
        self.spat_leaf.iter().map(|leaf| leaf.payloads.len()).sum()
    }

    /// Estimated index size in megabytes, based on arena lengths times
    /// per-node sizes.
    ///
    /// This counts disabled slots (matching the reference's `get_size()`):
    /// a live-only estimate would need additional bookkeeping the
    /// reference never had, so this is documented rather than silently
    /// changed. It also does not account for heap allocations inside
    /// payload bags (`Vec<D>` backing storage) — only the fixed-size
    /// struct footprint of each arena slot.
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        let bytes = self.temp_internal.len() * std::mem::size_of::<TempInternal>()
            + self.temp_leaf.len() * std::mem::size_of::<TempLeaf>()
            + self.spat_internal.len() * std::mem::size_of::<SpatInternal>()
            + self.spat_leaf.len() * std::mem::size_of::<SpatLeaf<D>>();
        bytes as f64 / (1024.0 * 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemporalResolution;

    #[test]
    fn new_index_starts_empty() {
        let cfg = Config::new(10, TemporalResolution::Hour).unwrap();
        let index: Index<i32> = Index::new(cfg);
        assert_eq!(index.live_leaf_count(), 0);
        assert_eq!(index.data_count(), 0);
        assert_eq!(index.live_internal_count(), 1); // the root
    }

    #[test]
    fn open_rejects_bad_resolution() {
        assert!(Index::<i32>::open(10, "fortnight").is_err());
    }
}
