// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Adapter around the `s2` crate, isolating the collaborator contract the
//! core consumes (`lat_lng_from_degrees`, `cell_id_from_lat_lng`,
//! `parent`, `id`, `level`, `region_coverer(...).cover(rect)`) so the trie
//! code never imports `s2` types directly.

use std::collections::BTreeMap;

use s2::cellid::CellID;
use s2::latlng::LatLng;
use s2::rect::Rect;
use s2::region::RegionCoverer;

use crate::key::SpaceKey;

/// A covering grouped by level, in ascending level order — the shape
/// `rectangle_to_cells` hands to `range_search`.
pub type Covering = BTreeMap<u8, Vec<u64>>;

/// Builds a `LatLng` from degrees, the collaborator's `lat_lng_from_degrees`.
#[must_use]
pub fn lat_lng_from_degrees(lat: f64, lng: f64) -> LatLng {
    LatLng::from_degrees(lat, lng)
}

/// Truncates a 64-bit S2 cell id to the top `Ls` bits, producing the
/// encoded spatial key `S`.
#[must_use]
pub fn encode_space(lat: f64, lng: f64, s2_level: u8, space_bits: u32) -> SpaceKey {
    let ll = lat_lng_from_degrees(lat, lng);
    let cell_id = CellID::from(ll).parent(u64::from(s2_level));
    SpaceKey(cell_id.0 >> (64 - space_bits))
}

/// Computes a level-grouped S2 covering for the rectangle spanned by
/// `left_bottom` and `right_upper` (each `(lat, lng)` in degrees).
#[must_use]
pub fn rectangle_to_cells(
    left_bottom: (f64, f64),
    right_upper: (f64, f64),
    s2_level: u8,
    max_cells: usize,
) -> Covering {
    let lo = lat_lng_from_degrees(left_bottom.0, left_bottom.1);
    let hi = lat_lng_from_degrees(right_upper.0, right_upper.1);
    let rect = Rect::from(lo).add_point(hi);

    let coverer = RegionCoverer {
        min_level: 0,
        max_level: s2_level,
        level_mod: 1,
        max_cells,
    };
    let covering = coverer.covering(&rect);

    let mut by_level: Covering = BTreeMap::new();
    for cell_id in covering.0 {
        by_level.entry(cell_id.level()).or_default().push(cell_id.0);
    }
    by_level
}
