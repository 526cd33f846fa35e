// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! An in-memory composite index over `(time, S2 cell)` keys: a binary
//! radix trie over encoded calendar time, with a quaternary radix trie
//! over encoded S2 cell id rooted at each temporal leaf.
//!
//! ##### About
//!
//! Spatio-temporal workloads — "what happened in this place during this
//! window" — are usually served by bolting a spatial index onto a
//! time-partitioned store, or vice versa, and intersecting two query
//! results after the fact. This crate instead encodes both dimensions
//! into one key and indexes them as a single nested trie: the temporal
//! trie's leaves double as the roots of per-timestamp spatial subtries.
//! Each trie additionally threads its leaves into a doubly-linked list in
//! key order, so range scans over either dimension are a list walk
//! rather than a tree traversal.
//!
//! This is a main-memory structure: there is no write-ahead log, no
//! on-disk representation, and no concurrent-writer support. See the
//! [`Index`] documentation for the operations this crate provides.
//!
//! # Example usage
//!
//! ```
//! use tst_trie::{Config, Index, TemporalResolution};
//!
//! let mut index: Index<&str> = Index::new(Config::new(20, TemporalResolution::Hour)?);
//!
//! let t = index.encode_time(&[2016, 4, 21, 14])?;
//! let s = index.encode_space(23.180, 72.632);
//! index.insert(t, s, "ahmedabad-event");
//!
//! let covering = index.rectangle_to_cells((23.176, 72.630), (23.210, 72.635));
//! let t_end = index.encode_time(&[2016, 4, 21, 15])?;
//! let hits = index.range_search(&covering, t, t_end);
//! assert_eq!(hits, vec!["ahmedabad-event"]);
//!
//! index.delete(t, s, &"ahmedabad-event");
//! assert_eq!(index.live_leaf_count(), 0);
//! # Ok::<(), tst_trie::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod arena;
mod config;
mod error;
mod index;
mod key;
mod node;
mod spatial;

pub use config::{Config, TemporalResolution, DEFAULT_MAX_CELLS};
pub use error::{Error, Result};
pub use index::Index;
pub use key::{encode_time, SpaceKey, TimeKey};
pub use spatial::{encode_space, rectangle_to_cells, Covering};
