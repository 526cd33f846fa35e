// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Fixed-width key types and the temporal encoder.
//!
//! `TimeKey`/`SpaceKey` are the `T`/`S` values from the data model: plain
//! integers, but newtyped so the trie code never confuses a raw bit
//! pattern with an arbitrary `u32`/`u64`.

use crate::config::{reference_year, Config};
use crate::error::{Error, Result};

/// Encoded time (`T`), right-aligned in the configured `Lt` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeKey(pub u32);

/// Encoded space (`S`): the top `Ls` bits of an S2 cell id at the
/// configured level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpaceKey(pub u64);

impl TimeKey {
    /// Reads the bit at `depth` (1-indexed from the MSB) of a `width`-bit
    /// key.
    #[must_use]
    pub(crate) fn bit(self, depth: u32, width: u32) -> u8 {
        ((self.0 >> (width - depth)) & 1) as u8
    }
}

impl SpaceKey {
    /// The leading 3 bits of the key, used as the temporal leaf's 8-way
    /// child index.
    #[must_use]
    pub(crate) fn lead3(self, width: u32) -> u8 {
        ((self.0 >> (width - 3)) & 0b111) as u8
    }

    /// The 2-bit group at quad-depth `depth` (1-indexed, counted after the
    /// leading 3 bits), used as a spatial-internal child index.
    #[must_use]
    pub(crate) fn group2(self, depth: u32, width: u32) -> u8 {
        ((self.0 >> (width - 3 - 2 * depth)) & 0b11) as u8
    }
}

/// Encodes calendar fields into a [`TimeKey`].
///
/// `fields` must hold exactly as many entries as the configured
/// resolution requires (year only for `Year`, up to year/month/day/hour/
/// minute/second for `Second`), in that order. This is the
/// configuration-driven rendering of the reference implementation's
/// variadic encoder: instead of a template parameter pack, arity is
/// validated against the resolution up front.
pub fn encode_time(config: &Config, fields: &[u32]) -> Result<TimeKey> {
    let widths = config.field_widths();
    if fields.len() != widths.len() {
        return Err(Error::InvalidArity {
            expected: widths.len(),
            got: fields.len(),
        });
    }

    let lt = config.time_bits();
    let mut encoded: u32 = 0;
    let mut acc_len = 0u32;

    for (idx, (&value, &width)) in fields.iter().zip(widths).enumerate() {
        let value = if idx == 0 {
            value.wrapping_sub(reference_year())
        } else {
            value
        };
        acc_len += width;
        encoded += value << (lt - acc_len);
    }

    Ok(TimeKey(encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemporalResolution;

    #[test]
    fn rejects_wrong_arity() {
        let cfg = Config::new(10, TemporalResolution::Hour).unwrap();
        let err = encode_time(&cfg, &[2016, 4, 21]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArity {
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn encodes_hour_resolution() {
        let cfg = Config::new(20, TemporalResolution::Hour).unwrap();
        let key = encode_time(&cfg, &[2016, 4, 21, 0]).unwrap();
        assert_eq!(key.0 >> 14, 16); // year 2016 - 2000 = 16, in top 6 bits
    }

    #[test]
    fn year_only_round_trips_through_top_bits() {
        let cfg = Config::new(5, TemporalResolution::Year).unwrap();
        let key = encode_time(&cfg, &[2005]).unwrap();
        assert_eq!(key.0, 5);
    }

    #[test]
    fn bit_extracts_msb_first() {
        let key = TimeKey(0b1010_00);
        assert_eq!(key.bit(1, 6), 1);
        assert_eq!(key.bit(2, 6), 0);
        assert_eq!(key.bit(3, 6), 1);
        assert_eq!(key.bit(4, 6), 0);
    }

    #[test]
    fn space_key_lead3_and_group2() {
        // Ls = 2*2+4 = 8 bits: 3 lead bits, then 2 groups of 2 bits.
        let key = SpaceKey(0b101_11_00);
        assert_eq!(key.lead3(8), 0b101);
        assert_eq!(key.group2(1, 8), 0b11);
        assert_eq!(key.group2(2, 8), 0b00);
    }
}
