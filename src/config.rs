// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Index configuration: the temporal resolution and S2 level fix the bit
//! widths `Lt`/`Ls` used by every key in the index for its lifetime.

use crate::error::{Error, Result};

/// Default cap on the number of S2 cells a covering may contain, matching
/// the reference implementation's default.
pub const DEFAULT_MAX_CELLS: usize = 10_000;

const REFERENCE_YEAR: u32 = 2000;

/// Calendar resolution at which `T` keys are encoded.
///
/// Each variant fixes the number of calendar fields `encode_time` accepts
/// and the bit width `Lt` of the resulting key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalResolution {
    /// `Lt = 6`, one field (year).
    Year,
    /// `Lt = 10`, two fields (year, month).
    Month,
    /// `Lt = 15`, three fields (year, month, day).
    Day,
    /// `Lt = 20`, four fields (year, month, day, hour).
    Hour,
    /// `Lt = 26`, five fields (year, month, day, hour, minute).
    Minute,
    /// `Lt = 32`, six fields (year, month, day, hour, minute, second).
    Second,
}

/// Per-field bit widths, MSB-first, matching the full `year, month, day,
/// hour, minute, second` ordering.
const FIELD_WIDTHS: [u32; 6] = [6, 4, 5, 5, 6, 6];

impl TemporalResolution {
    /// Parses a resolution name (`"year"`, `"month"`, ...). Case-sensitive,
    /// matching the reference implementation's string comparisons.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            "second" => Ok(Self::Second),
            other => Err(Error::InvalidResolution(other.to_owned())),
        }
    }

    /// Number of calendar fields `encode_time` requires at this
    /// resolution.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Year => 1,
            Self::Month => 2,
            Self::Day => 3,
            Self::Hour => 4,
            Self::Minute => 5,
            Self::Second => 6,
        }
    }

    /// Bit width `Lt` of an encoded time key at this resolution.
    #[must_use]
    pub fn bit_width(self) -> u32 {
        FIELD_WIDTHS[..self.arity()].iter().sum()
    }

    fn field_widths(self) -> &'static [u32] {
        &FIELD_WIDTHS[..self.arity()]
    }
}

/// Validated construction parameters for a [`crate::Index`].
///
/// Derives the temporal bit width `Lt` and spatial bit width `Ls` once, at
/// construction, rather than recomputing them on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub(crate) s2_level: u8,
    pub(crate) resolution: TemporalResolution,
    pub(crate) max_cells: usize,
}

impl Config {
    /// Validates `s2_level` (must be in `[1, 30]`) and constructs a
    /// [`Config`] with the default [`DEFAULT_MAX_CELLS`] cap.
    pub fn new(s2_level: u8, resolution: TemporalResolution) -> Result<Self> {
        if !(1..=30).contains(&s2_level) {
            return Err(Error::InvalidS2Level(s2_level));
        }

        Ok(Self {
            s2_level,
            resolution,
            max_cells: DEFAULT_MAX_CELLS,
        })
    }

    /// Convenience constructor taking the resolution as a name, matching
    /// the reference implementation's two-argument constructor.
    pub fn from_names(s2_level: u8, resolution: &str) -> Result<Self> {
        Self::new(s2_level, TemporalResolution::parse(resolution)?)
    }

    /// Bit width `Lt` of an encoded time key (`T`).
    #[must_use]
    pub fn time_bits(&self) -> u32 {
        self.resolution.bit_width()
    }

    /// Bit width `Ls` of an encoded space key (`S`): `2 * s2_level + 4`.
    #[must_use]
    pub fn space_bits(&self) -> u32 {
        2 * u32::from(self.s2_level) + 4
    }

    /// Combined key width `Lt + Ls`.
    #[must_use]
    pub fn total_bits(&self) -> u32 {
        self.time_bits() + self.space_bits()
    }

    #[must_use]
    pub(crate) fn field_widths(&self) -> &'static [u32] {
        self.resolution.field_widths()
    }
}

pub(crate) const fn reference_year() -> u32 {
    REFERENCE_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_s2_level() {
        assert_eq!(
            Config::new(0, TemporalResolution::Hour),
            Err(Error::InvalidS2Level(0))
        );
        assert_eq!(
            Config::new(31, TemporalResolution::Hour),
            Err(Error::InvalidS2Level(31))
        );
    }

    #[test]
    fn accepts_boundary_s2_levels() {
        assert!(Config::new(1, TemporalResolution::Year).is_ok());
        assert!(Config::new(30, TemporalResolution::Year).is_ok());
    }

    #[test]
    fn rejects_unknown_resolution_name() {
        assert_eq!(
            Config::from_names(10, "fortnight"),
            Err(Error::InvalidResolution("fortnight".to_owned()))
        );
    }

    #[test]
    fn derives_expected_bit_widths() {
        let cfg = Config::new(20, TemporalResolution::Hour).unwrap();
        assert_eq!(cfg.time_bits(), 20);
        assert_eq!(cfg.space_bits(), 44);
        assert_eq!(cfg.total_bits(), 64);
    }
}
