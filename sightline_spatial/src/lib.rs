// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline Spatial: directional focus geometry.
//!
//! This crate answers one question: given the rectangle that currently holds
//! focus, a direction, and a set of candidate rectangles, which candidate is
//! the best next target? It works purely on geometry and knows nothing about
//! sections, events, or how focus is actually moved.
//!
//! The pipeline is:
//! - **Geometry** ([`NavRect`], [`ViewportClip`]): snapshot each candidate's
//!   bounds and snapped center, dropping candidates that lie well outside the
//!   viewport.
//! - **Partitioning** ([`partition`], [`Zone`], [`Zones`]): classify candidates
//!   into a 3×3 grid around the reference rectangle. Diagonal candidates that
//!   overlap the reference span enough are also placed in the adjacent straight
//!   zone. Candidates overlapping the reference are subdivided again around its
//!   center.
//! - **Priority** ([`Tier`], [`tiers`], [`prioritize`], [`Distance`]): build the
//!   ordered tiers for the direction, pick the first non-empty tier, and sort it
//!   lexicographically by the tier's distance functions.
//! - **Navigation** ([`navigate`]): glue the above together and apply the
//!   source-memory override.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use sightline_spatial::{navigate, Candidate, Direction, NavigateOptions};
//!
//! let origin = Candidate { id: 0_u32, rect: Rect::new(100.0, 100.0, 150.0, 150.0) };
//! let candidates = [
//!     Candidate { id: 1, rect: Rect::new(300.0, 100.0, 350.0, 150.0) },
//!     Candidate { id: 2, rect: Rect::new(100.0, 300.0, 150.0, 350.0) },
//! ];
//! let options = NavigateOptions::default();
//!
//! assert_eq!(navigate(&origin, Direction::Right, &candidates, &options), Some(1));
//! assert_eq!(navigate(&origin, Direction::Down, &candidates, &options), Some(2));
//! assert_eq!(navigate(&origin, Direction::Up, &candidates, &options), None);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use core::fmt;
use core::str::FromStr;

mod distance;
mod navigate;
mod partition;
mod priority;
mod rect;

pub use distance::Distance;
pub use navigate::{Candidate, NavigateOptions, PreviousMove, navigate};
pub use partition::{Zone, Zones, partition};
pub use priority::{Group, Tier, Tiers, prioritize, tiers};
pub use rect::{NavRect, ViewportClip};

/// Direction of a spatial focus move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Move toward smaller x.
    Left,
    /// Move toward smaller y.
    Up,
    /// Move toward larger x.
    Right,
    /// Move toward larger y.
    Down,
}

impl Direction {
    /// All four directions, in the order left, up, right, down.
    pub const ALL: [Self; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    /// The opposite direction.
    pub const fn reverse(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// Lowercase name, as used in configuration keys and attribute names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
        }
    }

    /// Position of this direction in [`Direction::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Up => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Direction`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseDirectionError;

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of `left`, `up`, `right`, `down`")
    }
}

impl core::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Parses a direction name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or(ParseDirectionError)
    }
}
