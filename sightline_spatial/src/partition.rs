// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zone partitioning around a reference rectangle.

use kurbo::Rect;
use smallvec::SmallVec;

use crate::priority::Group;
use crate::rect::NavRect;

/// One cell of the 3×3 grid around a reference rectangle, in row-major order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Center above and to the left of the reference.
    AboveLeft = 0,
    /// Center above the reference, within its horizontal span.
    Above = 1,
    /// Center above and to the right of the reference.
    AboveRight = 2,
    /// Center left of the reference, within its vertical span.
    Left = 3,
    /// Center inside the reference.
    Overlap = 4,
    /// Center right of the reference, within its vertical span.
    Right = 5,
    /// Center below and to the left of the reference.
    BelowLeft = 6,
    /// Center below the reference, within its horizontal span.
    Below = 7,
    /// Center below and to the right of the reference.
    BelowRight = 8,
}

impl Zone {
    /// All zones in row-major order.
    pub const ALL: [Self; 9] = [
        Self::AboveLeft,
        Self::Above,
        Self::AboveRight,
        Self::Left,
        Self::Overlap,
        Self::Right,
        Self::BelowLeft,
        Self::Below,
        Self::BelowRight,
    ];

    /// Row-major index in `0..9`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this is one of the four corner zones.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::AboveLeft | Self::AboveRight | Self::BelowLeft | Self::BelowRight
        )
    }

    fn from_grid(column: usize, row: usize) -> Self {
        Self::ALL[row * 3 + column]
    }
}

/// Candidate indices grouped by [`Zone`].
///
/// A candidate appears in exactly one primary zone, and diagonal candidates may
/// also appear in one or two adjacent straight zones.
#[derive(Clone, Debug, Default)]
pub struct Zones {
    groups: [SmallVec<[usize; 4]>; 9],
}

impl Zones {
    /// Candidate indices in `zone`, in input order.
    pub fn get(&self, zone: Zone) -> &[usize] {
        &self.groups[zone.index()]
    }

    /// Concatenate the candidates of several zones, in the order given.
    pub fn concat(&self, zones: &[Zone]) -> Group {
        zones
            .iter()
            .flat_map(|z| self.groups[z.index()].iter().copied())
            .collect()
    }

    /// Whether no zone holds any candidate.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.is_empty())
    }

    fn push(&mut self, zone: Zone, index: usize) {
        self.groups[zone.index()].push(index);
    }
}

/// Classify candidates into zones around `reference`.
///
/// Each item is `(index, rect)`; the index is what ends up in [`Zones`], so
/// callers can partition a subset of a larger candidate slice.
///
/// When `straight_overlap` is `Some(t)`, a diagonal candidate is also added to
/// the adjacent straight zone if it reaches at least `t` of the way across the
/// reference's width (for above/below) or height (for left/right). Pass `None`
/// for a degenerate point reference, which has no span to overlap.
pub fn partition<'a, I>(items: I, reference: &Rect, straight_overlap: Option<f64>) -> Zones
where
    I: IntoIterator<Item = (usize, &'a NavRect)>,
{
    let mut zones = Zones::default();

    for (index, rect) in items {
        let column = if rect.center.x < reference.x0 {
            0
        } else if rect.center.x <= reference.x1 {
            1
        } else {
            2
        };
        let row = if rect.center.y < reference.y0 {
            0
        } else if rect.center.y <= reference.y1 {
            1
        } else {
            2
        };
        let zone = Zone::from_grid(column, row);
        zones.push(zone, index);

        let Some(threshold) = straight_overlap else {
            continue;
        };
        if !zone.is_diagonal() {
            continue;
        }

        let span_x = reference.width() * threshold;
        let span_y = reference.height() * threshold;

        if rect.left() <= reference.x1 - span_x {
            match zone {
                Zone::AboveRight => zones.push(Zone::Above, index),
                Zone::BelowRight => zones.push(Zone::Below, index),
                _ => {}
            }
        }
        if rect.right() >= reference.x0 + span_x {
            match zone {
                Zone::AboveLeft => zones.push(Zone::Above, index),
                Zone::BelowLeft => zones.push(Zone::Below, index),
                _ => {}
            }
        }
        if rect.top() <= reference.y1 - span_y {
            match zone {
                Zone::BelowLeft => zones.push(Zone::Left, index),
                Zone::BelowRight => zones.push(Zone::Right, index),
                _ => {}
            }
        }
        if rect.bottom() >= reference.y0 + span_y {
            match zone {
                Zone::AboveLeft => zones.push(Zone::Left, index),
                Zone::AboveRight => zones.push(Zone::Right, index),
                _ => {}
            }
        }
    }

    zones
}
