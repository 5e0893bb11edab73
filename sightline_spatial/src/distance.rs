// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direction-specific distance metrics.
//!
//! Every metric follows the same convention: smaller is better. Metrics that
//! prefer a larger coordinate (for example "bottom-most") are negated.

use core::cmp::Ordering;

use crate::rect::NavRect;

/// A scalar distance from a reference rectangle to a candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Distance {
    /// Horizontal gap between the candidate's near edge and the reference's
    /// vertical center line; zero when the candidate straddles it.
    NearPlumbLine,
    /// Vertical gap between the candidate's near edge and the reference's
    /// horizontal center line; zero when the candidate straddles it.
    NearHorizon,
    /// Like [`Distance::NearPlumbLine`], measured against the reference's left edge.
    NearTargetLeft,
    /// Like [`Distance::NearHorizon`], measured against the reference's top edge.
    NearTargetTop,
    /// The candidate's top edge.
    Top,
    /// The candidate's bottom edge, negated.
    Bottom,
    /// The candidate's left edge.
    Left,
    /// The candidate's right edge, negated.
    Right,
}

impl Distance {
    /// Measure `candidate` relative to `reference`.
    pub fn measure(self, reference: &NavRect, candidate: &NavRect) -> f64 {
        match self {
            Self::NearPlumbLine => {
                let d = if candidate.center.x < reference.center.x {
                    reference.center.x - candidate.right()
                } else {
                    candidate.left() - reference.center.x
                };
                d.max(0.0)
            }
            Self::NearHorizon => {
                let d = if candidate.center.y < reference.center.y {
                    reference.center.y - candidate.bottom()
                } else {
                    candidate.top() - reference.center.y
                };
                d.max(0.0)
            }
            Self::NearTargetLeft => {
                let d = if candidate.center.x < reference.center.x {
                    reference.left() - candidate.right()
                } else {
                    candidate.left() - reference.left()
                };
                d.max(0.0)
            }
            Self::NearTargetTop => {
                let d = if candidate.center.y < reference.center.y {
                    reference.top() - candidate.bottom()
                } else {
                    candidate.top() - reference.top()
                };
                d.max(0.0)
            }
            Self::Top => candidate.top(),
            Self::Bottom => -candidate.bottom(),
            Self::Left => candidate.left(),
            Self::Right => -candidate.right(),
        }
    }
}

/// Lexicographic comparison of two candidates across `metrics`.
///
/// The first metric that tells the candidates apart decides. NaN distances
/// follow `f64::total_cmp`, so a degenerate rectangle sorts after every
/// finite candidate and the order stays total.
pub(crate) fn compare(
    metrics: &[Distance],
    reference: &NavRect,
    a: &NavRect,
    b: &NavRect,
) -> Ordering {
    for metric in metrics {
        let (da, db) = (metric.measure(reference, a), metric.measure(reference, b));
        let ord = da.partial_cmp(&db).unwrap_or_else(|| da.total_cmp(&db));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
