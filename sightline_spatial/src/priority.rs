// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority tiers and their resolution.

use smallvec::{SmallVec, smallvec};

use crate::Direction;
use crate::distance::{Distance, compare};
use crate::partition::{Zone, Zones};
use crate::rect::NavRect;

/// Candidate indices forming one tier's group.
pub type Group = SmallVec<[usize; 8]>;

/// Ordered tiers for one request; at most three.
pub type Tiers = SmallVec<[Tier; 3]>;

/// One stage of priority resolution.
#[derive(Clone, Debug)]
pub struct Tier {
    /// Candidate indices eligible at this stage.
    pub group: Group,
    /// Metrics applied lexicographically to order the group.
    pub distance: &'static [Distance],
}

const STRAIGHT_HORIZONTAL: &[Distance] = &[Distance::NearPlumbLine, Distance::Top];
const STRAIGHT_VERTICAL: &[Distance] = &[Distance::NearHorizon, Distance::Left];
const DIAGONAL_LEFT: &[Distance] = &[
    Distance::NearHorizon,
    Distance::Right,
    Distance::NearTargetTop,
];
const DIAGONAL_RIGHT: &[Distance] = &[
    Distance::NearHorizon,
    Distance::Left,
    Distance::NearTargetTop,
];
const DIAGONAL_UP: &[Distance] = &[
    Distance::NearPlumbLine,
    Distance::Bottom,
    Distance::NearTargetLeft,
];
const DIAGONAL_DOWN: &[Distance] = &[
    Distance::NearPlumbLine,
    Distance::Top,
    Distance::NearTargetLeft,
];

/// Build the tiers for `direction`.
///
/// `outer` partitions candidates around the reference rectangle and `inner`
/// subdivides the overlapping ones around its center. The tiers are, in order:
/// candidates overlapping the reference on the requested side, candidates in
/// the straight zone, and candidates in the two diagonal zones. The diagonal
/// tier is omitted when `straight_only` is set.
pub fn tiers(direction: Direction, outer: &Zones, inner: &Zones, straight_only: bool) -> Tiers {
    let (internal, straight, diagonal, straight_metric, diagonal_metric): (
        [Zone; 3],
        Zone,
        [Zone; 2],
        &'static [Distance],
        &'static [Distance],
    ) = match direction {
        Direction::Left => (
            [Zone::AboveLeft, Zone::Left, Zone::BelowLeft],
            Zone::Left,
            [Zone::AboveLeft, Zone::BelowLeft],
            STRAIGHT_HORIZONTAL,
            DIAGONAL_LEFT,
        ),
        Direction::Right => (
            [Zone::AboveRight, Zone::Right, Zone::BelowRight],
            Zone::Right,
            [Zone::AboveRight, Zone::BelowRight],
            STRAIGHT_HORIZONTAL,
            DIAGONAL_RIGHT,
        ),
        Direction::Up => (
            [Zone::AboveLeft, Zone::Above, Zone::AboveRight],
            Zone::Above,
            [Zone::AboveLeft, Zone::AboveRight],
            STRAIGHT_VERTICAL,
            DIAGONAL_UP,
        ),
        Direction::Down => (
            [Zone::BelowLeft, Zone::Below, Zone::BelowRight],
            Zone::Below,
            [Zone::BelowLeft, Zone::BelowRight],
            STRAIGHT_VERTICAL,
            DIAGONAL_DOWN,
        ),
    };

    let mut out: Tiers = smallvec![
        Tier {
            group: inner.concat(&internal),
            distance: straight_metric,
        },
        Tier {
            group: outer.concat(&[straight]),
            distance: straight_metric,
        },
    ];
    if !straight_only {
        out.push(Tier {
            group: outer.concat(&diagonal),
            distance: diagonal_metric,
        });
    }
    out
}

/// Pick the first non-empty tier and return its group sorted best-first.
///
/// Indices in the tiers refer into `rects`. The sort is stable, so candidates
/// that tie on every metric keep their input order.
pub fn prioritize(tiers: Tiers, reference: &NavRect, rects: &[NavRect]) -> Option<Group> {
    let Tier {
        mut group,
        distance,
    } = tiers.into_iter().find(|t| !t.group.is_empty())?;
    group.sort_by(|&a, &b| compare(distance, reference, &rects[a], &rects[b]));
    tracing::trace!(candidates = group.len(), ?distance, "selected priority tier");
    Some(group)
}
