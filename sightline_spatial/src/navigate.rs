// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One directional navigation pass.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::Direction;
use crate::partition::{Zone, partition};
use crate::priority::{prioritize, tiers};
use crate::rect::{NavRect, ViewportClip};

/// A focusable candidate: an identifier plus its current bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Candidate<K> {
    /// Identifier returned when this candidate wins.
    pub id: K,
    /// Current bounds, in the same coordinate space as every other candidate.
    pub rect: Rect,
}

/// Record of the last successful move out of an element.
///
/// Used for source memory: reversing a move returns to where it came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PreviousMove<K> {
    /// Element the move started from.
    pub source: K,
    /// Element the move landed on.
    pub destination: K,
    /// Direction that would undo the move.
    pub reverse: Direction,
}

/// Per-request options for [`navigate`].
#[derive(Clone, Debug)]
pub struct NavigateOptions<K> {
    /// Drop the diagonal fallback tier.
    pub straight_only: bool,
    /// Fraction of the reference span a diagonal candidate must overlap to
    /// also count as straight.
    pub straight_overlap_threshold: f64,
    /// Viewport exclusion; `None` disables it.
    pub viewport: Option<ViewportClip>,
    /// Prefer returning to [`PreviousMove::source`] when reversing a move.
    pub remember_source: bool,
    /// The last recorded move, consulted when `remember_source` is set.
    pub previous: Option<PreviousMove<K>>,
}

impl<K> Default for NavigateOptions<K> {
    fn default() -> Self {
        Self {
            straight_only: true,
            straight_overlap_threshold: 0.5,
            viewport: None,
            remember_source: false,
            previous: None,
        }
    }
}

/// Pick the best candidate to move to from `origin` in `direction`.
///
/// Returns `None` when there are no candidates, when none survives the
/// viewport filter, or when every tier is empty. `origin` should not appear in
/// `candidates`.
pub fn navigate<K>(
    origin: &Candidate<K>,
    direction: Direction,
    candidates: &[Candidate<K>],
    options: &NavigateOptions<K>,
) -> Option<K>
where
    K: Copy + Eq,
{
    if candidates.is_empty() {
        return None;
    }

    let (ids, rects): (Vec<K>, Vec<NavRect>) = candidates
        .iter()
        .filter(|c| !options.viewport.is_some_and(|clip| clip.excludes(&c.rect)))
        .map(|c| (c.id, NavRect::new(c.rect)))
        .unzip();
    if rects.is_empty() {
        tracing::warn!(%direction, "no focus candidates");
        return None;
    }

    let reference = NavRect::new(origin.rect);
    let outer = partition(
        rects.iter().enumerate(),
        &reference.bounds,
        Some(options.straight_overlap_threshold),
    );
    let inner = partition(
        outer.get(Zone::Overlap).iter().map(|&i| (i, &rects[i])),
        &reference.center_rect(),
        None,
    );

    let group = prioritize(
        tiers(direction, &outer, &inner, options.straight_only),
        &reference,
        &rects,
    )?;

    if options.remember_source
        && let Some(previous) = options.previous
        && previous.destination == origin.id
        && previous.reverse == direction
        && group.iter().any(|&i| ids[i] == previous.source)
    {
        return Some(previous.source);
    }

    group.first().map(|&i| ids[i])
}
