// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass rectangle snapshots and viewport exclusion.

use kurbo::{Point, Rect, Size};

/// Geometry of one element for a single navigation pass.
///
/// `NavRect` is never persisted: callers build it from the element's current
/// bounds each time they navigate, since layout may have moved in between.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavRect {
    /// Normalized bounds; `x0`/`y0` are left/top and `x1`/`y1` are right/bottom.
    pub bounds: Rect,
    /// Center snapped down to whole units: `(left + floor(width / 2), top + floor(height / 2))`.
    pub center: Point,
}

impl NavRect {
    /// Snapshot `bounds`, normalizing inverted rectangles.
    pub fn new(bounds: Rect) -> Self {
        let bounds = bounds.abs();
        let half = (bounds.size() / 2.0).floor();
        Self {
            bounds,
            center: Point::new(bounds.x0 + half.width, bounds.y0 + half.height),
        }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f64 {
        self.bounds.x0
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f64 {
        self.bounds.y0
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.bounds.x1
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.bounds.y1
    }

    /// A zero-sized rectangle at the snapped center.
    ///
    /// Used as the nested reference when subdividing candidates that overlap
    /// the reference rectangle.
    pub fn center_rect(&self) -> Rect {
        Rect::from_points(self.center, self.center)
    }
}

/// Viewport exclusion settings.
///
/// A rectangle is excluded when it lies entirely outside the viewport grown by
/// `horizontal × width` on the left and right and `vertical × height` on the
/// top and bottom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportClip {
    /// Size of the visible viewport; its origin is `(0, 0)`.
    pub viewport: Size,
    /// Horizontal margin as a fraction of the viewport width.
    pub horizontal: f64,
    /// Vertical margin as a fraction of the viewport height.
    pub vertical: f64,
}

impl ViewportClip {
    /// Whether `rect` lies entirely outside the expanded viewport.
    pub fn excludes(&self, rect: &Rect) -> bool {
        let Size { width, height } = self.viewport;
        let thresh_h = self.horizontal * width;
        let thresh_v = self.vertical * height;
        rect.x0 > thresh_h + width
            || rect.x1 < -thresh_h
            || rect.y0 > thresh_v + height
            || rect.y1 < -thresh_v
    }
}
