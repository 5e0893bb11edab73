// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The capability boundary between the navigator and the UI it drives.
//!
//! A [`Host`] owns the elements. The navigator only reads their geometry and
//! attributes, resolves selectors through the host, and asks it to move
//! platform focus. It never stores anything but copyable element handles, and
//! re-validates those handles through the host on every read.

use core::fmt::Debug;

use kurbo::{Rect, Size};

/// Access to the element tree, its layout, and platform focus.
///
/// Calling [`Host::focus`] or [`Host::blur`] must not synchronously re-enter
/// the navigator. Focus changes that originate outside the navigator (a
/// pointer click, a screen reader) are reported back by the embedder through
/// [`SpatialNavigator::on_native_focus`](crate::SpatialNavigator::on_native_focus)
/// and [`SpatialNavigator::on_native_blur`](crate::SpatialNavigator::on_native_blur).
pub trait Host {
    /// Handle to one element. Handles are compared, copied, and stored as weak
    /// references; they never keep an element alive.
    type Element: Copy + Eq + Debug;

    /// Current on-screen bounds of `element`, in viewport coordinates.
    ///
    /// Returns `None` when the element has no layout (for example, it is
    /// detached from the tree).
    fn bounding_rect(&self, element: Self::Element) -> Option<Rect>;

    /// Size of the visible viewport. Its origin is `(0, 0)`.
    fn viewport_size(&self) -> Size;

    /// All elements matching `selector`, in document order.
    ///
    /// A selector the host cannot parse matches nothing.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Whether `element` matches `selector`.
    fn matches(&self, element: Self::Element, selector: &str) -> bool;

    /// Value of the attribute `name` on `element`, if present.
    fn attribute(&self, element: Self::Element, name: &str) -> Option<String>;

    /// Whether `element` carries the attribute `name`.
    fn has_attribute(&self, element: Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    /// Set the attribute `name` on `element`.
    fn set_attribute(&mut self, element: Self::Element, name: &str, value: &str);

    /// The element that currently holds platform focus, if any.
    fn active_element(&self) -> Option<Self::Element>;

    /// Give platform focus to `element`.
    fn focus(&mut self, element: Self::Element);

    /// Remove platform focus from `element`.
    fn blur(&mut self, element: Self::Element);
}
