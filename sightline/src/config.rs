// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation policy: global defaults, per-section overrides, and the JSON
//! configuration document.
//!
//! [`GlobalConfig`] holds the process-wide policy. Sections store a
//! [`ConfigPatch`] whose unset fields fall back to the global value; the merged
//! view for one section is an [`Effective`].
//!
//! Configuration documents use the camelCase keys of the JavaScript spatial navigation API:
//!
//! ```
//! use sightline::{ConfigPatch, Direction, EnterTo, RestrictMode};
//!
//! let patch: ConfigPatch<u32> = ConfigPatch::from_json(r#"{
//!     "selector": ".menu-item",
//!     "enterTo": "last-focused",
//!     "restrict": "self-first",
//!     "leaveFor": { "right": "", "down": "@footer" },
//!     "someUnknownKey": 1
//! }"#).unwrap();
//!
//! assert_eq!(patch.enter_to, Some(EnterTo::LastFocused));
//! assert_eq!(patch.restrict, Some(RestrictMode::SelfFirst));
//! let leave = patch.leave_for.unwrap();
//! assert!(leave.get(Direction::Right).is_some_and(|t| t.is_block()));
//! assert!(leave.get(Direction::Left).is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use sightline_spatial::{Direction, ViewportClip};

use crate::error::Result;
use crate::section::SectionId;
use crate::selector::ExtSelector;

/// Which element receives focus when a move enters a section.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnterTo {
    /// The geometric winner.
    #[default]
    #[serde(rename = "")]
    Geometric,
    /// The section's last focused element, else its default element.
    LastFocused,
    /// The section's default element.
    DefaultElement,
}

/// Which candidates a directional move may consider.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestrictMode {
    /// Only the current section; other sections are tried if it has no winner.
    SelfFirst,
    /// Only the current section.
    #[default]
    SelfOnly,
    /// Every section.
    None,
}

/// What happens when a move would leave a section in some direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaveTarget<E> {
    /// The move fails.
    Block,
    /// Focus goes to this target instead of the geometric winner.
    Redirect(ExtSelector<E>),
}

impl<E> LeaveTarget<E> {
    /// Whether this target blocks the move.
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block)
    }

    /// Parse the string form: empty blocks, anything else is an
    /// [`ExtSelector`].
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            Self::Block
        } else {
            Self::Redirect(ExtSelector::parse(s))
        }
    }
}

/// Per-direction leave targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaveFor<E> {
    targets: [Option<LeaveTarget<E>>; 4],
}

impl<E> Default for LeaveFor<E> {
    fn default() -> Self {
        Self {
            targets: [None, None, None, None],
        }
    }
}

impl<E> LeaveFor<E> {
    /// An empty map; every direction lets the geometric winner stand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`LeaveFor::set`].
    pub fn with(mut self, direction: Direction, target: LeaveTarget<E>) -> Self {
        self.set(direction, Some(target));
        self
    }

    /// Set or clear the target for `direction`.
    pub fn set(&mut self, direction: Direction, target: Option<LeaveTarget<E>>) {
        self.targets[direction.index()] = target;
    }

    /// The target for `direction`, if any.
    pub fn get(&self, direction: Direction) -> Option<&LeaveTarget<E>> {
        self.targets[direction.index()].as_ref()
    }
}

/// Caller-supplied predicate that can veto an element's navigability.
///
/// Receives the element and the id of the section it is checked against.
#[derive(Clone)]
pub struct NavigableFilter<E>(Rc<dyn Fn(E, &SectionId) -> bool>);

impl<E> NavigableFilter<E> {
    /// Wrap a predicate.
    pub fn new(f: impl Fn(E, &SectionId) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Evaluate the predicate.
    pub fn accepts(&self, element: E, section: &SectionId) -> bool {
        (self.0)(element, section)
    }
}

impl<E> fmt::Debug for NavigableFilter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NavigableFilter(..)")
    }
}

/// Elements that [`make_focusable`](crate::SpatialNavigator::make_focusable)
/// leaves alone by default, since they are natively focusable.
pub const DEFAULT_TAB_INDEX_IGNORE_LIST: &str =
    "a, input, select, textarea, button, iframe, [contentEditable=true]";

/// Process-wide navigation policy.
#[derive(Clone, Debug)]
pub struct GlobalConfig<E> {
    /// Membership selector for sections that do not set their own.
    pub selector: Option<ExtSelector<E>>,
    /// Drop the diagonal fallback tier.
    pub straight_only: bool,
    /// Fraction of the reference span a diagonal candidate must overlap to
    /// count as straight; in `[0, 1]`.
    pub straight_overlap_threshold: f64,
    /// Reversing a move returns to its source.
    pub remember_source: bool,
    /// Preferred element when focusing a section.
    pub default_element: Option<ExtSelector<E>>,
    /// Policy applied when a move enters a section.
    pub enter_to: EnterTo,
    /// Per-direction leave targets.
    pub leave_for: Option<LeaveFor<E>>,
    /// Candidate restriction.
    pub restrict: RestrictMode,
    /// Drop candidates lying well outside the viewport.
    pub restrict_outside_viewport: bool,
    /// Vertical viewport margin, as a fraction of its height.
    pub restrict_outside_viewport_vertical: f64,
    /// Horizontal viewport margin, as a fraction of its width.
    pub restrict_outside_viewport_horizontal: f64,
    /// Selector for elements that never get a synthetic tab index.
    pub tab_index_ignore_list: String,
    /// Extra navigability predicate.
    pub navigable_filter: Option<NavigableFilter<E>>,
}

impl<E> Default for GlobalConfig<E> {
    fn default() -> Self {
        Self {
            selector: None,
            straight_only: true,
            straight_overlap_threshold: 0.5,
            remember_source: false,
            default_element: None,
            enter_to: EnterTo::Geometric,
            leave_for: None,
            restrict: RestrictMode::SelfOnly,
            restrict_outside_viewport: true,
            restrict_outside_viewport_vertical: 0.25,
            restrict_outside_viewport_horizontal: 0.25,
            tab_index_ignore_list: DEFAULT_TAB_INDEX_IGNORE_LIST.into(),
            navigable_filter: None,
        }
    }
}

impl<E> GlobalConfig<E> {
    /// Overwrite every field that `patch` sets.
    ///
    /// `id` and `disabled` only apply to sections and are ignored here.
    pub fn apply(&mut self, patch: ConfigPatch<E>) {
        let ConfigPatch {
            id: _,
            disabled: _,
            selector,
            straight_only,
            straight_overlap_threshold,
            remember_source,
            default_element,
            enter_to,
            leave_for,
            restrict,
            restrict_outside_viewport,
            restrict_outside_viewport_vertical,
            restrict_outside_viewport_horizontal,
            tab_index_ignore_list,
            navigable_filter,
        } = patch.sanitized();

        if let Some(v) = selector {
            self.selector = Some(v);
        }
        if let Some(v) = straight_only {
            self.straight_only = v;
        }
        if let Some(v) = straight_overlap_threshold {
            self.straight_overlap_threshold = v;
        }
        if let Some(v) = remember_source {
            self.remember_source = v;
        }
        if let Some(v) = default_element {
            self.default_element = Some(v);
        }
        if let Some(v) = enter_to {
            self.enter_to = v;
        }
        if let Some(v) = leave_for {
            self.leave_for = Some(v);
        }
        if let Some(v) = restrict {
            self.restrict = v;
        }
        if let Some(v) = restrict_outside_viewport {
            self.restrict_outside_viewport = v;
        }
        if let Some(v) = restrict_outside_viewport_vertical {
            self.restrict_outside_viewport_vertical = v;
        }
        if let Some(v) = restrict_outside_viewport_horizontal {
            self.restrict_outside_viewport_horizontal = v;
        }
        if let Some(v) = tab_index_ignore_list {
            self.tab_index_ignore_list = v;
        }
        if let Some(v) = navigable_filter {
            self.navigable_filter = Some(v);
        }
    }
}

/// A partial configuration: every field is optional.
///
/// Used for [`SpatialNavigator::set`](crate::SpatialNavigator::set), for
/// section creation and updates, and as the stored overrides of a section.
#[derive(Clone, Debug)]
pub struct ConfigPatch<E> {
    /// Requested section id; only read by `add`.
    pub id: Option<SectionId>,
    /// Section disabled flag; ignored for the global configuration.
    pub disabled: Option<bool>,
    /// See [`GlobalConfig::selector`].
    pub selector: Option<ExtSelector<E>>,
    /// See [`GlobalConfig::straight_only`].
    pub straight_only: Option<bool>,
    /// See [`GlobalConfig::straight_overlap_threshold`].
    pub straight_overlap_threshold: Option<f64>,
    /// See [`GlobalConfig::remember_source`].
    pub remember_source: Option<bool>,
    /// See [`GlobalConfig::default_element`].
    pub default_element: Option<ExtSelector<E>>,
    /// See [`GlobalConfig::enter_to`].
    pub enter_to: Option<EnterTo>,
    /// See [`GlobalConfig::leave_for`].
    pub leave_for: Option<LeaveFor<E>>,
    /// See [`GlobalConfig::restrict`].
    pub restrict: Option<RestrictMode>,
    /// See [`GlobalConfig::restrict_outside_viewport`].
    pub restrict_outside_viewport: Option<bool>,
    /// See [`GlobalConfig::restrict_outside_viewport_vertical`].
    pub restrict_outside_viewport_vertical: Option<f64>,
    /// See [`GlobalConfig::restrict_outside_viewport_horizontal`].
    pub restrict_outside_viewport_horizontal: Option<f64>,
    /// See [`GlobalConfig::tab_index_ignore_list`].
    pub tab_index_ignore_list: Option<String>,
    /// See [`GlobalConfig::navigable_filter`].
    pub navigable_filter: Option<NavigableFilter<E>>,
}

impl<E> Default for ConfigPatch<E> {
    fn default() -> Self {
        Self {
            id: None,
            disabled: None,
            selector: None,
            straight_only: None,
            straight_overlap_threshold: None,
            remember_source: None,
            default_element: None,
            enter_to: None,
            leave_for: None,
            restrict: None,
            restrict_outside_viewport: None,
            restrict_outside_viewport_vertical: None,
            restrict_outside_viewport_horizontal: None,
            tab_index_ignore_list: None,
            navigable_filter: None,
        }
    }
}

impl<E> ConfigPatch<E> {
    /// A patch that only sets the membership selector.
    pub fn with_selector(selector: impl Into<ExtSelector<E>>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document.
    ///
    /// Unknown keys are ignored. `navigableFilter` cannot be expressed in
    /// JSON and is always unset.
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: WireConfig = serde_json::from_str(json)?;
        Ok(wire.into_patch())
    }

    /// Overwrite every field of `self` that `other` sets.
    pub fn merge(&mut self, other: Self) {
        let other = other.sanitized();
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            id,
            disabled,
            selector,
            straight_only,
            straight_overlap_threshold,
            remember_source,
            default_element,
            enter_to,
            leave_for,
            restrict,
            restrict_outside_viewport,
            restrict_outside_viewport_vertical,
            restrict_outside_viewport_horizontal,
            tab_index_ignore_list,
            navigable_filter
        );
    }

    /// Clamp numeric fields into their valid ranges.
    pub(crate) fn sanitized(mut self) -> Self {
        if let Some(t) = self.straight_overlap_threshold {
            let clamped = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
            if clamped != t {
                tracing::warn!(value = t, clamped, "straightOverlapThreshold out of range");
                self.straight_overlap_threshold = Some(clamped);
            }
        }
        for (name, margin) in [
            (
                "restrictOutSideViewportVertical",
                &mut self.restrict_outside_viewport_vertical,
            ),
            (
                "restrictOutSideViewportHorizontal",
                &mut self.restrict_outside_viewport_horizontal,
            ),
        ] {
            if let Some(m) = *margin
                && (m.is_nan() || m < 0.0)
            {
                tracing::warn!(key = name, value = m, "viewport margin must be non-negative");
                *margin = Some(0.0);
            }
        }
        self
    }
}

/// Merged view of the global configuration and one section's overrides.
#[derive(Debug)]
pub struct Effective<'a, E> {
    pub(crate) global: &'a GlobalConfig<E>,
    pub(crate) local: Option<&'a ConfigPatch<E>>,
}

impl<'a, E> Effective<'a, E> {
    /// View of the global configuration alone.
    pub fn global(global: &'a GlobalConfig<E>) -> Self {
        Self {
            global,
            local: None,
        }
    }

    /// View of `local` falling back to `global`.
    pub fn new(global: &'a GlobalConfig<E>, local: &'a ConfigPatch<E>) -> Self {
        Self {
            global,
            local: Some(local),
        }
    }

    fn pick<T: ?Sized>(
        &self,
        local: impl FnOnce(&'a ConfigPatch<E>) -> Option<&'a T>,
        global: impl FnOnce(&'a GlobalConfig<E>) -> &'a T,
    ) -> &'a T {
        self.local.and_then(local).unwrap_or_else(|| global(self.global))
    }

    /// Membership selector.
    pub fn selector(&self) -> Option<&'a ExtSelector<E>> {
        self.local
            .and_then(|l| l.selector.as_ref())
            .or(self.global.selector.as_ref())
    }

    /// See [`GlobalConfig::straight_only`].
    pub fn straight_only(&self) -> bool {
        *self.pick(|l| l.straight_only.as_ref(), |g| &g.straight_only)
    }

    /// See [`GlobalConfig::straight_overlap_threshold`].
    pub fn straight_overlap_threshold(&self) -> f64 {
        *self.pick(
            |l| l.straight_overlap_threshold.as_ref(),
            |g| &g.straight_overlap_threshold,
        )
    }

    /// See [`GlobalConfig::remember_source`].
    pub fn remember_source(&self) -> bool {
        *self.pick(|l| l.remember_source.as_ref(), |g| &g.remember_source)
    }

    /// See [`GlobalConfig::default_element`].
    pub fn default_element(&self) -> Option<&'a ExtSelector<E>> {
        self.local
            .and_then(|l| l.default_element.as_ref())
            .or(self.global.default_element.as_ref())
    }

    /// See [`GlobalConfig::enter_to`].
    pub fn enter_to(&self) -> EnterTo {
        *self.pick(|l| l.enter_to.as_ref(), |g| &g.enter_to)
    }

    /// The leave target for `direction`.
    ///
    /// A section that sets its own leave map replaces the global one entirely.
    pub fn leave_for(&self, direction: Direction) -> Option<&'a LeaveTarget<E>> {
        self.local
            .and_then(|l| l.leave_for.as_ref())
            .or(self.global.leave_for.as_ref())
            .and_then(|map| map.get(direction))
    }

    /// See [`GlobalConfig::restrict`].
    pub fn restrict(&self) -> RestrictMode {
        *self.pick(|l| l.restrict.as_ref(), |g| &g.restrict)
    }

    /// Viewport exclusion for a viewport of `size`, or `None` when disabled.
    pub fn viewport_clip(&self, size: kurbo::Size) -> Option<ViewportClip> {
        let enabled = *self.pick(
            |l| l.restrict_outside_viewport.as_ref(),
            |g| &g.restrict_outside_viewport,
        );
        enabled.then(|| ViewportClip {
            viewport: size,
            horizontal: *self.pick(
                |l| l.restrict_outside_viewport_horizontal.as_ref(),
                |g| &g.restrict_outside_viewport_horizontal,
            ),
            vertical: *self.pick(
                |l| l.restrict_outside_viewport_vertical.as_ref(),
                |g| &g.restrict_outside_viewport_vertical,
            ),
        })
    }

    /// See [`GlobalConfig::tab_index_ignore_list`].
    pub fn tab_index_ignore_list(&self) -> &'a str {
        self.pick(
            |l| l.tab_index_ignore_list.as_deref(),
            |g| g.tab_index_ignore_list.as_str(),
        )
    }

    /// See [`GlobalConfig::navigable_filter`].
    pub fn navigable_filter(&self) -> Option<&'a NavigableFilter<E>> {
        self.local
            .and_then(|l| l.navigable_filter.as_ref())
            .or(self.global.navigable_filter.as_ref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConfig {
    id: Option<String>,
    disabled: Option<bool>,
    selector: Option<String>,
    straight_only: Option<bool>,
    straight_overlap_threshold: Option<f64>,
    remember_source: Option<bool>,
    default_element: Option<String>,
    enter_to: Option<EnterTo>,
    leave_for: Option<BTreeMap<String, String>>,
    restrict: Option<RestrictMode>,
    #[serde(rename = "restrictOutSideViewport")]
    restrict_outside_viewport: Option<bool>,
    #[serde(rename = "restrictOutSideViewportVertical")]
    restrict_outside_viewport_vertical: Option<f64>,
    #[serde(rename = "restrictOutSideViewportHorizontal")]
    restrict_outside_viewport_horizontal: Option<f64>,
    tab_index_ignore_list: Option<String>,
}

impl WireConfig {
    fn into_patch<E>(self) -> ConfigPatch<E> {
        let leave_for = self.leave_for.map(|raw| {
            let mut map = LeaveFor::new();
            for (key, value) in raw {
                match key.parse::<Direction>() {
                    Ok(direction) => map.set(direction, Some(LeaveTarget::parse(&value))),
                    Err(_) => tracing::warn!(key = %key, "ignoring leaveFor entry for unknown direction"),
                }
            }
            map
        });
        ConfigPatch {
            id: self.id.map(SectionId::from),
            disabled: self.disabled,
            selector: self.selector.map(ExtSelector::from),
            straight_only: self.straight_only,
            straight_overlap_threshold: self.straight_overlap_threshold,
            remember_source: self.remember_source,
            default_element: self.default_element.map(ExtSelector::from),
            enter_to: self.enter_to,
            leave_for,
            restrict: self.restrict,
            restrict_outside_viewport: self.restrict_outside_viewport,
            restrict_outside_viewport_vertical: self.restrict_outside_viewport_vertical,
            restrict_outside_viewport_horizontal: self.restrict_outside_viewport_horizontal,
            tab_index_ignore_list: self.tab_index_ignore_list,
            navigable_filter: None,
        }
        .sanitized()
    }
}
