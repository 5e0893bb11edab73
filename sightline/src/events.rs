// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus events fired by the navigator.
//!
//! Cancelable events (`WillMove`, `WillFocus`, `WillUnfocus`, `EnterDown`,
//! `EnterUp`) can be vetoed by returning [`Outcome::Cancel`] from a listener.
//! The others are notifications.
//!
//! [`Outcome::Cancel`]: sightline_events::Outcome::Cancel

use sightline_spatial::Direction;

use crate::section::SectionId;

/// What triggered a [`NavEvent::WillMove`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveCause {
    /// A directional key.
    Keydown,
    /// [`SpatialNavigator::move_focus`](crate::SpatialNavigator::move_focus).
    Api,
}

/// Details of a focus gain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusDetail<E> {
    /// Element that held focus before, if known.
    pub previous_element: Option<E>,
    /// Section the element is focused in.
    pub section_id: SectionId,
    /// Direction of the move, if focus moved directionally.
    pub direction: Option<Direction>,
    /// Whether focus was moved by the platform rather than the navigator.
    pub native: bool,
}

/// Details of a focus loss.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnfocusDetail<E> {
    /// Element about to receive focus, if known.
    pub next_element: Option<E>,
    /// Section of `next_element`, if known.
    pub next_section_id: Option<SectionId>,
    /// Direction of the move, if focus moved directionally.
    pub direction: Option<Direction>,
    /// Whether focus was moved by the platform rather than the navigator.
    pub native: bool,
}

/// An event fired by a [`SpatialNavigator`](crate::SpatialNavigator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent<E> {
    /// A directional move is about to be computed. Cancelable.
    WillMove {
        /// The element the move starts from.
        target: E,
        /// Requested direction.
        direction: Direction,
        /// Section of `target`.
        section_id: SectionId,
        /// What requested the move.
        cause: MoveCause,
    },
    /// `target` is about to lose focus. Cancelable.
    WillUnfocus {
        /// The element losing focus.
        target: E,
        /// Details.
        detail: UnfocusDetail<E>,
    },
    /// `target` lost focus.
    Unfocused {
        /// The element that lost focus.
        target: E,
        /// Details.
        detail: UnfocusDetail<E>,
    },
    /// `target` is about to gain focus. Cancelable.
    WillFocus {
        /// The element gaining focus.
        target: E,
        /// Details.
        detail: FocusDetail<E>,
    },
    /// `target` gained focus.
    Focused {
        /// The element that gained focus.
        target: E,
        /// Details.
        detail: FocusDetail<E>,
    },
    /// A directional move from `target` found no destination.
    NavigateFailed {
        /// The element the move started from.
        target: E,
        /// Requested direction.
        direction: Direction,
    },
    /// The activation key went down on `target`. Cancelable.
    EnterDown {
        /// The focused element.
        target: E,
    },
    /// The activation key went up on `target`. Cancelable.
    EnterUp {
        /// The focused element.
        target: E,
    },
}

/// Discriminant of a [`NavEvent`], used to register for one event type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`NavEvent::WillMove`]
    WillMove,
    /// [`NavEvent::WillUnfocus`]
    WillUnfocus,
    /// [`NavEvent::Unfocused`]
    Unfocused,
    /// [`NavEvent::WillFocus`]
    WillFocus,
    /// [`NavEvent::Focused`]
    Focused,
    /// [`NavEvent::NavigateFailed`]
    NavigateFailed,
    /// [`NavEvent::EnterDown`]
    EnterDown,
    /// [`NavEvent::EnterUp`]
    EnterUp,
}

impl EventKind {
    /// The DOM event name, without the `sn:` prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WillMove => "willmove",
            Self::WillUnfocus => "willunfocus",
            Self::Unfocused => "unfocused",
            Self::WillFocus => "willfocus",
            Self::Focused => "focused",
            Self::NavigateFailed => "navigatefailed",
            Self::EnterDown => "enter-down",
            Self::EnterUp => "enter-up",
        }
    }
}

impl<E: Copy> NavEvent<E> {
    /// The element the event is fired on.
    pub fn target(&self) -> E {
        match self {
            Self::WillMove { target, .. }
            | Self::WillUnfocus { target, .. }
            | Self::Unfocused { target, .. }
            | Self::WillFocus { target, .. }
            | Self::Focused { target, .. }
            | Self::NavigateFailed { target, .. }
            | Self::EnterDown { target }
            | Self::EnterUp { target } => *target,
        }
    }
}

impl<E> sightline_events::Event for NavEvent<E> {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Self::WillMove { .. } => EventKind::WillMove,
            Self::WillUnfocus { .. } => EventKind::WillUnfocus,
            Self::Unfocused { .. } => EventKind::Unfocused,
            Self::WillFocus { .. } => EventKind::WillFocus,
            Self::Focused { .. } => EventKind::Focused,
            Self::NavigateFailed { .. } => EventKind::NavigateFailed,
            Self::EnterDown { .. } => EventKind::EnterDown,
            Self::EnterUp { .. } => EventKind::EnterUp,
        }
    }

    fn cancelable(&self) -> bool {
        !matches!(
            self,
            Self::Unfocused { .. } | Self::Focused { .. } | Self::NavigateFailed { .. }
        )
    }
}
