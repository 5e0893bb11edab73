// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key input: direction mapping, modifiers, and the key entry points.

use smallvec::{SmallVec, smallvec};

use sightline_spatial::Direction;

use crate::events::{MoveCause, NavEvent};
use crate::host::Host;
use crate::navigator::SpatialNavigator;

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    ///
    /// Any modifier makes the navigator ignore the key.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Alt / Option.
        const ALT   = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Meta / Command / Windows.
        const META  = 0b0000_0100;
        /// Shift.
        const SHIFT = 0b0000_1000;
    }
}

/// Whether the navigator consumed a key event.
///
/// [`KeyResponse::Handled`] means the embedder should prevent the platform's
/// default action and stop propagation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyResponse {
    /// The navigator did nothing with the key.
    Ignored,
    /// The navigator acted on the key.
    Handled,
}

impl KeyResponse {
    /// Whether the key was handled.
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Mapping from key codes to directions and the activation key.
///
/// The default uses the DOM key codes: 37 left, 38 up, 39 right, 40 down, and
/// 13 (Enter) to activate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMap {
    directions: SmallVec<[(u32, Direction); 4]>,
    activate: u32,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            directions: smallvec![
                (37, Direction::Left),
                (38, Direction::Up),
                (39, Direction::Right),
                (40, Direction::Down),
            ],
            activate: 13,
        }
    }
}

impl KeyMap {
    /// A map with no direction keys and the given activation key.
    pub fn empty(activate: u32) -> Self {
        Self {
            directions: SmallVec::new(),
            activate,
        }
    }

    /// Bind `code` to `direction`, replacing any earlier binding of `code`.
    pub fn bind(mut self, code: u32, direction: Direction) -> Self {
        self.directions.retain(|(c, _)| *c != code);
        self.directions.push((code, direction));
        self
    }

    /// The direction bound to `code`.
    pub fn direction(&self, code: u32) -> Option<Direction> {
        self.directions
            .iter()
            .find_map(|&(c, d)| (c == code).then_some(d))
    }

    /// Whether `code` is the activation key.
    pub fn is_activate(&self, code: u32) -> bool {
        code == self.activate
    }
}

impl<H: Host> SpatialNavigator<H> {
    /// Handle a key press.
    ///
    /// Directional keys move focus from the focused element. With nothing
    /// focused, focus returns to the last active section's last focused
    /// element, or to the best section. The activation key fires `EnterDown`.
    ///
    /// Ignored before [`init`](Self::init), with no sections, while paused,
    /// and when any modifier is held.
    pub fn on_key_down(&mut self, code: u32, modifiers: Modifiers) -> KeyResponse {
        if !self.ready || self.sections.is_empty() || self.paused || !modifiers.is_empty() {
            return KeyResponse::Ignored;
        }

        let Some(direction) = self.key_map.direction(code) else {
            if self.key_map.is_activate(code) {
                return self.activate(true);
            }
            return KeyResponse::Ignored;
        };

        let current = self.host.active_element().or_else(|| {
            self.last_section
                .as_ref()
                .and_then(|s| self.last_focused(s.as_str()))
        });
        let Some(current) = current else {
            self.focus_section(None);
            return KeyResponse::Handled;
        };
        let Some(section_id) = self.section_of(current) else {
            return KeyResponse::Ignored;
        };

        let will_move = NavEvent::WillMove {
            target: current,
            direction,
            section_id: section_id.clone(),
            cause: MoveCause::Keydown,
        };
        if self.fire(will_move).is_cancel() {
            tracing::debug!(%direction, "key move canceled by listener");
        } else {
            self.focus_next(direction, current, &section_id);
        }
        KeyResponse::Handled
    }

    /// Handle a key release. Only the activation key is of interest; it
    /// fires `EnterUp`.
    pub fn on_key_up(&mut self, code: u32, modifiers: Modifiers) -> KeyResponse {
        if !self.ready
            || !modifiers.is_empty()
            || self.paused
            || self.sections.is_empty()
            || !self.key_map.is_activate(code)
        {
            return KeyResponse::Ignored;
        }
        self.activate(false)
    }

    fn activate(&mut self, down: bool) -> KeyResponse {
        let Some(target) = self.host.active_element() else {
            return KeyResponse::Ignored;
        };
        if self.section_of(target).is_none() {
            return KeyResponse::Ignored;
        }
        let event = if down {
            NavEvent::EnterDown { target }
        } else {
            NavEvent::EnterUp { target }
        };
        if self.fire(event).is_cancel() {
            KeyResponse::Handled
        } else {
            KeyResponse::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{ElementId, MemoryHost};
    use crate::{ConfigPatch, EventKind, ExtSelector};
    use kurbo::Rect;
    use pretty_assertions::assert_eq;
    use sightline_events::Outcome;
    use std::cell::RefCell;
    use std::rc::Rc;

    const LEFT: u32 = 37;
    const RIGHT: u32 = 39;
    const ENTER: u32 = 13;

    fn row() -> (SpatialNavigator<MemoryHost>, ElementId, ElementId) {
        let mut host = MemoryHost::new();
        let a = host.element("div").class("k").rect(Rect::new(0.0, 0.0, 50.0, 50.0)).build();
        let b = host.element("div").class("k").rect(Rect::new(100.0, 0.0, 150.0, 50.0)).build();
        let mut nav = SpatialNavigator::new(host);
        nav.init(None);
        nav.add(ConfigPatch::with_selector(".k")).unwrap();
        (nav, a, b)
    }

    #[test]
    fn default_key_map() {
        let map = KeyMap::default();
        assert_eq!(map.direction(37), Some(Direction::Left));
        assert_eq!(map.direction(40), Some(Direction::Down));
        assert_eq!(map.direction(13), None);
        assert!(map.is_activate(13));

        let custom = KeyMap::empty(32).bind(4, Direction::Up).bind(4, Direction::Down);
        assert_eq!(custom.direction(4), Some(Direction::Down));
        assert_eq!(custom.direction(37), None);
        assert!(custom.is_activate(32));
    }

    #[test]
    fn arrow_keys_move_focus() {
        let (mut nav, a, b) = row();
        nav.focus(Some(&ExtSelector::Element(a)));
        assert_eq!(nav.on_key_down(RIGHT, Modifiers::empty()), KeyResponse::Handled);
        assert_eq!(nav.host().active_element(), Some(b));
        // A failed move is still handled.
        assert_eq!(nav.on_key_down(RIGHT, Modifiers::empty()), KeyResponse::Handled);
        assert_eq!(nav.host().active_element(), Some(b));
        assert_eq!(nav.on_key_down(65, Modifiers::empty()), KeyResponse::Ignored);
    }

    #[test]
    fn modifiers_pause_and_readiness_are_respected() {
        let (mut nav, a, _) = row();
        nav.focus(Some(&ExtSelector::Element(a)));
        assert_eq!(nav.on_key_down(RIGHT, Modifiers::SHIFT), KeyResponse::Ignored);
        nav.pause();
        assert_eq!(nav.on_key_down(RIGHT, Modifiers::empty()), KeyResponse::Ignored);
        nav.resume();
        assert_eq!(nav.host().active_element(), Some(a));

        let mut idle = SpatialNavigator::new(MemoryHost::new());
        idle.add(ConfigPatch::default()).unwrap();
        assert_eq!(idle.on_key_down(RIGHT, Modifiers::empty()), KeyResponse::Ignored);
    }

    #[test]
    fn key_with_nothing_focused_restores_focus() {
        let (mut nav, a, b) = row();
        assert_eq!(nav.on_key_down(LEFT, Modifiers::empty()), KeyResponse::Handled);
        assert_eq!(nav.host().active_element(), Some(a));

        nav.focus(Some(&ExtSelector::Element(b)));
        nav.host_mut().blur(b);
        // Resumes from the last focused element of the last active section.
        assert_eq!(nav.on_key_down(LEFT, Modifiers::empty()), KeyResponse::Handled);
        assert_eq!(nav.host().active_element(), Some(a));
    }

    #[test]
    fn will_move_carries_keydown_cause() {
        let (mut nav, a, _) = row();
        nav.focus(Some(&ExtSelector::Element(a)));
        nav.on(EventKind::WillMove, |_, event| {
            assert!(matches!(event, NavEvent::WillMove { cause: MoveCause::Keydown, .. }));
            Outcome::Cancel
        });
        assert_eq!(nav.on_key_down(RIGHT, Modifiers::empty()), KeyResponse::Handled);
        assert_eq!(nav.host().active_element(), Some(a));
    }

    #[test]
    fn enter_down_and_up_report_vetoes() {
        let (mut nav, a, _) = row();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        nav.on_any(move |_, event| {
            let kind = sightline_events::Event::kind(event);
            sink.borrow_mut().push(kind);
            if kind == EventKind::EnterUp {
                Outcome::Cancel
            } else {
                Outcome::Proceed
            }
        });
        // Nothing focused: nothing to activate.
        assert_eq!(nav.on_key_down(ENTER, Modifiers::empty()), KeyResponse::Ignored);

        nav.focus_silently(Some(&ExtSelector::Element(a)));
        assert_eq!(nav.on_key_down(ENTER, Modifiers::empty()), KeyResponse::Ignored);
        assert_eq!(nav.on_key_up(ENTER, Modifiers::empty()), KeyResponse::Handled);
        assert_eq!(nav.on_key_up(ENTER, Modifiers::CTRL), KeyResponse::Ignored);
        assert_eq!(nav.on_key_up(RIGHT, Modifiers::empty()), KeyResponse::Ignored);
        assert_eq!(*seen.borrow(), [EventKind::EnterDown, EventKind::EnterUp]);
    }

    #[test]
    fn focus_from_enter_listener_honours_vetoes() {
        let (mut nav, a, b) = row();
        nav.focus(Some(&ExtSelector::Element(a)));

        let focused = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&focused);
        nav.on(EventKind::Focused, move |_, event| {
            sink.borrow_mut().push(event.target());
            Outcome::Proceed
        });
        nav.on(EventKind::WillFocus, move |_, event| (event.target() != b).into());
        let nested = Rc::new(RefCell::new(None));
        let result = Rc::clone(&nested);
        nav.on(EventKind::EnterDown, move |nav, _| {
            *result.borrow_mut() = Some(nav.focus(Some(&ExtSelector::Element(b))));
            Outcome::Proceed
        });

        nav.on_key_down(ENTER, Modifiers::empty());
        assert_eq!(*nested.borrow(), Some(false));
        assert!(focused.borrow().is_empty());
        assert_ne!(nav.host().active_element(), Some(b));
    }
}
