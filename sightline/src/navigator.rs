// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigator: owned state and the public operations.

use std::fmt;

use sightline_events::{ListenerId, Listeners, Outcome};
use sightline_spatial::Direction;

use crate::config::{ConfigPatch, Effective, GlobalConfig};
use crate::error::{Error, Result};
use crate::events::{EventKind, MoveCause, NavEvent};
use crate::focus::TransferState;
use crate::host::Host;
use crate::input::KeyMap;
use crate::section::{Section, SectionId, SectionRegistry};
use crate::selector::ExtSelector;

/// Spatial navigation state for one UI.
///
/// A navigator owns its [`Host`], its configuration, and its sections. Several
/// navigators can coexist; none of them touches global state.
///
/// Listeners registered with [`SpatialNavigator::on`] receive `&mut Self` and
/// may call back into any operation. Events fired by those nested calls reach
/// every listener except the one that is running. Focus changes requested
/// while a transfer is in progress happen silently.
pub struct SpatialNavigator<H: Host> {
    pub(crate) host: H,
    pub(crate) config: GlobalConfig<H::Element>,
    pub(crate) sections: SectionRegistry<H::Element>,
    pub(crate) listeners: Listeners<Self, NavEvent<H::Element>>,
    pub(crate) key_map: KeyMap,
    pub(crate) ready: bool,
    pub(crate) paused: bool,
    pub(crate) default_section: Option<SectionId>,
    pub(crate) last_section: Option<SectionId>,
    pub(crate) transfer: TransferState,
    pub(crate) pending_refocus: Option<H::Element>,
}

impl<H: Host> fmt::Debug for SpatialNavigator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialNavigator")
            .field("sections", &self.sections.len())
            .field("listeners", &self.listeners.len())
            .field("ready", &self.ready)
            .field("paused", &self.paused)
            .field("default_section", &self.default_section)
            .field("last_section", &self.last_section)
            .field("transfer", &self.transfer)
            .field("pending_refocus", &self.pending_refocus)
            .finish_non_exhaustive()
    }
}

impl<H: Host> SpatialNavigator<H> {
    /// A navigator over `host` with the default configuration and key map.
    ///
    /// Input entry points are ignored until [`SpatialNavigator::init`].
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: GlobalConfig::default(),
            sections: SectionRegistry::new(),
            listeners: Listeners::new(),
            key_map: KeyMap::default(),
            ready: false,
            paused: false,
            default_section: None,
            last_section: None,
            transfer: TransferState::Idle,
            pending_refocus: None,
        }
    }

    /// Start accepting input. Idempotent; `config` replaces the global
    /// configuration only on the first call.
    pub fn init(&mut self, config: Option<GlobalConfig<H::Element>>) {
        if self.ready {
            return;
        }
        if let Some(config) = config {
            self.config = config;
        }
        self.ready = true;
        tracing::debug!("navigator initialized");
    }

    /// Stop accepting input, drop every section, and reset the id generator.
    pub fn uninit(&mut self) {
        self.clear();
        self.sections.reset_ids();
        self.ready = false;
        tracing::debug!("navigator uninitialized");
    }

    /// Drop every section and forget the default and last active section.
    pub fn clear(&mut self) {
        self.sections.clear();
        self.default_section = None;
        self.last_section = None;
        self.transfer = TransferState::Idle;
        self.pending_refocus = None;
    }

    /// Update the global configuration.
    pub fn set(&mut self, patch: ConfigPatch<H::Element>) {
        self.config.apply(patch);
    }

    /// Update the configuration of section `id`.
    pub fn set_section(&mut self, id: &str, patch: ConfigPatch<H::Element>) -> Result<()> {
        let section = self
            .sections
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(SectionId::from(id)))?;
        section.update(patch);
        Ok(())
    }

    /// Register a section. Its id is `patch.id`, or a generated `section-<n>`.
    pub fn add(&mut self, patch: ConfigPatch<H::Element>) -> Result<SectionId> {
        self.add_with_id("", patch)
    }

    /// Register a section named `id`.
    ///
    /// An empty `id` falls back to `patch.id`, then to a generated id.
    pub fn add_with_id(&mut self, id: &str, mut patch: ConfigPatch<H::Element>) -> Result<SectionId> {
        let requested = patch.id.take();
        let id = if !id.is_empty() {
            SectionId::from(id)
        } else if let Some(requested) = requested {
            requested
        } else {
            self.sections.generate_id()
        };
        self.sections.insert(Section::new(id.clone(), patch))?;
        tracing::debug!(section = %id, "section added");
        Ok(id)
    }

    /// Unregister section `id`. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        if id.is_empty() {
            return Err(Error::InvalidArgument("section id must not be empty"));
        }
        let removed = self.sections.remove(id).is_some();
        if removed {
            tracing::debug!(section = id, "section removed");
        }
        Ok(removed)
    }

    /// Disable section `id`. Returns whether it exists.
    pub fn disable(&mut self, id: &str) -> bool {
        self.set_disabled(id, true)
    }

    /// Enable section `id`. Returns whether it exists.
    pub fn enable(&mut self, id: &str) -> bool {
        self.set_disabled(id, false)
    }

    fn set_disabled(&mut self, id: &str, disabled: bool) -> bool {
        match self.sections.get_mut(id) {
            Some(section) => {
                section.disabled = disabled;
                true
            }
            None => false,
        }
    }

    /// Suspend events: focus still moves, but silently.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume firing events.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Focus `target`, or the best section when `target` is `None`.
    ///
    /// A [`ExtSelector::Pattern`] that equals a registered section id focuses
    /// that section. Returns whether focus moved.
    pub fn focus(&mut self, target: Option<&ExtSelector<H::Element>>) -> bool {
        self.focus_with(target, false)
    }

    /// Like [`SpatialNavigator::focus`], but without firing events.
    pub fn focus_silently(&mut self, target: Option<&ExtSelector<H::Element>>) -> bool {
        self.focus_with(target, true)
    }

    fn focus_with(&mut self, target: Option<&ExtSelector<H::Element>>, silent: bool) -> bool {
        let auto_pause = silent && !self.paused;
        if auto_pause {
            self.pause();
        }
        let moved = match target {
            None => self.focus_section(None),
            Some(ExtSelector::Pattern(p)) if self.sections.contains(p) => {
                self.focus_section(Some(p.as_str()))
            }
            Some(selector) => self.focus_ext(selector, None),
        };
        if auto_pause {
            self.resume();
        }
        moved
    }

    /// Move focus in `direction`, starting from the first element of `from`
    /// or from the focused element.
    ///
    /// Fires a cancelable [`NavEvent::WillMove`] with [`MoveCause::Api`].
    /// Returns whether focus moved.
    pub fn move_focus(
        &mut self,
        direction: Direction,
        from: Option<&ExtSelector<H::Element>>,
    ) -> bool {
        let origin = match from {
            Some(selector) => selector.first(&self.host),
            None => self.host.active_element(),
        };
        let Some(origin) = origin else {
            return false;
        };
        let Some(section_id) = self.section_of(origin) else {
            return false;
        };
        let will_move = NavEvent::WillMove {
            target: origin,
            direction,
            section_id: section_id.clone(),
            cause: MoveCause::Api,
        };
        if self.fire(will_move).is_cancel() {
            tracing::debug!(%direction, "move canceled by listener");
            return false;
        }
        self.focus_next(direction, origin, &section_id)
    }

    /// Give a `tabindex="-1"` to the elements of section `id` (or of every
    /// section) that have none, unless they match the ignore list.
    pub fn make_focusable(&mut self, id: Option<&str>) -> Result<()> {
        let targets: Vec<H::Element> = {
            let sections: Vec<&Section<H::Element>> = match id {
                Some(id) if !id.is_empty() => vec![
                    self.sections
                        .get(id)
                        .ok_or_else(|| Error::NotFound(SectionId::from(id)))?,
                ],
                _ => self.sections.iter().collect(),
            };
            let mut targets = Vec::new();
            for section in sections {
                let effective = Effective::new(&self.config, &section.config);
                let Some(selector) = effective.selector() else {
                    continue;
                };
                let ignore = effective.tab_index_ignore_list();
                targets.extend(selector.elements(&self.host).into_iter().filter(|&e| {
                    !self.host.matches(e, ignore)
                        && self
                            .host
                            .attribute(e, "tabindex")
                            .is_none_or(|v| v.is_empty())
                }));
            }
            targets
        };
        for element in targets {
            self.host.set_attribute(element, "tabindex", "-1");
        }
        Ok(())
    }

    /// Set the section preferred by [`SpatialNavigator::focus`] with no
    /// target. `None` or an empty id clears it.
    pub fn set_default_section(&mut self, id: Option<&str>) -> Result<()> {
        match id {
            None | Some("") => self.default_section = None,
            Some(id) if !self.sections.contains(id) => {
                return Err(Error::NotFound(SectionId::from(id)));
            }
            Some(id) => self.default_section = Some(SectionId::from(id)),
        }
        Ok(())
    }

    /// Register a listener for events of `kind`.
    pub fn on(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&mut Self, &NavEvent<H::Element>) -> Outcome + 'static,
    ) -> ListenerId {
        self.listeners.on(kind, listener)
    }

    /// Register a listener for every event.
    pub fn on_any(
        &mut self,
        listener: impl FnMut(&mut Self, &NavEvent<H::Element>) -> Outcome + 'static,
    ) -> ListenerId {
        self.listeners.on_any(listener)
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.off(id)
    }

    /// Dispatch `event` to the listeners and return their verdict.
    pub(crate) fn fire(&mut self, event: NavEvent<H::Element>) -> Outcome {
        Listeners::dispatch_within(self, &event, Self::listeners_mut)
    }

    fn listeners_mut(&mut self) -> &mut Listeners<Self, NavEvent<H::Element>> {
        &mut self.listeners
    }

    /// Whether [`SpatialNavigator::init`] has been called.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether events are suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The global configuration.
    pub fn config(&self) -> &GlobalConfig<H::Element> {
        &self.config
    }

    /// The section registry.
    pub fn sections(&self) -> &SectionRegistry<H::Element> {
        &self.sections
    }

    /// Registered section ids, in registration order.
    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> + '_ {
        self.sections.ids()
    }

    /// The section used by [`SpatialNavigator::focus`] with no target.
    pub fn default_section(&self) -> Option<&SectionId> {
        self.default_section.as_ref()
    }

    /// The section that last received focus.
    pub fn last_section(&self) -> Option<&SectionId> {
        self.last_section.as_ref()
    }

    /// The key map used by [`SpatialNavigator::on_key_down`].
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Replace the key map.
    pub fn set_key_map(&mut self, key_map: KeyMap) {
        self.key_map = key_map;
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably. Use this to change the scene between moves.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consume the navigator and return its host.
    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{ElementId, MemoryHost};
    use crate::config::{EnterTo, LeaveFor, LeaveTarget, NavigableFilter, RestrictMode};
    use kurbo::Rect;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Nav = SpatialNavigator<MemoryHost>;

    fn tile(host: &mut MemoryHost, class: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> ElementId {
        host.element("div")
            .class(class)
            .rect(Rect::new(x0, y0, x1, y1))
            .build()
    }

    fn record(nav: &mut Nav) -> Rc<RefCell<Vec<EventKind>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        nav.on_any(move |_, event| {
            sink.borrow_mut().push(sightline_events::Event::kind(event));
            Outcome::Proceed
        });
        log
    }

    /// Origin (100,100)-(150,150), a right neighbor, and a neighbor below.
    fn cross() -> (Nav, [ElementId; 3]) {
        let mut host = MemoryHost::new();
        let origin = tile(&mut host, "item", 100.0, 100.0, 150.0, 150.0);
        let right = tile(&mut host, "item", 300.0, 100.0, 350.0, 150.0);
        let below = tile(&mut host, "item", 100.0, 300.0, 150.0, 350.0);
        let mut nav = SpatialNavigator::new(host);
        nav.init(None);
        nav.add(ConfigPatch::with_selector(".item")).unwrap();
        (nav, [origin, right, below])
    }

    #[test]
    fn moves_right_and_down() {
        let (mut nav, [origin, right, below]) = cross();
        assert!(nav.focus(Some(&ExtSelector::Element(origin))));
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(right));

        assert!(nav.focus(Some(&ExtSelector::Element(origin))));
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(below));

        assert!(!nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(below));
    }

    #[test]
    fn move_from_explicit_origin() {
        let (mut nav, [origin, right, _]) = cross();
        assert!(nav.move_focus(Direction::Right, Some(&ExtSelector::Element(origin))));
        assert_eq!(nav.host().active_element(), Some(right));
        assert!(!nav.move_focus(Direction::Right, Some(&ExtSelector::parse(".missing"))));
    }

    #[test]
    fn event_order_for_a_move() {
        let (mut nav, [origin, _, _]) = cross();
        nav.focus(Some(&ExtSelector::Element(origin)));
        let log = record(&mut nav);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(
            *log.borrow(),
            [
                EventKind::WillMove,
                EventKind::WillUnfocus,
                EventKind::Unfocused,
                EventKind::WillFocus,
                EventKind::Focused,
            ]
        );
    }

    #[test]
    fn canceled_will_move_keeps_focus() {
        let (mut nav, [origin, _, _]) = cross();
        nav.focus(Some(&ExtSelector::Element(origin)));
        nav.on(EventKind::WillMove, |_, event| {
            assert!(matches!(event, NavEvent::WillMove { cause: MoveCause::Api, .. }));
            Outcome::Cancel
        });
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(origin));
    }

    #[test]
    fn canceled_will_focus_keeps_memory() {
        let (mut nav, [origin, right, _]) = cross();
        nav.focus(Some(&ExtSelector::Element(origin)));
        nav.on(EventKind::WillFocus, move |_, event| {
            (event.target() != right).into()
        });
        assert!(!nav.move_focus(Direction::Right, None));
        // The old element was already blurred when willfocus was vetoed.
        assert_eq!(nav.host().active_element(), None);
        assert_eq!(nav.last_focused("section-1"), Some(origin));
    }

    #[test]
    fn canceled_will_unfocus_keeps_focus() {
        let (mut nav, [origin, _, _]) = cross();
        nav.focus(Some(&ExtSelector::Element(origin)));
        nav.on(EventKind::WillUnfocus, |_, _| Outcome::Cancel);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(origin));
    }

    #[test]
    fn silent_focus_fires_nothing() {
        let (mut nav, [origin, right, _]) = cross();
        let log = record(&mut nav);
        assert!(nav.focus_silently(Some(&ExtSelector::Element(origin))));
        assert!(nav.focus_silently(Some(&ExtSelector::Element(right))));
        assert!(log.borrow().is_empty());
        assert!(!nav.is_paused());
        assert_eq!(nav.last_focused("section-1"), Some(right));
        assert_eq!(nav.last_section().map(SectionId::as_str), Some("section-1"));
    }

    #[test]
    fn paused_moves_are_silent() {
        let (mut nav, [origin, right, _]) = cross();
        nav.focus(Some(&ExtSelector::Element(origin)));
        let log = record(&mut nav);
        nav.pause();
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(right));
        // Only the willmove of the request itself is delivered.
        assert_eq!(*log.borrow(), [EventKind::WillMove]);
        nav.resume();
        assert!(!nav.is_paused());
    }

    #[test]
    fn listeners_can_reenter_without_recursion() {
        let (mut nav, [origin, right, below]) = cross();
        nav.focus(Some(&ExtSelector::Element(origin)));
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);
        nav.on(EventKind::Focused, move |nav, event| {
            *seen.borrow_mut() += 1;
            if event.target() == right {
                // Nested transfer: served silently, no listener sees it.
                assert!(nav.focus(Some(&ExtSelector::Element(below))));
            }
            Outcome::Proceed
        });
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(*count.borrow(), 1);
        assert_eq!(nav.host().active_element(), Some(below));
    }

    #[test]
    fn listeners_can_move_after_a_failed_move() {
        let (mut nav, [origin, right, _]) = cross();
        nav.focus(Some(&ExtSelector::Element(right)));
        let log = record(&mut nav);
        nav.on(EventKind::NavigateFailed, |nav, event| {
            if let NavEvent::NavigateFailed { direction: Direction::Right, .. } = event {
                assert!(nav.move_focus(Direction::Left, None));
            }
            Outcome::Proceed
        });
        assert!(!nav.move_focus(Direction::Right, None));
        // The nested move is outside any transfer, so it is fully observed.
        assert_eq!(
            *log.borrow(),
            [
                EventKind::WillMove,
                EventKind::NavigateFailed,
                EventKind::WillMove,
                EventKind::WillUnfocus,
                EventKind::Unfocused,
                EventKind::WillFocus,
                EventKind::Focused,
            ]
        );
        assert_eq!(nav.host().active_element(), Some(origin));
    }

    #[test]
    fn listeners_can_remove_themselves() {
        let (mut nav, [origin, right, _]) = cross();
        let id = Rc::new(RefCell::new(None::<ListenerId>));
        let own = Rc::clone(&id);
        let calls = Rc::new(RefCell::new(0));
        let c = Rc::clone(&calls);
        let registered = nav.on(EventKind::Focused, move |nav, _| {
            *c.borrow_mut() += 1;
            if let Some(id) = *own.borrow() {
                assert!(nav.off(id));
            }
            Outcome::Proceed
        });
        *id.borrow_mut() = Some(registered);
        nav.focus(Some(&ExtSelector::Element(origin)));
        nav.focus(Some(&ExtSelector::Element(right)));
        assert_eq!(*calls.borrow(), 1);
        assert!(!nav.off(registered));
    }

    #[test]
    fn zero_size_and_disabled_elements_are_skipped() {
        let mut host = MemoryHost::new();
        let origin = tile(&mut host, "item", 100.0, 100.0, 150.0, 150.0);
        let _flat = tile(&mut host, "item", 200.0, 100.0, 200.0, 100.0);
        let disabled = host
            .element("button")
            .class("item")
            .attr("disabled", "")
            .rect(Rect::new(250.0, 100.0, 300.0, 150.0))
            .build();
        let far = tile(&mut host, "item", 400.0, 100.0, 450.0, 150.0);
        let mut nav = SpatialNavigator::new(host);
        nav.add(ConfigPatch::with_selector(".item")).unwrap();
        nav.focus(Some(&ExtSelector::Element(origin)));
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(far));
        assert!(!nav.focus(Some(&ExtSelector::Element(disabled))));
    }

    #[test]
    fn navigable_filter_vetoes_candidates() {
        let (mut nav, [origin, right, below]) = cross();
        nav.set(ConfigPatch {
            navigable_filter: Some(NavigableFilter::new(move |e, _| e != right)),
            ..ConfigPatch::default()
        });
        nav.focus(Some(&ExtSelector::Element(origin)));
        assert!(!nav.move_focus(Direction::Right, None));
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(below));
    }

    #[test]
    fn off_screen_candidates_are_skipped_until_allowed() {
        let mut host = MemoryHost::with_viewport(kurbo::Size::new(1000.0, 500.0));
        let origin = tile(&mut host, "item", 0.0, 0.0, 50.0, 50.0);
        // Same row, beyond the right viewport margin of 0.25 * 1000.
        let far = tile(&mut host, "item", 1300.0, 0.0, 1350.0, 50.0);
        let mut nav = SpatialNavigator::new(host);
        nav.init(None);
        let id = nav.add(ConfigPatch::with_selector(".item")).unwrap();
        nav.focus(Some(&ExtSelector::Element(origin)));
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(origin));

        let patch = ConfigPatch::from_json(r#"{"restrictOutSideViewport": false}"#).unwrap();
        nav.set_section(id.as_str(), patch).unwrap();
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(far));
    }

    #[test]
    fn section_overlap_threshold_decides_straight_candidates() {
        let mut host = MemoryHost::new();
        let origin = tile(&mut host, "item", 100.0, 100.0, 200.0, 200.0);
        // Center is below-right; the left edge sits 50 units inside the origin.
        let wide = tile(&mut host, "item", 150.0, 300.0, 400.0, 350.0);
        let mut nav = SpatialNavigator::new(host);
        nav.init(None);
        let id = nav.add(ConfigPatch::with_selector(".item")).unwrap();
        let threshold = |t: f64| ConfigPatch {
            straight_overlap_threshold: Some(t),
            ..ConfigPatch::default()
        };

        nav.set_section(id.as_str(), threshold(0.9)).unwrap();
        nav.focus(Some(&ExtSelector::Element(origin)));
        assert!(!nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(origin));

        nav.set_section(id.as_str(), threshold(0.2)).unwrap();
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(wide));
    }

    fn two_columns(restrict: RestrictMode) -> (Nav, ElementId, ElementId, ElementId) {
        let mut host = MemoryHost::new();
        let a = tile(&mut host, "left", 0.0, 0.0, 50.0, 50.0);
        let a2 = tile(&mut host, "left", 0.0, 100.0, 50.0, 150.0);
        let b = tile(&mut host, "right", 100.0, 0.0, 150.0, 50.0);
        let mut nav = SpatialNavigator::new(host);
        nav.init(None);
        nav.add_with_id(
            "left",
            ConfigPatch {
                restrict: Some(restrict),
                ..ConfigPatch::with_selector(".left")
            },
        )
        .unwrap();
        nav.add_with_id("right", ConfigPatch::with_selector(".right")).unwrap();
        nav.focus(Some(&ExtSelector::Element(a)));
        (nav, a, a2, b)
    }

    #[test]
    fn self_only_never_leaves_the_section() {
        let (mut nav, a, _, _) = two_columns(RestrictMode::SelfOnly);
        let log = record(&mut nav);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(a));
        assert_eq!(*log.borrow(), [EventKind::WillMove, EventKind::NavigateFailed]);
    }

    #[test]
    fn self_first_falls_back_to_other_sections() {
        let (mut nav, _, a2, b) = two_columns(RestrictMode::SelfFirst);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(b));
        assert_eq!(nav.last_section().map(SectionId::as_str), Some("right"));

        // The own section still wins when it has a candidate.
        nav.focus(Some(&ExtSelector::parse("left")));
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(a2));
    }

    #[test]
    fn restrict_none_uses_every_section() {
        let (mut nav, _, _, b) = two_columns(RestrictMode::None);
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(b));
    }

    #[test]
    fn leave_for_block_fails_the_move() {
        let (mut nav, a, _, _) = two_columns(RestrictMode::None);
        nav.set_section(
            "left",
            ConfigPatch {
                leave_for: Some(LeaveFor::new().with(Direction::Right, LeaveTarget::parse(""))),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        let log = record(&mut nav);
        assert!(!nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(a));
        assert_eq!(*log.borrow(), [EventKind::WillMove, EventKind::NavigateFailed]);
    }

    #[test]
    fn leave_for_redirects_and_applies_without_geometry() {
        let (mut nav, a, a2, _) = two_columns(RestrictMode::SelfOnly);
        // Nothing to the left geometrically; the redirect still applies.
        nav.set_section(
            "left",
            ConfigPatch {
                leave_for: Some(
                    LeaveFor::new().with(Direction::Left, LeaveTarget::parse("@right")),
                ),
                ..ConfigPatch::default()
            },
        )
        .unwrap();
        assert!(nav.move_focus(Direction::Left, None));
        assert_eq!(nav.last_section().map(SectionId::as_str), Some("right"));

        nav.focus(Some(&ExtSelector::Element(a)));
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(a2));
    }

    #[test]
    fn enter_to_last_focused() {
        let mut host = MemoryHost::new();
        let origin = tile(&mut host, "menu", 0.0, 0.0, 50.0, 50.0);
        let top = tile(&mut host, "grid", 100.0, 0.0, 150.0, 50.0);
        let lower = tile(&mut host, "grid", 100.0, 200.0, 150.0, 250.0);
        let mut nav = SpatialNavigator::new(host);
        nav.set(ConfigPatch {
            restrict: Some(RestrictMode::None),
            ..ConfigPatch::default()
        });
        nav.add_with_id("menu", ConfigPatch::with_selector(".menu")).unwrap();
        nav.add_with_id(
            "grid",
            ConfigPatch {
                enter_to: Some(EnterTo::LastFocused),
                ..ConfigPatch::with_selector(".grid")
            },
        )
        .unwrap();
        nav.focus(Some(&ExtSelector::Element(lower)));
        nav.focus(Some(&ExtSelector::Element(origin)));
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(lower));
        assert_ne!(nav.host().active_element(), Some(top));
    }

    #[test]
    fn enter_to_default_element() {
        let mut host = MemoryHost::new();
        let origin = tile(&mut host, "menu", 0.0, 0.0, 50.0, 50.0);
        let _near = tile(&mut host, "grid", 100.0, 0.0, 150.0, 50.0);
        let preferred = host
            .element("div")
            .id("start")
            .class("grid")
            .rect(Rect::new(100.0, 400.0, 150.0, 450.0))
            .build();
        let mut nav = SpatialNavigator::new(host);
        nav.add_with_id(
            "menu",
            ConfigPatch {
                restrict: Some(RestrictMode::SelfFirst),
                ..ConfigPatch::with_selector(".menu")
            },
        )
        .unwrap();
        nav.add(ConfigPatch {
            id: Some(SectionId::from("grid")),
            enter_to: Some(EnterTo::DefaultElement),
            default_element: Some(ExtSelector::parse("#start")),
            ..ConfigPatch::with_selector(".grid")
        })
        .unwrap();
        nav.focus(Some(&ExtSelector::Element(origin)));
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(preferred));
    }

    #[test]
    fn remember_source_returns_to_origin() {
        let mut host = MemoryHost::new();
        let a = tile(&mut host, "item", 0.0, 0.0, 50.0, 50.0);
        let c = tile(&mut host, "item", 60.0, 200.0, 90.0, 250.0);
        let b = tile(&mut host, "item", 100.0, 0.0, 150.0, 50.0);
        let mut nav = SpatialNavigator::new(host);
        nav.add(ConfigPatch {
            remember_source: Some(true),
            straight_only: Some(false),
            ..ConfigPatch::with_selector(".item")
        })
        .unwrap();
        // Place `c` straight left of `b` once `b` is focused.
        nav.focus(Some(&ExtSelector::Element(a)));
        assert!(nav.move_focus(Direction::Right, None));
        assert_eq!(nav.host().active_element(), Some(b));
        nav.host_mut().set_rect(c, Some(Rect::new(60.0, 0.0, 90.0, 50.0)));
        assert!(nav.move_focus(Direction::Left, None));
        assert_eq!(nav.host().active_element(), Some(a));
    }

    #[test]
    fn per_element_override_attribute() {
        let (mut nav, [origin, right, _]) = cross();
        nav.host_mut().set_attribute(origin, "data-sn-right", "");
        nav.host_mut().set_attribute(origin, "data-sn-up", ".nothing");
        nav.focus(Some(&ExtSelector::Element(origin)));
        let log = record(&mut nav);
        assert!(!nav.move_focus(Direction::Right, None));
        assert!(!nav.move_focus(Direction::Up, None));
        assert_eq!(
            *log.borrow(),
            [
                EventKind::WillMove,
                EventKind::NavigateFailed,
                EventKind::WillMove,
                EventKind::NavigateFailed
            ]
        );
        nav.host_mut().set_attribute(origin, "data-sn-down", "#target");
        nav.host_mut().set_attribute(right, "id", "target");
        assert!(nav.move_focus(Direction::Down, None));
        assert_eq!(nav.host().active_element(), Some(right));
    }

    #[test]
    fn section_lifecycle_errors() {
        let mut nav = SpatialNavigator::new(MemoryHost::new());
        let id = nav.add(ConfigPatch::with_selector(".a")).unwrap();
        assert_eq!(id, "section-1");
        let err = nav.add_with_id("section-1", ConfigPatch::default()).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        let err = nav
            .add(ConfigPatch {
                id: Some(SectionId::from("section-1")),
                ..ConfigPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        assert!(matches!(nav.remove(""), Err(Error::InvalidArgument(_))));
        assert!(!nav.remove("unknown").unwrap());
        assert!(matches!(
            nav.set_section("unknown", ConfigPatch::default()),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(nav.set_default_section(Some("x")), Err(Error::NotFound(_))));
        assert!(matches!(nav.make_focusable(Some("x")), Err(Error::NotFound(_))));
        assert!(!nav.enable("x") && !nav.disable("x"));

        assert!(nav.remove("section-1").unwrap());
        assert_eq!(nav.section_ids().count(), 0);
    }

    #[test]
    fn uninit_resets_the_id_generator() {
        let mut nav = SpatialNavigator::new(MemoryHost::new());
        nav.init(None);
        nav.add(ConfigPatch::default()).unwrap();
        nav.clear();
        assert_eq!(nav.add(ConfigPatch::default()).unwrap(), "section-2");
        nav.uninit();
        assert!(!nav.is_ready());
        assert_eq!(nav.add(ConfigPatch::default()).unwrap(), "section-1");
    }

    #[test]
    fn init_is_idempotent() {
        let mut nav = SpatialNavigator::new(MemoryHost::new());
        nav.init(Some(GlobalConfig {
            straight_only: false,
            ..GlobalConfig::default()
        }));
        nav.init(Some(GlobalConfig::default()));
        assert!(nav.is_ready());
        assert!(!nav.config().straight_only);
    }

    #[test]
    fn focus_without_target_walks_sections() {
        let mut host = MemoryHost::new();
        let a = tile(&mut host, "a", 0.0, 0.0, 10.0, 10.0);
        let b = tile(&mut host, "b", 20.0, 0.0, 30.0, 10.0);
        let mut nav = SpatialNavigator::new(host);
        nav.add_with_id("a", ConfigPatch::with_selector(".a")).unwrap();
        nav.add_with_id("b", ConfigPatch::with_selector(".b")).unwrap();

        assert!(nav.focus(None));
        assert_eq!(nav.host().active_element(), Some(a));

        nav.set_default_section(Some("b")).unwrap();
        assert!(nav.focus(None));
        assert_eq!(nav.host().active_element(), Some(b));

        nav.disable("b");
        assert!(nav.focus(Some(&ExtSelector::parse("@"))));
        assert_eq!(nav.host().active_element(), Some(a));
        assert!(!nav.focus(Some(&ExtSelector::parse("b"))));
        assert!(nav.enable("b"));
        assert!(nav.focus(Some(&ExtSelector::parse("@b"))));
        assert_eq!(nav.host().active_element(), Some(b));

        nav.set_default_section(None).unwrap();
        assert_eq!(nav.default_section(), None);
    }

    #[test]
    fn section_id_wins_over_selector_reading() {
        let mut host = MemoryHost::new();
        // An element whose tag name equals the section id.
        let decoy = host.element("menu").class("x").rect(Rect::new(0.0, 0.0, 10.0, 10.0)).build();
        let entry = tile(&mut host, "menu-item", 0.0, 20.0, 10.0, 30.0);
        let mut nav = SpatialNavigator::new(host);
        nav.add_with_id("menu", ConfigPatch::with_selector(".menu-item")).unwrap();
        nav.add_with_id("other", ConfigPatch::with_selector(".x")).unwrap();
        assert!(nav.focus(Some(&ExtSelector::parse("menu"))));
        assert_eq!(nav.host().active_element(), Some(entry));
        assert_ne!(nav.host().active_element(), Some(decoy));
    }

    #[test]
    fn make_focusable_respects_ignore_list() {
        let mut host = MemoryHost::new();
        let div = tile(&mut host, "item", 0.0, 0.0, 10.0, 10.0);
        let button = host.element("button").class("item").build();
        let preset = host.element("div").class("item").attr("tabindex", "3").build();
        let mut nav = SpatialNavigator::new(host);
        nav.add(ConfigPatch::with_selector(".item")).unwrap();
        nav.make_focusable(None).unwrap();
        assert_eq!(nav.host().attribute(div, "tabindex").as_deref(), Some("-1"));
        assert_eq!(nav.host().attribute(button, "tabindex"), None);
        assert_eq!(nav.host().attribute(preset, "tabindex").as_deref(), Some("3"));
    }

    #[test]
    fn navigators_are_independent() {
        let (mut one, [origin, _, _]) = cross();
        let mut two = SpatialNavigator::new(MemoryHost::new());
        two.add(ConfigPatch::default()).unwrap();
        one.focus(Some(&ExtSelector::Element(origin)));
        assert_eq!(one.section_ids().count(), 1);
        assert_eq!(two.section_ids().count(), 1);
        assert_eq!(two.last_section(), None);
        assert_eq!(one.section_of(origin).as_ref().map(SectionId::as_str), Some("section-1"));
    }
}
