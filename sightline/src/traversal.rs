// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section-aware traversal: navigability, restriction policy, leave and entry
//! rules, and section focusing.

use sightline_spatial::{Candidate, Direction, NavigateOptions, PreviousMove, navigate};

use crate::config::{Effective, EnterTo, LeaveTarget, RestrictMode};
use crate::events::NavEvent;
use crate::host::Host;
use crate::navigator::SpatialNavigator;
use crate::section::SectionId;
use crate::selector::{ExtSelector, SectionRef};

/// Result of consulting a section's leave rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Leave {
    /// The rule redirected focus successfully.
    Moved,
    /// The rule blocks leaving in this direction.
    Blocked,
    /// No rule, or the redirect found nothing to focus.
    NotApplied,
}

impl<H: Host> SpatialNavigator<H> {
    pub(crate) fn effective(&self, section: &str) -> Effective<'_, H::Element> {
        match self.sections.get(section) {
            Some(s) => Effective::new(&self.config, &s.config),
            None => Effective::global(&self.config),
        }
    }

    /// Whether `element` can take focus within `section`.
    ///
    /// With `verify_selector`, the element must also match the section's
    /// membership selector.
    pub(crate) fn is_navigable(
        &self,
        element: H::Element,
        section: &str,
        verify_selector: bool,
    ) -> bool {
        let Some(entry) = self.sections.get(section) else {
            return false;
        };
        if entry.disabled {
            return false;
        }
        let Some(rect) = self.host.bounding_rect(element) else {
            return false;
        };
        let size = rect.abs().size();
        if (size.width <= 0.0 && size.height <= 0.0) || self.host.has_attribute(element, "disabled")
        {
            return false;
        }
        let effective = Effective::new(&self.config, &entry.config);
        if verify_selector
            && !effective
                .selector()
                .is_some_and(|s| s.matches(&self.host, element))
        {
            return false;
        }
        if let Some(filter) = effective.navigable_filter()
            && !filter.accepts(element, &entry.id)
        {
            return false;
        }
        true
    }

    /// The first enabled section, in registration order, whose selector
    /// matches `element`.
    pub fn section_of(&self, element: H::Element) -> Option<SectionId> {
        self.sections
            .iter()
            .filter(|s| !s.disabled)
            .find(|s| {
                Effective::new(&self.config, &s.config)
                    .selector()
                    .is_some_and(|sel| sel.matches(&self.host, element))
            })
            .map(|s| s.id.clone())
    }

    /// Navigable elements of `section`, in selector order.
    pub(crate) fn navigable_elements(&self, section: &str) -> Vec<H::Element> {
        let Some(selector) = self
            .sections
            .get(section)
            .and_then(|s| Effective::new(&self.config, &s.config).selector())
        else {
            return Vec::new();
        };
        selector
            .elements(&self.host)
            .into_iter()
            .filter(|&e| self.is_navigable(e, section, false))
            .collect()
    }

    /// The section's default element, if it is currently navigable.
    pub(crate) fn default_element(&self, section: &str) -> Option<H::Element> {
        let element = self.effective(section).default_element()?.first(&self.host)?;
        self.is_navigable(element, section, true).then_some(element)
    }

    /// The last element focused in `section`, if it is still navigable there.
    pub fn last_focused(&self, section: &str) -> Option<H::Element> {
        let element = self.sections.get(section)?.last_focused?;
        self.is_navigable(element, section, true).then_some(element)
    }

    /// Focus the best element of `section`, or of the first section that has
    /// one in the range default, last active, then registration order.
    pub(crate) fn focus_section(&mut self, section: Option<&str>) -> bool {
        let requested: Vec<SectionId> = match section {
            Some(id) => vec![SectionId::from(id)],
            None => self
                .default_section
                .iter()
                .chain(self.last_section.iter())
                .chain(self.sections.ids())
                .cloned()
                .collect(),
        };
        let mut range: Vec<SectionId> = Vec::with_capacity(requested.len());
        for id in requested {
            if !id.as_str().is_empty()
                && !range.contains(&id)
                && self.sections.get(id.as_str()).is_some_and(|s| !s.disabled)
            {
                range.push(id);
            }
        }

        for id in range {
            let section = id.as_str();
            let first = || self.navigable_elements(section).into_iter().next();
            let next = if self.effective(section).enter_to() == EnterTo::LastFocused {
                self.last_focused(section)
                    .or_else(|| self.default_element(section))
                    .or_else(first)
            } else {
                self.default_element(section)
                    .or_else(|| self.last_focused(section))
                    .or_else(first)
            };
            if let Some(next) = next {
                return self.focus_element(next, id, None);
            }
        }
        false
    }

    /// Focus whatever `selector` designates.
    pub(crate) fn focus_ext(
        &mut self,
        selector: &ExtSelector<H::Element>,
        direction: Option<Direction>,
    ) -> bool {
        match selector {
            ExtSelector::Section(SectionRef::Default) => self.focus_section(None),
            ExtSelector::Section(SectionRef::Id(id)) => self.focus_section(Some(id.as_str())),
            other => {
                let Some(next) = other.first(&self.host) else {
                    return false;
                };
                let Some(section) = self.section_of(next) else {
                    return false;
                };
                self.is_navigable(next, section.as_str(), false)
                    && self.focus_element(next, section, direction)
            }
        }
    }

    fn leave(&mut self, section: &SectionId, direction: Direction) -> Leave {
        let target = self.effective(section.as_str()).leave_for(direction).cloned();
        match target {
            None => Leave::NotApplied,
            Some(LeaveTarget::Block) => Leave::Blocked,
            Some(LeaveTarget::Redirect(selector)) => {
                if self.focus_ext(&selector, Some(direction)) {
                    Leave::Moved
                } else {
                    Leave::NotApplied
                }
            }
        }
    }

    fn navigate_failed(&mut self, origin: H::Element, direction: Direction) {
        tracing::debug!(element = ?origin, %direction, "navigation failed");
        self.fire(NavEvent::NavigateFailed {
            target: origin,
            direction,
        });
    }

    /// Run one geometric pass from `origin` over `candidates` with the policy
    /// of `section`.
    fn navigate_among(
        &self,
        origin: H::Element,
        direction: Direction,
        candidates: &[H::Element],
        section: &str,
    ) -> Option<H::Element> {
        let origin = Candidate {
            id: origin,
            rect: self.host.bounding_rect(origin)?,
        };
        let candidates: Vec<Candidate<H::Element>> = candidates
            .iter()
            .filter_map(|&id| {
                Some(Candidate {
                    id,
                    rect: self.host.bounding_rect(id)?,
                })
            })
            .collect();
        let effective = self.effective(section);
        let options = NavigateOptions {
            straight_only: effective.straight_only(),
            straight_overlap_threshold: effective.straight_overlap_threshold(),
            viewport: effective.viewport_clip(self.host.viewport_size()),
            remember_source: effective.remember_source(),
            previous: self.sections.get(section).and_then(|s| s.previous),
        };
        navigate(&origin, direction, &candidates, &options)
    }

    /// Move focus from `current`, which belongs to `section`, in `direction`.
    ///
    /// Fires `NavigateFailed` and returns `false` when nothing takes focus.
    pub(crate) fn focus_next(
        &mut self,
        direction: Direction,
        current: H::Element,
        section: &SectionId,
    ) -> bool {
        let attribute = format!("data-sn-{direction}");
        if let Some(value) = self.host.attribute(current, &attribute) {
            let moved =
                !value.is_empty() && self.focus_ext(&ExtSelector::parse(&value), Some(direction));
            if !moved {
                self.navigate_failed(current, direction);
            }
            return moved;
        }

        let per_section: Vec<(SectionId, Vec<H::Element>)> = self
            .sections
            .ids()
            .map(|id| (id.clone(), self.navigable_elements(id.as_str())))
            .collect();
        let own: &[H::Element] = per_section
            .iter()
            .find(|(id, _)| id == section)
            .map(|(_, elements)| elements.as_slice())
            .unwrap_or_default();

        let restrict = self.effective(section.as_str()).restrict();
        let next = match restrict {
            RestrictMode::SelfOnly | RestrictMode::SelfFirst => {
                let mine: Vec<H::Element> =
                    own.iter().copied().filter(|&e| e != current).collect();
                let found = self.navigate_among(current, direction, &mine, section.as_str());
                if found.is_none() && restrict == RestrictMode::SelfFirst {
                    let others: Vec<H::Element> = per_section
                        .iter()
                        .filter(|(id, _)| id != section)
                        .flat_map(|(_, elements)| elements.iter().copied())
                        .filter(|e| *e != current && !own.contains(e))
                        .collect();
                    self.navigate_among(current, direction, &others, section.as_str())
                } else {
                    found
                }
            }
            RestrictMode::None => {
                let all: Vec<H::Element> = per_section
                    .iter()
                    .flat_map(|(_, elements)| elements.iter().copied())
                    .filter(|&e| e != current)
                    .collect();
                self.navigate_among(current, direction, &all, section.as_str())
            }
        };

        let Some(mut next) = next else {
            if self.leave(section, direction) == Leave::Moved {
                return true;
            }
            self.navigate_failed(current, direction);
            return false;
        };

        if let Some(entry) = self.sections.get_mut(section.as_str()) {
            entry.previous = Some(PreviousMove {
                source: current,
                destination: next,
                reverse: direction.reverse(),
            });
        }

        let Some(next_section) = self.section_of(next) else {
            self.navigate_failed(current, direction);
            return false;
        };
        if next_section != *section {
            match self.leave(section, direction) {
                Leave::Moved => return true,
                Leave::Blocked => {
                    self.navigate_failed(current, direction);
                    return false;
                }
                Leave::NotApplied => {}
            }
            let target = next_section.as_str();
            let entry = match self.effective(target).enter_to() {
                EnterTo::LastFocused => self
                    .last_focused(target)
                    .or_else(|| self.default_element(target)),
                EnterTo::DefaultElement => self.default_element(target),
                EnterTo::Geometric => None,
            };
            if let Some(entry) = entry {
                next = entry;
            }
        }

        self.focus_element(next, next_section, Some(direction))
    }
}
