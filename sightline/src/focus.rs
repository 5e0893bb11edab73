// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus transfer and native focus reconciliation.
//!
//! A transfer from the focused element to a new one fires, in order:
//! `WillUnfocus` and `Unfocused` on the old element (if any), then `WillFocus`
//! and `Focused` on the new one. Either cancelable event aborts the transfer.
//! While a transfer is in progress, or while the navigator is paused, focus
//! changes happen silently and only update section memory.

use crate::events::{FocusDetail, NavEvent, UnfocusDetail};
use crate::host::Host;
use crate::navigator::SpatialNavigator;
use crate::section::SectionId;
use sightline_spatial::Direction;

/// Reentrancy guard for focus transfers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TransferState {
    /// No transfer is running.
    #[default]
    Idle,
    /// A transfer is running, or a deferred re-focus is pending.
    InProgress,
}

impl TransferState {
    /// Whether a transfer is running.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl<H: Host> SpatialNavigator<H> {
    /// Move focus to `element` in `section`, firing the focus events.
    ///
    /// Returns `false` if a listener vetoed the transfer.
    pub(crate) fn focus_element(
        &mut self,
        element: H::Element,
        section: SectionId,
        direction: Option<Direction>,
    ) -> bool {
        let current = self.host.active_element();

        if self.transfer.is_in_progress() {
            self.focus_silently_to(current, element, section);
            return true;
        }

        self.transfer = TransferState::InProgress;

        if self.paused {
            self.focus_silently_to(current, element, section);
            self.transfer = TransferState::Idle;
            return true;
        }

        if let Some(current) = current {
            let detail = UnfocusDetail {
                next_element: Some(element),
                next_section_id: Some(section.clone()),
                direction,
                native: false,
            };
            let will_unfocus = NavEvent::WillUnfocus {
                target: current,
                detail: detail.clone(),
            };
            if self.fire(will_unfocus).is_cancel() {
                tracing::debug!(element = ?current, "unfocus canceled by listener");
                self.transfer = TransferState::Idle;
                return false;
            }
            self.host.blur(current);
            self.fire(NavEvent::Unfocused {
                target: current,
                detail,
            });
        }

        let detail = FocusDetail {
            previous_element: current,
            section_id: section.clone(),
            direction,
            native: false,
        };
        let will_focus = NavEvent::WillFocus {
            target: element,
            detail: detail.clone(),
        };
        if self.fire(will_focus).is_cancel() {
            tracing::debug!(element = ?element, "focus canceled by listener");
            self.transfer = TransferState::Idle;
            return false;
        }
        self.host.focus(element);
        self.fire(NavEvent::Focused {
            target: element,
            detail,
        });

        self.transfer = TransferState::Idle;
        tracing::debug!(element = ?element, %section, "focus moved");
        self.focus_changed(element, Some(section));
        true
    }

    fn focus_silently_to(
        &mut self,
        current: Option<H::Element>,
        element: H::Element,
        section: SectionId,
    ) {
        if let Some(current) = current {
            self.host.blur(current);
        }
        self.host.focus(element);
        self.focus_changed(element, Some(section));
    }

    /// Record `element` as its section's last focused element.
    ///
    /// When `section` is unknown it is resolved from the element.
    pub(crate) fn focus_changed(&mut self, element: H::Element, section: Option<SectionId>) {
        let Some(section) = section.or_else(|| self.section_of(element)) else {
            return;
        };
        if let Some(entry) = self.sections.get_mut(section.as_str()) {
            entry.last_focused = Some(element);
            self.last_section = Some(section);
        }
    }

    /// Report that the platform focused `element` on its own (a pointer click,
    /// assistive technology, tabbing).
    ///
    /// Fires `WillFocus` and `Focused` with `native: true` for elements that
    /// belong to a section. If `WillFocus` is vetoed the element is blurred
    /// again. Ignored before [`init`](Self::init), with no sections, and while
    /// the navigator itself is moving focus.
    pub fn on_native_focus(&mut self, element: H::Element) {
        if !self.ready || self.sections.is_empty() || self.transfer.is_in_progress() {
            return;
        }
        let Some(section) = self.section_of(element) else {
            return;
        };
        if self.paused {
            self.focus_changed(element, Some(section));
            return;
        }

        let detail = FocusDetail {
            previous_element: None,
            section_id: section.clone(),
            direction: None,
            native: true,
        };
        let will_focus = NavEvent::WillFocus {
            target: element,
            detail: detail.clone(),
        };
        if self.fire(will_focus).is_cancel() {
            tracing::debug!(element = ?element, "native focus canceled, blurring");
            self.transfer = TransferState::InProgress;
            self.host.blur(element);
            self.transfer = TransferState::Idle;
        } else {
            self.fire(NavEvent::Focused {
                target: element,
                detail,
            });
            self.focus_changed(element, Some(section));
        }
    }

    /// Report that the platform blurred `element` on its own.
    ///
    /// Fires `WillUnfocus` and `Unfocused` with `native: true` for elements
    /// that belong to a section. If `WillUnfocus` is vetoed a re-focus of the
    /// element is scheduled; run it with [`run_deferred`](Self::run_deferred)
    /// once the platform has finished dispatching the blur. Until then, focus
    /// changes are silent.
    pub fn on_native_blur(&mut self, element: H::Element) {
        if !self.ready
            || self.paused
            || self.sections.is_empty()
            || self.transfer.is_in_progress()
            || self.section_of(element).is_none()
        {
            return;
        }

        let detail = UnfocusDetail {
            next_element: None,
            next_section_id: None,
            direction: None,
            native: true,
        };
        let will_unfocus = NavEvent::WillUnfocus {
            target: element,
            detail: detail.clone(),
        };
        if self.fire(will_unfocus).is_cancel() {
            tracing::debug!(element = ?element, "native blur canceled, refocus scheduled");
            self.transfer = TransferState::InProgress;
            self.pending_refocus = Some(element);
        } else {
            self.fire(NavEvent::Unfocused {
                target: element,
                detail,
            });
        }
    }

    /// Run the scheduled re-focus, if any. Returns whether one ran.
    pub fn run_deferred(&mut self) -> bool {
        let Some(element) = self.pending_refocus.take() else {
            return false;
        };
        self.host.focus(element);
        self.transfer = TransferState::Idle;
        true
    }

    /// Whether a re-focus is waiting for [`run_deferred`](Self::run_deferred).
    pub fn has_deferred(&self) -> bool {
        self.pending_refocus.is_some()
    }
}
