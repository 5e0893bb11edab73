// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline: spatial focus navigation for remote-control and keyboard-only UIs.
//!
//! ## Overview
//!
//! Focusable elements are grouped into named sections. A directional key moves
//! focus to the geometrically best element in that direction, first inside the
//! current section, then (subject to the section's restriction mode) across
//! sections. Sections can block or redirect leaving in a direction, pick an
//! entry element when entered, and remember where focus came from so the
//! opposite key goes back.
//!
//! The geometry lives in [`sightline_spatial`]; this crate adds sections,
//! configuration, focus transfer, and events on top.
//!
//! ## Hosts
//!
//! The navigator never owns UI elements. It talks to them through a [`Host`]:
//! element bounds, selector queries, attributes, and platform focus. The
//! [`adapters::memory::MemoryHost`] keeps a flat scene in memory and is the
//! host used throughout the docs and tests.
//!
//! ## Events
//!
//! Every focus transfer fires `WillUnfocus`, `Unfocused`, `WillFocus`, and
//! `Focused`, in that order. Listeners return an [`Outcome`]; canceling a
//! `Will*` event aborts the transfer. Key moves also fire `WillMove` first and
//! `NavigateFailed` when nothing lies in the requested direction.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::Rect;
//! use sightline::adapters::memory::MemoryHost;
//! use sightline::{
//!     ConfigPatch, Direction, EventKind, ExtSelector, Host, Modifiers, Outcome, SpatialNavigator,
//! };
//!
//! let mut host = MemoryHost::new();
//! host.element("div").class("rail").rect(Rect::new(0.0, 0.0, 100.0, 400.0)).build();
//! let first = host.element("div").class("tile").rect(Rect::new(200.0, 0.0, 400.0, 200.0)).build();
//! let second = host.element("div").class("tile").rect(Rect::new(450.0, 0.0, 650.0, 200.0)).build();
//!
//! let mut nav = SpatialNavigator::new(host);
//! nav.init(None);
//! nav.add_with_id("menu", ConfigPatch::with_selector(".rail")).unwrap();
//! nav.add_with_id("grid", ConfigPatch::with_selector(".tile")).unwrap();
//!
//! let failures = Rc::new(Cell::new(0));
//! let count = Rc::clone(&failures);
//! nav.on(EventKind::NavigateFailed, move |_, _| {
//!     count.set(count.get() + 1);
//!     Outcome::Proceed
//! });
//!
//! nav.focus(Some(&"grid".into()));
//! assert_eq!(nav.host().active_element(), Some(first));
//!
//! // 39 is the right arrow in the default key map.
//! assert!(nav.on_key_down(39, Modifiers::empty()).is_handled());
//! assert_eq!(nav.host().active_element(), Some(second));
//!
//! // Sections keep focus to themselves unless configured otherwise.
//! assert!(!nav.move_focus(Direction::Left, Some(&ExtSelector::Element(first))));
//! assert_eq!(failures.get(), 1);
//! assert_eq!(nav.host().active_element(), Some(second));
//! ```
//!
//! ## Reentrancy
//!
//! Listeners get `&mut SpatialNavigator` and may call any operation, including
//! [`SpatialNavigator::focus`] and [`SpatialNavigator::remove`]. Focus changes
//! requested while a transfer is running happen silently.

pub mod adapters;
mod config;
mod error;
mod events;
mod focus;
mod host;
mod input;
mod navigator;
mod section;
mod selector;
mod traversal;

pub use config::{
    ConfigPatch, DEFAULT_TAB_INDEX_IGNORE_LIST, Effective, EnterTo, GlobalConfig, LeaveFor,
    LeaveTarget, NavigableFilter, RestrictMode,
};
pub use error::{Error, Result};
pub use events::{EventKind, FocusDetail, MoveCause, NavEvent, UnfocusDetail};
pub use focus::TransferState;
pub use host::Host;
pub use input::{KeyMap, KeyResponse, Modifiers};
pub use navigator::SpatialNavigator;
pub use section::{Section, SectionId, SectionRegistry};
pub use selector::{ExtSelector, SectionRef};

pub use sightline_events::{ListenerId, Outcome};
pub use sightline_spatial::Direction;
