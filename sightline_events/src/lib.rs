// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sightline Events: typed, cancelable listener dispatch.
//!
//! ## Overview
//!
//! Listeners are boxed closures that receive a mutable context `C` and a
//! borrowed event `E`, and return an [`Outcome`]. For a cancelable event the
//! first [`Outcome::Cancel`] vetoes it and stops dispatch; for a non-cancelable
//! event every listener runs and vetoes are ignored.
//!
//! ## Reentrancy
//!
//! Listeners usually want to call back into whatever owns them. The owner
//! dispatches through [`Listeners::dispatch_within`], handing itself to the
//! listeners as the context. Each handler is taken out of its slot while it
//! runs, so a nested dispatch reaches every listener except the running one.
//! Registrations and removals made by a handler apply immediately.
//!
//! ```
//! use sightline_events::{Event, Listeners, Outcome};
//!
//! #[derive(Debug)]
//! struct Ping { cancelable: bool }
//!
//! impl Event for Ping {
//!     type Kind = ();
//!     fn kind(&self) {}
//!     fn cancelable(&self) -> bool { self.cancelable }
//! }
//!
//! #[derive(Default)]
//! struct Owner { seen: u32, listeners: Listeners<Owner, Ping> }
//!
//! impl Owner {
//!     fn listeners(&mut self) -> &mut Listeners<Owner, Ping> {
//!         &mut self.listeners
//!     }
//!
//!     fn fire(&mut self, event: Ping) -> Outcome {
//!         Listeners::dispatch_within(self, &event, Self::listeners)
//!     }
//! }
//!
//! let mut owner = Owner::default();
//! owner.listeners.on_any(|o: &mut Owner, _| { o.seen += 1; Outcome::Cancel });
//! owner.listeners.on_any(|o: &mut Owner, _| { o.seen += 10; Outcome::Proceed });
//!
//! // Cancelable: the first veto stops dispatch.
//! assert_eq!(owner.fire(Ping { cancelable: true }), Outcome::Cancel);
//! assert_eq!(owner.seen, 1);
//!
//! // Not cancelable: everyone runs and the veto is ignored.
//! assert_eq!(owner.fire(Ping { cancelable: false }), Outcome::Proceed);
//! assert_eq!(owner.seen, 12);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use core::fmt::Debug;

pub mod dispatcher;
mod listeners;

pub use listeners::{ListenerId, Listeners};

/// A listener's verdict on an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Let the event's default action happen.
    Proceed,
    /// Veto the event's default action. Ignored for non-cancelable events.
    Cancel,
}

impl Outcome {
    /// Whether this is [`Outcome::Cancel`].
    #[inline]
    pub fn is_cancel(self) -> bool {
        matches!(self, Self::Cancel)
    }
}

impl From<bool> for Outcome {
    /// `true` proceeds, `false` cancels.
    fn from(proceed: bool) -> Self {
        if proceed { Self::Proceed } else { Self::Cancel }
    }
}

/// An event that can be dispatched to [`Listeners`].
pub trait Event {
    /// Discriminant used to filter listeners by event type.
    type Kind: Copy + Eq + Debug;

    /// This event's kind.
    fn kind(&self) -> Self::Kind;

    /// Whether listeners may veto this event.
    fn cancelable(&self) -> bool;
}
