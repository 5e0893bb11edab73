// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry with reentrant dispatch for owners that are also the
//! listeners' context.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::dispatcher;
use crate::{Event, Outcome};

/// Handle returned by registration, used to remove a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Handler<C, E> = Box<dyn FnMut(&mut C, &E) -> Outcome>;

struct Entry<C, E: Event> {
    id: ListenerId,
    kind: Option<E::Kind>,
    /// `None` while the handler is running.
    handler: Option<Handler<C, E>>,
}

/// An ordered set of listeners for events of type `E`, invoked with a
/// mutable context `C`.
pub struct Listeners<C, E: Event> {
    entries: Vec<Entry<C, E>>,
    next_id: u64,
}

impl<C, E: Event> fmt::Debug for Listeners<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .field("running", &self.entries.iter().filter(|e| e.handler.is_none()).count())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<C, E: Event> Default for Listeners<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E: Event> Listeners<C, E> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener for events of `kind`.
    pub fn on(
        &mut self,
        kind: E::Kind,
        handler: impl FnMut(&mut C, &E) -> Outcome + 'static,
    ) -> ListenerId {
        self.insert(Some(kind), Box::new(handler))
    }

    /// Register a listener for every event.
    pub fn on_any(&mut self, handler: impl FnMut(&mut C, &E) -> Outcome + 'static) -> ListenerId {
        self.insert(None, Box::new(handler))
    }

    fn insert(&mut self, kind: Option<E::Kind>, handler: Handler<C, E>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            handler: Some(handler),
        });
        id
    }

    /// Remove a listener. Returns whether it was registered.
    ///
    /// A listener may remove itself while it runs.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(pos);
        true
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ids of the listeners interested in `kind`, in registration order.
    fn matching(&self, kind: E::Kind) -> Vec<ListenerId> {
        self.entries
            .iter()
            .filter(|e| e.kind.is_none_or(|k| k == kind))
            .map(|e| e.id)
            .collect()
    }

    /// Take a handler out of its slot. `None` if it was removed or is
    /// already running.
    fn take(&mut self, id: ListenerId) -> Option<Handler<C, E>> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .and_then(|e| e.handler.take())
    }

    /// Put a handler back, unless its listener was removed meanwhile.
    fn restore(&mut self, id: ListenerId, handler: Handler<C, E>) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            entry.handler = Some(handler);
        }
    }

    /// Dispatch `event` to matching listeners in registration order.
    ///
    /// See [`dispatcher::run`] for the cancelation rules.
    pub fn dispatch(&mut self, ctx: &mut C, event: &E) -> Outcome {
        let mut ids = self.matching(event.kind());
        dispatcher::run(&mut ids, event, |id, event| {
            let Some(mut handler) = self.take(*id) else {
                return Outcome::Proceed;
            };
            let outcome = handler(ctx, event);
            self.restore(*id, handler);
            outcome
        })
        .outcome
    }

    /// Dispatch `event` to the listeners stored inside `owner` itself.
    ///
    /// `listeners` projects the owner onto its listener set. Each handler
    /// receives `owner` and may call back into it, including firing further
    /// events, registering, and removing listeners. Only the handler that is
    /// currently running is skipped by nested dispatches. Listeners registered
    /// during a dispatch first see the next event; listeners removed during a
    /// dispatch are not called again.
    pub fn dispatch_within(
        owner: &mut C,
        event: &E,
        listeners: fn(&mut C) -> &mut Self,
    ) -> Outcome {
        let mut ids = listeners(owner).matching(event.kind());
        dispatcher::run(&mut ids, event, |id, event| {
            let Some(mut handler) = listeners(owner).take(*id) else {
                return Outcome::Proceed;
            };
            let outcome = handler(owner, event);
            listeners(owner).restore(*id, handler);
            outcome
        })
        .outcome
    }
}
