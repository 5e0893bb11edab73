// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a listener sequence and honor vetoes.
//!
//! [`run`] is the primitive that [`Listeners::dispatch`](crate::Listeners::dispatch)
//! is built on. It is exposed for owners that keep listeners in their own
//! containers.
//!
//! ## Semantics
//!
//! - Listeners are visited in order.
//! - For a cancelable event, the first [`Outcome::Cancel`] stops the walk and
//!   becomes the aggregate outcome.
//! - For a non-cancelable event, every listener is visited and the aggregate
//!   outcome is always [`Outcome::Proceed`].
//!
//! ```
//! use sightline_events::dispatcher::run;
//! use sightline_events::{Event, Outcome};
//!
//! struct Ev;
//! impl Event for Ev {
//!     type Kind = ();
//!     fn kind(&self) {}
//!     fn cancelable(&self) -> bool { true }
//! }
//!
//! let mut seq = [1_u32, 2, 3];
//! let mut seen = Vec::new();
//! let done = run(&mut seq, &Ev, |n, _| {
//!     seen.push(*n);
//!     if *n == 2 { Outcome::Cancel } else { Outcome::Proceed }
//! });
//! assert_eq!(done.outcome, Outcome::Cancel);
//! assert_eq!(done.visited, 2);
//! assert_eq!(seen, vec![1, 2]);
//! ```

use crate::{Event, Outcome};

/// Summary of one dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatched {
    /// Aggregate decision.
    pub outcome: Outcome,
    /// Number of entries visited before the walk ended.
    pub visited: usize,
}

/// Run `call` over `seq` for `event`, stopping at the first veto if the event
/// is cancelable.
pub fn run<T, E: Event>(
    seq: &mut [T],
    event: &E,
    mut call: impl FnMut(&mut T, &E) -> Outcome,
) -> Dispatched {
    let cancelable = event.cancelable();
    for (i, entry) in seq.iter_mut().enumerate() {
        if call(entry, event).is_cancel() && cancelable {
            return Dispatched {
                outcome: Outcome::Cancel,
                visited: i + 1,
            };
        }
    }
    Dispatched {
        outcome: Outcome::Proceed,
        visited: seq.len(),
    }
}
