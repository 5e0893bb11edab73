// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made [`Host`](crate::Host) implementations.
//!
//! ## Available Adapters
//!
//! - [`memory`]: an in-memory scene of tagged, attributed rectangles with a
//!   small CSS selector subset. Useful for tests, demos, and headless
//!   embedders that keep their own element tree.

pub mod memory;
