// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy for structural operations.
//!
//! Navigation outcomes are never errors: a move that finds nothing returns
//! `false` and fires [`NavEvent::NavigateFailed`](crate::NavEvent::NavigateFailed).

use crate::section::SectionId;

/// Failure of a structural operation on a [`SpatialNavigator`](crate::SpatialNavigator).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The named section is not registered.
    #[error("section `{0}` does not exist")]
    NotFound(SectionId),
    /// A section with this id is already registered.
    #[error("section `{0}` already exists")]
    AlreadyExists(SectionId),
    /// An argument was rejected before any state was touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A configuration document could not be parsed.
    #[error("invalid configuration")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
