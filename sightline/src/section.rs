// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section registry: named focus groups in registration order.

use std::borrow::Borrow;
use std::fmt;

use hashbrown::HashMap;
use sightline_spatial::PreviousMove;

use crate::config::ConfigPatch;
use crate::error::{Error, Result};

const GENERATED_ID_PREFIX: &str = "section-";

/// Identifier of a section.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One named focus group.
#[derive(Clone, Debug)]
pub struct Section<E> {
    pub(crate) id: SectionId,
    pub(crate) config: ConfigPatch<E>,
    pub(crate) disabled: bool,
    /// Weak: re-validated for navigability on every read.
    pub(crate) last_focused: Option<E>,
    pub(crate) previous: Option<PreviousMove<E>>,
}

impl<E> Section<E> {
    pub(crate) fn new(id: SectionId, mut config: ConfigPatch<E>) -> Self {
        let disabled = config.disabled.take().unwrap_or(false);
        config.id = None;
        Self {
            id,
            config,
            disabled,
            last_focused: None,
            previous: None,
        }
    }

    /// Merge `patch` into this section's overrides.
    pub(crate) fn update(&mut self, mut patch: ConfigPatch<E>) {
        if let Some(disabled) = patch.disabled.take() {
            self.disabled = disabled;
        }
        patch.id = None;
        self.config.merge(patch);
    }

    /// This section's id.
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// This section's configuration overrides.
    pub fn config(&self) -> &ConfigPatch<E> {
        &self.config
    }

    /// Whether the section is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Sections keyed by id, iterated in registration order.
#[derive(Clone, Debug)]
pub struct SectionRegistry<E> {
    sections: HashMap<SectionId, Section<E>>,
    order: Vec<SectionId>,
    id_pool: u64,
}

impl<E> Default for SectionRegistry<E> {
    fn default() -> Self {
        Self {
            sections: HashMap::new(),
            order: Vec::new(),
            id_pool: 0,
        }
    }
}

impl<E> SectionRegistry<E> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered sections.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no section is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.sections.contains_key(id)
    }

    /// The section named `id`.
    pub fn get(&self, id: &str) -> Option<&Section<E>> {
        self.sections.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Section<E>> {
        self.sections.get_mut(id)
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &SectionId> + '_ {
        self.order.iter()
    }

    /// Sections in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Section<E>> + '_ {
        self.order.iter().filter_map(|id| self.sections.get(id))
    }

    /// Produce a fresh `section-<n>` id, skipping ids already taken.
    pub(crate) fn generate_id(&mut self) -> SectionId {
        loop {
            self.id_pool += 1;
            let id = SectionId(format!("{GENERATED_ID_PREFIX}{}", self.id_pool));
            if !self.contains(id.as_str()) {
                return id;
            }
        }
    }

    pub(crate) fn insert(&mut self, section: Section<E>) -> Result<()> {
        if self.contains(section.id.as_str()) {
            return Err(Error::AlreadyExists(section.id));
        }
        self.order.push(section.id.clone());
        self.sections.insert(section.id.clone(), section);
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Section<E>> {
        let section = self.sections.remove(id)?;
        self.order.retain(|other| other.as_str() != id);
        Some(section)
    }

    /// Drop every section. The id generator keeps counting.
    pub(crate) fn clear(&mut self) {
        self.sections.clear();
        self.order.clear();
    }

    pub(crate) fn reset_ids(&mut self) {
        self.id_pool = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(id: &str) -> Section<u32> {
        Section::new(SectionId::from(id), ConfigPatch::default())
    }

    #[test]
    fn generated_ids_skip_taken_ones() {
        let mut reg = SectionRegistry::<u32>::new();
        reg.insert(section("section-2")).unwrap();
        let a = reg.generate_id();
        reg.insert(Section::new(a.clone(), ConfigPatch::default())).unwrap();
        let b = reg.generate_id();
        assert_eq!(a, "section-1");
        assert_eq!(b, "section-3");
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut reg = SectionRegistry::<u32>::new();
        reg.insert(section("menu")).unwrap();
        let err = reg.insert(section("menu")).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(id) if id == "menu"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn order_survives_removal() {
        let mut reg = SectionRegistry::<u32>::new();
        for id in ["a", "b", "c"] {
            reg.insert(section(id)).unwrap();
        }
        assert!(reg.remove("b").is_some());
        assert!(reg.remove("b").is_none());
        let ids: Vec<&str> = reg.ids().map(SectionId::as_str).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(reg.iter().count(), 2);
    }

    #[test]
    fn clear_keeps_counting_until_reset() {
        let mut reg = SectionRegistry::<u32>::new();
        let first = reg.generate_id();
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.generate_id(), "section-2");
        reg.reset_ids();
        assert_eq!(reg.generate_id(), first);
    }

    #[test]
    fn disabled_flag_is_taken_from_patches() {
        let mut s = Section::<u32>::new(
            SectionId::from("x"),
            ConfigPatch {
                disabled: Some(true),
                id: Some(SectionId::from("ignored")),
                ..ConfigPatch::default()
            },
        );
        assert!(s.is_disabled());
        assert!(s.config().disabled.is_none());
        assert!(s.config().id.is_none());
        s.update(ConfigPatch {
            disabled: Some(false),
            ..ConfigPatch::default()
        });
        assert!(!s.is_disabled());
    }
}
