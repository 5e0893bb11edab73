// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extended selectors: patterns, explicit elements, and section references.

use core::fmt;

use crate::host::Host;
use crate::section::SectionId;

/// A reference to a section inside an [`ExtSelector`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SectionRef {
    /// `@`: the default section, then the last active one, then every section.
    Default,
    /// `@<id>`: the named section.
    Id(SectionId),
}

/// Something that designates one or more elements.
///
/// Wherever an element target is accepted (section membership, default
/// elements, leave redirects, per-element overrides), an `ExtSelector` is
/// used. The string form understood by [`ExtSelector::parse`] is:
///
/// - `@` for [`SectionRef::Default`],
/// - `@<id>` for [`SectionRef::Id`],
/// - anything else for a host selector pattern.
///
/// Section references only designate elements through focus operations; as a
/// section's own membership selector they match nothing.
#[derive(Clone, PartialEq, Eq)]
pub enum ExtSelector<E> {
    /// A single element.
    Element(E),
    /// An explicit list of elements, in order.
    Elements(Vec<E>),
    /// A host selector pattern, such as `.item` or `#menu a`.
    Pattern(String),
    /// A section reference.
    Section(SectionRef),
}

impl<E: fmt::Debug> fmt::Debug for ExtSelector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(e) => f.debug_tuple("Element").field(e).finish(),
            Self::Elements(list) => f.debug_tuple("Elements").field(list).finish(),
            Self::Pattern(p) => write!(f, "Pattern({p:?})"),
            Self::Section(SectionRef::Default) => f.write_str("Section(@)"),
            Self::Section(SectionRef::Id(id)) => write!(f, "Section(@{id})"),
        }
    }
}

impl<E> ExtSelector<E> {
    /// Parse the string form of an extended selector.
    ///
    /// ```
    /// use sightline::{ExtSelector, SectionRef};
    ///
    /// let s: ExtSelector<u32> = ExtSelector::parse("@menu");
    /// assert_eq!(s, ExtSelector::Section(SectionRef::Id("menu".into())));
    /// assert_eq!(ExtSelector::<u32>::parse("@"), ExtSelector::Section(SectionRef::Default));
    /// assert_eq!(ExtSelector::<u32>::parse(".tile"), ExtSelector::Pattern(".tile".into()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix('@') {
            Some("") => Self::Section(SectionRef::Default),
            Some(id) => Self::Section(SectionRef::Id(SectionId::from(id))),
            None => Self::Pattern(s.into()),
        }
    }

    /// Whether this selector references a section rather than elements.
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }
}

impl<E: Copy + Eq> ExtSelector<E> {
    /// All elements designated by this selector, in order.
    pub(crate) fn elements<H>(&self, host: &H) -> Vec<E>
    where
        H: Host<Element = E>,
    {
        match self {
            Self::Element(e) => vec![*e],
            Self::Elements(list) => list.clone(),
            Self::Pattern(p) => host.query_selector_all(p),
            Self::Section(_) => Vec::new(),
        }
    }

    /// The first element designated by this selector.
    pub(crate) fn first<H>(&self, host: &H) -> Option<E>
    where
        H: Host<Element = E>,
    {
        match self {
            Self::Element(e) => Some(*e),
            Self::Elements(list) => list.first().copied(),
            Self::Pattern(p) => host.query_selector_all(p).into_iter().next(),
            Self::Section(_) => None,
        }
    }

    /// Whether `element` is designated by this selector.
    pub(crate) fn matches<H>(&self, host: &H, element: E) -> bool
    where
        H: Host<Element = E>,
    {
        match self {
            Self::Element(e) => *e == element,
            Self::Elements(list) => list.contains(&element),
            Self::Pattern(p) => host.matches(element, p),
            Self::Section(_) => false,
        }
    }
}

impl<E> From<&str> for ExtSelector<E> {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl<E> From<String> for ExtSelector<E> {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl<E> From<Vec<E>> for ExtSelector<E> {
    fn from(list: Vec<E>) -> Self {
        Self::Elements(list)
    }
}

impl<E> From<SectionRef> for ExtSelector<E> {
    fn from(section: SectionRef) -> Self {
        Self::Section(section)
    }
}
