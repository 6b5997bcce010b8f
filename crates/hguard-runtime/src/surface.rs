#![forbid(unsafe_code)]

//! Retained presentation surface.
//!
//! A [`Surface`] is the set of presentation attributes a model's `view()`
//! writes: CSS classes, text, accessibility flags, pixel offsets, style
//! variables and child rows. Hosts construct it with the elements that exist
//! in their deployment. Updates to an element that was never registered are
//! skipped, so optional UI simply stays unrendered.
//!
//! [`SurfaceDiff`] compares two surfaces element by element; hosts use it
//! to patch only what changed.

use std::collections::{BTreeMap, BTreeSet};

/// Stable element identifier (the DOM id on web hosts).
pub type ElementId = &'static str;

// FNV-1a constants.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Presentation attributes for one element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    classes: BTreeSet<String>,
    text: String,
    aria_hidden: Option<bool>,
    left: Option<f64>,
    top: Option<f64>,
    vars: BTreeMap<String, String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: set text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set the accessibility-hidden flag.
    #[must_use]
    pub fn with_aria_hidden(mut self, hidden: bool) -> Self {
        self.aria_hidden = Some(hidden);
        self
    }

    /// Whether `class` is present.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Classes in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.classes.contains(class) {
            self.classes.insert(class.to_owned());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Add `class` when `on`, remove it otherwise.
    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// Remove all of `group`, then add `class`.
    ///
    /// For mutually exclusive modifier classes such as tones.
    pub fn replace_class(&mut self, group: &[&str], class: &str) {
        for c in group {
            self.remove_class(c);
        }
        self.add_class(class);
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            text.clone_into(&mut self.text);
        }
    }

    #[must_use]
    pub const fn aria_hidden(&self) -> Option<bool> {
        self.aria_hidden
    }

    pub fn set_aria_hidden(&mut self, hidden: bool) {
        self.aria_hidden = Some(hidden);
    }

    /// Pixel offset `(left, top)`, if positioned.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.left.zip(self.top)
    }

    pub fn set_position(&mut self, left: f64, top: f64) {
        self.left = Some(left);
        self.top = Some(top);
    }

    /// Style variable (e.g. `--scale`).
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set_var(&mut self, name: &str, value: impl Into<String>) {
        self.vars.insert(name.to_owned(), value.into());
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Replace all children wholesale.
    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }

    fn hash_into(&self, mut hash: u64) -> u64 {
        for class in &self.classes {
            hash = fnv1a64_bytes(hash, class.as_bytes());
            hash = fnv1a64_bytes(hash, b" ");
        }
        hash = fnv1a64_bytes(hash, b"|");
        hash = fnv1a64_bytes(hash, self.text.as_bytes());
        hash = fnv1a64_bytes(hash, b"|");
        let aria = match self.aria_hidden {
            None => 0u8,
            Some(false) => 1,
            Some(true) => 2,
        };
        hash = fnv1a64_bytes(hash, &[aria]);
        for v in [self.left, self.top] {
            let bits = v.map_or(u64::MAX, f64::to_bits);
            hash = fnv1a64_bytes(hash, &bits.to_le_bytes());
        }
        for (name, value) in &self.vars {
            hash = fnv1a64_bytes(hash, name.as_bytes());
            hash = fnv1a64_bytes(hash, b"=");
            hash = fnv1a64_bytes(hash, value.as_bytes());
        }
        hash = fnv1a64_bytes(hash, &(self.children.len() as u64).to_le_bytes());
        for child in &self.children {
            hash = child.hash_into(hash);
        }
        hash
    }
}

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The set of elements present in one deployment and their attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    elements: BTreeMap<ElementId, Element>,
}

impl Surface {
    /// Empty surface; nothing is rendered until elements are registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface with the given elements present and blank.
    #[must_use]
    pub fn with_elements(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut surface = Self::new();
        for id in ids {
            surface.insert(id, Element::new());
        }
        surface
    }

    /// Register (or replace) an element.
    pub fn insert(&mut self, id: ElementId, element: Element) {
        self.elements.insert(id, element);
    }

    /// Remove an element from the deployment.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Apply `f` to element `id` if it exists.
    ///
    /// Returns `false` (and does nothing) for an absent element.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Element)) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                f(element);
                true
            }
            None => {
                tracing::trace!(target: "hguard.surface", element = id, "element absent, update skipped");
                false
            }
        }
    }

    /// Registered element ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// FNV-1a checksum over every element, in id order.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        for (id, element) in &self.elements {
            hash = fnv1a64_bytes(hash, id.as_bytes());
            hash = element.hash_into(hash);
        }
        hash
    }
}

/// Elements that differ between two surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceDiff {
    changes: Vec<ElementId>,
}

impl SurfaceDiff {
    /// Compare `prev` to `next`.
    ///
    /// An element present in only one of the two counts as changed.
    #[must_use]
    pub fn compute(prev: &Surface, next: &Surface) -> Self {
        let ids: BTreeSet<ElementId> = prev.ids().chain(next.ids()).collect();
        let changes = ids
            .into_iter()
            .filter(|id| prev.get(*id) != next.get(*id))
            .collect();
        Self { changes }
    }

    /// Changed element ids in sorted order.
    #[must_use]
    pub fn changes(&self) -> &[ElementId] {
        &self.changes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }
}
