//! Immutable chains of payload elements
//!
//! A chain is everything currently stored under one key. It is never edited
//! in place: [`Chain::append`] and friends build a new chain, so a snapshot
//! handed to a reader stays valid while the slot moves on.

use crate::payload::Payload;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// One position in a chain, wrapping exactly one payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Element {
    payload: Payload,
}

impl Element {
    pub fn new(payload: Payload) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

impl From<Payload> for Element {
    fn from(payload: Payload) -> Self {
        Self::new(payload)
    }
}

/// Ordered, immutable sequence of elements.
///
/// Equality is structural: two chains are equal when they hold the same
/// number of elements and each pair of elements carries identical payload
/// bytes, in order. Cloning shares the element storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chain {
    elements: Arc<[Element]>,
}

impl Chain {
    pub fn empty() -> Self {
        Self {
            elements: Arc::from(Vec::new()),
        }
    }

    /// Build a chain holding `payloads` in order
    pub fn of<I>(payloads: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Payload>,
    {
        payloads.into_iter().map(Into::into).collect()
    }

    /// Return a new chain with `payload` as its tail; `self` is untouched
    #[must_use]
    pub fn append(&self, payload: Payload) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend_from_slice(&self.elements);
        elements.push(Element::new(payload));
        Self {
            elements: elements.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn head(&self) -> Option<&Element> {
        self.elements.first()
    }

    pub fn tail(&self) -> Option<&Element> {
        self.elements.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn payloads(&self) -> impl Iterator<Item = &Payload> + '_ {
        self.elements.iter().map(Element::payload)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Payload> for Chain {
    fn from_iter<T: IntoIterator<Item = Payload>>(iter: T) -> Self {
        let elements: Vec<Element> = iter.into_iter().map(Element::new).collect();
        Self {
            elements: elements.into(),
        }
    }
}

impl Serialize for Chain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
