//! Destination-scoped attribute storage.
//!
//! Attributes carry a destination mask describing which outputs they may
//! appear in. The full include/exclude filtering system lives outside this
//! crate; the engine only consults the narrow "attributes for destination"
//! view when shaping output.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ops::BitOr;

/// A bitmask of output destinations an attribute may appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destinations(u8);

impl Destinations {
    /// No destination; the attribute is stored but never emitted.
    pub const NONE: Self = Self(0);
    /// Transaction analytic events.
    pub const TRANS_EVENT: Self = Self(1 << 0);
    /// Transaction traces (segment parameters and trace-level attributes).
    pub const TRANS_TRACE: Self = Self(1 << 1);
    /// Error events and traced errors.
    pub const ERROR_EVENT: Self = Self(1 << 2);
    /// Distributed-tracing span events.
    pub const SPAN_EVENT: Self = Self(1 << 3);
    /// Every destination.
    pub const ALL: Self = Self(0b1111);

    /// Returns true if every destination in `other` is present in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if `self` and `other` share at least one destination.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Destinations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    destinations: Destinations,
}

/// An ordered collection of destination-scoped attributes.
///
/// Keys are kept sorted so every serialized view of the same container is
/// byte-identical.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: BTreeMap<String, Entry>,
}

impl Attributes {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no attributes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores an attribute for the given destinations.
    ///
    /// Re-adding a key overwrites both the value and the destination mask.
    pub fn add(&mut self, destinations: Destinations, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                destinations,
            },
        );
    }

    /// Returns the stored value for `key`, regardless of destination.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Returns the attributes visible at `destination` as a JSON object.
    #[must_use]
    pub fn for_destination(&self, destination: Destinations) -> Map<String, Value> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.destinations.intersects(destination))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }
}
