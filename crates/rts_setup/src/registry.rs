//! Declared attribute order.
//!
//! The registry is an ordered list of attribute entries, recorded once when
//! the settings object is built. Every pass (init, serialize, deserialize,
//! random resolution) walks it front to back; nothing depends on struct field
//! or hash iteration order.

use std::fmt;

use crate::attribute::Attribute;
use crate::payload::InitAttributes;
use crate::settings::MatchSettings;

/// Type-erased passes of one attribute.
#[derive(Clone, Copy)]
pub struct AttributeEntry {
    /// Attribute name.
    pub name: &'static str,
    pub(crate) init: fn(&mut MatchSettings),
    pub(crate) to_init_attributes: fn(&MatchSettings, &mut InitAttributes),
    pub(crate) from_init_attributes: fn(&mut MatchSettings, &InitAttributes),
    pub(crate) on_finalize_attributes: fn(&MatchSettings, &mut InitAttributes),
    pub(crate) pick_random_items: fn(&mut MatchSettings) -> bool,
    pub(crate) holds_random: fn(&MatchSettings) -> bool,
}

impl AttributeEntry {
    /// Capture the passes of `A`.
    #[must_use]
    pub fn of<A: Attribute>() -> Self {
        Self {
            name: A::NAME,
            init: A::init,
            to_init_attributes: A::to_init_attributes,
            from_init_attributes: A::from_init_attributes,
            on_finalize_attributes: A::on_finalize_attributes,
            pick_random_items: A::pick_random_items,
            holds_random: A::holds_random,
        }
    }
}

impl fmt::Debug for AttributeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AttributeEntry").field(&self.name).finish()
    }
}

/// Ordered attribute entries.
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    entries: Vec<AttributeEntry>,
}

impl AttributeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `A` to the declared order.
    ///
    /// # Panics
    ///
    /// Panics if an attribute with the same name is already registered; the
    /// order is static program configuration.
    #[must_use]
    pub fn register<A: Attribute>(mut self) -> Self {
        assert!(
            self.position(A::NAME).is_none(),
            "attribute '{}' registered twice",
            A::NAME
        );
        self.entries.push(AttributeEntry::of::<A>());
        self
    }

    /// Entries in declared order.
    #[must_use]
    pub fn entries(&self) -> &[AttributeEntry] {
        &self.entries
    }

    /// Declared names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Position of `name` in the declared order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no attribute is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
