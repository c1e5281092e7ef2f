//! HTML character reference recognition.
//!
//! The escaper asks an [`EntityProbe`] whether a `&` starts a character
//! reference that should be kept intact. [`Html5Entities`] recognizes decimal,
//! hexadecimal and named references; [`NoEntities`] never matches.

use std::sync::LazyLock;

use regex::Regex;

use crate::entity_names::NAMED_ENTITIES;

/// Regex pattern for an entity reference at the start of the haystack.
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|([A-Za-z][A-Za-z0-9]{1,31}));")
        .expect("invalid entity regex")
});

/// Recognizes HTML character references.
pub trait EntityProbe {
    /// Length of the character reference starting at `position`, or 0.
    ///
    /// Only `buffer[position..position + remaining]` may be inspected.
    fn probe(&self, buffer: &str, position: usize, remaining: usize) -> usize;
}

impl<P: EntityProbe + ?Sized> EntityProbe for &P {
    fn probe(&self, buffer: &str, position: usize, remaining: usize) -> usize {
        (**self).probe(buffer, position, remaining)
    }
}

/// Probe for numeric references and HTML named character references.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html5Entities;

impl EntityProbe for Html5Entities {
    fn probe(&self, buffer: &str, position: usize, remaining: usize) -> usize {
        let Some(window) = position
            .checked_add(remaining)
            .and_then(|end| buffer.get(position..end))
        else {
            return 0;
        };
        let Some(caps) = ENTITY_PATTERN.captures(window) else {
            return 0;
        };
        match caps.get(1) {
            Some(name) if !is_named_entity(name.as_str()) => 0,
            _ => caps[0].len(),
        }
    }
}

/// Probe that never recognizes a reference, so every `&` is escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntities;

impl EntityProbe for NoEntities {
    fn probe(&self, _buffer: &str, _position: usize, _remaining: usize) -> usize {
        0
    }
}

/// Check an entity name against the HTML5 table of named character
/// references. Names are case-sensitive.
pub fn is_named_entity(name: &str) -> bool {
    NAMED_ENTITIES.binary_search(&name).is_ok()
}
