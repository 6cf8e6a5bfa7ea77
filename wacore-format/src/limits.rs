// Wacore - wacore-format
// Module: Limits and the table/memory/global/event types built from them
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

use crate::value_types::{Mutability, RefType, ValueType};
use wacore_error::prelude::*;

/// Minimum and optional maximum size for a table or memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Minimum size (pages for memory, elements for table).
    pub min: u32,
    /// Maximum size, if declared.
    pub max: Option<u32>,
    /// Whether the memory may be shared between agents. Always `false` for
    /// table limits.
    pub shared: bool,
}

impl Limits {
    /// Decodes a limits flags byte: bit 0 is has-max, bit 1 is shared.
    /// Any other bit set is "Invalid flags value".
    pub fn flags_from_byte(byte: u8) -> Result<(bool, bool)> {
        if byte & !0b11 != 0 {
            return Err(kinds::parse_error(
                codes::INVALID_LIMITS_FLAGS,
                invalid_flags_message(byte),
            ));
        }
        Ok((byte & 0b01 != 0, byte & 0b10 != 0))
    }
}

#[cfg(feature = "std")]
fn invalid_flags_message(byte: u8) -> std::string::String {
    std::format!("Invalid flags value: {byte:#x}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn invalid_flags_message(byte: u8) -> alloc::string::String {
    alloc::format!("Invalid flags value: {byte:#x}")
}

/// A table's limits and element reference type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableType {
    /// Size limits, in elements.
    pub limits: Limits,
    /// The type of reference this table holds.
    pub element_type: RefType,
}

/// A memory's limits (in 64KiB pages) and sharing flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryType {
    /// Size limits, in pages.
    pub limits: Limits,
}

impl MemoryType {
    /// `true` when the memory may be shared between agents.
    pub fn is_shared(&self) -> bool {
        self.limits.shared
    }
}

/// A global's value type and mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalType {
    /// The value type the global holds.
    pub value_type: ValueType,
    /// Whether `global.set` may write this global.
    pub mutability: Mutability,
}

/// The attribute byte of an event type; `Exception` is the only value the
/// exception-handling proposal currently defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAttribute {
    /// An exception event, whose payload is given by a function type index.
    Exception,
}

/// An event (exception tag) type: attribute plus the function type index
/// describing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventType {
    /// The event's attribute.
    pub attribute: EventAttribute,
    /// Index into the type section naming the payload's function type.
    pub type_index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_decode_has_max_and_shared_bits() {
        assert_eq!(Limits::flags_from_byte(0b00).unwrap(), (false, false));
        assert_eq!(Limits::flags_from_byte(0b01).unwrap(), (true, false));
        assert_eq!(Limits::flags_from_byte(0b11).unwrap(), (true, true));
    }

    #[test]
    fn stray_bits_are_rejected() {
        let err = Limits::flags_from_byte(0b100).unwrap_err();
        assert_eq!(err.code, codes::INVALID_LIMITS_FLAGS);
    }
}
