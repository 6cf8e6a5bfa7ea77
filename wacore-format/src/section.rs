// Wacore - wacore-format
// Module: Section ids, external kinds, block types
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Identifiers used in the module envelope: the section id byte, the
//! import/export external-kind byte, and the block-type encoding used by
//! control instructions.

use crate::value_types::ValueType;
use wacore_error::prelude::*;

/// A known section's id byte. Custom sections (id `0`) are modeled
/// separately since they carry a name rather than fitting this enum's
/// "exactly one per module, in order" discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SectionId {
    /// Type section (`1`).
    Type = 1,
    /// Import section (`2`).
    Import = 2,
    /// Function section (`3`).
    Function = 3,
    /// Table section (`4`).
    Table = 4,
    /// Memory section (`5`).
    Memory = 5,
    /// Global section (`6`).
    Global = 6,
    /// Export section (`7`).
    Export = 7,
    /// Start section (`8`).
    Start = 8,
    /// Element section (`9`).
    Element = 9,
    /// Code section (`10`).
    Code = 10,
    /// Data section (`11`).
    Data = 11,
    /// Data-count section (`12`).
    DataCount = 12,
    /// Event section (`13`), part of the exception-handling proposal.
    Event = 13,
}

impl SectionId {
    /// Decodes a section id byte. `0` (custom) is handled by the caller
    /// before reaching this function; any id outside `1..=13` is
    /// "Unknown section id".
    pub fn from_byte(byte: u8) -> Result<Self> {
        Ok(match byte {
            1 => SectionId::Type,
            2 => SectionId::Import,
            3 => SectionId::Function,
            4 => SectionId::Table,
            5 => SectionId::Memory,
            6 => SectionId::Global,
            7 => SectionId::Export,
            8 => SectionId::Start,
            9 => SectionId::Element,
            10 => SectionId::Code,
            11 => SectionId::Data,
            12 => SectionId::DataCount,
            13 => SectionId::Event,
            _ => {
                return Err(kinds::core_error(
                    codes::UNKNOWN_SECTION_ID,
                    unknown_section_message(byte),
                ))
            }
        })
    }

    /// The canonical order section ids must appear in (ascending, each at
    /// most once).
    pub fn canonical_order(self) -> u8 {
        self as u8
    }
}

#[cfg(feature = "std")]
fn unknown_section_message(byte: u8) -> std::string::String {
    std::format!("Unknown section id: {byte}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn unknown_section_message(byte: u8) -> alloc::string::String {
    alloc::format!("Unknown section id: {byte}")
}

/// The `0` byte marking a custom section; kept as a named constant since
/// custom sections never match [`SectionId::from_byte`].
pub const CUSTOM_SECTION_ID: u8 = 0;

/// The kind of entity an import or export refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    /// Function.
    Function = 0,
    /// Table.
    Table = 1,
    /// Memory.
    Memory = 2,
    /// Global.
    Global = 3,
    /// Event (exception-handling proposal).
    Event = 4,
}

impl ExternalKind {
    /// Decodes an external-kind byte.
    pub fn from_byte(byte: u8) -> Result<Self> {
        Ok(match byte {
            0 => ExternalKind::Function,
            1 => ExternalKind::Table,
            2 => ExternalKind::Memory,
            3 => ExternalKind::Global,
            4 => ExternalKind::Event,
            _ => {
                return Err(kinds::parse_error(
                    codes::UNKNOWN_EXTERNAL_KIND,
                    unknown_kind_message(byte),
                ))
            }
        })
    }
}

#[cfg(feature = "std")]
fn unknown_kind_message(byte: u8) -> std::string::String {
    std::format!("Unknown external kind: {byte}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn unknown_kind_message(byte: u8) -> alloc::string::String {
    alloc::format!("Unknown external kind: {byte}")
}

/// A control instruction's type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// `0x40`: no parameters, no results.
    Empty,
    /// A single result value type, no parameters.
    Value(ValueType),
    /// A function type index: arbitrary parameters and results (multi-value).
    FuncType(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_ids_decode_in_numeric_order() {
        assert_eq!(SectionId::from_byte(1).unwrap(), SectionId::Type);
        assert_eq!(SectionId::from_byte(13).unwrap(), SectionId::Event);
        assert!(SectionId::Type < SectionId::Code);
    }

    #[test]
    fn unknown_section_id_is_an_error() {
        let err = SectionId::from_byte(14).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_SECTION_ID);
    }

    #[test]
    fn external_kind_round_trips() {
        assert_eq!(ExternalKind::from_byte(0).unwrap(), ExternalKind::Function);
        assert_eq!(ExternalKind::from_byte(4).unwrap(), ExternalKind::Event);
        assert!(ExternalKind::from_byte(5).is_err());
    }
}
