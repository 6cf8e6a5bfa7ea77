// Wacore - wacore-format
// Module: Value, heap, and reference types
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Numeric, reference, and runtime ("rtt") value types, plus the heap types
//! a reference type can point at.

use wacore_error::prelude::*;

/// A numeric, vector, reference, or rtt value that may live on the operand
/// stack, in a local, or as a global's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// 128-bit vector.
    V128,
    /// Reference type.
    Ref(RefType),
    /// Runtime type, used by the GC proposal for downcasts.
    Rtt(Rtt),
}

impl ValueType {
    /// Decodes a value-type byte, per the encoding listed in the distilled
    /// specification's §6 (`Unknown value type: V` on mismatch).
    pub fn from_byte(byte: u8) -> Result<Self> {
        Ok(match byte {
            0x7F => ValueType::I32,
            0x7E => ValueType::I64,
            0x7D => ValueType::F32,
            0x7C => ValueType::F64,
            0x7B => ValueType::V128,
            0x70 => ValueType::Ref(RefType { heap_type: HeapType::Func, nullable: true }),
            0x6F => ValueType::Ref(RefType { heap_type: HeapType::Extern, nullable: true }),
            0x6E => ValueType::Ref(RefType { heap_type: HeapType::Any, nullable: true }),
            0x6D => ValueType::Ref(RefType { heap_type: HeapType::Eq, nullable: true }),
            0x6C => ValueType::Ref(RefType { heap_type: HeapType::I31, nullable: true }),
            0x68 => ValueType::Ref(RefType { heap_type: HeapType::Exn, nullable: true }),
            _ => {
                return Err(kinds::parse_error(
                    codes::UNKNOWN_TYPE_BYTE,
                    format_unknown("value type", byte),
                ))
            }
        })
    }

    /// `true` for `i32`/`i64`/`f32`/`f64` (not `v128`, references, or rtts).
    pub fn is_plain_numeric(self) -> bool {
        matches!(self, ValueType::I32 | ValueType::I64 | ValueType::F32 | ValueType::F64)
    }

    /// `true` for any reference type.
    pub fn is_reference(self) -> bool {
        matches!(self, ValueType::Ref(_))
    }
}

/// The referent kind of a reference type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapType {
    /// Any function type (the concrete signature is unconstrained).
    Func,
    /// Any host reference.
    Extern,
    /// Top type of the GC type hierarchy.
    Any,
    /// Comparable GC references (structs, arrays, `i31`).
    Eq,
    /// Unboxed 31-bit integer.
    I31,
    /// Exception reference.
    Exn,
    /// A concrete defined type, identified by its index in the type
    /// section.
    Index(u32),
}

/// A reference type: `(heap_type, nullable?)`. The canonical short forms
/// (`funcref`, `externref`, `exnref`) are `ref null <heap-kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefType {
    /// The referent heap type.
    pub heap_type: HeapType,
    /// Whether `ref.null` is a valid value of this type.
    pub nullable: bool,
}

impl RefType {
    /// The canonical `funcref` short form.
    pub const FUNCREF: RefType = RefType { heap_type: HeapType::Func, nullable: true };
    /// The canonical `externref` short form.
    pub const EXTERNREF: RefType = RefType { heap_type: HeapType::Extern, nullable: true };
    /// The canonical `exnref` short form.
    pub const EXNREF: RefType = RefType { heap_type: HeapType::Exn, nullable: true };
}

/// Runtime type `(depth, heap_type)`, used by the GC proposal's `rtt.canon`/
/// `rtt.sub`/`ref.cast` family for downcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rtt {
    /// Nesting depth of the rtt value.
    pub depth: u32,
    /// The heap type this rtt certifies.
    pub heap_type: HeapType,
}

/// Mutability of a global or struct/array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// `global.set`/field write is rejected.
    Const,
    /// `global.set`/field write is permitted.
    Var,
}

impl Mutability {
    /// Decodes a mutability byte (`0x00` const, `0x01` var).
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Mutability::Const),
            0x01 => Ok(Mutability::Var),
            _ => Err(kinds::parse_error(
                codes::INVALID_LIMITS_FLAGS,
                format_unknown("mutability", byte),
            )),
        }
    }

    /// `true` when `Var`.
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Var)
    }
}

#[cfg(feature = "std")]
fn format_unknown(what: &str, byte: u8) -> std::string::String {
    std::format!("Unknown {what}: {byte:#x}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn format_unknown(what: &str, byte: u8) -> alloc::string::String {
    alloc::format!("Unknown {what}: {byte:#x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_and_reference_bytes() {
        assert_eq!(ValueType::from_byte(0x7F).unwrap(), ValueType::I32);
        assert_eq!(ValueType::from_byte(0x7B).unwrap(), ValueType::V128);
        assert_eq!(
            ValueType::from_byte(0x70).unwrap(),
            ValueType::Ref(RefType::FUNCREF)
        );
        assert_eq!(
            ValueType::from_byte(0x6F).unwrap(),
            ValueType::Ref(RefType::EXTERNREF)
        );
    }

    #[test]
    fn rejects_unknown_byte() {
        let err = ValueType::from_byte(0x00).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_TYPE_BYTE);
    }

    #[test]
    fn mutability_round_trips() {
        assert!(!Mutability::from_byte(0x00).unwrap().is_mutable());
        assert!(Mutability::from_byte(0x01).unwrap().is_mutable());
        assert!(Mutability::from_byte(0x02).is_err());
    }
}
