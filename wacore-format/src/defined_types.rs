// Wacore - wacore-format
// Module: Defined types (function / struct / array)
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Entries of the type section: function types (always), and struct/array
//! types (under the GC proposal).

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use crate::value_types::{Mutability, ValueType};
use wacore_error::prelude::*;

/// Packed storage types usable only inside a struct/array field, never on
/// the operand stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedType {
    /// 8-bit packed integer.
    I8,
    /// 16-bit packed integer.
    I16,
}

/// The type of a struct/array field's storage: either a full value type or
/// a packed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// An ordinary value type.
    Value(ValueType),
    /// A packed type, narrower than any value type.
    Packed(PackedType),
}

/// A struct or array field: its storage type plus mutability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldType {
    /// The field's storage type.
    pub storage: StorageType,
    /// Whether `struct.set`/`array.set` may write this field.
    pub mutability: Mutability,
}

/// A function signature: parameter types followed by result types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    /// Parameter types, in argument order.
    pub params: Vec<ValueType>,
    /// Result types. More than one requires the multi-value proposal (the
    /// distilled spec's §9 notes the decoder accepts this unconditionally
    /// and defers the proposal check to validation).
    pub results: Vec<ValueType>,
}

/// A GC struct type: an ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructType {
    /// Fields, in declaration order.
    pub fields: Vec<FieldType>,
}

/// A GC array type: a single, repeated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayType {
    /// The element field type.
    pub element: FieldType,
}

/// One entry of the type section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinedType {
    /// `0x60` form.
    Func(FuncType),
    /// GC struct form, gated on the GC proposal.
    Struct(StructType),
    /// GC array form, gated on the GC proposal.
    Array(ArrayType),
}

impl DefinedType {
    /// The function type this entry defines, if it is a function type.
    pub fn as_func(&self) -> Option<&FuncType> {
        match self {
            DefinedType::Func(f) => Some(f),
            _ => None,
        }
    }
}

/// Decodes a type-section form byte into the shape the entry will take.
///
/// `0x60` is a function type; `0x5E` is an array type and `0x5F` a struct
/// type under the GC proposal (matching the upstream GC proposal's type
/// section encoding). Any other byte is "Unknown type form: F".
pub fn type_form_from_byte(byte: u8) -> Result<TypeForm> {
    match byte {
        0x60 => Ok(TypeForm::Func),
        0x5E => Ok(TypeForm::Array),
        0x5F => Ok(TypeForm::Struct),
        _ => Err(kinds::parse_error(
            codes::UNKNOWN_TYPE_FORM,
            format_form(byte),
        )),
    }
}

#[cfg(feature = "std")]
fn format_form(byte: u8) -> std::string::String {
    std::format!("Unknown type form: {byte:#x}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn format_form(byte: u8) -> alloc::string::String {
    alloc::format!("Unknown type form: {byte:#x}")
}

/// Which concrete shape a type-section entry's form byte selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeForm {
    /// `0x60`.
    Func,
    /// `0x5E`, gated on the GC proposal.
    Array,
    /// `0x5F`, gated on the GC proposal.
    Struct,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_types::ValueType;

    #[test]
    fn func_form_is_0x60() {
        assert_eq!(type_form_from_byte(0x60).unwrap(), TypeForm::Func);
    }

    #[test]
    fn gc_forms_decode() {
        assert_eq!(type_form_from_byte(0x5E).unwrap(), TypeForm::Array);
        assert_eq!(type_form_from_byte(0x5F).unwrap(), TypeForm::Struct);
    }

    #[test]
    fn unknown_form_is_an_error() {
        let err = type_form_from_byte(0x00).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_TYPE_FORM);
    }

    #[test]
    fn func_type_equality_is_structural() {
        let a = FuncType { params: Vec::from([ValueType::I32]), results: Vec::new() };
        let b = FuncType { params: Vec::from([ValueType::I32]), results: Vec::new() };
        assert_eq!(a, b);
    }
}
