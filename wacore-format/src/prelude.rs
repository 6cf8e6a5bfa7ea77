// Wacore - wacore-format
// Module: Prelude
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Re-exports the types a caller decoding or validating a module typically
//! needs, so `use wacore_format::prelude::*;` is enough.

pub use crate::defined_types::{
    type_form_from_byte, ArrayType, DefinedType, FieldType, FuncType, PackedType, StorageType,
    StructType, TypeForm,
};
pub use crate::features::Features;
pub use crate::limits::{EventAttribute, EventType, GlobalType, Limits, MemoryType, TableType};
pub use crate::opcode::{lookup as lookup_opcode, Encoding, FixedSignature, ImmediateShape, OpcodeInfo, OPCODES};
pub use crate::section::{BlockType, ExternalKind, SectionId, CUSTOM_SECTION_ID};
pub use crate::value_types::{HeapType, Mutability, RefType, Rtt, ValueType};
