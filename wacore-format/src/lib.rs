// Wacore - wacore-format
// Module: WebAssembly binary format types
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Value-domain types for the WebAssembly binary format: value/heap/
//! reference types, defined types (function/struct/array), limits and the
//! table/memory/global/event types built from them, section and external-
//! kind identifiers, block types, the proposal [`Features`] set, and the
//! opcode metadata table consumed by `wacore-decoder`.
//!
//! This crate holds no decoding logic and borrows no input bytes — it is
//! the vocabulary `wacore-decoder` decodes into and `wacore-decoder`'s
//! validator reasons about.

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc;

pub mod defined_types;
pub mod features;
pub mod limits;
pub mod opcode;
pub mod prelude;
pub mod section;
pub mod value_types;

pub use defined_types::{ArrayType, DefinedType, FieldType, FuncType, StorageType, StructType};
pub use features::Features;
pub use limits::{EventAttribute, EventType, GlobalType, Limits, MemoryType, TableType};
pub use opcode::{lookup as lookup_opcode, Encoding, ImmediateShape, OpcodeInfo, OPCODES};
pub use section::{BlockType, ExternalKind, SectionId};
pub use value_types::{HeapType, Mutability, RefType, Rtt, ValueType};
