// Wacore - wacore-decoder
// Module: Prelude
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Re-exports the types a caller decoding or validating a module typically
//! needs, so `use wacore_decoder::prelude::*;` is enough alongside
//! `wacore_format::prelude::*`.

pub use crate::context::{FuncValidator, Label, LabelKind, ModuleContext};
pub use crate::cursor::Cursor;
pub use crate::instruction::{decode_instruction, Immediate, Instruction, MemArg};
pub use crate::module::{
    decode_header, CustomSection, DataMode, DataSegment, ElementInit, ElementMode, ElementSegment, Export,
    FunctionBody, Global, Import, ImportDesc, Section, SectionBody, SectionIter,
};
pub use crate::validate::{local_type, validate_function_body};
pub use crate::visitor::{drive, validate_module, Control, Entry, ValidatingVisitor, Visitor};
pub use crate::{decode_module, validate_binary, ModuleState};
