// Wacore - wacore-decoder
// Module: Module envelope and section bodies
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decodes a module's magic/version header and its lazily-iterated section
//! sequence, and the entry format of each known section.

#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};

use wacore_error::prelude::*;
use wacore_format::prelude::*;

use crate::cursor::Cursor;
use crate::instruction::{decode_instruction, Instruction};

/// `\0asm`.
pub const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];
/// Binary format version this decoder understands.
pub const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// One import's external description.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportDesc {
    /// A function, naming its type index.
    Function(u32),
    /// A table.
    Table(TableType),
    /// A memory.
    Memory(MemoryType),
    /// A global.
    Global(GlobalType),
    /// An event (exception-handling proposal).
    Event(EventType),
}

/// One entry of the import section.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// Module name.
    pub module: String,
    /// Field name within that module.
    pub name: String,
    /// What kind of entity is imported, and its type.
    pub desc: ImportDesc,
}

/// One entry of the export section.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// Exported name. Export names must be unique within a module.
    pub name: String,
    /// Kind of entity exported.
    pub kind: ExternalKind,
    /// Index into the corresponding index space.
    pub index: u32,
}

/// A constant expression: a short instruction sequence ending in `end`,
/// used for global initializers and element/data segment offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstExpr {
    /// The single constant-producing instruction (the `end` terminator is
    /// not included).
    pub instruction: Instruction,
}

/// One entry of the global section.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    /// The global's type.
    pub global_type: GlobalType,
    /// Its initializer expression.
    pub init: ConstExpr,
}

/// How an element segment's contents are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementInit {
    /// A vector of function indices (the MVP `elemkind funcref` form).
    FuncIndices(Vec<u32>),
    /// A vector of reference-typed constant expressions (reference-types
    /// proposal's general form).
    Expressions(Vec<ConstExpr>),
}

/// How an element segment is placed.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementMode {
    /// Placed into a table at module instantiation.
    Active {
        /// The destination table index.
        table_index: u32,
        /// The constant expression computing the placement offset.
        offset: ConstExpr,
    },
    /// Not placed; usable only by `table.init`.
    Passive,
    /// Declares functions as "declared" for `ref.func` without placing them.
    Declared,
}

/// One entry of the element section.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSegment {
    /// Placement mode.
    pub mode: ElementMode,
    /// Element reference type.
    pub element_type: RefType,
    /// The segment's contents.
    pub init: ElementInit,
}

/// How a data segment is placed.
#[derive(Debug, Clone, PartialEq)]
pub enum DataMode {
    /// Placed into a memory at module instantiation.
    Active {
        /// The destination memory index.
        memory_index: u32,
        /// The constant expression computing the placement offset.
        offset: ConstExpr,
    },
    /// Not placed; usable only by `memory.init`.
    Passive,
}

/// One entry of the data section.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSegment {
    /// Placement mode.
    pub mode: DataMode,
    /// Raw byte contents.
    pub bytes: Vec<u8>,
}

/// A decoded function body: its compressed local-variable groups and
/// instruction sequence (including the trailing `end`).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    /// `(count, type)` groups, in declaration order. A local's effective
    /// index is found by summing group counts, not by binary-searching a
    /// sorted table (`wacore-decoder` does no index pre-flattening; the
    /// validator sums group counts as it encounters each local reference).
    pub locals: Vec<(u32, ValueType)>,
    /// Every instruction in the body, including the final `end`.
    pub instructions: Vec<Instruction>,
}

/// A custom section: an arbitrary name and payload, not subject to
/// canonical ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomSection {
    /// The section's declared name.
    pub name: String,
    /// Raw payload bytes.
    pub bytes: Vec<u8>,
}

/// The body of one known (non-custom) section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    /// Type section.
    Type(Vec<DefinedType>),
    /// Import section.
    Import(Vec<Import>),
    /// Function section: type indices, one per defined function.
    Function(Vec<u32>),
    /// Table section.
    Table(Vec<TableType>),
    /// Memory section.
    Memory(Vec<MemoryType>),
    /// Global section.
    Global(Vec<Global>),
    /// Export section.
    Export(Vec<Export>),
    /// Start section: the start function's index.
    Start(u32),
    /// Element section.
    Element(Vec<ElementSegment>),
    /// Code section.
    Code(Vec<FunctionBody>),
    /// Data section.
    Data(Vec<DataSegment>),
    /// Data-count section: declared number of data segments.
    DataCount(u32),
    /// Event section.
    Event(Vec<EventType>),
}

/// One section as encountered while iterating a module, in the order it
/// appeared in the byte stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// A custom section (id `0`).
    Custom(CustomSection),
    /// A known section, identified by id.
    Known(SectionId, SectionBody),
}

/// Verifies the 8-byte module header (`\0asm` plus version `1`), leaving
/// the cursor positioned at the first section.
pub fn decode_header(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<()> {
    let _guard = ctx.push("module header", cursor.position());
    let magic = cursor.read_bytes(4, ctx)?;
    if magic != MAGIC {
        return Err(kinds::core_error(codes::INVALID_MAGIC, "invalid magic number").with_context(ctx.clone()));
    }
    let version = cursor.read_bytes(4, ctx)?;
    if version != VERSION {
        return Err(kinds::core_error(codes::INVALID_VERSION, "unsupported version").with_context(ctx.clone()));
    }
    Ok(())
}

/// Lazily iterates a module's section sequence: each call to
/// [`Iterator::next`] decodes one section's id and length, then its body,
/// advancing the cursor past it. Known section ids must appear at most
/// once and in ascending order; custom sections may appear anywhere and
/// any number of times.
pub struct SectionIter<'a, 'c> {
    cursor: Cursor<'a>,
    ctx: &'c ContextStack,
    features: Features,
    last_known_id: u8,
}

impl<'a, 'c> SectionIter<'a, 'c> {
    /// Creates an iterator starting right after the module header.
    pub fn new(cursor: Cursor<'a>, ctx: &'c ContextStack, features: Features) -> Self {
        SectionIter { cursor, ctx, features, last_known_id: 0 }
    }

    /// The cursor's current position, for callers that want to resume
    /// manual decoding after the iterator is dropped.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn decode_one(&mut self) -> Result<Section> {
        let id_offset = self.cursor.position();
        let id_byte = self.cursor.read_u8(self.ctx)?;
        let length = self.cursor.read_length(self.ctx)? as usize;
        let body_bytes = self.cursor.read_bytes(length, self.ctx)?;
        let mut body_cursor = Cursor::new(body_bytes);

        if id_byte == CUSTOM_SECTION_ID {
            let _guard = self.ctx.push("custom section", id_offset);
            let name = body_cursor.read_custom_section_name_or_lossy(self.ctx)?;
            let bytes = body_cursor.rest().to_vec();
            return Ok(Section::Custom(CustomSection { name, bytes }));
        }

        let id = SectionId::from_byte(id_byte)?;
        if (id as u8) <= self.last_known_id {
            return Err(kinds::core_error(codes::SECTION_OUT_OF_ORDER, section_order_message(id))
                .with_context(self.ctx.clone()));
        }
        self.last_known_id = id as u8;

        let _guard = self.ctx.push("section", id_offset);
        let body = decode_section_body(id, &mut body_cursor, self.ctx, &self.features)?;
        if !body_cursor.is_empty() {
            return Err(kinds::core_error(codes::SECTION_LENGTH_MISMATCH, "section body has trailing bytes")
                .with_context(self.ctx.clone()));
        }
        Ok(Section::Known(id, body))
    }
}

impl<'a, 'c> Iterator for SectionIter<'a, 'c> {
    type Item = Result<Section>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_empty() {
            return None;
        }
        Some(self.decode_one())
    }
}

#[cfg(feature = "std")]
fn section_order_message(id: SectionId) -> String {
    std::format!("section {:?} is out of canonical order", id)
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn section_order_message(id: SectionId) -> String {
    alloc::format!("section {:?} is out of canonical order", id)
}

trait CustomNameExt {
    fn read_custom_section_name_or_lossy(&mut self, ctx: &ContextStack) -> Result<String>;
}

impl CustomNameExt for Cursor<'_> {
    #[cfg(feature = "std")]
    fn read_custom_section_name_or_lossy(&mut self, ctx: &ContextStack) -> Result<String> {
        self.read_custom_section_name(ctx)
    }

    #[cfg(all(not(feature = "std"), feature = "alloc"))]
    fn read_custom_section_name_or_lossy(&mut self, ctx: &ContextStack) -> Result<String> {
        let s = self.read_string(ctx)?;
        Ok(String::from(s))
    }
}

fn decode_const_expr(cursor: &mut Cursor<'_>, ctx: &ContextStack, features: &Features) -> Result<ConstExpr> {
    let _guard = ctx.push("constant expression", cursor.position());
    let instruction = decode_instruction(cursor, ctx, features)?;
    match instruction.info.mnemonic {
        "i32.const" | "i64.const" | "f32.const" | "f64.const" | "global.get" | "ref.null" | "ref.func" => {}
        other => {
            return Err(kinds::parse_error(
                codes::MALFORMED_CONST_EXPR,
                const_expr_message(other),
            )
            .with_context(ctx.clone()))
        }
    }
    let end = decode_instruction(cursor, ctx, features)?;
    if end.info.mnemonic != "end" {
        return Err(kinds::parse_error(codes::MALFORMED_CONST_EXPR, "constant expression not terminated by end")
            .with_context(ctx.clone()));
    }
    Ok(ConstExpr { instruction })
}

#[cfg(feature = "std")]
fn const_expr_message(mnemonic: &str) -> String {
    std::format!("instruction not valid in a constant expression: {mnemonic}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn const_expr_message(mnemonic: &str) -> String {
    alloc::format!("instruction not valid in a constant expression: {mnemonic}")
}

fn decode_func_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<FuncType> {
    let params = cursor.read_vector(ctx, |c, ctx| ValueType::from_byte(c.read_u8(ctx)?))?;
    let results = cursor.read_vector(ctx, |c, ctx| ValueType::from_byte(c.read_u8(ctx)?))?;
    Ok(FuncType { params, results })
}

fn decode_storage_type(byte_or_value: u8) -> Result<StorageType> {
    match byte_or_value {
        0x7A => Ok(StorageType::Packed(PackedType::I8)),
        0x79 => Ok(StorageType::Packed(PackedType::I16)),
        other => Ok(StorageType::Value(ValueType::from_byte(other)?)),
    }
}

fn decode_field_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<FieldType> {
    let byte = cursor.read_u8(ctx)?;
    let storage = decode_storage_type(byte)?;
    let mutability = Mutability::from_byte(cursor.read_u8(ctx)?)?;
    Ok(FieldType { storage, mutability })
}

fn decode_defined_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<DefinedType> {
    let form_byte = cursor.read_u8(ctx)?;
    match type_form_from_byte(form_byte)? {
        TypeForm::Func => Ok(DefinedType::Func(decode_func_type(cursor, ctx)?)),
        TypeForm::Struct => {
            let fields = cursor.read_vector(ctx, decode_field_type)?;
            Ok(DefinedType::Struct(StructType { fields }))
        }
        TypeForm::Array => {
            let element = decode_field_type(cursor, ctx)?;
            Ok(DefinedType::Array(ArrayType { element }))
        }
    }
}

fn decode_limits(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<Limits> {
    let flags = cursor.read_u8(ctx)?;
    let (has_max, shared) = Limits::flags_from_byte(flags)?;
    let min = cursor.read_u32(ctx)?;
    let max = if has_max { Some(cursor.read_u32(ctx)?) } else { None };
    Ok(Limits { min, max, shared })
}

fn decode_ref_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<RefType> {
    let byte = cursor.rest().first().copied();
    match byte {
        Some(0x63) => {
            cursor.read_u8(ctx)?;
            let heap_type = decode_heap_type(cursor, ctx)?;
            Ok(RefType { heap_type, nullable: true })
        }
        Some(0x64) => {
            cursor.read_u8(ctx)?;
            let heap_type = decode_heap_type(cursor, ctx)?;
            Ok(RefType { heap_type, nullable: false })
        }
        _ => match ValueType::from_byte(cursor.read_u8(ctx)?)? {
            ValueType::Ref(rt) => Ok(rt),
            _ => Err(kinds::parse_error(codes::UNKNOWN_TYPE_BYTE, "expected a reference type").with_context(ctx.clone())),
        },
    }
}

fn decode_heap_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<HeapType> {
    let byte = cursor.rest().first().copied();
    Ok(match byte {
        Some(0x70) => {
            cursor.read_u8(ctx)?;
            HeapType::Func
        }
        Some(0x6F) => {
            cursor.read_u8(ctx)?;
            HeapType::Extern
        }
        Some(0x6E) => {
            cursor.read_u8(ctx)?;
            HeapType::Any
        }
        Some(0x6D) => {
            cursor.read_u8(ctx)?;
            HeapType::Eq
        }
        Some(0x6C) => {
            cursor.read_u8(ctx)?;
            HeapType::I31
        }
        Some(0x68) => {
            cursor.read_u8(ctx)?;
            HeapType::Exn
        }
        _ => {
            let idx = cursor.read_s32(ctx)?;
            if idx < 0 {
                return Err(kinds::parse_error(codes::UNKNOWN_TYPE_BYTE, "heap type index must be non-negative")
                    .with_context(ctx.clone()));
            }
            HeapType::Index(idx as u32)
        }
    })
}

fn decode_table_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<TableType> {
    let element_type = decode_ref_type(cursor, ctx)?;
    let limits = decode_limits(cursor, ctx)?;
    Ok(TableType { limits, element_type })
}

fn decode_memory_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<MemoryType> {
    Ok(MemoryType { limits: decode_limits(cursor, ctx)? })
}

fn decode_global_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<GlobalType> {
    let value_type = ValueType::from_byte(cursor.read_u8(ctx)?)?;
    let mutability = Mutability::from_byte(cursor.read_u8(ctx)?)?;
    Ok(GlobalType { value_type, mutability })
}

fn decode_event_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<EventType> {
    let attribute_byte = cursor.read_u8(ctx)?;
    if attribute_byte != 0 {
        return Err(kinds::parse_error(codes::UNKNOWN_TYPE_FORM, "unknown event attribute").with_context(ctx.clone()));
    }
    let type_index = cursor.read_u32(ctx)?;
    Ok(EventType { attribute: EventAttribute::Exception, type_index })
}

fn decode_import(cursor: &mut Cursor<'_>, ctx: &ContextStack, features: &Features) -> Result<Import> {
    let module = String::from(cursor.read_string(ctx)?);
    let name = String::from(cursor.read_string(ctx)?);
    let kind_byte = cursor.read_u8(ctx)?;
    let desc = match ExternalKind::from_byte(kind_byte)? {
        ExternalKind::Function => ImportDesc::Function(cursor.read_u32(ctx)?),
        ExternalKind::Table => ImportDesc::Table(decode_table_type(cursor, ctx)?),
        ExternalKind::Memory => ImportDesc::Memory(decode_memory_type(cursor, ctx)?),
        ExternalKind::Global => {
            let global_type = decode_global_type(cursor, ctx)?;
            if global_type.mutability.is_mutable() && !features.mutable_globals {
                return Err(kinds::validation_error(
                    codes::MUTABLE_GLOBAL_NOT_ALLOWED,
                    "imported global is mutable but mutable-globals is disabled",
                )
                .with_context(ctx.clone()));
            }
            ImportDesc::Global(global_type)
        }
        ExternalKind::Event => ImportDesc::Event(decode_event_type(cursor, ctx)?),
    };
    Ok(Import { module, name, desc })
}

fn decode_export(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<Export> {
    let name = String::from(cursor.read_string(ctx)?);
    let kind = ExternalKind::from_byte(cursor.read_u8(ctx)?)?;
    let index = cursor.read_u32(ctx)?;
    Ok(Export { name, kind, index })
}

fn decode_element_segment(
    cursor: &mut Cursor<'_>,
    ctx: &ContextStack,
    features: &Features,
) -> Result<ElementSegment> {
    let flags = cursor.read_u32(ctx)?;
    match flags {
        0 => {
            let offset = decode_const_expr(cursor, ctx, features)?;
            let init = ElementInit::FuncIndices(cursor.read_vector(ctx, |c, ctx| c.read_u32(ctx))?);
            Ok(ElementSegment { mode: ElementMode::Active { table_index: 0, offset }, element_type: RefType::FUNCREF, init })
        }
        1 => {
            let _elem_kind = cursor.read_u8(ctx)?;
            let init = ElementInit::FuncIndices(cursor.read_vector(ctx, |c, ctx| c.read_u32(ctx))?);
            Ok(ElementSegment { mode: ElementMode::Passive, element_type: RefType::FUNCREF, init })
        }
        2 => {
            let table_index = cursor.read_u32(ctx)?;
            let offset = decode_const_expr(cursor, ctx, features)?;
            let _elem_kind = cursor.read_u8(ctx)?;
            let init = ElementInit::FuncIndices(cursor.read_vector(ctx, |c, ctx| c.read_u32(ctx))?);
            Ok(ElementSegment { mode: ElementMode::Active { table_index, offset }, element_type: RefType::FUNCREF, init })
        }
        3 => {
            let _elem_kind = cursor.read_u8(ctx)?;
            let init = ElementInit::FuncIndices(cursor.read_vector(ctx, |c, ctx| c.read_u32(ctx))?);
            Ok(ElementSegment { mode: ElementMode::Declared, element_type: RefType::FUNCREF, init })
        }
        4 => {
            let offset = decode_const_expr(cursor, ctx, features)?;
            let init = ElementInit::Expressions(cursor.read_vector(ctx, |c, ctx| decode_const_expr(c, ctx, features))?);
            Ok(ElementSegment { mode: ElementMode::Active { table_index: 0, offset }, element_type: RefType::FUNCREF, init })
        }
        5 => {
            let element_type = decode_ref_type(cursor, ctx)?;
            let init = ElementInit::Expressions(cursor.read_vector(ctx, |c, ctx| decode_const_expr(c, ctx, features))?);
            Ok(ElementSegment { mode: ElementMode::Passive, element_type, init })
        }
        6 => {
            let table_index = cursor.read_u32(ctx)?;
            let offset = decode_const_expr(cursor, ctx, features)?;
            let element_type = decode_ref_type(cursor, ctx)?;
            let init = ElementInit::Expressions(cursor.read_vector(ctx, |c, ctx| decode_const_expr(c, ctx, features))?);
            Ok(ElementSegment { mode: ElementMode::Active { table_index, offset }, element_type, init })
        }
        7 => {
            let element_type = decode_ref_type(cursor, ctx)?;
            let init = ElementInit::Expressions(cursor.read_vector(ctx, |c, ctx| decode_const_expr(c, ctx, features))?);
            Ok(ElementSegment { mode: ElementMode::Declared, element_type, init })
        }
        other => Err(kinds::parse_error(codes::UNKNOWN_TYPE_FORM, element_flags_message(other)).with_context(ctx.clone())),
    }
}

#[cfg(feature = "std")]
fn element_flags_message(flags: u32) -> String {
    std::format!("unknown element segment flags: {flags}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn element_flags_message(flags: u32) -> String {
    alloc::format!("unknown element segment flags: {flags}")
}

fn decode_data_segment(cursor: &mut Cursor<'_>, ctx: &ContextStack, features: &Features) -> Result<DataSegment> {
    let flags = cursor.read_u32(ctx)?;
    let mode = match flags {
        0 => DataMode::Active { memory_index: 0, offset: decode_const_expr(cursor, ctx, features)? },
        1 => DataMode::Passive,
        2 => {
            let memory_index = cursor.read_u32(ctx)?;
            let offset = decode_const_expr(cursor, ctx, features)?;
            DataMode::Active { memory_index, offset }
        }
        other => {
            return Err(kinds::parse_error(codes::UNKNOWN_TYPE_FORM, data_flags_message(other))
                .with_context(ctx.clone()))
        }
    };
    let len = cursor.read_length(ctx)? as usize;
    let bytes = cursor.read_bytes(len, ctx)?.to_vec();
    Ok(DataSegment { mode, bytes })
}

#[cfg(feature = "std")]
fn data_flags_message(flags: u32) -> String {
    std::format!("unknown data segment flags: {flags}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn data_flags_message(flags: u32) -> String {
    alloc::format!("unknown data segment flags: {flags}")
}

fn decode_locals_group(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<(u32, ValueType)> {
    let count = cursor.read_u32(ctx)?;
    let value_type = ValueType::from_byte(cursor.read_u8(ctx)?)?;
    Ok((count, value_type))
}

fn decode_function_body(cursor: &mut Cursor<'_>, ctx: &ContextStack, features: &Features) -> Result<FunctionBody> {
    let body_len = cursor.read_length(ctx)? as usize;
    let body_bytes = cursor.read_bytes(body_len, ctx)?;
    let mut body_cursor = Cursor::new(body_bytes);
    let locals = body_cursor.read_vector(ctx, decode_locals_group)?;

    let total_locals: u64 = locals.iter().map(|(count, _)| u64::from(*count)).sum();
    if total_locals > u64::from(u32::MAX) {
        return Err(kinds::validation_error(codes::TOO_MANY_LOCALS, "function declares too many locals")
            .with_context(ctx.clone()));
    }

    let mut instructions = Vec::new();
    loop {
        let instruction = decode_instruction(&mut body_cursor, ctx, features)?;
        let is_end = instruction.info.mnemonic == "end";
        instructions.push(instruction);
        if is_end && body_cursor.is_empty() {
            break;
        }
    }
    Ok(FunctionBody { locals, instructions })
}

fn decode_section_body(
    id: SectionId,
    cursor: &mut Cursor<'_>,
    ctx: &ContextStack,
    features: &Features,
) -> Result<SectionBody> {
    Ok(match id {
        SectionId::Type => SectionBody::Type(cursor.read_vector(ctx, decode_defined_type)?),
        SectionId::Import => SectionBody::Import(cursor.read_vector(ctx, |c, ctx| decode_import(c, ctx, features))?),
        SectionId::Function => SectionBody::Function(cursor.read_vector(ctx, |c, ctx| c.read_u32(ctx))?),
        SectionId::Table => SectionBody::Table(cursor.read_vector(ctx, decode_table_type)?),
        SectionId::Memory => SectionBody::Memory(cursor.read_vector(ctx, decode_memory_type)?),
        SectionId::Global => SectionBody::Global(cursor.read_vector(ctx, |c, ctx| {
            let global_type = decode_global_type(c, ctx)?;
            let init = decode_const_expr(c, ctx, features)?;
            Ok(Global { global_type, init })
        })?),
        SectionId::Export => SectionBody::Export(cursor.read_vector(ctx, decode_export)?),
        SectionId::Start => SectionBody::Start(cursor.read_u32(ctx)?),
        SectionId::Element => {
            SectionBody::Element(cursor.read_vector(ctx, |c, ctx| decode_element_segment(c, ctx, features))?)
        }
        SectionId::Code => SectionBody::Code(cursor.read_vector(ctx, |c, ctx| decode_function_body(c, ctx, features))?),
        SectionId::Data => SectionBody::Data(cursor.read_vector(ctx, |c, ctx| decode_data_segment(c, ctx, features))?),
        SectionId::DataCount => SectionBody::DataCount(cursor.read_u32(ctx)?),
        SectionId::Event => SectionBody::Event(cursor.read_vector(ctx, decode_event_type)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_accepts_magic_and_version() {
        let mut cursor = Cursor::new(&[0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]);
        let ctx = ContextStack::new();
        assert!(decode_header(&mut cursor, &ctx).is_ok());
    }

    #[test]
    fn header_rejects_bad_magic() {
        let mut cursor = Cursor::new(&[0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
        let ctx = ContextStack::new();
        let err = decode_header(&mut cursor, &ctx).unwrap_err();
        assert_eq!(err.code, codes::INVALID_MAGIC);
    }

    #[test]
    fn header_rejects_bad_version() {
        let mut cursor = Cursor::new(&[0x00, 0x61, 0x73, 0x6D, 0x02, 0x00, 0x00, 0x00]);
        let ctx = ContextStack::new();
        let err = decode_header(&mut cursor, &ctx).unwrap_err();
        assert_eq!(err.code, codes::INVALID_VERSION);
    }

    #[test]
    fn type_section_decodes_a_single_func_type() {
        // One entry: func () -> i32.
        let bytes = [0x01, 0x60, 0x00, 0x01, 0x7F];
        let mut cursor = Cursor::new(&bytes);
        let ctx = ContextStack::new();
        let body = decode_section_body(SectionId::Type, &mut cursor, &ctx, &Features::wasm_1_0()).unwrap();
        match body {
            SectionBody::Type(types) => {
                assert_eq!(types.len(), 1);
                assert_eq!(
                    types[0].as_func().unwrap().results,
                    Vec::from([ValueType::I32])
                );
            }
            _ => panic!("expected a type section"),
        }
    }

    #[test]
    fn section_iter_rejects_out_of_order_sections() {
        // Function section (3) followed by type section (1): out of order.
        let bytes = [0x03, 0x01, 0x00, 0x01, 0x01, 0x60, 0x00, 0x00];
        let ctx = ContextStack::new();
        let cursor = Cursor::new(&bytes);
        let mut iter = SectionIter::new(cursor, &ctx, Features::wasm_1_0());
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert_eq!(err.code, codes::SECTION_OUT_OF_ORDER);
    }

    #[test]
    fn custom_sections_do_not_affect_canonical_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0x00, 0x05, 0x04, b'n', b'a', b'm', b'e']);
        bytes.extend_from_slice(&[0x01, 0x01, 0x00]);
        let ctx = ContextStack::new();
        let cursor = Cursor::new(&bytes);
        let mut iter = SectionIter::new(cursor, &ctx, Features::wasm_1_0());
        assert!(matches!(iter.next().unwrap().unwrap(), Section::Custom(_)));
        assert!(matches!(iter.next().unwrap().unwrap(), Section::Known(SectionId::Type, _)));
    }

    #[test]
    fn function_body_decodes_locals_and_instructions() {
        // locals: 1 group of (1, i32); body: local.get 0, end.
        let bytes = [0x05, 0x01, 0x01, 0x7F, 0x20, 0x00, 0x0B];
        let mut cursor = Cursor::new(&bytes);
        let ctx = ContextStack::new();
        let body = decode_function_body(&mut cursor, &ctx, &Features::wasm_1_0()).unwrap();
        assert_eq!(body.locals, Vec::from([(1, ValueType::I32)]));
        assert_eq!(body.instructions.len(), 2);
    }
}
