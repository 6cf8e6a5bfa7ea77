// Wacore - wacore-decoder
// Module: Instruction decoding
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Decodes a single instruction: an opcode (possibly prefixed) plus an
//! immediate whose shape is looked up from `wacore_format::opcode`'s
//! metadata table.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use wacore_error::prelude::*;
use wacore_format::prelude::*;

use crate::cursor::Cursor;

/// A decoded `(align_log2, offset)` memory immediate, plus the memory index
/// (always 0 unless multi-memory is enabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemArg {
    /// Declared alignment, as a power of two's exponent.
    pub align_log2: u32,
    /// Byte offset added to the dynamic address operand.
    pub offset: u32,
    /// Memory index; nonzero only under multi-memory.
    pub memory_index: u32,
}

/// The decoded operand(s) of one instruction, matching
/// [`wacore_format::opcode::ImmediateShape`] but carrying values.
#[derive(Debug, Clone, PartialEq)]
pub enum Immediate {
    /// No operand.
    None,
    /// `block`/`loop`/`if`/`let`'s type annotation.
    BlockType(BlockType),
    /// A single index operand.
    Index(u32),
    /// `call_indirect`/`return_call_indirect`.
    CallIndirect {
        /// The callee's function type index.
        type_index: u32,
        /// The table holding the indirect callee.
        table_index: u32,
    },
    /// `br_table`.
    BrTable {
        /// The per-value branch targets.
        targets: Vec<u32>,
        /// The fallback target.
        default: u32,
    },
    /// `br_on_exn`.
    BrOnExn {
        /// The branch target label.
        label: u32,
        /// The expected exception/event index.
        event_index: u32,
    },
    /// `select t*`.
    SelectTypes(Vec<ValueType>),
    /// A memory load/store.
    MemArg(MemArg),
    /// `i32.const`.
    I32(i32),
    /// `i64.const`.
    I64(i64),
    /// `f32.const`.
    F32(f32),
    /// `f64.const`.
    F64(f64),
    /// `v128.const`.
    V128([u8; 16]),
    /// `*.init`/segment-scoped drops: segment index plus destination table
    /// or memory index.
    Init {
        /// The source segment index.
        segment: u32,
        /// The destination table or memory index.
        destination: u32,
    },
    /// `*.copy`: destination and source indices.
    Copy {
        /// The destination table or memory index.
        destination: u32,
        /// The source table or memory index.
        source: u32,
    },
    /// A SIMD lane index.
    SimdLane(u8),
    /// `i8x16.shuffle`'s 16 lane-select bytes.
    SimdShuffle([u8; 16]),
    /// `struct.get`/`struct.set`: `(type_index, field_index)`.
    StructField {
        /// The struct's defined type index.
        type_index: u32,
        /// The field index within the struct.
        field_index: u32,
    },
    /// A single heap-type immediate.
    HeapType(HeapType),
    /// `br_on_cast`'s source/target heap-type pair.
    HeapTypePair(HeapType, HeapType),
    /// `let`'s block type plus bound local types.
    Let {
        /// The block's type annotation.
        block_type: BlockType,
        /// The locals bound for the block's duration.
        locals: Vec<ValueType>,
    },
    /// `func.bind`'s type index.
    FuncBind(u32),
    /// `rtt.canon`: `(depth, heap_type)`.
    Rtt {
        /// The RTT's depth.
        depth: u32,
        /// The RTT's heap type.
        heap_type: HeapType,
    },
    /// `rtt.sub`'s target heap type.
    RttSub(HeapType),
    /// `br_on_cast`'s label index.
    BrOnCast {
        /// The branch target label.
        label: u32,
        /// The source heap type being cast from.
        source: HeapType,
        /// The target heap type being cast to.
        target: HeapType,
    },
}

/// One decoded instruction: the opcode's static metadata plus its decoded
/// immediate, and the byte offset it started at (for diagnostics).
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Static metadata for this opcode.
    pub info: &'static OpcodeInfo,
    /// The decoded immediate operand(s).
    pub immediate: Immediate,
    /// Byte offset of the opcode byte.
    pub offset: usize,
}

fn block_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<BlockType> {
    let start = cursor.position();
    // Peek: 0x40 (empty) or a value-type byte are single bytes; anything
    // else is a signed LEB128 type index.
    let peek = cursor.rest().first().copied();
    if peek == Some(0x40) {
        cursor.read_u8(ctx)?;
        return Ok(BlockType::Empty);
    }
    if let Some(byte) = peek {
        if ValueType::from_byte(byte).is_ok() {
            cursor.read_u8(ctx)?;
            return Ok(BlockType::Value(ValueType::from_byte(byte).expect("checked above")));
        }
    }
    let idx = cursor.read_s32(ctx)?;
    if idx < 0 {
        return Err(kinds::parse_error(
            codes::UNKNOWN_TYPE_BYTE,
            "block type index must be non-negative",
        )
        .with_context(ctx.clone()));
    }
    let _ = start;
    Ok(BlockType::FuncType(idx as u32))
}

fn heap_type(cursor: &mut Cursor<'_>, ctx: &ContextStack) -> Result<HeapType> {
    let byte = cursor.rest().first().copied();
    match byte {
        Some(0x70) => {
            cursor.read_u8(ctx)?;
            Ok(HeapType::Func)
        }
        Some(0x6F) => {
            cursor.read_u8(ctx)?;
            Ok(HeapType::Extern)
        }
        Some(0x6E) => {
            cursor.read_u8(ctx)?;
            Ok(HeapType::Any)
        }
        Some(0x6D) => {
            cursor.read_u8(ctx)?;
            Ok(HeapType::Eq)
        }
        Some(0x6C) => {
            cursor.read_u8(ctx)?;
            Ok(HeapType::I31)
        }
        Some(0x68) => {
            cursor.read_u8(ctx)?;
            Ok(HeapType::Exn)
        }
        _ => {
            let idx = cursor.read_s32(ctx)?;
            if idx < 0 {
                return Err(kinds::parse_error(codes::UNKNOWN_TYPE_BYTE, "heap type index must be non-negative")
                    .with_context(ctx.clone()));
            }
            Ok(HeapType::Index(idx as u32))
        }
    }
}

fn mem_arg(cursor: &mut Cursor<'_>, ctx: &ContextStack, features: &Features) -> Result<MemArg> {
    let align_log2 = cursor.read_u32(ctx)?;
    let offset = cursor.read_u32(ctx)?;
    let memory_index = if features.multi_memory && align_log2 & 0x40 != 0 {
        cursor.read_u32(ctx)?
    } else {
        0
    };
    Ok(MemArg { align_log2: align_log2 & !0x40, offset, memory_index })
}

fn reserved_byte(cursor: &mut Cursor<'_>, ctx: &ContextStack, features: &Features) -> Result<u32> {
    let value = cursor.read_u32(ctx)?;
    if value != 0 && !features.multi_memory && !features.reference_types {
        return Err(kinds::parse_error(codes::RESERVED_BYTE_NONZERO, reserved_byte_message(value))
            .with_context(ctx.clone()));
    }
    Ok(value)
}

#[cfg(feature = "std")]
fn reserved_byte_message(value: u32) -> std::string::String {
    std::format!("expected reserved byte 0, got {value}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn reserved_byte_message(value: u32) -> alloc::string::String {
    alloc::format!("expected reserved byte 0, got {value}")
}

/// Decodes one instruction, including its opcode byte(s) and immediate.
pub fn decode_instruction(
    cursor: &mut Cursor<'_>,
    ctx: &ContextStack,
    features: &Features,
) -> Result<Instruction> {
    let offset = cursor.position();
    let byte = cursor.read_u8(ctx)?;
    let encoding = match byte {
        0xFB => Encoding::Gc(cursor.read_u32(ctx)?),
        0xFC => Encoding::Misc(cursor.read_u32(ctx)?),
        0xFD => Encoding::Simd(cursor.read_u32(ctx)?),
        0xFE => Encoding::Atomic(cursor.read_u32(ctx)?),
        other => Encoding::Byte(other),
    };
    let info = lookup_opcode(encoding).ok_or_else(|| {
        kinds::parse_error(codes::UNKNOWN_OPCODE, unknown_opcode_message(encoding)).with_context(ctx.clone())
    })?;
    if let Some(gate) = info.feature_gate {
        if !gate(features) {
            return Err(kinds::validation_error(codes::FEATURE_DISABLED, feature_disabled_message(info.mnemonic))
                .with_context(ctx.clone()));
        }
    }
    let _guard = ctx.push("instruction", offset);
    #[cfg(feature = "logging")]
    log::trace!("decoding {} at offset {offset}", info.mnemonic);
    let immediate = decode_immediate(info, cursor, ctx, features)?;
    Ok(Instruction { info, immediate, offset })
}

fn decode_immediate(
    info: &'static OpcodeInfo,
    cursor: &mut Cursor<'_>,
    ctx: &ContextStack,
    features: &Features,
) -> Result<Immediate> {
    Ok(match info.immediate {
        ImmediateShape::None => Immediate::None,
        ImmediateShape::BlockType => Immediate::BlockType(block_type(cursor, ctx)?),
        ImmediateShape::Index => {
            if info.mnemonic.starts_with("memory.") || info.mnemonic.starts_with("table.size")
                || info.mnemonic.starts_with("table.grow")
                || info.mnemonic.starts_with("table.fill")
                || info.mnemonic == "atomic.fence"
            {
                Immediate::Index(reserved_byte(cursor, ctx, features)?)
            } else {
                Immediate::Index(cursor.read_u32(ctx)?)
            }
        }
        ImmediateShape::CallIndirect => {
            let type_index = cursor.read_u32(ctx)?;
            let table_index = reserved_byte(cursor, ctx, features)?;
            Immediate::CallIndirect { type_index, table_index }
        }
        ImmediateShape::BrTable => {
            let targets = cursor.read_vector(ctx, |c, ctx| c.read_u32(ctx))?;
            let default = cursor.read_u32(ctx)?;
            Immediate::BrTable { targets, default }
        }
        ImmediateShape::BrOnExn => {
            let label = cursor.read_u32(ctx)?;
            let event_index = cursor.read_u32(ctx)?;
            Immediate::BrOnExn { label, event_index }
        }
        ImmediateShape::SelectT => {
            let types = cursor.read_vector(ctx, |c, ctx| {
                let byte = c.read_u8(ctx)?;
                ValueType::from_byte(byte)
            })?;
            if types.len() != 1 {
                return Err(kinds::type_error(
                    codes::INVALID_SELECT_TYPE,
                    "select with explicit type must carry exactly one value type",
                )
                .with_context(ctx.clone()));
            }
            Immediate::SelectTypes(types)
        }
        ImmediateShape::MemArg => Immediate::MemArg(mem_arg(cursor, ctx, features)?),
        ImmediateShape::I32Const => Immediate::I32(cursor.read_s32(ctx)?),
        ImmediateShape::I64Const => Immediate::I64(cursor.read_s64(ctx)?),
        ImmediateShape::F32Const => Immediate::F32(cursor.read_f32(ctx)?),
        ImmediateShape::F64Const => Immediate::F64(cursor.read_f64(ctx)?),
        ImmediateShape::V128Const => {
            let bytes = cursor.read_bytes(16, ctx)?;
            let mut out = [0u8; 16];
            out.copy_from_slice(bytes);
            Immediate::V128(out)
        }
        ImmediateShape::Init => {
            let segment = cursor.read_u32(ctx)?;
            let destination = reserved_byte(cursor, ctx, features)?;
            Immediate::Init { segment, destination }
        }
        ImmediateShape::Copy => {
            let destination = reserved_byte(cursor, ctx, features)?;
            let source = reserved_byte(cursor, ctx, features)?;
            Immediate::Copy { destination, source }
        }
        ImmediateShape::SimdLane => Immediate::SimdLane(cursor.read_u8(ctx)?),
        ImmediateShape::SimdShuffle => {
            let bytes = cursor.read_bytes(16, ctx)?;
            let mut out = [0u8; 16];
            out.copy_from_slice(bytes);
            Immediate::SimdShuffle(out)
        }
        ImmediateShape::StructField => {
            let type_index = cursor.read_u32(ctx)?;
            let field_index = cursor.read_u32(ctx)?;
            Immediate::StructField { type_index, field_index }
        }
        ImmediateShape::HeapType => Immediate::HeapType(heap_type(cursor, ctx)?),
        ImmediateShape::HeapTypePair => {
            let a = heap_type(cursor, ctx)?;
            let b = heap_type(cursor, ctx)?;
            Immediate::HeapTypePair(a, b)
        }
        ImmediateShape::Let => {
            let bt = block_type(cursor, ctx)?;
            let locals = cursor.read_vector(ctx, |c, ctx| {
                let _count = c.read_u32(ctx)?;
                let byte = c.read_u8(ctx)?;
                ValueType::from_byte(byte)
            })?;
            Immediate::Let { block_type: bt, locals }
        }
        ImmediateShape::FuncBind => Immediate::FuncBind(cursor.read_u32(ctx)?),
        ImmediateShape::Rtt => {
            let depth = cursor.read_u32(ctx)?;
            let ht = heap_type(cursor, ctx)?;
            Immediate::Rtt { depth, heap_type: ht }
        }
        ImmediateShape::RttSub => Immediate::RttSub(heap_type(cursor, ctx)?),
        ImmediateShape::BrOnCast => {
            let label = cursor.read_u32(ctx)?;
            let source = heap_type(cursor, ctx)?;
            let target = heap_type(cursor, ctx)?;
            Immediate::BrOnCast { label, source, target }
        }
    })
}

#[cfg(feature = "std")]
fn unknown_opcode_message(encoding: Encoding) -> std::string::String {
    std::format!("unknown opcode: {encoding:?}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn unknown_opcode_message(encoding: Encoding) -> alloc::string::String {
    alloc::format!("unknown opcode: {encoding:?}")
}

#[cfg(feature = "std")]
fn feature_disabled_message(mnemonic: &str) -> std::string::String {
    std::format!("proposal not enabled for opcode: {mnemonic}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn feature_disabled_message(mnemonic: &str) -> alloc::string::String {
    alloc::format!("proposal not enabled for opcode: {mnemonic}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_i32_const() {
        let mut cursor = Cursor::new(&[0x41, 0x2A, 0x0B]);
        let ctx = ContextStack::new();
        let instr = decode_instruction(&mut cursor, &ctx, &Features::wasm_1_0()).unwrap();
        assert_eq!(instr.info.mnemonic, "i32.const");
        assert_eq!(instr.immediate, Immediate::I32(42));
    }

    #[test]
    fn decodes_end() {
        let mut cursor = Cursor::new(&[0x0B]);
        let ctx = ContextStack::new();
        let instr = decode_instruction(&mut cursor, &ctx, &Features::wasm_1_0()).unwrap();
        assert_eq!(instr.info.mnemonic, "end");
    }

    #[test]
    fn rejects_proposal_gated_opcode_when_disabled() {
        let mut cursor = Cursor::new(&[0xC0]);
        let ctx = ContextStack::new();
        let err = decode_instruction(&mut cursor, &ctx, &Features::wasm_1_0()).unwrap_err();
        assert_eq!(err.code, codes::FEATURE_DISABLED);
    }

    #[test]
    fn accepts_gated_opcode_when_enabled() {
        let mut cursor = Cursor::new(&[0xC0]);
        let ctx = ContextStack::new();
        let instr = decode_instruction(&mut cursor, &ctx, &Features::all()).unwrap();
        assert_eq!(instr.info.mnemonic, "i32.extend8_s");
    }

    #[test]
    fn decodes_misc_prefixed_opcode() {
        let mut cursor = Cursor::new(&[0xFC, 0x00]);
        let ctx = ContextStack::new();
        let instr = decode_instruction(&mut cursor, &ctx, &Features::all()).unwrap();
        assert_eq!(instr.info.mnemonic, "i32.trunc_sat_f32_s");
    }

    #[test]
    fn unknown_opcode_is_an_error() {
        let mut cursor = Cursor::new(&[0xFF]);
        let ctx = ContextStack::new();
        let err = decode_instruction(&mut cursor, &ctx, &Features::all()).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_OPCODE);
    }

    #[test]
    fn decodes_block_type_with_value() {
        let mut cursor = Cursor::new(&[0x02, 0x7F, 0x0B, 0x0B]);
        let ctx = ContextStack::new();
        let instr = decode_instruction(&mut cursor, &ctx, &Features::wasm_1_0()).unwrap();
        assert_eq!(instr.immediate, Immediate::BlockType(BlockType::Value(ValueType::I32)));
    }
}
