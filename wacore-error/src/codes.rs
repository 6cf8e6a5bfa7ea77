// Wacore - wacore-error
// Module: Error codes
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Numbered error codes, banded by [`crate::errors::ErrorCategory`].

// --- Core (1000s): cursor and framing ---------------------------------

/// Fewer bytes remained than the primitive decoder needed.
pub const UNEXPECTED_END_OF_INPUT: u16 = 1000;
/// Module did not begin with the `\0asm` magic number.
pub const INVALID_MAGIC: u16 = 1001;
/// Module's version field was not `1`.
pub const INVALID_VERSION: u16 = 1002;
/// A section id outside 0..=13.
pub const UNKNOWN_SECTION_ID: u16 = 1003;
/// A known section id appeared more than once, or sections were out of
/// canonical order.
pub const SECTION_OUT_OF_ORDER: u16 = 1004;
/// A declared count or length claims more elements/bytes than remain in the
/// enclosing slice.
pub const COUNT_OVERFLOW: u16 = 1005;
/// A section's declared length did not match the bytes actually consumed.
pub const SECTION_LENGTH_MISMATCH: u16 = 1006;

// --- Parse (2000s): malformed encodings -------------------------------

/// LEB128 integer used more bytes, or non-canonical sign/zero-extension
/// bits, than the minimal encoding requires.
pub const MALFORMED_LEB128: u16 = 2000;
/// A value/heap/element type byte did not match any known encoding.
pub const UNKNOWN_TYPE_BYTE: u16 = 2001;
/// An opcode byte (or prefixed sub-opcode) did not match any known
/// instruction.
pub const UNKNOWN_OPCODE: u16 = 2002;
/// A constant or element expression contained a non-constant instruction,
/// more than one instruction, or was not terminated by `end`.
pub const MALFORMED_CONST_EXPR: u16 = 2003;
/// A reserved byte required to be zero was nonzero.
pub const RESERVED_BYTE_NONZERO: u16 = 2004;
/// A length-prefixed byte span was not valid UTF-8 where UTF-8 was
/// required.
pub const INVALID_UTF8: u16 = 2005;
/// A type-section entry used an unrecognized form byte.
pub const UNKNOWN_TYPE_FORM: u16 = 2006;
/// An import/export external-kind byte did not match any known kind.
pub const UNKNOWN_EXTERNAL_KIND: u16 = 2007;
/// A limits flags byte had bits set outside the defined has-max/shared
/// bits.
pub const INVALID_LIMITS_FLAGS: u16 = 2008;

// --- Validation (3000s): structural rules ------------------------------

/// An index (type, function, table, memory, global, event, element, data,
/// local, or label) was out of bounds for its table.
pub const INDEX_OUT_OF_BOUNDS: u16 = 3000;
/// Two exports (or two entries requiring uniqueness) shared a name.
pub const DUPLICATE_EXPORT_NAME: u16 = 3001;
/// A construct required a disabled proposal to be enabled.
pub const FEATURE_DISABLED: u16 = 3002;
/// More than one table or memory was declared without the proposal that
/// permits it.
pub const TOO_MANY_TABLES_OR_MEMORIES: u16 = 3003;
/// A mutable global was imported or exported without `mutable-globals`.
pub const MUTABLE_GLOBAL_NOT_ALLOWED: u16 = 3004;
/// A shared memory declared no maximum, or a table was declared shared.
pub const INVALID_SHARED_LIMITS: u16 = 3005;
/// `ref.func` referenced a function not present in any element segment,
/// export, or constant/element expression (not "declared").
pub const UNDECLARED_FUNCTION_REFERENCE: u16 = 3006;
/// A function body declared more locals than the 2^32-1 compressed-count
/// limit allows.
pub const TOO_MANY_LOCALS: u16 = 3007;
/// A memory/table access used an alignment exponent exceeding the natural
/// alignment of the access width.
pub const ALIGNMENT_TOO_LARGE: u16 = 3008;
/// An atomic instruction targeted a non-shared memory.
pub const ATOMIC_ON_UNSHARED_MEMORY: u16 = 3009;
/// `data.drop`/`memory.init` used before the data-count section when one is
/// required.
pub const MISSING_DATA_COUNT: u16 = 3010;

// --- Type (4000s): stack typing -----------------------------------------

/// The operand stack did not contain the value types an instruction
/// required.
pub const STACK_TYPE_MISMATCH: u16 = 4000;
/// A branch target's declared type did not match the operand stack (or, for
/// `br_table`, did not match the other targets).
pub const BRANCH_TYPE_MISMATCH: u16 = 4001;
/// `select` (untyped) was used on operands that were not numeric and equal,
/// or `select t*` carried other than exactly one type.
pub const INVALID_SELECT_TYPE: u16 = 4002;
/// `call_indirect`/`call_ref`/`return_call*` target signature did not match
/// the callee's declared type.
pub const CALL_SIGNATURE_MISMATCH: u16 = 4003;
/// `global.set`/mutable-global constant-expression use targeted an
/// immutable global.
pub const GLOBAL_IMMUTABLE: u16 = 4004;
/// `else`/`end` encountered without a matching `if`/block frame, or a frame
/// kind mismatch.
pub const UNBALANCED_CONTROL_FRAME: u16 = 4005;
