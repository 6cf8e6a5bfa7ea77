// Wacore - wacore-decoder
// Module: Instruction validation (stack typing)
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Validates one function body's instruction sequence against the
//! operand-stack typing discipline: the majority of opcodes apply their
//! table-declared fixed signature directly; control-flow, variable-access,
//! and a handful of polymorphic instructions get a bespoke rule here.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use wacore_error::prelude::*;
use wacore_format::prelude::*;

use crate::context::{FuncValidator, LabelKind, ModuleContext};
use crate::instruction::{Immediate, Instruction};
use crate::module::FunctionBody;
use crate::subtyping::is_match_value_type;

/// Resolves a function body's compressed local-variable groups into the
/// value type at `index`, counting the function's declared parameters
/// first. Groups are summed in order rather than pre-flattened into an
/// index table, matching the binary format's own compressed
/// representation.
pub fn local_type(params: &[ValueType], locals: &[(u32, ValueType)], index: u32) -> Result<ValueType> {
    if (index as usize) < params.len() {
        return Ok(params[index as usize]);
    }
    let mut cursor = params.len() as u64;
    let target = u64::from(index);
    for &(count, value_type) in locals {
        let next = cursor + u64::from(count);
        if target < next {
            return Ok(value_type);
        }
        cursor = next;
    }
    Err(kinds::index_out_of_bounds("local", index, cursor as usize))
}

fn block_signature(module: &ModuleContext, block_type: BlockType) -> Result<(Vec<ValueType>, Vec<ValueType>)> {
    Ok(match block_type {
        BlockType::Empty => (Vec::new(), Vec::new()),
        BlockType::Value(v) => (Vec::new(), Vec::from([v])),
        BlockType::FuncType(idx) => {
            if !module.features.multi_value {
                return Err(kinds::validation_error(
                    codes::FEATURE_DISABLED,
                    "function-typed blocks require the multi-value proposal",
                ));
            }
            let func = module.type_at(idx)?.as_func().ok_or_else(|| {
                kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "block type index does not name a function type")
            })?;
            (func.params.clone(), func.results.clone())
        }
    })
}

/// Validates every instruction in `body` against `module`'s
/// function-typed signature (`params`/`results`).
pub fn validate_function_body(
    module: &ModuleContext,
    params: &[ValueType],
    results: &[ValueType],
    body: &FunctionBody,
) -> Result<()> {
    let mut validator = FuncValidator::new(Vec::from(results));
    for instruction in &body.instructions {
        validate_instruction(module, &mut validator, params, &body.locals, instruction)?;
    }
    if !validator.at_function_end() {
        return Err(kinds::type_error(codes::UNBALANCED_CONTROL_FRAME, "function body ends with unclosed blocks"));
    }
    Ok(())
}

fn validate_instruction(
    module: &ModuleContext,
    v: &mut FuncValidator,
    params: &[ValueType],
    locals: &[(u32, ValueType)],
    instr: &Instruction,
) -> Result<()> {
    let types = &module.types;
    match instr.info.mnemonic {
        "unreachable" => {
            v.set_unreachable();
            return Ok(());
        }
        "nop" => return Ok(()),
        "block" | "loop" | "if" => {
            let bt = match instr.immediate {
                Immediate::BlockType(bt) => bt,
                _ => unreachable_immediate(),
            };
            let (param_types, result_types) = block_signature(module, bt)?;
            if instr.info.mnemonic == "if" {
                v.pop_expect(types, ValueType::I32)?;
            }
            let kind = match instr.info.mnemonic {
                "block" => LabelKind::Block,
                "loop" => LabelKind::Loop,
                _ => LabelKind::If,
            };
            v.push_label(types, kind, param_types, result_types)?;
            return Ok(());
        }
        "else" => {
            let label = v.pop_label(types)?;
            if label.kind != LabelKind::If {
                return Err(kinds::type_error(codes::UNBALANCED_CONTROL_FRAME, "else without a matching if"));
            }
            v.push_label(types, LabelKind::Else, label.param_types, label.result_types)?;
            return Ok(());
        }
        "end" => {
            v.pop_label(types)?;
            return Ok(());
        }
        "try" => {
            let bt = match instr.immediate {
                Immediate::BlockType(bt) => bt,
                _ => unreachable_immediate(),
            };
            let (param_types, result_types) = block_signature(module, bt)?;
            v.push_label(types, LabelKind::Try, param_types, result_types)?;
            return Ok(());
        }
        "catch" | "catch_all" => {
            let label = v.pop_label(types)?;
            if label.kind != LabelKind::Try && label.kind != LabelKind::Catch {
                return Err(kinds::type_error(codes::UNBALANCED_CONTROL_FRAME, "catch without a matching try"));
            }
            if instr.info.mnemonic == "catch" {
                let index = expect_index(instr)?;
                let event = module.event_at(index)?;
                let payload = module.type_at(event.type_index)?.as_func().ok_or_else(|| {
                    kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "event payload type is not a function type")
                })?;
                v.push_label(types, LabelKind::Catch, Vec::new(), label.result_types)?;
                v.push_all(&payload.params);
            } else {
                v.push_label(types, LabelKind::Catch, Vec::new(), label.result_types)?;
            }
            return Ok(());
        }
        "delegate" => {
            v.pop_label(types)?;
            return Ok(());
        }
        "throw" => {
            let index = expect_index(instr)?;
            let event = module.event_at(index)?;
            let payload = module.type_at(event.type_index)?.as_func().ok_or_else(|| {
                kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "event payload type is not a function type")
            })?;
            v.pop_all(types, &payload.params)?;
            v.set_unreachable();
            return Ok(());
        }
        "rethrow" => {
            let depth = expect_index(instr)?;
            v.label_at(depth)?;
            v.set_unreachable();
            return Ok(());
        }
        "br" => {
            let depth = expect_index(instr)?;
            let branch_types = v.label_at(depth)?.branch_types().to_vec();
            v.pop_all(types, &branch_types)?;
            v.set_unreachable();
            return Ok(());
        }
        "br_if" => {
            let depth = expect_index(instr)?;
            let branch_types = v.label_at(depth)?.branch_types().to_vec();
            v.pop_expect(types, ValueType::I32)?;
            v.pop_all(types, &branch_types)?;
            v.push_all(&branch_types);
            return Ok(());
        }
        "br_table" => {
            let (targets, default) = match &instr.immediate {
                Immediate::BrTable { targets, default } => (targets, *default),
                _ => unreachable_immediate(),
            };
            v.pop_expect(types, ValueType::I32)?;
            let default_types = v.label_at(default)?.branch_types().to_vec();
            for &t in targets {
                let target_types = v.label_at(t)?.branch_types().to_vec();
                if target_types.len() != default_types.len()
                    || !target_types.iter().zip(&default_types).all(|(a, b)| is_match_value_type(types, *a, *b))
                {
                    return Err(kinds::type_error(
                        codes::BRANCH_TYPE_MISMATCH,
                        "br_table targets do not agree with the default target's type",
                    ));
                }
            }
            v.pop_all(types, &default_types)?;
            v.set_unreachable();
            return Ok(());
        }
        "br_on_null" => {
            let depth = expect_index(instr)?;
            let branch_types = v.label_at(depth)?.branch_types().to_vec();
            let ref_type = pop_any_ref(v)?;
            v.pop_all(types, &branch_types)?;
            v.push_all(&branch_types);
            v.push(ValueType::Ref(RefType { heap_type: ref_type.heap_type, nullable: false }));
            return Ok(());
        }
        "br_on_non_null" => {
            let depth = expect_index(instr)?;
            let branch_types = v.label_at(depth)?.branch_types().to_vec();
            let prefix_len = branch_types.len().saturating_sub(1);
            let ref_type = pop_any_ref(v)?;
            let non_null = ValueType::Ref(RefType { heap_type: ref_type.heap_type, nullable: false });
            if let Some(&expected) = branch_types.last() {
                if !is_match_value_type(types, non_null, expected) {
                    return Err(kinds::type_error(
                        codes::BRANCH_TYPE_MISMATCH,
                        "br_on_non_null operand does not match the label's reference type",
                    ));
                }
            }
            // On a taken branch the non-null ref joins `branch_types` at $l;
            // falling through (the null case) leaves only the prefix.
            v.pop_all(types, &branch_types[..prefix_len])?;
            v.push_all(&branch_types[..prefix_len]);
            return Ok(());
        }
        "return" => {
            let result_types = v.label_at((v.label_depth() - 1) as u32)?.result_types.clone();
            v.pop_all(types, &result_types)?;
            v.set_unreachable();
            return Ok(());
        }
        "call" => {
            let index = expect_index(instr)?;
            let func = module.function_type(index)?.clone();
            v.pop_all(types, &func.params)?;
            v.push_all(&func.results);
            return Ok(());
        }
        "return_call" => {
            let index = expect_index(instr)?;
            let func = module.function_type(index)?.clone();
            let frame_results = v.label_at((v.label_depth() - 1) as u32)?.result_types.clone();
            if func.results != frame_results {
                return Err(kinds::type_error(
                    codes::CALL_SIGNATURE_MISMATCH,
                    "tail call's results do not match the enclosing function's results",
                ));
            }
            v.pop_all(types, &func.params)?;
            v.set_unreachable();
            return Ok(());
        }
        "call_indirect" | "return_call_indirect" => {
            let (type_index, table_index) = match instr.immediate {
                Immediate::CallIndirect { type_index, table_index } => (type_index, table_index),
                _ => unreachable_immediate(),
            };
            module.table_at(table_index)?;
            let func = module.type_at(type_index)?.as_func().ok_or_else(|| {
                kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "call_indirect type index does not name a function type")
            })?.clone();
            v.pop_expect(types, ValueType::I32)?;
            if instr.info.mnemonic == "return_call_indirect" {
                let frame_results = v.label_at((v.label_depth() - 1) as u32)?.result_types.clone();
                if func.results != frame_results {
                    return Err(kinds::type_error(
                        codes::CALL_SIGNATURE_MISMATCH,
                        "tail call's results do not match the enclosing function's results",
                    ));
                }
                v.pop_all(types, &func.params)?;
                v.set_unreachable();
            } else {
                v.pop_all(types, &func.params)?;
                v.push_all(&func.results);
            }
            return Ok(());
        }
        "call_ref" | "return_call_ref" => {
            let type_index = expect_index(instr)?;
            let func = module.type_at(type_index)?.as_func().cloned().ok_or_else(|| {
                kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "call_ref type index does not name a function type")
            })?;
            v.pop_expect(types, ValueType::Ref(RefType { heap_type: HeapType::Index(type_index), nullable: true }))?;
            if instr.info.mnemonic == "return_call_ref" {
                let frame_results = v.label_at((v.label_depth() - 1) as u32)?.result_types.clone();
                if func.results != frame_results {
                    return Err(kinds::type_error(
                        codes::CALL_SIGNATURE_MISMATCH,
                        "tail call's results do not match the enclosing function's results",
                    ));
                }
                v.pop_all(types, &func.params)?;
                v.set_unreachable();
            } else {
                v.pop_all(types, &func.params)?;
                v.push_all(&func.results);
            }
            return Ok(());
        }
        "drop" => {
            v.pop_any()?;
            return Ok(());
        }
        "select" => {
            v.pop_expect(types, ValueType::I32)?;
            let polymorphic = v.is_polymorphic();
            let b = v.pop_any()?;
            let a = v.pop_any()?;
            if !polymorphic && !matches!(a, ValueType::I32 | ValueType::I64 | ValueType::F32 | ValueType::F64) {
                return Err(kinds::type_error(
                    codes::INVALID_SELECT_TYPE,
                    "select without an explicit type can only be used on i32, i64, f32, or f64",
                ));
            }
            if a != b {
                return Err(kinds::type_error(codes::INVALID_SELECT_TYPE, "select operands are not the same numeric type"));
            }
            v.push(a);
            return Ok(());
        }
        "select t" => {
            let chosen = match &instr.immediate {
                Immediate::SelectTypes(ts) => ts[0],
                _ => unreachable_immediate(),
            };
            v.pop_expect(types, ValueType::I32)?;
            v.pop_expect(types, chosen)?;
            v.pop_expect(types, chosen)?;
            v.push(chosen);
            return Ok(());
        }
        "local.get" => {
            let index = expect_index(instr)?;
            let vt = local_type(params, locals, index)?;
            v.push(vt);
            return Ok(());
        }
        "local.set" => {
            let index = expect_index(instr)?;
            let vt = local_type(params, locals, index)?;
            v.pop_expect(types, vt)?;
            return Ok(());
        }
        "local.tee" => {
            let index = expect_index(instr)?;
            let vt = local_type(params, locals, index)?;
            v.pop_expect(types, vt)?;
            v.push(vt);
            return Ok(());
        }
        "global.get" => {
            let index = expect_index(instr)?;
            let g = module.global_at(index)?;
            v.push(g.value_type);
            return Ok(());
        }
        "global.set" => {
            let index = expect_index(instr)?;
            let g = module.global_at(index)?;
            if !g.mutability.is_mutable() {
                return Err(kinds::type_error(codes::GLOBAL_IMMUTABLE, "global.set targets an immutable global"));
            }
            v.pop_expect(types, g.value_type)?;
            return Ok(());
        }
        "table.get" => {
            let index = expect_index(instr)?;
            let t = module.table_at(index)?;
            v.pop_expect(types, ValueType::I32)?;
            v.push(ValueType::Ref(t.element_type));
            return Ok(());
        }
        "table.set" => {
            let index = expect_index(instr)?;
            let t = module.table_at(index)?;
            v.pop_expect(types, ValueType::Ref(t.element_type))?;
            v.pop_expect(types, ValueType::I32)?;
            return Ok(());
        }
        "ref.null" => {
            let ht = match instr.immediate {
                Immediate::HeapType(ht) => ht,
                _ => unreachable_immediate(),
            };
            v.push(ValueType::Ref(RefType { heap_type: ht, nullable: true }));
            return Ok(());
        }
        "ref.is_null" => {
            pop_any_ref(v)?;
            v.push(ValueType::I32);
            return Ok(());
        }
        "ref.func" => {
            let index = expect_index(instr)?;
            module.function_type(index)?;
            if !module.is_declared(index) {
                return Err(kinds::validation_error(
                    codes::UNDECLARED_FUNCTION_REFERENCE,
                    "ref.func target is not a declared function",
                ));
            }
            v.push(ValueType::Ref(RefType::FUNCREF));
            return Ok(());
        }
        "ref.eq" => {
            let eq_ref = ValueType::Ref(RefType { heap_type: HeapType::Eq, nullable: true });
            v.pop_expect(types, eq_ref)?;
            v.pop_expect(types, eq_ref)?;
            v.push(ValueType::I32);
            return Ok(());
        }
        "ref.as_non_null" => {
            let rt = pop_any_ref(v)?;
            v.push(ValueType::Ref(RefType { heap_type: rt.heap_type, nullable: false }));
            return Ok(());
        }
        _ => {}
    }

    if let Immediate::MemArg(mem_arg) = &instr.immediate {
        validate_mem_arg(module, instr, mem_arg)?;
    }

    if let Some((params_sig, results_sig)) = instr.info.signature {
        v.pop_all(types, params_sig)?;
        v.push_all(results_sig);
        return Ok(());
    }

    Err(kinds::validation_error(
        codes::FEATURE_DISABLED,
        opcode_without_rule_message(instr.info.mnemonic),
    ))
}

/// Natural alignment, as a `align_log2` ceiling, for a load/store mnemonic.
/// Derived from the accessed width the mnemonic names rather than carried
/// as a separate table column.
fn natural_align_log2(mnemonic: &str) -> u32 {
    if mnemonic.contains("v128") {
        if mnemonic.contains("8x8") || mnemonic.contains("16x4") || mnemonic.contains("32x2") {
            3
        } else {
            4
        }
    } else if mnemonic.ends_with("8_s") || mnemonic.ends_with("8_u") || mnemonic.ends_with("store8") {
        0
    } else if mnemonic.ends_with("16_s") || mnemonic.ends_with("16_u") || mnemonic.ends_with("store16") {
        1
    } else if mnemonic.ends_with("32_s") || mnemonic.ends_with("32_u") || mnemonic.ends_with("store32") {
        2
    } else if mnemonic.starts_with("i64") || mnemonic.starts_with("f64") || mnemonic.contains("wait64") {
        3
    } else {
        2
    }
}

fn validate_mem_arg(module: &ModuleContext, instr: &Instruction, mem_arg: &crate::instruction::MemArg) -> Result<()> {
    let memory = module.memory_at(mem_arg.memory_index)?;
    if mem_arg.align_log2 > natural_align_log2(instr.info.mnemonic) {
        return Err(kinds::validation_error(codes::ALIGNMENT_TOO_LARGE, alignment_message(instr.info.mnemonic)));
    }
    if matches!(instr.info.encoding, Encoding::Atomic(_)) && !memory.is_shared() {
        return Err(kinds::validation_error(
            codes::ATOMIC_ON_UNSHARED_MEMORY,
            "atomic memory access requires a shared memory",
        ));
    }
    Ok(())
}

#[cfg(feature = "std")]
fn alignment_message(mnemonic: &str) -> std::string::String {
    std::format!("declared alignment exceeds {mnemonic}'s natural alignment")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn alignment_message(mnemonic: &str) -> alloc::string::String {
    alloc::format!("declared alignment exceeds {mnemonic}'s natural alignment")
}

fn pop_any_ref(v: &mut FuncValidator) -> Result<RefType> {
    let polymorphic = v.is_polymorphic();
    let popped = v.pop_any()?;
    match popped {
        ValueType::Ref(rt) => Ok(rt),
        _ if polymorphic => Ok(RefType { heap_type: HeapType::Any, nullable: true }),
        other => Err(kinds::type_error(codes::STACK_TYPE_MISMATCH, ref_type_expected_message(other))),
    }
}

#[cfg(feature = "std")]
fn ref_type_expected_message(found: ValueType) -> std::string::String {
    std::format!("expected a reference type on the stack, found {found:?}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn ref_type_expected_message(found: ValueType) -> alloc::string::String {
    alloc::format!("expected a reference type on the stack, found {found:?}")
}

fn expect_index(instr: &Instruction) -> Result<u32> {
    match instr.immediate {
        Immediate::Index(i) => Ok(i),
        _ => unreachable_immediate(),
    }
}

fn unreachable_immediate() -> ! {
    panic!("opcode table's immediate shape does not match the instruction decoder's output")
}

#[cfg(feature = "std")]
fn opcode_without_rule_message(mnemonic: &str) -> std::string::String {
    std::format!("opcode has no fixed signature and no bespoke validation rule: {mnemonic}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn opcode_without_rule_message(mnemonic: &str) -> alloc::string::String {
    alloc::format!("opcode has no fixed signature and no bespoke validation rule: {mnemonic}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModuleContext;
    use crate::instruction::decode_instruction;

    fn decode_all(bytes: &[u8], features: &Features) -> Vec<Instruction> {
        let mut cursor = crate::cursor::Cursor::new(bytes);
        let ctx = ContextStack::new();
        let mut out = Vec::new();
        while !cursor.is_empty() {
            out.push(decode_instruction(&mut cursor, &ctx, features).unwrap());
        }
        out
    }

    #[test]
    fn simple_add_function_validates() {
        // local.get 0, local.get 1, i32.add, end
        let bytes = [0x20, 0x00, 0x20, 0x01, 0x6A, 0x0B];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        let params = [ValueType::I32, ValueType::I32];
        let results = [ValueType::I32];
        assert!(validate_function_body(&module, &params, &results, &body).is_ok());
    }

    #[test]
    fn mismatched_result_type_is_rejected() {
        // local.get 0, end -- declares result i64 but local 0 is i32.
        let bytes = [0x20, 0x00, 0x0B];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        let params = [ValueType::I32];
        let results = [ValueType::I64];
        let err = validate_function_body(&module, &params, &results, &body).unwrap_err();
        assert_eq!(err.code, codes::STACK_TYPE_MISMATCH);
    }

    #[test]
    fn unreachable_permits_any_fallthrough_type() {
        // unreachable, end -- declared result i32 never actually produced.
        let bytes = [0x00, 0x0B];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        assert!(validate_function_body(&module, &[], &[ValueType::I32], &body).is_ok());
    }

    #[test]
    fn block_with_value_type_validates() {
        // block (result i32) i32.const 0 end, end
        let bytes = [0x02, 0x7F, 0x41, 0x00, 0x0B, 0x0B];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        assert!(validate_function_body(&module, &[], &[ValueType::I32], &body).is_ok());
    }

    #[test]
    fn br_if_keeps_branch_types_on_stack() {
        // block (result i32) i32.const 0 i32.const 1 br_if 0 drop i32.const 2 end end
        let bytes = [
            0x02, 0x7F, 0x41, 0x00, 0x41, 0x01, 0x0D, 0x00, 0x1A, 0x41, 0x02, 0x0B, 0x0B,
        ];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        assert!(validate_function_body(&module, &[], &[ValueType::I32], &body).is_ok());
    }

    #[test]
    fn unreachable_does_not_excuse_a_genuine_type_mismatch() {
        // block (result i32) unreachable f32.const 0 end end -- the f32
        // pushed after `unreachable` is a real value, not a placeholder,
        // so it must still match the block's declared i32 result.
        let bytes = [0x02, 0x7F, 0x00, 0x43, 0x00, 0x00, 0x00, 0x00, 0x0B, 0x0B];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        let err = validate_function_body(&module, &[], &[ValueType::I32], &body).unwrap_err();
        assert_eq!(err.code, codes::STACK_TYPE_MISMATCH);
    }

    #[test]
    fn plain_select_rejects_reference_typed_operands() {
        // local.get 0, local.get 1, i32.const 1, select, end -- params are
        // both funcref; plain `select` (no explicit type) only accepts the
        // four numeric value types.
        let bytes = [0x20, 0x00, 0x20, 0x01, 0x41, 0x01, 0x1B, 0x0B];
        let body = FunctionBody { locals: Vec::new(), instructions: decode_all(&bytes, &Features::wasm_1_0()) };
        let module = ModuleContext::new(Features::wasm_1_0());
        let funcref = ValueType::Ref(RefType::FUNCREF);
        let params = [funcref, funcref];
        let err = validate_function_body(&module, &params, &[funcref], &body).unwrap_err();
        assert_eq!(err.code, codes::INVALID_SELECT_TYPE);
    }
}
