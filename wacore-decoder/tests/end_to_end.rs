// Wacore - wacore-decoder
// Integration tests: end-to-end decode/validate scenarios
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! End-to-end decode/validate scenarios.

use wacore_decoder::prelude::*;
use wacore_error::prelude::*;
use wacore_format::prelude::*;

#[test]
fn minimal_empty_module_decodes_and_validates() {
    let bytes = hex::decode("0061736d01000000").unwrap();
    let state = decode_module(&bytes, &Features::wasm_1_0()).unwrap();
    assert_eq!(state.sections.len(), 0);
    let errors = validate_binary(&bytes, &Features::wasm_1_0()).unwrap();
    assert!(errors.is_empty());
}

#[test]
fn type_import_function_export_code_module_validates() {
    // One type `() -> ()`, one import function of that type, one defined
    // function of that type, one export of the defined function, one
    // trivial body (just `end`).
    let module = wat::parse_str(
        r#"
        (module
          (type (func))
          (import "foo" "bar" (func (type 0)))
          (func (type 0))
          (export "quux" (func 1)))
        "#,
    )
    .unwrap();

    let sections: Vec<SectionId> = decode_module(&module, &Features::wasm_1_0())
        .unwrap()
        .sections
        .into_iter()
        .filter_map(|s| match s {
            Section::Known(id, _) => Some(id),
            Section::Custom(_) => None,
        })
        .collect();
    assert_eq!(sections, [SectionId::Type, SectionId::Import, SectionId::Function, SectionId::Export, SectionId::Code]);

    let errors = validate_binary(&module, &Features::wasm_1_0()).unwrap();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn overlong_u32_in_a_section_length_is_rejected() {
    // Section id 1 (type), followed by an overlong 5-byte LEB128 length
    // whose final byte carries nonzero extension bits.
    let mut bytes = hex::decode("0061736d01000000").unwrap();
    bytes.extend_from_slice(&[0x01, 0xF0, 0xF0, 0xF0, 0xF0, 0x12]);
    let err = decode_module(&bytes, &Features::wasm_1_0()).unwrap_err();
    assert_eq!(err.code, codes::MALFORMED_LEB128);
}

#[test]
fn call_indirect_with_nonzero_reserved_byte_is_rejected() {
    let module = wat::parse_str(
        r#"
        (module
          (type (func))
          (table 1 funcref)
          (func (type 0) call_indirect (type 0)))
        "#,
    )
    .unwrap();

    // Patch the reserved byte following call_indirect's type-index operand
    // (0x11 <type_index> <reserved>) from 0x00 to 0x01.
    let call_indirect_offset = module.windows(3).position(|w| w[0] == 0x11 && w[2] == 0x00).expect("call_indirect not found");
    let mut patched = module.clone();
    patched[call_indirect_offset + 2] = 0x01;

    let err = validate_binary(&patched, &Features::wasm_1_0()).unwrap_err();
    assert_eq!(err.code, codes::RESERVED_BYTE_NONZERO);
}

#[test]
fn unreachable_polymorphism_permits_a_never_produced_result() {
    let module = wat::parse_str(
        r#"
        (module
          (func (result i32)
            block (result i32)
              unreachable
            end))
        "#,
    )
    .unwrap();

    let errors = validate_binary(&module, &Features::wasm_1_0()).unwrap();
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn plain_select_on_reference_operands_is_rejected() {
    let module = wat::parse_str(
        r#"
        (module
          (func (param funcref funcref) (result funcref)
            local.get 0
            local.get 1
            i32.const 1
            select))
        "#,
    )
    .unwrap();

    let errors = validate_binary(&module, &Features::wasm_1_0()).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::INVALID_SELECT_TYPE);
}
