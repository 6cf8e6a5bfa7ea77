// Wacore - wacore-decoder
// Module: Crate root
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! A streaming decoder and structural validator for the WebAssembly binary
//! format.
//!
//! [`cursor::Cursor`] reads a module's bytes in a single forward pass.
//! [`module::SectionIter`] turns that pass into a lazily-decoded sequence
//! of sections; [`instruction`] decodes one opcode (plus any prefix-family
//! extension and immediate) at a time. [`subtyping`] implements the type
//! equivalence and subtyping relations the validator needs, [`context`]
//! holds the module- and function-level state validation accumulates, and
//! [`validate`] checks one function body's instructions against the
//! operand-stack typing discipline. [`visitor`] drives a single pass over a
//! module and dispatches into hooks, decoupling traversal from validation;
//! [`visitor::validate_module`] is the bundled entry point that wires a
//! validating visitor into that pass.
//!
//! Every fallible operation returns [`wacore_error::Result`]; there is no
//! panicking path through decode or validate on well-formed input — the
//! only panics left in this crate are internal consistency assertions
//! (an opcode's declared immediate shape not matching what was decoded),
//! which indicate a bug in this crate rather than a malformed module.

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc;

pub mod context;
pub mod cursor;
pub mod instruction;
pub mod module;
pub mod prelude;
pub mod subtyping;
pub mod validate;
pub mod visitor;

pub use context::ModuleContext;
pub use module::{decode_header, Section, SectionIter};
pub use validate::validate_function_body;
pub use visitor::{validate_module, Control, Entry, Visitor, ValidatingVisitor};

use wacore_error::prelude::*;
use wacore_format::prelude::*;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

/// Decodes `bytes` as a complete module, collecting every section without
/// validating instruction bodies or cross-section references. Fails on the
/// first framing or encoding error; use [`validate_module`] to additionally
/// check structural and type-level rules.
pub fn decode_module(bytes: &[u8], features: &Features) -> Result<ModuleState> {
    let ctx = ContextStack::new();
    let mut cursor = cursor::Cursor::new(bytes);
    decode_header(&mut cursor, &ctx)?;
    let mut sections = Vec::new();
    let mut iter = SectionIter::new(cursor, &ctx, *features);
    while let Some(section) = iter.next() {
        sections.push(section?);
    }
    Ok(ModuleState { sections })
}

/// Every section of a decoded module, in encounter order.
#[derive(Debug, Clone, Default)]
pub struct ModuleState {
    /// Decoded sections, custom and known, in the order they appeared.
    pub sections: Vec<Section>,
}

/// Decodes and validates `bytes` end to end, returning every validation
/// failure found (a decode/framing failure aborts immediately and is
/// returned as the outer `Err`).
pub fn validate_binary(bytes: &[u8], features: &Features) -> Result<Vec<Error>> {
    validate_module(bytes, features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_module_collects_every_section() {
        let bytes = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00];
        let state = decode_module(&bytes, &Features::wasm_1_0()).unwrap();
        assert_eq!(state.sections.len(), 1);
    }

    #[test]
    fn validate_binary_reports_an_empty_valid_module() {
        let bytes = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
        let errors = validate_binary(&bytes, &Features::wasm_1_0()).unwrap();
        assert!(errors.is_empty());
    }
}
