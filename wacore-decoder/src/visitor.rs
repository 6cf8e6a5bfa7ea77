// Wacore - wacore-decoder
// Module: Visitor driver
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! A single pass over a module's sections that dispatches into a
//! user-supplied [`Visitor`] at well-defined points, decoupling traversal
//! from validation. [`ValidatingVisitor`] is the bundled visitor that
//! checks every entry and instruction against [`ModuleContext`].

#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};

use wacore_error::prelude::*;
use wacore_format::prelude::*;

use crate::context::ModuleContext;
use crate::cursor::Cursor;
use crate::instruction::Instruction;
use crate::module::{
    decode_header, DataSegment, ElementInit, ElementSegment, Export, FunctionBody, Global, Import, ImportDesc,
    Section, SectionBody, SectionIter,
};
use crate::validate;

/// The outcome of one visitor hook, steering the driver's traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Continue normally.
    Ok,
    /// Abandon the current level (the rest of this section's entries, or
    /// the whole section) but continue with the next sibling.
    Skip,
    /// Abort the entire traversal immediately.
    Fail,
}

/// One decoded entry, tagged by the section it came from, passed to
/// [`Visitor::on_entry`].
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    /// Type-section entry.
    Type(&'a DefinedType),
    /// Import-section entry.
    Import(&'a Import),
    /// Function-section entry: a type index.
    Function(u32),
    /// Table-section entry.
    Table(&'a TableType),
    /// Memory-section entry.
    Memory(&'a MemoryType),
    /// Global-section entry.
    Global(&'a Global),
    /// Export-section entry.
    Export(&'a Export),
    /// Element-section entry.
    Element(&'a ElementSegment),
    /// Code-section entry: function index plus its body.
    Code(u32, &'a FunctionBody),
    /// Data-section entry.
    Data(&'a DataSegment),
    /// Event-section entry.
    Event(&'a EventType),
}

/// Hooks a traversal invokes at well-defined points. Every hook defaults to
/// a no-op returning [`Control::Ok`]; implementors override only the hooks
/// they need.
#[allow(unused_variables)]
pub trait Visitor {
    /// Called once before the first section.
    fn begin_module(&mut self) -> Control {
        Control::Ok
    }
    /// Called for every section, custom or known, before its entries.
    fn on_section(&mut self, section: &Section) -> Control {
        Control::Ok
    }
    /// Called once per section before its first entry (known sections
    /// only; custom sections have no entries).
    fn begin_known_section(&mut self, id: SectionId) -> Control {
        Control::Ok
    }
    /// Called once per decoded entry.
    fn on_entry(&mut self, id: SectionId, entry: Entry<'_>) -> Control {
        Control::Ok
    }
    /// Called once per section after its last entry.
    fn end_known_section(&mut self, id: SectionId) -> Control {
        Control::Ok
    }
    /// Called once before a code-section function body's instructions.
    fn begin_code(&mut self, function_index: u32) -> Control {
        Control::Ok
    }
    /// Called once per instruction in a code-section function body.
    fn on_instruction(&mut self, function_index: u32, instruction: &Instruction) -> Control {
        Control::Ok
    }
    /// Called once after a code-section function body's instructions.
    fn end_code(&mut self, function_index: u32) -> Control {
        Control::Ok
    }
    /// Called once for the start section, if present.
    fn on_start(&mut self, function_index: u32) -> Control {
        Control::Ok
    }
    /// Called once for the data-count section, if present.
    fn on_data_count(&mut self, count: u32) -> Control {
        Control::Ok
    }
    /// Called once after the last section.
    fn end_module(&mut self) -> Control {
        Control::Ok
    }
}

/// Runs one traversal of `bytes` against `visitor`. Returns
/// `Ok(Control::Fail)` when a hook requested an abort (not itself an
/// error); returns `Err` for a genuine decode failure, which always ends
/// the traversal regardless of what the visitor would have done.
pub fn drive(bytes: &[u8], features: &Features, visitor: &mut dyn Visitor) -> Result<Control> {
    let ctx = ContextStack::new();
    let mut cursor = Cursor::new(bytes);
    decode_header(&mut cursor, &ctx)?;

    if visitor.begin_module() == Control::Fail {
        return Ok(Control::Fail);
    }

    let mut function_index = 0u32;
    let mut iter = SectionIter::new(cursor, &ctx, *features);
    while let Some(section) = iter.next() {
        let section = section?;
        match visitor.on_section(&section) {
            Control::Fail => return Ok(Control::Fail),
            Control::Skip => continue,
            Control::Ok => {}
        }
        match section {
            Section::Custom(_) => {}
            Section::Known(id, body) => {
                match visitor.begin_known_section(id) {
                    Control::Fail => return Ok(Control::Fail),
                    Control::Skip => continue,
                    Control::Ok => {}
                }
                match visit_section_body(visitor, id, &body, &mut function_index) {
                    Control::Fail => return Ok(Control::Fail),
                    Control::Skip | Control::Ok => {}
                }
                if visitor.end_known_section(id) == Control::Fail {
                    return Ok(Control::Fail);
                }
            }
        }
    }

    if visitor.end_module() == Control::Fail {
        return Ok(Control::Fail);
    }
    Ok(Control::Ok)
}

fn visit_section_body(visitor: &mut dyn Visitor, id: SectionId, body: &SectionBody, function_index: &mut u32) -> Control {
    macro_rules! visit_all {
        ($items:expr, $wrap:expr) => {
            for item in $items {
                match visitor.on_entry(id, $wrap(item)) {
                    Control::Fail => return Control::Fail,
                    Control::Skip => return Control::Skip,
                    Control::Ok => {}
                }
            }
        };
    }

    match body {
        SectionBody::Type(types) => visit_all!(types, Entry::Type),
        SectionBody::Import(imports) => visit_all!(imports, Entry::Import),
        SectionBody::Function(type_indices) => {
            for &t in type_indices {
                match visitor.on_entry(id, Entry::Function(t)) {
                    Control::Fail => return Control::Fail,
                    Control::Skip => return Control::Skip,
                    Control::Ok => {}
                }
            }
        }
        SectionBody::Table(tables) => visit_all!(tables, Entry::Table),
        SectionBody::Memory(memories) => visit_all!(memories, Entry::Memory),
        SectionBody::Global(globals) => visit_all!(globals, Entry::Global),
        SectionBody::Export(exports) => visit_all!(exports, Entry::Export),
        SectionBody::Start(index) => {
            if visitor.on_start(*index) == Control::Fail {
                return Control::Fail;
            }
        }
        SectionBody::Element(elements) => visit_all!(elements, Entry::Element),
        SectionBody::Code(bodies) => {
            for body in bodies {
                let index = *function_index;
                *function_index += 1;
                if visitor.begin_code(index) == Control::Fail {
                    return Control::Fail;
                }
                for instr in &body.instructions {
                    match visitor.on_instruction(index, instr) {
                        Control::Fail => return Control::Fail,
                        Control::Skip => break,
                        Control::Ok => {}
                    }
                }
                if visitor.end_code(index) == Control::Fail {
                    return Control::Fail;
                }
                match visitor.on_entry(id, Entry::Code(index, body)) {
                    Control::Fail => return Control::Fail,
                    Control::Skip => return Control::Skip,
                    Control::Ok => {}
                }
            }
        }
        SectionBody::Data(data) => visit_all!(data, Entry::Data),
        SectionBody::DataCount(count) => {
            if visitor.on_data_count(*count) == Control::Fail {
                return Control::Fail;
            }
        }
        SectionBody::Event(events) => visit_all!(events, Entry::Event),
    }
    Control::Ok
}

/// The bundled visitor: accumulates a [`ModuleContext`] from the sections
/// it sees and validates every function body and instruction against it,
/// collecting every failure rather than stopping at the first (matching
/// how a single decode pass is expected to surface every error in one
/// run).
pub struct ValidatingVisitor {
    /// Module state accumulated so far.
    pub context: ModuleContext,
    /// Every validation failure collected during the traversal. Decode
    /// failures are not collected here; they abort [`drive`] outright via
    /// its own `Result`.
    pub errors: Vec<Error>,
    export_names: Vec<String>,
}

impl ValidatingVisitor {
    /// Starts a fresh validating visitor for the given feature set.
    pub fn new(features: Features) -> Self {
        ValidatingVisitor { context: ModuleContext::new(features), errors: Vec::new(), export_names: Vec::new() }
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(err) = result {
            self.errors.push(err);
        }
    }
}

impl Visitor for ValidatingVisitor {
    fn on_entry(&mut self, id: SectionId, entry: Entry<'_>) -> Control {
        match (id, entry) {
            (SectionId::Type, Entry::Type(t)) => self.context.types.push(t.clone()),
            (SectionId::Import, Entry::Import(import)) => {
                match &import.desc {
                    ImportDesc::Function(type_index) => {
                        self.context.functions.push(*type_index);
                        self.context.imported_function_count += 1;
                    }
                    ImportDesc::Table(t) => self.context.tables.push(t.clone()),
                    ImportDesc::Memory(m) => self.context.memories.push(m.clone()),
                    ImportDesc::Global(g) => {
                        self.context.globals.push(g.clone());
                        self.context.imported_global_count += 1;
                    }
                    ImportDesc::Event(e) => self.context.events.push(e.clone()),
                }
            }
            (SectionId::Function, Entry::Function(type_index)) => {
                self.context.functions.push(type_index);
            }
            (SectionId::Table, Entry::Table(t)) => self.context.tables.push(t.clone()),
            (SectionId::Memory, Entry::Memory(m)) => self.context.memories.push(m.clone()),
            (SectionId::Global, Entry::Global(g)) => {
                let result = validate_const_expr(&self.context, &g.init, &[g.global_type.value_type]);
                self.record(result);
                if g.init.instruction.info.mnemonic == "ref.func" {
                    if let crate::instruction::Immediate::Index(idx) = &g.init.instruction.immediate {
                        note_declared(&mut self.context, *idx);
                    }
                }
                self.context.globals.push(g.global_type.clone());
            }
            (SectionId::Export, Entry::Export(export)) => {
                if self.export_names.contains(&export.name) {
                    self.errors.push(kinds::validation_error(codes::DUPLICATE_EXPORT_NAME, duplicate_export_message(&export.name)));
                } else {
                    self.export_names.push(export.name.clone());
                }
                if export.kind == ExternalKind::Function {
                    note_declared(&mut self.context, export.index);
                }
            }
            (SectionId::Element, Entry::Element(segment)) => {
                if let ElementInit::FuncIndices(indices) = &segment.init {
                    for &idx in indices {
                        note_declared(&mut self.context, idx);
                    }
                }
                self.context.element_segments.push(segment.clone());
            }
            (SectionId::Code, Entry::Code(index, body)) => {
                let result = validate_function(&self.context, index, body);
                self.record(result);
            }
            (SectionId::Data, Entry::Data(_)) => {}
            (SectionId::Event, Entry::Event(e)) => self.context.events.push(e.clone()),
            _ => {}
        }
        Control::Ok
    }

    fn on_start(&mut self, function_index: u32) -> Control {
        let result = self
            .context
            .function_type(function_index)
            .and_then(|f| {
                if f.params.is_empty() && f.results.is_empty() {
                    Ok(())
                } else {
                    Err(kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "start function must take no parameters and return no results"))
                }
            });
        self.record(result);
        Control::Ok
    }

    fn on_data_count(&mut self, count: u32) -> Control {
        self.context.data_count = Some(count);
        Control::Ok
    }
}

fn note_declared(context: &mut ModuleContext, index: u32) {
    if !context.declared_functions.contains(&index) {
        context.declared_functions.push(index);
    }
}

fn validate_const_expr(context: &ModuleContext, expr: &crate::module::ConstExpr, expected: &[ValueType]) -> Result<()> {
    let produced = match &expr.instruction.immediate {
        crate::instruction::Immediate::I32(_) => ValueType::I32,
        crate::instruction::Immediate::I64(_) => ValueType::I64,
        crate::instruction::Immediate::F32(_) => ValueType::F32,
        crate::instruction::Immediate::F64(_) => ValueType::F64,
        crate::instruction::Immediate::HeapType(ht) => ValueType::Ref(RefType { heap_type: *ht, nullable: true }),
        crate::instruction::Immediate::Index(idx) => match expr.instruction.info.mnemonic {
            "global.get" => context.global_at(*idx)?.value_type,
            "ref.func" => {
                context.function_type(*idx)?;
                ValueType::Ref(RefType::FUNCREF)
            }
            _ => return Err(kinds::parse_error(codes::MALFORMED_CONST_EXPR, "unrecognized constant expression")),
        },
        _ => return Err(kinds::parse_error(codes::MALFORMED_CONST_EXPR, "unrecognized constant expression")),
    };
    if let Some(&expected) = expected.first() {
        if !crate::subtyping::is_match_value_type(&context.types, produced, expected) {
            return Err(kinds::type_error(codes::STACK_TYPE_MISMATCH, const_expr_type_message(produced, expected)));
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
fn const_expr_type_message(produced: ValueType, expected: ValueType) -> std::string::String {
    std::format!("constant expression produces {produced:?}, expected {expected:?}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn const_expr_type_message(produced: ValueType, expected: ValueType) -> alloc::string::String {
    alloc::format!("constant expression produces {produced:?}, expected {expected:?}")
}

#[cfg(feature = "std")]
fn duplicate_export_message(name: &str) -> std::string::String {
    std::format!("duplicate export name: {name}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn duplicate_export_message(name: &str) -> alloc::string::String {
    alloc::format!("duplicate export name: {name}")
}

fn validate_function(context: &ModuleContext, function_index: u32, body: &FunctionBody) -> Result<()> {
    let func = context.function_type(function_index)?.clone();
    validate::validate_function_body(context, &func.params, &func.results, body)
}

/// Decodes and validates an entire module, collecting every failure
/// (decode failures stop the traversal immediately; validation failures
/// accumulate).
pub fn validate_module(bytes: &[u8], features: &Features) -> Result<Vec<Error>> {
    let mut visitor = ValidatingVisitor::new(*features);
    drive(bytes, features, &mut visitor)?;
    visitor.context.collect_declared_functions_from_elements();
    Ok(visitor.errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_module_validates_with_no_errors() {
        let bytes = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00];
        let errors = validate_module(&bytes, &Features::wasm_1_0()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn single_valid_function_validates() {
        // type section: func (i32, i32) -> i32
        // function section: [0]
        // code section: one body, local.get 0, local.get 1, i32.add, end
        let bytes: Vec<u8> = Vec::from([
            0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00, // header
            0x01, 0x07, 0x01, 0x60, 0x02, 0x7F, 0x7F, 0x01, 0x7F, // type section
            0x03, 0x02, 0x01, 0x00, // function section
            0x0A, 0x09, 0x01, 0x07, 0x00, 0x20, 0x00, 0x20, 0x01, 0x6A, 0x0B, // code section
        ]);
        let errors = validate_module(&bytes, &Features::wasm_1_0()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn mistyped_function_body_is_collected_as_an_error() {
        // type section: func () -> i64; code section: local with no locals, i32.const 0, end.
        let bytes: Vec<u8> = Vec::from([
            0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00,
            0x01, 0x05, 0x01, 0x60, 0x00, 0x01, 0x7E,
            0x03, 0x02, 0x01, 0x00,
            0x0A, 0x06, 0x01, 0x04, 0x00, 0x41, 0x00, 0x0B,
        ]);
        let errors = validate_module(&bytes, &Features::wasm_1_0()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::STACK_TYPE_MISMATCH);
    }

    #[test]
    fn out_of_order_sections_fail_the_whole_decode() {
        let bytes = [0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00, 0x03, 0x01, 0x00, 0x01, 0x01, 0x60, 0x00, 0x00];
        let err = validate_module(&bytes, &Features::wasm_1_0()).unwrap_err();
        assert_eq!(err.code, codes::SECTION_OUT_OF_ORDER);
    }
}
