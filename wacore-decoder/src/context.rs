// Wacore - wacore-decoder
// Module: Validation context
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Module-wide state accumulated while validating a module's sections, and
//! the per-function scratch state (operand stack, label stack, local
//! groups) used while validating one function body.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use wacore_error::prelude::*;
use wacore_format::prelude::*;

use crate::module::{ElementMode, ElementSegment};

/// Everything known about a module as its sections are validated, in the
/// index-space order the binary format assigns: imports first, then
/// module-defined entries.
#[derive(Debug, Clone, Default)]
pub struct ModuleContext {
    /// Proposals this validation run accepts.
    pub features: Features,
    /// Every defined type, indexed by type index.
    pub types: Vec<DefinedType>,
    /// Every function's type index, imports first.
    pub functions: Vec<u32>,
    /// Every table's type, imports first.
    pub tables: Vec<TableType>,
    /// Every memory's type, imports first.
    pub memories: Vec<MemoryType>,
    /// Every global's type, imports first.
    pub globals: Vec<GlobalType>,
    /// Every event's type, imports first.
    pub events: Vec<EventType>,
    /// Element segments, used to resolve `table.init`'s segment index and
    /// to compute the declared-function set.
    pub element_segments: Vec<ElementSegment>,
    /// Number of functions that are imports (the rest are module-defined
    /// and have bodies in the code section, in the same relative order).
    pub imported_function_count: usize,
    /// Number of globals that are imports.
    pub imported_global_count: usize,
    /// `Some` once a data-count section has been seen.
    pub data_count: Option<u32>,
    /// Function indices reachable via `ref.func`: used by any element
    /// segment, export, or global/element constant expression. `ref.func`
    /// outside this set is rejected even if the index itself is in bounds.
    pub declared_functions: Vec<u32>,
}

impl ModuleContext {
    /// Creates an empty context for the given feature set.
    pub fn new(features: Features) -> Self {
        ModuleContext { features, ..ModuleContext::default() }
    }

    /// The function type of the function at `index`, or an out-of-bounds
    /// error.
    pub fn function_type(&self, index: u32) -> Result<&FuncType> {
        let type_index = *self
            .functions
            .get(index as usize)
            .ok_or_else(|| kinds::index_out_of_bounds("function", index, self.functions.len()))?;
        self.type_at(type_index)?.as_func().ok_or_else(|| {
            kinds::validation_error(codes::CALL_SIGNATURE_MISMATCH, "function's type index does not name a function type")
        })
    }

    /// The defined type at `index`, or an out-of-bounds error.
    pub fn type_at(&self, index: u32) -> Result<&DefinedType> {
        self.types
            .get(index as usize)
            .ok_or_else(|| kinds::index_out_of_bounds("type", index, self.types.len()))
    }

    /// The table type at `index`, or an out-of-bounds error.
    pub fn table_at(&self, index: u32) -> Result<&TableType> {
        self.tables
            .get(index as usize)
            .ok_or_else(|| kinds::index_out_of_bounds("table", index, self.tables.len()))
    }

    /// The memory type at `index`, or an out-of-bounds error.
    pub fn memory_at(&self, index: u32) -> Result<&MemoryType> {
        self.memories
            .get(index as usize)
            .ok_or_else(|| kinds::index_out_of_bounds("memory", index, self.memories.len()))
    }

    /// The global type at `index`, or an out-of-bounds error.
    pub fn global_at(&self, index: u32) -> Result<&GlobalType> {
        self.globals
            .get(index as usize)
            .ok_or_else(|| kinds::index_out_of_bounds("global", index, self.globals.len()))
    }

    /// The event type at `index`, or an out-of-bounds error.
    pub fn event_at(&self, index: u32) -> Result<&EventType> {
        self.events
            .get(index as usize)
            .ok_or_else(|| kinds::index_out_of_bounds("event", index, self.events.len()))
    }

    /// `true` once `function_index` is reachable by `ref.func` (used in an
    /// element segment, export, or constant expression).
    pub fn is_declared(&self, function_index: u32) -> bool {
        self.declared_functions.contains(&function_index)
    }

    /// Populates [`Self::declared_functions`] from every function index
    /// named by an element segment's contents.
    pub fn collect_declared_functions_from_elements(&mut self) {
        for segment in &self.element_segments {
            if let crate::module::ElementInit::FuncIndices(indices) = &segment.init {
                for &idx in indices {
                    if !self.declared_functions.contains(&idx) {
                        self.declared_functions.push(idx);
                    }
                }
            }
        }
    }

    /// Whether an element segment exists that is active against `table_index`.
    pub fn has_active_element_for(&self, table_index: u32) -> bool {
        self.element_segments.iter().any(|segment| {
            matches!(segment.mode, ElementMode::Active { table_index: t, .. } if t == table_index)
        })
    }
}

/// The kind of control-flow frame a label belongs to, which constrains
/// what `br`/`end`/`else` may validly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// The function body's implicit outermost block.
    Function,
    /// `block ... end`.
    Block,
    /// `loop ... end`; a branch to a loop label re-enters at the top.
    Loop,
    /// `if ... else ... end`, before `else` is seen.
    If,
    /// `if ... else ... end`, after `else` is seen.
    Else,
    /// `try ... catch ... end`.
    Try,
    /// A `catch`/`catch_all` clause of a `try`.
    Catch,
}

/// One active control-flow frame.
#[derive(Debug, Clone)]
pub struct Label {
    /// What kind of frame this is.
    pub kind: LabelKind,
    /// Parameter types `block`/`loop`/`if` start with (already on the
    /// stack when the frame was pushed).
    pub param_types: Vec<ValueType>,
    /// Result types the frame must leave on the stack at `end`.
    pub result_types: Vec<ValueType>,
    /// Operand-stack height at the moment this frame was pushed (the
    /// stack may never be popped below this without triggering the
    /// polymorphic/unreachable rule).
    pub height: usize,
    /// `true` once an instruction in this frame made the rest of it
    /// unreachable (e.g. after `unreachable`, `br`, `return`); operand
    /// type checks below `height` become vacuously true until a matching
    /// `end`/`else` is reached.
    pub unreachable: bool,
}

impl Label {
    /// The types a branch to this label must carry: `param_types` for a
    /// loop (branching re-enters at the top), `result_types` otherwise.
    pub fn branch_types(&self) -> &[ValueType] {
        if self.kind == LabelKind::Loop {
            &self.param_types
        } else {
            &self.result_types
        }
    }
}

/// Operand stack and label stack for one function body being validated.
#[derive(Debug, Clone)]
pub struct FuncValidator {
    stack: Vec<ValueType>,
    labels: Vec<Label>,
}

impl FuncValidator {
    /// Starts a new validator with the function's implicit outermost
    /// label already pushed.
    pub fn new(result_types: Vec<ValueType>) -> Self {
        let function_label =
            Label { kind: LabelKind::Function, param_types: Vec::new(), result_types, height: 0, unreachable: false };
        FuncValidator { stack: Vec::new(), labels: Vec::from([function_label]) }
    }

    /// The innermost active label.
    pub fn current_label(&self) -> &Label {
        self.labels.last().expect("function label is never popped")
    }

    fn current_label_mut(&mut self) -> &mut Label {
        self.labels.last_mut().expect("function label is never popped")
    }

    /// Label `depth` frames up from the innermost (`0` is innermost), or
    /// an out-of-bounds error.
    pub fn label_at(&self, depth: u32) -> Result<&Label> {
        let len = self.labels.len();
        if depth as usize >= len {
            return Err(kinds::index_out_of_bounds("label", depth, len));
        }
        Ok(&self.labels[len - 1 - depth as usize])
    }

    /// Number of active labels, including the function's implicit one.
    pub fn label_depth(&self) -> usize {
        self.labels.len()
    }

    /// Pushes a value type onto the operand stack.
    pub fn push(&mut self, value_type: ValueType) {
        self.stack.push(value_type);
    }

    /// Pushes every type in `types`, in order.
    pub fn push_all(&mut self, types: &[ValueType]) {
        for t in types {
            self.push(*t);
        }
    }

    /// Pops and returns a value type, checking it against `expected` via
    /// [`crate::subtyping::is_match_value_type`]. Under the polymorphic
    /// stack rule (current label unreachable, stack already at the
    /// label's height), returns `expected` without consulting the actual
    /// stack.
    pub fn pop_expect(&mut self, types: &[DefinedType], expected: ValueType) -> Result<ValueType> {
        let height = self.current_label().height;
        if self.stack.len() == height {
            if self.current_label().unreachable {
                return Ok(expected);
            }
            return Err(kinds::type_error(codes::STACK_TYPE_MISMATCH, stack_underflow_message(expected)));
        }
        let actual = self.stack.pop().expect("checked above that height < stack.len()");
        if crate::subtyping::is_match_value_type(types, actual, expected) {
            Ok(actual)
        } else {
            Err(kinds::type_error(codes::STACK_TYPE_MISMATCH, stack_mismatch_message(expected, actual)))
        }
    }

    /// `true` when the operand stack is at the current label's height and
    /// the label has already gone unreachable — the polymorphic-stack
    /// rule applies and any type may be assumed present.
    pub fn is_polymorphic(&self) -> bool {
        self.stack.len() == self.current_label().height && self.current_label().unreachable
    }

    /// Pops and returns whatever value type is on top of the stack,
    /// without checking it against an expectation. Used by `drop` and by
    /// `select` before its two operands are compared to each other. Under
    /// the polymorphic stack rule, returns a placeholder `i32` — the
    /// caller that needs the real type (`select`) must compare two such
    /// results to each other, which is vacuously consistent while
    /// unreachable.
    pub fn pop_any(&mut self) -> Result<ValueType> {
        let height = self.current_label().height;
        if self.stack.len() == height {
            if self.current_label().unreachable {
                return Ok(ValueType::I32);
            }
            return Err(kinds::type_error(codes::STACK_TYPE_MISMATCH, "expected a value on the stack but it was empty"));
        }
        Ok(self.stack.pop().expect("checked above that height < stack.len()"))
    }

    /// Pops every type in `expected`, in reverse order (last-declared
    /// parameter popped first), as `pop_expect` would.
    pub fn pop_all(&mut self, types: &[DefinedType], expected: &[ValueType]) -> Result<()> {
        for t in expected.iter().rev() {
            self.pop_expect(types, *t)?;
        }
        Ok(())
    }

    /// Truncates the operand stack to the current label's height and
    /// marks it unreachable; used by `unreachable`, `br`, `br_table`'s
    /// default arm, and `return`.
    pub fn set_unreachable(&mut self) {
        let label = self.current_label_mut();
        label.unreachable = true;
        let height = label.height;
        self.stack.truncate(height);
    }

    /// Pushes a new label with the given parameter/result types. The
    /// parameter types are first popped off the enclosing stack (a
    /// block's parameters are its inputs, already present when `block`/
    /// `loop`/`if` is reached) and then pushed back as the new label's
    /// initial contents.
    pub fn push_label(
        &mut self,
        types: &[DefinedType],
        kind: LabelKind,
        param_types: Vec<ValueType>,
        result_types: Vec<ValueType>,
    ) -> Result<()> {
        self.pop_all(types, &param_types)?;
        let height = self.stack.len();
        self.push_all(&param_types);
        self.labels.push(Label { kind, param_types, result_types, height, unreachable: false });
        Ok(())
    }

    /// Pops the innermost label after checking its result types are on
    /// the stack, leaving those result types pushed onto the enclosing
    /// label's stack. Used by `end` (and `else`'s implicit close of the
    /// `if` arm).
    pub fn pop_label(&mut self, types: &[DefinedType]) -> Result<Label> {
        let results = self.current_label().result_types.clone();
        self.pop_all(types, &results)?;
        if self.stack.len() != self.current_label().height {
            return Err(kinds::type_error(
                codes::STACK_TYPE_MISMATCH,
                "unexpected values remain on the stack at end of block",
            ));
        }
        let label = self.labels.pop().expect("function label is never popped");
        self.push_all(&results);
        Ok(label)
    }

    /// `true` once only the function's implicit label remains.
    pub fn at_function_end(&self) -> bool {
        self.labels.len() == 1
    }
}

#[cfg(feature = "std")]
fn stack_underflow_message(expected: ValueType) -> std::string::String {
    std::format!("expected {expected:?} on the stack but it was empty")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn stack_underflow_message(expected: ValueType) -> alloc::string::String {
    alloc::format!("expected {expected:?} on the stack but it was empty")
}

#[cfg(feature = "std")]
fn stack_mismatch_message(expected: ValueType, actual: ValueType) -> std::string::String {
    std::format!("expected {expected:?} on the stack, found {actual:?}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn stack_mismatch_message(expected: ValueType, actual: ValueType) -> alloc::string::String {
    alloc::format!("expected {expected:?} on the stack, found {actual:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_expect_checks_type() {
        let types: Vec<DefinedType> = Vec::new();
        let mut v = FuncValidator::new(Vec::new());
        v.push(ValueType::I32);
        assert!(v.pop_expect(&types, ValueType::I32).is_ok());
        v.push(ValueType::I64);
        let err = v.pop_expect(&types, ValueType::I32).unwrap_err();
        assert_eq!(err.code, codes::STACK_TYPE_MISMATCH);
    }

    #[test]
    fn unreachable_stack_is_polymorphic() {
        let types: Vec<DefinedType> = Vec::new();
        let mut v = FuncValidator::new(Vec::new());
        v.set_unreachable();
        // Any type may be "popped" from an empty, unreachable stack.
        assert!(v.pop_expect(&types, ValueType::F64).is_ok());
    }

    #[test]
    fn label_and_pop_round_trip() {
        let types: Vec<DefinedType> = Vec::new();
        let mut v = FuncValidator::new(Vec::new());
        v.push(ValueType::I32);
        v.push_label(&types, LabelKind::Block, Vec::from([ValueType::I32]), Vec::from([ValueType::I64])).unwrap();
        assert_eq!(v.current_label().height, 0);
        v.pop_expect(&types, ValueType::I32).unwrap();
        v.push(ValueType::I64);
        let label = v.pop_label(&types).unwrap();
        assert_eq!(label.kind, LabelKind::Block);
        assert_eq!(v.current_label().kind, LabelKind::Function);
    }

    #[test]
    fn underflow_past_label_height_is_rejected() {
        let types: Vec<DefinedType> = Vec::new();
        let mut v = FuncValidator::new(Vec::new());
        v.push_label(&types, LabelKind::Block, Vec::new(), Vec::new()).unwrap();
        let err = v.pop_expect(&types, ValueType::I32).unwrap_err();
        assert_eq!(err.code, codes::STACK_TYPE_MISMATCH);
    }
}
