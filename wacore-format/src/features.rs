// Wacore - wacore-format
// Module: Proposal feature set
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Explicit, value-level toggles for optional Wasm proposals. Every decode
//! or validation rule that depends on a proposal takes a `&Features`
//! rather than consulting global state.

/// The set of optional proposals a decode/validate call is willing to
/// accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// `memory.copy`, `memory.fill`, `table.copy`, `*.init`, `*.drop`.
    pub bulk_memory: bool,
    /// `funcref`/`externref` as first-class types, `table.get/set/grow/size/fill`.
    pub reference_types: bool,
    /// `ref.as_non_null`, `br_on_null`, `call_ref`, `return_call_ref`, `func.bind`.
    pub function_references: bool,
    /// `rtt.*`, `struct.*`, `array.*`, `i31.*`, `ref.test`/`cast`, `br_on_cast`.
    pub gc: bool,
    /// `v128` value type and the SIMD instruction family.
    pub simd: bool,
    /// Shared memories and the atomic instruction family.
    pub threads: bool,
    /// `try`/`catch`/`throw`/`rethrow`/`br_on_exn` and the event section.
    pub exception_handling: bool,
    /// Function types with more than one result.
    pub multi_value: bool,
    /// `i32.extend8_s` and friends.
    pub sign_extension: bool,
    /// `i32.trunc_sat_f32_s` and friends.
    pub saturating_float_to_int: bool,
    /// `return_call`, `return_call_indirect`.
    pub tail_call: bool,
    /// Globals may be mutable when imported or exported.
    pub mutable_globals: bool,
    /// `memory.size`/`memory.grow`/`memory.init`/`memory.copy`/`memory.fill`
    /// with a nonzero memory index (multi-memory).
    pub multi_memory: bool,
    /// Custom-section annotations (`@name`, branch hints); does not gate any
    /// binary decoding rule but is tracked for parity with the reference
    /// implementation's feature set.
    pub annotations: bool,
}

impl Features {
    /// The WebAssembly 1.0 (MVP) feature set: every proposal disabled.
    pub const fn wasm_1_0() -> Self {
        Features {
            bulk_memory: false,
            reference_types: false,
            function_references: false,
            gc: false,
            simd: false,
            threads: false,
            exception_handling: false,
            multi_value: false,
            sign_extension: false,
            saturating_float_to_int: false,
            tail_call: false,
            mutable_globals: true,
            multi_memory: false,
            annotations: false,
        }
    }

    /// Every proposal modeled by this crate, enabled.
    pub const fn all() -> Self {
        Features {
            bulk_memory: true,
            reference_types: true,
            function_references: true,
            gc: true,
            simd: true,
            threads: true,
            exception_handling: true,
            multi_value: true,
            sign_extension: true,
            saturating_float_to_int: true,
            tail_call: true,
            mutable_globals: true,
            multi_memory: true,
            annotations: true,
        }
    }

    /// Returns a copy with `bulk_memory` set.
    #[must_use]
    pub const fn with_bulk_memory(mut self, on: bool) -> Self {
        self.bulk_memory = on;
        self
    }

    /// Returns a copy with `reference_types` set.
    #[must_use]
    pub const fn with_reference_types(mut self, on: bool) -> Self {
        self.reference_types = on;
        self
    }

    /// Returns a copy with `function_references` set.
    #[must_use]
    pub const fn with_function_references(mut self, on: bool) -> Self {
        self.function_references = on;
        self
    }

    /// Returns a copy with `gc` set.
    #[must_use]
    pub const fn with_gc(mut self, on: bool) -> Self {
        self.gc = on;
        self
    }

    /// Returns a copy with `simd` set.
    #[must_use]
    pub const fn with_simd(mut self, on: bool) -> Self {
        self.simd = on;
        self
    }

    /// Returns a copy with `threads` set.
    #[must_use]
    pub const fn with_threads(mut self, on: bool) -> Self {
        self.threads = on;
        self
    }

    /// Returns a copy with `exception_handling` set.
    #[must_use]
    pub const fn with_exception_handling(mut self, on: bool) -> Self {
        self.exception_handling = on;
        self
    }

    /// Returns a copy with `multi_value` set.
    #[must_use]
    pub const fn with_multi_value(mut self, on: bool) -> Self {
        self.multi_value = on;
        self
    }

    /// Returns a copy with `sign_extension` set.
    #[must_use]
    pub const fn with_sign_extension(mut self, on: bool) -> Self {
        self.sign_extension = on;
        self
    }

    /// Returns a copy with `saturating_float_to_int` set.
    #[must_use]
    pub const fn with_saturating_float_to_int(mut self, on: bool) -> Self {
        self.saturating_float_to_int = on;
        self
    }

    /// Returns a copy with `tail_call` set.
    #[must_use]
    pub const fn with_tail_call(mut self, on: bool) -> Self {
        self.tail_call = on;
        self
    }

    /// Returns a copy with `mutable_globals` set.
    #[must_use]
    pub const fn with_mutable_globals(mut self, on: bool) -> Self {
        self.mutable_globals = on;
        self
    }

    /// Returns a copy with `multi_memory` set.
    #[must_use]
    pub const fn with_multi_memory(mut self, on: bool) -> Self {
        self.multi_memory = on;
        self
    }

    /// Returns a copy with `annotations` set.
    #[must_use]
    pub const fn with_annotations(mut self, on: bool) -> Self {
        self.annotations = on;
        self
    }
}

impl Default for Features {
    fn default() -> Self {
        Features::wasm_1_0()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasm_1_0_has_everything_off_but_mutable_globals() {
        let f = Features::wasm_1_0();
        assert!(!f.bulk_memory);
        assert!(!f.simd);
        assert!(!f.gc);
        assert!(f.mutable_globals);
    }

    #[test]
    fn builder_flips_a_single_field() {
        let f = Features::wasm_1_0().with_simd(true);
        assert!(f.simd);
        assert!(!f.bulk_memory);
    }

    #[test]
    fn all_enables_every_field() {
        let f = Features::all();
        assert!(f.bulk_memory && f.reference_types && f.function_references);
        assert!(f.gc && f.simd && f.threads && f.exception_handling);
        assert!(f.multi_value && f.sign_extension && f.saturating_float_to_int);
        assert!(f.tail_call && f.mutable_globals && f.multi_memory && f.annotations);
    }
}
