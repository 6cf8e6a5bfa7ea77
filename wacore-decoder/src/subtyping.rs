// Wacore - wacore-decoder
// Module: Type equivalence and subtyping
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Coinductive equivalence (`is_same`) and directional subtyping
//! (`is_match`) over heap, reference, and value types. Defined types can
//! refer to themselves and each other by index, so both relations track an
//! assumption set of index pairs already being compared and treat a
//! revisited pair as holding — the standard coinductive-proof technique for
//! recursive type graphs.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use wacore_format::prelude::*;

/// Tracks index pairs currently assumed equal or assumed to be in a
/// subtyping relation, breaking cycles in recursive type graphs.
#[derive(Debug, Default, Clone)]
struct Assumptions {
    pairs: Vec<(u32, u32)>,
}

impl Assumptions {
    fn contains(&self, a: u32, b: u32) -> bool {
        self.pairs.iter().any(|&(x, y)| x == a && y == b)
    }

    fn with(&self, a: u32, b: u32) -> Self {
        let mut next = self.clone();
        next.pairs.push((a, b));
        next
    }
}

/// Looks up a defined type by index. Returns `None` for an out-of-bounds
/// index; callers should have already validated indices via the context's
/// own bounds check before reaching subtyping.
fn lookup(types: &[DefinedType], index: u32) -> Option<&DefinedType> {
    types.get(index as usize)
}

/// Coinductive equivalence of two heap types.
pub fn is_same_heap_type(types: &[DefinedType], a: HeapType, b: HeapType) -> bool {
    is_same_heap_type_assuming(types, a, b, &Assumptions::default())
}

fn is_same_heap_type_assuming(types: &[DefinedType], a: HeapType, b: HeapType, assumed: &Assumptions) -> bool {
    match (a, b) {
        (HeapType::Index(i), HeapType::Index(j)) => {
            if i == j || assumed.contains(i, j) {
                return true;
            }
            let next = assumed.with(i, j);
            match (lookup(types, i), lookup(types, j)) {
                (Some(ta), Some(tb)) => is_same_defined_type(types, ta, tb, &next),
                _ => false,
            }
        }
        _ => a == b,
    }
}

fn is_same_defined_type(types: &[DefinedType], a: &DefinedType, b: &DefinedType, assumed: &Assumptions) -> bool {
    match (a, b) {
        (DefinedType::Func(fa), DefinedType::Func(fb)) => {
            fa.params.len() == fb.params.len()
                && fa.results.len() == fb.results.len()
                && fa.params.iter().zip(&fb.params).all(|(p, q)| is_same_value_type_assuming(types, *p, *q, assumed))
                && fa.results.iter().zip(&fb.results).all(|(p, q)| is_same_value_type_assuming(types, *p, *q, assumed))
        }
        (DefinedType::Struct(sa), DefinedType::Struct(sb)) => {
            sa.fields.len() == sb.fields.len()
                && sa.fields.iter().zip(&sb.fields).all(|(x, y)| is_same_field(types, x, y, assumed))
        }
        (DefinedType::Array(aa), DefinedType::Array(ab)) => is_same_field(types, &aa.element, &ab.element, assumed),
        _ => false,
    }
}

fn is_same_field(types: &[DefinedType], a: &FieldType, b: &FieldType, assumed: &Assumptions) -> bool {
    a.mutability == b.mutability
        && match (a.storage, b.storage) {
            (StorageType::Value(va), StorageType::Value(vb)) => is_same_value_type_assuming(types, va, vb, assumed),
            (StorageType::Packed(pa), StorageType::Packed(pb)) => pa == pb,
            _ => false,
        }
}

/// Coinductive equivalence of two value types.
pub fn is_same_value_type(types: &[DefinedType], a: ValueType, b: ValueType) -> bool {
    is_same_value_type_assuming(types, a, b, &Assumptions::default())
}

fn is_same_value_type_assuming(types: &[DefinedType], a: ValueType, b: ValueType, assumed: &Assumptions) -> bool {
    match (a, b) {
        (ValueType::Ref(ra), ValueType::Ref(rb)) => {
            ra.nullable == rb.nullable && is_same_heap_type_assuming(types, ra.heap_type, rb.heap_type, assumed)
        }
        _ => a == b,
    }
}

/// `true` when `sub` is the top of the heap-type hierarchy that
/// `candidate`'s family belongs to, used to ground the recursive case of
/// [`is_match_heap_type`] when the candidate is a concrete index.
fn family_top(heap_type: HeapType, types: &[DefinedType]) -> HeapType {
    match heap_type {
        HeapType::Index(i) => match lookup(types, i) {
            Some(DefinedType::Func(_)) => HeapType::Func,
            Some(DefinedType::Struct(_)) | Some(DefinedType::Array(_)) => HeapType::Eq,
            None => HeapType::Any,
        },
        other => other,
    }
}

/// Directional subtyping: `true` when a value of heap type `sub` may be
/// used wherever `sup` is expected.
pub fn is_match_heap_type(types: &[DefinedType], sub: HeapType, sup: HeapType) -> bool {
    is_match_heap_type_assuming(types, sub, sup, &Assumptions::default())
}

fn is_match_heap_type_assuming(types: &[DefinedType], sub: HeapType, sup: HeapType, assumed: &Assumptions) -> bool {
    if is_same_heap_type_assuming(types, sub, sup, assumed) {
        return true;
    }
    match sup {
        HeapType::Any => !matches!(sub, HeapType::Func | HeapType::Extern),
        HeapType::Eq => matches!(sub, HeapType::Eq | HeapType::I31) || matches!(family_top(sub, types), HeapType::Eq),
        HeapType::Func => match sub {
            HeapType::Index(i) => matches!(lookup(types, i), Some(DefinedType::Func(_))),
            _ => false,
        },
        HeapType::Index(j) => match sub {
            HeapType::Index(i) => {
                if assumed.contains(i, j) {
                    return true;
                }
                let next = assumed.with(i, j);
                match (lookup(types, i), lookup(types, j)) {
                    (Some(a), Some(b)) => is_match_defined_type(types, a, b, &next),
                    _ => false,
                }
            }
            _ => false,
        },
        _ => false,
    }
}

/// Width/depth subtyping between two defined types of the same family:
/// structs may add trailing fields and widen mutable-to-immutable field
/// types is disallowed (invariant), function types are contravariant in
/// parameters and covariant in results, arrays are covariant in their
/// element when immutable.
fn is_match_defined_type(types: &[DefinedType], sub: &DefinedType, sup: &DefinedType, assumed: &Assumptions) -> bool {
    match (sub, sup) {
        (DefinedType::Func(fa), DefinedType::Func(fb)) => {
            fa.params.len() == fb.params.len()
                && fa.results.len() == fb.results.len()
                && fa.params.iter().zip(&fb.params).all(|(p, q)| is_same_value_type_assuming(types, *p, *q, assumed))
                && fa.results.iter().zip(&fb.results).all(|(p, q)| is_same_value_type_assuming(types, *p, *q, assumed))
        }
        (DefinedType::Struct(sa), DefinedType::Struct(sb)) => {
            sa.fields.len() >= sb.fields.len()
                && sa.fields.iter().zip(&sb.fields).all(|(a, b)| is_match_field(types, a, b, assumed))
        }
        (DefinedType::Array(aa), DefinedType::Array(ab)) => is_match_field(types, &aa.element, &ab.element, assumed),
        _ => false,
    }
}

fn is_match_field(types: &[DefinedType], sub: &FieldType, sup: &FieldType, assumed: &Assumptions) -> bool {
    match (sub.mutability, sup.mutability) {
        (Mutability::Var, Mutability::Var) => is_same_field(types, sub, sup, assumed),
        (_, Mutability::Const) => match (sub.storage, sup.storage) {
            (StorageType::Value(a), StorageType::Value(b)) => is_match_value_type_assuming(types, a, b, assumed),
            (StorageType::Packed(a), StorageType::Packed(b)) => a == b,
            _ => false,
        },
        (Mutability::Const, Mutability::Var) => false,
    }
}

/// Directional subtyping between value types.
pub fn is_match_value_type(types: &[DefinedType], sub: ValueType, sup: ValueType) -> bool {
    is_match_value_type_assuming(types, sub, sup, &Assumptions::default())
}

fn is_match_value_type_assuming(types: &[DefinedType], sub: ValueType, sup: ValueType, assumed: &Assumptions) -> bool {
    match (sub, sup) {
        (ValueType::Ref(ra), ValueType::Ref(rb)) => {
            (ra.nullable || !rb.nullable) && is_match_heap_type_assuming(types, ra.heap_type, rb.heap_type, assumed)
        }
        _ => sub == sup,
    }
}

/// Directional subtyping between reference types.
pub fn is_match_ref_type(types: &[DefinedType], sub: RefType, sup: RefType) -> bool {
    (sub.nullable || !sup.nullable) && is_match_heap_type(types, sub.heap_type, sup.heap_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(params: &[ValueType], results: &[ValueType]) -> DefinedType {
        DefinedType::Func(FuncType { params: Vec::from(params), results: Vec::from(results) })
    }

    #[test]
    fn identical_value_types_match() {
        let types: Vec<DefinedType> = Vec::new();
        assert!(is_match_value_type(&types, ValueType::I32, ValueType::I32));
        assert!(!is_match_value_type(&types, ValueType::I32, ValueType::I64));
    }

    #[test]
    fn eq_is_supertype_of_i31_and_struct() {
        let types = Vec::from([DefinedType::Struct(StructType { fields: Vec::new() })]);
        assert!(is_match_heap_type(&types, HeapType::I31, HeapType::Eq));
        assert!(is_match_heap_type(&types, HeapType::Index(0), HeapType::Eq));
        assert!(!is_match_heap_type(&types, HeapType::Func, HeapType::Eq));
    }

    #[test]
    fn nullable_subtype_requires_nullable_or_non_null_source() {
        let types: Vec<DefinedType> = Vec::new();
        let nullable_func = RefType { heap_type: HeapType::Func, nullable: true };
        let non_null_func = RefType { heap_type: HeapType::Func, nullable: false };
        assert!(is_match_ref_type(&types, non_null_func, nullable_func));
        assert!(!is_match_ref_type(&types, nullable_func, non_null_func));
    }

    #[test]
    fn struct_width_subtyping_allows_extra_trailing_fields() {
        let sub_struct = DefinedType::Struct(StructType {
            fields: Vec::from([
                FieldType { storage: StorageType::Value(ValueType::I32), mutability: Mutability::Const },
                FieldType { storage: StorageType::Value(ValueType::I64), mutability: Mutability::Const },
            ]),
        });
        let sup_struct = DefinedType::Struct(StructType {
            fields: Vec::from([FieldType {
                storage: StorageType::Value(ValueType::I32),
                mutability: Mutability::Const,
            }]),
        });
        let types = Vec::from([sub_struct, sup_struct]);
        assert!(is_match_heap_type(&types, HeapType::Index(0), HeapType::Index(1)));
        assert!(!is_match_heap_type(&types, HeapType::Index(1), HeapType::Index(0)));
    }

    #[test]
    fn mutually_recursive_structs_are_equivalent() {
        // types[0] and types[1] each hold a mutable field pointing at the
        // other index; the cycle must be broken by the assumption set.
        let points_at = |idx: u32| {
            DefinedType::Struct(StructType {
                fields: Vec::from([FieldType {
                    storage: StorageType::Value(ValueType::Ref(RefType { heap_type: HeapType::Index(idx), nullable: true })),
                    mutability: Mutability::Var,
                }]),
            })
        };
        let types = Vec::from([points_at(1), points_at(0)]);
        assert!(is_same_heap_type(&types, HeapType::Index(0), HeapType::Index(1)));

        let func_type = func(&[], &[]);
        let types2 = Vec::from([func_type]);
        assert!(!is_same_heap_type(&types2, HeapType::Index(0), HeapType::Func));
    }
}
