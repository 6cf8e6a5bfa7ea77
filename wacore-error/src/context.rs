// Wacore - wacore-error
// Module: Decode context stack
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! An explicit stack of "what is being decoded" frames, pushed on entry to
//! a decoder function and popped on every return path via [`ContextGuard`].
//! Errors snapshot this stack so a caller can see the full nesting (e.g.
//! "code section / function 3 / instruction 12") without re-deriving it.
//!
//! Pushing takes `&self`, not `&mut self`: the frame vector sits behind a
//! [`RefCell`] so a live [`ContextGuard`] never holds an exclusive borrow of
//! the stack it came from. Decoders pass `ctx: &ContextStack` everywhere and
//! keep reading through it — `cursor.read_u32(ctx)`, nested `ctx.push(...)`
//! calls, `ctx.frames()` — while a guard from an enclosing frame is still
//! alive.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

use core::cell::RefCell;

/// One frame of the context stack: a human-readable name for what is being
/// decoded, and the byte offset at which it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextFrame {
    /// Static description of the decode operation, e.g. `"type section"`.
    pub name: &'static str,
    /// Byte offset into the original input at which the frame was pushed.
    pub offset: usize,
}

/// Stack of active [`ContextFrame`]s, innermost last.
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    frames: RefCell<Vec<ContextFrame>>,
}

impl ContextStack {
    /// Creates an empty context stack.
    pub fn new() -> Self {
        ContextStack { frames: RefCell::new(Vec::new()) }
    }

    /// Pushes a frame and returns a guard that pops it on drop. Takes `&self`
    /// so the returned guard does not prevent the caller from continuing to
    /// read through `ctx` while the guard is alive.
    ///
    /// ```
    /// # use wacore_error::ContextStack;
    /// let ctx = ContextStack::new();
    /// {
    ///     let _guard = ctx.push("type section", 8);
    ///     assert_eq!(ctx.frames().len(), 1);
    /// }
    /// assert!(ctx.frames().is_empty());
    /// ```
    pub fn push(&self, name: &'static str, offset: usize) -> ContextGuard<'_> {
        self.frames.borrow_mut().push(ContextFrame { name, offset });
        ContextGuard { stack: self }
    }

    /// A snapshot of the frames currently on the stack, innermost last.
    pub fn frames(&self) -> Vec<ContextFrame> {
        self.frames.borrow().clone()
    }

    fn pop(&self) {
        self.frames.borrow_mut().pop();
    }
}

/// RAII guard returned by [`ContextStack::push`]; pops its frame when
/// dropped, including on an early return or `?` propagation out of the
/// scope that pushed it.
pub struct ContextGuard<'a> {
    stack: &'a ContextStack,
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop();
        #[cfg(feature = "logging")]
        if let Some(frame) = self.stack.frames.borrow().last() {
            log::trace!("returned to {} (offset {})", frame.name, frame.offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_nests_in_order() {
        let ctx = ContextStack::new();
        let outer = ctx.push("module", 0);
        {
            let _inner = ctx.push("type section", 8);
            assert_eq!(
                ctx.frames(),
                Vec::from([
                    ContextFrame { name: "module", offset: 0 },
                    ContextFrame { name: "type section", offset: 8 },
                ])
            );
        }
        assert_eq!(ctx.frames(), Vec::from([ContextFrame { name: "module", offset: 0 }]));
        drop(outer);
        assert!(ctx.frames().is_empty());
    }

    #[test]
    fn guard_pops_on_early_return() {
        fn decode(ctx: &ContextStack, fail: bool) -> Result<(), ()> {
            let _guard = ctx.push("function body", 40);
            if fail {
                return Err(());
            }
            Ok(())
        }

        let ctx = ContextStack::new();
        let _ = decode(&ctx, true);
        assert!(ctx.frames().is_empty());
    }
}
