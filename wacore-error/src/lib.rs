// Wacore - wacore-error
// Module: Error handling
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(clippy::missing_panics_doc)]

//! Error handling for the wacore WebAssembly decoder/validator.
//!
//! Every failure the decoder or validator can produce is an [`Error`]: a
//! category, a numbered code, a message, and the [`ContextStack`] of decode
//! frames that were active when it was raised. There is no panicking path
//! through decode or validate; `unwrap`/`expect` only appear in tests.
//!
//! # Categories
//!
//! - **Core** (1000s) — cursor/framing failures: truncated input, bad magic,
//!   section length mismatches.
//! - **Parse** (2000s) — malformed encodings: overlong LEB128, unknown
//!   opcode, unknown type byte.
//! - **Validation** (3000s) — structural rule violations: duplicate export,
//!   out-of-bounds index, disabled-proposal use.
//! - **Type** (4000s) — stack-typing failures during instruction validation.

#[cfg(feature = "std")]
extern crate std;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc;

pub mod codes;
pub mod context;
pub mod errors;
pub mod helpers;
pub mod kinds;
pub mod prelude;

pub use context::{ContextGuard, ContextStack};
pub use errors::{Error, ErrorCategory};

/// Result alias used throughout the wacore crates.
pub type Result<T> = core::result::Result<T, Error>;
