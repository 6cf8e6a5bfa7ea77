// Wacore - wacore-error
// Module: Error constructors
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Convenience constructors for the error codes in [`crate::codes`], so call
//! sites read as `kinds::parse_error("...")` rather than spelling out
//! `Error::new(ErrorCategory::Parse, codes::MALFORMED_LEB128, "...")`.

#[cfg(feature = "std")]
use std::string::String;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use crate::codes;
use crate::errors::{Error, ErrorCategory};

/// A framing/cursor failure (truncated input, bad magic, section length
/// mismatch).
pub fn core_error(code: u16, message: impl Into<String>) -> Error {
    Error::new(ErrorCategory::Core, code, message)
}

/// A malformed-encoding failure (LEB128, unknown opcode/type byte).
pub fn parse_error(code: u16, message: impl Into<String>) -> Error {
    Error::new(ErrorCategory::Parse, code, message)
}

/// A structural validation failure.
pub fn validation_error(code: u16, message: impl Into<String>) -> Error {
    Error::new(ErrorCategory::Validation, code, message)
}

/// A stack-typing failure.
pub fn type_error(code: u16, message: impl Into<String>) -> Error {
    Error::new(ErrorCategory::Type, code, message)
}

/// An out-of-bounds index reference, formatted the way the distilled
/// specification's reference messages expect.
pub fn index_out_of_bounds(kind: &str, index: u32, len: usize) -> Error {
    #[cfg(feature = "std")]
    use std::format;
    #[cfg(all(not(feature = "std"), feature = "alloc"))]
    use alloc::format;
    validation_error(
        codes::INDEX_OUT_OF_BOUNDS,
        format!("{kind} index {index} out of bounds: {len} defined"),
    )
}
