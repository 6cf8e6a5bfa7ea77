// Wacore - wacore-error
// Module: Error type and categories
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The [`Error`] type and [`ErrorCategory`] enum shared by every wacore
//! crate.

#[cfg(feature = "std")]
use std::string::{String, ToString};

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::{String, ToString};

use core::fmt;

use crate::context::ContextStack;

/// Coarse category of a wacore error, matching the numeric banding used by
/// [`crate::codes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Byte-cursor and framing failures (truncated input, bad magic/version,
    /// section length mismatch).
    Core = 1,
    /// Malformed encodings (overlong LEB128, unknown opcode/type byte).
    Parse = 2,
    /// Structural validation failures (duplicate export, disabled proposal,
    /// out-of-bounds index).
    Validation = 3,
    /// Stack-typing failures during instruction validation.
    Type = 4,
    /// Unclassified error, used only by conversions from foreign error
    /// types.
    Unknown = 9,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Core => "core",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Type => "type",
            ErrorCategory::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A decode or validation failure.
///
/// Carries a category, a numbered code (see [`crate::codes`]), a message,
/// and a snapshot of the [`ContextStack`] that was active when the error
/// was raised, so a caller can print "while decoding X / while decoding Y:
/// <message>" without re-deriving the call path.
#[derive(Debug, Clone)]
pub struct Error {
    /// Coarse error category.
    pub category: ErrorCategory,
    /// Numbered error code; see [`crate::codes`].
    pub code: u16,
    /// Human-readable message. Reference messages for framing/encoding
    /// failures use the exact phrasing the test suite matches on.
    pub message: String,
    /// Context frames active when the error was raised, innermost last.
    pub context: ContextStack,
}

impl Error {
    /// Creates a new error with an empty context stack.
    pub fn new(category: ErrorCategory, code: u16, message: impl Into<String>) -> Self {
        Error { category, code, message: message.into(), context: ContextStack::new() }
    }

    /// Returns this error with its context stack replaced.
    #[must_use]
    pub fn with_context(mut self, context: ContextStack) -> Self {
        self.context = context;
        self
    }

    /// Byte offset of the innermost context frame, if any was recorded.
    pub fn offset(&self) -> Option<usize> {
        self.context.frames().last().map(|f| f.offset)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)?;
        for frame in self.context.frames().iter().rev() {
            write!(f, "\n  while decoding {} (offset {})", frame.name, frame.offset)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl From<core::num::TryFromIntError> for Error {
    fn from(e: core::num::TryFromIntError) -> Self {
        Error::new(ErrorCategory::Core, crate::codes::COUNT_OVERFLOW, e.to_string())
    }
}
