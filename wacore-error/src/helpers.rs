// Wacore - wacore-error
// Module: Error helper functions
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Top-level helper functions re-exported from the [`crate::prelude`].

#[cfg(feature = "std")]
use std::string::String;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

use crate::codes;
use crate::errors::Error;
use crate::kinds;

/// Shorthand for [`kinds::parse_error`] with [`codes::UNKNOWN_OPCODE`].
pub fn unknown_opcode(message: impl Into<String>) -> Error {
    kinds::parse_error(codes::UNKNOWN_OPCODE, message)
}

/// Shorthand for [`kinds::validation_error`] with [`codes::FEATURE_DISABLED`].
pub fn feature_disabled(proposal: &str) -> Error {
    #[cfg(feature = "std")]
    use std::format;
    #[cfg(all(not(feature = "std"), feature = "alloc"))]
    use alloc::format;
    kinds::validation_error(codes::FEATURE_DISABLED, format!("proposal not enabled: {proposal}"))
}
