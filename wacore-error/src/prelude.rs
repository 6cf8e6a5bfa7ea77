// Wacore - wacore-error
// Module: Prelude
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Single-import convenience module: `use wacore_error::prelude::*;`.

pub use crate::codes;
pub use crate::context::{ContextFrame, ContextGuard, ContextStack};
pub use crate::errors::{Error, ErrorCategory};
pub use crate::helpers::{feature_disabled, unknown_opcode};
pub use crate::kinds;
pub use crate::Result;
