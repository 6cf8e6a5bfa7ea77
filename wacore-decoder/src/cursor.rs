// Wacore - wacore-decoder
// Module: Byte cursor and primitive decoder
//
// Copyright (c) 2026 The Wacore Project Developers
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! A forward-only view over an immutable byte slice. Every read either
//! advances the cursor and yields a value, or fails and leaves the cursor
//! exactly where it was (cursor monotonicity: a failed read never partially
//! consumes input).

#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{string::String, vec::Vec};

use wacore_error::prelude::*;

/// A forward-only cursor over a byte slice, tracking the current read
/// position.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    /// The current byte offset from the start of the original slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// How many bytes remain unread.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread suffix of the underlying slice.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    fn unexpected_end(&self, ctx: &ContextStack) -> Error {
        #[cfg(feature = "logging")]
        log::debug!("unexpected end of input at offset {}", self.pos);
        kinds::core_error(codes::UNEXPECTED_END_OF_INPUT, "unexpected end of input")
            .with_context(ctx.clone())
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self, ctx: &ContextStack) -> Result<u8> {
        let byte = *self.bytes.get(self.pos).ok_or_else(|| self.unexpected_end(ctx))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly `n` bytes, returning a slice into the original input.
    pub fn read_bytes(&mut self, n: usize, ctx: &ContextStack) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(self.unexpected_end(ctx));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads a length-prefixed byte span and interprets it as UTF-8,
    /// failing with `INVALID_UTF8` on malformed input. Use for names the
    /// format requires to be valid UTF-8 (module/field names, export
    /// names).
    pub fn read_string(&mut self, ctx: &ContextStack) -> Result<&'a str> {
        let len = self.read_length(ctx)? as usize;
        let _guard = ctx.push("string", self.pos);
        let bytes = self.read_bytes(len, ctx)?;
        core::str::from_utf8(bytes).map_err(|_| {
            kinds::parse_error(codes::INVALID_UTF8, "invalid UTF-8 in string").with_context(ctx.clone())
        })
    }

    /// Reads a length-prefixed byte span for a custom section name. Invalid
    /// UTF-8 is logged and lossily recovered rather than rejected, per the
    /// error-handling policy that custom-section metadata is advisory.
    #[cfg(feature = "std")]
    pub fn read_custom_section_name(&mut self, ctx: &ContextStack) -> Result<String> {
        let len = self.read_length(ctx)? as usize;
        let _guard = ctx.push("custom section name", self.pos);
        let bytes = self.read_bytes(len, ctx)?;
        match core::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                #[cfg(feature = "logging")]
                log::warn!("custom section name is not valid UTF-8 at offset {}", self.pos);
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }

    /// Reads an unsigned LEB128-encoded `u32`. At most 5 bytes; in the 5th
    /// byte only the 4 bits that extend the value into bit 31 may be set.
    pub fn read_u32(&mut self, ctx: &ContextStack) -> Result<u32> {
        let mut result: u32 = 0;
        for i in 0..5u32 {
            let byte = self.read_u8(ctx)?;
            let low7 = (byte & 0x7F) as u32;
            if i == 4 && low7 & !0x0F != 0 {
                return Err(kinds::parse_error(codes::MALFORMED_LEB128, format_zero_extension(byte))
                    .with_context(ctx.clone()));
            }
            result |= low7 << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(kinds::parse_error(codes::MALFORMED_LEB128, "u32 LEB128 exceeds 5 bytes").with_context(ctx.clone()))
    }

    /// Reads a signed LEB128-encoded `i32`.
    pub fn read_s32(&mut self, ctx: &ContextStack) -> Result<i32> {
        self.read_signed_leb(32, ctx).map(|v| v as i32)
    }

    /// Reads a signed LEB128-encoded `i64`.
    pub fn read_s64(&mut self, ctx: &ContextStack) -> Result<i64> {
        self.read_signed_leb(64, ctx)
    }

    fn read_signed_leb(&mut self, bits: u32, ctx: &ContextStack) -> Result<i64> {
        let max_bytes = (bits + 6) / 7;
        let mut result: i64 = 0;
        let mut shift: u32 = 0;
        let mut byte_count: u32 = 0;
        loop {
            let byte = self.read_u8(ctx)?;
            byte_count += 1;
            let low7 = (byte & 0x7F) as i64;
            let remaining_bits = bits.saturating_sub(shift);
            if remaining_bits < 7 {
                // Pad bits beyond `remaining_bits` must replicate the sign bit
                // that occupies the highest remaining position.
                let sign_bit = if remaining_bits == 0 { 0 } else { (low7 >> (remaining_bits - 1)) & 1 };
                let pad_mask: i64 = (!0i64 << remaining_bits) & 0x7F;
                let expected_pad = if sign_bit == 1 { pad_mask } else { 0 };
                if low7 & pad_mask != expected_pad {
                    return Err(kinds::parse_error(
                        codes::MALFORMED_LEB128,
                        format_sign_extension(bits, byte, low7, pad_mask),
                    )
                    .with_context(ctx.clone()));
                }
            }
            result |= low7 << shift;
            shift += 7;
            if byte & 0x80 == 0 {
                if shift < 64 && (result >> (shift - 1)) & 1 == 1 {
                    result |= -1i64 << shift;
                }
                return Ok(result);
            }
            if byte_count >= max_bytes {
                return Err(kinds::parse_error(
                    codes::MALFORMED_LEB128,
                    "signed LEB128 exceeds maximum byte length",
                )
                .with_context(ctx.clone()));
            }
        }
    }

    /// Reads a little-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self, ctx: &ContextStack) -> Result<f32> {
        let bytes = self.read_bytes(4, ctx)?;
        Ok(f32::from_le_bytes(bytes.try_into().expect("read_bytes(4) yields a 4-byte slice")))
    }

    /// Reads a little-endian IEEE-754 `f64`.
    pub fn read_f64(&mut self, ctx: &ContextStack) -> Result<f64> {
        let bytes = self.read_bytes(8, ctx)?;
        Ok(f64::from_le_bytes(bytes.try_into().expect("read_bytes(8) yields an 8-byte slice")))
    }

    /// Reads a `u32` to be used as an element count, failing if it exceeds
    /// the number of bytes remaining (each element needs at least one
    /// byte).
    pub fn read_count(&mut self, ctx: &ContextStack) -> Result<u32> {
        let count = self.read_u32(ctx)?;
        if count as usize > self.remaining() {
            return Err(kinds::core_error(
                codes::COUNT_OVERFLOW,
                format_count_overflow(count, self.remaining()),
            )
            .with_context(ctx.clone()));
        }
        Ok(count)
    }

    /// Reads a `u32` to be used as a byte length, failing identically to
    /// [`Self::read_count`] if it overruns.
    pub fn read_length(&mut self, ctx: &ContextStack) -> Result<u32> {
        self.read_count(ctx)
    }

    /// Reads `read_count` then applies `item` that many times, propagating
    /// the first element failure.
    pub fn read_vector<T>(
        &mut self,
        ctx: &ContextStack,
        mut item: impl FnMut(&mut Self, &ContextStack) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.read_count(ctx)?;
        let mut out = Vec::with_capacity(count as usize);
        for i in 0..count {
            let _guard = ctx.push("vector element", self.pos);
            #[cfg(feature = "logging")]
            log::trace!("decoding vector element {i} of {count} at offset {}", self.pos);
            let _ = i;
            out.push(item(self, ctx)?);
        }
        Ok(out)
    }
}

/// The zero-extension mask `read_u32`'s 5th byte is held to: only the 4 low
/// bits may be set, since 4*7 = 28 bits are already accounted for by the
/// first four bytes and a `u32` needs at most 32.
const U32_FIFTH_BYTE_VALUE_MASK: u8 = 0x0F;

#[cfg(feature = "std")]
fn format_zero_extension(byte: u8) -> String {
    std::format!(
        "Last byte of u32 must be zero extension: expected {:#x}, got {byte:#x}",
        byte & U32_FIFTH_BYTE_VALUE_MASK
    )
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn format_zero_extension(byte: u8) -> String {
    alloc::format!(
        "Last byte of u32 must be zero extension: expected {:#x}, got {byte:#x}",
        byte & U32_FIFTH_BYTE_VALUE_MASK
    )
}

/// The two byte values that would have made the last byte of a signed
/// LEB128 a valid sign extension: the low value bits held steady, with the
/// pad bits either all clear (positive) or all set (negative).
fn sign_extension_candidates(low7: i64, pad_mask: i64) -> (i64, i64) {
    let value_bits = low7 & !pad_mask;
    (value_bits, value_bits | pad_mask)
}

#[cfg(feature = "std")]
fn format_sign_extension(bits: u32, byte: u8, low7: i64, pad_mask: i64) -> String {
    let (positive, negative) = sign_extension_candidates(low7, pad_mask);
    std::format!("Last byte of s{bits} must be sign extension: expected {positive:#x} or {negative:#x}, got {byte:#x}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn format_sign_extension(bits: u32, byte: u8, low7: i64, pad_mask: i64) -> String {
    let (positive, negative) = sign_extension_candidates(low7, pad_mask);
    alloc::format!(
        "Last byte of s{bits} must be sign extension: expected {positive:#x} or {negative:#x}, got {byte:#x}"
    )
}

#[cfg(feature = "std")]
fn format_count_overflow(count: u32, remaining: usize) -> String {
    std::format!("Count extends past end: {count} > {remaining}")
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn format_count_overflow(count: u32, remaining: usize) -> String {
    alloc::format!("Count extends past end: {count} > {remaining}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ContextStack {
        ContextStack::new()
    }

    #[test]
    fn reads_bytes_and_advances() {
        let mut c = Cursor::new(&[1, 2, 3]);
        assert_eq!(c.read_u8(&ctx()).unwrap(), 1);
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_bytes(2, &ctx()).unwrap(), &[2, 3]);
        assert!(c.is_empty());
    }

    #[test]
    fn failed_read_leaves_cursor_unchanged() {
        let mut c = Cursor::new(&[1]);
        let before = c.position();
        assert!(c.read_bytes(5, &ctx()).is_err());
        assert_eq!(c.position(), before);
    }

    #[test]
    fn u32_leb128_round_trips_small_values() {
        let mut c = Cursor::new(&[0x00]);
        assert_eq!(c.read_u32(&ctx()).unwrap(), 0);
        let mut c = Cursor::new(&[0xE5, 0x8E, 0x26]);
        assert_eq!(c.read_u32(&ctx()).unwrap(), 624485);
    }

    #[test]
    fn u32_overlong_is_rejected() {
        let mut c = Cursor::new(&[0xF0, 0xF0, 0xF0, 0xF0, 0x12]);
        let err = c.read_u32(&ctx()).unwrap_err();
        assert_eq!(err.code, codes::MALFORMED_LEB128);
        assert_eq!(err.message, "Last byte of u32 must be zero extension: expected 0x2, got 0x12");
    }

    #[test]
    fn s32_negative_round_trips() {
        let mut c = Cursor::new(&[0x7F]);
        assert_eq!(c.read_s32(&ctx()).unwrap(), -1);
        let mut c = Cursor::new(&[0x9B, 0xF1, 0x59]);
        assert_eq!(c.read_s32(&ctx()).unwrap(), -624485);
    }

    #[test]
    fn f32_reads_little_endian() {
        let bytes = 1.5f32.to_le_bytes();
        let mut c = Cursor::new(&bytes);
        assert_eq!(c.read_f32(&ctx()).unwrap(), 1.5);
    }

    #[test]
    fn count_overflow_is_rejected() {
        let mut c = Cursor::new(&[5, 1, 2]);
        let err = c.read_count(&ctx()).unwrap_err();
        assert_eq!(err.code, codes::COUNT_OVERFLOW);
    }

    #[test]
    fn vector_decodes_each_element() {
        let mut c = Cursor::new(&[3, 10, 20, 30]);
        let ctx = ContextStack::new();
        let items = c.read_vector(&ctx, |c, ctx| c.read_u8(ctx)).unwrap();
        assert_eq!(items, alloc_vec(&[10, 20, 30]));
    }

    #[cfg(feature = "std")]
    fn alloc_vec(items: &[u8]) -> Vec<u8> {
        items.to_vec()
    }
    #[cfg(all(not(feature = "std"), feature = "alloc"))]
    fn alloc_vec(items: &[u8]) -> Vec<u8> {
        Vec::from(items)
    }
}
