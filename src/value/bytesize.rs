/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `"512m"`-style byte size syntax.

use atoi::atoi;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSizeError;

impl fmt::Display for ByteSizeError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str("invalid byte size, expected e.g. \"512\", \"64k\", \"1g\"")
    }
}

impl std::error::Error for ByteSizeError {}

const KIBIBYTE: u64 = 1024;
const MEBIBYTE: u64 = KIBIBYTE * 1024;
const GIBIBYTE: u64 = MEBIBYTE * 1024;
const TEBIBYTE: u64 = GIBIBYTE * 1024;

/// Parse a run of digits followed by an optional single unit
/// letter (`b`/`k`/`m`/`g`/`t`, case-insensitive). No unit
/// means raw bytes. Returns the total in bytes.
pub fn parse_byte_size(raw: &str) -> Result<u64, ByteSizeError>
{
    let raw = raw.trim();

    if raw.is_empty()
    {
        return Err(ByteSizeError);
    }

    let bytes = raw.as_bytes();
    let digit_end = bytes.iter().take_while(|b| b.is_ascii_digit()).count();

    if digit_end == 0
    {
        return Err(ByteSizeError);
    }

    let amount: u64 = atoi(&bytes[..digit_end]).ok_or(ByteSizeError)?;

    let unit = &raw[digit_end..];

    let multiplier = match unit
    {
        "" | "b" | "B" => 1,
        "k" | "K" => KIBIBYTE,
        "m" | "M" => MEBIBYTE,
        "g" | "G" => GIBIBYTE,
        "t" | "T" => TEBIBYTE,
        _ => return Err(ByteSizeError),
    };

    amount.checked_mul(multiplier).ok_or(ByteSizeError)
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bare_digits_are_bytes()
    {
        assert_eq!(parse_byte_size("512").unwrap(), 512);
    }

    #[test]
    fn explicit_byte_unit()
    {
        assert_eq!(parse_byte_size("512b").unwrap(), 512);
    }

    #[test]
    fn kilobyte_unit()
    {
        assert_eq!(parse_byte_size("64k").unwrap(), 64 * KIBIBYTE);
    }

    #[test]
    fn megabyte_unit_uppercase()
    {
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * MEBIBYTE);
    }

    #[test]
    fn gigabyte_and_terabyte_units()
    {
        assert_eq!(parse_byte_size("1g").unwrap(), GIBIBYTE);
        assert_eq!(parse_byte_size("1t").unwrap(), TEBIBYTE);
    }

    #[test]
    fn unknown_unit_is_invalid()
    {
        assert_eq!(parse_byte_size("10x"), Err(ByteSizeError));
    }

    #[test]
    fn empty_is_invalid()
    {
        assert_eq!(parse_byte_size(""), Err(ByteSizeError));
    }

    #[test]
    fn no_digits_is_invalid()
    {
        assert_eq!(parse_byte_size("k"), Err(ByteSizeError));
    }

    #[test]
    fn overflow_is_invalid()
    {
        assert_eq!(parse_byte_size("99999999999999999999t"), Err(ByteSizeError));
    }
}
