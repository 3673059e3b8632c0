/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `"1h30m"`-style duration syntax, accumulated to
//! nanoseconds.

use atoi::atoi;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationError;

impl fmt::Display for DurationError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str("invalid duration, expected e.g. \"30s\", \"1h30m\", or a bare number of seconds")
    }
}

impl std::error::Error for DurationError {}

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MINUTE;

/// Parse a sequence of `(digits unit)*` where `unit` is one of
/// `h`, `m`, `s`. A trailing bare number with no unit is
/// interpreted as seconds. Returns the total in nanoseconds,
/// accumulated left to right.
pub fn parse_duration(raw: &str) -> Result<u64, DurationError>
{
    let raw = raw.trim();

    if raw.is_empty()
    {
        return Err(DurationError);
    }

    let bytes = raw.as_bytes();
    let mut i = 0;
    let mut total: u64 = 0;

    while i < bytes.len()
    {
        let digit_start = i;

        while i < bytes.len() && bytes[i].is_ascii_digit()
        {
            i += 1;
        }

        if i == digit_start
        {
            return Err(DurationError);
        }

        let amount: u64 = atoi(&bytes[digit_start..i]).ok_or(DurationError)?;

        // A trailing bare number with no unit is seconds.
        let per_unit = if i >= bytes.len()
        {
            NANOS_PER_SECOND
        }
        else
        {
            let unit = match bytes[i]
            {
                b'h' => NANOS_PER_HOUR,
                b'm' => NANOS_PER_MINUTE,
                b's' => NANOS_PER_SECOND,
                _ => return Err(DurationError),
            };
            i += 1;
            unit
        };

        total = total
            .checked_add(amount.checked_mul(per_unit).ok_or(DurationError)?)
            .ok_or(DurationError)?;
    }

    Ok(total)
}
