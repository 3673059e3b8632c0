/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `"SRC:TGT[:ro|:rw]"` bind-mount syntax.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount
{
    pub source:    String,
    pub target:    String,
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeMountError
{
    InvalidVolumeFormat,
}

impl fmt::Display for VolumeMountError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str("invalid volume mount format, expected \"SRC:TGT\"")
    }
}

impl std::error::Error for VolumeMountError {}

/// Parse `"SRC:TGT"`, with an optional trailing `:ro`/`:rw`
/// mode suffix stripped before splitting on the first
/// remaining `:`.
pub fn parse_volume_mount(raw: &str) -> Result<VolumeMount, VolumeMountError>
{
    let (body, read_only) = match raw.strip_suffix(":ro")
    {
        Some(body) => (body, true),
        None => match raw.strip_suffix(":rw")
        {
            Some(body) => (body, false),
            None => (raw, false),
        },
    };

    let (source, target) = body
        .split_once(':')
        .ok_or(VolumeMountError::InvalidVolumeFormat)?;

    if source.is_empty() || target.is_empty()
    {
        return Err(VolumeMountError::InvalidVolumeFormat);
    }

    Ok(VolumeMount {
        source: source.to_string(),
        target: target.to_string(),
        read_only,
    })
}
