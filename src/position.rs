/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Byte offsets from the event layer are translated into
//! line/column positions here, once per document, rather
//! than re-scanning the buffer on every diagnostic.

use std::fmt;

/// A position in the source document.
///
/// `line` and `column` are zero-indexed internally; `Display`
/// renders both one-indexed, matching the convention used
/// throughout diagnostic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition
{
    pub line:       u32,
    pub column:     u32,
    pub byte_index: usize,
}

impl SourcePosition
{
    pub const fn new(line: u32, column: u32, byte_index: usize) -> Self
    {
        Self {
            line,
            column,
            byte_index,
        }
    }

    /// One-indexed line number, as shown to a user.
    pub fn display_line(&self) -> u32
    {
        self.line + 1
    }

    /// One-indexed column number, as shown to a user.
    pub fn display_column(&self) -> u32
    {
        self.column + 1
    }
}

impl fmt::Display for SourcePosition
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}:{}", self.display_line(), self.display_column())
    }
}

/// Maps byte offsets into a document to `(line, column)`
/// pairs, by precomputing the byte offset of every line start
/// once up front.
///
/// Columns are counted in UTF-8 bytes from the start of the
/// line, which matches how `yary` reports scanner positions
/// and avoids a second, character-counting pass over the
/// buffer.
#[derive(Debug, Clone)]
pub struct LineIndex
{
    /// Byte offset of the first byte of each line. Always
    /// starts with `0`.
    line_starts: Vec<usize>,
}

impl LineIndex
{
    pub fn new(src: &[u8]) -> Self
    {
        let mut line_starts = vec![0];

        for (i, &b) in src.iter().enumerate()
        {
            if b == b'\n'
            {
                line_starts.push(i + 1);
            }
        }

        Self { line_starts }
    }

    /// Resolve a byte offset into the document to a
    /// [`SourcePosition`].
    ///
    /// Offsets past the end of the document clamp to the
    /// last known line.
    pub fn resolve(&self, byte_index: usize) -> SourcePosition
    {
        let line = match self.line_starts.binary_search(&byte_index)
        {
            Ok(exact) => exact,
            Err(insert_at) => insert_at - 1,
        };

        let column = byte_index - self.line_starts[line];

        SourcePosition::new(line as u32, column as u32, byte_index)
    }
}
