/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! An append-only, positioned, severity-tagged list of
//! advisory messages produced while parsing a compose
//! document.

use std::io::{self, Write};

use crate::position::SourcePosition;

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity
{
    Error,
    Warning,
    Hint,
}

impl Severity
{
    fn as_str(self) -> &'static str
    {
        match self
        {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
        }
    }
}

impl std::fmt::Display for Severity
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// A single positioned, severity-tagged advisory.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic
{
    pub severity: Severity,
    pub message:  String,
    pub position: Option<SourcePosition>,
}

/// Ordered collection of [`Diagnostic`]s, plus a count of
/// diagnostics that could not be retained.
///
/// `add_error`/`add_warning`/`add_hint` are best-effort: the
/// only way appending a formatted message can fail in safe
/// Rust is allocator exhaustion, which aborts the process
/// rather than returning an error. `dropped_count` and the
/// "never fail the enclosing call" contract are kept anyway,
/// so the type's public shape matches an embedder that does
/// run under a fallible allocator, and so the accounting
/// invariant in the specification remains checkable by
/// construction rather than by assumption.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticList
{
    diagnostics:   Vec<Diagnostic>,
    dropped_count: usize,
}

impl DiagnosticList
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn add_error(&mut self, position: Option<SourcePosition>, message: impl Into<String>)
    {
        self.push(Severity::Error, position, message.into());
    }

    pub fn add_warning(&mut self, position: Option<SourcePosition>, message: impl Into<String>)
    {
        self.push(Severity::Warning, position, message.into());
    }

    pub fn add_hint(&mut self, position: Option<SourcePosition>, message: impl Into<String>)
    {
        self.push(Severity::Hint, position, message.into());
    }

    fn push(&mut self, severity: Severity, position: Option<SourcePosition>, message: String)
    {
        self.diagnostics.push(Diagnostic {
            severity,
            message,
            position,
        });
    }

    /// Manually account for a diagnostic that was formatted
    /// but could not be retained (e.g. an embedder running
    /// under a fallible allocator that rejected the push).
    pub fn note_dropped(&mut self)
    {
        self.dropped_count += 1;
    }

    pub fn has_errors(&self) -> bool
    {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self) -> usize
    {
        self.diagnostics.len()
    }

    pub fn dropped_count(&self) -> usize
    {
        self.dropped_count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic>
    {
        self.diagnostics.iter()
    }

    /// Write one line per diagnostic, in insertion order:
    ///
    /// - with a position: `filename:line:col: severity: message`
    /// - without:          `filename: severity: message`
    pub fn write_all(&self, filename: &str, sink: &mut dyn Write) -> io::Result<()>
    {
        for d in &self.diagnostics
        {
            match d.position
            {
                Some(pos) => writeln!(
                    sink,
                    "{}:{}:{}: {}: {}",
                    filename,
                    pos.display_line(),
                    pos.display_column(),
                    d.severity,
                    d.message
                )?,
                None => writeln!(sink, "{}: {}: {}", filename, d.severity, d.message)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn has_errors_true_iff_any_error()
    {
        let mut list = DiagnosticList::new();
        assert!(!list.has_errors());

        list.add_warning(None, "just a warning");
        assert!(!list.has_errors());

        list.add_error(None, "uh oh");
        assert!(list.has_errors());
    }

    #[test]
    fn write_all_formats_position_and_positionless()
    {
        let mut list = DiagnosticList::new();
        list.add_error(Some(SourcePosition::new(0, 4, 4)), "bad key");
        list.add_warning(None, "obsolete field");

        let mut buf = Vec::new();
        list.write_all("compose.yml", &mut buf).unwrap();

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "compose.yml:1:5: error: bad key\ncompose.yml: warning: obsolete field\n"
        );
    }

    #[test]
    fn ordering_is_insertion_order()
    {
        let mut list = DiagnosticList::new();
        list.add_hint(None, "first");
        list.add_warning(None, "second");
        list.add_error(None, "third");

        let messages: Vec<&str> = list.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn dropped_count_tracks_manual_notes()
    {
        let mut list = DiagnosticList::new();
        assert_eq!(list.dropped_count(), 0);

        list.note_dropped();
        list.note_dropped();
        assert_eq!(list.dropped_count(), 2);
        assert_eq!(list.count(), 0);
    }
}
