/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Public entry point onto the YAML event stream.
//!
//! [`EventReader`] is a thin cursor over [`crate::event`] and
//! [`crate::reader`]: it owns a copy of the caller's bytes,
//! drives the existing scanner/parser state machine, and
//! hands back events whose data has already been copied out
//! of the internal buffer, so nothing borrowed ever outlives
//! a call to [`EventReader::next`].

use std::io::Cursor;

use crate::{
    event::{
        error::ParseError,
        parser::Parser,
        types::{Alias, Event, EventData, Node, Scalar, ScalarStyle},
    },
    position::{LineIndex, SourcePosition},
    reader::{owned::OwnedReader, PeekReader},
    scanner::flag::O_ZEROED,
};

/// Errors that can be surfaced while pulling events out of an
/// [`EventReader`].
#[derive(Debug)]
pub enum EventReaderError
{
    /// The underlying YAML scanner rejected the byte stream.
    ScannerError { message: String, at: SourcePosition },
    /// The event parser could not make sense of an otherwise
    /// well-scanned token stream (e.g. unterminated quoted
    /// scalar, missing document structure).
    ParserError { message: String, at: SourcePosition },
}

impl EventReaderError
{
    pub fn position(&self) -> SourcePosition
    {
        match self
        {
            Self::ScannerError { at, .. } | Self::ParserError { at, .. } => *at,
        }
    }

    pub fn message(&self) -> &str
    {
        match self
        {
            Self::ScannerError { message, .. } | Self::ParserError { message, .. } => message,
        }
    }
}

impl std::fmt::Display for EventReaderError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "{}: {}", self.position(), self.message())
    }
}

impl std::error::Error for EventReaderError {}

/// A fully-owned counterpart to [`crate::event::types::Event`],
/// carrying its own copy of any scalar/anchor/tag/alias text so
/// that it can outlive the [`EventReader`] call that produced
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedEvent
{
    pub start: SourcePosition,
    pub end:   SourcePosition,
    pub data:  OwnedEventData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OwnedEventData
{
    StreamStart,
    StreamEnd,
    DocumentStart { implicit: bool },
    DocumentEnd { implicit: bool },
    Alias { name: String },
    Scalar(OwnedScalar),
    MappingStart(OwnedNodeHeader),
    MappingEnd,
    SequenceStart(OwnedNodeHeader),
    SequenceEnd,
}

/// Anchor/tag metadata shared by scalar, mapping and sequence
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YamlScalarStyle
{
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl From<ScalarStyle> for YamlScalarStyle
{
    fn from(style: ScalarStyle) -> Self
    {
        match style
        {
            ScalarStyle::Plain => Self::Plain,
            ScalarStyle::SingleQuote => Self::SingleQuoted,
            ScalarStyle::DoubleQuote => Self::DoubleQuoted,
            ScalarStyle::Literal => Self::Literal,
            ScalarStyle::Folded => Self::Folded,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnedNodeHeader
{
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OwnedScalar
{
    pub value:  String,
    pub style:  YamlScalarStyle,
    pub anchor: Option<String>,
}

fn owned_node_header<T>(node: &Node<'_, T>) -> OwnedNodeHeader
{
    OwnedNodeHeader {
        anchor: node.anchor.as_ref().map(|s| s.to_string()),
    }
}

fn owned_event(ev: Event<'_>, positions: &LineIndex) -> Result<OwnedEvent, ParseError>
{
    let start = positions.resolve(ev.start());
    let end = positions.resolve(ev.end());

    let data = match ev.data().clone()
    {
        EventData::StreamStart(_) => OwnedEventData::StreamStart,
        EventData::StreamEnd => OwnedEventData::StreamEnd,
        EventData::DocumentStart(doc) => OwnedEventData::DocumentStart {
            implicit: doc.implicit,
        },
        EventData::DocumentEnd(doc) => OwnedEventData::DocumentEnd {
            implicit: doc.implicit,
        },
        EventData::Alias(Alias { name }) => OwnedEventData::Alias {
            name: name.to_string(),
        },
        EventData::Scalar(node) =>
        {
            let header = owned_node_header(&node);
            let scalar: Scalar = node.content.evaluate_scalar().map_err(ParseError::Scanner)?;

            OwnedEventData::Scalar(OwnedScalar {
                value:  scalar.data().to_string(),
                style:  scalar.style().into(),
                anchor: header.anchor,
            })
        },
        EventData::MappingStart(node) => OwnedEventData::MappingStart(owned_node_header(&node)),
        EventData::MappingEnd => OwnedEventData::MappingEnd,
        EventData::SequenceStart(node) => OwnedEventData::SequenceStart(owned_node_header(&node)),
        EventData::SequenceEnd => OwnedEventData::SequenceEnd,
    };

    Ok(OwnedEvent { start, end, data })
}

fn parse_error_to_reader_error(err: ParseError, positions: &LineIndex, at: usize) -> EventReaderError
{
    let pos = positions.resolve(at);

    match err
    {
        ParseError::Scanner(e) => EventReaderError::ScannerError {
            message: e.to_string(),
            at:      pos,
        },
        other => EventReaderError::ParserError {
            message: other.to_string(),
            at:      pos,
        },
    }
}

/// A cursor over a single YAML byte stream's events.
///
/// `EventReader` copies its input on construction, so the
/// caller's buffer may be freed immediately after
/// [`EventReader::new`] returns. It is single-consumer: calling
/// [`next`](Self::next) concurrently from multiple threads is
/// not supported (the type is intentionally not `Sync`).
pub struct EventReader
{
    parser:      Parser,
    tokens:      PeekReader<'static, OwnedReader>,
    // Kept alive for as long as `tokens` borrows from it.
    // SAFETY invariant: this field must outlive `tokens`,
    // which Rust guarantees by dropping fields in declaration
    // order (`tokens` before `buffer`).
    #[allow(dead_code)]
    buffer:      Box<OwnedReader>,
    positions:   LineIndex,
    last_offset: usize,
    last_error:  Option<EventReaderError>,
    finished:    bool,
}

impl EventReader
{
    /// Build a new reader over `bytes`. The bytes are copied
    /// into an internally owned buffer; YAML 1.1 scanning
    /// begins lazily, on the first call to [`next`](Self::next).
    pub fn new(bytes: &[u8]) -> Self
    {
        let positions = LineIndex::new(bytes);

        let buffer = Box::new(crate::reader::from_read(Cursor::new(bytes.to_vec())));

        // SAFETY: `buffer`'s heap allocation does not move when the
        // `Box` itself is moved (only the pointer moves), and we
        // never drop `buffer` while `tokens` is alive -- Rust drops
        // struct fields in declaration order, and `tokens` is
        // declared above `buffer`. This mirrors the same guarantee
        // `OwnedReader`'s own `ReadHolder` makes about its internal
        // buffer never being invalidated out from under a live
        // reference.
        let buffer_ref: &'static OwnedReader = unsafe { &*(&*buffer as *const OwnedReader) };

        let reader = buffer_ref.new_reader(O_ZEROED);
        let tokens = PeekReader::new(reader);

        Self {
            parser: Parser::new(),
            tokens,
            buffer,
            positions,
            last_offset: 0,
            last_error: None,
            finished: false,
        }
    }

    /// Pull the next event out of the stream, or `None` once
    /// the stream is exhausted.
    pub fn next(&mut self) -> Result<Option<OwnedEvent>, EventReaderError>
    {
        if self.finished
        {
            return Ok(None);
        }

        match self.parser.next_event(&mut self.tokens)
        {
            Some(Ok(ev)) =>
            {
                self.last_offset = ev.end();

                let is_stream_end = matches!(ev.data(), EventData::StreamEnd);

                let owned = owned_event(ev, &self.positions).map_err(|e| {
                    let err = parse_error_to_reader_error(e, &self.positions, self.last_offset);
                    self.last_error = Some(clone_error(&err));
                    err
                })?;

                if is_stream_end
                {
                    self.finished = true;
                }

                Ok(Some(owned))
            },
            Some(Err(e)) =>
            {
                self.finished = true;
                let err = parse_error_to_reader_error(e, &self.positions, self.last_offset);
                self.last_error = Some(clone_error(&err));
                Err(err)
            },
            None =>
            {
                self.finished = true;
                Ok(None)
            },
        }
    }

    /// The most recent error surfaced by [`next`](Self::next),
    /// if any.
    pub fn last_error(&self) -> Option<&EventReaderError>
    {
        self.last_error.as_ref()
    }
}

fn clone_error(err: &EventReaderError) -> EventReaderError
{
    match err
    {
        EventReaderError::ScannerError { message, at } => EventReaderError::ScannerError {
            message: message.clone(),
            at:      *at,
        },
        EventReaderError::ParserError { message, at } => EventReaderError::ParserError {
            message: message.clone(),
            at:      *at,
        },
    }
}
