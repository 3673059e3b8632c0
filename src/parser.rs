/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Event-driven recursive descent over [`EventReader`], turning
//! a compose document's event stream into a [`ComposeFile`].
//!
//! This plays the same role `yary::event::parser::Parser` plays
//! over the token stream: a state machine pulling one event at
//! a time, rather than a `serde`-style whole-document
//! deserialization.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;

use crate::{
    diagnostic::DiagnosticList,
    event_reader::{EventReader, EventReaderError, OwnedEvent, OwnedEventData},
    interpolate::{interpolate, Env, InterpolateError},
    model::{ComposeFile, Dependency, Healthcheck, Logging, Network, Service, Volume},
    position::SourcePosition,
    value::{
        parse_byte_size, parse_condition, parse_duration, parse_port, parse_restart_policy,
        parse_volume_mount, Condition,
    },
};

/// A fatal outcome: one of the three error kinds the
/// structural parser may propagate instead of recovering
/// through a diagnostic. Everything else is reported as a
/// diagnostic and parsing continues.
#[derive(Debug)]
pub enum FatalError
{
    /// The underlying YAML event reader rejected the byte
    /// stream.
    Yaml(EventReaderError),
    /// The root of the document was not a mapping.
    InvalidStructure { at: SourcePosition },
}

impl std::fmt::Display for FatalError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::Yaml(e) => write!(f, "yaml error: {e}"),
            Self::InvalidStructure { at } => write!(f, "{at}: document root is not a mapping"),
        }
    }
}

impl std::error::Error for FatalError {}

impl From<EventReaderError> for FatalError
{
    fn from(e: EventReaderError) -> Self
    {
        Self::Yaml(e)
    }
}

/// Result of a complete parse: the typed model, present iff no
/// error-severity diagnostic was recorded, plus every
/// diagnostic accumulated along the way.
#[derive(Debug)]
pub struct ParseOutcome
{
    pub model:       Option<ComposeFile>,
    pub diagnostics: DiagnosticList,
}

/// Parse a compose document out of `bytes`, expanding `${...}`
/// references against `env`.
///
/// Returns `Err` only for the three fatal kinds spec'd for this
/// pipeline: a malformed YAML stream, or a document whose root
/// is not a mapping. Every other malformation is recorded as a
/// diagnostic and parsing continues.
pub fn parse(bytes: &[u8], env: &dyn Env) -> Result<ParseOutcome, FatalError>
{
    let mut cursor = Cursor::new(EventReader::new(bytes));
    let mut state = State {
        env,
        diagnostics: DiagnosticList::new(),
    };

    let file = parse_root(&mut cursor, &mut state)?;

    let model = if state.diagnostics.has_errors() { None } else { Some(file) };

    Ok(ParseOutcome {
        model,
        diagnostics: state.diagnostics,
    })
}

/// Threads the environment map and the diagnostic list through
/// every parsing function without a `&mut self` method on a
/// combined god-object; kept as a plain struct the same way
/// `yary::event::parser::Parser` keeps its directive/anchor
/// tables as plain fields rather than behind trait objects.
struct State<'env>
{
    env:         &'env dyn Env,
    diagnostics: DiagnosticList,
}

/// Pulls events out of an [`EventReader`], transparently
/// resolving an [`OwnedEventData::Alias`] at a node position
/// into a replay of the subtree its anchor captured, per
/// spec.md §6: "the structural parser treats an alias at a
/// value position as equivalent to re-reading the anchored
/// subtree."
struct Cursor
{
    reader:  EventReader,
    anchors: HashMap<String, Vec<OwnedEvent>>,
    replay:  VecDeque<OwnedEvent>,
}

impl Cursor
{
    fn new(reader: EventReader) -> Self
    {
        Self {
            reader,
            anchors: HashMap::new(),
            replay: VecDeque::new(),
        }
    }

    fn raw_next(&mut self) -> Result<Option<OwnedEvent>, EventReaderError>
    {
        if let Some(ev) = self.replay.pop_front()
        {
            return Ok(Some(ev));
        }

        self.reader.next()
    }

    /// Next event, with alias resolution and anchor capture
    /// applied. Every event the structural parser consumes goes
    /// through this single entry point.
    fn next(&mut self) -> Result<Option<OwnedEvent>, EventReaderError>
    {
        loop
        {
            let ev = match self.raw_next()?
            {
                Some(ev) => ev,
                None => return Ok(None),
            };

            if let OwnedEventData::Alias { name } = &ev.data
            {
                if let Some(subtree) = self.anchors.get(name).cloned()
                {
                    for replayed in subtree.into_iter().rev()
                    {
                        self.replay.push_front(replayed);
                    }
                    continue;
                }

                // Unknown anchor: hand the bare alias event back up, the
                // caller's scalar/mapping-start checks will turn it into
                // an ordinary field-level diagnostic.
                return Ok(Some(ev));
            }

            if let Some(anchor) = anchor_name(&ev.data)
            {
                let subtree = self.capture_subtree(ev.clone())?;
                self.anchors.insert(anchor, subtree.clone());

                for replayed in subtree.into_iter().skip(1).rev()
                {
                    self.replay.push_front(replayed);
                }
            }

            return Ok(Some(ev));
        }
    }

    /// Record the full event subtree rooted at `start` (which
    /// has already been read) by counting nested
    /// mapping/sequence starts and ends.
    fn capture_subtree(&mut self, start: OwnedEvent) -> Result<Vec<OwnedEvent>, EventReaderError>
    {
        let mut depth = match &start.data
        {
            OwnedEventData::MappingStart(_) | OwnedEventData::SequenceStart(_) => 1i32,
            _ => 0,
        };

        let mut events = vec![start];

        while depth > 0
        {
            let ev = match self.raw_next()?
            {
                Some(ev) => ev,
                None => break,
            };

            match &ev.data
            {
                OwnedEventData::MappingStart(_) | OwnedEventData::SequenceStart(_) => depth += 1,
                OwnedEventData::MappingEnd | OwnedEventData::SequenceEnd => depth -= 1,
                _ =>
                {},
            }

            events.push(ev);
        }

        Ok(events)
    }
}

fn anchor_name(data: &OwnedEventData) -> Option<String>
{
    match data
    {
        OwnedEventData::Scalar(s) => s.anchor.clone(),
        OwnedEventData::MappingStart(h) | OwnedEventData::SequenceStart(h) => h.anchor.clone(),
        _ => None,
    }
}

fn parse_root(cursor: &mut Cursor, state: &mut State<'_>) -> Result<ComposeFile, FatalError>
{
    expect_stream_start(cursor)?;
    expect_document_start(cursor)?;

    let root = next_event(cursor)?;

    if !matches!(root.data, OwnedEventData::MappingStart(_))
    {
        return Err(FatalError::InvalidStructure { at: root.start });
    }

    let mut file = ComposeFile::default();

    loop
    {
        let key_ev = next_event(cursor)?;

        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let key = require_scalar(state, &key_ev, "root key");

        match key.as_str()
        {
            "services" => file.services = parse_named_map(cursor, state, "services", parse_service_body)?,
            "volumes" => file.volumes = parse_named_map(cursor, state, "volumes", parse_volume_body)?,
            "networks" => file.networks = parse_named_map(cursor, state, "networks", parse_network_body)?,
            "name" =>
            {
                let value_ev = next_event(cursor)?;
                file.name = Some(interpolated_scalar(state, &value_ev));
            },
            "version" =>
            {
                let value_ev = next_event(cursor)?;
                skip_value(cursor, value_ev)?;
            },
            other if other.starts_with("x-") =>
            {
                let value_ev = next_event(cursor)?;
                skip_value(cursor, value_ev)?;
            },
            other =>
            {
                state
                    .diagnostics
                    .add_warning(Some(key_ev.start), format!("unknown key: {other}"));
                let value_ev = next_event(cursor)?;
                skip_value(cursor, value_ev)?;
            },
        }
    }

    Ok(file)
}

fn expect_stream_start(cursor: &mut Cursor) -> Result<(), FatalError>
{
    let ev = next_event(cursor)?;
    if !matches!(ev.data, OwnedEventData::StreamStart)
    {
        return Err(FatalError::InvalidStructure { at: ev.start });
    }
    Ok(())
}

fn expect_document_start(cursor: &mut Cursor) -> Result<(), FatalError>
{
    let ev = next_event(cursor)?;
    if !matches!(ev.data, OwnedEventData::DocumentStart { .. })
    {
        return Err(FatalError::InvalidStructure { at: ev.start });
    }
    Ok(())
}

fn next_event(cursor: &mut Cursor) -> Result<OwnedEvent, FatalError>
{
    match cursor.next()?
    {
        Some(ev) => Ok(ev),
        None => Err(FatalError::InvalidStructure {
            at: SourcePosition::default(),
        }),
    }
}

/// Parse `name: { ...body... }` for `services`/`volumes`/
/// `networks`. If the key's value isn't a mapping at all, that
/// is a field-level malformation: an error diagnostic (which
/// suppresses the model) and the value is skipped.
fn parse_named_map<T>(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    what: &str,
    mut parse_body: impl FnMut(&mut Cursor, &mut State<'_>, &str) -> Result<T, FatalError>,
) -> Result<IndexMap<String, T>, FatalError>
{
    let mut map = IndexMap::new();

    let ev = next_event(cursor)?;
    if !matches!(ev.data, OwnedEventData::MappingStart(_))
    {
        state
            .diagnostics
            .add_error(Some(ev.start), format!("{what}: expected a mapping"));
        skip_value(cursor, ev)?;
        return Ok(map);
    }

    loop
    {
        let key_ev = next_event(cursor)?;
        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let name = require_scalar(state, &key_ev, what);

        let value_ev = next_event(cursor)?;
        if !matches!(value_ev.data, OwnedEventData::MappingStart(_))
        {
            state.diagnostics.add_error(
                Some(value_ev.start),
                format!("{what}.{name}: expected a mapping"),
            );
            skip_value(cursor, value_ev)?;
            continue;
        }

        let entry = parse_body(cursor, state, &name)?;
        map.insert(name, entry);
    }

    Ok(map)
}

fn require_scalar(state: &mut State<'_>, ev: &OwnedEvent, what: &str) -> String
{
    match &ev.data
    {
        OwnedEventData::Scalar(s) => s.value.clone(),
        _ =>
        {
            state
                .diagnostics
                .add_error(Some(ev.start), format!("{what}: expected a scalar"));
            String::new()
        },
    }
}

fn interpolated_scalar(state: &mut State<'_>, ev: &OwnedEvent) -> String
{
    let raw = match &ev.data
    {
        OwnedEventData::Scalar(s) => s.value.as_str(),
        _ =>
        {
            state
                .diagnostics
                .add_error(Some(ev.start), "expected a scalar");
            return String::new();
        },
    };

    expand(state, ev.start, raw)
}

fn expand(state: &mut State<'_>, at: SourcePosition, raw: &str) -> String
{
    match interpolate(raw, state.env)
    {
        Ok(s) => s,
        Err(e) =>
        {
            state
                .diagnostics
                .add_error(Some(at), format!("interpolation error: {e}"));
            match e
            {
                InterpolateError::UnterminatedVariable | InterpolateError::InvalidVariableSyntax =>
                    raw.to_string(),
            }
        },
    }
}

/// Read-and-discard a value already begun by `first`: a scalar
/// or alias is done immediately, a mapping/sequence start is
/// consumed through its matching close.
fn skip_value(cursor: &mut Cursor, first: OwnedEvent) -> Result<(), FatalError>
{
    let mut depth = match &first.data
    {
        OwnedEventData::MappingStart(_) | OwnedEventData::SequenceStart(_) => 1i32,
        _ => 0,
    };

    while depth > 0
    {
        let ev = next_event(cursor)?;

        match &ev.data
        {
            OwnedEventData::MappingStart(_) | OwnedEventData::SequenceStart(_) => depth += 1,
            OwnedEventData::MappingEnd | OwnedEventData::SequenceEnd => depth -= 1,
            _ =>
            {},
        }
    }

    Ok(())
}

/// Accepts either a single scalar (stored as a one-element
/// list, never whitespace-split) or a sequence of scalars.
fn scalar_or_list(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
    interpolate_values: bool,
) -> Result<Vec<String>, FatalError>
{
    match &ev.data
    {
        OwnedEventData::Scalar(_) =>
        {
            let value = if interpolate_values
            {
                interpolated_scalar(state, &ev)
            }
            else
            {
                require_scalar(state, &ev, "scalar")
            };
            Ok(vec![value])
        },
        OwnedEventData::SequenceStart(_) =>
        {
            let mut items = Vec::new();

            loop
            {
                let item_ev = next_event(cursor)?;
                if matches!(item_ev.data, OwnedEventData::SequenceEnd)
                {
                    break;
                }

                match &item_ev.data
                {
                    OwnedEventData::Scalar(_) =>
                    {
                        let value = if interpolate_values
                        {
                            interpolated_scalar(state, &item_ev)
                        }
                        else
                        {
                            require_scalar(state, &item_ev, "list item")
                        };
                        items.push(value);
                    },
                    _ =>
                    {
                        state
                            .diagnostics
                            .add_warning(Some(item_ev.start), "expected a scalar list item");
                        skip_value(cursor, item_ev)?;
                    },
                }
            }

            Ok(items)
        },
        _ =>
        {
            state
                .diagnostics
                .add_error(Some(ev.start), "expected a scalar or a list of scalars");
            skip_value(cursor, ev)?;
            Ok(Vec::new())
        },
    }
}

/// Mapping (`KEY: value`, values interpolated, absent value is
/// an empty string) or sequence of `"KEY=VALUE"` (value
/// interpolated, entries missing `=` warn).
fn parse_environment(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
) -> Result<IndexMap<String, String>, FatalError>
{
    parse_key_value_block(cursor, state, ev, true)
}

/// Same dual form as environment, except list-form values are
/// literal metadata and are never interpolated, and a list
/// entry missing `=` is a bare label key (stored with an empty
/// value) rather than a malformation, so it is never warned on.
fn parse_labels(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
) -> Result<IndexMap<String, String>, FatalError>
{
    parse_key_value_block(cursor, state, ev, false)
}

fn parse_key_value_block(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
    interpolate_list_values: bool,
) -> Result<IndexMap<String, String>, FatalError>
{
    let mut map = IndexMap::new();

    match &ev.data
    {
        OwnedEventData::MappingStart(_) =>
        {
            loop
            {
                let key_ev = next_event(cursor)?;
                if matches!(key_ev.data, OwnedEventData::MappingEnd)
                {
                    break;
                }

                let key = require_scalar(state, &key_ev, "key");
                let value_ev = next_event(cursor)?;

                let value = match &value_ev.data
                {
                    OwnedEventData::Scalar(_) => interpolated_scalar(state, &value_ev),
                    _ =>
                    {
                        skip_value(cursor, value_ev)?;
                        String::new()
                    },
                };

                map.insert(key, value);
            }
        },
        OwnedEventData::SequenceStart(_) =>
        {
            loop
            {
                let item_ev = next_event(cursor)?;
                if matches!(item_ev.data, OwnedEventData::SequenceEnd)
                {
                    break;
                }

                let raw = require_scalar(state, &item_ev, "entry");

                match raw.split_once('=')
                {
                    Some((k, v)) =>
                    {
                        let value = if interpolate_list_values
                        {
                            expand(state, item_ev.start, v)
                        }
                        else
                        {
                            v.to_string()
                        };
                        map.insert(k.to_string(), value);
                    },
                    None =>
                    {
                        if raw.is_empty()
                        {
                            continue;
                        }
                        if interpolate_list_values
                        {
                            state
                                .diagnostics
                                .add_warning(Some(item_ev.start), format!("entry missing '=': {raw}"));
                        }
                        map.insert(raw, String::new());
                    },
                }
            }
        },
        _ =>
        {
            state
                .diagnostics
                .add_error(Some(ev.start), "expected a mapping or a list of \"KEY=VALUE\" entries");
            skip_value(cursor, ev)?;
        },
    }

    Ok(map)
}

/// List form stores each service with the default condition;
/// mapping form reads a `condition` subkey per dependency.
fn parse_depends_on(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
) -> Result<Vec<Dependency>, FatalError>
{
    let mut deps = Vec::new();

    match &ev.data
    {
        OwnedEventData::SequenceStart(_) =>
        {
            loop
            {
                let item_ev = next_event(cursor)?;
                if matches!(item_ev.data, OwnedEventData::SequenceEnd)
                {
                    break;
                }

                let name = require_scalar(state, &item_ev, "depends_on entry");
                deps.push(Dependency {
                    service:   name,
                    condition: Condition::ServiceStarted,
                });
            }
        },
        OwnedEventData::MappingStart(_) =>
        {
            loop
            {
                let key_ev = next_event(cursor)?;
                if matches!(key_ev.data, OwnedEventData::MappingEnd)
                {
                    break;
                }

                let name = require_scalar(state, &key_ev, "depends_on key");
                let value_ev = next_event(cursor)?;

                let mut condition = Condition::ServiceStarted;

                match &value_ev.data
                {
                    OwnedEventData::MappingStart(_) =>
                    {
                        loop
                        {
                            let sub_key_ev = next_event(cursor)?;
                            if matches!(sub_key_ev.data, OwnedEventData::MappingEnd)
                            {
                                break;
                            }

                            let sub_key = require_scalar(state, &sub_key_ev, "dependency field");
                            let sub_value_ev = next_event(cursor)?;

                            if sub_key == "condition"
                            {
                                let raw = require_scalar(state, &sub_value_ev, "condition");
                                match parse_condition(&raw)
                                {
                                    Some(c) => condition = c,
                                    None =>
                                    {
                                        state.diagnostics.add_warning(
                                            Some(sub_value_ev.start),
                                            format!("unknown dependency condition: {raw}"),
                                        );
                                    },
                                }
                            }
                            else
                            {
                                skip_value(cursor, sub_value_ev)?;
                            }
                        }
                    },
                    _ =>
                    {
                        state
                            .diagnostics
                            .add_error(Some(value_ev.start), format!("depends_on.{name}: expected a mapping"));
                        skip_value(cursor, value_ev)?;
                    },
                }

                deps.push(Dependency {
                    service: name,
                    condition,
                });
            }
        },
        _ =>
        {
            state
                .diagnostics
                .add_error(Some(ev.start), "depends_on: expected a list or a mapping");
            skip_value(cursor, ev)?;
        },
    }

    Ok(deps)
}

fn parse_healthcheck(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
) -> Result<Healthcheck, FatalError>
{
    let mut healthcheck = Healthcheck::default();

    if !matches!(ev.data, OwnedEventData::MappingStart(_))
    {
        state
            .diagnostics
            .add_error(Some(ev.start), "healthcheck: expected a mapping");
        skip_value(cursor, ev)?;
        return Ok(healthcheck);
    }

    loop
    {
        let key_ev = next_event(cursor)?;
        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let key = require_scalar(state, &key_ev, "healthcheck key");
        let value_ev = next_event(cursor)?;

        match key.as_str()
        {
            "test" => healthcheck.test_cmd = scalar_or_list(cursor, state, value_ev, false)?,
            "interval" => healthcheck.interval_ns = parse_literal_duration(state, &value_ev),
            "timeout" => healthcheck.timeout_ns = parse_literal_duration(state, &value_ev),
            "start_period" => healthcheck.start_period_ns = parse_literal_duration(state, &value_ev),
            "retries" =>
            {
                let raw = require_scalar(state, &value_ev, "retries");
                healthcheck.retries = raw.parse().unwrap_or(Healthcheck::DEFAULT_RETRIES);
            },
            _ =>
            {
                state
                    .diagnostics
                    .add_warning(Some(key_ev.start), format!("unknown key: {key}"));
                skip_value(cursor, value_ev)?;
            },
        }
    }

    Ok(healthcheck)
}

fn parse_literal_duration(state: &mut State<'_>, ev: &OwnedEvent) -> u64
{
    let raw = require_scalar(state, ev, "duration");
    match parse_duration(&raw)
    {
        Ok(ns) => ns,
        Err(e) =>
        {
            state
                .diagnostics
                .add_error(Some(ev.start), format!("{e}: {raw}"));
            0
        },
    }
}

fn parse_volume_mounts(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
) -> Result<Vec<crate::value::VolumeMount>, FatalError>
{
    let raws = scalar_or_list(cursor, state, ev, true)?;

    Ok(raws
        .into_iter()
        .filter_map(|raw| match parse_volume_mount(&raw)
        {
            Ok(mount) => Some(mount),
            Err(e) =>
            {
                state
                    .diagnostics
                    .add_error(None, format!("{e}: {raw}"));
                None
            },
        })
        .collect())
}

fn parse_ports(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    ev: OwnedEvent,
) -> Result<Vec<crate::value::Port>, FatalError>
{
    let raws = scalar_or_list(cursor, state, ev, true)?;

    Ok(raws
        .into_iter()
        .filter_map(|raw| match parse_port(&raw)
        {
            Ok(port) => Some(port),
            Err(e) =>
            {
                state.diagnostics.add_error(None, format!("{e}: {raw}"));
                None
            },
        })
        .collect())
}

fn parse_service_body(
    cursor: &mut Cursor,
    state: &mut State<'_>,
    name: &str,
) -> Result<Service, FatalError>
{
    let mut service = Service::new(name);

    loop
    {
        let key_ev = next_event(cursor)?;
        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let key = require_scalar(state, &key_ev, "service key");
        let value_ev = next_event(cursor)?;

        match key.as_str()
        {
            "image" => service.image = Some(interpolated_scalar(state, &value_ev)),
            "ports" => service.ports = parse_ports(cursor, state, value_ev)?,
            "environment" => service.environment = parse_environment(cursor, state, value_ev)?,
            "depends_on" => service.depends_on = parse_depends_on(cursor, state, value_ev)?,
            "healthcheck" => service.healthcheck = Some(parse_healthcheck(cursor, state, value_ev)?),
            "volumes" => service.volumes = parse_volume_mounts(cursor, state, value_ev)?,
            "command" => service.command = scalar_or_list(cursor, state, value_ev, true)?,
            "entrypoint" => service.entrypoint = scalar_or_list(cursor, state, value_ev, true)?,
            "working_dir" => service.working_dir = Some(interpolated_scalar(state, &value_ev)),
            "user" => service.user = Some(interpolated_scalar(state, &value_ev)),
            "container_name" => service.container_name = Some(interpolated_scalar(state, &value_ev)),
            "hostname" => service.hostname = Some(interpolated_scalar(state, &value_ev)),
            "domainname" => service.domainname = Some(interpolated_scalar(state, &value_ev)),
            "restart" =>
            {
                let raw = require_scalar(state, &value_ev, "restart");
                service.restart = parse_restart_policy(&raw);
            },
            "init" => service.run_init = parse_literal_bool(state, &value_ev),
            "tty" => service.tty = parse_literal_bool(state, &value_ev),
            "stdin_open" => service.stdin_open = parse_literal_bool(state, &value_ev),
            "read_only" => service.read_only = parse_literal_bool(state, &value_ev),
            "privileged" => service.privileged = parse_literal_bool(state, &value_ev),
            "stop_signal" => service.stop_signal = Some(interpolated_scalar(state, &value_ev)),
            "stop_grace_period" => service.stop_grace_period_ns = parse_literal_duration(state, &value_ev),
            "expose" => service.expose = scalar_or_list(cursor, state, value_ev, true)?,
            "dns" => service.dns = scalar_or_list(cursor, state, value_ev, true)?,
            "dns_search" => service.dns_search = scalar_or_list(cursor, state, value_ev, true)?,
            "extra_hosts" => service.extra_hosts = scalar_or_list(cursor, state, value_ev, true)?,
            "cap_add" => service.cap_add = scalar_or_list(cursor, state, value_ev, true)?,
            "cap_drop" => service.cap_drop = scalar_or_list(cursor, state, value_ev, true)?,
            "security_opt" => service.security_opt = scalar_or_list(cursor, state, value_ev, true)?,
            "networks" => service.networks = scalar_or_list(cursor, state, value_ev, true)?,
            "labels" => service.labels = parse_labels(cursor, state, value_ev)?,
            "env_file" => service.env_file = scalar_or_list(cursor, state, value_ev, true)?,
            "mem_limit" => service.mem_limit = Some(parse_literal_byte_size(state, &value_ev)),
            "mem_reservation" => service.mem_reservation = Some(parse_literal_byte_size(state, &value_ev)),
            "shm_size" => service.shm_size = Some(parse_literal_byte_size(state, &value_ev)),
            "cpus" =>
            {
                let raw = require_scalar(state, &value_ev, "cpus");
                service.cpus = raw.parse().ok();
            },
            "pids_limit" =>
            {
                let raw = require_scalar(state, &value_ev, "pids_limit");
                service.pids_limit = raw.parse().ok();
            },
            "logging" => service.logging = Some(parse_logging(cursor, state, value_ev)?),
            other if other.starts_with("x-") => skip_value(cursor, value_ev)?,
            other =>
            {
                state
                    .diagnostics
                    .add_warning(Some(key_ev.start), format!("unknown key: {other}"));
                skip_value(cursor, value_ev)?;
            },
        }
    }

    Ok(service)
}

fn parse_literal_bool(state: &mut State<'_>, ev: &OwnedEvent) -> bool
{
    let raw = require_scalar(state, ev, "boolean");
    matches!(raw.as_str(), "true" | "True" | "TRUE" | "yes" | "on")
}

fn parse_literal_byte_size(state: &mut State<'_>, ev: &OwnedEvent) -> u64
{
    let raw = require_scalar(state, ev, "byte size");
    match parse_byte_size(&raw)
    {
        Ok(n) => n,
        Err(e) =>
        {
            state.diagnostics.add_error(Some(ev.start), format!("{e}: {raw}"));
            0
        },
    }
}

fn parse_logging(cursor: &mut Cursor, state: &mut State<'_>, ev: OwnedEvent) -> Result<Logging, FatalError>
{
    let mut logging = Logging::default();

    if !matches!(ev.data, OwnedEventData::MappingStart(_))
    {
        state
            .diagnostics
            .add_error(Some(ev.start), "logging: expected a mapping");
        skip_value(cursor, ev)?;
        return Ok(logging);
    }

    loop
    {
        let key_ev = next_event(cursor)?;
        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let key = require_scalar(state, &key_ev, "logging key");
        let value_ev = next_event(cursor)?;

        match key.as_str()
        {
            "driver" => logging.driver = Some(interpolated_scalar(state, &value_ev)),
            "options" => logging.options = parse_key_value_block(cursor, state, value_ev, true)?,
            _ =>
            {
                state
                    .diagnostics
                    .add_warning(Some(key_ev.start), format!("unknown key: {key}"));
                skip_value(cursor, value_ev)?;
            },
        }
    }

    Ok(logging)
}

/// `volumes:`/`networks:` entries are skipped bodies in the
/// underlying spec, but `driver`/`external`/`labels` are
/// universal enough across the compose-parsing corpus that
/// this crate models them rather than treating the whole body
/// as opaque; every other key still warns-and-skips.
fn parse_volume_body(cursor: &mut Cursor, state: &mut State<'_>, _name: &str) -> Result<Volume, FatalError>
{
    let mut volume = Volume::default();

    loop
    {
        let key_ev = next_event(cursor)?;
        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let key = require_scalar(state, &key_ev, "volume key");
        let value_ev = next_event(cursor)?;

        match key.as_str()
        {
            "driver" => volume.driver = Some(interpolated_scalar(state, &value_ev)),
            "external" => volume.external = parse_literal_bool(state, &value_ev),
            "labels" => volume.labels = parse_labels(cursor, state, value_ev)?,
            other if other.starts_with("x-") => skip_value(cursor, value_ev)?,
            _ => skip_value(cursor, value_ev)?,
        }
    }

    Ok(volume)
}

fn parse_network_body(cursor: &mut Cursor, state: &mut State<'_>, _name: &str) -> Result<Network, FatalError>
{
    let mut network = Network::default();

    loop
    {
        let key_ev = next_event(cursor)?;
        if matches!(key_ev.data, OwnedEventData::MappingEnd)
        {
            break;
        }

        let key = require_scalar(state, &key_ev, "network key");
        let value_ev = next_event(cursor)?;

        match key.as_str()
        {
            "driver" => network.driver = Some(interpolated_scalar(state, &value_ev)),
            "external" => network.external = parse_literal_bool(state, &value_ev),
            "labels" => network.labels = parse_labels(cursor, state, value_ev)?,
            other if other.starts_with("x-") => skip_value(cursor, value_ev)?,
            _ => skip_value(cursor, value_ev)?,
        }
    }

    Ok(network)
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value::{Protocol, RestartPolicyKind};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String>
    {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn minimal_service_round_trips()
    {
        let yaml = "services:\n  web:\n    image: nginx\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();

        let model = outcome.model.expect("no errors expected");
        assert_eq!(model.services["web"].image.as_deref(), Some("nginx"));
        assert_eq!(outcome.diagnostics.count(), 0);
    }

    #[test]
    fn environment_interpolates_with_default()
    {
        let yaml = "services:\n  db:\n    image: mysql\n    environment:\n      DB_PASSWORD: ${DB_PASSWORD:-secret}\n";

        let without = parse(yaml.as_bytes(), &env(&[])).unwrap();
        assert_eq!(
            without.model.unwrap().services["db"].environment["DB_PASSWORD"],
            "secret"
        );

        let with = parse(yaml.as_bytes(), &env(&[("DB_PASSWORD", "s3cr3t")])).unwrap();
        assert_eq!(
            with.model.unwrap().services["db"].environment["DB_PASSWORD"],
            "s3cr3t"
        );
    }

    #[test]
    fn ports_parse_with_protocol_defaulting()
    {
        let yaml = "services:\n  web:\n    image: nginx\n    ports:\n      - \"8080:80\"\n      - \"53:53/udp\"\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let ports = &outcome.model.unwrap().services["web"].ports;

        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].host, 8080);
        assert_eq!(ports[0].protocol, Protocol::Tcp);
        assert_eq!(ports[1].protocol, Protocol::Udp);
    }

    #[test]
    fn depends_on_mapping_form_reads_condition()
    {
        let yaml = "services:\n  web:\n    image: nginx\n    depends_on:\n      db:\n        condition: service_healthy\n  db:\n    image: mysql\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let model = outcome.model.unwrap();

        assert!(!outcome.diagnostics.has_errors());
        assert_eq!(model.services["web"].depends_on.len(), 1);
        assert_eq!(model.services["web"].depends_on[0].service, "db");
        assert_eq!(model.services["web"].depends_on[0].condition, Condition::ServiceHealthy);
    }

    #[test]
    fn list_form_env_entry_missing_equals_warns()
    {
        let yaml = "services:\n  web:\n    image: nginx\n    environment:\n      - DEBUG\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let model = outcome.model.unwrap();

        assert_eq!(model.services["web"].environment["DEBUG"], "");
        assert!(outcome.diagnostics.count() >= 1);
        assert!(!outcome.diagnostics.has_errors());
    }

    #[test]
    fn list_form_label_entry_missing_equals_is_silent()
    {
        let yaml = "services:\n  web:\n    image: nginx\n    labels:\n      - com.example.bare\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let model = outcome.model.unwrap();

        assert_eq!(model.services["web"].labels["com.example.bare"], "");
        assert_eq!(outcome.diagnostics.count(), 0);
    }

    #[test]
    fn unknown_service_key_warns_but_keeps_model()
    {
        let yaml = "services:\n  web:\n    image: nginx\n    unknown_key: value\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();

        assert!(outcome.model.is_some());
        assert!(outcome.diagnostics.count() >= 1);
        assert!(!outcome.diagnostics.has_errors());
    }

    #[test]
    fn healthcheck_fields_parse()
    {
        let yaml = "services:\n  web:\n    healthcheck:\n      test: [\"CMD\",\"curl\",\"-f\",\"http://x/\"]\n      interval: 30s\n      retries: 3\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let hc = outcome.model.unwrap().services["web"].healthcheck.clone().unwrap();

        assert_eq!(hc.test_cmd, vec!["CMD", "curl", "-f", "http://x/"]);
        assert_eq!(hc.interval_ns, 30_000_000_000);
        assert_eq!(hc.retries, 3);
    }

    #[test]
    fn unclosed_quote_is_a_yaml_error()
    {
        let yaml = "key: \"unclosed\n";
        let err = parse(yaml.as_bytes(), &env(&[])).unwrap_err();

        assert!(matches!(err, FatalError::Yaml(_)));
    }

    #[test]
    fn root_scalar_is_invalid_structure()
    {
        let yaml = "just a scalar\n";
        let err = parse(yaml.as_bytes(), &env(&[])).unwrap_err();

        assert!(matches!(err, FatalError::InvalidStructure { .. }));
    }

    #[test]
    fn anchor_and_alias_reuse_subtree()
    {
        let yaml = "services:\n  web: &base\n    image: nginx\n  web2: *base\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let model = outcome.model.expect("no errors expected");

        assert_eq!(model.services["web"].image, model.services["web2"].image);
    }

    #[test]
    fn x_prefixed_root_keys_are_silently_skipped()
    {
        let yaml = "x-custom:\n  anything: here\nservices:\n  web:\n    image: nginx\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();

        assert_eq!(outcome.diagnostics.count(), 0);
        assert!(outcome.model.is_some());
    }

    #[test]
    fn restart_policy_default_is_no()
    {
        let yaml = "services:\n  web:\n    image: nginx\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();

        assert_eq!(
            outcome.model.unwrap().services["web"].restart.kind,
            RestartPolicyKind::No
        );
    }

    #[test]
    fn volume_and_network_supplemented_fields_parse()
    {
        let yaml = "services:\n  web:\n    image: nginx\nvolumes:\n  dbdata:\n    driver: local\n    external: true\nnetworks:\n  front:\n    driver: bridge\n";
        let outcome = parse(yaml.as_bytes(), &env(&[])).unwrap();
        let model = outcome.model.unwrap();

        assert_eq!(model.volumes["dbdata"].driver.as_deref(), Some("local"));
        assert!(model.volumes["dbdata"].external);
        assert_eq!(model.networks["front"].driver.as_deref(), Some("bridge"));
    }
}
