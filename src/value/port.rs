/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `"H:C"` / `"H:C/PROTO"` port mapping syntax.

use atoi::atoi;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol
{
    Tcp,
    Udp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port
{
    pub host:      u16,
    pub container: u16,
    pub protocol:  Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError
{
    InvalidPortFormat,
    InvalidPortNumber,
    InvalidProtocol,
}

impl fmt::Display for PortError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let msg = match self
        {
            Self::InvalidPortFormat => "invalid port format, expected \"HOST:CONTAINER\"",
            Self::InvalidPortNumber => "invalid port number",
            Self::InvalidProtocol => "invalid protocol, expected \"tcp\" or \"udp\"",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for PortError {}

/// Parse `"H:C"` or `"H:C/PROTO"`. `PROTO` defaults to `tcp`.
pub fn parse_port(raw: &str) -> Result<Port, PortError>
{
    let (ports, proto) = match raw.split_once('/')
    {
        Some((ports, proto)) => (ports, Some(proto)),
        None => (raw, None),
    };

    let (host, container) = ports.split_once(':').ok_or(PortError::InvalidPortFormat)?;

    let host = parse_u16(host).ok_or(PortError::InvalidPortNumber)?;
    let container = parse_u16(container).ok_or(PortError::InvalidPortNumber)?;

    let protocol = match proto
    {
        None | Some("tcp") => Protocol::Tcp,
        Some("udp") => Protocol::Udp,
        Some(_) => return Err(PortError::InvalidProtocol),
    };

    Ok(Port {
        host,
        container,
        protocol,
    })
}

fn parse_u16(raw: &str) -> Option<u16>
{
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    atoi::<u16>(raw.as_bytes())
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tcp_default()
    {
        assert_eq!(
            parse_port("8080:80").unwrap(),
            Port {
                host:      8080,
                container: 80,
                protocol:  Protocol::Tcp,
            }
        );
    }

    #[test]
    fn explicit_udp()
    {
        assert_eq!(
            parse_port("53:53/udp").unwrap(),
            Port {
                host:      53,
                container: 53,
                protocol:  Protocol::Udp,
            }
        );
    }

    #[test]
    fn missing_colon_is_format_error()
    {
        assert_eq!(parse_port("8080"), Err(PortError::InvalidPortFormat));
    }

    #[test]
    fn non_numeric_port_is_number_error()
    {
        assert_eq!(parse_port("abc:80"), Err(PortError::InvalidPortNumber));
    }

    #[test]
    fn unknown_protocol_is_protocol_error()
    {
        assert_eq!(parse_port("80:80/sctp"), Err(PortError::InvalidProtocol));
    }

    #[test]
    fn overflowing_port_is_number_error()
    {
        assert_eq!(parse_port("999999:80"), Err(PortError::InvalidPortNumber));
    }
}
