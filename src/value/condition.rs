/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `depends_on` long-form `condition:` syntax.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition
{
    ServiceStarted,
    ServiceHealthy,
    ServiceCompletedSuccessfully,
}

/// Parse a `depends_on` condition. Unrecognized input yields
/// `None` rather than an error; the caller decides whether
/// that warrants a diagnostic.
pub fn parse_condition(raw: &str) -> Option<Condition>
{
    match raw
    {
        "service_started" => Some(Condition::ServiceStarted),
        "service_healthy" => Some(Condition::ServiceHealthy),
        "service_completed_successfully" => Some(Condition::ServiceCompletedSuccessfully),
        _ => None,
    }
}
