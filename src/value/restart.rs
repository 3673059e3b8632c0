/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! `restart:` policy syntax: `"no"`, `"always"`,
//! `"unless-stopped"`, `"on-failure"`, `"on-failure:N"`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestartPolicyKind
{
    No,
    Always,
    UnlessStopped,
    OnFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy
{
    pub kind:        RestartPolicyKind,
    pub max_retries: Option<u32>,
}

impl RestartPolicy
{
    const fn no() -> Self
    {
        Self {
            kind:        RestartPolicyKind::No,
            max_retries: None,
        }
    }
}

/// Parse a restart policy. Input that doesn't match any
/// recognized form (including `"on-failure:"` followed by
/// something other than digits) is not an error: it falls
/// back to the `no` policy, unconditionally and silently, the
/// same as an unset `restart:` key would.
pub fn parse_restart_policy(raw: &str) -> RestartPolicy
{
    match raw
    {
        "no" => RestartPolicy::no(),
        "always" => RestartPolicy {
            kind:        RestartPolicyKind::Always,
            max_retries: None,
        },
        "unless-stopped" => RestartPolicy {
            kind:        RestartPolicyKind::UnlessStopped,
            max_retries: None,
        },
        "on-failure" => RestartPolicy {
            kind:        RestartPolicyKind::OnFailure,
            max_retries: None,
        },
        _ => match raw.strip_prefix("on-failure:")
        {
            Some(count) => RestartPolicy {
                kind:        RestartPolicyKind::OnFailure,
                max_retries: count.parse::<u32>().ok(),
            },
            None => RestartPolicy::no(),
        },
    }
}
