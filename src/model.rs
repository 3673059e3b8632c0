/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The typed document tree a successful parse produces.
//!
//! Every owned string, list and map here is a plain `String`,
//! `Vec<T>` or [`IndexMap`]. There is no explicit
//! deinitialization entry point: `Drop` walks the tree for us,
//! recursively and exactly once, which is what the teacher's
//! own [`crate::reader::owned::OwnedReader`] relies on for its
//! buffer, just applied all the way down instead of at a single
//! boundary.

use indexmap::IndexMap;

use crate::value::{Condition, Port, RestartPolicy, RestartPolicyKind, VolumeMount};

/// A fully parsed compose document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeFile
{
    pub name:     Option<String>,
    pub services: IndexMap<String, Service>,
    pub volumes:  IndexMap<String, Volume>,
    pub networks: IndexMap<String, Network>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service
{
    pub name:                 String,
    pub image:                Option<String>,
    pub ports:                Vec<Port>,
    pub environment:          IndexMap<String, String>,
    pub depends_on:           Vec<Dependency>,
    pub healthcheck:          Option<Healthcheck>,
    pub volumes:              Vec<VolumeMount>,
    pub command:              Vec<String>,
    pub entrypoint:           Vec<String>,
    pub working_dir:          Option<String>,
    pub user:                 Option<String>,
    pub container_name:       Option<String>,
    pub hostname:             Option<String>,
    pub domainname:           Option<String>,
    pub restart:              RestartPolicy,
    pub run_init:             bool,
    pub stop_signal:          Option<String>,
    pub stop_grace_period_ns: u64,
    pub read_only:            bool,
    pub privileged:           bool,
    pub cap_add:              Vec<String>,
    pub cap_drop:             Vec<String>,
    pub expose:               Vec<String>,
    pub dns:                  Vec<String>,
    pub dns_search:           Vec<String>,
    pub extra_hosts:          Vec<String>,
    pub networks:             Vec<String>,
    pub labels:               IndexMap<String, String>,
    pub env_file:             Vec<String>,
    pub mem_limit:            Option<u64>,
    pub mem_reservation:      Option<u64>,
    pub cpus:                 Option<f64>,
    pub pids_limit:           Option<i64>,
    pub logging:              Option<Logging>,
    pub tty:                  bool,
    pub stdin_open:           bool,
    pub security_opt:         Vec<String>,
    pub shm_size:             Option<u64>,
}

impl Service
{
    /// Default grace period docker-compose applies when
    /// `stop_grace_period` is unset.
    pub const DEFAULT_STOP_GRACE_PERIOD_NS: u64 = 10_000_000_000;

    /// A bare, unpopulated service belonging to `name`, with
    /// every field at its spec-mandated default. The
    /// structural parser starts from this and fills in
    /// whichever keys the document actually sets.
    pub fn new(name: impl Into<String>) -> Self
    {
        Self {
            name:                 name.into(),
            image:                None,
            ports:                Vec::new(),
            environment:          IndexMap::new(),
            depends_on:           Vec::new(),
            healthcheck:          None,
            volumes:              Vec::new(),
            command:              Vec::new(),
            entrypoint:           Vec::new(),
            working_dir:          None,
            user:                 None,
            container_name:       None,
            hostname:             None,
            domainname:           None,
            restart:              RestartPolicy {
                kind:        RestartPolicyKind::No,
                max_retries: None,
            },
            run_init:             false,
            stop_signal:          None,
            stop_grace_period_ns: Self::DEFAULT_STOP_GRACE_PERIOD_NS,
            read_only:            false,
            privileged:           false,
            cap_add:              Vec::new(),
            cap_drop:             Vec::new(),
            expose:               Vec::new(),
            dns:                  Vec::new(),
            dns_search:           Vec::new(),
            extra_hosts:          Vec::new(),
            networks:             Vec::new(),
            labels:               IndexMap::new(),
            env_file:             Vec::new(),
            mem_limit:            None,
            mem_reservation:      None,
            cpus:                 None,
            pids_limit:           None,
            logging:              None,
            tty:                  false,
            stdin_open:           false,
            security_opt:         Vec::new(),
            shm_size:             None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency
{
    pub service:   String,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Healthcheck
{
    pub test_cmd:         Vec<String>,
    pub interval_ns:      u64,
    pub timeout_ns:       u64,
    pub retries:          u32,
    pub start_period_ns:  u64,
}

impl Healthcheck
{
    pub const DEFAULT_INTERVAL_NS: u64 = 30_000_000_000;
    pub const DEFAULT_TIMEOUT_NS: u64 = 30_000_000_000;
    pub const DEFAULT_RETRIES: u32 = 3;
    pub const DEFAULT_START_PERIOD_NS: u64 = 0;
}

impl Default for Healthcheck
{
    fn default() -> Self
    {
        Self {
            test_cmd:        Vec::new(),
            interval_ns:     Self::DEFAULT_INTERVAL_NS,
            timeout_ns:      Self::DEFAULT_TIMEOUT_NS,
            retries:         Self::DEFAULT_RETRIES,
            start_period_ns: Self::DEFAULT_START_PERIOD_NS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logging
{
    pub driver:  Option<String>,
    pub options: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Volume
{
    pub driver:   Option<String>,
    pub external: bool,
    pub labels:   IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network
{
    pub driver:   Option<String>,
    pub external: bool,
    pub labels:   IndexMap<String, String>,
}

#[cfg(test)]
mod tests
{
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fresh_service_matches_spec_defaults()
    {
        let svc = Service::new("web");

        assert_eq!(svc.restart.kind, RestartPolicyKind::No);
        assert_eq!(svc.stop_grace_period_ns, 10_000_000_000);
        assert!(!svc.read_only);
        assert!(!svc.privileged);
        assert!(svc.ports.is_empty());
        assert!(svc.environment.is_empty());
    }

    #[test]
    fn healthcheck_defaults_match_spec()
    {
        let hc = Healthcheck::default();

        assert_eq!(hc.interval_ns, 30_000_000_000);
        assert_eq!(hc.timeout_ns, 30_000_000_000);
        assert_eq!(hc.retries, 3);
        assert_eq!(hc.start_period_ns, 0);
    }

    #[test]
    fn compose_file_default_is_empty()
    {
        let file = ComposeFile::default();

        assert!(file.name.is_none());
        assert!(file.services.is_empty());
        assert!(file.volumes.is_empty());
        assert!(file.networks.is_empty());
    }
}
