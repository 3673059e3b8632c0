/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Pure, total functions for the small scalar grammars a
//! compose document embeds inside otherwise-plain strings:
//! ports, volume mounts, durations, byte sizes, restart
//! policies and dependency conditions.
//!
//! Each lives in its own file, the same way `yary::scanner`
//! splits its scalar scanning by style (`block`, `flow`,
//! `plain`) rather than keeping one large `scalar.rs`.

mod bytesize;
mod condition;
mod duration;
mod port;
mod restart;
mod volume;

pub use bytesize::{parse_byte_size, ByteSizeError};
pub use condition::{parse_condition, Condition};
pub use duration::{parse_duration, DurationError};
pub use port::{parse_port, Port, PortError, Protocol};
pub use restart::{parse_restart_policy, RestartPolicy, RestartPolicyKind};
pub use volume::{parse_volume_mount, VolumeMount, VolumeMountError};
