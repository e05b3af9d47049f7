//! Formation position command strings.
//!
//! A slot position is written as whitespace separated `key=value` pairs, for
//! example `depth=1 lateral=-4`. Depth is measured in yards back from the
//! line of scrimmage for the side lining up; lateral is yards from the middle
//! of the field. Strings that cannot be decoded fall back to a position
//! derived from the role and a hash of the slot name.

use gridiron_core::{Role, SlotPlacement};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Widest lateral offset a fallback position may use, in yards.
const FALLBACK_LATERAL_SPAN: u64 = 20;

/// Decodes a position command string.
///
/// Returns `None` for unknown keys, repeated keys, unparsable numbers,
/// non-finite numbers or a missing `depth`/`lateral` pair.
#[must_use]
pub fn parse_placement(command: &str) -> Option<SlotPlacement> {
    let mut depth = None;
    let mut lateral = None;

    for token in command.split_whitespace() {
        let (key, value) = token.split_once('=')?;
        let value: f32 = value.parse().ok().filter(|value: &f32| value.is_finite())?;
        let slot = match key {
            "depth" => &mut depth,
            "lateral" => &mut lateral,
            _ => return None,
        };
        if slot.replace(value).is_some() {
            return None;
        }
    }

    Some(SlotPlacement {
        depth_yards: depth?,
        lateral_yards: lateral?,
    })
}

/// Deterministic position used when a command string is malformed.
#[must_use]
pub fn fallback_placement(role: Role, slot: &str) -> SlotPlacement {
    let digest = Sha256::digest(slot.as_bytes());
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let spread = u64::from_le_bytes(bytes) % (FALLBACK_LATERAL_SPAN * 2 + 1);

    SlotPlacement {
        depth_yards: default_depth(role),
        lateral_yards: spread as f32 - FALLBACK_LATERAL_SPAN as f32,
    }
}

/// Decodes `command`, logging and substituting the fallback on failure.
pub(crate) fn resolve_placement(role: Role, slot: &str, command: &str) -> SlotPlacement {
    parse_placement(command).unwrap_or_else(|| {
        let fallback = fallback_placement(role, slot);
        warn!(
            slot,
            command,
            depth = fallback.depth_yards,
            lateral = fallback.lateral_yards,
            "malformed slot position, using fallback"
        );
        fallback
    })
}

const fn default_depth(role: Role) -> f32 {
    match role {
        Role::Ol | Role::Dl | Role::Wr | Role::Te => 1.0,
        Role::Qb => 4.0,
        Role::Lb => 5.0,
        Role::Rb => 6.0,
        Role::K => 7.0,
        Role::Db => 8.0,
        Role::P => 12.0,
    }
}
