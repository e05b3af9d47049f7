#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Discrete proximity checks between relevant entity pairs.
//!
//! Contacts are reported, never resolved. Fast movers may tunnel between
//! ticks; the check only looks at positions at the end of the tick.

use gridiron_core::{
    BallSnapshot, BallState, Behavior, Contact, ContactKind, ContactTuning, EntitySnapshot,
    EntityView, Side, BALL_ENTITY,
};

/// Pure system that reports contacts for the current tick.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Appends every qualifying contact, sorted by kind then member ids.
    pub fn handle(
        &self,
        entities: &EntityView,
        ball: &BallSnapshot,
        tuning: &ContactTuning,
        out: &mut Vec<Contact>,
    ) {
        let range_sq = tuning.collision_range * tuning.collision_range;
        let start = out.len();

        if let Some(carrier) = ball
            .owner
            .filter(|_| ball.state == BallState::Held)
            .and_then(|owner| entities.get(owner))
        {
            for other in entities.iter() {
                if other.team == carrier.team || other.tackled {
                    continue;
                }
                push_if_close(out, ContactKind::Tackle, carrier, other, range_sq);
            }
        }

        for rusher in entities.iter().filter(|entity| is_rusher(entity)) {
            for blocker in entities.iter().filter(|entity| is_blocker(entity)) {
                if blocker.team == rusher.team {
                    continue;
                }
                push_if_close(out, ContactKind::Block, rusher, blocker, range_sq);
            }
        }

        if matches!(ball.state, BallState::InAir | BallState::Loose) {
            for player in entities.iter() {
                if player.tackled || player.engagement.is_some() {
                    continue;
                }
                let distance_sq = player.position.distance_squared(ball.position);
                if distance_sq < range_sq {
                    out.push(Contact {
                        kind: ContactKind::Ball,
                        first: player.id,
                        second: BALL_ENTITY,
                        distance_sq,
                    });
                }
            }
        }

        out[start..].sort_by_key(|contact| (contact.kind, contact.first, contact.second));
    }
}

fn is_rusher(entity: &EntitySnapshot) -> bool {
    entity.side == Side::Defense && !entity.tackled && matches!(entity.behavior, Behavior::PassRush)
}

fn is_blocker(entity: &EntitySnapshot) -> bool {
    entity.side == Side::Offense
        && !entity.tackled
        && matches!(entity.behavior, Behavior::PassBlock { .. })
}

fn push_if_close(
    out: &mut Vec<Contact>,
    kind: ContactKind,
    first: &EntitySnapshot,
    second: &EntitySnapshot,
    range_sq: f32,
) {
    let distance_sq = first.position.distance_squared(second.position);
    if distance_sq < range_sq {
        out.push(Contact {
            kind,
            first: first.id,
            second: second.id,
            distance_sq,
        });
    }
}
