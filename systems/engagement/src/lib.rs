#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Blocker versus rusher grapples.
//!
//! Active grapples roll once per tick for the rusher; unresolved grapples end
//! without a winner after the configured duration. New grapples start from
//! block contacts between players who are both free.

use std::{collections::BTreeSet, time::Duration};

use gridiron_core::{
    Command, Contact, ContactKind, EngagementView, EntityId, EntityView, GrappleTuning,
    TICK_RATE_HZ,
};
use rand::Rng;

/// World state a grapple pass reads.
#[derive(Clone, Copy, Debug)]
pub struct GrappleContext<'a> {
    /// Grapples active at the start of the tick.
    pub engagements: &'a EngagementView,
    /// Players on the field.
    pub entities: &'a EntityView,
    /// Contacts detected this tick.
    pub contacts: &'a [Contact],
    /// Grapple odds and duration.
    pub tuning: &'a GrappleTuning,
    /// Length of the tick being resolved.
    pub dt: Duration,
}

/// Pure system that resolves and creates grapples.
#[derive(Debug, Default)]
pub struct Engagement;

impl Engagement {
    /// Rolls active grapples, then engages fresh block contacts.
    pub fn handle<R: Rng>(&self, ctx: &GrappleContext<'_>, rng: &mut R, out: &mut Vec<Command>) {
        let GrappleContext {
            engagements,
            entities,
            contacts,
            tuning,
            dt,
        } = *ctx;
        let mut busy: BTreeSet<EntityId> = BTreeSet::new();

        for engagement in engagements.iter() {
            let _ = busy.insert(engagement.rusher);
            let _ = busy.insert(engagement.blocker);

            if engagement.elapsed_ticks >= tuning.max_duration_ticks {
                out.push(Command::ReleaseEngagement {
                    engagement: engagement.id,
                    winner: None,
                });
                continue;
            }

            let (Some(rusher), Some(blocker)) = (
                entities.get(engagement.rusher),
                entities.get(engagement.blocker),
            ) else {
                continue;
            };
            let chance = tick_chance(
                tuning.win_chance(rusher.ratings.hitting_power, blocker.ratings.hitting_power),
                dt,
            );
            if roll_grapple(chance, rng) {
                out.push(Command::ReleaseEngagement {
                    engagement: engagement.id,
                    winner: Some(engagement.rusher),
                });
            }
        }

        let mut candidates: Vec<&Contact> = contacts
            .iter()
            .filter(|contact| contact.kind == ContactKind::Block)
            .collect();
        candidates.sort_by(|a, b| {
            a.distance_sq
                .total_cmp(&b.distance_sq)
                .then(a.first.cmp(&b.first))
                .then(a.second.cmp(&b.second))
        });

        for contact in candidates {
            let (rusher, blocker) = (contact.first, contact.second);
            if busy.contains(&rusher) || busy.contains(&blocker) {
                continue;
            }
            let free = |id: EntityId| {
                entities
                    .get(id)
                    .is_some_and(|entity| entity.engagement.is_none() && !entity.tackled)
            };
            let blocker_ready = entities.get(blocker).is_some_and(|entity| entity.can_engage);
            if !free(rusher) || !free(blocker) || !blocker_ready {
                continue;
            }

            let _ = busy.insert(rusher);
            let _ = busy.insert(blocker);
            out.push(Command::Engage { rusher, blocker });
        }
    }
}

/// Scales a per-second-normalised chance to the provided tick length.
#[must_use]
pub fn tick_chance(win_chance: f32, dt: Duration) -> f32 {
    (win_chance * dt.as_secs_f32() * TICK_RATE_HZ as f32).clamp(0.0, 1.0)
}

/// Single grapple roll; `true` means the rusher broke free.
pub fn roll_grapple<R: Rng>(chance: f32, rng: &mut R) -> bool {
    rng.gen::<f32>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::TICK_DURATION;

    #[test]
    fn one_tick_at_sixty_hertz_keeps_the_chance() {
        assert!((tick_chance(0.5, TICK_DURATION) - 0.5).abs() < 1e-4);
        assert!((tick_chance(0.5, TICK_DURATION * 2) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn certain_and_impossible_rolls() {
        let mut rng = rand::rngs::mock::StepRng::new(u64::MAX / 2, 1);
        assert!(roll_grapple(1.0, &mut rng));
        assert!(!roll_grapple(0.0, &mut rng));
    }
}
