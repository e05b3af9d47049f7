#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tackle interrupt and resolution.
//!
//! Each contact between the carrier and a defender committed to a tackle
//! attempt on that carrier rolls exactly once. The attempt completes either
//! way; only a successful roll brings the carrier down.

use std::collections::BTreeSet;

use gridiron_core::{
    BallSnapshot, BallState, Behavior, BehaviorResult, Command, Contact, ContactKind, EntityId,
    EntityView, TackleTuning,
};
use rand::Rng;

/// Pure system resolving tackle attempts against the ball carrier.
#[derive(Debug, Default)]
pub struct Tackle;

impl Tackle {
    /// Resolves tackle contacts in `(distance, defender id)` order.
    pub fn handle<R: Rng>(
        &self,
        entities: &EntityView,
        ball: &BallSnapshot,
        contacts: &[Contact],
        tuning: &TackleTuning,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        let Some(carrier_id) = ball.owner.filter(|_| ball.state == BallState::Held) else {
            return;
        };
        let Some(carrier) = entities.get(carrier_id).filter(|carrier| !carrier.tackled) else {
            return;
        };

        let mut attempts: Vec<&Contact> = contacts
            .iter()
            .filter(|contact| contact.kind == ContactKind::Tackle && contact.first == carrier_id)
            .collect();
        attempts.sort_by(|a, b| {
            a.distance_sq
                .total_cmp(&b.distance_sq)
                .then(a.second.cmp(&b.second))
        });

        let mut resolved: BTreeSet<EntityId> = BTreeSet::new();
        for contact in attempts {
            let Some(defender) = entities.get(contact.second) else {
                continue;
            };
            let committed = matches!(
                defender.behavior,
                Behavior::TackleAttempt { target } if target == carrier_id
            );
            if !committed || defender.engagement.is_some() || !resolved.insert(defender.id) {
                continue;
            }

            let chance = tuning.success_chance(
                defender.ratings.hitting_power,
                carrier.ratings.hitting_power,
                carrier.ratings.max_speed,
            );
            out.push(Command::TransitionBehavior {
                entity: defender.id,
                result: BehaviorResult::Complete,
            });
            if roll_tackle(chance, rng) {
                out.push(Command::TackleCarrier {
                    carrier: carrier_id,
                    defender: defender.id,
                });
                return;
            }
        }
    }
}

/// Single tackle roll; `true` means the carrier goes down.
pub fn roll_tackle<R: Rng>(chance: f32, rng: &mut R) -> bool {
    rng.gen::<f32>() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::{EntitySnapshot, PlayerRatings, Role, Side, TeamIndex, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn snapshot(
        id: u32,
        team: TeamIndex,
        behavior: Behavior,
        stack_depth: usize,
    ) -> EntitySnapshot {
        EntitySnapshot {
            id: EntityId::new(id),
            team,
            side: if team == TeamIndex::HOME {
                Side::Offense
            } else {
                Side::Defense
            },
            role: Role::Lb,
            human: false,
            ratings: PlayerRatings::default(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            steering: Vec2::ZERO,
            behavior,
            stack_depth,
            engagement: None,
            can_engage: true,
            tackled: false,
        }
    }

    fn held_by(owner: u32) -> BallSnapshot {
        BallSnapshot {
            state: BallState::Held,
            owner: Some(EntityId::new(owner)),
            position: Vec2::ZERO,
            flight: None,
        }
    }

    fn contact(defender: u32, distance_sq: f32) -> Contact {
        Contact {
            kind: ContactKind::Tackle,
            first: EntityId::new(1),
            second: EntityId::new(defender),
            distance_sq,
        }
    }

    fn attempt() -> Behavior {
        Behavior::TackleAttempt {
            target: EntityId::new(1),
        }
    }

    #[test]
    fn certain_tackle_brings_down_the_carrier() {
        let entities = EntityView::from_snapshots(vec![
            snapshot(1, TeamIndex::HOME, Behavior::BallCarrier, 2),
            snapshot(6, TeamIndex::AWAY, attempt(), 2),
        ]);
        let tuning = TackleTuning {
            base_success: 1.0,
            hitting_power_factor: 0.0,
            max_speed_factor: 0.0,
            ..TackleTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut commands = Vec::new();

        Tackle.handle(
            &entities,
            &held_by(1),
            &[contact(6, 30.0)],
            &tuning,
            &mut rng,
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![
                Command::TransitionBehavior {
                    entity: EntityId::new(6),
                    result: BehaviorResult::Complete,
                },
                Command::TackleCarrier {
                    carrier: EntityId::new(1),
                    defender: EntityId::new(6),
                },
            ]
        );
    }

    #[test]
    fn failed_attempt_still_completes_and_the_next_defender_rolls() {
        let entities = EntityView::from_snapshots(vec![
            snapshot(1, TeamIndex::HOME, Behavior::BallCarrier, 2),
            snapshot(4, TeamIndex::AWAY, attempt(), 2),
            snapshot(9, TeamIndex::AWAY, attempt(), 2),
        ]);
        let tuning = TackleTuning {
            base_success: 0.0,
            hitting_power_factor: 0.0,
            max_speed_factor: 0.0,
            ..TackleTuning::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut commands = Vec::new();

        Tackle.handle(
            &entities,
            &held_by(1),
            &[contact(9, 10.0), contact(4, 10.0)],
            &tuning,
            &mut rng,
            &mut commands,
        );

        let completed: Vec<u32> = commands
            .iter()
            .filter_map(|command| match command {
                Command::TransitionBehavior { entity, .. } => Some(entity.get()),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![4, 9]);
        assert!(!commands
            .iter()
            .any(|command| matches!(command, Command::TackleCarrier { .. })));
    }

    #[test]
    fn uncommitted_defenders_do_not_roll() {
        let entities = EntityView::from_snapshots(vec![
            snapshot(1, TeamIndex::HOME, Behavior::BallCarrier, 2),
            snapshot(3, TeamIndex::AWAY, Behavior::Pursuit { cooldown_ticks: 5 }, 1),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut commands = Vec::new();

        Tackle.handle(
            &entities,
            &held_by(1),
            &[contact(3, 4.0)],
            &TackleTuning::default(),
            &mut rng,
            &mut commands,
        );

        assert!(commands.is_empty());
    }
}
