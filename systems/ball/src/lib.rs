#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ball flight and possession changes.
//!
//! A thrown ball advances along its scalar progress model one tick at a time.
//! On landing it goes to the nearest player touching it; an untouched forward
//! pass is incomplete. Loose balls are recovered by the nearest contact.

use gridiron_core::{
    BallSnapshot, BallState, Command, Contact, ContactKind, EntityId, WhistleReason,
};

/// Pure system advancing the ball and resolving catches.
#[derive(Debug, Default)]
pub struct Ball;

impl Ball {
    /// Emits the ball commands for the current tick.
    pub fn handle(&self, ball: &BallSnapshot, contacts: &[Contact], out: &mut Vec<Command>) {
        match ball.state {
            BallState::InAir => {
                let Some(flight) = ball.flight else {
                    return;
                };
                if !flight.landed() {
                    let elapsed_ticks = flight.elapsed_ticks + 1;
                    out.push(Command::MoveBall {
                        position: flight.position_at(elapsed_ticks),
                        elapsed_ticks,
                    });
                    return;
                }

                match nearest_contact(contacts) {
                    Some(entity) => out.push(Command::CatchBall { entity }),
                    None => {
                        out.push(Command::BallLoose {
                            position: flight.target,
                        });
                        if flight.forward {
                            out.push(Command::Whistle {
                                reason: WhistleReason::Incomplete,
                            });
                        }
                    }
                }
            }
            BallState::Loose => {
                if let Some(entity) = nearest_contact(contacts) {
                    out.push(Command::RecoverBall { entity });
                }
            }
            BallState::Dead | BallState::Held => {}
        }
    }
}

fn nearest_contact(contacts: &[Contact]) -> Option<EntityId> {
    contacts
        .iter()
        .filter(|contact| contact.kind == ContactKind::Ball)
        .min_by(|a, b| {
            a.distance_sq
                .total_cmp(&b.distance_sq)
                .then(a.first.cmp(&b.first))
        })
        .map(|contact| contact.first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::{BallFlight, Vec2};

    fn in_air(elapsed_ticks: u32, forward: bool) -> BallSnapshot {
        let flight = BallFlight {
            passer: EntityId::new(1),
            receiver: EntityId::new(4),
            origin: Vec2::new(0.0, 0.0),
            target: Vec2::new(100.0, 0.0),
            elapsed_ticks,
            duration_ticks: 10,
            forward,
        };
        BallSnapshot {
            state: BallState::InAir,
            owner: None,
            position: flight.position_at(elapsed_ticks),
            flight: Some(flight),
        }
    }

    fn touch(entity: u32, distance_sq: f32) -> Contact {
        Contact {
            kind: ContactKind::Ball,
            first: EntityId::new(entity),
            second: EntityId::new(0),
            distance_sq,
        }
    }

    #[test]
    fn flight_progresses_linearly() {
        let mut commands = Vec::new();
        Ball.handle(&in_air(4, true), &[touch(4, 1.0)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::MoveBall {
                position: Vec2::new(50.0, 0.0),
                elapsed_ticks: 5,
            }]
        );
    }

    #[test]
    fn nearest_player_catches_a_landed_ball() {
        let mut commands = Vec::new();
        Ball.handle(
            &in_air(10, true),
            &[touch(9, 20.0), touch(4, 12.0), touch(2, 12.0)],
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::CatchBall {
                entity: EntityId::new(2)
            }]
        );
    }

    #[test]
    fn untouched_forward_pass_is_incomplete() {
        let mut commands = Vec::new();
        Ball.handle(&in_air(10, true), &[], &mut commands);
        assert_eq!(
            commands,
            vec![
                Command::BallLoose {
                    position: Vec2::new(100.0, 0.0)
                },
                Command::Whistle {
                    reason: WhistleReason::Incomplete
                },
            ]
        );
    }

    #[test]
    fn untouched_backward_pass_stays_live() {
        let mut commands = Vec::new();
        Ball.handle(&in_air(10, false), &[], &mut commands);
        assert_eq!(
            commands,
            vec![Command::BallLoose {
                position: Vec2::new(100.0, 0.0)
            }]
        );
    }

    #[test]
    fn held_ball_needs_no_commands() {
        let ball = BallSnapshot {
            state: BallState::Held,
            owner: Some(EntityId::new(1)),
            position: Vec2::ZERO,
            flight: None,
        };
        let mut commands = Vec::new();
        Ball.handle(&ball, &[touch(3, 1.0)], &mut commands);
        assert!(commands.is_empty());
    }
}
