#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-entity behavior updates.
//!
//! Every live tick each player's top behavior produces a steering direction
//! and, optionally, a stack transition. Context rules that react to the ball
//! changing hands run first and take precedence over the behavior's own
//! update for that tick.

use gridiron_core::{
    BallSnapshot, BallState, Behavior, BehaviorResult, Command, EntityId, EntitySnapshot,
    EntityView, OnFieldState, Role, Side, SimTuning, TeamIndex, Vec2,
};

/// Read-only inputs shared by every behavior update in a tick.
#[derive(Clone, Copy, Debug)]
pub struct BehaviorContext<'a> {
    /// On-field loop state; behaviors only act during live play.
    pub on_field: OnFieldState,
    /// Ball snapshot at the start of the update.
    pub ball: &'a BallSnapshot,
    /// Team that snapped the ball.
    pub offense: TeamIndex,
    /// Human-controlled entity, which receives no automatic steering.
    pub controlled: Option<EntityId>,
    /// Simulation tuning.
    pub tuning: &'a SimTuning,
}

/// Pure system evaluating behavior stacks.
#[derive(Debug, Default)]
pub struct Behaviors;

impl Behaviors {
    /// Emits steering, behavior updates, throws and stack transitions.
    pub fn handle(&self, entities: &EntityView, ctx: &BehaviorContext<'_>, out: &mut Vec<Command>) {
        if ctx.on_field != OnFieldState::LivePlay {
            return;
        }

        let carrier = ctx
            .ball
            .owner
            .filter(|_| ctx.ball.state == BallState::Held)
            .and_then(|owner| entities.get(owner));

        for entity in entities.iter() {
            if entity.tackled {
                continue;
            }

            if let Some(result) = context_transition(entity, entities, carrier, ctx) {
                out.push(Command::TransitionBehavior {
                    entity: entity.id,
                    result,
                });
                continue;
            }

            let mut frame = Frame {
                entity,
                steer_allowed: ctx.controlled != Some(entity.id),
                out: &mut *out,
            };
            update(&mut frame, entities, carrier, ctx);
        }
    }
}

/// Rules reacting to possession changes, applied before per-variant updates.
fn context_transition(
    entity: &EntitySnapshot,
    entities: &EntityView,
    carrier: Option<&EntitySnapshot>,
    ctx: &BehaviorContext<'_>,
) -> Option<BehaviorResult> {
    let behavior = &entity.behavior;
    if matches!(behavior, Behavior::Grapple { .. }) {
        return None;
    }

    if carrier.is_some_and(|carrier| carrier.id == entity.id)
        && !matches!(
            behavior,
            Behavior::BallCarrier | Behavior::QuarterbackDrop { .. }
        )
    {
        return Some(BehaviorResult::SwitchTo(Behavior::BallCarrier));
    }

    if entity.side == Side::Offense
        && carrier.is_some_and(|carrier| carrier.team != entity.team)
        && !matches!(
            behavior,
            Behavior::Pursuit { .. } | Behavior::TackleAttempt { .. }
        )
    {
        return Some(BehaviorResult::SwitchTo(Behavior::Pursuit { cooldown_ticks: 0 }));
    }

    let flight = ctx.ball.flight.filter(|_| ctx.ball.state == BallState::InAir);
    match behavior {
        Behavior::RouteRunner { .. } | Behavior::Hold if entity.side == Side::Offense => {
            match flight {
                Some(flight) if flight.receiver == entity.id => Some(BehaviorResult::SwitchTo(
                    Behavior::ReceivePass {
                        spot: flight.target,
                    },
                )),
                Some(_) if matches!(behavior, Behavior::RouteRunner { .. }) => {
                    Some(finish(entity))
                }
                _ => None,
            }
        }
        Behavior::ManCoverage { target, .. } => {
            if let Some(flight) = flight.filter(|flight| flight.receiver == *target) {
                return Some(BehaviorResult::SwitchTo(Behavior::ReceivePass {
                    spot: flight.target,
                }));
            }
            let runner_loose = carrier.is_some_and(|carrier| carrier.role != Role::Qb);
            let target_gone = entities.get(*target).is_none();
            if runner_loose || ctx.ball.state == BallState::Loose || target_gone {
                Some(finish(entity))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Pops the current behavior, or falls back to `Hold` at the stack base.
fn finish(entity: &EntitySnapshot) -> BehaviorResult {
    if entity.stack_depth > 1 {
        BehaviorResult::Complete
    } else {
        BehaviorResult::SwitchTo(Behavior::Hold)
    }
}

struct Frame<'a> {
    entity: &'a EntitySnapshot,
    steer_allowed: bool,
    out: &'a mut Vec<Command>,
}

impl Frame<'_> {
    fn steer(&mut self, direction: Vec2) {
        if self.steer_allowed {
            self.out.push(Command::Steer {
                entity: self.entity.id,
                direction,
            });
        }
    }

    fn steer_to(&mut self, target: Vec2, arrival_radius: f32) {
        let offset = target - self.entity.position;
        let direction = if offset.length() <= arrival_radius {
            Vec2::ZERO
        } else {
            offset.normalize_or_zero()
        };
        self.steer(direction);
    }

    fn replace(&mut self, behavior: Behavior) {
        self.out.push(Command::UpdateBehavior {
            entity: self.entity.id,
            behavior,
        });
    }

    fn transition(&mut self, result: BehaviorResult) {
        self.out.push(Command::TransitionBehavior {
            entity: self.entity.id,
            result,
        });
    }
}

fn update(
    frame: &mut Frame<'_>,
    entities: &EntityView,
    carrier: Option<&EntitySnapshot>,
    ctx: &BehaviorContext<'_>,
) {
    let entity = frame.entity;
    let arrival = ctx.tuning.movement.arrival_radius;
    let tackle_range = ctx.tuning.contact.tackle_range;
    let opposing_carrier = carrier.filter(|carrier| carrier.team != entity.team);

    match &entity.behavior {
        Behavior::Hold | Behavior::Grapple { .. } => frame.steer(Vec2::ZERO),
        Behavior::RouteRunner { waypoints, next } => {
            let Some(waypoint) = waypoints.get(*next) else {
                frame.steer(Vec2::ZERO);
                frame.transition(finish(entity));
                return;
            };
            if entity.position.distance(*waypoint) > arrival {
                frame.steer_to(*waypoint, arrival);
                return;
            }
            match waypoints.get(next + 1) {
                Some(following) => frame.steer_to(*following, arrival),
                None => frame.steer(Vec2::ZERO),
            }
            frame.replace(Behavior::RouteRunner {
                waypoints: waypoints.clone(),
                next: next + 1,
            });
        }
        Behavior::PassBlock { anchor } => {
            let radius = ctx.tuning.field.yards(ctx.tuning.contact.block_radius_yards);
            let rusher = entities
                .iter()
                .filter(|other| {
                    other.team != entity.team
                        && matches!(other.behavior, Behavior::PassRush)
                        && other.position.distance(*anchor) <= radius
                })
                .min_by(|a, b| {
                    a.position
                        .distance_squared(entity.position)
                        .total_cmp(&b.position.distance_squared(entity.position))
                        .then(a.id.cmp(&b.id))
                });
            match rusher {
                Some(rusher) => frame.steer_to(rusher.position, 0.0),
                None => frame.steer_to(*anchor, arrival),
            }
        }
        Behavior::PassRush => match ctx.ball.state {
            BallState::Held => match opposing_carrier {
                Some(carrier) if entity.position.distance(carrier.position) < tackle_range => {
                    frame.steer_to(carrier.position, 0.0);
                    frame.transition(BehaviorResult::SwitchTo(Behavior::TackleAttempt {
                        target: carrier.id,
                    }));
                }
                Some(carrier) => frame.steer_to(carrier.position, 0.0),
                None => frame.transition(finish(entity)),
            },
            BallState::InAir | BallState::Loose | BallState::Dead => {
                frame.transition(finish(entity));
            }
        },
        Behavior::ManCoverage { target, cushion } => {
            let Some(target) = entities.get(*target) else {
                frame.steer(Vec2::ZERO);
                return;
            };
            let ideal = target.position + ctx.offense.attacking().unit() * *cushion;
            frame.steer_to(ideal, arrival);
        }
        Behavior::Pursuit { cooldown_ticks } => {
            match ctx.ball.state {
                BallState::Held => match opposing_carrier {
                    Some(carrier) => {
                        frame.steer_to(carrier.position, 0.0);
                        if *cooldown_ticks == 0
                            && entity.position.distance(carrier.position) < tackle_range
                        {
                            frame.replace(Behavior::Pursuit {
                                cooldown_ticks: ctx.tuning.tackle.retry_cooldown_ticks,
                            });
                            frame.transition(BehaviorResult::Push(Behavior::TackleAttempt {
                                target: carrier.id,
                            }));
                            return;
                        }
                    }
                    None => frame.steer(Vec2::ZERO),
                },
                BallState::InAir => match ctx.ball.flight {
                    Some(flight) => frame.steer_to(flight.target, 0.0),
                    None => frame.steer_to(ctx.ball.position, 0.0),
                },
                BallState::Loose => frame.steer_to(ctx.ball.position, 0.0),
                BallState::Dead => frame.steer(Vec2::ZERO),
            }
            if *cooldown_ticks > 0 {
                frame.replace(Behavior::Pursuit {
                    cooldown_ticks: cooldown_ticks - 1,
                });
            }
        }
        Behavior::TackleAttempt { target } => {
            match carrier.filter(|carrier| carrier.id == *target) {
                Some(carrier) => frame.steer_to(carrier.position, 0.0),
                None => frame.transition(finish(entity)),
            }
        }
        Behavior::QuarterbackDrop {
            remaining_ticks,
            primary,
        } => {
            if carrier.map(|carrier| carrier.id) != Some(entity.id) {
                frame.transition(finish(entity));
                return;
            }
            if *remaining_ticks > 0 {
                frame.steer(-entity.team.attacking().unit());
                frame.replace(Behavior::QuarterbackDrop {
                    remaining_ticks: remaining_ticks - 1,
                    primary: *primary,
                });
                return;
            }
            frame.steer(Vec2::ZERO);
            match primary.and_then(|primary| entities.get(primary)) {
                Some(receiver) => {
                    let target = lead_target(entity, receiver, ctx.tuning);
                    frame.out.push(Command::ThrowBall {
                        passer: entity.id,
                        receiver: receiver.id,
                        target,
                    });
                    frame.transition(finish(entity));
                }
                None => frame.transition(BehaviorResult::SwitchTo(Behavior::BallCarrier)),
            }
        }
        Behavior::ReceivePass { spot } => {
            if ctx.ball.state == BallState::InAir {
                frame.steer_to(*spot, 0.0);
            } else {
                frame.transition(finish(entity));
            }
        }
        Behavior::BallCarrier => {
            if carrier.map(|carrier| carrier.id) != Some(entity.id) {
                frame.transition(finish(entity));
                return;
            }
            frame.steer(carrier_direction(entity, entities, ctx.tuning));
        }
    }
}

/// Landing point leading a moving receiver by the pass flight time.
fn lead_target(passer: &EntitySnapshot, receiver: &EntitySnapshot, tuning: &SimTuning) -> Vec2 {
    let ticks = tuning
        .ball
        .flight_ticks(passer.position.distance(receiver.position));
    let lead = receiver.position + receiver.velocity * ticks as f32;
    let margin = tuning.field.units_per_yard;
    let width = tuning.field.yards(tuning.field.width_yards);
    Vec2::new(lead.x, lead.y.clamp(margin, (width - margin).max(margin)))
}

/// Run at the attacked goal line, cutting away from the nearest opponent ahead.
fn carrier_direction(entity: &EntitySnapshot, entities: &EntityView, tuning: &SimTuning) -> Vec2 {
    let attack = entity.team.attacking();
    let carrier = &tuning.carrier;
    let lookahead = tuning.field.yards(carrier.jink_lookahead_yards);

    let threat = entities
        .iter()
        .filter(|other| other.team != entity.team && !other.tackled)
        .filter(|other| (other.position.x - entity.position.x) * attack.sign() > 0.0)
        .map(|other| (other.position.distance_squared(entity.position), other))
        .filter(|(distance_sq, _)| *distance_sq < lookahead * lookahead)
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)))
        .map(|(_, other)| other);

    let Some(threat) = threat else {
        return attack.unit();
    };

    let margin = tuning.field.yards(carrier.sideline_margin_yards);
    let width = tuning.field.yards(tuning.field.width_yards);
    let lateral = if entity.position.y < margin {
        1.0
    } else if entity.position.y > width - margin {
        -1.0
    } else if threat.position.y > entity.position.y {
        -1.0
    } else {
        1.0
    };
    (attack.unit() + Vec2::new(0.0, lateral * carrier.jink_weight)).normalize_or_zero()
}
