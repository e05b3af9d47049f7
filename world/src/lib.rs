#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the gridiron simulation.
//!
//! The world owns the entity store, the ball, the engagement side table and
//! the match and play records. It is mutated exclusively through [`apply`]
//! and read through the [`query`] module.

mod ball;
mod engagements;
mod entities;
mod match_state;
mod play_state;

use std::collections::BTreeMap;

use gridiron_core::{
    BallFlight, BallState, Behavior, BehaviorResult, BehaviorStack, BehaviorStackError, Command,
    EngagementId, EntityId, Event, PenaltyKind, PlayPhase, PlayResult, Role, Side, SimTuning,
    TeamIndex, TurnoverKind, Vec2, WhistleReason, BALL_ENTITY, FIELD_LENGTH_YARDS,
};
use tracing::{debug, error, info, warn};

use crate::{
    ball::BallRecord,
    engagements::EngagementTable,
    entities::{PlayerRecord, PlayerSpawn},
};

pub use match_state::MatchState;
pub use play_state::PlayState;

/// Represents the authoritative state of a match in progress.
#[derive(Debug)]
pub struct World {
    tuning: SimTuning,
    entities: BTreeMap<EntityId, PlayerRecord>,
    ball: BallRecord,
    engagements: EngagementTable,
    match_state: MatchState,
    play: PlayState,
    play_settled: bool,
    tick_index: u64,
    next_entity: u32,
}

impl World {
    /// Creates a new world with the opening kickoff received by `receiving`.
    #[must_use]
    pub fn new(tuning: SimTuning, receiving: TeamIndex) -> Self {
        let match_state = MatchState::new(receiving, &tuning.clock, &tuning.field);
        let start = match_state.field_position();
        let line_x = tuning.field.x_for(start as f32, receiving.attacking());
        let spot = Vec2::new(line_x, tuning.field.center_y());
        let play = PlayState::new(0, receiving, start, line_x, tuning.clock.play_clock());

        Self {
            entities: BTreeMap::new(),
            ball: BallRecord::dead_at(spot),
            engagements: EngagementTable::default(),
            match_state,
            play,
            play_settled: false,
            tick_index: 0,
            next_entity: BALL_ENTITY.get() + 1,
            tuning,
        }
    }

    fn sync_ball_mirror(&mut self) {
        self.play.mirror_ball(self.ball.state(), self.ball.owner());
    }

    fn ball_changed(&mut self, out_events: &mut Vec<Event>) {
        self.sync_ball_mirror();
        out_events.push(Event::BallStateChanged {
            state: self.ball.state(),
            owner: self.ball.owner(),
        });
    }

    fn is_live(&self) -> bool {
        self.play.phase() == PlayPhase::InPlay
    }

    fn begin_play(&mut self, out_events: &mut Vec<Event>) {
        if self.match_state.game_over() {
            warn!("ignoring play request after game over");
            return;
        }

        self.entities.clear();
        self.engagements.clear();
        self.next_entity = BALL_ENTITY.get() + 1;
        self.play_settled = false;

        let offense = self.match_state.possession();
        let start = self.match_state.field_position();
        let line_x = self.tuning.field.x_for(start as f32, offense.attacking());
        self.ball = BallRecord::dead_at(Vec2::new(line_x, self.tuning.field.center_y()));
        self.play = PlayState::new(
            self.play.id() + 1,
            offense,
            start,
            line_x,
            self.tuning.clock.play_clock(),
        );

        info!(
            play = self.play.id(),
            offense = offense.get(),
            quarter = self.match_state.quarter(),
            down = self.match_state.down(),
            yards_to_go = self.match_state.yards_to_go(),
            field_position = start,
            "play begins"
        );
        out_events.push(Event::PhaseChanged {
            phase: PlayPhase::PreSnap,
        });
    }

    fn spawn_player(&mut self, slot: String, spawn: PlayerSpawn, out_events: &mut Vec<Event>) {
        if self.play.phase() != PlayPhase::PreSnap {
            warn!(slot = %slot, "players can only be spawned before the snap");
            return;
        }

        let entity = EntityId::new(self.next_entity);
        self.next_entity += 1;
        let event = Event::PlayerSpawned {
            entity,
            team: spawn.team,
            side: spawn.side,
            role: spawn.role,
            slot,
        };
        let _ = self
            .entities
            .insert(entity, PlayerRecord::spawn(entity, spawn));
        out_events.push(event);
    }

    fn snap(&mut self, out_events: &mut Vec<Event>) {
        if self.play.phase() != PlayPhase::PreSnap || self.match_state.game_over() {
            return;
        }

        let offense = self.play.offense();
        let quarterback = self
            .entities
            .values()
            .find(|player| player.team == offense && player.role == Role::Qb);
        let holder = quarterback.or_else(|| {
            self.entities
                .values()
                .find(|player| player.team == offense && player.side == Side::Offense)
        });
        let Some(holder) = holder else {
            warn!("snap requested without an offensive player");
            return;
        };
        let (holder, position) = (holder.id, holder.position);

        self.ball.hold(holder, position);
        self.play.snap();
        debug!(play = self.play.id(), holder = holder.get(), "snap");
        out_events.push(Event::Snapped { holder });
        self.ball_changed(out_events);
        out_events.push(Event::PhaseChanged {
            phase: PlayPhase::InPlay,
        });
    }

    fn move_entity(&mut self, entity: EntityId, velocity: Vec2, position: Vec2) {
        if !self.is_live() {
            return;
        }
        let engaged = self.engagements.engagement_of(entity).is_some();
        let Some(player) = self.entities.get_mut(&entity) else {
            return;
        };

        if engaged || player.tackled {
            player.velocity = Vec2::ZERO;
            return;
        }

        player.velocity = velocity;
        player.position = position;
        self.ball.follow(entity, position);
    }

    fn engage(&mut self, rusher: EntityId, blocker: EntityId, out_events: &mut Vec<Event>) {
        if !self.is_live() {
            return;
        }
        let available = |id: EntityId| {
            self.entities
                .get(&id)
                .is_some_and(|player| !player.tackled)
        };
        if !available(rusher) || !available(blocker) {
            return;
        }
        let Some(engagement) = self.engagements.engage(rusher, blocker) else {
            return;
        };

        for (member, partner) in [(rusher, blocker), (blocker, rusher)] {
            if let Some(player) = self.entities.get_mut(&member) {
                player.halt();
                // Push never underflows.
                let _ = player
                    .stack
                    .apply(BehaviorResult::Push(Behavior::Grapple { partner }));
            }
        }

        debug!(
            engagement = engagement.get(),
            rusher = rusher.get(),
            blocker = blocker.get(),
            "grapple started"
        );
        out_events.push(Event::EngagementStarted {
            engagement,
            rusher,
            blocker,
        });
    }

    fn release(
        &mut self,
        engagement: EngagementId,
        winner: Option<EntityId>,
        out_events: &mut Vec<Event>,
    ) {
        let Some((rusher, blocker)) = self.engagements.release(engagement) else {
            debug!(engagement = engagement.get(), "ignoring stale release");
            return;
        };

        let shed_until = self.tick_index + u64::from(self.tuning.grapple.shed_cooldown_ticks);
        for member in [rusher, blocker] {
            let Some(player) = self.entities.get_mut(&member) else {
                continue;
            };
            if matches!(player.stack.top(), Behavior::Grapple { .. }) {
                if let Err(err) = player.stack.apply(BehaviorResult::PopAndContinue) {
                    report_stack_violation(member, err);
                }
            }
            if winner == Some(rusher) && member == blocker {
                player.shed_until = shed_until;
            }
        }

        debug!(
            engagement = engagement.get(),
            winner = winner.map(|id| id.get()),
            "grapple resolved"
        );
        out_events.push(Event::EngagementResolved {
            engagement,
            rusher,
            blocker,
            winner,
        });
    }

    fn throw(
        &mut self,
        passer: EntityId,
        receiver: EntityId,
        target: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        if !self.is_live() || self.ball.owner() != Some(passer) {
            warn!(passer = passer.get(), "throw requested by a player without the ball");
            return;
        }

        let origin = self.ball.position();
        let direction = self.play.offense().attacking();
        let forward = (target.x - self.play.line_of_scrimmage_x()) * direction.sign() > 0.0;
        let flight = BallFlight {
            passer,
            receiver,
            origin,
            target,
            elapsed_ticks: 0,
            duration_ticks: self.tuning.ball.flight_ticks(origin.distance(target)),
            forward,
        };

        self.ball.throw(flight);
        debug!(
            passer = passer.get(),
            receiver = receiver.get(),
            duration = flight.duration_ticks,
            forward,
            "pass thrown"
        );
        self.ball_changed(out_events);
        out_events.push(Event::PassThrown {
            passer,
            receiver,
            forward,
        });
    }

    fn secure_ball(&mut self, entity: EntityId, expected: BallState) -> Option<TeamIndex> {
        if !self.is_live() || self.ball.state() != expected {
            return None;
        }
        let player = self.entities.get(&entity).filter(|player| !player.tackled)?;
        let (team, position) = (player.team, player.position);
        self.ball.hold(entity, position);
        Some(team)
    }

    fn catch(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        let Some(team) = self.secure_ball(entity, BallState::InAir) else {
            return;
        };
        let intercepted = team != self.play.offense();
        if intercepted {
            self.play.record_turnover(TurnoverKind::Interception);
        }
        debug!(entity = entity.get(), intercepted, "pass caught");
        self.ball_changed(out_events);
        out_events.push(Event::PassCaught {
            entity,
            intercepted,
        });
    }

    fn recover(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        let Some(team) = self.secure_ball(entity, BallState::Loose) else {
            return;
        };
        if team != self.play.offense() {
            self.play.record_turnover(TurnoverKind::Fumble);
        }
        debug!(entity = entity.get(), "loose ball recovered");
        self.ball_changed(out_events);
    }

    fn tackle(&mut self, carrier: EntityId, defender: EntityId, out_events: &mut Vec<Event>) {
        if !self.is_live() || self.ball.owner() != Some(carrier) {
            return;
        }
        let Some(player) = self.entities.get_mut(&carrier) else {
            return;
        };
        player.tackled = true;
        player.halt();

        out_events.push(Event::Tackle { carrier, defender });
        self.whistle(WhistleReason::Tackle, out_events);
    }

    fn officiate(&mut self, out_events: &mut Vec<Event>) {
        if !self.is_live() || self.ball.state() != BallState::Held {
            return;
        }
        let Some(carrier) = self.ball.owner().and_then(|owner| self.entities.get(&owner)) else {
            return;
        };

        let offense = self.play.offense();
        let field_position = self
            .tuning
            .field
            .field_position(carrier.position.x, offense.attacking());
        let scored = if carrier.team == offense {
            field_position >= FIELD_LENGTH_YARDS as f32
        } else {
            field_position <= 0.0
        };
        let out_of_bounds = !self.tuning.field.in_bounds(carrier.position);

        if scored {
            self.whistle(WhistleReason::Touchdown, out_events);
        } else if out_of_bounds {
            self.whistle(WhistleReason::OutOfBounds, out_events);
        }
    }

    fn whistle(&mut self, reason: WhistleReason, out_events: &mut Vec<Event>) {
        if !self.is_live() || self.play.is_frozen() {
            return;
        }

        let result = self.play_result(reason);
        self.ball.kill();
        for player in self.entities.values_mut() {
            player.halt();
        }
        self.engagements.clear();
        self.play.blow_whistle(result.whistle, result);

        debug!(
            play = self.play.id(),
            reason = ?result.whistle,
            yards = result.yards_gained,
            "whistle"
        );
        out_events.push(Event::BallStateChanged {
            state: BallState::Dead,
            owner: None,
        });
        out_events.push(Event::Whistle {
            reason: result.whistle,
            result,
        });
        out_events.push(Event::PhaseChanged {
            phase: PlayPhase::PostPlay,
        });
    }

    /// Computes the play outcome in the offense's frame.
    fn play_result(&self, reason: WhistleReason) -> PlayResult {
        let offense = self.play.offense();
        let start = self.play.start_field_position();
        let incomplete = reason == WhistleReason::Incomplete;
        let touchdown = reason == WhistleReason::Touchdown;

        let carrier_team = self
            .ball
            .owner()
            .and_then(|owner| self.entities.get(&owner))
            .map(|player| player.team);
        let turnover = match carrier_team {
            Some(team) if team != offense => {
                Some(self.play.turnover().unwrap_or(TurnoverKind::Fumble))
            }
            _ => None,
        };

        let raw = self
            .tuning
            .field
            .field_position(self.ball.position().x, offense.attacking());
        let safety = !incomplete && !touchdown && turnover.is_none() && raw <= 0.0;

        let end = if incomplete {
            start
        } else if touchdown {
            if turnover.is_some() {
                0
            } else {
                FIELD_LENGTH_YARDS
            }
        } else if safety {
            0
        } else if turnover.is_some() {
            (raw.round() as i32).clamp(1, FIELD_LENGTH_YARDS)
        } else {
            (raw.round() as i32).clamp(1, FIELD_LENGTH_YARDS - 1)
        };

        let yards_gained = if incomplete || turnover.is_some() {
            0
        } else {
            end - start
        };

        let scoring_team = if touchdown {
            carrier_team
        } else if safety {
            Some(offense.opponent())
        } else {
            None
        };

        PlayResult {
            yards_gained,
            start_field_position: start,
            end_field_position: end,
            whistle: if safety { WhistleReason::Safety } else { reason },
            turnover,
            touchdown,
            safety,
            incomplete,
            scoring_team,
        }
    }

    fn finish_play(&mut self, out_events: &mut Vec<Event>) {
        if self.play.phase() != PlayPhase::PostPlay || self.play_settled {
            return;
        }
        let Some(result) = self.play.result() else {
            return;
        };
        self.play_settled = true;

        self.match_state
            .apply_play(&result, &self.tuning.field, out_events);
        self.match_state
            .end_of_play(&self.tuning.clock, &self.tuning.field, out_events);
        info!(
            play = self.play.id(),
            yards = result.yards_gained,
            whistle = ?result.whistle,
            score_home = self.match_state.scores()[0],
            score_away = self.match_state.scores()[1],
            "play finished"
        );
    }

    fn between_plays(&self) -> bool {
        match self.play.phase() {
            PlayPhase::PreSnap => true,
            PlayPhase::PostPlay => self.play_settled,
            PlayPhase::InPlay => false,
        }
    }
}

fn report_stack_violation(entity: EntityId, err: BehaviorStackError) {
    error!(entity = entity.get(), %err, "behavior stack contract violated");
    debug_assert!(false, "behavior stack contract violated for {entity:?}: {err}");
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            match world.play.phase() {
                PlayPhase::InPlay => {
                    world.match_state.run_clock(dt);
                    world.play.run_live_clock(dt);
                    world.engagements.advance();
                }
                PlayPhase::PreSnap => {
                    if world.play.run_play_clock(dt) {
                        debug!(play = world.play.id(), "play clock expired");
                        out_events.push(Event::PlayClockExpired);
                    }
                }
                PlayPhase::PostPlay => {}
            }
        }
        Command::BeginPlay => world.begin_play(out_events),
        Command::SpawnPlayer {
            team,
            side,
            role,
            slot,
            ratings,
            position,
            human,
        } => world.spawn_player(
            slot,
            PlayerSpawn {
                team,
                side,
                role,
                ratings,
                position,
                human,
            },
            out_events,
        ),
        Command::AssignBehaviors { entity, behaviors } => {
            let Some(player) = world.entities.get_mut(&entity) else {
                return;
            };
            match BehaviorStack::from_frames(behaviors) {
                Some(stack) => player.stack = stack,
                None => error!(entity = entity.get(), "rejected empty behavior stack"),
            }
        }
        Command::Snap => world.snap(out_events),
        Command::Steer { entity, direction } => {
            if let Some(player) = world.entities.get_mut(&entity) {
                player.steering = direction;
            }
        }
        Command::MoveEntity {
            entity,
            velocity,
            position,
        } => world.move_entity(entity, velocity, position),
        Command::Engage { rusher, blocker } => world.engage(rusher, blocker, out_events),
        Command::ReleaseEngagement { engagement, winner } => {
            world.release(engagement, winner, out_events);
        }
        Command::UpdateBehavior { entity, behavior } => {
            if let Some(player) = world.entities.get_mut(&entity) {
                player.stack.replace_top(behavior);
            }
        }
        Command::TransitionBehavior { entity, result } => {
            if let Some(player) = world.entities.get_mut(&entity) {
                if let Err(err) = player.stack.apply(result) {
                    report_stack_violation(entity, err);
                }
            }
        }
        Command::ThrowBall {
            passer,
            receiver,
            target,
        } => world.throw(passer, receiver, target, out_events),
        Command::MoveBall {
            position,
            elapsed_ticks,
        } => {
            if world.is_live() && world.ball.state() == BallState::InAir {
                world.ball.advance(position, elapsed_ticks);
            }
        }
        Command::CatchBall { entity } => world.catch(entity, out_events),
        Command::BallLoose { position } => {
            if world.is_live() && world.ball.state() == BallState::InAir {
                world.ball.loose(position);
                world.ball_changed(out_events);
            }
        }
        Command::RecoverBall { entity } => world.recover(entity, out_events),
        Command::TackleCarrier { carrier, defender } => {
            world.tackle(carrier, defender, out_events);
        }
        Command::Whistle { reason } => world.whistle(reason, out_events),
        Command::Officiate => world.officiate(out_events),
        Command::FinishPlay => world.finish_play(out_events),
        Command::ExtraPoint { made } => {
            if world.between_plays() && world.match_state.awaiting_conversion() {
                world
                    .match_state
                    .extra_point(made, &world.tuning.field, out_events);
                world
                    .match_state
                    .end_of_play(&world.tuning.clock, &world.tuning.field, out_events);
            }
        }
        Command::FieldGoal { made } => {
            if world.between_plays()
                && !world.match_state.awaiting_conversion()
                && !world.match_state.game_over()
            {
                world.match_state.field_goal(
                    made,
                    &world.tuning.kick,
                    &world.tuning.field,
                    out_events,
                );
                world
                    .match_state
                    .end_of_play(&world.tuning.clock, &world.tuning.field, out_events);
            }
        }
        Command::ApplyPenalty { kind } => {
            if world.play.phase() == PlayPhase::PreSnap {
                let yards = match kind {
                    PenaltyKind::DelayOfGame => world.tuning.field.delay_of_game_yards,
                };
                world.match_state.penalize(kind, yards, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridiron_core::{
        BallSnapshot, EngagementView, EntityId, EntityView, SimTuning,
    };

    use super::{MatchState, PlayState, World};

    /// Captures a read-only view of every player on the field.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView::from_snapshots(
            world
                .entities
                .values()
                .map(|player| {
                    player.snapshot(
                        world.tick_index,
                        world.engagements.engagement_of(player.id),
                    )
                })
                .collect(),
        )
    }

    /// Captures the ball state.
    #[must_use]
    pub fn ball(world: &World) -> BallSnapshot {
        world.ball.snapshot()
    }

    /// Current ball carrier, if the ball is held.
    #[must_use]
    pub fn carrier(world: &World) -> Option<EntityId> {
        world.ball.owner()
    }

    /// Captures every active grapple.
    #[must_use]
    pub fn engagement_view(world: &World) -> EngagementView {
        EngagementView::from_snapshots(world.engagements.snapshots())
    }

    /// Opponent locked with the provided entity, if any.
    #[must_use]
    pub fn engagement_partner(world: &World, entity: EntityId) -> Option<EntityId> {
        world.engagements.partner_of(entity)
    }

    /// Match-level state.
    #[must_use]
    pub fn match_state(world: &World) -> &MatchState {
        &world.match_state
    }

    /// State of the current play.
    #[must_use]
    pub fn play_state(world: &World) -> &PlayState {
        &world.play
    }

    /// Tuning the world was created with.
    #[must_use]
    pub fn tuning(world: &World) -> &SimTuning {
        &world.tuning
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
