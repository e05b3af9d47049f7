#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step driver that runs a full match.
//!
//! Each tick advances the world clock and then runs the systems in a fixed
//! order: movement, collision, engagement, behavior, tackle, ball and
//! officiating, the between-play driver, the loop machines and finally
//! control selection. Every system reads views re-queried from the world
//! after the previous one's commands were applied, and all randomness
//! comes from a single seeded generator, so a seed and an input sequence
//! always reproduce the same match.

mod play_caller;
mod spawn;
mod summary;
mod timestep;

use std::collections::BTreeMap;
use std::time::Duration;

use gridiron_core::{
    Command, ConfigError, ControlState, EntityId, Event, HumanInput, LoopState, OnFieldState,
    PenaltyKind, PlayPhase, Playbook, Role, SimTuning, SpawnedPlayer, TeamIndex, TICK_DURATION,
};
use gridiron_system_ball::Ball;
use gridiron_system_behavior::{BehaviorContext, Behaviors};
use gridiron_system_collision::Collision;
use gridiron_system_control::{ControlContext, ControlSelector};
use gridiron_system_engagement::{Engagement, GrappleContext};
use gridiron_system_loop_machines::LoopMachines;
use gridiron_system_movement::Movement;
use gridiron_system_tackle::Tackle;
use gridiron_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, error, info};

pub use play_caller::{PlayCall, PlayCaller};
pub use summary::{PlayerLine, Stats, Summary};
pub use timestep::{FixedTimestep, MAX_BACKLOG, MAX_TICKS_PER_FRAME};

use crate::spawn::{PlannedPlayer, Scrimmage};

/// Errors raised while setting up a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The playbook failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Options fixed for the lifetime of a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Seed of the single random generator.
    pub seed: u64,
    /// Team whose players accept human input, if any.
    pub human_team: Option<TeamIndex>,
    /// Team receiving the opening kickoff.
    pub receiving_team: TeamIndex,
    /// Ignores human input entirely when set.
    pub headless: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            human_team: None,
            receiving_team: TeamIndex::HOME,
            headless: true,
        }
    }
}

/// A match in progress together with every system that drives it.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    playbook: Playbook,
    tuning: SimTuning,
    world: World,
    rng: ChaCha8Rng,
    timestep: FixedTimestep,
    play_caller: PlayCaller,
    movement: Movement,
    collision: Collision,
    engagement: Engagement,
    behaviors: Behaviors,
    tackle: Tackle,
    ball: Ball,
    loops: LoopMachines,
    control: ControlSelector,
    roster: Vec<SpawnedPlayer>,
    stats: Stats,
    events: Vec<Event>,
}

impl Simulation {
    /// Validates the playbook, then lines up the opening play.
    ///
    /// Every offensive play is checked against every defensive play so a
    /// bad reference fails here rather than mid-match.
    pub fn new(
        config: SimulationConfig,
        playbook: Playbook,
        tuning: SimTuning,
    ) -> Result<Self, SimulationError> {
        playbook.validate()?;
        for offense in &playbook.offense {
            for defense in &playbook.defense {
                let _ = spawn::check_pairing(&playbook, offense, defense)?;
            }
        }

        let world = World::new(tuning.clone(), config.receiving_team);
        let mut simulation = Self {
            config,
            playbook,
            tuning,
            world,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            timestep: FixedTimestep::default(),
            play_caller: PlayCaller,
            movement: Movement,
            collision: Collision,
            engagement: Engagement,
            behaviors: Behaviors,
            tackle: Tackle,
            ball: Ball,
            loops: LoopMachines::new(),
            control: ControlSelector::new(),
            roster: Vec::new(),
            stats: Stats::default(),
            events: Vec::new(),
        };
        let mut events = Vec::new();
        simulation.start_play(&mut events)?;
        simulation.record(events);

        info!(
            seed = config.seed,
            human_team = ?config.human_team.map(|team| team.get()),
            receiving = config.receiving_team.get(),
            headless = config.headless,
            "simulation ready"
        );
        Ok(simulation)
    }

    /// Clears the field and lines up `offense` against `defense` at the
    /// current ball spot, returning the spawned players in id order.
    ///
    /// Nothing is applied when a play name, slot or coverage target does
    /// not resolve.
    pub fn spawn_play(
        &mut self,
        offense: &str,
        defense: &str,
    ) -> Result<Vec<SpawnedPlayer>, ConfigError> {
        let mut events = Vec::new();
        let spawned = self.line_up(offense, defense, &mut events);
        self.record(events);
        spawned
    }

    fn line_up(
        &mut self,
        offense: &str,
        defense: &str,
        events: &mut Vec<Event>,
    ) -> Result<Vec<SpawnedPlayer>, ConfigError> {
        let match_state = query::match_state(&self.world);
        if match_state.game_over() {
            return Ok(Vec::new());
        }
        let scrimmage = Scrimmage {
            offense: match_state.possession(),
            line_x: self.tuning.field.x_for(
                match_state.field_position() as f32,
                match_state.possession().attacking(),
            ),
        };
        let lineup = spawn::line_up(
            &self.playbook,
            self.playbook.offensive_play(offense)?,
            self.playbook.defensive_play(defense)?,
            scrimmage,
            &self.tuning,
        )?;

        world::apply(&mut self.world, Command::BeginPlay, events);

        let mut placed: Vec<(&PlannedPlayer, EntityId)> = Vec::with_capacity(lineup.len());
        for player in &lineup {
            let start = events.len();
            world::apply(
                &mut self.world,
                Command::SpawnPlayer {
                    team: player.team,
                    side: player.side,
                    role: player.role,
                    slot: player.slot.clone(),
                    ratings: player.ratings,
                    position: player.position,
                    human: self.config.human_team == Some(player.team),
                },
                events,
            );
            let spawned = events[start..].iter().find_map(|event| match event {
                Event::PlayerSpawned { entity, .. } => Some(*entity),
                _ => None,
            });
            if let Some(entity) = spawned {
                placed.push((player, entity));
            }
        }

        let offense_ids: BTreeMap<String, EntityId> = placed
            .iter()
            .filter(|(player, _)| player.team == scrimmage.offense)
            .map(|(player, entity)| (player.slot.clone(), *entity))
            .collect();
        for (player, entity) in &placed {
            let behaviors = spawn::behaviors(
                player,
                &offense_ids,
                scrimmage.offense.attacking(),
                &self.tuning,
            );
            world::apply(
                &mut self.world,
                Command::AssignBehaviors {
                    entity: *entity,
                    behaviors,
                },
                events,
            );
        }

        let spawned: Vec<SpawnedPlayer> = placed
            .iter()
            .map(|(player, entity)| SpawnedPlayer {
                entity: *entity,
                team: player.team,
                side: player.side,
                role: player.role,
                slot: player.slot.clone(),
            })
            .collect();
        debug!(offense, defense, players = spawned.len(), "lined up");
        self.roster = spawned.clone();
        Ok(spawned)
    }

    /// Runs one fixed tick with the provided input.
    ///
    /// Does nothing once the match is over.
    pub fn tick(&mut self, input: &HumanInput) {
        if self.finished() {
            return;
        }

        let input = if self.config.headless {
            HumanInput::default()
        } else {
            *input
        };
        let previous = self.loops.state();
        let on_field = previous.on_field.state;
        let dt = TICK_DURATION;
        let mut events = Vec::new();
        let mut commands = Vec::new();

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let controlled = if self.config.headless {
            None
        } else {
            self.control.current().controlled
        };
        if on_field == OnFieldState::LivePlay {
            if let Some(entity) = controlled {
                world::apply(
                    &mut self.world,
                    Command::Steer {
                        entity,
                        direction: input.direction.normalize_or_zero(),
                    },
                    &mut events,
                );
            }
        }

        self.movement.handle(
            on_field,
            &query::entity_view(&self.world),
            &self.tuning.movement,
            &mut commands,
        );
        self.submit(&mut commands, &mut events);

        if on_field == OnFieldState::LivePlay {
            self.run_live_systems(controlled, &mut commands, &mut events);
        }

        self.drive(previous, &input, &mut events);

        let game_over = query::match_state(&self.world).game_over();
        let loop_state = self.loops.observe(
            query::play_state(&self.world).phase(),
            game_over,
            dt,
        );
        let ball = query::ball(&self.world);
        self.control.handle(
            &query::entity_view(&self.world),
            &ControlContext {
                on_field: loop_state.on_field.state,
                offense: query::play_state(&self.world).offense(),
                human_team: self.config.human_team,
                ball: &ball,
                cycle: input.cycle,
            },
        );

        self.record(events);
    }

    /// Converts `elapsed` wall time into fixed ticks and runs them.
    ///
    /// Edge-triggered inputs apply to the first tick only. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, elapsed: Duration, input: &HumanInput) -> u32 {
        let ticks = self.timestep.accumulate(elapsed);
        let held = HumanInput {
            direction: input.direction,
            ..HumanInput::default()
        };
        for index in 0..ticks {
            self.tick(if index == 0 { input } else { &held });
        }
        ticks
    }

    /// Takes the domain events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Reports whether the final quarter has ended.
    #[must_use]
    pub fn finished(&self) -> bool {
        query::match_state(&self.world).game_over()
    }

    /// Read access to the authoritative world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Current loop machine snapshot.
    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        self.loops.state()
    }

    /// Entity currently receiving human input.
    #[must_use]
    pub const fn control(&self) -> ControlState {
        self.control.current()
    }

    /// Players spawned for the current play.
    #[must_use]
    pub fn roster(&self) -> &[SpawnedPlayer] {
        &self.roster
    }

    /// Totals accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Deterministic snapshot of the match.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let match_state = query::match_state(&self.world);
        let slots: BTreeMap<EntityId, &str> = self
            .roster
            .iter()
            .map(|player| (player.entity, player.slot.as_str()))
            .collect();
        let players = query::entity_view(&self.world)
            .iter()
            .map(|entity| PlayerLine {
                id: entity.id,
                team: entity.team,
                role: entity.role,
                slot: slots.get(&entity.id).copied().unwrap_or_default().to_owned(),
                position: entity.position,
                behavior: entity.behavior.label(),
            })
            .collect();

        Summary {
            ticks: query::tick_index(&self.world),
            teams: [
                self.playbook.rosters[0].name.clone(),
                self.playbook.rosters[1].name.clone(),
            ],
            scores: match_state.scores(),
            quarter: match_state.quarter(),
            clock_remaining: match_state.clock_remaining(),
            possession: match_state.possession(),
            down: match_state.down(),
            yards_to_go: match_state.yards_to_go(),
            spot: match_state.ball_spot(),
            on_field: OnFieldState::from_phase(query::play_state(&self.world).phase()),
            game_over: match_state.game_over(),
            stats: self.stats,
            players,
        }
    }

    fn run_live_systems(
        &mut self,
        controlled: Option<EntityId>,
        commands: &mut Vec<Command>,
        events: &mut Vec<Event>,
    ) {
        let mut contacts = Vec::new();
        self.collision.handle(
            &query::entity_view(&self.world),
            &query::ball(&self.world),
            &self.tuning.contact,
            &mut contacts,
        );

        let engagements = query::engagement_view(&self.world);
        let entities = query::entity_view(&self.world);
        self.engagement.handle(
            &GrappleContext {
                engagements: &engagements,
                entities: &entities,
                contacts: &contacts,
                tuning: &self.tuning.grapple,
                dt: TICK_DURATION,
            },
            &mut self.rng,
            commands,
        );
        self.submit(commands, events);

        let ball = query::ball(&self.world);
        self.behaviors.handle(
            &query::entity_view(&self.world),
            &BehaviorContext {
                on_field: OnFieldState::LivePlay,
                ball: &ball,
                offense: query::play_state(&self.world).offense(),
                controlled,
                tuning: &self.tuning,
            },
            commands,
        );
        self.submit(commands, events);

        self.tackle.handle(
            &query::entity_view(&self.world),
            &query::ball(&self.world),
            &contacts,
            &self.tuning.tackle,
            &mut self.rng,
            commands,
        );
        self.submit(commands, events);

        self.ball.handle(&query::ball(&self.world), &contacts, commands);
        self.submit(commands, events);

        world::apply(&mut self.world, Command::Officiate, events);
    }

    /// Snaps, settles finished plays, runs kicks and enforces the play clock.
    fn drive(&mut self, previous: LoopState, input: &HumanInput, events: &mut Vec<Event>) {
        if events
            .iter()
            .any(|event| matches!(event, Event::PlayClockExpired))
        {
            world::apply(
                &mut self.world,
                Command::ApplyPenalty {
                    kind: PenaltyKind::DelayOfGame,
                },
                events,
            );
            self.restart_play(events);
            return;
        }

        let play = query::play_state(&self.world);
        let dwell = previous.on_field.ticks_in_state;
        match play.phase() {
            PlayPhase::PreSnap => {
                let human_offense =
                    !self.config.headless && self.config.human_team == Some(play.offense());
                let snap = if human_offense {
                    input.snap
                } else {
                    previous.on_field.state == OnFieldState::PreSnap
                        && dwell >= self.tuning.clock.snap_delay_ticks
                };
                if snap {
                    world::apply(&mut self.world, Command::Snap, events);
                }
            }
            PlayPhase::InPlay => {}
            PlayPhase::PostPlay => {
                if previous.on_field.state == OnFieldState::PostPlay
                    && dwell >= self.tuning.clock.post_play_ticks
                {
                    self.next_play(events);
                }
            }
        }
    }

    fn next_play(&mut self, events: &mut Vec<Event>) {
        world::apply(&mut self.world, Command::FinishPlay, events);

        let match_state = query::match_state(&self.world);
        if match_state.awaiting_conversion() {
            let team = match_state.possession();
            let made = self.roll_kick(team, self.tuning.kick.extra_point_distance);
            debug!(team = team.get(), made, "extra point");
            world::apply(&mut self.world, Command::ExtraPoint { made }, events);
        }
        if self.finished() {
            return;
        }

        let match_state = query::match_state(&self.world);
        if self
            .play_caller
            .attempts_field_goal(match_state, &self.tuning.kick)
        {
            let team = match_state.possession();
            let distance = self.tuning.kick.field_goal_distance(match_state.field_position());
            let made = self.roll_kick(team, distance);
            debug!(team = team.get(), distance, made, "field goal");
            world::apply(&mut self.world, Command::FieldGoal { made }, events);
            if self.finished() {
                return;
            }
        }

        self.restart_play(events);
    }

    fn restart_play(&mut self, events: &mut Vec<Event>) {
        if let Err(err) = self.start_play(events) {
            error!(%err, "could not line up the next play");
        }
    }

    fn start_play(&mut self, events: &mut Vec<Event>) -> Result<(), ConfigError> {
        let play_count = query::match_state(&self.world).play_count();
        let call = self
            .play_caller
            .call(&self.playbook, play_count)
            .ok_or(ConfigError::EmptyPlaybook("offensive"))?;
        debug!(offense = %call.offense, defense = %call.defense, play_count, "play call");
        let _ = self.line_up(&call.offense, &call.defense, events)?;
        Ok(())
    }

    fn roll_kick(&mut self, team: TeamIndex, distance: i32) -> bool {
        let kick_power = self.playbook.rosters[team.index()]
            .ratings_for(Role::K)
            .kick_power;
        let chance = self.tuning.kick.success_chance(kick_power, distance);
        self.rng.gen::<f32>() < chance
    }

    fn submit(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn record(&mut self, events: Vec<Event>) {
        for event in events {
            if matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }
            self.stats.observe(&event);
            if let Event::GameOver { scores } = &event {
                info!(home = scores[0], away = scores[1], "game over");
            }
            self.events.push(event);
        }
    }
}
