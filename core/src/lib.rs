#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridiron simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Drivers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values. Systems read
//! immutable snapshots such as [`EntityView`] and respond exclusively with
//! new command batches.

mod behavior;
mod playbook;
mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use behavior::{Behavior, BehaviorResult, BehaviorStack, BehaviorStackError};
pub use glam::Vec2;
pub use playbook::{
    Assignment, ConfigError, DefensivePlay, Formation, FormationSlot, OffensivePlay, Playbook,
    Roster, SlotPlacement,
};
pub use tuning::{
    BallTuning, CarrierTuning, ClockTuning, ContactTuning, FieldTuning, GrappleTuning,
    KickTuning, MovementTuning, SimTuning, TackleTuning,
};

/// Logical simulation rate.
pub const TICK_RATE_HZ: u32 = 60;

/// Logical time covered by a single tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Goal line to goal line distance in yards.
pub const FIELD_LENGTH_YARDS: i32 = 100;

/// Reserved identifier of the ball entity.
pub const BALL_ENTITY: EntityId = EntityId::new(0);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Clears the field and opens a new play at the current ball spot.
    BeginPlay,
    /// Spawns a player for the current play.
    SpawnPlayer {
        /// Team the player belongs to.
        team: TeamIndex,
        /// Whether the player lines up on offense or defense.
        side: Side,
        /// Position role.
        role: Role,
        /// Formation slot the player fills.
        slot: String,
        /// Rating bundle.
        ratings: PlayerRatings,
        /// Spawn position in field coordinates.
        position: Vec2,
        /// Whether the player belongs to the human-controlled team.
        human: bool,
    },
    /// Replaces a player's behavior stack, bottom frame first.
    AssignBehaviors {
        /// Player receiving the stack.
        entity: EntityId,
        /// Frames listed bottom first.
        behaviors: Vec<Behavior>,
    },
    /// Puts the ball in play.
    Snap,
    /// Sets the desired movement direction of a player.
    Steer {
        /// Player being steered.
        entity: EntityId,
        /// Unit vector or zero.
        direction: Vec2,
    },
    /// Stores the integrated kinematic state of a player.
    MoveEntity {
        /// Player that moved.
        entity: EntityId,
        /// Velocity for the tick.
        velocity: Vec2,
        /// Position after integration.
        position: Vec2,
    },
    /// Starts a grapple between a rusher and a blocker.
    Engage {
        /// Rushing player.
        rusher: EntityId,
        /// Blocking player.
        blocker: EntityId,
    },
    /// Ends a grapple.
    ReleaseEngagement {
        /// Engagement being resolved.
        engagement: EngagementId,
        /// Winner of the grapple, or `None` when it timed out.
        winner: Option<EntityId>,
    },
    /// Replaces the top behavior in place, keeping stack depth.
    UpdateBehavior {
        /// Player whose behavior state changed.
        entity: EntityId,
        /// Updated behavior.
        behavior: Behavior,
    },
    /// Applies a behavior transition to a player's stack.
    TransitionBehavior {
        /// Player whose stack transitions.
        entity: EntityId,
        /// Requested transition.
        result: BehaviorResult,
    },
    /// Throws the ball from its holder.
    ThrowBall {
        /// Player releasing the ball.
        passer: EntityId,
        /// Intended receiver.
        receiver: EntityId,
        /// Landing point.
        target: Vec2,
    },
    /// Advances a ball in flight.
    MoveBall {
        /// New ball position.
        position: Vec2,
        /// Flight ticks elapsed after the move.
        elapsed_ticks: u32,
    },
    /// Awards an airborne ball to the player contacting it.
    CatchBall {
        /// Player securing the catch.
        entity: EntityId,
    },
    /// Leaves an uncaught ball on the ground.
    BallLoose {
        /// Where the ball came to rest.
        position: Vec2,
    },
    /// Awards a loose ball to the player contacting it.
    RecoverBall {
        /// Player recovering the ball.
        entity: EntityId,
    },
    /// Brings the carrier down after a successful tackle roll.
    TackleCarrier {
        /// Ball carrier.
        carrier: EntityId,
        /// Tackling defender.
        defender: EntityId,
    },
    /// Ends the live play.
    Whistle {
        /// Reason the play ended.
        reason: WhistleReason,
    },
    /// Checks the carrier against goal lines and sidelines.
    Officiate,
    /// Applies the finished play to the match state.
    FinishPlay,
    /// Resolves a pending conversion after a touchdown.
    ExtraPoint {
        /// Whether the kick was good.
        made: bool,
    },
    /// Resolves a field goal attempt from the current spot.
    FieldGoal {
        /// Whether the kick was good.
        made: bool,
    },
    /// Enforces a pre-snap penalty against the offense.
    ApplyPenalty {
        /// Infraction being enforced.
        kind: PenaltyKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that simulation time advanced by the provided delta.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
    },
    /// A player was spawned for the current play.
    PlayerSpawned {
        /// Identifier assigned to the player.
        entity: EntityId,
        /// Team the player belongs to.
        team: TeamIndex,
        /// Offense or defense.
        side: Side,
        /// Position role.
        role: Role,
        /// Formation slot filled.
        slot: String,
    },
    /// The play phase changed.
    PhaseChanged {
        /// Phase that became active.
        phase: PlayPhase,
    },
    /// The ball was snapped to the provided holder.
    Snapped {
        /// Player receiving the snap.
        holder: EntityId,
    },
    /// A grapple began.
    EngagementStarted {
        /// Generation identifier of the engagement.
        engagement: EngagementId,
        /// Rushing player.
        rusher: EntityId,
        /// Blocking player.
        blocker: EntityId,
    },
    /// A grapple ended.
    EngagementResolved {
        /// Generation identifier of the engagement.
        engagement: EngagementId,
        /// Rushing player.
        rusher: EntityId,
        /// Blocking player.
        blocker: EntityId,
        /// Winner, or `None` when the grapple timed out.
        winner: Option<EntityId>,
    },
    /// Ball state and owner changed together.
    BallStateChanged {
        /// New ball state.
        state: BallState,
        /// New owner; set exactly when the state is held.
        owner: Option<EntityId>,
    },
    /// A pass left the passer's hand.
    PassThrown {
        /// Throwing player.
        passer: EntityId,
        /// Intended receiver.
        receiver: EntityId,
        /// Whether the pass travels beyond the line of scrimmage.
        forward: bool,
    },
    /// A pass was caught.
    PassCaught {
        /// Player who caught the ball.
        entity: EntityId,
        /// Whether the catch was made by the defense.
        intercepted: bool,
    },
    /// A carrier was tackled.
    Tackle {
        /// Ball carrier.
        carrier: EntityId,
        /// Tackling defender.
        defender: EntityId,
    },
    /// The whistle ended the live play.
    Whistle {
        /// Why the play ended.
        reason: WhistleReason,
        /// Outcome computed at the whistle.
        result: PlayResult,
    },
    /// The pre-snap play clock ran out.
    PlayClockExpired,
    /// A penalty was enforced.
    Penalty {
        /// Infraction.
        kind: PenaltyKind,
        /// Penalised team.
        team: TeamIndex,
        /// Yards assessed.
        yards: i32,
    },
    /// Possession moved to a new team.
    PossessionChanged {
        /// Team now on offense.
        team: TeamIndex,
        /// Spot of the next snap in the new offense's frame.
        field_position: i32,
    },
    /// Down and distance changed.
    DownChanged {
        /// Current down.
        down: u8,
        /// Yards needed for a first down.
        yards_to_go: i32,
        /// Spot of the next snap.
        field_position: i32,
    },
    /// Either team's score changed.
    ScoreChanged {
        /// Scores indexed by team.
        scores: [u16; 2],
    },
    /// A touchdown was scored.
    Touchdown {
        /// Scoring team.
        team: TeamIndex,
    },
    /// A safety was scored.
    Safety {
        /// Team credited with the two points.
        team: TeamIndex,
    },
    /// The ball changed hands outside a score or kick.
    Turnover {
        /// How the turnover happened.
        kind: TurnoverKind,
        /// Team gaining possession.
        team: TeamIndex,
    },
    /// A new quarter began.
    QuarterChanged {
        /// Quarter now in progress.
        quarter: u8,
    },
    /// The final quarter ended.
    GameOver {
        /// Final scores indexed by team.
        scores: [u16; 2],
    },
    /// A field goal attempt was resolved.
    FieldGoal {
        /// Kicking team.
        team: TeamIndex,
        /// Kick distance in yards.
        distance: i32,
        /// Whether the kick was good.
        made: bool,
    },
    /// A conversion attempt was resolved.
    ExtraPoint {
        /// Kicking team.
        team: TeamIndex,
        /// Whether the kick was good.
        made: bool,
    },
}

/// Unique identifier of a player or the ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Generation counter distinguishing successive engagements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngagementId(u32);

impl EngagementId {
    /// Creates a new engagement identifier with the provided generation.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the generation value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One of the two teams in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamIndex(u8);

impl TeamIndex {
    /// Team that attacks toward increasing x.
    pub const HOME: Self = Self(0);
    /// Team that attacks toward decreasing x.
    pub const AWAY: Self = Self(1);

    /// Creates a team index; only the lowest bit is kept.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value & 1)
    }

    /// Numeric value, either 0 or 1.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Index usable for per-team arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// The other team.
    #[must_use]
    pub const fn opponent(&self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Direction this team attacks for the whole match.
    #[must_use]
    pub const fn attacking(&self) -> FieldDirection {
        if self.0 == 0 {
            FieldDirection::Right
        } else {
            FieldDirection::Left
        }
    }
}

/// Whether a player lines up with the offense or the defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Team in possession.
    Offense,
    /// Team without the ball at the snap.
    Defense,
}

/// Direction of attack along the x axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldDirection {
    /// Toward increasing x.
    Right,
    /// Toward decreasing x.
    Left,
}

impl FieldDirection {
    /// Signed unit along x.
    #[must_use]
    pub const fn sign(&self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }

    /// Opposite direction.
    #[must_use]
    pub const fn flipped(&self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }

    /// Unit vector pointing in this direction.
    #[must_use]
    pub fn unit(&self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}

/// Position role of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Quarterback.
    Qb,
    /// Running back.
    Rb,
    /// Wide receiver.
    Wr,
    /// Tight end.
    Te,
    /// Offensive lineman.
    Ol,
    /// Defensive lineman.
    Dl,
    /// Linebacker.
    Lb,
    /// Defensive back.
    Db,
    /// Kicker.
    K,
    /// Punter.
    P,
}

impl Role {
    /// Every role in declaration order.
    pub const ALL: [Role; 10] = [
        Role::Qb,
        Role::Rb,
        Role::Wr,
        Role::Te,
        Role::Ol,
        Role::Dl,
        Role::Lb,
        Role::Db,
        Role::K,
        Role::P,
    ];

    /// Conventional upper-case abbreviation.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Qb => "QB",
            Self::Rb => "RB",
            Self::Wr => "WR",
            Self::Te => "TE",
            Self::Ol => "OL",
            Self::Dl => "DL",
            Self::Lb => "LB",
            Self::Db => "DB",
            Self::K => "K",
            Self::P => "P",
        }
    }
}

/// Rating bundle read by every resolution formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRatings {
    /// Hitting power; grapple and tackle strength.
    pub hitting_power: u8,
    /// Running speed; acceleration.
    pub running_speed: u8,
    /// Max speed; top speed and tackle breaking.
    pub max_speed: u8,
    /// Passing accuracy.
    pub pass_accuracy: u8,
    /// Receiving skill.
    pub receiving: u8,
    /// Kick power.
    pub kick_power: u8,
}

impl Default for PlayerRatings {
    fn default() -> Self {
        Self {
            hitting_power: 50,
            running_speed: 50,
            max_speed: 50,
            pass_accuracy: 50,
            receiving: 50,
            kick_power: 50,
        }
    }
}

/// Lifecycle of the ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BallState {
    /// Not in play.
    Dead,
    /// Possessed by exactly one player.
    Held,
    /// Travelling along a pass trajectory.
    InAir,
    /// On the ground and free to recover.
    Loose,
}

/// Scalar progress model of a ball in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallFlight {
    /// Player who threw the ball.
    pub passer: EntityId,
    /// Intended receiver.
    pub receiver: EntityId,
    /// Release point.
    pub origin: Vec2,
    /// Landing point.
    pub target: Vec2,
    /// Ticks travelled so far.
    pub elapsed_ticks: u32,
    /// Total ticks until landing.
    pub duration_ticks: u32,
    /// Whether the pass crosses the line of scrimmage.
    pub forward: bool,
}

impl BallFlight {
    /// Reports whether the ball reached its landing point.
    #[must_use]
    pub const fn landed(&self) -> bool {
        self.elapsed_ticks >= self.duration_ticks
    }

    /// Position after `elapsed_ticks` of travel.
    #[must_use]
    pub fn position_at(&self, elapsed_ticks: u32) -> Vec2 {
        if self.duration_ticks == 0 {
            return self.target;
        }
        let progress = (elapsed_ticks as f32 / self.duration_ticks as f32).clamp(0.0, 1.0);
        self.origin.lerp(self.target, progress)
    }
}

/// Immutable representation of the ball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallSnapshot {
    /// Current lifecycle state.
    pub state: BallState,
    /// Possessing player; set exactly when the state is held.
    pub owner: Option<EntityId>,
    /// Current position.
    pub position: Vec2,
    /// Flight record while the ball is in the air.
    pub flight: Option<BallFlight>,
}

/// Kinds of proximity contact the collision pass reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactKind {
    /// Ball carrier (`first`) against an opposing player (`second`).
    Tackle,
    /// Rusher (`first`) against a blocker (`second`).
    Block,
    /// Player (`first`) against the free ball (`second`).
    Ball,
}

/// Pair of entities closer than the collision range during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Relationship between the pair.
    pub kind: ContactKind,
    /// First member, see [`ContactKind`].
    pub first: EntityId,
    /// Second member, see [`ContactKind`].
    pub second: EntityId,
    /// Squared distance between the members.
    pub distance_sq: f32,
}

/// Immutable representation of a single player's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the player.
    pub id: EntityId,
    /// Owning team.
    pub team: TeamIndex,
    /// Offense or defense for this play.
    pub side: Side,
    /// Position role.
    pub role: Role,
    /// Whether the player belongs to the human team.
    pub human: bool,
    /// Rating bundle.
    pub ratings: PlayerRatings,
    /// Current position.
    pub position: Vec2,
    /// Velocity applied on the last tick.
    pub velocity: Vec2,
    /// Desired movement direction.
    pub steering: Vec2,
    /// Behavior on top of the stack.
    pub behavior: Behavior,
    /// Number of frames on the behavior stack.
    pub stack_depth: usize,
    /// Active engagement, if any.
    pub engagement: Option<EngagementId>,
    /// Whether the player may start a new engagement.
    pub can_engage: bool,
    /// Whether the player has been tackled.
    pub tackled: bool,
}

/// Read-only snapshot describing all players on the field.
#[derive(Clone, Debug, Default)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a new entity view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EntitySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Looks up a single player.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Iterator over the captured snapshots in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Number of players in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no players.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an active grapple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngagementSnapshot {
    /// Generation identifier.
    pub id: EngagementId,
    /// Rushing player.
    pub rusher: EntityId,
    /// Blocking player.
    pub blocker: EntityId,
    /// Live ticks the grapple has lasted.
    pub elapsed_ticks: u32,
}

/// Read-only snapshot of every active grapple.
#[derive(Clone, Debug, Default)]
pub struct EngagementView {
    snapshots: Vec<EngagementSnapshot>,
}

impl EngagementView {
    /// Creates a new engagement view ordered by generation.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EngagementSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the engagements in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &EngagementSnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether the entity takes part in any engagement.
    #[must_use]
    pub fn involves(&self, entity: EntityId) -> bool {
        self.snapshots
            .iter()
            .any(|snapshot| snapshot.rusher == entity || snapshot.blocker == entity)
    }
}

/// Phase of the current play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayPhase {
    /// Players lined up, waiting for the snap.
    PreSnap,
    /// Ball is live.
    InPlay,
    /// Whistle has blown.
    PostPlay,
}

/// Why a play ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WhistleReason {
    /// The play has not ended.
    None,
    /// The carrier was tackled.
    Tackle,
    /// The carrier left the field.
    OutOfBounds,
    /// The carrier crossed the attacked goal line.
    Touchdown,
    /// The offense was downed in its own end zone.
    Safety,
    /// A forward pass fell incomplete.
    Incomplete,
}

/// How possession changed hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnoverKind {
    /// Fourth down failed.
    Downs,
    /// Pass caught by the defense.
    Interception,
    /// Loose ball recovered by the defense.
    Fumble,
    /// Field goal attempt missed.
    MissedFieldGoal,
}

/// Pre-snap infractions the driver enforces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PenaltyKind {
    /// The play clock expired before the snap.
    DelayOfGame,
}

/// Outcome of a whistle, expressed in the offense's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayResult {
    /// Yards credited to the offense.
    pub yards_gained: i32,
    /// Field position at the snap.
    pub start_field_position: i32,
    /// Field position where the ball was downed.
    pub end_field_position: i32,
    /// Why the play ended.
    pub whistle: WhistleReason,
    /// Turnover committed during the play.
    pub turnover: Option<TurnoverKind>,
    /// Whether a touchdown was scored.
    pub touchdown: bool,
    /// Whether the offense was downed in its own end zone.
    pub safety: bool,
    /// Whether a forward pass fell incomplete.
    pub incomplete: bool,
    /// Team that scored on the play, if any.
    pub scoring_team: Option<TeamIndex>,
}

/// Ball spot expressed as territory and yard line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BallSpot {
    /// Team whose half contains the ball.
    pub territory: TeamIndex,
    /// Yard line between 0 and 50.
    pub yard_line: u8,
}

/// Singleton record of the entity receiving external input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Selected player, if any.
    pub controlled: Option<EntityId>,
    /// Human team being played.
    pub team: Option<TeamIndex>,
    /// Role of the selected player.
    pub debug_role: Option<Role>,
}

/// States of the overall game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameLoopState {
    /// Start-up before the first tick.
    Boot,
    /// Menu screens.
    Menu,
    /// A match is being played.
    OnField,
    /// Season management between matches.
    Season,
    /// The match has ended.
    GameOver,
}

impl GameLoopState {
    /// Stable state identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::Menu => "menu",
            Self::OnField => "on_field",
            Self::Season => "season",
            Self::GameOver => "game_over",
        }
    }
}

/// States of the on-field loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OnFieldState {
    /// Lined up before the snap.
    PreSnap,
    /// Ball is live.
    LivePlay,
    /// After the whistle.
    PostPlay,
}

impl OnFieldState {
    /// Stable state identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::PreSnap => "pre_snap",
            Self::LivePlay => "live_play",
            Self::PostPlay => "post_play",
        }
    }

    /// Projection of a play phase.
    #[must_use]
    pub const fn from_phase(phase: PlayPhase) -> Self {
        match phase {
            PlayPhase::PreSnap => Self::PreSnap,
            PlayPhase::InPlay => Self::LivePlay,
            PlayPhase::PostPlay => Self::PostPlay,
        }
    }
}

/// Observable state of one loop machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineSnapshot<S> {
    /// Current state.
    pub state: S,
    /// Ticks observed since the machine was created.
    pub tick_count: u64,
    /// Ticks spent in the current state.
    pub ticks_in_state: u64,
    /// Logical time spent in the current state.
    pub time_in_state: Duration,
}

/// Snapshot of both loop machines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopState {
    /// Overall game loop.
    pub game: MachineSnapshot<GameLoopState>,
    /// On-field play loop.
    pub on_field: MachineSnapshot<OnFieldState>,
}

/// Input sampled from the human player for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HumanInput {
    /// Desired movement direction, unit vector or zero.
    pub direction: Vec2,
    /// Cycle to the next eligible player.
    pub cycle: bool,
    /// Request the snap.
    pub snap: bool,
}

/// Player created by the spawn operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnedPlayer {
    /// Assigned identifier.
    pub entity: EntityId,
    /// Owning team.
    pub team: TeamIndex,
    /// Offense or defense.
    pub side: Side,
    /// Position role.
    pub role: Role,
    /// Formation slot filled.
    pub slot: String,
}
