//! Tuning surface for every rating-driven formula and timing constant.
//!
//! The historical probability constants are approximations, so every knob is
//! exposed here and deserialised with defaults at every level. A partial
//! TOML override only needs to name the values it changes.

use std::time::Duration;

use serde::Deserialize;

use crate::{FieldDirection, Vec2, FIELD_LENGTH_YARDS};

/// Aggregated tuning knobs controlling the whole simulation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Speed and acceleration mapping from ratings.
    pub movement: MovementTuning,
    /// Distances used by the discrete proximity checks.
    pub contact: ContactTuning,
    /// Blocker versus rusher grapple resolution.
    pub grapple: GrappleTuning,
    /// Tackle attempt resolution.
    pub tackle: TackleTuning,
    /// Open-field running by the ball carrier.
    pub carrier: CarrierTuning,
    /// Forward pass flight model.
    pub ball: BallTuning,
    /// Game clock, play clock and phase dwell times.
    pub clock: ClockTuning,
    /// Field geometry and spotting rules.
    pub field: FieldTuning,
    /// Extra point and field goal resolution.
    pub kick: KickTuning,
}

/// Linear rating-to-speed mapping for the non-momentum movement model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Max speed rating that maps to `speed_at_floor`.
    pub rating_floor: f32,
    /// Max speed rating that maps to `speed_at_ceiling`.
    pub rating_ceiling: f32,
    /// Units per tick reached by a `rating_floor` player.
    pub speed_at_floor: f32,
    /// Units per tick reached by a `rating_ceiling` player.
    pub speed_at_ceiling: f32,
    /// Fraction of the gap to top speed closed each tick at running speed 0.
    pub acceleration_min: f32,
    /// Fraction of the gap to top speed closed each tick at running speed 100.
    pub acceleration_max: f32,
    /// Distance at which a steering target counts as reached.
    pub arrival_radius: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            rating_floor: 45.0,
            rating_ceiling: 100.0,
            speed_at_floor: 3.0,
            speed_at_ceiling: 6.5,
            acceleration_min: 0.18,
            acceleration_max: 0.35,
            arrival_radius: 6.0,
        }
    }
}

impl MovementTuning {
    /// Top speed in units per tick for the provided max speed rating.
    ///
    /// The mapping is linear through both anchor points and never negative.
    #[must_use]
    pub fn max_speed(&self, max_speed_rating: u8) -> f32 {
        let span = self.rating_ceiling - self.rating_floor;
        if span.abs() <= f32::EPSILON {
            return self.speed_at_floor.max(0.0);
        }

        let slope = (self.speed_at_ceiling - self.speed_at_floor) / span;
        let speed = self.speed_at_floor + (f32::from(max_speed_rating) - self.rating_floor) * slope;
        speed.max(0.0)
    }

    /// Per-tick interpolation fraction for the provided running speed rating.
    #[must_use]
    pub fn acceleration(&self, running_speed_rating: u8) -> f32 {
        let fraction = f32::from(running_speed_rating.min(100)) / 100.0;
        let span = self.acceleration_max - self.acceleration_min;
        let value = self.acceleration_min + span * fraction;
        value.clamp(0.0, 1.0)
    }
}

/// Distances used by the collision and pursuit logic.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContactTuning {
    /// Two entities closer than this are in contact.
    pub collision_range: f32,
    /// Pursuers inside this distance of the carrier commit to a tackle attempt.
    pub tackle_range: f32,
    /// Blockers look for rushers within this many yards of their anchor.
    pub block_radius_yards: f32,
}

impl Default for ContactTuning {
    fn default() -> Self {
        Self {
            collision_range: 8.0,
            tackle_range: 16.0,
            block_radius_yards: 3.0,
        }
    }
}

/// Grapple win curve: `base + (HP_attacker - HP_defender) * k`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrappleTuning {
    /// Win chance for evenly matched hitting power.
    pub base_win_chance: f32,
    /// Win chance gained per point of hitting power advantage.
    pub hitting_power_factor: f32,
    /// Ticks after which an unresolved grapple ends with the blocker holding.
    pub max_duration_ticks: u32,
    /// Ticks a beaten blocker must wait before engaging again.
    pub shed_cooldown_ticks: u32,
}

impl Default for GrappleTuning {
    fn default() -> Self {
        Self {
            base_win_chance: 0.5,
            hitting_power_factor: 0.004,
            max_duration_ticks: 90,
            shed_cooldown_ticks: 30,
        }
    }
}

impl GrappleTuning {
    /// Win chance for the rushing side, clamped to `[0, 1]`.
    #[must_use]
    pub fn win_chance(&self, attacker_hitting_power: u8, defender_hitting_power: u8) -> f32 {
        let advantage = f32::from(attacker_hitting_power) - f32::from(defender_hitting_power);
        (self.base_win_chance + advantage * self.hitting_power_factor).clamp(0.0, 1.0)
    }
}

/// Tackle curve: `base + (HP_defender - HP_carrier) * k1 - MS_carrier * k2`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TackleTuning {
    /// Success chance before rating adjustments.
    pub base_success: f32,
    /// Chance gained per point of hitting power advantage over the carrier.
    pub hitting_power_factor: f32,
    /// Chance lost per point of the carrier's max speed rating.
    pub max_speed_factor: f32,
    /// Ticks a pursuer waits before committing to another attempt.
    pub retry_cooldown_ticks: u32,
}

impl Default for TackleTuning {
    fn default() -> Self {
        Self {
            base_success: 0.7,
            hitting_power_factor: 0.005,
            max_speed_factor: 0.01,
            retry_cooldown_ticks: 20,
        }
    }
}

impl TackleTuning {
    /// Success chance for a single tackle attempt, clamped to `[0, 1]`.
    #[must_use]
    pub fn success_chance(
        &self,
        defender_hitting_power: u8,
        carrier_hitting_power: u8,
        carrier_max_speed: u8,
    ) -> f32 {
        let advantage = f32::from(defender_hitting_power) - f32::from(carrier_hitting_power);
        let chance = self.base_success + advantage * self.hitting_power_factor
            - f32::from(carrier_max_speed) * self.max_speed_factor;
        chance.clamp(0.0, 1.0)
    }
}

/// Ball carrier cuts away from defenders and sidelines.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarrierTuning {
    /// Lateral weight of a cut relative to the run toward the goal line.
    pub jink_weight: f32,
    /// Yards within which an opponent ahead triggers a cut.
    pub jink_lookahead_yards: f32,
    /// Carriers this close to a sideline cut back toward the middle.
    pub sideline_margin_yards: f32,
}

impl Default for CarrierTuning {
    fn default() -> Self {
        Self {
            jink_weight: 0.6,
            jink_lookahead_yards: 5.0,
            sideline_margin_yards: 2.0,
        }
    }
}

/// Scalar progress model for balls in the air.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// Distance covered by a thrown ball each tick.
    pub pass_speed: f32,
    /// Shortest flight any pass may take.
    pub min_flight_ticks: u32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            pass_speed: 14.0,
            min_flight_ticks: 12,
        }
    }
}

impl BallTuning {
    /// Number of ticks a pass covering `distance` units stays in the air.
    #[must_use]
    pub fn flight_ticks(&self, distance: f32) -> u32 {
        if self.pass_speed <= f32::EPSILON {
            return self.min_flight_ticks.max(1);
        }
        let ticks = (distance / self.pass_speed).ceil();
        let ticks = if ticks.is_finite() && ticks > 0.0 {
            ticks as u32
        } else {
            0
        };
        ticks.max(self.min_flight_ticks).max(1)
    }
}

/// Clock lengths and phase dwell times.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    /// Length of each quarter in seconds of live play.
    pub quarter_seconds: u32,
    /// Number of quarters in a game.
    pub quarters: u8,
    /// Pre-snap play clock in seconds.
    pub play_clock_seconds: u32,
    /// Pre-snap ticks before a computer-controlled offense snaps.
    pub snap_delay_ticks: u64,
    /// Ticks spent in post-play before the next play is set up.
    pub post_play_ticks: u64,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            quarter_seconds: 300,
            quarters: 4,
            play_clock_seconds: 25,
            snap_delay_ticks: 60,
            post_play_ticks: 60,
        }
    }
}

impl ClockTuning {
    /// Full quarter length as a duration.
    #[must_use]
    pub const fn quarter_length(&self) -> Duration {
        Duration::from_secs(self.quarter_seconds as u64)
    }

    /// Full play clock as a duration.
    #[must_use]
    pub const fn play_clock(&self) -> Duration {
        Duration::from_secs(self.play_clock_seconds as u64)
    }
}

/// Field geometry in virtual units plus spotting rules.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    /// Virtual units per yard.
    pub units_per_yard: f32,
    /// Sideline to sideline width in yards.
    pub width_yards: f32,
    /// Own yard line where drives begin after kickoffs and safeties.
    pub drive_start_yard: i32,
    /// Own yard line where drives begin after a touchback.
    pub touchback_yard: i32,
    /// Yards needed for a first down.
    pub first_down_distance: i32,
    /// Yards assessed for delay of game.
    pub delay_of_game_yards: i32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            units_per_yard: 24.0,
            width_yards: 53.3,
            drive_start_yard: 25,
            touchback_yard: 20,
            first_down_distance: 10,
            delay_of_game_yards: 5,
        }
    }
}

impl FieldTuning {
    /// Converts a length in yards into virtual units.
    #[must_use]
    pub fn yards(&self, yards: f32) -> f32 {
        yards * self.units_per_yard
    }

    /// Field position (yards from own goal) of an x coordinate for a team
    /// attacking in `direction`. Values outside `0..=100` lie in an end zone.
    #[must_use]
    pub fn field_position(&self, x: f32, direction: FieldDirection) -> f32 {
        let absolute = x / self.units_per_yard;
        match direction {
            FieldDirection::Right => absolute,
            FieldDirection::Left => FIELD_LENGTH_YARDS as f32 - absolute,
        }
    }

    /// X coordinate of a field position for a team attacking in `direction`.
    #[must_use]
    pub fn x_for(&self, field_position: f32, direction: FieldDirection) -> f32 {
        let absolute = match direction {
            FieldDirection::Right => field_position,
            FieldDirection::Left => FIELD_LENGTH_YARDS as f32 - field_position,
        };
        absolute * self.units_per_yard
    }

    /// Y coordinate of the middle of the field.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.width_yards * self.units_per_yard / 2.0
    }

    /// Reports whether the point lies between the sidelines.
    #[must_use]
    pub fn in_bounds(&self, point: Vec2) -> bool {
        point.y >= 0.0 && point.y <= self.width_yards * self.units_per_yard
    }
}

/// Kick success curve: `base - distance * k_d + (KP - 50) * k_p`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KickTuning {
    /// Success chance of a zero-yard kick by an average kicker.
    pub base_success: f32,
    /// Chance lost per yard of kick distance.
    pub distance_factor: f32,
    /// Chance gained per kick power point above 50.
    pub kick_power_factor: f32,
    /// Kick distance of an extra point in yards.
    pub extra_point_distance: i32,
    /// Yards added to the line of scrimmage distance for the hold and end zone.
    pub field_goal_offset: i32,
    /// Longest field goal the play caller attempts.
    pub field_goal_max_distance: i32,
}

impl Default for KickTuning {
    fn default() -> Self {
        Self {
            base_success: 0.95,
            distance_factor: 0.012,
            kick_power_factor: 0.004,
            extra_point_distance: 20,
            field_goal_offset: 17,
            field_goal_max_distance: 55,
        }
    }
}

impl KickTuning {
    /// Success chance for a kick of `distance_yards`, clamped to `[0, 1]`.
    #[must_use]
    pub fn success_chance(&self, kick_power: u8, distance_yards: i32) -> f32 {
        let chance = self.base_success - distance_yards as f32 * self.distance_factor
            + (f32::from(kick_power) - 50.0) * self.kick_power_factor;
        chance.clamp(0.0, 1.0)
    }

    /// Kick distance of a field goal attempted from `field_position`.
    #[must_use]
    pub const fn field_goal_distance(&self, field_position: i32) -> i32 {
        FIELD_LENGTH_YARDS - field_position + self.field_goal_offset
    }
}
