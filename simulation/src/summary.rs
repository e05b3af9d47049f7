//! End-of-run report.

use std::fmt;
use std::time::Duration;

use gridiron_core::{BallSpot, EntityId, Event, OnFieldState, Role, TeamIndex, Vec2};

/// Running totals accumulated from world events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Plays ended by a whistle.
    pub plays: u32,
    /// Passes thrown.
    pub pass_attempts: u32,
    /// Passes caught by the intended team.
    pub completions: u32,
    /// Passes caught by the defense.
    pub interceptions: u32,
    /// Successful tackles.
    pub tackles: u32,
    /// Touchdowns scored.
    pub touchdowns: u32,
    /// Field goals attempted.
    pub field_goal_attempts: u32,
    /// Field goals made.
    pub field_goals_made: u32,
    /// Penalties enforced.
    pub penalties: u32,
}

impl Stats {
    /// Folds one event into the totals.
    pub fn observe(&mut self, event: &Event) {
        match event {
            Event::Whistle { .. } => self.plays += 1,
            Event::PassThrown { .. } => self.pass_attempts += 1,
            Event::PassCaught { intercepted, .. } => {
                if *intercepted {
                    self.interceptions += 1;
                } else {
                    self.completions += 1;
                }
            }
            Event::Tackle { .. } => self.tackles += 1,
            Event::Touchdown { .. } => self.touchdowns += 1,
            Event::FieldGoal { made, .. } => {
                self.field_goal_attempts += 1;
                if *made {
                    self.field_goals_made += 1;
                }
            }
            Event::Penalty { .. } => self.penalties += 1,
            _ => {}
        }
    }
}

/// One player line of the summary.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerLine {
    /// Player identifier for the current play.
    pub id: EntityId,
    /// Owning team.
    pub team: TeamIndex,
    /// Position role.
    pub role: Role,
    /// Formation slot.
    pub slot: String,
    /// Field position in world units.
    pub position: Vec2,
    /// Behavior on top of the stack.
    pub behavior: &'static str,
}

/// Deterministic snapshot of a run, printed by the command line adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    /// Ticks simulated.
    pub ticks: u64,
    /// Team names indexed by team.
    pub teams: [String; 2],
    /// Scores indexed by team.
    pub scores: [u16; 2],
    /// Quarter in progress.
    pub quarter: u8,
    /// Game clock left in the quarter.
    pub clock_remaining: Duration,
    /// Team on offense.
    pub possession: TeamIndex,
    /// Current down.
    pub down: u8,
    /// Yards needed for a first down.
    pub yards_to_go: i32,
    /// Spot of the next snap.
    pub spot: BallSpot,
    /// On-field loop state.
    pub on_field: OnFieldState,
    /// Whether the final quarter has ended.
    pub game_over: bool,
    /// Accumulated totals.
    pub stats: Stats,
    /// Players on the field in id order.
    pub players: Vec<PlayerLine>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [home, away] = &self.teams;
        writeln!(f, "ticks: {}", self.ticks)?;
        writeln!(
            f,
            "score: {home} {} - {} {away}",
            self.scores[0], self.scores[1]
        )?;
        if self.game_over {
            writeln!(f, "final")?;
        } else {
            let seconds = self.clock_remaining.as_secs();
            writeln!(
                f,
                "quarter: {} clock {:02}:{:02}",
                self.quarter,
                seconds / 60,
                seconds % 60
            )?;
        }
        writeln!(
            f,
            "possession: {}, {} & {} at {} {}",
            self.teams[self.possession.index()],
            ordinal(self.down),
            self.yards_to_go,
            self.teams[self.spot.territory.index()],
            self.spot.yard_line
        )?;
        writeln!(f, "phase: {}", self.on_field.id())?;

        let stats = &self.stats;
        writeln!(
            f,
            "stats: plays {}, passes {}/{}, interceptions {}, tackles {}, \
             touchdowns {}, field goals {}/{}, penalties {}",
            stats.plays,
            stats.completions,
            stats.pass_attempts,
            stats.interceptions,
            stats.tackles,
            stats.touchdowns,
            stats.field_goals_made,
            stats.field_goal_attempts,
            stats.penalties
        )?;

        writeln!(f, "players:")?;
        for player in &self.players {
            writeln!(
                f,
                "  #{:<2} {:<4} {:<3} {:<4} ({:.2}, {:.2}) {}",
                player.id.get(),
                if player.team == TeamIndex::HOME { "home" } else { "away" },
                player.role.code(),
                player.slot,
                player.position.x,
                player.position.y,
                player.behavior
            )?;
        }
        Ok(())
    }
}

fn ordinal(down: u8) -> &'static str {
    match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        _ => "4th",
    }
}
