//! Pre-parsed content records consumed by the spawn operation.
//!
//! Everything here is already validated structured data. Text formats are
//! decoded by the content loader before these records are built.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{PlayerRatings, Role};

/// Configuration failures surfaced before a play is spawned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A play referenced a formation that was never loaded.
    #[error("unknown formation `{0}`")]
    UnknownFormation(String),
    /// An offensive play name was not found.
    #[error("unknown offensive play `{0}`")]
    UnknownOffensivePlay(String),
    /// A defensive play name was not found.
    #[error("unknown defensive play `{0}`")]
    UnknownDefensivePlay(String),
    /// An assignment referenced a slot missing from its formation.
    #[error("play `{play}` references unknown slot `{slot}`")]
    UnknownSlot {
        /// Play carrying the bad reference.
        play: String,
        /// Slot name that could not be resolved.
        slot: String,
    },
    /// The playbook cannot run a single play.
    #[error("playbook has no {0} plays")]
    EmptyPlaybook(&'static str),
}

/// Structured spawn offset relative to the line of scrimmage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotPlacement {
    /// Yards back from the line of scrimmage into the slot's own side.
    pub depth_yards: f32,
    /// Yards from the middle of the field, positive toward increasing y.
    pub lateral_yards: f32,
}

/// Named position within a formation.
#[derive(Clone, Debug, PartialEq)]
pub struct FormationSlot {
    /// Unique slot name inside the formation.
    pub name: String,
    /// Position role of the player spawned here.
    pub role: Role,
    /// Initial position descriptor.
    pub placement: SlotPlacement,
}

/// Named set of slots describing where players line up.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    /// Formation name referenced by plays.
    pub name: String,
    /// Slots in spawn order.
    pub slots: Vec<FormationSlot>,
}

impl Formation {
    /// Looks up a slot by name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&FormationSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }
}

/// What a single slot does once the ball is snapped.
#[derive(Clone, Debug, PartialEq)]
pub enum Assignment {
    /// Stay in place.
    Hold,
    /// Protect the spawn point against rushers.
    Block,
    /// Run waypoints given as `(downfield, lateral)` yard offsets from spawn.
    Route {
        /// Offsets relative to the player's spawn position.
        waypoints: Vec<(f32, f32)>,
    },
    /// Drop back and throw.
    QuarterbackDrop {
        /// Ticks spent dropping back.
        drop_ticks: u32,
        /// Slot name of the primary receiver.
        primary: Option<String>,
    },
    /// Rush the passer.
    PassRush,
    /// Cover the named offensive slot.
    ManCoverage {
        /// Offensive slot name to cover.
        target: String,
        /// Cushion in yards.
        cushion_yards: f32,
    },
    /// Chase the ball from the snap.
    Pursue,
}

/// Offensive play call.
#[derive(Clone, Debug, PartialEq)]
pub struct OffensivePlay {
    /// Play name.
    pub name: String,
    /// Formation the play lines up in.
    pub formation: String,
    /// Assignments keyed by slot name. Missing slots hold.
    pub assignments: BTreeMap<String, Assignment>,
}

/// Defensive play call.
#[derive(Clone, Debug, PartialEq)]
pub struct DefensivePlay {
    /// Play name.
    pub name: String,
    /// Formation the play lines up in.
    pub formation: String,
    /// Assignments keyed by slot name. Missing slots hold.
    pub assignments: BTreeMap<String, Assignment>,
}

/// Per-role rating bundles for one team.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    /// Team name.
    pub name: String,
    /// Ratings by role; roles without an entry use average ratings.
    pub ratings: BTreeMap<Role, PlayerRatings>,
}

impl Roster {
    /// Ratings for the provided role.
    #[must_use]
    pub fn ratings_for(&self, role: Role) -> PlayerRatings {
        self.ratings.get(&role).copied().unwrap_or_default()
    }
}

/// Every formation, play and roster a match can use.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Playbook {
    /// Known formations.
    pub formations: Vec<Formation>,
    /// Offensive play list in calling order.
    pub offense: Vec<OffensivePlay>,
    /// Defensive play list in calling order.
    pub defense: Vec<DefensivePlay>,
    /// Rosters indexed by team.
    pub rosters: [Roster; 2],
}

impl Playbook {
    /// Resolves a formation by name.
    pub fn formation(&self, name: &str) -> Result<&Formation, ConfigError> {
        self.formations
            .iter()
            .find(|formation| formation.name == name)
            .ok_or_else(|| ConfigError::UnknownFormation(name.to_owned()))
    }

    /// Resolves an offensive play by name.
    pub fn offensive_play(&self, name: &str) -> Result<&OffensivePlay, ConfigError> {
        self.offense
            .iter()
            .find(|play| play.name == name)
            .ok_or_else(|| ConfigError::UnknownOffensivePlay(name.to_owned()))
    }

    /// Resolves a defensive play by name.
    pub fn defensive_play(&self, name: &str) -> Result<&DefensivePlay, ConfigError> {
        self.defense
            .iter()
            .find(|play| play.name == name)
            .ok_or_else(|| ConfigError::UnknownDefensivePlay(name.to_owned()))
    }

    /// Checks that both play lists exist and every reference resolves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.offense.is_empty() {
            return Err(ConfigError::EmptyPlaybook("offensive"));
        }
        if self.defense.is_empty() {
            return Err(ConfigError::EmptyPlaybook("defensive"));
        }

        for play in &self.offense {
            let formation = self.formation(&play.formation)?;
            for (slot, assignment) in &play.assignments {
                require_slot(formation, &play.name, slot)?;
                if let Assignment::QuarterbackDrop {
                    primary: Some(primary),
                    ..
                } = assignment
                {
                    require_slot(formation, &play.name, primary)?;
                }
            }
        }

        for play in &self.defense {
            let formation = self.formation(&play.formation)?;
            for slot in play.assignments.keys() {
                require_slot(formation, &play.name, slot)?;
            }
        }

        Ok(())
    }
}

fn require_slot(formation: &Formation, play: &str, slot: &str) -> Result<(), ConfigError> {
    if formation.slot(slot).is_some() {
        Ok(())
    } else {
        Err(ConfigError::UnknownSlot {
            play: play.to_owned(),
            slot: slot.to_owned(),
        })
    }
}
