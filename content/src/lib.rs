#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Content loading for formations, plays and rosters.
//!
//! Text formats stop here: TOML documents are decoded into the structured
//! records of [`gridiron_core::Playbook`], position command strings are
//! resolved into [`gridiron_core::SlotPlacement`] values, and the assembled
//! playbook is validated before it is handed to the simulation.

mod placement;

use std::collections::{BTreeMap, BTreeSet};

use gridiron_core::{
    Assignment, ConfigError, DefensivePlay, Formation, FormationSlot, OffensivePlay,
    PlayerRatings, Playbook, Role, Roster, SimTuning,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use placement::{fallback_placement, parse_placement};

const DEFAULT_PLAYBOOK: &str = include_str!("../data/default_playbook.toml");
const DEFAULT_CUSHION_YARDS: f32 = 4.0;
const DEFAULT_DROP_TICKS: u32 = 40;
const DEFAULT_ROSTER_NAMES: [&str; 2] = ["Home", "Away"];

/// Errors raised while decoding content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse content document")]
    Toml(#[from] toml::de::Error),
    /// A role code is not one of the known abbreviations.
    #[error("unknown role code `{0}`")]
    UnknownRole(String),
    /// Two records of the same kind share a name.
    #[error("duplicate {kind} `{name}`")]
    Duplicate {
        /// Record kind.
        kind: &'static str,
        /// Repeated name.
        name: String,
    },
    /// More than one roster per team was provided.
    #[error("expected at most 2 rosters, found {0}")]
    TooManyRosters(usize),
    /// The decoded playbook references missing records.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Deserialize)]
struct RawPlaybook {
    #[serde(default)]
    formations: Vec<RawFormation>,
    #[serde(default)]
    offense: Vec<RawPlay>,
    #[serde(default)]
    defense: Vec<RawPlay>,
    #[serde(default)]
    rosters: Vec<RawRoster>,
}

#[derive(Debug, Deserialize)]
struct RawFormation {
    name: String,
    slots: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    name: String,
    role: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct RawPlay {
    name: String,
    formation: String,
    #[serde(default)]
    assignments: BTreeMap<String, RawAssignment>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawAssignment {
    Hold,
    Block,
    Route {
        waypoints: Vec<[f32; 2]>,
    },
    Drop {
        #[serde(default = "default_drop_ticks")]
        ticks: u32,
        #[serde(default)]
        primary: Option<String>,
    },
    Rush,
    Cover {
        target: String,
        #[serde(default = "default_cushion")]
        cushion: f32,
    },
    Pursue,
}

#[derive(Debug, Deserialize)]
struct RawRoster {
    name: String,
    #[serde(default)]
    ratings: BTreeMap<String, PlayerRatings>,
}

fn default_cushion() -> f32 {
    DEFAULT_CUSHION_YARDS
}

fn default_drop_ticks() -> u32 {
    DEFAULT_DROP_TICKS
}

impl From<RawAssignment> for Assignment {
    fn from(raw: RawAssignment) -> Self {
        match raw {
            RawAssignment::Hold => Assignment::Hold,
            RawAssignment::Block => Assignment::Block,
            RawAssignment::Route { waypoints } => Assignment::Route {
                waypoints: waypoints
                    .into_iter()
                    .map(|[downfield, lateral]| (downfield, lateral))
                    .collect(),
            },
            RawAssignment::Drop { ticks, primary } => Assignment::QuarterbackDrop {
                drop_ticks: ticks,
                primary,
            },
            RawAssignment::Rush => Assignment::PassRush,
            RawAssignment::Cover { target, cushion } => Assignment::ManCoverage {
                target,
                cushion_yards: cushion,
            },
            RawAssignment::Pursue => Assignment::Pursue,
        }
    }
}

/// Decodes a role abbreviation such as `QB` or `ol`.
pub fn parse_role(code: &str) -> Result<Role, ContentError> {
    Role::ALL
        .into_iter()
        .find(|role| role.code().eq_ignore_ascii_case(code))
        .ok_or_else(|| ContentError::UnknownRole(code.to_owned()))
}

/// Decodes and validates a playbook document.
pub fn parse_playbook(text: &str) -> Result<Playbook, ContentError> {
    let raw: RawPlaybook = toml::from_str(text)?;

    let mut formations = Vec::with_capacity(raw.formations.len());
    let mut names = BTreeSet::new();
    for formation in raw.formations {
        ensure_unique(&mut names, "formation", &formation.name)?;
        formations.push(decode_formation(formation)?);
    }

    let offense = decode_plays(raw.offense, "offensive play")?
        .into_iter()
        .map(|(name, formation, assignments)| OffensivePlay {
            name,
            formation,
            assignments,
        })
        .collect();
    let defense = decode_plays(raw.defense, "defensive play")?
        .into_iter()
        .map(|(name, formation, assignments)| DefensivePlay {
            name,
            formation,
            assignments,
        })
        .collect();

    let playbook = Playbook {
        formations,
        offense,
        defense,
        rosters: decode_rosters(raw.rosters)?,
    };
    playbook.validate()?;
    debug!(
        formations = playbook.formations.len(),
        offense = playbook.offense.len(),
        defense = playbook.defense.len(),
        "playbook loaded"
    );
    Ok(playbook)
}

/// Playbook shipped with the crate.
pub fn default_playbook() -> Result<Playbook, ContentError> {
    parse_playbook(DEFAULT_PLAYBOOK)
}

/// Decodes a tuning override; omitted values keep their defaults.
pub fn parse_tuning(text: &str) -> Result<SimTuning, ContentError> {
    Ok(toml::from_str(text)?)
}

fn ensure_unique(
    names: &mut BTreeSet<String>,
    kind: &'static str,
    name: &str,
) -> Result<(), ContentError> {
    if names.insert(name.to_owned()) {
        Ok(())
    } else {
        Err(ContentError::Duplicate {
            kind,
            name: name.to_owned(),
        })
    }
}

fn decode_formation(raw: RawFormation) -> Result<Formation, ContentError> {
    let mut names = BTreeSet::new();
    let mut slots = Vec::with_capacity(raw.slots.len());
    for slot in raw.slots {
        ensure_unique(&mut names, "slot", &slot.name)?;
        let role = parse_role(&slot.role)?;
        let placement = placement::resolve_placement(role, &slot.name, &slot.at);
        slots.push(FormationSlot {
            name: slot.name,
            role,
            placement,
        });
    }
    Ok(Formation {
        name: raw.name,
        slots,
    })
}

type DecodedPlay = (String, String, BTreeMap<String, Assignment>);

fn decode_plays(raw: Vec<RawPlay>, kind: &'static str) -> Result<Vec<DecodedPlay>, ContentError> {
    let mut names = BTreeSet::new();
    raw.into_iter()
        .map(|play| {
            ensure_unique(&mut names, kind, &play.name)?;
            let assignments = play
                .assignments
                .into_iter()
                .map(|(slot, assignment)| (slot, Assignment::from(assignment)))
                .collect();
            Ok((play.name, play.formation, assignments))
        })
        .collect()
}

fn decode_rosters(raw: Vec<RawRoster>) -> Result<[Roster; 2], ContentError> {
    if raw.len() > 2 {
        return Err(ContentError::TooManyRosters(raw.len()));
    }

    let mut rosters: [Roster; 2] = DEFAULT_ROSTER_NAMES.map(|name| Roster {
        name: name.to_owned(),
        ratings: BTreeMap::new(),
    });
    for (roster, raw) in rosters.iter_mut().zip(raw) {
        roster.name = raw.name;
        for (code, ratings) in raw.ratings {
            let role = parse_role(&code)?;
            if roster.ratings.insert(role, ratings).is_some() {
                return Err(ContentError::Duplicate {
                    kind: "roster role",
                    name: code,
                });
            }
        }
    }
    Ok(rosters)
}
