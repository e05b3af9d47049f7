//! Formation instantiation.
//!
//! A lineup is planned completely, and every reference in it checked, before
//! a single command reaches the world. Behavior stacks are built in a second
//! pass once every slot has an entity id.

use std::collections::BTreeMap;

use gridiron_core::{
    Assignment, Behavior, ConfigError, DefensivePlay, EntityId, FieldDirection, Formation,
    OffensivePlay, PlayerRatings, Playbook, Role, Side, SimTuning, TeamIndex, Vec2,
};

/// One player of a planned lineup.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PlannedPlayer {
    pub(crate) team: TeamIndex,
    pub(crate) side: Side,
    pub(crate) role: Role,
    pub(crate) slot: String,
    pub(crate) ratings: PlayerRatings,
    pub(crate) position: Vec2,
    pub(crate) assignment: Assignment,
}

/// Where the play is run from.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scrimmage {
    pub(crate) offense: TeamIndex,
    pub(crate) line_x: f32,
}

/// Checks that `offense` and `defense` can line up against each other.
pub(crate) fn check_pairing<'a>(
    playbook: &'a Playbook,
    offense: &OffensivePlay,
    defense: &DefensivePlay,
) -> Result<(&'a Formation, &'a Formation), ConfigError> {
    let offense_formation = playbook.formation(&offense.formation)?;
    let defense_formation = playbook.formation(&defense.formation)?;

    for (slot, assignment) in &offense.assignments {
        if offense_formation.slot(slot).is_none() {
            return Err(unknown_slot(&offense.name, slot));
        }
        if let Assignment::QuarterbackDrop {
            primary: Some(primary),
            ..
        } = assignment
        {
            if offense_formation.slot(primary).is_none() {
                return Err(unknown_slot(&offense.name, primary));
            }
        }
    }
    for (slot, assignment) in &defense.assignments {
        if defense_formation.slot(slot).is_none() {
            return Err(unknown_slot(&defense.name, slot));
        }
        if let Assignment::ManCoverage { target, .. } = assignment {
            if offense_formation.slot(target).is_none() {
                return Err(unknown_slot(&defense.name, target));
            }
        }
    }

    Ok((offense_formation, defense_formation))
}

/// Plans every player of both formations in slot order, offense first.
pub(crate) fn line_up(
    playbook: &Playbook,
    offense: &OffensivePlay,
    defense: &DefensivePlay,
    scrimmage: Scrimmage,
    tuning: &SimTuning,
) -> Result<Vec<PlannedPlayer>, ConfigError> {
    let (offense_formation, defense_formation) = check_pairing(playbook, offense, defense)?;
    let direction = scrimmage.offense.attacking();
    let field = &tuning.field;

    let mut players =
        Vec::with_capacity(offense_formation.slots.len() + defense_formation.slots.len());
    for (side, team, formation, assignments) in [
        (
            Side::Offense,
            scrimmage.offense,
            offense_formation,
            &offense.assignments,
        ),
        (
            Side::Defense,
            scrimmage.offense.opponent(),
            defense_formation,
            &defense.assignments,
        ),
    ] {
        let roster = &playbook.rosters[team.index()];
        for slot in &formation.slots {
            // Offense lines up behind the ball, defense across from it.
            let back = match side {
                Side::Offense => -direction.sign(),
                Side::Defense => direction.sign(),
            };
            let position = Vec2::new(
                scrimmage.line_x + back * field.yards(slot.placement.depth_yards),
                field.center_y() + field.yards(slot.placement.lateral_yards),
            );
            let assignment = assignments.get(&slot.name).cloned().unwrap_or(match side {
                Side::Offense => Assignment::Hold,
                Side::Defense => Assignment::Pursue,
            });
            players.push(PlannedPlayer {
                team,
                side,
                role: slot.role,
                slot: slot.name.clone(),
                ratings: roster.ratings_for(slot.role),
                position,
                assignment,
            });
        }
    }

    for player in &mut players {
        player.position.y = player.position.y.clamp(0.0, field.yards(field.width_yards));
    }
    Ok(players)
}

/// Builds the initial behavior stack for a spawned player, bottom first.
pub(crate) fn behaviors(
    player: &PlannedPlayer,
    offense_ids: &BTreeMap<String, EntityId>,
    direction: FieldDirection,
    tuning: &SimTuning,
) -> Vec<Behavior> {
    let field = &tuning.field;
    match &player.assignment {
        Assignment::Hold => vec![Behavior::Hold],
        Assignment::Block => vec![Behavior::PassBlock {
            anchor: player.position,
        }],
        Assignment::Route { waypoints } => vec![
            Behavior::Hold,
            Behavior::RouteRunner {
                waypoints: waypoints
                    .iter()
                    .map(|(downfield, lateral)| {
                        player.position
                            + Vec2::new(
                                direction.sign() * field.yards(*downfield),
                                field.yards(*lateral),
                            )
                    })
                    .collect(),
                next: 0,
            },
        ],
        Assignment::QuarterbackDrop {
            drop_ticks,
            primary,
        } => vec![
            Behavior::Hold,
            Behavior::QuarterbackDrop {
                remaining_ticks: *drop_ticks,
                primary: primary
                    .as_ref()
                    .and_then(|slot| offense_ids.get(slot).copied()),
            },
        ],
        Assignment::PassRush => vec![
            Behavior::Pursuit {
                cooldown_ticks: tuning.tackle.retry_cooldown_ticks,
            },
            Behavior::PassRush,
        ],
        Assignment::ManCoverage {
            target,
            cushion_yards,
        } => match offense_ids.get(target) {
            Some(target) => vec![
                Behavior::Pursuit { cooldown_ticks: 0 },
                Behavior::ManCoverage {
                    target: *target,
                    cushion: field.yards(*cushion_yards),
                },
            ],
            None => vec![Behavior::Pursuit { cooldown_ticks: 0 }],
        },
        Assignment::Pursue => vec![Behavior::Pursuit { cooldown_ticks: 0 }],
    }
}

fn unknown_slot(play: &str, slot: &str) -> ConfigError {
    ConfigError::UnknownSlot {
        play: play.to_owned(),
        slot: slot.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrimmage(offense: TeamIndex) -> Scrimmage {
        Scrimmage {
            offense,
            line_x: 1200.0,
        }
    }

    fn planned<'a>(players: &'a [PlannedPlayer], slot: &str, side: Side) -> &'a PlannedPlayer {
        players
            .iter()
            .find(|player| player.slot == slot && player.side == side)
            .expect("slot in lineup")
    }

    #[test]
    fn away_offense_runs_routes_toward_decreasing_x() {
        let playbook = gridiron_content::default_playbook().expect("default playbook");
        let tuning = SimTuning::default();
        let players = line_up(
            &playbook,
            playbook.offensive_play("slant").expect("slant"),
            playbook.defensive_play("man_blitz").expect("man_blitz"),
            scrimmage(TeamIndex::AWAY),
            &tuning,
        )
        .expect("lineup");

        let quarterback = planned(&players, "qb", Side::Offense);
        assert_eq!(quarterback.team, TeamIndex::AWAY);
        assert!(quarterback.position.x > 1200.0);
        assert!(planned(&players, "mlb", Side::Defense).position.x < 1200.0);

        let receiver = planned(&players, "z", Side::Offense);
        let stack = behaviors(receiver, &BTreeMap::new(), FieldDirection::Left, &tuning);
        let Behavior::RouteRunner { waypoints, next } = &stack[1] else {
            panic!("expected a route, got {stack:?}");
        };
        assert_eq!(*next, 0);
        assert!(waypoints[0].x < receiver.position.x);
        assert_eq!(stack[0], Behavior::Hold);
    }

    #[test]
    fn coverage_resolves_its_target_id() {
        let playbook = gridiron_content::default_playbook().expect("default playbook");
        let tuning = SimTuning::default();
        let players = line_up(
            &playbook,
            playbook.offensive_play("slant").expect("slant"),
            playbook.defensive_play("man_blitz").expect("man_blitz"),
            scrimmage(TeamIndex::HOME),
            &tuning,
        )
        .expect("lineup");

        let ids = BTreeMap::from([("x".to_owned(), EntityId::new(9))]);
        let corner = planned(&players, "cb1", Side::Defense);
        let stack = behaviors(corner, &ids, FieldDirection::Right, &tuning);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack[0], Behavior::Pursuit { cooldown_ticks: 0 });
        assert!(matches!(
            &stack[1],
            Behavior::ManCoverage { target, .. } if *target == EntityId::new(9)
        ));
    }
}
