use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use gridiron_core::{
    Command, EntityId, Event, OnFieldState, PlayerRatings, Role, Side, SimTuning, TeamIndex, Vec2,
};
use gridiron_system_movement::Movement;
use gridiron_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_fingerprints() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.players.len(), 4);
}

fn replay() -> ReplayOutcome {
    let mut world = World::new(SimTuning::default(), TeamIndex::HOME);
    let movement = Movement;
    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginPlay, &mut events);

    let mut ids = Vec::new();
    for (index, role) in [Role::Qb, Role::Wr, Role::Te, Role::Rb].into_iter().enumerate() {
        events.clear();
        world::apply(
            &mut world,
            Command::SpawnPlayer {
                team: TeamIndex::HOME,
                side: Side::Offense,
                role,
                slot: format!("slot{index}"),
                ratings: PlayerRatings {
                    max_speed: 45 + 15 * index as u8,
                    running_speed: 30 + 20 * index as u8,
                    ..PlayerRatings::default()
                },
                position: Vec2::new(500.0, 200.0 + 150.0 * index as f32),
                human: false,
            },
            &mut events,
        );
        ids.extend(events.iter().filter_map(|event| match event {
            Event::PlayerSpawned { entity, .. } => Some(*entity),
            _ => None,
        }));
    }
    world::apply(&mut world, Command::Snap, &mut events);

    for tick in 0..180_u32 {
        for (index, entity) in ids.iter().enumerate() {
            world::apply(
                &mut world,
                Command::Steer {
                    entity: *entity,
                    direction: scripted_direction(tick, index),
                },
                &mut events,
            );
        }

        let mut commands = Vec::new();
        movement.handle(
            OnFieldState::LivePlay,
            &query::entity_view(&world),
            &query::tuning(&world).movement,
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
    }

    let players = query::entity_view(&world)
        .into_vec()
        .into_iter()
        .map(|snapshot| PlayerState {
            id: snapshot.id,
            position: (snapshot.position.x.to_bits(), snapshot.position.y.to_bits()),
            velocity: (snapshot.velocity.x.to_bits(), snapshot.velocity.y.to_bits()),
        })
        .collect();

    ReplayOutcome { players }
}

fn scripted_direction(tick: u32, index: usize) -> Vec2 {
    match (tick / 30 + index as u32) % 4 {
        0 => Vec2::X,
        1 => Vec2::new(1.0, 1.0).normalize(),
        2 => Vec2::ZERO,
        _ => Vec2::NEG_Y,
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    players: Vec<PlayerState>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct PlayerState {
    id: EntityId,
    position: (u32, u32),
    velocity: (u32, u32),
}
