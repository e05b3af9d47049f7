use gridiron_core::{
    Command, EntityId, Event, OnFieldState, PlayerRatings, Role, Side, SimTuning, TeamIndex, Vec2,
};
use gridiron_system_movement::Movement;
use gridiron_world::{self as world, query, World};

fn spawn(world: &mut World, role: Role, ratings: PlayerRatings, position: Vec2) -> EntityId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnPlayer {
            team: TeamIndex::HOME,
            side: Side::Offense,
            role,
            slot: role.code().to_lowercase(),
            ratings,
            position,
            human: false,
        },
        &mut events,
    );
    events
        .iter()
        .find_map(|event| match event {
            Event::PlayerSpawned { entity, .. } => Some(*entity),
            _ => None,
        })
        .expect("spawned")
}

fn live_world(max_speed: u8) -> (World, EntityId) {
    let mut world = World::new(SimTuning::default(), TeamIndex::HOME);
    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginPlay, &mut events);
    let _ = spawn(&mut world, Role::Qb, PlayerRatings::default(), Vec2::new(500.0, 600.0));
    let runner = spawn(
        &mut world,
        Role::Wr,
        PlayerRatings {
            max_speed,
            running_speed: 100,
            ..PlayerRatings::default()
        },
        Vec2::new(600.0, 300.0),
    );
    world::apply(&mut world, Command::Snap, &mut events);
    (world, runner)
}

fn run_tick(world: &mut World, movement: &Movement) {
    let mut commands = Vec::new();
    movement.handle(
        OnFieldState::LivePlay,
        &query::entity_view(world),
        &query::tuning(world).movement,
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

#[test]
fn runner_reaches_rating_derived_top_speed() {
    let (mut world, runner) = live_world(100);
    let movement = Movement;
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Steer {
            entity: runner,
            direction: Vec2::X,
        },
        &mut events,
    );

    for _ in 0..60 {
        run_tick(&mut world, &movement);
    }

    let snapshot = query::entity_view(&world)
        .get(runner)
        .cloned()
        .expect("runner");
    assert!((snapshot.velocity.x - 6.5).abs() < 0.01);
    assert!(snapshot.position.x > 600.0 + 6.5 * 30.0);
    assert_eq!(snapshot.position.y, 300.0);
}

#[test]
fn releasing_input_stops_without_coasting() {
    let (mut world, runner) = live_world(70);
    let movement = Movement;
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Steer {
            entity: runner,
            direction: Vec2::Y,
        },
        &mut events,
    );
    for _ in 0..5 {
        run_tick(&mut world, &movement);
    }
    world::apply(
        &mut world,
        Command::Steer {
            entity: runner,
            direction: Vec2::ZERO,
        },
        &mut events,
    );
    let before = query::entity_view(&world)
        .get(runner)
        .map(|snapshot| snapshot.position)
        .expect("runner");

    run_tick(&mut world, &movement);

    let after = query::entity_view(&world).get(runner).cloned().expect("runner");
    assert_eq!(after.velocity, Vec2::ZERO);
    assert_eq!(after.position, before);
}

#[test]
fn no_movement_outside_live_play() {
    let (world, _) = live_world(70);
    let movement = Movement;
    let mut commands = Vec::new();
    for state in [OnFieldState::PreSnap, OnFieldState::PostPlay] {
        movement.handle(
            state,
            &query::entity_view(&world),
            &query::tuning(&world).movement,
            &mut commands,
        );
    }
    assert!(commands.is_empty());
}
