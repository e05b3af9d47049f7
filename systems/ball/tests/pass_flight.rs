use gridiron_core::{
    BallState, Command, Event, PlayerRatings, Role, Side, SimTuning, TeamIndex, Vec2,
    TICK_DURATION,
};
use gridiron_system_ball::Ball;
use gridiron_system_collision::Collision;
use gridiron_world::{self as world, query, World};

fn spawn(
    world: &mut World,
    team: TeamIndex,
    side: Side,
    role: Role,
    position: Vec2,
) -> gridiron_core::EntityId {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnPlayer {
            team,
            side,
            role,
            slot: role.code().to_owned(),
            ratings: PlayerRatings::default(),
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

fn run_flight(world: &mut World) -> Vec<Event> {
    let mut log = Vec::new();
    for _ in 0..120 {
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt: TICK_DURATION }, &mut events);

        let mut contacts = Vec::new();
        Collision.handle(
            &query::entity_view(world),
            &query::ball(world),
            &query::tuning(world).contact,
            &mut contacts,
        );
        let mut commands = Vec::new();
        Ball.handle(&query::ball(world), &contacts, &mut commands);
        for command in commands {
            world::apply(world, command, &mut events);
        }

        let settled = query::ball(world).state != BallState::InAir;
        log.extend(events);
        if settled {
            break;
        }
    }
    log
}

#[test]
fn stationary_receiver_catches_a_pass_thrown_to_their_spot() {
    let mut world = World::new(SimTuning::default(), TeamIndex::HOME);
    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginPlay, &mut events);
    let line_x = query::play_state(&world).line_of_scrimmage_x();
    let center = query::tuning(&world).field.center_y();

    let qb = spawn(
        &mut world,
        TeamIndex::HOME,
        Side::Offense,
        Role::Qb,
        Vec2::new(line_x - 48.0, center),
    );
    let receiver_spot = Vec2::new(line_x + 120.0, center);
    let receiver = spawn(&mut world, TeamIndex::HOME, Side::Offense, Role::Wr, receiver_spot);
    world::apply(&mut world, Command::Snap, &mut events);
    world::apply(
        &mut world,
        Command::ThrowBall {
            passer: qb,
            receiver,
            target: receiver_spot,
        },
        &mut events,
    );

    let log = run_flight(&mut world);

    assert!(log.contains(&Event::PassCaught {
        entity: receiver,
        intercepted: false,
    }));
    let ball = query::ball(&world);
    assert_eq!(ball.state, BallState::Held);
    assert_eq!(ball.owner, Some(receiver));
}

#[test]
fn pass_to_an_empty_spot_falls_incomplete() {
    let mut world = World::new(SimTuning::default(), TeamIndex::HOME);
    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginPlay, &mut events);
    let line_x = query::play_state(&world).line_of_scrimmage_x();
    let center = query::tuning(&world).field.center_y();

    let qb = spawn(
        &mut world,
        TeamIndex::HOME,
        Side::Offense,
        Role::Qb,
        Vec2::new(line_x - 48.0, center),
    );
    let receiver = spawn(
        &mut world,
        TeamIndex::HOME,
        Side::Offense,
        Role::Wr,
        Vec2::new(line_x + 120.0, center + 200.0),
    );
    world::apply(&mut world, Command::Snap, &mut events);
    world::apply(
        &mut world,
        Command::ThrowBall {
            passer: qb,
            receiver,
            target: Vec2::new(line_x + 240.0, center),
        },
        &mut events,
    );

    let log = run_flight(&mut world);

    let whistle = log.iter().find_map(|event| match event {
        Event::Whistle { result, .. } => Some(*result),
        _ => None,
    });
    let result = whistle.expect("incomplete pass blows the whistle");
    assert!(result.incomplete);
    assert_eq!(result.yards_gained, 0);
    assert_eq!(query::ball(&world).state, BallState::Dead);
}
