use gridiron_core::{
    Assignment, BallState, ConfigError, Event, HumanInput, OnFieldState, PlayPhase, Role, Side,
    SimTuning, TeamIndex,
};
use gridiron_simulation::{Simulation, SimulationConfig, SimulationError};
use gridiron_world::query;

fn simulation(config: SimulationConfig, tuning: SimTuning) -> Simulation {
    let playbook = gridiron_content::default_playbook().expect("default playbook");
    Simulation::new(config, playbook, tuning).expect("simulation")
}

fn human_home() -> SimulationConfig {
    SimulationConfig {
        seed: 11,
        human_team: Some(TeamIndex::HOME),
        receiving_team: TeamIndex::HOME,
        headless: false,
    }
}

fn quarterback(simulation: &Simulation, team: TeamIndex) -> gridiron_core::EntityId {
    simulation
        .roster()
        .iter()
        .find(|player| player.team == team && player.role == Role::Qb)
        .map(|player| player.entity)
        .expect("quarterback on the roster")
}

#[test]
fn opening_play_lines_up_both_teams() {
    let simulation = simulation(SimulationConfig::default(), SimTuning::default());
    let roster = simulation.roster();
    assert_eq!(roster.len(), 22);

    let ids: Vec<u32> = roster.iter().map(|player| player.entity.get()).collect();
    assert_eq!(ids, (1..=22).collect::<Vec<u32>>());

    let line_x = query::play_state(simulation.world()).line_of_scrimmage_x();
    let entities = query::entity_view(simulation.world());
    for entity in entities.iter() {
        match entity.side {
            Side::Offense => {
                assert_eq!(entity.team, TeamIndex::HOME);
                assert!(entity.position.x < line_x);
            }
            Side::Defense => {
                assert_eq!(entity.team, TeamIndex::AWAY);
                assert!(entity.position.x > line_x);
            }
        }
        assert!(entity.stack_depth >= 1);
    }
}

#[test]
fn computer_offense_snaps_to_the_quarterback_after_the_delay() {
    let tuning = SimTuning::default();
    let delay = tuning.clock.snap_delay_ticks;
    let mut simulation = simulation(SimulationConfig::default(), tuning);
    let qb = quarterback(&simulation, TeamIndex::HOME);

    for _ in 0..delay {
        simulation.tick(&HumanInput::default());
    }
    assert_eq!(query::play_state(simulation.world()).phase(), PlayPhase::PreSnap);

    for _ in 0..3 {
        simulation.tick(&HumanInput::default());
    }
    assert_eq!(query::play_state(simulation.world()).phase(), PlayPhase::InPlay);
    assert!(simulation
        .drain_events()
        .contains(&Event::Snapped { holder: qb }));

    let ball = query::ball(simulation.world());
    assert_eq!(ball.state, BallState::Held);
    assert_eq!(ball.owner, Some(qb));
}

#[test]
fn human_offense_waits_for_the_snap_input() {
    let mut simulation = simulation(human_home(), SimTuning::default());

    for _ in 0..200 {
        simulation.tick(&HumanInput::default());
    }
    assert_eq!(query::play_state(simulation.world()).phase(), PlayPhase::PreSnap);

    simulation.tick(&HumanInput {
        snap: true,
        ..HumanInput::default()
    });
    assert_eq!(query::play_state(simulation.world()).phase(), PlayPhase::InPlay);
}

#[test]
fn pre_snap_control_starts_on_the_quarterback_and_cycles_in_id_order() {
    let mut simulation = simulation(human_home(), SimTuning::default());
    let qb = quarterback(&simulation, TeamIndex::HOME);

    simulation.tick(&HumanInput::default());
    let control = simulation.control();
    assert_eq!(control.controlled, Some(qb));
    assert_eq!(control.team, Some(TeamIndex::HOME));
    assert_eq!(control.debug_role, Some(Role::Qb));

    simulation.tick(&HumanInput {
        cycle: true,
        ..HumanInput::default()
    });
    let next = simulation
        .roster()
        .iter()
        .filter(|player| player.team == TeamIndex::HOME && player.entity > qb)
        .map(|player| player.entity)
        .min();
    assert_eq!(simulation.control().controlled, next);
}

#[test]
fn headless_runs_select_control_without_steering_anyone() {
    let config = SimulationConfig {
        human_team: Some(TeamIndex::AWAY),
        ..SimulationConfig::default()
    };
    let mut simulation = simulation(config, SimTuning::default());

    for _ in 0..400 {
        simulation.tick(&HumanInput {
            snap: true,
            cycle: true,
            ..HumanInput::default()
        });
        let state = simulation.loop_state();
        if let Some(controlled) = simulation.control().controlled {
            let entities = query::entity_view(simulation.world());
            let entity = entities.get(controlled).expect("controlled entity on field");
            assert!(entity.human);
            assert_eq!(entity.team, TeamIndex::AWAY);
        } else {
            assert_ne!(state.on_field.state, OnFieldState::PreSnap);
        }
    }
}

#[test]
fn expired_play_clock_costs_five_yards_and_resets_the_field() {
    let mut tuning = SimTuning::default();
    tuning.clock.play_clock_seconds = 1;
    let mut simulation = simulation(human_home(), tuning);
    let start = query::match_state(simulation.world()).field_position();

    for _ in 0..70 {
        simulation.tick(&HumanInput::default());
    }

    let events = simulation.drain_events();
    assert!(events.contains(&Event::PlayClockExpired));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Penalty {
            team: TeamIndex::HOME,
            yards: 5,
            ..
        }
    )));

    let match_state = query::match_state(simulation.world());
    assert_eq!(match_state.field_position(), start - 5);
    assert_eq!(match_state.yards_to_go(), 15);
    assert_eq!(match_state.down(), 1);
    assert_eq!(query::play_state(simulation.world()).phase(), PlayPhase::PreSnap);
    assert_eq!(simulation.roster().len(), 22);
    assert_eq!(simulation.stats().penalties, 1);
}

#[test]
fn spawn_play_rejects_unknown_names_without_touching_the_field() {
    let mut simulation = simulation(SimulationConfig::default(), SimTuning::default());
    let before = query::play_state(simulation.world()).id();

    let err = simulation
        .spawn_play("flea_flicker", "man_blitz")
        .expect_err("unknown play");
    assert!(matches!(err, ConfigError::UnknownOffensivePlay(name) if name == "flea_flicker"));
    assert_eq!(query::play_state(simulation.world()).id(), before);
    assert_eq!(query::entity_view(simulation.world()).len(), 22);

    let spawned = simulation
        .spawn_play("te_out", "cover_man")
        .expect("known plays");
    assert_eq!(spawned.len(), 22);
    assert_eq!(query::play_state(simulation.world()).id(), before + 1);
}

#[test]
fn coverage_of_a_missing_slot_is_rejected_up_front() {
    let mut playbook = gridiron_content::default_playbook().expect("default playbook");
    let _ = playbook.defense[0].assignments.insert(
        "cb1".to_owned(),
        Assignment::ManCoverage {
            target: "flanker".to_owned(),
            cushion_yards: 4.0,
        },
    );

    let err = Simulation::new(SimulationConfig::default(), playbook, SimTuning::default())
        .expect_err("bad coverage target");
    match err {
        SimulationError::Config(ConfigError::UnknownSlot { slot, .. }) => {
            assert_eq!(slot, "flanker");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn short_headless_game_runs_to_completion() {
    let mut tuning = SimTuning::default();
    tuning.clock.quarter_seconds = 30;
    let mut simulation = simulation(
        SimulationConfig {
            seed: 99,
            ..SimulationConfig::default()
        },
        tuning,
    );

    let mut game_overs = 0;
    let mut whistles = 0;
    for _ in 0..200_000 {
        simulation.tick(&HumanInput::default());

        let world = simulation.world();
        let ball = query::ball(world);
        assert_eq!(ball.state == BallState::Held, ball.owner.is_some());
        for entity in query::entity_view(world).iter() {
            assert!(entity.stack_depth >= 1);
            if entity.engagement.is_some() {
                assert_eq!(entity.velocity, gridiron_core::Vec2::ZERO);
            }
        }

        for event in simulation.drain_events() {
            match event {
                Event::GameOver { .. } => game_overs += 1,
                Event::Whistle { .. } => whistles += 1,
                _ => {}
            }
        }
        if simulation.finished() {
            break;
        }
    }

    assert!(simulation.finished());
    assert_eq!(game_overs, 1);
    assert!(whistles > 0);
    assert_eq!(simulation.stats().plays, whistles);

    let ticks = query::tick_index(simulation.world());
    simulation.tick(&HumanInput::default());
    assert_eq!(query::tick_index(simulation.world()), ticks);
    assert!(simulation.drain_events().is_empty());
    assert_eq!(simulation.loop_state().game.state, gridiron_core::GameLoopState::GameOver);
}
