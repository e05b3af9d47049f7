#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Observable game and on-field loop machines.
//!
//! Both machines are projections: they never drive the world, they only
//! record which state the match is in and how long it has been there.

use std::time::Duration;

use gridiron_core::{GameLoopState, LoopState, MachineSnapshot, OnFieldState, PlayPhase};

#[derive(Debug)]
struct Machine<S> {
    state: S,
    tick_count: u64,
    ticks_in_state: u64,
    time_in_state: Duration,
}

impl<S: Copy + PartialEq> Machine<S> {
    fn new(state: S) -> Self {
        Self {
            state,
            tick_count: 0,
            ticks_in_state: 0,
            time_in_state: Duration::ZERO,
        }
    }

    fn step(&mut self, next: S, dt: Duration) {
        self.tick_count += 1;
        if next == self.state {
            self.ticks_in_state += 1;
            self.time_in_state += dt;
        } else {
            self.state = next;
            self.ticks_in_state = 0;
            self.time_in_state = Duration::ZERO;
        }
    }

    fn snapshot(&self) -> MachineSnapshot<S> {
        MachineSnapshot {
            state: self.state,
            tick_count: self.tick_count,
            ticks_in_state: self.ticks_in_state,
            time_in_state: self.time_in_state,
        }
    }
}

/// Pair of loop machines advanced once per tick.
#[derive(Debug)]
pub struct LoopMachines {
    game: Machine<GameLoopState>,
    on_field: Machine<OnFieldState>,
}

impl Default for LoopMachines {
    fn default() -> Self {
        Self {
            game: Machine::new(GameLoopState::Boot),
            on_field: Machine::new(OnFieldState::PreSnap),
        }
    }
}

impl LoopMachines {
    /// Creates machines in their boot states.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances both machines by one tick of `dt` given the current play
    /// phase and whether the match has ended.
    pub fn observe(&mut self, phase: PlayPhase, game_over: bool, dt: Duration) -> LoopState {
        let game = if game_over {
            GameLoopState::GameOver
        } else {
            GameLoopState::OnField
        };
        self.game.step(game, dt);
        self.on_field.step(OnFieldState::from_phase(phase), dt);
        self.state()
    }

    /// Current snapshot without advancing.
    #[must_use]
    pub fn state(&self) -> LoopState {
        LoopState {
            game: self.game.snapshot(),
            on_field: self.on_field.snapshot(),
        }
    }
}
