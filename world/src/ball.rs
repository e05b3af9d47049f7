//! Ball lifecycle record.

use gridiron_core::{BallFlight, BallSnapshot, BallState, EntityId, Vec2};

/// Ball state and owner, always written together.
#[derive(Debug)]
pub(crate) struct BallRecord {
    state: BallState,
    owner: Option<EntityId>,
    position: Vec2,
    flight: Option<BallFlight>,
}

impl BallRecord {
    pub(crate) fn dead_at(position: Vec2) -> Self {
        Self {
            state: BallState::Dead,
            owner: None,
            position,
            flight: None,
        }
    }

    pub(crate) const fn state(&self) -> BallState {
        self.state
    }

    pub(crate) const fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn hold(&mut self, owner: EntityId, position: Vec2) {
        self.state = BallState::Held;
        self.owner = Some(owner);
        self.position = position;
        self.flight = None;
    }

    pub(crate) fn throw(&mut self, flight: BallFlight) {
        self.state = BallState::InAir;
        self.owner = None;
        self.position = flight.origin;
        self.flight = Some(flight);
    }

    pub(crate) fn advance(&mut self, position: Vec2, elapsed_ticks: u32) {
        if let Some(flight) = self.flight.as_mut() {
            flight.elapsed_ticks = elapsed_ticks;
            self.position = position;
        }
    }

    pub(crate) fn follow(&mut self, owner: EntityId, position: Vec2) {
        if self.owner == Some(owner) {
            self.position = position;
        }
    }

    pub(crate) fn loose(&mut self, position: Vec2) {
        self.state = BallState::Loose;
        self.owner = None;
        self.position = position;
        self.flight = None;
    }

    pub(crate) fn kill(&mut self) {
        self.state = BallState::Dead;
        self.owner = None;
        self.flight = None;
    }

    pub(crate) fn snapshot(&self) -> BallSnapshot {
        debug_assert_eq!(
            self.state == BallState::Held,
            self.owner.is_some(),
            "ball owner out of sync with ball state"
        );
        BallSnapshot {
            state: self.state,
            owner: self.owner,
            position: self.position,
            flight: self.flight,
        }
    }
}
