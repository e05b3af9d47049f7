//! Per-player component storage.

use gridiron_core::{
    Behavior, BehaviorStack, EngagementId, EntityId, EntitySnapshot, PlayerRatings, Role, Side,
    TeamIndex, Vec2,
};

/// Components owned by a single player entity.
#[derive(Debug)]
pub(crate) struct PlayerRecord {
    pub(crate) id: EntityId,
    pub(crate) team: TeamIndex,
    pub(crate) side: Side,
    pub(crate) role: Role,
    pub(crate) human: bool,
    pub(crate) ratings: PlayerRatings,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) steering: Vec2,
    pub(crate) stack: BehaviorStack,
    pub(crate) tackled: bool,
    pub(crate) shed_until: u64,
}

/// Spawn parameters for a new player.
#[derive(Debug)]
pub(crate) struct PlayerSpawn {
    pub(crate) team: TeamIndex,
    pub(crate) side: Side,
    pub(crate) role: Role,
    pub(crate) ratings: PlayerRatings,
    pub(crate) position: Vec2,
    pub(crate) human: bool,
}

impl PlayerRecord {
    pub(crate) fn spawn(id: EntityId, spawn: PlayerSpawn) -> Self {
        Self {
            id,
            team: spawn.team,
            side: spawn.side,
            role: spawn.role,
            human: spawn.human,
            ratings: spawn.ratings,
            position: spawn.position,
            velocity: Vec2::ZERO,
            steering: Vec2::ZERO,
            stack: BehaviorStack::new(Behavior::Hold),
            tackled: false,
            shed_until: 0,
        }
    }

    pub(crate) fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.steering = Vec2::ZERO;
    }

    pub(crate) fn snapshot(
        &self,
        tick_index: u64,
        engagement: Option<EngagementId>,
    ) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            team: self.team,
            side: self.side,
            role: self.role,
            human: self.human,
            ratings: self.ratings,
            position: self.position,
            velocity: self.velocity,
            steering: self.steering,
            behavior: self.stack.top().clone(),
            stack_depth: self.stack.depth(),
            engagement,
            can_engage: engagement.is_none() && tick_index >= self.shed_until,
            tackled: self.tackled,
        }
    }
}
