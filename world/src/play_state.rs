//! Per-play record created at the start of every play.

use std::time::Duration;

use gridiron_core::{
    BallState, EntityId, PlayPhase, PlayResult, TeamIndex, TurnoverKind, WhistleReason,
};

/// State of the play currently being run.
///
/// Frozen once the whistle blows; replaced when the next play begins.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayState {
    id: u32,
    phase: PlayPhase,
    offense: TeamIndex,
    play_clock_remaining: Duration,
    play_clock_expired: bool,
    elapsed: Duration,
    ball_state: BallState,
    ball_owner: Option<EntityId>,
    whistle: WhistleReason,
    result: Option<PlayResult>,
    start_field_position: i32,
    line_of_scrimmage_x: f32,
    turnover: Option<TurnoverKind>,
}

impl PlayState {
    pub(crate) fn new(
        id: u32,
        offense: TeamIndex,
        start_field_position: i32,
        line_of_scrimmage_x: f32,
        play_clock: Duration,
    ) -> Self {
        Self {
            id,
            phase: PlayPhase::PreSnap,
            offense,
            play_clock_remaining: play_clock,
            play_clock_expired: false,
            elapsed: Duration::ZERO,
            ball_state: BallState::Dead,
            ball_owner: None,
            whistle: WhistleReason::None,
            result: None,
            start_field_position,
            line_of_scrimmage_x,
            turnover: None,
        }
    }

    /// Sequential play identifier.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PlayPhase {
        self.phase
    }

    /// Team that snapped the ball.
    #[must_use]
    pub const fn offense(&self) -> TeamIndex {
        self.offense
    }

    /// Pre-snap play clock left.
    #[must_use]
    pub const fn play_clock_remaining(&self) -> Duration {
        self.play_clock_remaining
    }

    /// Live time elapsed since the snap.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mirror of the ball state.
    #[must_use]
    pub const fn ball_state(&self) -> BallState {
        self.ball_state
    }

    /// Mirror of the ball owner.
    #[must_use]
    pub const fn ball_owner(&self) -> Option<EntityId> {
        self.ball_owner
    }

    /// Whistle reason, `None` while the play is running.
    #[must_use]
    pub const fn whistle(&self) -> WhistleReason {
        self.whistle
    }

    /// Outcome recorded at the whistle.
    #[must_use]
    pub const fn result(&self) -> Option<PlayResult> {
        self.result
    }

    /// Offense field position at the snap.
    #[must_use]
    pub const fn start_field_position(&self) -> i32 {
        self.start_field_position
    }

    /// Field position where the ball was downed, once known.
    #[must_use]
    pub fn end_field_position(&self) -> Option<i32> {
        self.result.map(|result| result.end_field_position)
    }

    /// X coordinate of the line of scrimmage.
    #[must_use]
    pub const fn line_of_scrimmage_x(&self) -> f32 {
        self.line_of_scrimmage_x
    }

    pub(crate) const fn turnover(&self) -> Option<TurnoverKind> {
        self.turnover
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.whistle != WhistleReason::None
    }

    pub(crate) fn snap(&mut self) {
        self.phase = PlayPhase::InPlay;
    }

    pub(crate) fn mirror_ball(&mut self, state: BallState, owner: Option<EntityId>) {
        self.ball_state = state;
        self.ball_owner = owner;
    }

    pub(crate) fn record_turnover(&mut self, kind: TurnoverKind) {
        self.turnover = Some(kind);
    }

    pub(crate) fn run_live_clock(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    /// Runs the pre-snap clock; returns `true` the first time it reaches zero.
    pub(crate) fn run_play_clock(&mut self, dt: Duration) -> bool {
        self.play_clock_remaining = self.play_clock_remaining.saturating_sub(dt);
        if self.play_clock_remaining.is_zero() && !self.play_clock_expired {
            self.play_clock_expired = true;
            return true;
        }
        false
    }

    pub(crate) fn blow_whistle(&mut self, reason: WhistleReason, result: PlayResult) {
        self.whistle = reason;
        self.result = Some(result);
        self.phase = PlayPhase::PostPlay;
        self.ball_state = BallState::Dead;
        self.ball_owner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_clock_expires_once() {
        let mut play = PlayState::new(1, TeamIndex::HOME, 25, 600.0, Duration::from_secs(1));
        assert!(!play.run_play_clock(Duration::from_millis(600)));
        assert!(play.run_play_clock(Duration::from_millis(600)));
        assert!(!play.run_play_clock(Duration::from_millis(600)));
    }
}
