#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rule-based selection of the single human-controlled player.
//!
//! Selection is recomputed every tick from entity state alone. Only
//! human-tagged players of the human team are ever selected, and the
//! selection is frozen for the whole post-play phase.

use std::cmp::Ordering;

use gridiron_core::{
    BallSnapshot, BallState, ControlState, EntityId, EntitySnapshot, EntityView, OnFieldState,
    Role, TeamIndex,
};

/// Inputs describing the tick the selection is made for.
#[derive(Clone, Copy, Debug)]
pub struct ControlContext<'a> {
    /// On-field loop state.
    pub on_field: OnFieldState,
    /// Team on offense this play.
    pub offense: TeamIndex,
    /// Team the human plays, if any.
    pub human_team: Option<TeamIndex>,
    /// Ball snapshot.
    pub ball: &'a BallSnapshot,
    /// Whether the human asked to cycle this tick.
    pub cycle: bool,
}

/// Stateful selector holding the manual cycle offset and the frozen selection.
#[derive(Debug, Default)]
pub struct ControlSelector {
    cycle_offset: usize,
    phase: Option<OnFieldState>,
    current: ControlState,
}

impl ControlSelector {
    /// Creates a selector with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last computed selection.
    #[must_use]
    pub const fn current(&self) -> ControlState {
        self.current
    }

    /// Recomputes the selection for the current tick; read it back with
    /// [`ControlSelector::current`].
    pub fn handle(&mut self, entities: &EntityView, ctx: &ControlContext<'_>) {
        let Some(human_team) = ctx.human_team else {
            self.current = ControlState::default();
            return;
        };

        if self.phase != Some(ctx.on_field) {
            self.phase = Some(ctx.on_field);
            self.cycle_offset = 0;
        } else if ctx.cycle && ctx.on_field != OnFieldState::PostPlay {
            self.cycle_offset = self.cycle_offset.wrapping_add(1);
        }

        let controlled = match ctx.on_field {
            OnFieldState::PostPlay => return,
            OnFieldState::PreSnap => pre_snap(entities, human_team, self.cycle_offset),
            OnFieldState::LivePlay if human_team == ctx.offense => {
                ball_holder(entities, ctx.ball, human_team)
            }
            OnFieldState::LivePlay => {
                nearest_defender(entities, ctx.ball, human_team, self.cycle_offset)
            }
        };

        self.current = ControlState {
            controlled: controlled.map(|entity| entity.id),
            team: Some(human_team),
            debug_role: controlled.map(|entity| entity.role),
        };
    }
}

fn eligible<'a>(
    entities: &'a EntityView,
    human_team: TeamIndex,
) -> impl Iterator<Item = &'a EntitySnapshot> {
    entities
        .iter()
        .filter(move |entity| entity.human && entity.team == human_team)
}

fn pre_snap(
    entities: &EntityView,
    human_team: TeamIndex,
    offset: usize,
) -> Option<&EntitySnapshot> {
    let candidates: Vec<&EntitySnapshot> = eligible(entities, human_team).collect();
    if candidates.is_empty() {
        return None;
    }
    let default = candidates
        .iter()
        .position(|entity| entity.role == Role::Qb)
        .unwrap_or(0);
    candidates.get((default + offset) % candidates.len()).copied()
}

fn ball_holder<'a>(
    entities: &'a EntityView,
    ball: &BallSnapshot,
    human_team: TeamIndex,
) -> Option<&'a EntitySnapshot> {
    ball.owner
        .filter(|_| ball.state == BallState::Held)
        .and_then(|owner| entities.get(owner))
        .filter(|entity| entity.human && entity.team == human_team)
}

fn nearest_defender<'a>(
    entities: &'a EntityView,
    ball: &BallSnapshot,
    human_team: TeamIndex,
    offset: usize,
) -> Option<&'a EntitySnapshot> {
    let focus = ball
        .owner
        .filter(|_| ball.state == BallState::Held)
        .and_then(|owner| entities.get(owner))
        .map_or(ball.position, |carrier| carrier.position);

    let mut candidates: Vec<(f32, EntityId, &EntitySnapshot)> = eligible(entities, human_team)
        .map(|entity| (entity.position.distance_squared(focus), entity.id, entity))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by(|a, b| match a.0.total_cmp(&b.0) {
        Ordering::Equal => a.1.cmp(&b.1),
        other => other,
    });
    candidates
        .get(offset % candidates.len())
        .map(|(_, _, entity)| *entity)
}
