use gridiron_core::{KickTuning, Playbook};
use gridiron_world::MatchState;

/// Offensive and defensive play names for one snap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayCall {
    /// Offensive play name.
    pub offense: String,
    /// Defensive play name.
    pub defense: String,
}

/// Deterministic play selection for computer-run teams.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayCaller;

impl PlayCaller {
    /// Rotates through both play lists, offsetting the defense once per
    /// pass through the offense so pairings vary.
    #[must_use]
    pub fn call(&self, playbook: &Playbook, play_count: u32) -> Option<PlayCall> {
        if playbook.offense.is_empty() || playbook.defense.is_empty() {
            return None;
        }
        let index = play_count as usize;
        let offense = &playbook.offense[index % playbook.offense.len()];
        let rotation = index / playbook.offense.len();
        let defense = &playbook.defense[(index + rotation) % playbook.defense.len()];

        Some(PlayCall {
            offense: offense.name.clone(),
            defense: defense.name.clone(),
        })
    }

    /// Kicks on fourth down whenever the spot is within range.
    #[must_use]
    pub fn attempts_field_goal(&self, match_state: &MatchState, kick: &KickTuning) -> bool {
        let distance = kick.field_goal_distance(match_state.field_position());
        match_state.down() == 4 && distance <= kick.field_goal_max_distance
    }
}
