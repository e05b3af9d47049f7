//! Score, clock, possession and down/distance bookkeeping.
//!
//! Every mutator runs at a play boundary and emits exactly one event per
//! transition it performs.

use std::time::Duration;

use gridiron_core::{
    BallSpot, ClockTuning, Event, FieldDirection, FieldTuning, KickTuning, PenaltyKind,
    PlayResult, TeamIndex, TurnoverKind, FIELD_LENGTH_YARDS,
};

/// Match-level state, mutated only between plays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchState {
    quarter: u8,
    clock_remaining: Duration,
    possession: TeamIndex,
    opening_receiver: TeamIndex,
    down: u8,
    yards_to_go: i32,
    field_position: i32,
    scores: [u16; 2],
    play_count: u32,
    drive_id: u32,
    awaiting_conversion: bool,
    game_over: bool,
}

impl MatchState {
    pub(crate) fn new(receiving: TeamIndex, clock: &ClockTuning, field: &FieldTuning) -> Self {
        Self {
            quarter: 1,
            clock_remaining: clock.quarter_length(),
            possession: receiving,
            opening_receiver: receiving,
            down: 1,
            yards_to_go: field.first_down_distance,
            field_position: field.drive_start_yard,
            scores: [0; 2],
            play_count: 0,
            drive_id: 1,
            awaiting_conversion: false,
            game_over: false,
        }
    }

    /// Quarter in progress, starting at 1.
    #[must_use]
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Game clock left in the quarter.
    #[must_use]
    pub const fn clock_remaining(&self) -> Duration {
        self.clock_remaining
    }

    /// Team on offense.
    #[must_use]
    pub const fn possession(&self) -> TeamIndex {
        self.possession
    }

    /// Direction the offense attacks.
    #[must_use]
    pub const fn offense_direction(&self) -> FieldDirection {
        self.possession.attacking()
    }

    /// Current down.
    #[must_use]
    pub const fn down(&self) -> u8 {
        self.down
    }

    /// Yards needed for a first down.
    #[must_use]
    pub const fn yards_to_go(&self) -> i32 {
        self.yards_to_go
    }

    /// Spot of the next snap, in yards from the offense's own goal line.
    #[must_use]
    pub const fn field_position(&self) -> i32 {
        self.field_position
    }

    /// Scores indexed by team.
    #[must_use]
    pub const fn scores(&self) -> [u16; 2] {
        self.scores
    }

    /// Plays completed so far.
    #[must_use]
    pub const fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Identifier of the current drive.
    #[must_use]
    pub const fn drive_id(&self) -> u32 {
        self.drive_id
    }

    /// Whether a touchdown is waiting for its conversion kick.
    #[must_use]
    pub const fn awaiting_conversion(&self) -> bool {
        self.awaiting_conversion
    }

    /// Whether the final quarter has ended.
    #[must_use]
    pub const fn game_over(&self) -> bool {
        self.game_over
    }

    /// Ball spot as territory plus yard line.
    #[must_use]
    pub fn ball_spot(&self) -> BallSpot {
        let midfield = FIELD_LENGTH_YARDS / 2;
        let (territory, yard_line) = if self.field_position <= midfield {
            (self.possession, self.field_position)
        } else {
            (
                self.possession.opponent(),
                FIELD_LENGTH_YARDS - self.field_position,
            )
        };
        BallSpot {
            territory,
            yard_line: yard_line.clamp(0, midfield) as u8,
        }
    }

    pub(crate) fn run_clock(&mut self, dt: Duration) {
        self.clock_remaining = self.clock_remaining.saturating_sub(dt);
    }

    /// Applies a finished play: scores, turnovers, then down progression.
    pub(crate) fn apply_play(
        &mut self,
        result: &PlayResult,
        field: &FieldTuning,
        out_events: &mut Vec<Event>,
    ) {
        self.play_count = self.play_count.saturating_add(1);

        if let Some(kind) = result.turnover {
            let gaining = self.possession.opponent();
            if result.touchdown {
                self.score_touchdown(gaining, out_events);
                out_events.push(Event::Turnover {
                    kind,
                    team: gaining,
                });
                self.start_drive(gaining, FIELD_LENGTH_YARDS, field, out_events);
                return;
            }

            let mut spot = FIELD_LENGTH_YARDS - result.end_field_position;
            if spot <= 0 {
                spot = field.touchback_yard;
            }
            out_events.push(Event::Turnover {
                kind,
                team: gaining,
            });
            self.start_drive(gaining, spot, field, out_events);
            return;
        }

        let yards = if result.incomplete {
            0
        } else {
            result.yards_gained
        };
        self.apply_yards(yards, field, out_events);
    }

    /// Moves the ball `yards` for the offense and progresses the down.
    ///
    /// Goal lines are checked before the down changes.
    pub(crate) fn apply_yards(
        &mut self,
        yards: i32,
        field: &FieldTuning,
        out_events: &mut Vec<Event>,
    ) {
        let spot = self.field_position + yards;

        if spot >= FIELD_LENGTH_YARDS {
            self.field_position = FIELD_LENGTH_YARDS;
            self.score_touchdown(self.possession, out_events);
            return;
        }

        if spot <= 0 {
            let defense = self.possession.opponent();
            self.add_points(defense, 2, out_events);
            out_events.push(Event::Safety { team: defense });
            self.start_drive(defense, field.drive_start_yard, field, out_events);
            return;
        }

        self.field_position = spot;
        if yards >= self.yards_to_go {
            self.down = 1;
            self.yards_to_go = field.first_down_distance;
        } else {
            self.down = self.down.saturating_add(1);
            self.yards_to_go = (self.yards_to_go - yards).max(0);
        }

        if self.down > 4 {
            let defense = self.possession.opponent();
            out_events.push(Event::Turnover {
                kind: TurnoverKind::Downs,
                team: defense,
            });
            self.start_drive(defense, FIELD_LENGTH_YARDS - spot, field, out_events);
            return;
        }

        out_events.push(self.down_changed());
    }

    /// Resolves the conversion after a touchdown and kicks off.
    pub(crate) fn extra_point(
        &mut self,
        made: bool,
        field: &FieldTuning,
        out_events: &mut Vec<Event>,
    ) {
        if !self.awaiting_conversion {
            return;
        }
        self.awaiting_conversion = false;

        let team = self.possession;
        if made {
            self.add_points(team, 1, out_events);
        }
        out_events.push(Event::ExtraPoint { team, made });
        self.kickoff(field, out_events);
    }

    /// Resolves a field goal attempted from the current spot.
    pub(crate) fn field_goal(
        &mut self,
        made: bool,
        kick: &KickTuning,
        field: &FieldTuning,
        out_events: &mut Vec<Event>,
    ) {
        let team = self.possession;
        let distance = kick.field_goal_distance(self.field_position);
        self.play_count = self.play_count.saturating_add(1);
        out_events.push(Event::FieldGoal {
            team,
            distance,
            made,
        });

        if made {
            self.add_points(team, 3, out_events);
            self.kickoff(field, out_events);
        } else {
            let defense = team.opponent();
            out_events.push(Event::Turnover {
                kind: TurnoverKind::MissedFieldGoal,
                team: defense,
            });
            self.start_drive(
                defense,
                FIELD_LENGTH_YARDS - self.field_position,
                field,
                out_events,
            );
        }
    }

    /// Moves the ball back against the offense and replays the down.
    pub(crate) fn penalize(&mut self, kind: PenaltyKind, yards: i32, out_events: &mut Vec<Event>) {
        let enforced = yards.min(self.field_position - 1).max(0);
        self.field_position -= enforced;
        self.yards_to_go += enforced;
        out_events.push(Event::Penalty {
            kind,
            team: self.possession,
            yards: enforced,
        });
        out_events.push(self.down_changed());
    }

    /// Advances the quarter once the clock has run out.
    ///
    /// Deferred while a conversion is pending.
    pub(crate) fn end_of_play(
        &mut self,
        clock: &ClockTuning,
        field: &FieldTuning,
        out_events: &mut Vec<Event>,
    ) {
        if self.awaiting_conversion || self.game_over || !self.clock_remaining.is_zero() {
            return;
        }

        if self.quarter >= clock.quarters {
            self.game_over = true;
            out_events.push(Event::GameOver {
                scores: self.scores,
            });
            return;
        }

        self.quarter += 1;
        self.clock_remaining = clock.quarter_length();
        out_events.push(Event::QuarterChanged {
            quarter: self.quarter,
        });

        if self.quarter == clock.quarters / 2 + 1 {
            let receiving = self.opening_receiver.opponent();
            self.start_drive(receiving, field.drive_start_yard, field, out_events);
        }
    }

    fn kickoff(&mut self, field: &FieldTuning, out_events: &mut Vec<Event>) {
        let receiving = self.possession.opponent();
        self.start_drive(receiving, field.drive_start_yard, field, out_events);
    }

    fn score_touchdown(&mut self, team: TeamIndex, out_events: &mut Vec<Event>) {
        self.add_points(team, 6, out_events);
        out_events.push(Event::Touchdown { team });
        self.awaiting_conversion = true;
    }

    fn add_points(&mut self, team: TeamIndex, points: u16, out_events: &mut Vec<Event>) {
        let score = &mut self.scores[team.index()];
        *score = score.saturating_add(points);
        out_events.push(Event::ScoreChanged {
            scores: self.scores,
        });
    }

    fn start_drive(
        &mut self,
        team: TeamIndex,
        field_position: i32,
        field: &FieldTuning,
        out_events: &mut Vec<Event>,
    ) {
        self.field_position = field_position.clamp(1, FIELD_LENGTH_YARDS - 1);
        self.down = 1;
        self.yards_to_go = field.first_down_distance;
        self.drive_id = self.drive_id.saturating_add(1);

        if team != self.possession {
            self.possession = team;
            out_events.push(Event::PossessionChanged {
                team,
                field_position: self.field_position,
            });
        }
        if !self.awaiting_conversion {
            out_events.push(self.down_changed());
        }
    }

    fn down_changed(&self) -> Event {
        Event::DownChanged {
            down: self.down,
            yards_to_go: self.yards_to_go,
            field_position: self.field_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::{SimTuning, WhistleReason};

    fn state_at(field_position: i32, down: u8, yards_to_go: i32) -> MatchState {
        let tuning = SimTuning::default();
        let mut state = MatchState::new(TeamIndex::HOME, &tuning.clock, &tuning.field);
        state.field_position = field_position;
        state.down = down;
        state.yards_to_go = yards_to_go;
        state
    }

    fn tackle_result(start: i32, yards: i32) -> PlayResult {
        PlayResult {
            yards_gained: yards,
            start_field_position: start,
            end_field_position: start + yards,
            whistle: WhistleReason::Tackle,
            turnover: None,
            touchdown: false,
            safety: false,
            incomplete: false,
            scoring_team: None,
        }
    }

    fn interception_result(start: i32, end: i32) -> PlayResult {
        PlayResult {
            yards_gained: 0,
            start_field_position: start,
            end_field_position: end,
            whistle: WhistleReason::Tackle,
            turnover: Some(TurnoverKind::Interception),
            touchdown: false,
            safety: false,
            incomplete: false,
            scoring_team: None,
        }
    }

    fn touchdowns(events: &[Event]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, Event::Touchdown { .. }))
            .count()
    }

    #[test]
    fn short_gain_on_first_down_leaves_second_and_seven() {
        let field = FieldTuning::default();
        let mut state = state_at(25, 1, 10);
        let mut events = Vec::new();

        state.apply_play(&tackle_result(25, 3), &field, &mut events);

        assert_eq!(state.down(), 2);
        assert_eq!(state.yards_to_go(), 7);
        assert_eq!(state.field_position(), 28);
        assert_eq!(
            events,
            vec![Event::DownChanged {
                down: 2,
                yards_to_go: 7,
                field_position: 28,
            }]
        );
    }

    #[test]
    fn interception_tackled_inside_the_one_leaves_a_yard_to_go() {
        let field = FieldTuning::default();
        let mut state = state_at(40, 3, 6);
        let mut events = Vec::new();

        state.apply_play(&interception_result(40, 1), &field, &mut events);

        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), 99);
        assert_eq!(state.down(), 1);
        assert_eq!(state.scores(), [0, 0]);
        assert!(!state.awaiting_conversion());
        assert_eq!(touchdowns(&events), 0);
    }

    #[test]
    fn turnover_spotted_on_the_goal_line_starts_short_of_it() {
        let field = FieldTuning::default();
        let mut state = state_at(40, 2, 10);
        let mut events = Vec::new();

        state.apply_play(&interception_result(40, 0), &field, &mut events);
        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), FIELD_LENGTH_YARDS - 1);

        let mut incomplete = tackle_result(99, 0);
        incomplete.incomplete = true;
        incomplete.whistle = WhistleReason::Incomplete;
        state.apply_play(&incomplete, &field, &mut events);

        assert_eq!(state.scores(), [0, 0]);
        assert_eq!(state.down(), 2);
        assert_eq!(state.field_position(), 99);
        assert_eq!(touchdowns(&events), 0);
    }

    #[test]
    fn turnover_on_downs_at_the_ninety_nine_backs_the_defense_up() {
        let field = FieldTuning::default();
        let mut state = state_at(98, 4, 2);
        let mut events = Vec::new();

        state.apply_yards(1, &field, &mut events);

        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), 1);
        assert_eq!(state.down(), 1);
        assert_eq!(state.scores(), [0, 0]);
        assert_eq!(
            events[1],
            Event::PossessionChanged {
                team: TeamIndex::AWAY,
                field_position: 1,
            }
        );
    }

    #[test]
    fn reaching_the_line_to_gain_resets_the_down() {
        let field = FieldTuning::default();
        let mut state = state_at(40, 3, 4);
        let mut events = Vec::new();

        state.apply_yards(6, &field, &mut events);

        assert_eq!(state.down(), 1);
        assert_eq!(state.yards_to_go(), 10);
        assert_eq!(state.field_position(), 46);
    }

    #[test]
    fn failed_fourth_down_mirrors_the_spot_for_the_other_team() {
        let field = FieldTuning::default();
        let mut state = state_at(35, 4, 2);
        let mut events = Vec::new();

        state.apply_yards(1, &field, &mut events);

        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), 64);
        assert_eq!(state.down(), 1);
        assert_eq!(state.yards_to_go(), 10);
        assert_eq!(
            events[0],
            Event::Turnover {
                kind: TurnoverKind::Downs,
                team: TeamIndex::AWAY,
            }
        );
        assert_eq!(
            events[1],
            Event::PossessionChanged {
                team: TeamIndex::AWAY,
                field_position: 64,
            }
        );
    }

    #[test]
    fn crossing_the_goal_line_scores_regardless_of_down() {
        for down in 1..=4 {
            let field = FieldTuning::default();
            let mut state = state_at(90, down, 15);
            let mut events = Vec::new();

            state.apply_yards(12, &field, &mut events);

            assert_eq!(state.scores(), [6, 0]);
            assert!(state.awaiting_conversion());
            assert!(events.contains(&Event::Touchdown {
                team: TeamIndex::HOME
            }));
            assert!(!events
                .iter()
                .any(|event| matches!(event, Event::Turnover { .. })));
        }
    }

    #[test]
    fn downed_in_own_end_zone_is_a_safety() {
        let field = FieldTuning::default();
        let mut state = state_at(3, 2, 8);
        let mut events = Vec::new();

        state.apply_yards(-5, &field, &mut events);

        assert_eq!(state.scores(), [0, 2]);
        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), field.drive_start_yard);
        assert!(events.contains(&Event::Safety {
            team: TeamIndex::AWAY
        }));
    }

    #[test]
    fn conversion_then_kickoff_hands_the_ball_over() {
        let field = FieldTuning::default();
        let mut state = state_at(95, 1, 5);
        let mut events = Vec::new();
        state.apply_yards(5, &field, &mut events);
        events.clear();

        state.extra_point(true, &field, &mut events);

        assert_eq!(state.scores(), [7, 0]);
        assert!(!state.awaiting_conversion());
        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), field.drive_start_yard);
        assert_eq!(
            events[1],
            Event::ExtraPoint {
                team: TeamIndex::HOME,
                made: true,
            }
        );
    }

    #[test]
    fn interception_in_the_end_zone_is_a_touchback() {
        let field = FieldTuning::default();
        let mut state = state_at(70, 2, 10);
        let mut events = Vec::new();

        state.apply_play(&interception_result(70, 100), &field, &mut events);

        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), field.touchback_yard);
        assert_eq!(state.scores(), [0, 0]);
        assert!(events.contains(&Event::PossessionChanged {
            team: TeamIndex::AWAY,
            field_position: field.touchback_yard,
        }));
    }

    #[test]
    fn quarter_advances_only_when_the_clock_is_empty() {
        let tuning = SimTuning::default();
        let mut state = MatchState::new(TeamIndex::HOME, &tuning.clock, &tuning.field);
        let mut events = Vec::new();

        state.end_of_play(&tuning.clock, &tuning.field, &mut events);
        assert!(events.is_empty());

        state.run_clock(Duration::from_secs(400));
        state.end_of_play(&tuning.clock, &tuning.field, &mut events);
        assert_eq!(state.quarter(), 2);
        assert_eq!(events, vec![Event::QuarterChanged { quarter: 2 }]);
    }

    #[test]
    fn second_half_opens_with_the_other_receiver() {
        let tuning = SimTuning::default();
        let mut state = MatchState::new(TeamIndex::HOME, &tuning.clock, &tuning.field);
        state.quarter = 2;
        state.run_clock(Duration::from_secs(400));
        let mut events = Vec::new();

        state.end_of_play(&tuning.clock, &tuning.field, &mut events);

        assert_eq!(state.quarter(), 3);
        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert!(events.contains(&Event::PossessionChanged {
            team: TeamIndex::AWAY,
            field_position: tuning.field.drive_start_yard,
        }));
    }

    #[test]
    fn game_over_fires_once() {
        let tuning = SimTuning::default();
        let mut state = MatchState::new(TeamIndex::HOME, &tuning.clock, &tuning.field);
        state.quarter = tuning.clock.quarters;
        state.run_clock(Duration::from_secs(400));
        let mut events = Vec::new();

        state.end_of_play(&tuning.clock, &tuning.field, &mut events);
        state.end_of_play(&tuning.clock, &tuning.field, &mut events);

        assert!(state.game_over());
        assert_eq!(events, vec![Event::GameOver { scores: [0, 0] }]);
    }

    #[test]
    fn missed_field_goal_turns_over_at_the_mirrored_spot() {
        let tuning = SimTuning::default();
        let mut state = state_at(70, 4, 6);
        let mut events = Vec::new();

        state.field_goal(false, &tuning.kick, &tuning.field, &mut events);

        assert_eq!(state.possession(), TeamIndex::AWAY);
        assert_eq!(state.field_position(), 30);
        assert_eq!(
            events[0],
            Event::FieldGoal {
                team: TeamIndex::HOME,
                distance: 47,
                made: false,
            }
        );
    }

    #[test]
    fn delay_of_game_never_crosses_the_goal_line() {
        let mut state = state_at(3, 2, 7);
        let mut events = Vec::new();

        state.penalize(PenaltyKind::DelayOfGame, 5, &mut events);

        assert_eq!(state.field_position(), 1);
        assert_eq!(state.yards_to_go(), 9);
        assert_eq!(state.down(), 2);
    }

    #[test]
    fn ball_spot_reports_territory() {
        let state = state_at(64, 1, 10);
        assert_eq!(
            state.ball_spot(),
            BallSpot {
                territory: TeamIndex::AWAY,
                yard_line: 36,
            }
        );
    }
}
