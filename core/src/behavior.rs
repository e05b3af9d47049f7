//! Closed behavior variants and the per-entity push-down stack.

use thiserror::Error;

use crate::{EntityId, Vec2};

/// Per-entity behaviors that drive steering and transitions each tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Behavior {
    /// Stands still and never completes.
    Hold,
    /// Runs an ordered, finite list of waypoints exactly once.
    RouteRunner {
        /// Absolute waypoints in field coordinates.
        waypoints: Vec<Vec2>,
        /// Index of the waypoint currently being approached.
        next: usize,
    },
    /// Guards an anchor point and steps into rushers that come near it.
    PassBlock {
        /// Field position the blocker protects.
        anchor: Vec2,
    },
    /// Chases the ball carrier, or the ball when nobody holds it.
    PassRush,
    /// Shadows a receiver from the defended end zone side.
    ManCoverage {
        /// Offensive entity being covered.
        target: EntityId,
        /// Distance kept between the target and the defender.
        cushion: f32,
    },
    /// Chases the opposing carrier or the free ball.
    Pursuit {
        /// Ticks remaining before another tackle attempt may start.
        cooldown_ticks: u32,
    },
    /// Locked in a grapple with the partner entity.
    Grapple {
        /// Opposing entity in the engagement.
        partner: EntityId,
    },
    /// Commits to tackling the provided carrier.
    TackleAttempt {
        /// Carrier the defender is trying to bring down.
        target: EntityId,
    },
    /// Drops back from the line before throwing.
    QuarterbackDrop {
        /// Ticks of drop left before the throw.
        remaining_ticks: u32,
        /// Intended receiver, if the play names one.
        primary: Option<EntityId>,
    },
    /// Moves to the spot a pass is thrown to.
    ReceivePass {
        /// Landing point of the pass.
        spot: Vec2,
    },
    /// Runs with the ball toward the attacked goal line.
    BallCarrier,
}

impl Behavior {
    /// Short lowercase label used in logs and summaries.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::RouteRunner { .. } => "route_runner",
            Self::PassBlock { .. } => "pass_block",
            Self::PassRush => "pass_rush",
            Self::ManCoverage { .. } => "man_coverage",
            Self::Pursuit { .. } => "pursuit",
            Self::Grapple { .. } => "grapple",
            Self::TackleAttempt { .. } => "tackle_attempt",
            Self::QuarterbackDrop { .. } => "quarterback_drop",
            Self::ReceivePass { .. } => "receive_pass",
            Self::BallCarrier => "ball_carrier",
        }
    }
}

/// Transition requested by a behavior after its per-tick update.
#[derive(Clone, Debug, PartialEq)]
pub enum BehaviorResult {
    /// Leave the stack untouched.
    Continue,
    /// Pop the current behavior.
    Complete,
    /// Replace the current behavior.
    SwitchTo(Behavior),
    /// Interrupt the current behavior with a new one on top.
    Push(Behavior),
    /// Pop the current behavior and resume the one beneath it.
    PopAndContinue,
}

/// Failures raised when a transition would break the stack contract.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BehaviorStackError {
    /// Popping would leave an acting entity without any behavior.
    #[error("behavior stack would underflow")]
    Underflow,
}

/// Array-backed LIFO of behaviors owned by a single entity.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorStack {
    frames: Vec<Behavior>,
}

impl BehaviorStack {
    /// Creates a stack holding a single base behavior.
    #[must_use]
    pub fn new(base: Behavior) -> Self {
        Self { frames: vec![base] }
    }

    /// Creates a stack from frames listed bottom first.
    ///
    /// Returns `None` when no frame is provided.
    #[must_use]
    pub fn from_frames(frames: Vec<Behavior>) -> Option<Self> {
        if frames.is_empty() {
            None
        } else {
            Some(Self { frames })
        }
    }

    /// Behavior currently on top of the stack.
    #[must_use]
    pub fn top(&self) -> &Behavior {
        // Constructors and `apply` keep at least one frame.
        &self.frames[self.frames.len() - 1]
    }

    /// Number of frames on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames in bottom-to-top order.
    #[must_use]
    pub fn frames(&self) -> &[Behavior] {
        &self.frames
    }

    /// Replaces the top behavior in place without a transition.
    pub fn replace_top(&mut self, behavior: Behavior) {
        if let Some(top) = self.frames.last_mut() {
            *top = behavior;
        }
    }

    /// Applies a transition result to the stack.
    pub fn apply(&mut self, result: BehaviorResult) -> Result<(), BehaviorStackError> {
        match result {
            BehaviorResult::Continue => {}
            BehaviorResult::Complete | BehaviorResult::PopAndContinue => {
                if self.frames.len() <= 1 {
                    return Err(BehaviorStackError::Underflow);
                }
                let _ = self.frames.pop();
            }
            BehaviorResult::SwitchTo(behavior) => self.replace_top(behavior),
            BehaviorResult::Push(behavior) => self.frames.push(behavior),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_restores_previous_depth() {
        let mut stack = BehaviorStack::new(Behavior::Pursuit { cooldown_ticks: 0 });
        stack
            .apply(BehaviorResult::Push(Behavior::TackleAttempt {
                target: EntityId::new(4),
            }))
            .expect("push");
        assert_eq!(stack.depth(), 2);

        stack.apply(BehaviorResult::Complete).expect("complete");
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), &Behavior::Pursuit { cooldown_ticks: 0 });
    }

    #[test]
    fn switch_replaces_only_the_top() {
        let mut stack =
            BehaviorStack::from_frames(vec![Behavior::Hold, Behavior::PassRush]).expect("frames");
        stack
            .apply(BehaviorResult::SwitchTo(Behavior::BallCarrier))
            .expect("switch");
        assert_eq!(stack.frames(), &[Behavior::Hold, Behavior::BallCarrier]);
    }

    #[test]
    fn last_frame_cannot_be_popped() {
        let mut stack = BehaviorStack::new(Behavior::Hold);
        assert_eq!(
            stack.apply(BehaviorResult::PopAndContinue),
            Err(BehaviorStackError::Underflow)
        );
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert!(BehaviorStack::from_frames(Vec::new()).is_none());
    }
}
