#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Non-momentum movement integration.
//!
//! A zero steering direction stops a player instantly. Otherwise velocity
//! closes a fixed fraction of the gap to `direction * max_speed` each tick,
//! which gives snap turns and a short ramp to top speed.

use gridiron_core::{Command, EntitySnapshot, EntityView, MovementTuning, OnFieldState, Vec2};

/// Pure system that integrates steering into positions.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Emits one `MoveEntity` per player while the play is live.
    pub fn handle(
        &self,
        on_field: OnFieldState,
        entities: &EntityView,
        tuning: &MovementTuning,
        out: &mut Vec<Command>,
    ) {
        if on_field != OnFieldState::LivePlay {
            return;
        }

        for entity in entities.iter() {
            let (velocity, position) = step(entity, tuning);
            out.push(Command::MoveEntity {
                entity: entity.id,
                velocity,
                position,
            });
        }
    }
}

fn step(entity: &EntitySnapshot, tuning: &MovementTuning) -> (Vec2, Vec2) {
    if entity.engagement.is_some() || entity.tackled {
        return (Vec2::ZERO, entity.position);
    }

    integrate(
        entity.position,
        entity.velocity,
        entity.steering,
        tuning.max_speed(entity.ratings.max_speed),
        tuning.acceleration(entity.ratings.running_speed),
    )
}

/// Integrates one tick, returning `(velocity, position)`.
#[must_use]
pub fn integrate(
    position: Vec2,
    velocity: Vec2,
    direction: Vec2,
    max_speed: f32,
    acceleration: f32,
) -> (Vec2, Vec2) {
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return (Vec2::ZERO, position);
    }

    let desired = direction * max_speed;
    let velocity = velocity.lerp(desired, acceleration.clamp(0.0, 1.0));
    (velocity, position + velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_direction_stops_instantly() {
        let (velocity, position) =
            integrate(Vec2::new(10.0, 10.0), Vec2::new(5.0, 0.0), Vec2::ZERO, 6.0, 0.3);
        assert_eq!(velocity, Vec2::ZERO);
        assert_eq!(position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn velocity_ramps_toward_max_speed() {
        let mut velocity = Vec2::ZERO;
        let mut position = Vec2::ZERO;
        let mut previous = 0.0;
        for _ in 0..10 {
            (velocity, position) = integrate(position, velocity, Vec2::X, 6.0, 0.25);
            assert!(velocity.x > previous);
            assert!(velocity.x <= 6.0);
            previous = velocity.x;
        }
        assert!(position.x > 0.0);
    }

    #[test]
    fn turning_redirects_without_coasting() {
        let (velocity, _) = integrate(Vec2::ZERO, Vec2::new(6.0, 0.0), Vec2::NEG_X, 6.0, 1.0);
        assert_eq!(velocity, Vec2::new(-6.0, 0.0));
    }

    #[test]
    fn unnormalised_directions_are_normalised() {
        let (velocity, _) = integrate(Vec2::ZERO, Vec2::ZERO, Vec2::new(0.0, 10.0), 4.0, 1.0);
        assert!((velocity.length() - 4.0).abs() < 1e-5);
    }
}
