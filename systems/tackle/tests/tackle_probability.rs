use gridiron_core::TackleTuning;
use gridiron_system_tackle::roll_tackle;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #[test]
    fn success_never_drops_as_hitting_power_advantage_grows(
        defender in 0_u8..=99,
        carrier in 0_u8..=100,
        speed in 0_u8..=100,
    ) {
        let tuning = TackleTuning::default();
        let weaker = tuning.success_chance(defender, carrier, speed);
        let stronger = tuning.success_chance(defender + 1, carrier, speed);
        prop_assert!(stronger >= weaker);
    }

    #[test]
    fn success_never_rises_with_carrier_speed(
        defender in 0_u8..=100,
        carrier in 0_u8..=100,
        speed in 0_u8..=99,
    ) {
        let tuning = TackleTuning::default();
        let slower = tuning.success_chance(defender, carrier, speed);
        let faster = tuning.success_chance(defender, carrier, speed + 1);
        prop_assert!(faster <= slower);
    }

    #[test]
    fn success_chance_is_a_probability(
        defender in any::<u8>(),
        carrier in any::<u8>(),
        speed in any::<u8>(),
    ) {
        let chance = TackleTuning::default().success_chance(defender, carrier, speed);
        prop_assert!((0.0..=1.0).contains(&chance));
    }
}

#[test]
fn roll_rate_tracks_the_chance() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let chance = TackleTuning::default().success_chance(60, 50, 40);
    let successes = (0..10_000).filter(|_| roll_tackle(chance, &mut rng)).count();
    let observed = successes as f32 / 10_000.0;
    assert!((observed - chance).abs() < 0.03, "observed {observed}, expected {chance}");
}
