//! Property-based tests for provisioning runs.
//!
//! Every scenario run already checks the run invariants; these properties
//! drive it across arbitrary roster sizes, seeds and success rates, and check
//! that runs are reproducible from their seed.

use provisio_core::{ConnectionStatus, NetworkCredentials, ProvisioningSimulator, SeededEnv};
use provisio_harness::{Scenario, ScenarioOutcome};
use proptest::prelude::*;

fn run(devices: u32, seed: u64, rate: f64) -> Result<ScenarioOutcome, TestCaseError> {
    Scenario::new()
        .with_devices(devices)
        .with_seed(seed)
        .with_success_rate(rate)
        .run()
        .map_err(|e| TestCaseError::fail(e.to_string()))
}

proptest! {
    #[test]
    fn prop_invariants_hold(devices in 0u32..200, seed in any::<u64>(), rate in 0.0f64..=1.0) {
        let outcome = run(devices, seed, rate)?;

        prop_assert_eq!(outcome.after_initial.len(), devices as usize);
        prop_assert_eq!(outcome.log.len(), devices as usize + outcome.failed_after_initial());
        prop_assert_eq!(outcome.summary.disconnected, 0);
        prop_assert_eq!(outcome.summary.retried, outcome.failed_after_initial());
    }

    #[test]
    fn prop_same_seed_same_run(devices in 0u32..100, seed in any::<u64>()) {
        let first = run(devices, seed, 0.8)?;
        let second = run(devices, seed, 0.8)?;

        // PROPERTY: Determinism - same inputs produce same outputs
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_roster_ids_are_sequential(devices in 0u32..500) {
        let sim = ProvisioningSimulator::new(
            NetworkCredentials::new("HomeNet", "secret"),
            devices,
            SeededEnv::with_seed(0),
        );

        prop_assert_eq!(sim.device_count(), devices as usize);
        for (i, device) in sim.devices().iter().enumerate() {
            prop_assert_eq!(device.id().to_string(), format!("device_{}", i + 1));
            prop_assert_eq!(device.status(), ConnectionStatus::Disconnected);
        }
    }
}

#[test]
fn success_rate_is_roughly_eighty_percent() {
    let outcome = Scenario::new().with_devices(10_000).with_seed(2024).run().unwrap();

    let connected_first_try =
        outcome.after_initial.iter().filter(|&&s| s == ConnectionStatus::Connected).count();

    // 10k Bernoulli(0.8) trials: sd is 40, so +/-400 is ten sigma.
    assert!(
        (7_600..=8_400).contains(&connected_first_try),
        "{connected_first_try} of 10000 connected on the first try"
    );
}
