//! Unit tests for arena-sandbox.

use std::thread;
use std::time::Duration;

use arena_agent::{AgentHandle, World};
use arena_core::{AgentRng, MatchConfig};

use crate::{Check, SandboxOutcome, SandboxRunner, StrategyValidator};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn quick_config() -> MatchConfig {
    MatchConfig {
        trial_count: 5,
        poll_interval_ms: 5,
        placement_trial_timeout_ms: 100,
        movement_trial_timeout_ms: 100,
        ..MatchConfig::default()
    }
}

fn hang_forever() {
    loop {
        thread::sleep(Duration::from_millis(10));
    }
}

fn stuck_movement(_agent: &AgentHandle, _world: &World, _rng: &mut AgentRng) {
    hang_forever()
}

fn panicking_movement(_agent: &AgentHandle, _world: &World, _rng: &mut AgentRng) {
    panic!("strategy bug")
}

fn polite_movement(agent: &AgentHandle, _world: &World, _rng: &mut AgentRng) {
    agent.forward(2.0);
}

fn stuck_placement(_world: &World, _index: usize, _rng: &mut AgentRng) -> (f64, f64) {
    hang_forever();
    (0.0, 0.0)
}

fn corner_placement(world: &World, _index: usize, _rng: &mut AgentRng) -> (f64, f64) {
    (world.bounds().min_x + 1.0, world.bounds().min_y + 1.0)
}

fn quick_runner() -> SandboxRunner {
    SandboxRunner::new(Duration::from_millis(100), Duration::from_millis(5))
}

#[cfg(test)]
mod runner_tests {
    use super::*;

    #[test]
    fn returns_value() {
        let out = quick_runner().run("sum", || 2 + 2).unwrap();
        assert_eq!(out, SandboxOutcome::Completed(4));
    }

    #[test]
    fn panic_is_contained() {
        let out = quick_runner().run("boom", || -> u8 { panic!("kaboom") }).unwrap();
        assert_eq!(out, SandboxOutcome::Faulted("kaboom".into()));
    }

    #[test]
    fn overrun_times_out() {
        let out = quick_runner().run("stuck", hang_forever).unwrap();
        assert!(out.is_timeout());
    }

    #[test]
    fn signal_finishes_early() {
        let runner = SandboxRunner::new(Duration::from_secs(5), Duration::from_millis(5));
        let out = runner.run_until("signalled", hang_forever, || true).unwrap();
        assert_eq!(out, SandboxOutcome::Completed(None));
    }
}

#[cfg(test)]
mod validator_tests {
    use super::*;
    use arena_strategy::{Color, Submission};

    #[test]
    fn complete_submission_is_admitted_as_is() {
        let mut v = StrategyValidator::new(&quick_config());
        let s = Submission::new()
            .team_name("Herons")
            .prey_color((0.2, 0.4, 0.6))
            .predator_color("red")
            .prey_placement(corner_placement)
            .predator_placement(corner_placement)
            .prey_movement(polite_movement)
            .predator_movement(polite_movement);
        let a = v.admit(s).unwrap();
        assert!(a.is_clean(), "{:?}", a.rejections);
        assert_eq!(a.team.name, "Herons");
        assert_eq!(a.team.predator_color, Color::named("red"));
    }

    #[test]
    fn empty_submission_gets_every_default() {
        let mut v = StrategyValidator::new(&quick_config());
        let a = v.admit(Submission::new()).unwrap();
        assert_eq!(a.rejections.len(), 7);
        assert_eq!(a.team.name, "Untitled Team");
        assert_eq!(a.team.prey_color, Color::named("blue"));
    }

    #[test]
    fn malformed_fields_are_replaced() {
        let mut v = StrategyValidator::new(&quick_config());
        let s = Submission::new()
            .team_name("  ")
            .prey_color((2.0, 0.0, 0.0))
            .predator_color("green")
            .prey_placement(corner_placement)
            .predator_placement(corner_placement)
            .prey_movement(polite_movement)
            .predator_movement(polite_movement);
        let a = v.admit(s).unwrap();
        let checks: Vec<_> = a.rejections.iter().map(|r| r.check).collect();
        assert_eq!(checks, vec![Check::TeamName, Check::PreyColor]);
        assert_eq!(a.team.prey_color, Color::named("blue"));
        assert_eq!(a.team.predator_color, Color::named("green"));
    }

    #[test]
    fn never_returning_movement_is_rejected() {
        let mut v = StrategyValidator::new(&quick_config());
        let s = Submission::new()
            .team_name("Sloths")
            .prey_color("brown")
            .predator_color("brown")
            .prey_placement(corner_placement)
            .predator_placement(corner_placement)
            .prey_movement(stuck_movement)
            .predator_movement(polite_movement);
        let a = v.admit(s).unwrap();
        assert_eq!(a.rejections.len(), 1);
        assert_eq!(a.rejections[0].check, Check::PreyMovement);
        assert_eq!(a.rejections[0].check.role(), Some(arena_agent::Role::Prey));
        assert!(a.rejections[0].reason.contains("exceeded"));
    }

    #[test]
    fn never_returning_placement_is_rejected() {
        let mut v = StrategyValidator::new(&quick_config());
        let s = Submission::new()
            .team_name("Moles")
            .prey_color("grey")
            .predator_color("grey")
            .prey_placement(corner_placement)
            .predator_placement(stuck_placement)
            .prey_movement(polite_movement)
            .predator_movement(polite_movement);
        let a = v.admit(s).unwrap();
        let checks: Vec<_> = a.rejections.iter().map(|r| r.check).collect();
        assert_eq!(checks, vec![Check::PredatorPlacement]);
    }

    #[test]
    fn panicking_movement_is_admitted() {
        let mut v = StrategyValidator::new(&quick_config());
        let s = Submission::new()
            .team_name("Gremlins")
            .prey_color("black")
            .predator_color("black")
            .prey_placement(corner_placement)
            .predator_placement(corner_placement)
            .prey_movement(polite_movement)
            .predator_movement(panicking_movement);
        let a = v.admit(s).unwrap();
        assert!(a.is_clean());
    }
}
