//! Unit tests for arena-strategy.

use std::sync::Arc;

use arena_agent::{AgentHandle, ArenaRules, Capabilities, CommandQueue, Role, TurnClose, World};
use arena_core::{AgentId, AgentRng, Bounds, Point, TeamId};

use crate::{
    AlwaysWait, Color, MovementFn, PlacementFn, RandomPlacement, RandomWalk, Submission, Team,
    check_name,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn world_with_one_prey() -> World {
    let mut w = World::new(Bounds::centered(700.0, 700.0), 30.0);
    w.spawn(TeamId(0), Role::Prey, Point::new(0.0, 0.0), 9.0);
    w
}

/// Run `f` once for agent 0 and report how the turn closed plus final energy.
fn run_once(f: &dyn MovementFn, rng: &mut AgentRng) -> (TurnClose, f64) {
    let world = Arc::new(world_with_one_prey());
    let queue = Arc::new(CommandQueue::new(1, 5.0));
    let caps: Arc<dyn Capabilities> =
        Arc::new(ArenaRules::new(*world.bounds(), 10.0, 30.0));
    let ticket = queue.open_turn(AgentId(0));
    let handle = AgentHandle::new(Arc::clone(&world), Arc::clone(&queue), caps, ticket);
    f.decide(&handle, &world, rng);
    let close = queue.close_turn(ticket);
    (close, queue.energy(AgentId(0)))
}

#[cfg(test)]
mod color_tests {
    use super::*;

    #[test]
    fn named_and_rgb_shapes() {
        assert!(Color::named("red").validate().is_ok());
        assert!(Color::named("   ").validate().is_err());
        assert!(Color::Rgb(0.0, 0.5, 1.0).validate().is_ok());
        assert!(Color::Rgb(0.0, 1.5, 0.0).validate().is_err());
        assert!(Color::Rgb(f64::NAN, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn default_is_blue() {
        assert_eq!(Color::default(), Color::named("blue"));
        assert_eq!(Color::from((0.1, 0.2, 0.3)), Color::Rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(check_name("Sharks").is_ok());
        assert!(check_name("").is_err());
        assert!(check_name(" \t").is_err());
    }
}

#[cfg(test)]
mod team_tests {
    use super::*;

    #[test]
    fn submission_builder_sets_fields() {
        let s = Submission::new()
            .team_name("Owls")
            .prey_color("green")
            .predator_movement(AlwaysWait);
        assert_eq!(s.team_name.as_deref(), Some("Owls"));
        assert_eq!(s.prey_color, Some(Color::named("green")));
        assert!(s.predator_color.is_none());
        assert!(s.predator_movement.is_some());
        assert!(s.prey_movement.is_none());
    }

    #[test]
    fn fallback_team_uses_defaults() {
        let t = Team::default();
        assert_eq!(t.name, "Untitled Team");
        assert_eq!(t.color(Role::Prey), &Color::named("blue"));
        assert_eq!(t.color(Role::Predator), &Color::named("blue"));
    }

    #[test]
    fn closures_are_strategies() {
        let t = Team::fallback("Corner")
            .with_placement(Role::Prey, |_w: &World, i: usize, _r: &mut AgentRng| (i as f64, -1.0));
        let w = world_with_one_prey();
        let mut rng = AgentRng::new(0, AgentId(0));
        assert_eq!(t.placement(Role::Prey).place(&w, 3, &mut rng), (3.0, -1.0));
    }
}

#[cfg(test)]
mod default_tests {
    use super::*;

    #[test]
    fn random_placement_stays_in_bounds() {
        let w = world_with_one_prey();
        let mut rng = AgentRng::new(9, AgentId(0));
        for i in 0..100 {
            let (x, y) = RandomPlacement.place(&w, i, &mut rng);
            assert!(w.bounds().contains(Point::new(x, y)));
        }
    }

    #[test]
    fn random_walk_always_acts() {
        let mut rng = AgentRng::new(3, AgentId(0));
        for _ in 0..50 {
            let (close, energy) = run_once(&RandomWalk, &mut rng);
            assert!(matches!(close, TurnClose::Acted(_)));
            assert!(energy >= 0.0);
        }
    }

    #[test]
    fn always_wait_rests() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let (close, energy) = run_once(&AlwaysWait, &mut rng);
        assert_eq!(close, TurnClose::Acted(arena_agent::Primitive::Wait));
        assert_eq!(energy, 15.0);
    }
}
