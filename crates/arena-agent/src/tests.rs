//! Unit tests for arena-agent.

use std::sync::Arc;

use arena_core::{AgentId, Bounds, Point, TeamId};

use crate::{ArenaRules, Capabilities, CommandQueue, Role, World};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn rules() -> ArenaRules {
    ArenaRules::new(Bounds::centered(700.0, 700.0), 10.0, 30.0)
}

fn world() -> World {
    World::new(Bounds::centered(700.0, 700.0), 30.0)
}

#[cfg(test)]
mod queue_tests {
    use super::*;
    use crate::{Command, Motion, Primitive, TurnClose};

    #[test]
    fn forward_is_bounded_by_energy_and_speed() {
        // energy 5, forward(20), max speed 9 → displacement 5, energy 0.
        let q = CommandQueue::new(1, 5.0);
        let t = q.open_turn(AgentId(0));
        assert!(q.act(t, Primitive::Forward, 20.0, 9.0));
        assert_eq!(q.energy(AgentId(0)), 0.0);
        assert_eq!(q.drain(), vec![Command { agent: AgentId(0), motion: Motion::Forward(5.0) }]);

        // The implicit wait lands when the turn closes.
        assert_eq!(q.close_turn(t), TurnClose::Acted(Primitive::Forward));
        assert_eq!(q.energy(AgentId(0)), 5.0);
    }

    #[test]
    fn forward_is_bounded_by_max_speed() {
        let q = CommandQueue::new(1, 50.0);
        let t = q.open_turn(AgentId(0));
        q.act(t, Primitive::Backward, 20.0, 9.0);
        assert_eq!(q.energy(AgentId(0)), 41.0);
        assert_eq!(q.drain()[0].motion, Motion::Backward(9.0));
    }

    #[test]
    fn negative_and_nan_speeds_clamp_to_zero() {
        let q = CommandQueue::new(2, 5.0);
        let a = q.open_turn(AgentId(0));
        let b = q.open_turn(AgentId(1));
        q.act(a, Primitive::Forward, -10.0, 9.0);
        q.act(b, Primitive::Forward, f64::NAN, 9.0);
        assert_eq!(q.energy(AgentId(0)), 5.0);
        assert_eq!(q.energy(AgentId(1)), 5.0);
        let drained = q.drain();
        assert!(drained.iter().all(|c| c.motion == Motion::Forward(0.0)));
    }

    #[test]
    fn wait_gives_bonus_and_enqueues_nothing() {
        let q = CommandQueue::new(1, 5.0);
        let t = q.open_turn(AgentId(0));
        q.act(t, Primitive::Wait, 0.0, 9.0);
        assert!(q.is_empty());
        assert_eq!(q.close_turn(t), TurnClose::Acted(Primitive::Wait));
        assert_eq!(q.energy(AgentId(0)), 15.0);
    }

    #[test]
    fn turn_without_energy_still_ends_tick() {
        let q = CommandQueue::new(1, 0.5);
        let t = q.open_turn(AgentId(0));
        assert!(q.act(t, Primitive::Left, 45.0, 9.0));
        assert!(q.is_empty(), "could not afford the turn");
        assert!(!q.act(t, Primitive::Forward, 1.0, 9.0), "tick already used");
        assert_eq!(q.close_turn(t), TurnClose::Acted(Primitive::Left));
        assert_eq!(q.energy(AgentId(0)), 5.5);
    }

    #[test]
    fn set_heading_is_reduced_mod_360() {
        let q = CommandQueue::new(1, 5.0);
        let t = q.open_turn(AgentId(0));
        q.act(t, Primitive::SetHeading, 450.0, 9.0);
        assert_eq!(q.energy(AgentId(0)), 4.0);
        assert_eq!(q.drain()[0].motion, Motion::SetHeading(90.0));
    }

    #[test]
    fn only_first_action_counts() {
        let q = CommandQueue::new(1, 20.0);
        let t = q.open_turn(AgentId(0));
        assert!(q.act(t, Primitive::Right, 10.0, 9.0));
        assert!(!q.act(t, Primitive::Forward, 9.0, 9.0));
        assert!(!q.act(t, Primitive::Wait, 0.0, 9.0));
        assert_eq!(q.len(), 1);
        assert_eq!(q.energy(AgentId(0)), 19.0);
    }

    #[test]
    fn silent_turn_is_forced_to_wait() {
        let q = CommandQueue::new(1, 5.0);
        let t = q.open_turn(AgentId(0));
        assert_eq!(q.close_turn(t), TurnClose::Forced);
        assert_eq!(q.energy(AgentId(0)), 15.0);
        assert_eq!(q.close_turn(t), TurnClose::AlreadyClosed);
    }

    #[test]
    fn stale_ticket_has_no_effect() {
        let q = CommandQueue::new(1, 5.0);
        let old = q.open_turn(AgentId(0));
        q.close_turn(old);
        let fresh = q.open_turn(AgentId(0));
        assert!(!q.act(old, Primitive::Forward, 5.0, 9.0));
        assert_eq!(q.close_turn(old), TurnClose::AlreadyClosed);
        assert!(q.is_empty());
        assert!(!q.has_acted(fresh));
    }

    #[test]
    fn meal_flag_lasts_until_next_wait() {
        let q = CommandQueue::new(1, 0.0);
        q.credit_meal(AgentId(0));
        assert_eq!(q.energy(AgentId(0)), 10.0);
        assert!(q.just_ate(AgentId(0)));

        let t = q.open_turn(AgentId(0));
        assert!(q.just_ate(AgentId(0)), "visible during the following decide phase");
        q.act(t, Primitive::Forward, 3.0, 12.0);
        q.close_turn(t);
        assert!(!q.just_ate(AgentId(0)));
    }

    #[test]
    fn drain_preserves_enqueue_order() {
        let q = CommandQueue::new(3, 10.0);
        for i in [2u32, 0, 1] {
            let t = q.open_turn(AgentId(i));
            q.act(t, Primitive::Forward, 1.0, 9.0);
        }
        let order: Vec<_> = q.drain().into_iter().map(|c| c.agent.0).collect();
        assert_eq!(order, vec![2, 0, 1]);
        assert!(q.is_empty());
    }
}

#[cfg(test)]
mod agent_tests {
    use super::*;
    use crate::{Agent, Motion};

    fn agent_at(x: f64, y: f64) -> Agent {
        Agent::new(AgentId(0), TeamId(0), Role::Prey, Point::new(x, y), 9.0)
    }

    #[test]
    fn motions_change_position_and_heading() {
        let mut a = agent_at(0.0, 0.0);
        a.apply(Motion::Forward(5.0));
        assert!((a.position().x - 5.0).abs() < 1e-9);

        a.apply(Motion::Left(90.0));
        assert!((a.heading() - 90.0).abs() < 1e-9);
        a.apply(Motion::Backward(2.0));
        assert!((a.position().y + 2.0).abs() < 1e-9);

        a.apply(Motion::Right(180.0));
        assert!((a.heading() - 270.0).abs() < 1e-9);
        a.apply(Motion::SetHeading(-30.0));
        assert!((a.heading() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn correction_primitives_follow_capabilities() {
        let rules = rules();
        let mut inside = agent_at(0.0, 0.0);

        // Before kick-off anything may be moved.
        assert!(inside.goto_boundary(Point::new(1.0, 1.0), &rules).is_ok());

        rules.start();
        assert!(inside.goto_boundary(Point::new(2.0, 2.0), &rules).is_err());
        assert!(inside.force_heading(90.0, &rules).is_err());

        let mut outside = agent_at(400.0, 0.0);
        assert!(outside.force_heading(180.0, &rules).is_ok());
        assert!(outside.goto_boundary(Point::new(350.0, 0.0), &rules).is_ok());
        assert_eq!(outside.position(), Point::new(350.0, 0.0));
    }
}

#[cfg(test)]
mod proximity_tests {
    use crate::{Proximity, RelativeLocation};
    use arena_core::AgentId;

    fn loc(distance: f64, id: u32) -> RelativeLocation {
        RelativeLocation { angle: 0.0, distance, other: AgentId(id) }
    }

    #[test]
    fn empty_lists_return_sentinel() {
        let p = Proximity::default();
        assert!(p.closest_enemy_prey().is_sentinel());
        assert_eq!(p.closest_ally_predator(), RelativeLocation::SENTINEL);
        assert_eq!(p.closest_enemy_predator().distance(), 1.0);
    }

    #[test]
    fn sort_orders_by_distance_and_retain_filters() {
        let mut p = Proximity::default();
        p.enemy_prey = vec![loc(30.0, 1), loc(5.0, 2), loc(12.0, 3)];
        p.sort();
        let ds: Vec<_> = p.enemy_prey.iter().map(|l| l.distance).collect();
        assert_eq!(ds, vec![5.0, 12.0, 30.0]);
        assert_eq!(p.closest_enemy_prey().other, AgentId(2));

        p.retain(|id| id != AgentId(2));
        assert_eq!(p.closest_enemy_prey().other, AgentId(3));
        assert_eq!(p.len(), 2);
    }
}

#[cfg(test)]
mod world_tests {
    use super::*;

    #[test]
    fn spawn_fills_registries() {
        let mut w = world();
        let a = w.spawn(TeamId(0), Role::Prey, Point::new(0.0, 0.0), 9.0);
        let b = w.spawn(TeamId(0), Role::Predator, Point::new(1.0, 0.0), 12.0);
        let c = w.spawn(TeamId(1), Role::Prey, Point::new(2.0, 0.0), 9.0);
        assert_eq!(w.living(), &[a, b, c]);
        assert_eq!(w.living_prey(), &[a, c]);
        assert_eq!(w.living_predators(), &[b]);
        assert_eq!(w.live_prey_count(TeamId(0)), 1);
    }

    #[test]
    fn eliminate_removes_everywhere_once() {
        let mut w = world();
        let a = w.spawn(TeamId(0), Role::Prey, Point::new(0.0, 0.0), 9.0);
        let b = w.spawn(TeamId(1), Role::Predator, Point::new(1.0, 0.0), 12.0);
        assert!(w.eliminate(a).unwrap());
        assert!(!w.eliminate(a).unwrap());
        assert_eq!(w.living(), &[b]);
        assert!(w.living_prey().is_empty());
        let dead = w.agent(a).unwrap();
        assert!(!dead.is_alive());
        assert!(!dead.is_visible());
        assert!(w.eliminate(AgentId(99)).is_err());
    }

    #[test]
    fn random_location_is_in_bounds() {
        let w = world();
        let mut rng = arena_core::SimRng::new(1);
        for _ in 0..200 {
            assert!(w.bounds().contains(w.random_location(&mut rng)));
        }
    }
}

#[cfg(test)]
mod capability_tests {
    use super::*;
    use crate::{Agent, Corner, Edge};

    fn at(team: u16, role: Role, x: f64, y: f64) -> Agent {
        Agent::new(AgentId(0), TeamId(team), role, Point::new(x, y), 9.0)
    }

    #[test]
    fn edges_and_corners() {
        let r = rules();
        let a = at(0, Role::Prey, -345.0, 346.0);
        assert!(r.near_edge(&a, Edge::Left));
        assert!(r.near_edge(&a, Edge::Top));
        assert!(!r.near_edge(&a, Edge::Right));
        assert!(!r.near_edge(&a, Edge::Bottom));
        assert!(r.in_corner(&a, Corner::TopLeft));
        assert!(!r.in_corner(&a, Corner::BottomLeft));
    }

    #[test]
    fn can_eat_requires_enemy_prey_inside_radius() {
        let r = rules();
        let predator = at(0, Role::Predator, 0.0, 0.0);
        assert!(r.can_eat(&predator, &at(1, Role::Prey, 10.0, 0.0)));
        assert!(!r.can_eat(&predator, &at(1, Role::Prey, 30.0, 0.0)), "strictly less than radius");
        assert!(!r.can_eat(&predator, &at(0, Role::Prey, 10.0, 0.0)), "same team");
        assert!(!r.can_eat(&predator, &at(1, Role::Predator, 10.0, 0.0)));
    }

    #[test]
    fn game_over_flag() {
        let r = rules();
        assert!(!r.is_game_over());
        r.set_game_over(true);
        assert!(r.is_game_over());
    }
}

#[cfg(test)]
mod handle_tests {
    use super::*;
    use crate::{AgentHandle, Motion, TurnClose};

    fn setup() -> (Arc<World>, Arc<CommandQueue>, Arc<dyn Capabilities>) {
        let mut w = world();
        w.spawn(TeamId(0), Role::Predator, Point::new(0.0, 0.0), 12.0);
        w.spawn(TeamId(1), Role::Prey, Point::new(3.0, 4.0), 9.0);
        let caps: Arc<dyn Capabilities> = Arc::new(rules());
        (Arc::new(w), Arc::new(CommandQueue::new(2, 5.0)), caps)
    }

    #[test]
    fn observations_reflect_world_and_ledger() {
        let (w, q, caps) = setup();
        let t = q.open_turn(AgentId(0));
        let h = AgentHandle::new(Arc::clone(&w), Arc::clone(&q), caps, t);
        assert_eq!(h.role(), Role::Predator);
        assert_eq!(h.energy(), 5.0);
        assert_eq!(h.max_speed(), 12.0);
        assert!(!h.did_just_eat());
        // No proximity computed yet.
        assert!(h.closest_enemy_prey().is_sentinel());
        assert!(!h.on_left_edge());
    }

    #[test]
    fn second_action_is_ignored() {
        let (w, q, caps) = setup();
        let t = q.open_turn(AgentId(0));
        let h = AgentHandle::new(w, Arc::clone(&q), caps, t);
        h.forward(20.0);
        assert_eq!(h.energy(), 0.0);
        assert!(h.has_acted());
        h.left(90.0);
        let drained = q.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].motion, Motion::Forward(5.0));
        assert_eq!(q.close_turn(t), TurnClose::Acted(crate::Primitive::Forward));
    }
}
