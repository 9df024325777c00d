//! Failsafe strategies substituted for rejected submissions.

use arena_agent::{AgentHandle, World};
use arena_core::AgentRng;

use crate::{MovementFn, PlacementFn};

pub const DEFAULT_TEAM_NAME: &str = "Untitled Team";
pub const DEFAULT_COLOR: &str = "blue";

/// Places every agent at a uniformly random in-bounds location.
pub struct RandomPlacement;

impl PlacementFn for RandomPlacement {
    fn place(&self, world: &World, _index: usize, rng: &mut AgentRng) -> (f64, f64) {
        let p = world.random_location(rng);
        (p.x, p.y)
    }
}

/// Picks uniformly among right(30), left(30), forward(3), backward(3) and wait.
pub struct RandomWalk;

impl MovementFn for RandomWalk {
    fn decide(&self, agent: &AgentHandle, _world: &World, rng: &mut AgentRng) {
        match rng.gen_range(0..5u8) {
            0 => agent.right(30.0),
            1 => agent.left(30.0),
            2 => agent.forward(3.0),
            3 => agent.backward(3.0),
            _ => agent.wait(),
        }
    }
}

/// Rests every tick.  Agents whose callback overran a live deadline are
/// pinned to this.
pub struct AlwaysWait;

impl MovementFn for AlwaysWait {
    fn decide(&self, agent: &AgentHandle, _world: &World, _rng: &mut AgentRng) {
        agent.wait();
    }
}
