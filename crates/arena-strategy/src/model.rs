//! The callback traits a team implements.

use arena_agent::{AgentHandle, World};
use arena_core::AgentRng;

/// Where to put one agent at match setup.
///
/// `index` counts agents of the same role on the same team, from zero.  The
/// engine discards results that are not two finite coordinates and picks a
/// random location instead.
///
/// Any `Fn(&World, usize, &mut AgentRng) -> (f64, f64)` closure qualifies.
pub trait PlacementFn: Send + Sync + 'static {
    fn place(&self, world: &World, index: usize, rng: &mut AgentRng) -> (f64, f64);
}

impl<F> PlacementFn for F
where
    F: Fn(&World, usize, &mut AgentRng) -> (f64, f64) + Send + Sync + 'static,
{
    fn place(&self, world: &World, index: usize, rng: &mut AgentRng) -> (f64, f64) {
        self(world, index, rng)
    }
}

/// Per-tick decision for one agent.
///
/// Called once per tick from the agent's worker thread with a handle that
/// observes the agent and issues its action.  Exactly one action primitive
/// should be called; the first one wins and later ones are ignored.  If none
/// is called the engine forces a `wait()` and reports a failsafe.
///
/// Implementations may be invoked concurrently for many agents, so they must
/// be `Send + Sync`.  State that varies per agent belongs in the world, not
/// in the strategy.
///
/// # Example
///
/// ```rust,ignore
/// fn flee(agent: &AgentHandle, _world: &World, _rng: &mut AgentRng) {
///     let threat = agent.closest_enemy_predator();
///     if threat.is_sentinel() {
///         agent.wait();
///     } else {
///         agent.set_heading(threat.angle() + 180.0);
///     }
/// }
/// ```
pub trait MovementFn: Send + Sync + 'static {
    fn decide(&self, agent: &AgentHandle, world: &World, rng: &mut AgentRng);
}

impl<F> MovementFn for F
where
    F: Fn(&AgentHandle, &World, &mut AgentRng) + Send + Sync + 'static,
{
    fn decide(&self, agent: &AgentHandle, world: &World, rng: &mut AgentRng) {
        self(agent, world, rng)
    }
}
