//! `World` — bounds plus every agent and the live-agent registries.
//!
//! # Sharing across threads
//!
//! The engine publishes the world to worker threads as an `Arc<World>`
//! snapshot at the start of each decide phase.  Workers drop their snapshot
//! before the first rendezvous, so when the engine mutates the world in the
//! apply phase it is normally the sole owner.  A sandboxed callback that
//! overran its deadline may still hold an old snapshot; the engine then
//! copies the world once instead of waiting on it (`Arc::make_mut`), which is
//! why `World` is `Clone`.

use arena_core::{AgentId, Bounds, Point, TeamId};
use rand::Rng;

use crate::{Agent, AgentError, AgentResult, Role};

/// Bounds, constants and agent registries.
#[derive(Clone, Debug)]
pub struct World {
    bounds:      Bounds,
    kill_radius: f64,
    /// Every agent ever spawned, indexed by `AgentId`.
    agents:      Vec<Agent>,
    /// Living agents, in spawn order.
    living:      Vec<AgentId>,
    /// Living prey, in spawn order.
    prey:        Vec<AgentId>,
    /// Living predators, in spawn order.
    predators:   Vec<AgentId>,
}

impl World {
    pub fn new(bounds: Bounds, kill_radius: f64) -> Self {
        Self {
            bounds,
            kill_radius,
            agents:    Vec::new(),
            living:    Vec::new(),
            prey:      Vec::new(),
            predators: Vec::new(),
        }
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn kill_radius(&self) -> f64 {
        self.kill_radius
    }

    /// Uniformly random in-bounds location.
    pub fn random_location<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        self.bounds.random_point(rng)
    }

    /// `true` if `p` is strictly inside the world.
    #[inline]
    pub fn is_in_bounds(&self, p: Point) -> bool {
        self.bounds.contains_strict(p)
    }

    // ── Registries ────────────────────────────────────────────────────────

    /// Add a living agent and return its id.
    pub fn spawn(&mut self, team: TeamId, role: Role, position: Point, max_speed: f64) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(Agent::new(id, team, role, position, max_speed));
        self.living.push(id);
        match role {
            Role::Prey     => self.prey.push(id),
            Role::Predator => self.predators.push(id),
        }
        id
    }

    /// Remove a prey (or any agent) from every registry and hide it.
    ///
    /// Returns `false` if it was already dead.
    pub fn eliminate(&mut self, id: AgentId) -> AgentResult<bool> {
        let agent = self.agents.get_mut(id.index()).ok_or(AgentError::UnknownAgent(id))?;
        if !agent.is_alive() {
            return Ok(false);
        }
        agent.kill();
        self.living.retain(|&a| a != id);
        self.prey.retain(|&a| a != id);
        self.predators.retain(|&a| a != id);
        Ok(true)
    }

    /// Number of agents ever spawned (alive or not).
    #[inline]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    /// All agents including the eliminated ones, indexed by `AgentId`.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn living(&self) -> &[AgentId] {
        &self.living
    }

    pub fn living_prey(&self) -> &[AgentId] {
        &self.prey
    }

    pub fn living_predators(&self) -> &[AgentId] {
        &self.predators
    }

    /// Iterator over living agents, in spawn order.
    pub fn living_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.living.iter().map(|id| &self.agents[id.index()])
    }

    /// Living prey fielded by `team`.
    pub fn live_prey_count(&self, team: TeamId) -> usize {
        self.prey
            .iter()
            .filter(|id| self.agents[id.index()].team == team)
            .count()
    }
}
