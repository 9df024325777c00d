//! World rules run by the engine thread while it owns the world.
//!
//! Apply-phase order: commands, boundary correction, proximity recompute,
//! eliminations.  Eliminations read the proximity lists computed in the same
//! apply phase; decision callbacks only see the result next tick.

use arena_agent::{
    Agent, AgentResult, Capabilities, Command, CommandQueue, Proximity, RelativeLocation, World,
};
use arena_core::{AgentId, Axis, Bounds, Point, TeamId, bearing_deg};
use rand::Rng;

/// A prey eliminated by a predator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Elimination {
    pub predator: AgentId,
    pub prey:     AgentId,
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Apply drained commands in queue order.
pub fn apply_commands(world: &mut World, commands: &[Command]) {
    for cmd in commands {
        if let Some(agent) = world.agent_mut(cmd.agent) {
            agent.apply(cmd.motion);
        }
    }
}

// ── Boundary correction ───────────────────────────────────────────────────────

/// Reflect and clamp every living agent that left the arena.  Returns the
/// number of agents corrected.
pub fn correct_boundaries(world: &mut World, caps: &dyn Capabilities) -> usize {
    let bounds = *world.bounds();
    let living = world.living().to_vec();
    let mut corrected = 0;
    for id in living {
        let Some(agent) = world.agent_mut(id) else { continue };
        match correct_agent(agent, &bounds, caps) {
            Ok(true)  => corrected += 1,
            Ok(false) => {}
            Err(err)  => tracing::warn!(agent = %id, %err, "boundary correction refused"),
        }
    }
    corrected
}

/// Horizontal violations are handled first; the vertical reflection then
/// starts from the already-reflected heading.
pub fn correct_agent(agent: &mut Agent, bounds: &Bounds, caps: &dyn Capabilities) -> AgentResult<bool> {
    let mut changed = false;

    let p = agent.position();
    if p.x > bounds.max_x || p.x < bounds.min_x {
        agent.force_heading(Axis::Horizontal.reflect(agent.heading()), caps)?;
        agent.goto_boundary(Point::new(p.x.clamp(bounds.min_x, bounds.max_x), p.y), caps)?;
        changed = true;
    }

    let p = agent.position();
    if p.y > bounds.max_y || p.y < bounds.min_y {
        agent.force_heading(Axis::Vertical.reflect(agent.heading()), caps)?;
        agent.goto_boundary(Point::new(p.x, p.y.clamp(bounds.min_y, bounds.max_y)), caps)?;
        changed = true;
    }

    Ok(changed)
}

// ── Proximity ─────────────────────────────────────────────────────────────────

/// Rebuild every living agent's four proximity lists from scratch.
///
/// O(n²) over living agents.  With the `parallel` feature each agent's lists
/// are built on Rayon's pool; the result does not depend on it.
pub fn recompute_proximity(world: &mut World) {
    let living = world.living().to_vec();

    let lists: Vec<Proximity> = {
        let snapshot: &World = world;

        #[cfg(not(feature = "parallel"))]
        {
            living.iter().map(|&id| proximity_of(snapshot, id)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            living.par_iter().map(|&id| proximity_of(snapshot, id)).collect()
        }
    };

    for (id, lists) in living.into_iter().zip(lists) {
        if let Some(agent) = world.agent_mut(id) {
            agent.proximity = lists;
        }
    }
}

fn proximity_of(world: &World, id: AgentId) -> Proximity {
    let mut lists = Proximity::default();
    let Some(me) = world.agent(id) else { return lists };

    for other in world.living_agents() {
        if other.id == id {
            continue;
        }
        let loc = RelativeLocation {
            angle:    bearing_deg(me.position(), other.position()),
            distance: me.distance(other),
            other:    other.id,
        };
        let bucket = match (other.team == me.team, other.is_prey()) {
            (true, true)   => &mut lists.ally_prey,
            (true, false)  => &mut lists.ally_predators,
            (false, true)  => &mut lists.enemy_prey,
            (false, false) => &mut lists.enemy_predators,
        };
        bucket.push(loc);
    }
    lists.sort();
    lists
}

// ── Eliminations ──────────────────────────────────────────────────────────────

/// Let every living predator eat the enemy prey inside the kill radius.
///
/// Predators are visited in spawn order, so when two predators reach the
/// same prey the earlier one gets it.  A predator may eat several prey in one
/// tick and is credited for each.  Eaten prey are removed from every
/// registry and every proximity list.
pub fn resolve_eliminations(
    world: &mut World,
    caps:  &dyn Capabilities,
    queue: &CommandQueue,
) -> Vec<Elimination> {
    let mut eaten = Vec::new();
    let kill_radius = world.kill_radius();

    for predator in world.living_predators().to_vec() {
        let candidates: Vec<AgentId> = match world.agent(predator) {
            Some(p) => p
                .proximity
                .enemy_prey
                .iter()
                .take_while(|loc| loc.distance < kill_radius)
                .map(|loc| loc.other)
                .collect(),
            None => continue,
        };

        for prey in candidates {
            let edible = match (world.agent(predator), world.agent(prey)) {
                (Some(p), Some(q)) => caps.can_eat(p, q),
                _                  => false,
            };
            if !edible {
                continue;
            }
            match world.eliminate(prey) {
                Ok(true) => {
                    queue.credit_meal(predator);
                    eaten.push(Elimination { predator, prey });
                }
                Ok(false) => {}
                Err(err)  => tracing::warn!(%prey, %err, "elimination failed"),
            }
        }
    }

    if !eaten.is_empty() {
        for agent in world.agents_mut() {
            agent.proximity.retain(|id| !eaten.iter().any(|e| e.prey == id));
        }
    }
    eaten
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Living prey that start within the kill radius of an enemy predator.
/// Expects fresh proximity lists.
pub fn threatened_prey(world: &World) -> Vec<AgentId> {
    let kill_radius = world.kill_radius();
    world
        .living_prey()
        .iter()
        .copied()
        .filter(|&id| {
            world.agent(id).is_some_and(|a| {
                a.proximity
                    .enemy_predators
                    .first()
                    .is_some_and(|loc| loc.distance < kill_radius)
            })
        })
        .collect()
}

/// Move `id` to a uniformly random in-bounds location.  Only legal before
/// kick-off or while the agent is out of bounds.
pub fn relocate<R: Rng + ?Sized>(
    world: &mut World,
    id:    AgentId,
    caps:  &dyn Capabilities,
    rng:   &mut R,
) -> AgentResult<()> {
    let to = world.random_location(rng);
    match world.agent_mut(id) {
        Some(agent) => agent.goto_boundary(to, caps),
        None        => Err(arena_agent::AgentError::UnknownAgent(id)),
    }
}

// ── Termination ───────────────────────────────────────────────────────────────

/// Live prey per team, indexed by `TeamId`.
pub fn live_prey(world: &World, team_count: usize) -> Vec<usize> {
    let mut counts = vec![0; team_count];
    for id in world.living_prey() {
        if let Some(agent) = world.agent(*id) {
            if let Some(c) = counts.get_mut(agent.team.index()) {
                *c += 1;
            }
        }
    }
    counts
}

/// `true` iff at most one team still has living prey.
pub fn is_decided(counts: &[usize]) -> bool {
    counts.iter().filter(|&&n| n > 0).count() <= 1
}

/// The first team, in team order, with living prey.
pub fn first_surviving(counts: &[usize]) -> Option<TeamId> {
    counts
        .iter()
        .position(|&n| n > 0)
        .map(|i| TeamId(i as u16))
}
