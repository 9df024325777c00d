//! The capability interface agents are constructed against.
//!
//! Agents never hold a reference back to the engine.  Everything an agent or
//! its handle needs to ask about the match goes through [`Capabilities`],
//! injected as an `Arc<dyn Capabilities>`.

use std::sync::atomic::{AtomicBool, Ordering};

use arena_core::Bounds;

use crate::Agent;

/// A wall of the arena.  "Top" is `max_y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// The two walls that meet at this corner.
    pub fn edges(self) -> (Edge, Edge) {
        match self {
            Corner::TopLeft     => (Edge::Left, Edge::Top),
            Corner::TopRight    => (Edge::Right, Edge::Top),
            Corner::BottomRight => (Edge::Right, Edge::Bottom),
            Corner::BottomLeft  => (Edge::Left, Edge::Bottom),
        }
    }
}

/// Questions an agent may ask about the match it is playing in.
pub trait Capabilities: Send + Sync {
    /// May the cost-free correction primitives move this agent right now?
    fn can_relocate(&self, agent: &Agent) -> bool;

    /// Would `predator` eliminate `prey` at their current positions?
    fn can_eat(&self, predator: &Agent, prey: &Agent) -> bool;

    /// `true` once at most one team has living prey.
    fn is_game_over(&self) -> bool;

    /// Within the border-proximity threshold of `edge`.
    fn near_edge(&self, agent: &Agent, edge: Edge) -> bool;

    fn in_corner(&self, agent: &Agent, corner: Corner) -> bool {
        let (a, b) = corner.edges();
        self.near_edge(agent, a) && self.near_edge(agent, b)
    }
}

// ── ArenaRules ────────────────────────────────────────────────────────────────

/// The engine's [`Capabilities`] implementation.
///
/// The two flags are flipped by the engine: `started` at kick-off and
/// `game_over` during the apply phase of the deciding tick.  Workers read
/// `game_over` after the second rendezvous to know when to exit.
#[derive(Debug)]
pub struct ArenaRules {
    bounds:           Bounds,
    border_proximity: f64,
    kill_radius:      f64,
    started:          AtomicBool,
    game_over:        AtomicBool,
}

impl ArenaRules {
    pub fn new(bounds: Bounds, border_proximity: f64, kill_radius: f64) -> Self {
        Self {
            bounds,
            border_proximity,
            kill_radius,
            started: AtomicBool::new(false),
            game_over: AtomicBool::new(false),
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

    pub fn start(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn set_game_over(&self, over: bool) {
        self.game_over.store(over, Ordering::SeqCst);
    }
}

impl Capabilities for ArenaRules {
    fn can_relocate(&self, agent: &Agent) -> bool {
        !self.has_started() || !self.bounds.contains_strict(agent.position())
    }

    fn can_eat(&self, predator: &Agent, prey: &Agent) -> bool {
        predator.is_predator()
            && prey.is_prey()
            && predator.team != prey.team
            && predator.is_alive()
            && prey.is_alive()
            && predator.distance(prey) < self.kill_radius
    }

    fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::SeqCst)
    }

    fn near_edge(&self, agent: &Agent, edge: Edge) -> bool {
        let p = agent.position();
        let gap = match edge {
            Edge::Left   => p.x - self.bounds.min_x,
            Edge::Right  => p.x - self.bounds.max_x,
            Edge::Top    => p.y - self.bounds.max_y,
            Edge::Bottom => p.y - self.bounds.min_y,
        };
        gap.abs() < self.border_proximity
    }
}
