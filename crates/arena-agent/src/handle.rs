//! `AgentHandle` — the agent as seen by its own decision callback.
//!
//! A handle is minted per agent per tick.  It owns everything it needs
//! (`Arc`s and a turn ticket), so it can be moved onto a monitored sandbox
//! thread and outlive the tick without borrowing engine state.  Once the
//! tick's turn is closed, every action on a stale handle is a no-op.

use std::sync::Arc;

use arena_core::{AgentId, Point, TeamId};

use crate::{
    Agent, Capabilities, CommandQueue, Corner, Edge, Primitive, Proximity, RelativeLocation, Role,
    TurnTicket, World,
};

pub struct AgentHandle {
    world:  Arc<World>,
    queue:  Arc<CommandQueue>,
    caps:   Arc<dyn Capabilities>,
    ticket: TurnTicket,
}

impl AgentHandle {
    pub fn new(
        world:  Arc<World>,
        queue:  Arc<CommandQueue>,
        caps:   Arc<dyn Capabilities>,
        ticket: TurnTicket,
    ) -> Self {
        Self { world, queue, caps, ticket }
    }

    #[inline]
    fn me(&self) -> &Agent {
        // The engine only mints handles for agents it spawned.
        &self.world.agents()[self.ticket.agent.index()]
    }

    // ── Observation ───────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId {
        self.ticket.agent
    }

    pub fn team(&self) -> TeamId {
        self.me().team
    }

    pub fn role(&self) -> Role {
        self.me().role
    }

    pub fn is_prey(&self) -> bool {
        self.me().is_prey()
    }

    pub fn position(&self) -> Point {
        self.me().position()
    }

    pub fn heading(&self) -> f64 {
        self.me().heading()
    }

    pub fn max_speed(&self) -> f64 {
        self.me().max_speed
    }

    /// Current energy, including anything already spent this turn.
    pub fn energy(&self) -> f64 {
        self.queue.energy(self.ticket.agent)
    }

    /// `true` for the one tick after this predator eliminated a prey.
    pub fn did_just_eat(&self) -> bool {
        self.queue.just_ate(self.ticket.agent)
    }

    /// All four sorted proximity lists.
    pub fn proximity(&self) -> &Proximity {
        &self.me().proximity
    }

    pub fn closest_ally_prey(&self) -> RelativeLocation {
        self.me().proximity.closest_ally_prey()
    }

    pub fn closest_ally_predator(&self) -> RelativeLocation {
        self.me().proximity.closest_ally_predator()
    }

    pub fn closest_enemy_prey(&self) -> RelativeLocation {
        self.me().proximity.closest_enemy_prey()
    }

    pub fn closest_enemy_predator(&self) -> RelativeLocation {
        self.me().proximity.closest_enemy_predator()
    }

    pub fn on_left_edge(&self) -> bool {
        self.caps.near_edge(self.me(), Edge::Left)
    }

    pub fn on_top_edge(&self) -> bool {
        self.caps.near_edge(self.me(), Edge::Top)
    }

    pub fn on_right_edge(&self) -> bool {
        self.caps.near_edge(self.me(), Edge::Right)
    }

    pub fn on_bottom_edge(&self) -> bool {
        self.caps.near_edge(self.me(), Edge::Bottom)
    }

    pub fn in_top_left_corner(&self) -> bool {
        self.caps.in_corner(self.me(), Corner::TopLeft)
    }

    pub fn in_top_right_corner(&self) -> bool {
        self.caps.in_corner(self.me(), Corner::TopRight)
    }

    pub fn in_bottom_right_corner(&self) -> bool {
        self.caps.in_corner(self.me(), Corner::BottomRight)
    }

    pub fn in_bottom_left_corner(&self) -> bool {
        self.caps.in_corner(self.me(), Corner::BottomLeft)
    }

    /// `true` once a primitive has been issued this tick.
    pub fn has_acted(&self) -> bool {
        self.queue.has_acted(self.ticket)
    }

    // ── Actions ───────────────────────────────────────────────────────────
    //
    // Only the first call per tick has any effect.  Every one of them ends
    // the agent's tick: the terminal wait is performed when the turn closes.

    pub fn forward(&self, speed: f64) {
        self.issue(Primitive::Forward, speed);
    }

    pub fn backward(&self, speed: f64) {
        self.issue(Primitive::Backward, speed);
    }

    /// Turn counter-clockwise by `degrees`.
    pub fn left(&self, degrees: f64) {
        self.issue(Primitive::Left, degrees);
    }

    /// Turn clockwise by `degrees`.
    pub fn right(&self, degrees: f64) {
        self.issue(Primitive::Right, degrees);
    }

    pub fn set_heading(&self, degrees: f64) {
        self.issue(Primitive::SetHeading, degrees);
    }

    /// Rest: no command, bonus energy, clears the "just ate" flag.
    pub fn wait(&self) {
        self.issue(Primitive::Wait, 0.0);
    }

    fn issue(&self, primitive: Primitive, magnitude: f64) {
        let applied = self.queue.act(self.ticket, primitive, magnitude, self.me().max_speed);
        if !applied {
            tracing::trace!(agent = %self.ticket.agent, ?primitive, "ignored extra action this tick");
        }
    }
}
