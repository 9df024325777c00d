//! Per-agent world state and the applied side of motion.

use std::fmt;

use arena_core::{AgentId, Point, TeamId, normalize_heading};

use crate::{AgentError, AgentResult, Capabilities, Motion, Proximity};

/// Which side of the food chain an agent is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Prey,
    Predator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Prey     => "prey",
            Role::Predator => "predator",
        })
    }
}

/// One simulated entity.
///
/// Owned by [`World`][crate::World]; mutated only by the engine while it
/// holds the world exclusively (apply phase, or setup before the first tick).
/// Energy is deliberately absent: it lives in the
/// [`CommandQueue`][crate::CommandQueue] ledger.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id:        AgentId,
    pub team:      TeamId,
    pub role:      Role,
    pub max_speed: f64,
    position:      Point,
    heading:       f64,
    alive:         bool,
    visible:       bool,
    /// Rebuilt from scratch every apply phase.
    pub proximity: Proximity,
}

impl Agent {
    pub fn new(id: AgentId, team: TeamId, role: Role, position: Point, max_speed: f64) -> Self {
        Self {
            id,
            team,
            role,
            max_speed,
            position,
            heading: 0.0,
            alive: true,
            visible: true,
            proximity: Proximity::default(),
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_prey(&self) -> bool {
        self.role == Role::Prey
    }

    #[inline]
    pub fn is_predator(&self) -> bool {
        self.role == Role::Predator
    }

    #[inline]
    pub fn distance(&self, other: &Agent) -> f64 {
        self.position.distance(other.position)
    }

    /// Apply a drained command's world effect.  Dead agents ignore commands.
    pub fn apply(&mut self, motion: Motion) {
        if !self.alive {
            return;
        }
        match motion {
            Motion::Forward(d)     => self.position = self.position.advanced(self.heading, d),
            Motion::Backward(d)    => self.position = self.position.advanced(self.heading, -d),
            Motion::Left(deg)      => self.heading = normalize_heading(self.heading + deg),
            Motion::Right(deg)     => self.heading = normalize_heading(self.heading - deg),
            Motion::SetHeading(h)  => self.heading = normalize_heading(h),
        }
    }

    // ── Engine-only correction primitives ─────────────────────────────────

    /// Teleport without spending energy or a command.  Only allowed while
    /// `caps.can_relocate(self)` holds (out of bounds, or before kick-off).
    pub fn goto_boundary(&mut self, to: Point, caps: &dyn Capabilities) -> AgentResult<()> {
        if !caps.can_relocate(self) {
            return Err(AgentError::RelocationForbidden(self.id));
        }
        self.position = to;
        Ok(())
    }

    /// Set the heading outright, under the same rule as [`goto_boundary`](Self::goto_boundary).
    pub fn force_heading(&mut self, heading_deg: f64, caps: &dyn Capabilities) -> AgentResult<()> {
        if !caps.can_relocate(self) {
            return Err(AgentError::RelocationForbidden(self.id));
        }
        self.heading = normalize_heading(heading_deg);
        Ok(())
    }

    /// Mark eliminated.  Registry removal is done by
    /// [`World::eliminate`][crate::World::eliminate].
    pub(crate) fn kill(&mut self) {
        self.alive = false;
        self.visible = false;
        self.proximity.clear();
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
