//! Raw submissions and admitted team records.

use std::fmt;
use std::sync::Arc;

use arena_agent::Role;

use crate::{
    AlwaysWait, Color, MovementFn, PlacementFn, RandomPlacement, RandomWalk, DEFAULT_TEAM_NAME,
};

// ── Submission ────────────────────────────────────────────────────────────────

/// What a team author supplied.  Every field is optional; nothing here has
/// been checked yet.
#[derive(Clone, Default)]
pub struct Submission {
    pub team_name:          Option<String>,
    pub prey_color:         Option<Color>,
    pub predator_color:     Option<Color>,
    pub prey_placement:     Option<Arc<dyn PlacementFn>>,
    pub predator_placement: Option<Arc<dyn PlacementFn>>,
    pub prey_movement:      Option<Arc<dyn MovementFn>>,
    pub predator_movement:  Option<Arc<dyn MovementFn>>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team_name(mut self, name: impl Into<String>) -> Self {
        self.team_name = Some(name.into());
        self
    }

    pub fn prey_color(mut self, color: impl Into<Color>) -> Self {
        self.prey_color = Some(color.into());
        self
    }

    pub fn predator_color(mut self, color: impl Into<Color>) -> Self {
        self.predator_color = Some(color.into());
        self
    }

    pub fn prey_placement(mut self, f: impl PlacementFn) -> Self {
        self.prey_placement = Some(Arc::new(f));
        self
    }

    pub fn predator_placement(mut self, f: impl PlacementFn) -> Self {
        self.predator_placement = Some(Arc::new(f));
        self
    }

    pub fn prey_movement(mut self, f: impl MovementFn) -> Self {
        self.prey_movement = Some(Arc::new(f));
        self
    }

    pub fn predator_movement(mut self, f: impl MovementFn) -> Self {
        self.predator_movement = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("team_name", &self.team_name)
            .field("prey_color", &self.prey_color)
            .field("predator_color", &self.predator_color)
            .field("prey_placement", &self.prey_placement.is_some())
            .field("predator_placement", &self.predator_placement.is_some())
            .field("prey_movement", &self.prey_movement.is_some())
            .field("predator_movement", &self.predator_movement.is_some())
            .finish()
    }
}

// ── Team ──────────────────────────────────────────────────────────────────────

/// An admitted team: every field present and checked.
#[derive(Clone)]
pub struct Team {
    pub name:               String,
    pub prey_color:         Color,
    pub predator_color:     Color,
    pub prey_placement:     Arc<dyn PlacementFn>,
    pub predator_placement: Arc<dyn PlacementFn>,
    pub prey_movement:      Arc<dyn MovementFn>,
    pub predator_movement:  Arc<dyn MovementFn>,
}

impl Team {
    /// A team made entirely of failsafe defaults.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self {
            name:               name.into(),
            prey_color:         Color::default(),
            predator_color:     Color::default(),
            prey_placement:     Arc::new(RandomPlacement),
            predator_placement: Arc::new(RandomPlacement),
            prey_movement:      Arc::new(RandomWalk),
            predator_movement:  Arc::new(RandomWalk),
        }
    }

    /// A team whose agents never move.  Handy in tests and as a sparring
    /// partner.
    pub fn passive(name: impl Into<String>) -> Self {
        Self {
            prey_movement: Arc::new(AlwaysWait),
            predator_movement: Arc::new(AlwaysWait),
            ..Self::fallback(name)
        }
    }

    pub fn color(&self, role: Role) -> &Color {
        match role {
            Role::Prey     => &self.prey_color,
            Role::Predator => &self.predator_color,
        }
    }

    pub fn placement(&self, role: Role) -> &Arc<dyn PlacementFn> {
        match role {
            Role::Prey     => &self.prey_placement,
            Role::Predator => &self.predator_placement,
        }
    }

    pub fn movement(&self, role: Role) -> &Arc<dyn MovementFn> {
        match role {
            Role::Prey     => &self.prey_movement,
            Role::Predator => &self.predator_movement,
        }
    }

    pub fn with_placement(mut self, role: Role, f: impl PlacementFn) -> Self {
        match role {
            Role::Prey     => self.prey_placement = Arc::new(f),
            Role::Predator => self.predator_placement = Arc::new(f),
        }
        self
    }

    pub fn with_movement(mut self, role: Role, f: impl MovementFn) -> Self {
        match role {
            Role::Prey     => self.prey_movement = Arc::new(f),
            Role::Predator => self.predator_movement = Arc::new(f),
        }
        self
    }
}

impl Default for Team {
    fn default() -> Self {
        Self::fallback(DEFAULT_TEAM_NAME)
    }
}

impl fmt::Debug for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Team")
            .field("name", &self.name)
            .field("prey_color", &self.prey_color)
            .field("predator_color", &self.predator_color)
            .finish_non_exhaustive()
    }
}

/// Reject blank team names.
pub fn check_name(name: &str) -> crate::StrategyResult<()> {
    if name.trim().is_empty() {
        Err(crate::StrategyError::BlankName)
    } else {
        Ok(())
    }
}
