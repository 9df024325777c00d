//! Match configuration.

use std::time::Duration;

use crate::{Bounds, CoreError, CoreResult};

/// Top-level match configuration.
///
/// Typically built from CLI flags or loaded from a JSON file by the
/// application crate and passed to the engine builder.  Every field has a
/// default, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchConfig {
    /// World width in arena units.  Default: 700.
    pub width: f64,

    /// World height in arena units.  Default: 700.
    pub height: f64,

    /// A predator eliminates an enemy prey closer than this.  Default: 30.
    pub kill_radius: f64,

    pub prey_per_team: usize,
    pub predators_per_team: usize,

    /// Distance from a wall under which the edge/corner predicates report
    /// `true`.  Default: 10.
    pub border_proximity: f64,

    pub prey_max_speed: f64,
    pub predator_max_speed: f64,

    /// Energy every agent starts the match with.  Default: 5.
    pub starting_energy: f64,

    /// Master RNG seed.
    pub seed: u64,

    /// Run each live decision callback on a monitored task with a deadline.
    /// Without it a callback that never returns stalls the match.
    pub sandbox: bool,

    /// How often a worker polls a sandboxed decision for completion.
    pub poll_interval_ms: u64,

    /// Live decision deadline in sandbox mode.  Exceeding it permanently
    /// downgrades the agent to always-wait.
    pub decision_deadline_ms: u64,

    /// Per-trial deadline for placement callbacks during admission.
    pub placement_trial_timeout_ms: u64,

    /// Per-trial deadline for movement callbacks during admission.
    pub movement_trial_timeout_ms: u64,

    /// Trial executions per callback during admission.
    pub trial_count: u32,

    /// Stop after this many ticks even if more than one team has prey.
    /// `None` runs until the match is decided.
    pub max_ticks: Option<u64>,

    /// Passes of setup settling before the first tick is played.
    pub max_setup_attempts: u32,

    /// Forwarded to the renderer; the engine never reads it.
    pub background: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width:                      700.0,
            height:                     700.0,
            kill_radius:                30.0,
            prey_per_team:              45,
            predators_per_team:         5,
            border_proximity:           10.0,
            prey_max_speed:             9.0,
            predator_max_speed:         12.0,
            starting_energy:            5.0,
            seed:                       0,
            sandbox:                    false,
            poll_interval_ms:           250,
            decision_deadline_ms:       1_000,
            placement_trial_timeout_ms: 2_000,
            movement_trial_timeout_ms:  5_000,
            trial_count:                100,
            max_ticks:                  None,
            max_setup_attempts:         10_000,
            background:                 true,
        }
    }
}

impl MatchConfig {
    /// World bounds derived from `width × height`, centred on the origin.
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.width, self.height)
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[inline]
    pub fn decision_deadline(&self) -> Duration {
        Duration::from_millis(self.decision_deadline_ms)
    }

    #[inline]
    pub fn placement_trial_timeout(&self) -> Duration {
        Duration::from_millis(self.placement_trial_timeout_ms)
    }

    #[inline]
    pub fn movement_trial_timeout(&self) -> Duration {
        Duration::from_millis(self.movement_trial_timeout_ms)
    }

    /// Agents fielded by each team.
    #[inline]
    pub fn agents_per_team(&self) -> usize {
        self.prey_per_team + self.predators_per_team
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be a positive number, got {v}")))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be non-negative, got {v}")))
            }
        };

        positive("width", self.width)?;
        positive("height", self.height)?;
        non_negative("kill_radius", self.kill_radius)?;
        non_negative("border_proximity", self.border_proximity)?;
        non_negative("prey_max_speed", self.prey_max_speed)?;
        non_negative("predator_max_speed", self.predator_max_speed)?;
        non_negative("starting_energy", self.starting_energy)?;

        if self.agents_per_team() == 0 {
            return Err(CoreError::Config("teams must field at least one agent".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(CoreError::Config("poll_interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}
