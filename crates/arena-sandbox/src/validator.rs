//! `StrategyValidator` — the pre-match admission gate.
//!
//! Every field of a [`Submission`] is checked independently.  A field that is
//! missing, malformed, or whose callback overran its trial deadline is
//! replaced by the matching default and recorded as a [`Rejection`].
//! Admission itself never fails on bad input; the only error is being unable
//! to spawn a sandbox thread.
//!
//! Callback trials run the real callback against a throwaway probe world.
//! A trial that panics still counts as completed: only a timeout rejects.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arena_agent::{AgentHandle, ArenaRules, Capabilities, CommandQueue, Role, World};
use arena_core::{AgentId, AgentRng, MatchConfig, SimRng, TeamId};
use rand::RngCore;

use arena_strategy::{
    Color, MovementFn, PlacementFn, RandomPlacement, RandomWalk, Submission, Team, check_name,
    DEFAULT_TEAM_NAME,
};

use crate::{SandboxOutcome, SandboxResult, SandboxRunner};

/// Index handed to placement callbacks during trials.
const PROBE_INDEX: usize = 1;

/// Which submission field a rejection is about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Check {
    TeamName,
    PreyColor,
    PredatorColor,
    PreyPlacement,
    PredatorPlacement,
    PreyMovement,
    PredatorMovement,
}

impl Check {
    /// The agent role this field concerns, if any.
    pub fn role(self) -> Option<Role> {
        match self {
            Check::TeamName => None,
            Check::PreyColor | Check::PreyPlacement | Check::PreyMovement => Some(Role::Prey),
            Check::PredatorColor | Check::PredatorPlacement | Check::PredatorMovement => {
                Some(Role::Predator)
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Check::TeamName          => "team_name",
            Check::PreyColor         => "prey_color",
            Check::PredatorColor     => "predator_color",
            Check::PreyPlacement     => "prey_placement",
            Check::PredatorPlacement => "predator_placement",
            Check::PreyMovement      => "prey_movement",
            Check::PredatorMovement  => "predator_movement",
        })
    }
}

/// One substituted field.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    pub check:  Check,
    pub reason: String,
}

/// The admitted team plus every substitution made on the way.
#[derive(Debug)]
pub struct Admission {
    pub team:       Team,
    pub rejections: Vec<Rejection>,
}

impl Admission {
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }
}

// ── StrategyValidator ─────────────────────────────────────────────────────────

pub struct StrategyValidator {
    config: MatchConfig,
    rng:    SimRng,
}

impl StrategyValidator {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            config: config.clone(),
            // Offset so probes do not replay the engine's own stream.
            rng:    SimRng::new(config.seed ^ 0x5a5a_5a5a),
        }
    }

    /// Check every field of `submission` and build a [`Team`].
    pub fn admit(&mut self, submission: Submission) -> SandboxResult<Admission> {
        let mut rejections = Vec::new();

        let name = match submission.team_name {
            None => {
                rejections.push(reject(Check::TeamName, "missing"));
                DEFAULT_TEAM_NAME.to_owned()
            }
            Some(name) => match check_name(&name) {
                Ok(())   => name,
                Err(err) => {
                    rejections.push(reject(Check::TeamName, err));
                    DEFAULT_TEAM_NAME.to_owned()
                }
            },
        };

        let prey_color = admit_color(submission.prey_color, Check::PreyColor, &mut rejections);
        let predator_color =
            admit_color(submission.predator_color, Check::PredatorColor, &mut rejections);

        let prey_placement =
            self.admit_placement(submission.prey_placement, Check::PreyPlacement, &mut rejections)?;
        let predator_placement = self.admit_placement(
            submission.predator_placement,
            Check::PredatorPlacement,
            &mut rejections,
        )?;
        let prey_movement = self.admit_movement(
            submission.prey_movement,
            Role::Prey,
            Check::PreyMovement,
            &mut rejections,
        )?;
        let predator_movement = self.admit_movement(
            submission.predator_movement,
            Role::Predator,
            Check::PredatorMovement,
            &mut rejections,
        )?;

        for r in &rejections {
            tracing::warn!(team = %name, check = %r.check, reason = %r.reason, "failsafe: field replaced by default");
        }

        Ok(Admission {
            team: Team {
                name,
                prey_color,
                predator_color,
                prey_placement,
                predator_placement,
                prey_movement,
                predator_movement,
            },
            rejections,
        })
    }

    fn admit_placement(
        &mut self,
        f:          Option<Arc<dyn PlacementFn>>,
        check:      Check,
        rejections: &mut Vec<Rejection>,
    ) -> SandboxResult<Arc<dyn PlacementFn>> {
        let Some(f) = f else {
            rejections.push(reject(check, "missing"));
            return Ok(Arc::new(RandomPlacement));
        };
        match self.trial_placement(&f, check)? {
            None         => Ok(f),
            Some(reason) => {
                rejections.push(reject(check, reason));
                Ok(Arc::new(RandomPlacement))
            }
        }
    }

    fn admit_movement(
        &mut self,
        f:          Option<Arc<dyn MovementFn>>,
        role:       Role,
        check:      Check,
        rejections: &mut Vec<Rejection>,
    ) -> SandboxResult<Arc<dyn MovementFn>> {
        let Some(f) = f else {
            rejections.push(reject(check, "missing"));
            return Ok(Arc::new(RandomWalk));
        };
        match self.trial_movement(&f, role, check)? {
            None         => Ok(f),
            Some(reason) => {
                rejections.push(reject(check, reason));
                Ok(Arc::new(RandomWalk))
            }
        }
    }

    // ── Trials ────────────────────────────────────────────────────────────

    fn probe_world(&self) -> World {
        World::new(self.config.bounds(), self.config.kill_radius)
    }

    fn runner(&self, deadline: Duration) -> SandboxRunner {
        SandboxRunner::new(deadline, self.config.poll_interval())
    }

    /// `Some(reason)` if any trial timed out.
    fn trial_placement(&mut self, f: &Arc<dyn PlacementFn>, check: Check) -> SandboxResult<Option<String>> {
        let runner = self.runner(self.config.placement_trial_timeout());
        let world = Arc::new(self.probe_world());
        let label = check.to_string();

        for trial in 0..self.config.trial_count {
            let f = Arc::clone(f);
            let world = Arc::clone(&world);
            let mut rng = AgentRng::new(self.rng.next_u64(), AgentId(trial));
            let outcome = runner.run(&label, move || f.place(&world, PROBE_INDEX, &mut rng))?;
            if let Some(reason) = timeout_reason(&outcome, trial, runner.deadline()) {
                return Ok(Some(reason));
            }
        }
        Ok(None)
    }

    /// `Some(reason)` if any trial timed out.
    fn trial_movement(&mut self, f: &Arc<dyn MovementFn>, role: Role, check: Check) -> SandboxResult<Option<String>> {
        let runner = self.runner(self.config.movement_trial_timeout());
        let label = check.to_string();

        let mut world = self.probe_world();
        let start = world.random_location(&mut self.rng);
        let max_speed = match role {
            Role::Prey     => self.config.prey_max_speed,
            Role::Predator => self.config.predator_max_speed,
        };
        let id = world.spawn(TeamId(0), role, start, max_speed);
        if let Some(agent) = world.agent_mut(id) {
            agent.hide();
        }
        let world = Arc::new(world);
        let queue = Arc::new(CommandQueue::new(1, self.config.starting_energy));
        let rules = ArenaRules::new(*world.bounds(), self.config.border_proximity, self.config.kill_radius);
        rules.start();
        let caps: Arc<dyn Capabilities> = Arc::new(rules);

        for trial in 0..self.config.trial_count {
            let ticket = queue.open_turn(id);
            let handle = AgentHandle::new(Arc::clone(&world), Arc::clone(&queue), Arc::clone(&caps), ticket);
            let f = Arc::clone(f);
            let world = Arc::clone(&world);
            let mut rng = AgentRng::new(self.rng.next_u64(), id);
            let outcome = runner.run(&label, move || f.decide(&handle, &world, &mut rng))?;
            queue.close_turn(ticket);
            queue.drain();
            if let Some(reason) = timeout_reason(&outcome, trial, runner.deadline()) {
                return Ok(Some(reason));
            }
        }
        Ok(None)
    }
}

fn reject(check: Check, reason: impl ToString) -> Rejection {
    Rejection { check, reason: reason.to_string() }
}

fn admit_color(color: Option<Color>, check: Check, rejections: &mut Vec<Rejection>) -> Color {
    match color {
        None => {
            rejections.push(reject(check, "missing"));
            Color::default()
        }
        Some(c) => match c.validate() {
            Ok(())   => c,
            Err(err) => {
                rejections.push(reject(check, err));
                Color::default()
            }
        },
    }
}

fn timeout_reason<T>(outcome: &SandboxOutcome<T>, trial: u32, deadline: Duration) -> Option<String> {
    match outcome {
        SandboxOutcome::TimedOut => Some(format!(
            "trial {trial} exceeded {} ms",
            deadline.as_millis()
        )),
        SandboxOutcome::Faulted(msg) => {
            tracing::trace!(trial, %msg, "trial panicked; counted as completed");
            None
        }
        SandboxOutcome::Completed(_) => None,
    }
}
