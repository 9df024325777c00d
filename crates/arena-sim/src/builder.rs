//! Fluent builder for constructing an [`Engine`]: placement, placement
//! failsafes, and setup settling.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use arena_agent::{ArenaRules, CommandQueue, Role, World};
use arena_core::{AgentId, AgentRng, MatchConfig, Point, SimRng, TeamId, Tick};
use arena_sandbox::{Admission, SandboxOutcome, SandboxRunner, panic_message};
use arena_strategy::{PlacementFn, Team};

use crate::rules;
use crate::worker::Shared;
use crate::{Engine, EngineError, EngineResult, FailsafeEvent, FailsafeKind};

/// Salt so placement draws do not replay an agent's decision stream.
const PLACEMENT_SALT: u64 = 0x0f1e_2d3c_4b5a_6978;

/// A placement result, or the failsafe it triggers.
type Placement = Result<Point, (FailsafeKind, String)>;

/// Fluent builder for [`Engine`].
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(MatchConfig::default())
///     .team(Team::fallback("Foxes"))
///     .team(Team::fallback("Hens"))
///     .build()?;
/// let outcome = engine.run(&mut NoopObserver)?;
/// ```
pub struct EngineBuilder {
    config:    MatchConfig,
    teams:     Vec<Team>,
    failsafes: Vec<FailsafeEvent>,
}

impl EngineBuilder {
    pub fn new(config: MatchConfig) -> Self {
        Self { config, teams: Vec::new(), failsafes: Vec::new() }
    }

    /// Add an already-trusted team.  Teams are numbered in the order added.
    pub fn team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    /// Add a team that went through admission, recording each substitution
    /// as a failsafe event.
    pub fn admitted(mut self, admission: Admission) -> Self {
        let team = TeamId(self.teams.len() as u16);
        self.failsafes.extend(admission.rejections.into_iter().map(|r| FailsafeEvent {
            tick:   None,
            team:   Some(team),
            role:   r.check.role(),
            agent:  None,
            kind:   FailsafeKind::Admission(r.check),
            detail: r.reason,
        }));
        self.teams.push(admission.team);
        self
    }

    /// Validate the configuration, place every agent, settle the board, and
    /// return a ready-to-run [`Engine`].
    pub fn build(self) -> EngineResult<Engine> {
        self.config.validate()?;
        if self.teams.is_empty() {
            return Err(EngineError::NoTeams);
        }
        if self.teams.len() > u16::MAX as usize {
            return Err(EngineError::TooManyTeams(self.teams.len()));
        }

        let config = self.config;
        let bounds = config.bounds();
        let arena_rules = Arc::new(ArenaRules::new(bounds, config.border_proximity, config.kill_radius));
        let mut world = World::new(bounds, config.kill_radius);
        let mut rng = SimRng::new(config.seed);
        let mut failsafes = self.failsafes;

        let runner = config
            .sandbox
            .then(|| SandboxRunner::new(config.placement_trial_timeout(), config.poll_interval()));

        // ── Placement ─────────────────────────────────────────────────────
        //
        // Team by team, prey before predators.  Placement callbacks see the
        // world as it was before their batch.
        for (t, team) in self.teams.iter().enumerate() {
            let team_id = TeamId(t as u16);
            let batches = [
                (Role::Prey, config.prey_per_team, config.prey_max_speed),
                (Role::Predator, config.predators_per_team, config.predator_max_speed),
            ];
            for (role, count, max_speed) in batches {
                let snapshot = Arc::new(world.clone());
                for index in 0..count {
                    let id = AgentId(world.agent_count() as u32);
                    let placed_rng = AgentRng::new(config.seed ^ PLACEMENT_SALT, id);
                    let position = match place(team.placement(role), &snapshot, index, placed_rng, runner)? {
                        Ok(p) => p,
                        Err((kind, detail)) => {
                            tracing::warn!(team = %team.name, %role, agent = %id, check = %kind, %detail, "failsafe triggered");
                            failsafes.push(FailsafeEvent {
                                tick:  None,
                                team:  Some(team_id),
                                role:  Some(role),
                                agent: Some(id),
                                kind,
                                detail,
                            });
                            world.random_location(&mut rng)
                        }
                    };
                    world.spawn(team_id, role, position, max_speed);
                }
            }
        }

        // ── Settling ──────────────────────────────────────────────────────
        if let Some(event) = settle(&mut world, &arena_rules, &mut rng, config.max_setup_attempts) {
            failsafes.push(event);
        }

        let live_prey = rules::live_prey(&world, self.teams.len());
        let queue = Arc::new(CommandQueue::new(world.agent_count(), config.starting_energy));
        tracing::debug!(agents = world.agent_count(), ?live_prey, "board settled");

        Ok(Engine {
            config,
            teams: self.teams,
            shared: Arc::new(Shared {
                world: RwLock::new(Arc::new(world)),
                queue,
                rules: arena_rules,
            }),
            tick: Tick::ZERO,
            live_prey,
            pending: failsafes,
        })
    }
}

/// Run one placement callback and check the result's shape.
fn place(
    f:      &Arc<dyn PlacementFn>,
    world:  &Arc<World>,
    index:  usize,
    mut rng: AgentRng,
    runner: Option<SandboxRunner>,
) -> EngineResult<Placement> {
    let raw = match runner {
        None => panic::catch_unwind(AssertUnwindSafe(|| f.place(world, index, &mut rng)))
            .map_err(|payload| (FailsafeKind::PlacementFault, panic_message(payload.as_ref()))),
        Some(runner) => {
            let f = Arc::clone(f);
            let world = Arc::clone(world);
            match runner.run("placement", move || f.place(&world, index, &mut rng))? {
                SandboxOutcome::Completed(xy) => Ok(xy),
                SandboxOutcome::Faulted(msg)  => Err((FailsafeKind::PlacementFault, msg)),
                SandboxOutcome::TimedOut      => Err((
                    FailsafeKind::PlacementTimeout,
                    format!("exceeded {} ms", runner.deadline().as_millis()),
                )),
            }
        }
    };

    Ok(raw.and_then(|(x, y)| {
        let p = Point::new(x, y);
        if p.is_finite() {
            Ok(p)
        } else {
            Err((FailsafeKind::PlacementShape, format!("({x}, {y}) is not a location")))
        }
    }))
}

/// Correct boundaries and move threatened prey away until nothing needs
/// fixing, for at most `max_attempts` passes.  Leaves fresh proximity lists
/// behind.  Returns a failsafe event if the board never settled.
fn settle(world: &mut World, caps: &ArenaRules, rng: &mut SimRng, max_attempts: u32) -> Option<FailsafeEvent> {
    for _ in 0..max_attempts {
        rules::correct_boundaries(world, caps);
        rules::recompute_proximity(world);
        let threatened = rules::threatened_prey(world);
        if threatened.is_empty() {
            return None;
        }
        for id in threatened {
            if let Err(err) = rules::relocate(world, id, caps, rng) {
                tracing::warn!(agent = %id, %err, "setup relocation refused");
            }
        }
    }

    rules::correct_boundaries(world, caps);
    rules::recompute_proximity(world);
    let left = rules::threatened_prey(world).len();
    if left == 0 {
        return None;
    }
    let detail = format!("{left} prey still threatened after {max_attempts} passes");
    tracing::warn!(check = "setup_unsettled", %detail, "failsafe triggered");
    Some(FailsafeEvent {
        tick:   None,
        team:   None,
        role:   Some(Role::Prey),
        agent:  None,
        kind:   FailsafeKind::SetupUnsettled,
        detail,
    })
}
