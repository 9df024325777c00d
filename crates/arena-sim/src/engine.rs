//! The `Engine` struct and its tick loop.

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, PoisonError};
use std::thread::{self, JoinHandle};

use arena_agent::{Capabilities, World};
use arena_core::{AgentId, MatchConfig, TeamId, Tick};
use arena_sandbox::SandboxRunner;
use arena_strategy::Team;

use crate::rules;
use crate::worker::{Policy, Rendezvous, Shared, Worker};
use crate::{EngineError, EngineResult, FailsafeEvent, MatchObserver, TeamPopulation};

// ── MatchOutcome ──────────────────────────────────────────────────────────────

/// How a match ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    /// The first team, in team order, that still has prey once at most one
    /// does.  `None` if no team has prey left, or if the tick cap stopped a
    /// match that more than one team was still in.
    pub winner:    Option<TeamId>,
    /// Ticks played.
    pub ticks:     u64,
    /// Live prey per team, indexed by `TeamId`.
    pub live_prey: Vec<usize>,
    /// Team names, indexed by `TeamId`.
    pub teams:     Vec<String>,
}

impl MatchOutcome {
    pub fn winner_name(&self) -> Option<&str> {
        self.winner
            .and_then(|t| self.teams.get(t.index()))
            .map(String::as_str)
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// The match scheduler.
///
/// `run` spawns one worker thread per agent and drives them through
/// barrier-separated ticks:
///
/// 1. **Decide** (workers, concurrent): every living agent's callback reads
///    a world snapshot and issues at most one action; the worker closes the
///    turn, forcing a wait if nothing fired.  Workers then meet the engine at
///    the first barrier.
/// 2. **Apply** (engine thread only): drain the command queue in enqueue
///    order, correct boundaries, recompute proximity, resolve eliminations,
///    notify observers, check termination.  Then everyone meets at the second
///    barrier.
///
/// Enqueue order within a tick follows lock acquisition by racing worker
/// threads and is not reproducible between runs.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct Engine {
    pub(crate) config:    MatchConfig,
    pub(crate) teams:     Vec<Team>,
    pub(crate) shared:    Arc<Shared>,
    pub(crate) tick:      Tick,
    pub(crate) live_prey: Vec<usize>,
    /// Admission and setup failsafes, delivered when `run` starts.
    pub(crate) pending:   Vec<FailsafeEvent>,
}

impl Engine {
    // ── Public API ────────────────────────────────────────────────────────

    /// Play the match to the end and return the outcome.
    pub fn run<O: MatchObserver>(&mut self, observer: &mut O) -> EngineResult<MatchOutcome> {
        observer.on_setup(&self.shared.snapshot(), &self.teams);
        for event in self.pending.drain(..) {
            observer.on_failsafe(&event);
        }

        tracing::info!(
            teams = self.teams.len(),
            agents = self.shared.snapshot().agent_count(),
            sandbox = self.config.sandbox,
            "match started"
        );
        self.shared.rules.start();

        if !self.is_over() {
            self.play(observer)?;
        }
        self.shared.rules.set_game_over(true);

        let outcome = self.outcome();
        match outcome.winner_name() {
            Some(name) => tracing::info!(ticks = outcome.ticks, winner = name, "match over"),
            None       => tracing::info!(ticks = outcome.ticks, "match over without a winner"),
        }
        observer.on_match_end(&outcome);
        Ok(outcome)
    }

    /// Current world snapshot.
    pub fn world(&self) -> Arc<World> {
        self.shared.snapshot()
    }

    pub fn energy(&self, agent: AgentId) -> f64 {
        self.shared.queue.energy(agent)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Ticks played so far.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Live prey per team, indexed by `TeamId`.
    pub fn live_prey(&self) -> &[usize] {
        &self.live_prey
    }

    /// `true` once at most one team has living prey, or the tick cap is hit.
    pub fn is_over(&self) -> bool {
        rules::is_decided(&self.live_prey)
            || self.config.max_ticks.is_some_and(|cap| self.tick.0 >= cap)
    }

    pub fn outcome(&self) -> MatchOutcome {
        let winner = if rules::is_decided(&self.live_prey) {
            rules::first_surviving(&self.live_prey)
        } else {
            None
        };
        MatchOutcome {
            winner,
            ticks:     self.tick.0,
            live_prey: self.live_prey.clone(),
            teams:     self.teams.iter().map(|t| t.name.clone()).collect(),
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    fn play<O: MatchObserver>(&mut self, observer: &mut O) -> EngineResult<()> {
        let world = self.shared.snapshot();
        let agent_count = world.agent_count();
        let rendezvous = Arc::new(Rendezvous::new(agent_count + 1));
        let (tx, rx) = mpsc::channel();

        let policy = if self.config.sandbox {
            Policy::Sandboxed(SandboxRunner::new(
                self.config.decision_deadline(),
                self.config.poll_interval(),
            ))
        } else {
            Policy::Direct
        };

        // ── Spawn one worker per agent ────────────────────────────────────
        let mut workers: Vec<(AgentId, JoinHandle<()>)> = Vec::with_capacity(agent_count);
        for agent in world.agents() {
            let Some(team) = self.teams.get(agent.team.index()) else { continue };
            let worker = Worker::new(
                agent.id,
                agent.team,
                agent.role,
                Arc::clone(team.movement(agent.role)),
                Arc::clone(&self.shared),
                Arc::clone(&rendezvous),
                tx.clone(),
                policy,
                self.config.seed,
                self.tick,
            );
            let spawned = thread::Builder::new()
                .name(format!("agent-{}", agent.id.0))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => workers.push((agent.id, handle)),
                Err(err) => {
                    rendezvous.gate.open(false);
                    for (_, handle) in workers {
                        let _ = handle.join();
                    }
                    return Err(EngineError::Spawn(err));
                }
            }
        }
        drop(tx);
        drop(world);
        rendezvous.gate.open(true);

        // ── Ticks ─────────────────────────────────────────────────────────
        loop {
            rendezvous.decided.wait();
            forward_failsafes(&rx, observer);
            let over = self.apply_tick(observer);
            rendezvous.applied.wait();
            if over {
                break;
            }
        }

        let mut panicked = None;
        for (id, handle) in workers {
            if handle.join().is_err() {
                panicked.get_or_insert(id);
            }
        }
        forward_failsafes(&rx, observer);
        match panicked {
            Some(id) => Err(EngineError::WorkerPanicked(id)),
            None     => Ok(()),
        }
    }

    /// The apply phase.  Returns `true` if the match is over; in that case
    /// the game-over flag is already raised so workers exit after the second
    /// barrier.
    fn apply_tick<O: MatchObserver>(&mut self, observer: &mut O) -> bool {
        let now = self.tick;
        let commands = self.shared.queue.drain();
        let caps: &dyn Capabilities = &*self.shared.rules;

        let eliminations = {
            let mut slot = self.shared.world.write().unwrap_or_else(PoisonError::into_inner);
            // Copies only if an abandoned sandboxed callback still holds a
            // snapshot.
            let world = Arc::make_mut(&mut slot);

            rules::apply_commands(world, &commands);
            let corrected = rules::correct_boundaries(world, caps);
            rules::recompute_proximity(world);
            let eaten = rules::resolve_eliminations(world, caps, &self.shared.queue);

            tracing::debug!(
                tick = %now,
                commands = commands.len(),
                corrected,
                eliminations = eaten.len(),
                "apply phase"
            );
            eaten
        };

        let world = self.shared.snapshot();
        if !eliminations.is_empty() {
            for e in &eliminations {
                tracing::debug!(tick = %now, predator = %e.predator, prey = %e.prey, "prey eliminated");
            }
            let counts = rules::live_prey(&world, self.teams.len());
            if counts != self.live_prey {
                self.live_prey = counts;
                observer.on_population_change(now, &self.population());
            }
        }
        observer.on_tick_end(now, &world);

        self.tick = now.next();
        let over = self.is_over();
        if over {
            self.shared.rules.set_game_over(true);
        }
        over
    }

    fn population(&self) -> Vec<TeamPopulation> {
        self.teams
            .iter()
            .zip(&self.live_prey)
            .enumerate()
            .map(|(i, (team, &live_prey))| TeamPopulation {
                team: TeamId(i as u16),
                name: team.name.clone(),
                live_prey,
            })
            .collect()
    }
}

fn forward_failsafes<O: MatchObserver>(rx: &Receiver<FailsafeEvent>, observer: &mut O) {
    for event in rx.try_iter() {
        observer.on_failsafe(&event);
    }
}
