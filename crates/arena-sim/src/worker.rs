//! One persistent thread per agent.
//!
//! Every tick a worker runs its agent's decision callback against a world
//! snapshot, closes the turn, then meets the engine at the two barriers.
//! Eliminated agents keep meeting the barriers without deciding, so the
//! party count never changes.  After the second barrier a worker exits if
//! the engine has declared the match over.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Barrier, Condvar, Mutex, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use arena_agent::{
    AgentHandle, ArenaRules, Capabilities, CommandQueue, Role, TurnClose, TurnTicket, World,
};
use arena_core::{AgentId, AgentRng, TeamId, Tick};
use arena_sandbox::{SandboxOutcome, SandboxRunner, panic_message};
use arena_strategy::MovementFn;

use crate::{FailsafeEvent, FailsafeKind};

// ── Shared state ──────────────────────────────────────────────────────────────

/// State shared by the engine and every worker for the whole match.
pub(crate) struct Shared {
    /// The current world.  Workers clone the inner `Arc` at the start of the
    /// decide phase; the engine writes through `Arc::make_mut` in the apply
    /// phase.
    pub world: RwLock<Arc<World>>,
    pub queue: Arc<CommandQueue>,
    pub rules: Arc<ArenaRules>,
}

impl Shared {
    pub fn snapshot(&self) -> Arc<World> {
        Arc::clone(&self.world.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Synchronisation for one run: a start gate and the two per-tick barriers,
/// each with `agents + 1` parties.
pub(crate) struct Rendezvous {
    pub decided: Barrier,
    pub applied: Barrier,
    pub gate:    StartGate,
}

impl Rendezvous {
    pub fn new(parties: usize) -> Self {
        Self {
            decided: Barrier::new(parties),
            applied: Barrier::new(parties),
            gate:    StartGate::default(),
        }
    }
}

/// Holds workers back until every thread has been spawned.  If spawning
/// fails part-way the gate opens with "abort" and the spawned workers exit
/// without touching a barrier.
#[derive(Default)]
pub(crate) struct StartGate {
    state: Mutex<Option<bool>>,
    cv:    Condvar,
}

impl StartGate {
    pub fn open(&self, go: bool) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(go);
        self.cv.notify_all();
    }

    /// Block until opened.  `true` means play.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(go) = *state {
                return go;
            }
            state = self.cv.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

/// How a worker runs its callback.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Policy {
    /// On the worker thread, panics caught.
    Direct,
    /// On a monitored thread with a deadline.
    Sandboxed(SandboxRunner),
    /// The callback overran a live deadline; never call it again.
    AlwaysWait,
}

pub(crate) struct Worker {
    id:         AgentId,
    team:       TeamId,
    role:       Role,
    movement:   Arc<dyn MovementFn>,
    shared:     Arc<Shared>,
    rendezvous: Arc<Rendezvous>,
    events:     Sender<FailsafeEvent>,
    policy:     Policy,
    seed:       u64,
    rng:        Option<AgentRng>,
    reseeds:    u64,
    /// Set when a sandboxed callback acted but had not yet returned.
    straggler:  Option<Straggler>,
    tick:       Tick,
}

/// Raises its flag when dropped, including during unwinding.
struct Finished(Arc<AtomicBool>);

impl Drop for Finished {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// A sandboxed call that acted and was left running.
struct Straggler {
    done:    Arc<AtomicBool>,
    started: Instant,
}

impl Straggler {
    /// Poll until the call returns or `deadline` has passed since it started.
    /// Returns the elapsed time if the deadline passed first.
    fn finish_within(&self, deadline: Duration, poll: Duration) -> Result<(), Duration> {
        loop {
            if self.done.load(Ordering::Acquire) {
                return Ok(());
            }
            let elapsed = self.started.elapsed();
            if elapsed >= deadline {
                return Err(elapsed);
            }
            thread::sleep(poll.min(deadline - elapsed));
        }
    }
}

impl Worker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id:         AgentId,
        team:       TeamId,
        role:       Role,
        movement:   Arc<dyn MovementFn>,
        shared:     Arc<Shared>,
        rendezvous: Arc<Rendezvous>,
        events:     Sender<FailsafeEvent>,
        policy:     Policy,
        seed:       u64,
        tick:       Tick,
    ) -> Self {
        Self {
            id,
            team,
            role,
            movement,
            shared,
            rendezvous,
            events,
            policy,
            seed,
            rng: Some(AgentRng::new(seed, id)),
            reseeds: 0,
            straggler: None,
            tick,
        }
    }

    pub fn run(mut self) {
        if !self.rendezvous.gate.wait() {
            return;
        }
        loop {
            self.take_turn();
            self.rendezvous.decided.wait();
            self.rendezvous.applied.wait();
            if self.shared.rules.is_game_over() {
                break;
            }
            self.tick = self.tick.next();
        }
        tracing::trace!(agent = %self.id, "worker exiting");
    }

    /// Decide phase for one tick.  Everything that borrows the world is
    /// dropped on return, before the first barrier.
    fn take_turn(&mut self) {
        let world = self.shared.snapshot();
        if !world.agent(self.id).is_some_and(|a| a.is_alive()) {
            return;
        }

        let queue = Arc::clone(&self.shared.queue);
        let caps: Arc<dyn Capabilities> = self.shared.rules.clone();
        let ticket = queue.open_turn(self.id);
        let handle = AgentHandle::new(Arc::clone(&world), Arc::clone(&queue), caps, ticket);

        let policy = self.policy;
        let returned = match policy {
            Policy::AlwaysWait => {
                handle.wait();
                true
            }
            Policy::Direct => {
                let rng = self.rng.get_or_insert_with(|| AgentRng::new(self.seed, self.id));
                let movement = &self.movement;
                match panic::catch_unwind(AssertUnwindSafe(|| movement.decide(&handle, &world, rng))) {
                    Ok(()) => true,
                    Err(payload) => {
                        self.report(FailsafeKind::LiveFault, panic_message(payload.as_ref()));
                        false
                    }
                }
            }
            Policy::Sandboxed(runner) => {
                self.decide_sandboxed(runner, handle, Arc::clone(&world), Arc::clone(&queue), ticket)
            }
        };

        if queue.close_turn(ticket) == TurnClose::Forced && returned {
            self.report(FailsafeKind::SilentTurn, "callback returned without acting".into());
        }
    }

    /// Returns `true` if the callback finished normally or at least acted.
    fn decide_sandboxed(
        &mut self,
        runner: SandboxRunner,
        handle: AgentHandle,
        world:  Arc<World>,
        queue:  Arc<CommandQueue>,
        ticket: TurnTicket,
    ) -> bool {
        // Last tick's call acted and may still be running.  It gets the rest
        // of its own deadline before another thread is stacked on top.
        if let Some(straggler) = self.straggler.take() {
            if let Err(elapsed) = straggler.finish_within(runner.deadline(), runner.poll_interval()) {
                handle.wait();
                self.pin(format!(
                    "previous decision still running after {} ms (deadline {} ms)",
                    elapsed.as_millis(),
                    runner.deadline().as_millis()
                ));
                return true;
            }
        }

        let mut rng = match self.rng.take() {
            Some(rng) => rng,
            None      => self.fresh_rng(),
        };
        let movement = Arc::clone(&self.movement);
        let label = self.id.to_string();
        let done = Arc::new(AtomicBool::new(false));
        let finished = Finished(Arc::clone(&done));
        let started = Instant::now();

        let outcome = runner.run_until(
            &label,
            move || {
                let _finished = finished;
                movement.decide(&handle, &world, &mut rng);
                rng
            },
            || queue.has_acted(ticket),
        );

        match outcome {
            Ok(SandboxOutcome::Completed(Some(rng))) => {
                self.rng = Some(rng);
                true
            }
            // Acted, but the callback is still running.  It keeps its RNG.
            Ok(SandboxOutcome::Completed(None)) => {
                self.straggler = Some(Straggler { done, started });
                true
            }
            Ok(SandboxOutcome::Faulted(msg)) => {
                self.report(FailsafeKind::LiveFault, msg);
                false
            }
            // Closing the turn here invalidates the ticket, so the abandoned
            // call cannot act once the timeout is decided.
            Ok(SandboxOutcome::TimedOut) => match queue.close_turn(ticket) {
                // Acted between the deadline and the close.
                TurnClose::Acted(_) => {
                    self.straggler = Some(Straggler { done, started });
                    true
                }
                _ => {
                    self.pin(format!("no action within {} ms", runner.deadline().as_millis()));
                    false
                }
            },
            Err(err) => {
                self.report(FailsafeKind::LiveFault, err.to_string());
                false
            }
        }
    }

    /// Permanently switch to always-wait.
    fn pin(&mut self, why: String) {
        self.report(FailsafeKind::LiveTimeout, format!("{why}; agent now always waits"));
        self.policy = Policy::AlwaysWait;
    }

    fn fresh_rng(&mut self) -> AgentRng {
        self.reseeds += 1;
        AgentRng::new(self.seed.wrapping_add(self.reseeds.wrapping_mul(0x9e37_79b9)), self.id)
    }

    fn report(&self, kind: FailsafeKind, detail: String) {
        tracing::warn!(
            tick = %self.tick,
            team = %self.team,
            role = %self.role,
            agent = %self.id,
            check = %kind,
            %detail,
            "failsafe triggered"
        );
        // The engine only hangs up after every worker has been joined.
        let _ = self.events.send(FailsafeEvent {
            tick:  Some(self.tick),
            team:  Some(self.team),
            role:  Some(self.role),
            agent: Some(self.id),
            kind,
            detail,
        });
    }
}
