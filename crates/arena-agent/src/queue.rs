//! `CommandQueue` — the only state agents write to during the decide phase.
//!
//! One mutex guards both the FIFO of pending motion commands and the energy
//! ledger, so an action's cost, its command, and the "already acted this tick"
//! mark are recorded atomically.  Contention is limited to these short
//! critical sections; the engine drains the queue single-threaded between
//! the two rendezvous points.
//!
//! # Turns
//!
//! Each tick a worker opens a turn for its agent and receives a
//! [`TurnTicket`].  The first action primitive issued with a live ticket takes
//! effect; later ones in the same turn are ignored.  Closing the turn performs
//! the terminal wait: it credits the wait energy and clears the "just ate"
//! flag, or — if no primitive fired — forces a wait on the agent's behalf.
//! Closing also invalidates the ticket, so a cancelled callback that wakes up
//! later can never touch the ledger again.
//!
//! Command order within a tick is the order in which worker threads took the
//! lock.  That order is not deterministic across runs.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use arena_core::AgentId;

/// Energy gained by an explicit (or engine-forced) `wait()`.
pub const WAIT_BONUS: f64 = 10.0;
/// Energy gained by the implicit wait that ends every other primitive.
pub const IMPLICIT_WAIT_BONUS: f64 = 5.0;
/// Energy a turn primitive costs when it actually turns.
pub const TURN_COST: f64 = 1.0;
/// Energy a predator gains per prey eliminated.
pub const MEAL_BONUS: f64 = 10.0;

/// A world-mutating effect, already clamped and paid for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Motion {
    Forward(f64),
    Backward(f64),
    Left(f64),
    Right(f64),
    SetHeading(f64),
}

/// An entry of the queue: one agent's motion for this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Command {
    pub agent:  AgentId,
    pub motion: Motion,
}

/// The action primitives of the agent API.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    Forward,
    Backward,
    Left,
    Right,
    SetHeading,
    Wait,
}

impl Primitive {
    /// Energy credited by the wait that ends a turn spent on this primitive.
    #[inline]
    pub fn wait_credit(self) -> f64 {
        match self {
            Primitive::Wait => WAIT_BONUS,
            _               => IMPLICIT_WAIT_BONUS,
        }
    }
}

/// Proof that a turn is open for one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnTicket {
    pub agent: AgentId,
    turn:      u64,
}

/// How a turn ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnClose {
    /// The callback issued this primitive.
    Acted(Primitive),
    /// Nothing fired; the engine injected a bonus wait.
    Forced,
    /// The ticket was stale or the turn had already been closed.
    AlreadyClosed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TurnState {
    Closed,
    Open,
    Acted(Primitive),
}

#[derive(Clone, Debug)]
struct Slot {
    energy:   f64,
    just_ate: bool,
    turn:     u64,
    state:    TurnState,
}

#[derive(Debug, Default)]
struct Ledger {
    commands: VecDeque<Command>,
    slots:    Vec<Slot>,
}

/// Thread-safe FIFO of at most one pending command per agent per tick, plus
/// every agent's energy.
#[derive(Debug)]
pub struct CommandQueue {
    ledger: Mutex<Ledger>,
}

impl CommandQueue {
    /// A queue for `agent_count` agents, each starting with `starting_energy`.
    pub fn new(agent_count: usize, starting_energy: f64) -> Self {
        let slot = Slot {
            energy:   starting_energy.max(0.0),
            just_ate: false,
            turn:     0,
            state:    TurnState::Closed,
        };
        Self {
            ledger: Mutex::new(Ledger {
                commands: VecDeque::new(),
                slots:    vec![slot; agent_count],
            }),
        }
    }

    // A panic while holding the lock can only come from this module, never
    // from strategy code, so the ledger is still consistent.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Turns ─────────────────────────────────────────────────────────────

    /// Open a new turn for `agent`, invalidating any older ticket.
    pub fn open_turn(&self, agent: AgentId) -> TurnTicket {
        let mut ledger = self.lock();
        let slot = &mut ledger.slots[agent.index()];
        slot.turn += 1;
        slot.state = TurnState::Open;
        TurnTicket { agent, turn: slot.turn }
    }

    /// Issue one action primitive.
    ///
    /// Returns `true` if this call consumed the turn, `false` if it was
    /// ignored because the turn was already used, closed, or superseded.
    ///
    /// - `Forward`/`Backward`: displacement = min(magnitude, energy,
    ///   max_speed), paid in energy, enqueued.
    /// - `Left`/`Right`/`SetHeading`: costs [`TURN_COST`] and is enqueued
    ///   only if the agent can afford it; the turn is consumed either way.
    /// - `Wait`: nothing enqueued.
    ///
    /// Non-finite or negative speeds are clamped to zero; non-finite angles
    /// are treated as zero.
    pub fn act(&self, ticket: TurnTicket, primitive: Primitive, magnitude: f64, max_speed: f64) -> bool {
        let mut ledger = self.lock();
        let Ledger { commands, slots } = &mut *ledger;
        let slot = &mut slots[ticket.agent.index()];
        if slot.turn != ticket.turn || slot.state != TurnState::Open {
            return false;
        }
        slot.state = TurnState::Acted(primitive);

        let motion = match primitive {
            Primitive::Wait => None,
            Primitive::Forward | Primitive::Backward => {
                let requested = if magnitude.is_finite() { magnitude.max(0.0) } else { 0.0 };
                let displacement = requested.min(slot.energy).min(max_speed.max(0.0));
                slot.energy = (slot.energy - displacement).max(0.0);
                Some(if primitive == Primitive::Forward {
                    Motion::Forward(displacement)
                } else {
                    Motion::Backward(displacement)
                })
            }
            Primitive::Left | Primitive::Right | Primitive::SetHeading => {
                if slot.energy >= TURN_COST {
                    slot.energy -= TURN_COST;
                    let angle = if magnitude.is_finite() { magnitude } else { 0.0 };
                    Some(match primitive {
                        Primitive::Left  => Motion::Left(angle),
                        Primitive::Right => Motion::Right(angle),
                        _                => Motion::SetHeading(angle.rem_euclid(360.0)),
                    })
                } else {
                    None
                }
            }
        };

        if let Some(motion) = motion {
            commands.push_back(Command { agent: ticket.agent, motion });
        }
        true
    }

    /// `true` once a primitive has fired under this ticket.
    pub fn has_acted(&self, ticket: TurnTicket) -> bool {
        let ledger = self.lock();
        let slot = &ledger.slots[ticket.agent.index()];
        slot.turn == ticket.turn && matches!(slot.state, TurnState::Acted(_))
    }

    /// Perform the terminal wait and close the turn.
    pub fn close_turn(&self, ticket: TurnTicket) -> TurnClose {
        let mut ledger = self.lock();
        let slot = &mut ledger.slots[ticket.agent.index()];
        if slot.turn != ticket.turn {
            return TurnClose::AlreadyClosed;
        }
        let outcome = match slot.state {
            TurnState::Closed       => return TurnClose::AlreadyClosed,
            TurnState::Open         => TurnClose::Forced,
            TurnState::Acted(prim)  => TurnClose::Acted(prim),
        };
        slot.energy += match outcome {
            TurnClose::Acted(prim) => prim.wait_credit(),
            _                      => WAIT_BONUS,
        };
        slot.just_ate = false;
        slot.state = TurnState::Closed;
        outcome
    }

    // ── Engine side ───────────────────────────────────────────────────────

    /// Remove every pending command, in enqueue order.
    pub fn drain(&self) -> Vec<Command> {
        self.lock().commands.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().commands.is_empty()
    }

    /// Reward a predator for an elimination and raise its one-tick flag.
    pub fn credit_meal(&self, predator: AgentId) {
        let mut ledger = self.lock();
        let slot = &mut ledger.slots[predator.index()];
        slot.energy += MEAL_BONUS;
        slot.just_ate = true;
    }

    // ── Observation ───────────────────────────────────────────────────────

    pub fn energy(&self, agent: AgentId) -> f64 {
        self.lock().slots[agent.index()].energy
    }

    pub fn just_ate(&self, agent: AgentId) -> bool {
        self.lock().slots[agent.index()].just_ate
    }

    pub fn agent_count(&self) -> usize {
        self.lock().slots.len()
    }
}
