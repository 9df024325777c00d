//! `arena-agent` — agent state and the agent-facing API of the arena.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`agent`]         | `Agent`, `Role`, the applied side of every motion         |
//! | [`proximity`]     | `RelativeLocation`, `Proximity` (four sorted lists)       |
//! | [`world`]         | `World` — bounds, kill radius, live-agent registries      |
//! | [`queue`]         | `CommandQueue` — pending commands + energy ledger, one lock |
//! | [`capabilities`]  | `Capabilities` trait, `ArenaRules`, `Edge`, `Corner`      |
//! | [`handle`]        | `AgentHandle` — what a decision callback sees each tick   |
//! | [`error`]         | `AgentError`, `AgentResult<T>`                            |
//!
//! # Ownership model
//!
//! Position, heading, alive flag and proximity lists live in [`World`] and
//! are only written by the engine during the apply phase.  Energy and the
//! per-tick action slot live in [`CommandQueue`] behind a single mutex,
//! because agents spend energy from their own threads during the decide
//! phase.

pub mod agent;
pub mod capabilities;
pub mod error;
pub mod handle;
pub mod proximity;
pub mod queue;
pub mod world;

#[cfg(test)]
mod tests;

pub use agent::{Agent, Role};
pub use capabilities::{ArenaRules, Capabilities, Corner, Edge};
pub use error::{AgentError, AgentResult};
pub use handle::AgentHandle;
pub use proximity::{Proximity, RelativeLocation};
pub use queue::{Command, CommandQueue, Motion, Primitive, TurnClose, TurnTicket};
pub use world::World;
