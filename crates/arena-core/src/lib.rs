//! `arena-core` — foundational types for the predator/prey arena.
//!
//! This crate is a dependency of every other `arena-*` crate.  It has no
//! `arena-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `TeamId`                                        |
//! | [`geo`]    | `Point`, `Bounds`, `Axis`, heading and bearing helpers     |
//! | [`time`]   | `Tick`                                                     |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (match-level)             |
//! | [`config`] | `MatchConfig`                                              |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::MatchConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Axis, Bounds, Point, bearing_deg, normalize_heading};
pub use ids::{AgentId, TeamId};
pub use rng::{AgentRng, SimRng};
pub use time::Tick;
