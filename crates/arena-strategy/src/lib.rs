//! `arena-strategy` — what a team hands to the arena.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`color`]    | `Color` (named or RGB), shape validation                        |
//! | [`model`]    | `PlacementFn` and `MovementFn` traits                           |
//! | [`team`]     | `Submission` (raw, possibly incomplete) and `Team` (admitted)   |
//! | [`defaults`] | `RandomPlacement`, `RandomWalk`, `AlwaysWait`                   |
//! | [`error`]    | `StrategyError`, `StrategyResult<T>`                            |
//!
//! # Design notes
//!
//! A `Submission` is untrusted: any field may be missing or malformed and any
//! callback may panic or never return.  `arena-sandbox` turns a submission
//! into a `Team`, substituting the defaults from [`defaults`] field by field.
//! A `Team` is immutable once built and cheap to clone (callbacks are
//! `Arc`-shared), so the engine can hand a copy to every worker thread.

pub mod color;
pub mod defaults;
pub mod error;
pub mod model;
pub mod team;

#[cfg(test)]
mod tests;

pub use color::Color;
pub use defaults::{AlwaysWait, RandomPlacement, RandomWalk, DEFAULT_COLOR, DEFAULT_TEAM_NAME};
pub use error::{StrategyError, StrategyResult};
pub use model::{MovementFn, PlacementFn};
pub use team::{Submission, Team, check_name};
