//! `arena-sim` — match engine for the predator/prey arena.
//!
//! # Two-phase tick loop
//!
//! ```text
//! setup:
//!   place every team (prey, then predators), settle threatened prey,
//!   deliver admission/setup failsafes, raise the started flag.
//!
//! loop until at most one team has living prey (or max_ticks):
//!   ① Decide  — one worker thread per living agent runs its movement
//!               callback on a world snapshot; first action wins, a turn
//!               with no action becomes a wait.
//!   ── barrier ──
//!   ② Apply   — engine thread only:
//!                 drain commands in enqueue order
//!                 → boundary correction (horizontal, then vertical)
//!                 → proximity recompute
//!                 → eliminations (predators in spawn order)
//!                 → observer hooks, termination check
//!   ── barrier ──
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Rebuilds proximity lists on Rayon's thread pool.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use arena_core::MatchConfig;
//! use arena_sim::{NoopObserver, run_match};
//! use arena_strategy::Submission;
//!
//! let submissions = vec![
//!     Submission::new().team_name("Foxes"),
//!     Submission::new().team_name("Hens"),
//! ];
//! let outcome = run_match(&MatchConfig::default(), submissions, &mut NoopObserver)?;
//! println!("winner: {:?}", outcome.winner_name());
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod rules;
pub mod run;
pub(crate) mod worker;


pub use builder::EngineBuilder;
pub use engine::{Engine, MatchOutcome};
pub use error::{EngineError, EngineResult};
pub use observer::{FailsafeEvent, FailsafeKind, MatchObserver, NoopObserver, TeamPopulation};
pub use rules::Elimination;
pub use run::{run_match, unique_name};
