//! `arena-sandbox` — running code we do not trust.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`runner`]    | `SandboxRunner`, `SandboxOutcome` — one monitored call         |
//! | [`validator`] | `StrategyValidator`, `Admission`, `Check` — pre-match gate     |
//! | [`error`]     | `SandboxError`, `SandboxResult<T>`                            |
//!
//! # Cancellation
//!
//! Safe Rust cannot kill a thread.  A callback that overruns its deadline is
//! simply never waited on again: its thread is detached and keeps whatever
//! `Arc`s it captured alive until it finishes, if ever.  Callers make that
//! harmless by only handing sandboxed code owned snapshots and turn tickets
//! that go stale once the caller moves on.

pub mod error;
pub mod runner;
pub mod validator;

#[cfg(test)]
mod tests;

pub use error::{SandboxError, SandboxResult};
pub use runner::{SandboxOutcome, SandboxRunner, panic_message};
pub use validator::{Admission, Check, Rejection, StrategyValidator};
