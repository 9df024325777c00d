//! Match observer trait for rendering, logging and data collection.

use std::fmt;

use arena_agent::{Role, World};
use arena_core::{AgentId, TeamId, Tick};
use arena_sandbox::Check;
use arena_strategy::Team;

use crate::MatchOutcome;

/// What kind of safe default was substituted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailsafeKind {
    /// A submission field was rejected at admission.
    Admission(Check),
    /// A placement callback returned something other than two finite
    /// coordinates.
    PlacementShape,
    /// A placement callback panicked at setup.
    PlacementFault,
    /// A placement callback overran its deadline at setup (sandbox mode).
    PlacementTimeout,
    /// Setup settling gave up before the board was settled.
    SetupUnsettled,
    /// A decision callback returned without calling any action.
    SilentTurn,
    /// A decision callback panicked during a tick.
    LiveFault,
    /// A decision callback overran the live deadline; the agent now always
    /// waits.
    LiveTimeout,
}

impl fmt::Display for FailsafeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailsafeKind::Admission(check) => write!(f, "admission:{check}"),
            FailsafeKind::PlacementShape   => f.write_str("placement_shape"),
            FailsafeKind::PlacementFault   => f.write_str("placement_fault"),
            FailsafeKind::PlacementTimeout => f.write_str("placement_timeout"),
            FailsafeKind::SetupUnsettled   => f.write_str("setup_unsettled"),
            FailsafeKind::SilentTurn       => f.write_str("silent_turn"),
            FailsafeKind::LiveFault        => f.write_str("live_fault"),
            FailsafeKind::LiveTimeout      => f.write_str("live_timeout"),
        }
    }
}

/// One substitution of a safe default for misbehaving team input.
#[derive(Clone, Debug, PartialEq)]
pub struct FailsafeEvent {
    /// `None` before the first tick.
    pub tick:   Option<Tick>,
    pub team:   Option<TeamId>,
    pub role:   Option<Role>,
    pub agent:  Option<AgentId>,
    pub kind:   FailsafeKind,
    pub detail: String,
}

/// Live prey of one team after a population change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamPopulation {
    pub team:      TeamId,
    pub name:      String,
    pub live_prey: usize,
}

/// Callbacks invoked by [`Engine::run`][crate::Engine::run], always on the
/// engine thread.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — scoreboard
///
/// ```rust,ignore
/// struct Scoreboard;
///
/// impl MatchObserver for Scoreboard {
///     fn on_population_change(&mut self, tick: Tick, teams: &[TeamPopulation]) {
///         for t in teams {
///             println!("{tick} {}: {}", t.name, t.live_prey);
///         }
///     }
/// }
/// ```
pub trait MatchObserver {
    /// Called once, after placement and settling, before the first tick.
    fn on_setup(&mut self, _world: &World, _teams: &[Team]) {}

    /// Called after every apply phase with the updated world.  This is the
    /// draw/refresh event.
    fn on_tick_end(&mut self, _tick: Tick, _world: &World) {}

    /// Called when any team's live-prey count changed during `tick`.
    fn on_population_change(&mut self, _tick: Tick, _teams: &[TeamPopulation]) {}

    /// Called for every failsafe substitution.  The ones made at admission
    /// and setup arrive right after `on_setup`.
    fn on_failsafe(&mut self, _event: &FailsafeEvent) {}

    /// Called once after the last tick.
    fn on_match_end(&mut self, _outcome: &MatchOutcome) {}
}

/// A [`MatchObserver`] that does nothing.
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}
