//! Plain data row types written by output backends.

/// One team's live-prey count after a population change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationRow {
    pub tick:      u64,
    pub team:      String,
    pub live_prey: u64,
}

/// One failsafe substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailsafeRow {
    /// `None` for substitutions made before the first tick.
    pub tick:  Option<u64>,
    /// Team name; `None` for board-wide events.
    pub team:  Option<String>,
    /// `"prey"`, `"predator"`, or `None` when the event has no role.
    pub role:  Option<String>,
    /// Failsafe kind, e.g. `silent_turn` or `admission:prey_color`.
    pub check: String,
}

/// How the match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Winning team name; `None` if nobody won.
    pub winner: Option<String>,
    pub ticks:  u64,
}
