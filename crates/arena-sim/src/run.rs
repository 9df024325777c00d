//! One-call entry point: admit raw submissions, build, and play.

use std::collections::HashSet;

use arena_core::MatchConfig;
use arena_sandbox::StrategyValidator;
use arena_strategy::Submission;

use crate::{EngineBuilder, EngineResult, MatchObserver, MatchOutcome};

/// Admit every submission, give each team a unique name, place, settle and
/// run the match to the end.
///
/// Teams are numbered in submission order.  Rejected fields become failsafe
/// events delivered to `observer` before the first tick.
pub fn run_match<O: MatchObserver>(
    config:      &MatchConfig,
    submissions: Vec<Submission>,
    observer:    &mut O,
) -> EngineResult<MatchOutcome> {
    config.validate()?;

    let mut validator = StrategyValidator::new(config);
    let mut taken = HashSet::with_capacity(submissions.len());
    let mut builder = EngineBuilder::new(config.clone());

    for submission in submissions {
        let mut admission = validator.admit(submission)?;
        let name = unique_name(&admission.team.name, &mut taken);
        if name != admission.team.name {
            tracing::debug!(from = %admission.team.name, to = %name, "team renamed");
            admission.team.name = name;
        }
        builder = builder.admitted(admission);
    }

    builder.build()?.run(observer)
}

/// Return `name`, or `name#2`, `name#3`, … if it is already taken, and mark
/// the result as taken.
pub fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_owned()) {
        return name.to_owned();
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{name}#{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
