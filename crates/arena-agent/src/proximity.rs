//! Per-agent proximity lists.
//!
//! Every apply phase the engine rebuilds, for each living agent, four lists
//! of observations of every other living agent, bucketed by team equality
//! and role, each sorted ascending by distance.  Lists are never patched
//! incrementally.

use arena_core::AgentId;

/// Where another agent is, relative to the observer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelativeLocation {
    /// Absolute bearing from the observer to the other agent, `[0, 360)`.
    pub angle: f64,
    /// Euclidean distance, `>= 0`.
    pub distance: f64,
    /// Who was observed.  `AgentId::INVALID` for the sentinel.
    pub other: AgentId,
}

impl RelativeLocation {
    /// Returned by the `closest_*` accessors when a list is empty.
    pub const SENTINEL: RelativeLocation = RelativeLocation {
        angle:    1.0,
        distance: 1.0,
        other:    AgentId::INVALID,
    };

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.other == AgentId::INVALID
    }
}

/// The four relationship buckets seen by one agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Proximity {
    pub ally_prey:       Vec<RelativeLocation>,
    pub ally_predators:  Vec<RelativeLocation>,
    pub enemy_prey:      Vec<RelativeLocation>,
    pub enemy_predators: Vec<RelativeLocation>,
}

impl Proximity {
    /// Sort every bucket ascending by distance.
    ///
    /// `total_cmp` keeps the sort total even if a NaN distance slipped in.
    pub fn sort(&mut self) {
        for list in self.lists_mut() {
            list.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        }
    }

    /// Drop observations of agents for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(AgentId) -> bool) {
        for list in self.lists_mut() {
            list.retain(|loc| keep(loc.other));
        }
    }

    pub fn clear(&mut self) {
        for list in self.lists_mut() {
            list.clear();
        }
    }

    /// Total observations across all buckets.
    pub fn len(&self) -> usize {
        self.ally_prey.len()
            + self.ally_predators.len()
            + self.enemy_prey.len()
            + self.enemy_predators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn closest_ally_prey(&self) -> RelativeLocation {
        closest(&self.ally_prey)
    }

    pub fn closest_ally_predator(&self) -> RelativeLocation {
        closest(&self.ally_predators)
    }

    pub fn closest_enemy_prey(&self) -> RelativeLocation {
        closest(&self.enemy_prey)
    }

    pub fn closest_enemy_predator(&self) -> RelativeLocation {
        closest(&self.enemy_predators)
    }

    fn lists_mut(&mut self) -> [&mut Vec<RelativeLocation>; 4] {
        [
            &mut self.ally_prey,
            &mut self.ally_predators,
            &mut self.enemy_prey,
            &mut self.enemy_predators,
        ]
    }
}

#[inline]
fn closest(list: &[RelativeLocation]) -> RelativeLocation {
    list.first().copied().unwrap_or(RelativeLocation::SENTINEL)
}
