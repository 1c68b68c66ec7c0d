/// Hint map cache: one hint map set per cost profile.
///
/// Each set is rebuilt off to the side and swapped in whole, so a reader
/// holding a snapshot (`Arc<HintMapSet>`) never sees a half-built set.

use std::sync::Arc;

use crate::config::CostConfig;
use crate::domain::entity::ProfileKind;
use crate::domain::grid::Grid;
use crate::domain::hint::HintMapSet;
use crate::domain::pathfinder;
use crate::domain::target::TargetRegistry;

#[derive(Clone, Debug)]
pub struct HintCache {
    costs: CostConfig,
    careful: Arc<HintMapSet>,
    reckless: Arc<HintMapSet>,
    /// Completed rebuilds per profile: (careful, reckless).
    generations: (u64, u64),
}

impl HintCache {
    /// Empty cache; call `recompute` before querying.
    pub fn new(costs: CostConfig) -> Self {
        HintCache {
            costs,
            careful: Arc::default(),
            reckless: Arc::default(),
            generations: (0, 0),
        }
    }

    /// Rerun the batch pathfinder for every active target and swap the
    /// profile's set.
    pub fn recompute(&mut self, kind: ProfileKind, grid: &Grid, targets: &TargetRegistry) {
        let fresh = Arc::new(pathfinder::compute_hint_maps(grid, targets, self.costs.profile(kind)));
        match kind {
            ProfileKind::Careful => {
                self.careful = fresh;
                self.generations.0 += 1;
            }
            ProfileKind::Reckless => {
                self.reckless = fresh;
                self.generations.1 += 1;
            }
        }
    }

    pub fn recompute_reckless(&mut self, grid: &Grid, targets: &TargetRegistry) {
        self.recompute(ProfileKind::Reckless, grid, targets);
    }

    pub fn recompute_all(&mut self, grid: &Grid, targets: &TargetRegistry) {
        self.recompute(ProfileKind::Careful, grid, targets);
        self.recompute(ProfileKind::Reckless, grid, targets);
    }

    pub fn set(&self, kind: ProfileKind) -> &HintMapSet {
        match kind {
            ProfileKind::Careful => &self.careful,
            ProfileKind::Reckless => &self.reckless,
        }
    }

    /// Shared handle to the current set; stays valid across later swaps.
    pub fn snapshot(&self, kind: ProfileKind) -> Arc<HintMapSet> {
        match kind {
            ProfileKind::Careful => Arc::clone(&self.careful),
            ProfileKind::Reckless => Arc::clone(&self.reckless),
        }
    }

    pub fn generation(&self, kind: ProfileKind) -> u64 {
        match kind {
            ProfileKind::Careful => self.generations.0,
            ProfileKind::Reckless => self.generations.1,
        }
    }
}
