/// Batch pathfinder: one hint map per target via repeated A*.
///
/// For a target `g`, every cell of the grid (row-major) starts its own A*
/// search toward `g`. All runs for the same target share one hint map:
/// a run stops the moment it pops a cell that an earlier run already
/// resolved, then backfills its parent chain. In practice each cell is
/// expanded about once per target.
///
/// ## Edges (from an expanded cell)
///
/// ┌──────────────────────────────────────────┬──────────────┐
/// │ Condition                                │ Edge (cost)  │
/// ├──────────────────────────────────────────┼──────────────┤
/// │ (stand or hang) and can_move_right       │ x+1   (1)    │
/// │ (stand or hang) and can_move_left        │ x-1   (1)    │
/// │ can_climb_down                           │ y+1   (1)    │
/// │ else stand and a row below               │ y+1   (brick)│
/// │ else not standing                        │ y+1   (fall) │
/// │ can_climb_up and y > 0                   │ y-1   (1)    │
/// └──────────────────────────────────────────┴──────────────┘
///
/// Falling is cheap so gravity wins over any sideways detour mid-air.
/// Falling *through* a brick is expensive so ladders win when they exist.
///
/// ## Open list
///
/// Key = cost-so-far + Manhattan distance to `g`; ties resolve by first
/// insertion order. A relaxed node keeps its insertion order.
///
/// ## Dead ends
///
/// A run that empties its open list proved that nothing it closed can
/// reach `g` or any resolved cell. Those cells stay `Unknown` and later
/// runs treat them as closed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use log::debug;
use ordered_float::OrderedFloat;

use super::grid::Grid;
use super::hint::{Hint, HintCell, HintMap, HintMapSet};
use super::target::{Target, TargetRegistry};

/// Named movement-cost pair. Horizontal, climbing and ladder descent
/// always cost 1.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CostProfile {
    pub fall_cost: f32,
    pub brick_cost: f32,
}

impl CostProfile {
    pub const fn new(fall_cost: f32, brick_cost: f32) -> Self {
        CostProfile { fall_cost, brick_cost }
    }
}

/// Compute hint maps for every active target.
pub fn compute_hint_maps(grid: &Grid, targets: &TargetRegistry, profile: CostProfile) -> HintMapSet {
    let started = Instant::now();
    let mut set = HintMapSet::with_capacity(targets.len());
    let mut search = BatchSearch::new(grid, profile);
    let mut computed = 0usize;

    for target in targets.active() {
        set.insert(target.id, search.run(target));
        computed += 1;
    }

    debug!(
        "hint maps: {} targets, {}x{} grid, fall={} brick={} in {:?}",
        computed, grid.width(), grid.height(),
        profile.fall_cost, profile.brick_cost, started.elapsed(),
    );
    set
}

/// Compute the hint map for a single target.
pub fn compute_hint_map(grid: &Grid, target: &Target, profile: CostProfile) -> HintMap {
    BatchSearch::new(grid, profile).run(target)
}

// ══════════════════════════════════════════════════════════════
// Search state
// ══════════════════════════════════════════════════════════════

const NO_NODE: usize = usize::MAX;

#[derive(Clone, Copy, Debug)]
struct Node {
    x: usize,
    y: usize,
    cost: f32,
    heuristic: f32,
    prev: usize,
    seq: u64,
    closed: bool,
}

impl Node {
    fn key(&self) -> OrderedFloat<f32> {
        OrderedFloat(self.cost + self.heuristic)
    }
}

/// Scratch buffers reused across runs and targets.
struct BatchSearch<'a> {
    grid: &'a Grid,
    profile: CostProfile,
    /// Cell index → node index for the current run.
    node_of: Vec<usize>,
    nodes: Vec<Node>,
    open: BinaryHeap<Reverse<(OrderedFloat<f32>, u64, usize)>>,
    /// Per-target: cells proven unable to reach the target.
    dead: Vec<bool>,
    next_seq: u64,
}

impl<'a> BatchSearch<'a> {
    fn new(grid: &'a Grid, profile: CostProfile) -> Self {
        let cells = grid.width() * grid.height();
        BatchSearch {
            grid,
            profile,
            node_of: vec![NO_NODE; cells],
            nodes: Vec::with_capacity(cells),
            open: BinaryHeap::with_capacity(cells),
            dead: vec![false; cells],
            next_seq: 0,
        }
    }

    #[inline]
    fn cell(&self, x: usize, y: usize) -> usize {
        y * self.grid.width() + x
    }

    fn run(&mut self, target: &Target) -> HintMap {
        let mut map = HintMap::new(self.grid.width(), self.grid.height());
        map.set(target.x, target.y, HintCell::TARGET);
        self.dead.iter_mut().for_each(|d| *d = false);

        let grid = self.grid;
        for (x, y) in grid.cells() {
            self.search_from(&mut map, target, x, y);
        }
        map
    }

    fn reset_run(&mut self) {
        for node in &self.nodes {
            let i = node.y * self.grid.width() + node.x;
            self.node_of[i] = NO_NODE;
        }
        self.nodes.clear();
        self.open.clear();
        self.next_seq = 0;
    }

    /// One A* run from (sx, sy) toward the target, sharing `map`.
    fn search_from(&mut self, map: &mut HintMap, target: &Target, sx: usize, sy: usize) {
        if map.get(sx, sy).is_resolved() || self.dead[self.cell(sx, sy)] {
            return;
        }
        self.reset_run();
        self.push_new(sx, sy, 0.0, 0.0, NO_NODE);

        let mut terminal = None;
        while let Some(Reverse((key, _, idx))) = self.open.pop() {
            let node = self.nodes[idx];
            if node.closed || key != node.key() {
                continue; // stale entry left behind by a relaxation
            }
            if map.get(node.x, node.y).is_resolved() || (node.x == target.x && node.y == target.y) {
                terminal = Some(idx);
                break;
            }
            self.nodes[idx].closed = true;
            self.expand(idx, target);
        }

        match terminal {
            Some(idx) => self.backfill(map, idx),
            None => {
                for node in &self.nodes {
                    if node.closed {
                        let i = node.y * self.grid.width() + node.x;
                        self.dead[i] = true;
                    }
                }
            }
        }
    }

    fn expand(&mut self, idx: usize, target: &Target) {
        let Node { x, y, cost, .. } = self.nodes[idx];
        let mut edges: [(usize, usize, f32); 4] = [(0, 0, 0.0); 4];
        let count = successors(self.grid, x, y, self.profile, &mut edges);

        for &(nx, ny, step) in &edges[..count] {
            let cell = self.cell(nx, ny);
            if self.dead[cell] {
                continue;
            }
            let new_cost = cost + step;
            match self.node_of[cell] {
                NO_NODE => {
                    let h = manhattan(nx, ny, target.x, target.y);
                    self.push_new(nx, ny, new_cost, h, idx);
                }
                other => {
                    let n = &mut self.nodes[other];
                    if n.closed || n.cost <= new_cost {
                        continue;
                    }
                    n.cost = new_cost;
                    n.prev = idx;
                    let entry = (n.key(), n.seq, other);
                    self.open.push(Reverse(entry));
                }
            }
        }
    }

    fn push_new(&mut self, x: usize, y: usize, cost: f32, heuristic: f32, prev: usize) {
        let idx = self.nodes.len();
        let seq = self.next_seq;
        self.next_seq += 1;
        let node = Node { x, y, cost, heuristic, prev, seq, closed: false };
        self.open.push(Reverse((node.key(), seq, idx)));
        let cell = self.cell(x, y);
        self.node_of[cell] = idx;
        self.nodes.push(node);
    }

    /// Walk from the terminal node back to the start, writing hints.
    fn backfill(&self, map: &mut HintMap, terminal: usize) {
        let mut idx = terminal;
        loop {
            let node = self.nodes[idx];
            if node.prev == NO_NODE {
                break;
            }
            let prev = self.nodes[node.prev];
            let hint = step_hint(self.grid, &prev, &node);
            let distance = map.distance(node.x, node.y) + (node.cost - prev.cost);
            map.set(prev.x, prev.y, HintCell { hint, distance });
            idx = node.prev;
        }
    }
}

/// Direction of the step prev → next.
fn step_hint(grid: &Grid, prev: &Node, next: &Node) -> Hint {
    if next.x < prev.x {
        Hint::Left
    } else if next.x > prev.x {
        Hint::Right
    } else if next.y < prev.y {
        Hint::Up
    } else if grid.can_descend(prev.x, prev.y) {
        Hint::Down
    } else {
        Hint::Fall
    }
}

/// Fill `out` with the edges leaving (x, y); returns how many.
/// Order matters for tie-breaks: right, left, down, up.
fn successors(
    grid: &Grid,
    x: usize,
    y: usize,
    profile: CostProfile,
    out: &mut [(usize, usize, f32); 4],
) -> usize {
    let mut n = 0;
    let mut add = |nx: usize, ny: usize, cost: f32| {
        out[n] = (nx, ny, cost);
        n += 1;
    };

    let stand = grid.can_stand(x, y);
    if stand || grid.can_hang(x, y) {
        if grid.can_move_right(x, y) { add(x + 1, y, 1.0); }
        if grid.can_move_left(x, y) { add(x - 1, y, 1.0); }
    }

    if grid.can_climb_down(x, y) {
        add(x, y + 1, 1.0);
    } else if stand && y + 1 < grid.height() {
        add(x, y + 1, profile.brick_cost);
    } else if !stand {
        add(x, y + 1, profile.fall_cost);
    }

    if grid.can_climb_up(x, y) && y > 0 {
        add(x, y - 1, 1.0);
    }

    n
}

fn manhattan(x1: usize, y1: usize, x2: usize, y2: usize) -> f32 {
    (x1.abs_diff(x2) + y1.abs_diff(y2)) as f32
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::domain::target::{TargetId, TargetKind};

    const CAREFUL: CostProfile = CostProfile::new(0.9, 3.0);
    const RECKLESS: CostProfile = CostProfile::new(0.9, 48.0);

    fn target_at(x: usize, y: usize) -> Target {
        Target { id: TargetId::new(0), x, y, kind: TargetKind::Platform, active: true }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// Independent oracle: can (x, y) reach the target at all?
    fn reachable_by_bfs(grid: &Grid, target: &Target, profile: CostProfile) -> Vec<bool> {
        let w = grid.width();
        let h = grid.height();
        // Reverse edges: collect predecessors of every cell.
        let mut preds: Vec<Vec<usize>> = vec![vec![]; w * h];
        for (x, y) in grid.cells() {
            let mut edges = [(0, 0, 0.0); 4];
            let n = successors(grid, x, y, profile, &mut edges);
            for &(nx, ny, _) in &edges[..n] {
                preds[ny * w + nx].push(y * w + x);
            }
        }
        let mut seen = vec![false; w * h];
        let mut queue = VecDeque::new();
        let start = target.y * w + target.x;
        seen[start] = true;
        queue.push_back(start);
        while let Some(c) = queue.pop_front() {
            for &p in &preds[c] {
                if !seen[p] {
                    seen[p] = true;
                    queue.push_back(p);
                }
            }
        }
        seen
    }

    /// Follow hints from every cell and check the chain invariants.
    /// Every reachable chain strictly descends to the target, in at most
    /// `width + height * r` steps where `r` is the largest cost ratio.
    fn assert_chains_descend(grid: &Grid, map: &HintMap, target: &Target, profile: CostProfile) {
        let ratio = profile.brick_cost.max(1.0) / profile.fall_cost.min(1.0);
        let limit = grid.width() as f32 + grid.height() as f32 * ratio;
        for (x, y) in grid.cells() {
            let start = map.get(x, y);
            if !start.is_reachable() {
                assert_eq!(start.hint, Hint::Unknown, "unreachable cell ({x},{y}) has a hint");
                continue;
            }
            let (mut cx, mut cy) = (x, y);
            let mut steps = 0usize;
            while map.hint(cx, cy) != Hint::Target {
                let here = map.distance(cx, cy);
                let (nx, ny) = map.hint(cx, cy).step(cx, cy).expect("moving hint");
                let there = map.distance(nx, ny);
                assert!(there < here, "distance not decreasing at ({cx},{cy})");
                cx = nx;
                cy = ny;
                steps += 1;
                assert!(steps as f32 <= limit, "chain from ({x},{y}) longer than {limit}");
            }
            assert_eq!((cx, cy), (target.x, target.y));
            assert_eq!(map.distance(cx, cy), 0.0);
        }
    }

    #[test]
    fn flat_platform_points_left() {
        let g = Grid::from_rows(&["%%%", "   "]);
        let t = target_at(0, 1);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.get(0, 1), HintCell::TARGET);
        assert_eq!(m.hint(2, 1), Hint::Left);
        assert!(close(m.distance(2, 1), 2.0));
        assert_eq!(m.hint(1, 1), Hint::Left);
        assert!(close(m.distance(1, 1), 1.0));
    }

    #[test]
    fn single_row_exit() {
        let g = Grid::from_rows(&["   "]);
        let t = target_at(0, 0);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.hint(2, 0), Hint::Left);
        assert!(close(m.distance(2, 0), 2.0));
    }

    #[test]
    fn falls_are_marked_fall() {
        let g = Grid::from_rows(&[
            "   ",
            "%  ",
            "   ",
        ]);
        // From (0,0) on the brick: walk right, then fall twice.
        let t = target_at(1, 2);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.hint(1, 1), Hint::Fall);
        assert!(close(m.distance(1, 1), 0.9));
        assert_eq!(m.hint(1, 0), Hint::Fall);
        assert!(close(m.distance(1, 0), 1.8));
    }

    #[test]
    fn ladder_descent_is_down() {
        let g = Grid::from_rows(&[
            " ",
            "H",
            "H",
            " ",
        ]);
        let t = target_at(0, 3);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.hint(0, 0), Hint::Down);
        assert_eq!(m.hint(0, 1), Hint::Down);
        // Bottom ladder rung has no ladder below: leaving it is a fall.
        assert_eq!(m.hint(0, 2), Hint::Fall);
    }

    #[test]
    fn climb_up_ladder() {
        let g = Grid::from_rows(&[
            "  ",
            "H%",
            "H ",
        ]);
        let t = target_at(0, 0);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.hint(0, 2), Hint::Up);
        assert_eq!(m.hint(0, 1), Hint::Up);
        assert_eq!(m.hint(1, 2), Hint::Left);
        assert!(close(m.distance(1, 2), 3.0));
    }

    #[test]
    fn rope_drop_is_down() {
        let g = Grid::from_rows(&[
            "--",
            "  ",
        ]);
        let t = target_at(1, 1);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.hint(1, 0), Hint::Down);
        assert!(close(m.distance(1, 0), 0.9));
    }

    #[test]
    fn brick_fall_through_uses_profile_cost() {
        // Only way down is through the brick.
        let g = Grid::from_rows(&[" ", "%", " "]);
        let t = target_at(0, 2);

        let careful = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(careful.hint(0, 0), Hint::Fall);
        // brick (3) then fall out of the brick cell (0.9)
        assert!(close(careful.distance(0, 0), 3.9));
        assert!(close(careful.distance(0, 1), 0.9));

        let reckless = compute_hint_map(&g, &t, RECKLESS);
        assert!(close(reckless.distance(0, 0), 48.9));
    }

    #[test]
    fn prefers_ladder_over_brick() {
        let g = Grid::from_rows(&[
            "     ",
            "%%%%H",
            "    H",
        ]);
        let t = target_at(4, 2);
        let m = compute_hint_map(&g, &t, RECKLESS);
        assert_eq!(m.hint(0, 0), Hint::Right);
        assert!(close(m.distance(0, 0), 6.0));
        assert_eq!(m.hint(4, 0), Hint::Down);
    }

    #[test]
    fn unreachable_stays_unknown() {
        // The rope cell can't be re-entered from the bottom row.
        let g = Grid::from_rows(&[
            "-",
            " ",
        ]);
        let t = target_at(0, 0);
        let m = compute_hint_map(&g, &t, CAREFUL);
        assert_eq!(m.get(0, 1), HintCell::UNKNOWN);
        assert_eq!(m.get(0, 0), HintCell::TARGET);
    }

    #[test]
    fn unknown_matches_bfs_oracle() {
        let g = Grid::from_rows(&[
            "  -----   H  ",
            "%%%  %%%%%H%%",
            "  H    @  H  ",
            "%%H%%%%%%%%  ",
            "  H   ---    ",
            "  H        %%",
            "%%%%%  %%%%%%",
        ]);
        let targets = TargetRegistry::discover(&g);
        for profile in [CAREFUL, RECKLESS] {
            for t in targets.iter() {
                let m = compute_hint_map(&g, t, profile);
                let oracle = reachable_by_bfs(&g, t, profile);
                for (x, y) in g.cells() {
                    let reachable = m.get(x, y).is_reachable();
                    assert_eq!(
                        reachable, oracle[y * g.width() + x],
                        "cell ({x},{y}) target ({},{})", t.x, t.y
                    );
                }
                assert_chains_descend(&g, &m, t, profile);
            }
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let g = Grid::from_rows(&[
            "   @   ",
            "%%H%%%-",
            "  H    ",
            "%%%%%%%",
        ]);
        let targets = TargetRegistry::discover(&g);
        let a = compute_hint_maps(&g, &targets, RECKLESS);
        let b = compute_hint_maps(&g, &targets, RECKLESS);
        assert_eq!(a, b);
        assert_eq!(a.len(), targets.len());
    }

    #[test]
    fn inactive_targets_get_no_map() {
        let g = Grid::from_rows(&[" @ "]);
        let mut targets = TargetRegistry::discover(&g);
        let gift = targets.active_gift_at(1, 0).expect("gift");
        targets.deactivate(gift);
        let set = compute_hint_maps(&g, &targets, CAREFUL);
        assert!(set.get(gift).is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn successor_order() {
        let g = Grid::from_rows(&["   ", "%H%"]);
        let mut edges = [(0, 0, 0.0); 4];
        let n = successors(&g, 1, 0, CAREFUL, &mut edges);
        assert_eq!(n, 3);
        assert_eq!(edges[0], (2, 0, 1.0));
        assert_eq!(edges[1], (0, 0, 1.0));
        assert_eq!(edges[2], (1, 1, 1.0));
    }
}
