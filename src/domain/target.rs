/// Target registry: navigation destinations.
///
/// Fixed targets sit at the ends of platforms, ropes and ladders and are
/// discovered once at load. Gift targets are appended after them and are
/// deactivated, never removed, when collected, so a `TargetId` stays valid
/// for the whole session.

use super::grid::Grid;
use super::tile::Tile;

/// Stable handle into the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    pub fn new(index: usize) -> Self {
        TargetId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TargetKind {
    Platform,
    Rope,
    Ladder,
    Gift,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Target {
    pub id: TargetId,
    pub x: usize,
    pub y: usize,
    pub kind: TargetKind,
    pub active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    /// Scan the terrain for platform/rope/ladder ends, then gifts.
    pub fn discover(grid: &Grid) -> Self {
        let mut reg = TargetRegistry::default();

        for (x, y) in grid.cells() {
            let kind = if is_platform_end(grid, x, y) {
                Some(TargetKind::Platform)
            } else if is_rope_end(grid, x, y) {
                Some(TargetKind::Rope)
            } else if is_ladder_end(grid, x, y) {
                Some(TargetKind::Ladder)
            } else {
                None
            };
            if let Some(kind) = kind {
                reg.push(x, y, kind);
            }
        }

        for (x, y) in grid.cells() {
            if grid.tile_at(x, y) == Tile::Gift {
                reg.push(x, y, TargetKind::Gift);
            }
        }

        reg
    }

    fn push(&mut self, x: usize, y: usize, kind: TargetKind) {
        let id = TargetId(self.targets.len());
        self.targets.push(Target { id, x, y, kind, active: true });
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id.0)
    }

    /// All targets in registry order, active or not.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Active targets in registry order.
    pub fn active(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.active)
    }

    /// The active gift at (x, y), if any.
    pub fn active_gift_at(&self, x: usize, y: usize) -> Option<TargetId> {
        self.targets
            .iter()
            .find(|t| t.kind == TargetKind::Gift && t.active && t.x == x && t.y == y)
            .map(|t| t.id)
    }

    pub fn active_gift_count(&self) -> usize {
        self.active().filter(|t| t.kind == TargetKind::Gift).count()
    }

    /// Mark a target inactive. Returns false if it already was.
    pub fn deactivate(&mut self, id: TargetId) -> bool {
        match self.targets.get_mut(id.0) {
            Some(t) if t.active => {
                t.active = false;
                true
            }
            _ => false,
        }
    }
}

// ── Discovery rules ──

fn is_brick(grid: &Grid, x: usize, y: usize) -> bool {
    grid.tile_at(x, y) == Tile::Brick
}

fn is_platform_end(grid: &Grid, x: usize, y: usize) -> bool {
    let here = grid.tile_at(x, y);
    if matches!(here, Tile::Brick | Tile::Ladder | Tile::Gift) {
        return false;
    }
    let edge = x == 0 || x + 1 == grid.width();

    if y + 1 == grid.height() {
        // Bottom row: the floor is the map edge; ends are walls or map sides.
        edge || is_brick(grid, x - 1, y) || is_brick(grid, x + 1, y)
    } else if is_brick(grid, x, y + 1) {
        edge || !is_brick(grid, x - 1, y + 1) || !is_brick(grid, x + 1, y + 1)
    } else {
        false
    }
}

fn is_rope_end(grid: &Grid, x: usize, y: usize) -> bool {
    if grid.tile_at(x, y) != Tile::Rope {
        return false;
    }
    x == 0
        || x + 1 == grid.width()
        || grid.tile_at(x - 1, y) != Tile::Rope
        || grid.tile_at(x + 1, y) != Tile::Rope
}

fn is_ladder_end(grid: &Grid, x: usize, y: usize) -> bool {
    if grid.tile_at(x, y) != Tile::Ladder {
        return false;
    }
    y == 0
        || y + 1 == grid.height()
        || grid.tile_at(x, y - 1) != Tile::Ladder
        || grid.tile_at(x, y + 1) != Tile::Ladder
}
