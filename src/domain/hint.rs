/// Hint cells, hint maps and hint map sets.
///
/// A hint map is a field over the whole grid telling an actor, for one
/// target, which single step to take next and how far it still has to go.
/// A hint map set holds one map per target, indexed by `TargetId`.

use super::target::TargetId;

/// Next-step direction stored in a hint cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hint {
    Left,
    Right,
    Up,
    /// Deliberate descent: climbing down a ladder or dropping from a rope.
    Down,
    /// Falling under gravity. Moves like `Down`, animates differently.
    Fall,
    /// This cell is the target.
    Target,
    /// No path known from this cell.
    Unknown,
    /// No valid target at all: stay put.
    Hold,
}

impl Hint {
    pub fn symbol(self) -> char {
        match self {
            Hint::Left => 'L',
            Hint::Right => 'R',
            Hint::Up => 'U',
            Hint::Down => 'D',
            Hint::Fall => 'F',
            Hint::Target => '@',
            Hint::Unknown => '?',
            Hint::Hold => 'X',
        }
    }

    /// Cell offset of one step, or `None` for non-moving hints.
    pub fn delta(self) -> Option<(i32, i32)> {
        match self {
            Hint::Left => Some((-1, 0)),
            Hint::Right => Some((1, 0)),
            Hint::Up => Some((0, -1)),
            Hint::Down | Hint::Fall => Some((0, 1)),
            Hint::Target | Hint::Unknown | Hint::Hold => None,
        }
    }

    /// Apply one step to a cell. `None` when the hint does not move.
    pub fn step(self, x: usize, y: usize) -> Option<(usize, usize)> {
        let (dx, dy) = self.delta()?;
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        Some((nx, ny))
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct HintCell {
    pub hint: Hint,
    /// Remaining path cost; `f32::INFINITY` when unreachable.
    pub distance: f32,
}

impl HintCell {
    pub const UNKNOWN: HintCell = HintCell { hint: Hint::Unknown, distance: f32::INFINITY };
    pub const TARGET: HintCell = HintCell { hint: Hint::Target, distance: 0.0 };

    pub fn is_resolved(&self) -> bool {
        self.hint != Hint::Unknown
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Hint field for a single target.
#[derive(Clone, PartialEq, Debug)]
pub struct HintMap {
    cells: Vec<HintCell>,
    width: usize,
    height: usize,
}

impl HintMap {
    pub fn new(width: usize, height: usize) -> Self {
        HintMap { cells: vec![HintCell::UNKNOWN; width * height], width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} hint map", self.width, self.height
        );
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> HintCell {
        self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: HintCell) {
        let i = self.index(x, y);
        self.cells[i] = cell;
    }

    pub fn hint(&self, x: usize, y: usize) -> Hint {
        self.get(x, y).hint
    }

    pub fn distance(&self, x: usize, y: usize) -> f32 {
        self.get(x, y).distance
    }

    /// Cells visited by following hints from (x, y), starting with (x, y)
    /// itself. Ends after the cell whose hint does not move.
    pub fn walk(&self, x: usize, y: usize) -> ChainWalk<'_> {
        ChainWalk { map: self, next: Some((x, y)) }
    }

    /// One text row per grid row, one hint symbol per cell.
    pub fn render_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.hint(x, y).symbol()).collect())
            .collect()
    }
}

pub struct ChainWalk<'a> {
    map: &'a HintMap,
    next: Option<(usize, usize)>,
}

impl Iterator for ChainWalk<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let (x, y) = self.next?;
        self.next = self.map
            .hint(x, y)
            .step(x, y)
            .filter(|&(nx, ny)| nx < self.map.width && ny < self.map.height);
        Some((x, y))
    }
}

/// Hint maps for every target known at compute time.
///
/// Maps are addressed by `TargetId`. Targets that were inactive when the
/// set was computed have no map.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct HintMapSet {
    maps: Vec<Option<HintMap>>,
}

impl HintMapSet {
    pub fn with_capacity(targets: usize) -> Self {
        HintMapSet { maps: vec![None; targets] }
    }

    pub fn insert(&mut self, id: TargetId, map: HintMap) {
        if id.index() >= self.maps.len() {
            self.maps.resize(id.index() + 1, None);
        }
        self.maps[id.index()] = Some(map);
    }

    pub fn get(&self, id: TargetId) -> Option<&HintMap> {
        self.maps.get(id.index()).and_then(Option::as_ref)
    }

    /// Cell lookup; `UNKNOWN` when the target has no map.
    pub fn cell(&self, id: TargetId, x: usize, y: usize) -> HintCell {
        self.get(id).map_or(HintCell::UNKNOWN, |m| m.get(x, y))
    }

    pub fn len(&self) -> usize {
        self.maps.iter().filter(|m| m.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
