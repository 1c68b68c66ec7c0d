/// Grid model: the mutable terrain and its movement predicates.
///
/// Pure functions of current terrain with no side effects, O(1) each.
/// The pathfinder calls these for every expanded node, so they never
/// allocate and never scan.
///
/// ## Movement Truth Table
///
/// ┌────────────────────┬──────────────────────────────────────────┐
/// │ Predicate          │ True iff                                 │
/// ├────────────────────┼──────────────────────────────────────────┤
/// │ can_stand          │ bottom row, or below is brick / ladder   │
/// │ can_hang           │ here is rope                             │
/// │ can_climb_up       │ here is ladder                           │
/// │ can_climb_down     │ below exists and is ladder               │
/// │ can_move_left      │ x > 0 and left is not brick              │
/// │ can_move_right     │ x+1 < width and right is not brick       │
/// │ can_break_left     │ below-left exists and is brick           │
/// │ can_break_right    │ below-right exists and is brick          │
/// └────────────────────┴──────────────────────────────────────────┘
///
/// Coordinates must be inside the grid. Passing an out-of-bounds cell
/// is a caller bug and panics.

use super::tile::Tile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build from rows of tiles. Shorter rows are padded with `Empty`.
    pub fn new(mut tiles: Vec<Vec<Tile>>) -> Self {
        let width = tiles.iter().map(|r| r.len()).max().unwrap_or(0);
        for row in &mut tiles {
            row.resize(width, Tile::Empty);
        }
        let height = tiles.len();
        Grid { tiles, width, height }
    }

    /// Parse map rows using the symbol table in `tile.rs`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Grid::new(
            rows.iter()
                .map(|r| r.as_ref().chars().map(Tile::from_symbol).collect())
                .collect(),
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn check(&self, x: usize, y: usize) {
        assert!(
            self.contains(x, y),
            "cell ({x}, {y}) outside {}x{} grid", self.width, self.height
        );
    }

    #[inline]
    pub fn tile_at(&self, x: usize, y: usize) -> Tile {
        self.check(x, y);
        self.tiles[y][x]
    }

    #[inline]
    pub fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        self.check(x, y);
        self.tiles[y][x] = tile;
    }

    /// Iterate all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    // ── Movement predicates ──

    pub fn can_stand(&self, x: usize, y: usize) -> bool {
        self.check(x, y);
        y + 1 == self.height || self.tiles[y + 1][x].is_floor()
    }

    pub fn can_hang(&self, x: usize, y: usize) -> bool {
        self.tile_at(x, y).is_hangable()
    }

    pub fn can_climb_up(&self, x: usize, y: usize) -> bool {
        self.tile_at(x, y).is_climbable()
    }

    pub fn can_climb_down(&self, x: usize, y: usize) -> bool {
        self.check(x, y);
        y + 1 < self.height && self.tiles[y + 1][x].is_climbable()
    }

    pub fn can_move_left(&self, x: usize, y: usize) -> bool {
        self.check(x, y);
        x > 0 && !self.tiles[y][x - 1].is_solid()
    }

    pub fn can_move_right(&self, x: usize, y: usize) -> bool {
        self.check(x, y);
        x + 1 < self.width && !self.tiles[y][x + 1].is_solid()
    }

    pub fn can_break_left(&self, x: usize, y: usize) -> bool {
        self.check(x, y);
        y + 1 < self.height && x > 0 && self.tiles[y + 1][x - 1] == Tile::Brick
    }

    pub fn can_break_right(&self, x: usize, y: usize) -> bool {
        self.check(x, y);
        y + 1 < self.height && x + 1 < self.width && self.tiles[y + 1][x + 1] == Tile::Brick
    }

    /// Can the mover continue downward on purpose (not by falling)?
    /// Used to tell a climb/drop `Down` hint from a `Fall` hint.
    pub fn can_descend(&self, x: usize, y: usize) -> bool {
        self.can_hang(x, y) || self.can_climb_down(x, y)
    }
}
