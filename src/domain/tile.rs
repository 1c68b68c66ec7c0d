/// Tile kinds and the map symbol table.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// ## Symbol legend:
///   '%' = Brick (breakable, regenerates)   'H' = Ladder
///   '-' = Rope                             '@' = Gift
///   'X' = Player start                     '#' = Hostile start
///   anything else = Empty

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Brick,        // Solid + breakable
    Ladder,       // Climbable
    Rope,         // Hangable (horizontal bar)
    Gift,         // Pickup target
    PlayerSpawn,  // Actor marker, behaves as Empty
    HostileSpawn, // Actor marker, behaves as Empty
}

impl Tile {
    pub fn from_symbol(ch: char) -> Tile {
        match ch {
            '%' => Tile::Brick,
            'H' => Tile::Ladder,
            '-' => Tile::Rope,
            '@' => Tile::Gift,
            'X' => Tile::PlayerSpawn,
            '#' => Tile::HostileSpawn,
            _ => Tile::Empty,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Brick => '%',
            Tile::Ladder => 'H',
            Tile::Rope => '-',
            Tile::Gift => '@',
            Tile::PlayerSpawn => 'X',
            Tile::HostileSpawn => '#',
        }
    }

    /// Can an entity stand on top of this tile?
    /// Bricks and ladder tops both carry weight.
    pub fn is_floor(self) -> bool {
        matches!(self, Tile::Brick | Tile::Ladder)
    }

    /// Blocks horizontal entry.
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Brick)
    }

    pub fn is_climbable(self) -> bool {
        matches!(self, Tile::Ladder)
    }

    pub fn is_hangable(self) -> bool {
        matches!(self, Tile::Rope)
    }

    /// Empty space an actor can be dropped into when relocated.
    pub fn is_open(self) -> bool {
        matches!(self, Tile::Empty | Tile::PlayerSpawn | Tile::HostileSpawn)
    }
}
