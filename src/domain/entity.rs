/// Entities: the player and hostile units as the navigation core sees them.
///
/// Actor movement itself lives in external controllers. The board only
/// tracks where actors are, so it can relocate them when a brick
/// regenerates on top of them, and which cost profile each kind plans with.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Which hint map set an actor reads.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProfileKind {
    /// Player: brick fall-through is a mild penalty.
    Careful,
    /// Hostile: brick fall-through is nearly forbidden, replans on every hole.
    Reckless,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActorKind {
    Player,
    Hostile,
}

impl ActorKind {
    pub fn profile(self) -> ProfileKind {
        match self {
            ActorKind::Player => ProfileKind::Careful,
            ActorKind::Hostile => ProfileKind::Reckless,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ActorId(pub usize);

#[derive(Clone, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub x: usize,
    pub y: usize,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, x: usize, y: usize) -> Self {
        Actor { id, kind, x, y }
    }

    pub fn at(&self, x: usize, y: usize) -> bool {
        self.x == x && self.y == y
    }
}

/// Pre-validated intents attached to the player once per input change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Commands {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub break_left: bool,
    pub break_right: bool,
}

impl Commands {
    /// Break intent, left winning when both are held.
    pub fn break_dir(&self) -> Option<Facing> {
        if self.break_left {
            Some(Facing::Left)
        } else if self.break_right {
            Some(Facing::Right)
        } else {
            None
        }
    }
}
