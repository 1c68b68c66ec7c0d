/// Events emitted by terrain mutations.
/// The presentation layer consumes these for sprite visibility and placement.

use crate::domain::entity::ActorId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Brick removed: hide its sprite.
    BrickBroken { x: usize, y: usize },
    /// Brick regenerated: show its sprite again.
    BrickRestored { x: usize, y: usize },
    /// Actor pushed out of a regenerating brick.
    ActorRelocated { id: ActorId, from: (usize, usize), to: (usize, usize) },
    /// Gift picked up: move its sprite into the collected tray.
    GiftCollected { x: usize, y: usize, tray_slot: usize },
}
