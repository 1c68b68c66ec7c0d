/// Pure rules: terrain, targets, hint fields and the batch pathfinder.
/// Nothing here owns session state or time.

pub mod entity;
pub mod grid;
pub mod hint;
pub mod pathfinder;
pub mod target;
pub mod tile;
