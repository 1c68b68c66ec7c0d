/// Session state: level loading, the board and its hint cache, the brick
/// regeneration clock and the queries controllers run against it.

pub mod board;
pub mod cache;
pub mod event;
pub mod level;
pub mod navigation;
pub mod scheduler;
