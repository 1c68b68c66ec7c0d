/// Board: the complete navigation state of a running level.
///
/// ## Tile Architecture
///
/// Two tile layers:
///   - `base`: the level as loaded. **Never mutated** after load.
///   - `grid`: the effective terrain (base + broken bricks + collected gifts).
///
/// ## Brick lifecycle
///
///   Solid ──break_brick──▶ Broken ──(regen delay)──▶ Solid
///
///   - Break: tile → Empty, sprite hidden, reckless hints rebuilt,
///     regeneration scheduled. The careful set is not touched: only
///     hostiles replan around fresh holes.
///   - Regenerate: base tile restored, sprite shown, actors standing in the
///     cell pushed to the nearest open cell, reckless hints rebuilt.
///
/// Gifts go Present ──collect_gift──▶ Collected (terminal). Collection does
/// not rebuild hints; the gift target is simply no longer active.
///
/// All mutation is synchronous on the tick loop. Readers of hint sets
/// see either the old or the new set, never a partial one.

use log::{debug, info, warn};

use crate::config::NavConfig;
use crate::domain::entity::{Actor, ActorId, ActorKind, Commands, Facing, ProfileKind};
use crate::domain::grid::Grid;
use crate::domain::hint::HintMapSet;
use crate::domain::target::TargetRegistry;
use crate::domain::tile::Tile;

use super::cache::HintCache;
use super::event::GameEvent;
use super::level::{LevelDef, LevelError};
use super::scheduler::Scheduler;

pub struct Board {
    name: String,
    // ── Tile layers ──
    base: Grid,
    grid: Grid,

    // ── Navigation ──
    targets: TargetRegistry,
    cache: HintCache,

    // ── Regeneration ──
    /// Pending regenerations; the action is the tile to restore.
    regen: Scheduler<Tile>,
    regen_ticks: u64,

    // ── Entities ──
    actors: Vec<Actor>,
    gifts_total: usize,

    events: Vec<GameEvent>,
}

// ── Construction ──

impl Board {
    pub fn new(level: &LevelDef, config: &NavConfig) -> Result<Self, LevelError> {
        Self::from_rows(&level.name, &level.rows, config)
    }

    /// Build the board, discover targets and compute both hint sets.
    pub fn from_rows<S: AsRef<str>>(name: &str, rows: &[S], config: &NavConfig) -> Result<Self, LevelError> {
        let grid = Grid::from_rows(rows);
        if grid.width() == 0 || grid.height() == 0 {
            return Err(LevelError::Empty);
        }

        let targets = TargetRegistry::discover(&grid);
        if targets.is_empty() {
            return Err(LevelError::NoTargets);
        }

        let mut actors = Vec::new();
        for (x, y) in grid.cells() {
            let kind = match grid.tile_at(x, y) {
                Tile::PlayerSpawn => ActorKind::Player,
                Tile::HostileSpawn => ActorKind::Hostile,
                _ => continue,
            };
            actors.push(Actor::new(ActorId(actors.len()), kind, x, y));
        }

        let mut cache = HintCache::new(config.costs.clone());
        cache.recompute_all(&grid, &targets);

        let gifts_total = targets.active_gift_count();
        info!(
            "level {:?}: {}x{}, {} targets ({} gifts), {} actors",
            name, grid.width(), grid.height(), targets.len(), gifts_total, actors.len(),
        );

        Ok(Board {
            name: name.to_string(),
            base: grid.clone(),
            grid,
            targets,
            cache,
            regen: Scheduler::new(),
            regen_ticks: config.timing.regen_ticks(),
            actors,
            gifts_total,
            events: Vec::new(),
        })
    }
}

// ── Read access ──

impl Board {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Effective terrain; all movement predicates live here.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tile_type(&self, x: usize, y: usize) -> Tile {
        self.grid.tile_at(x, y)
    }

    /// Is the cell's sprite shown? False only while a brick is broken.
    pub fn is_tile_visible(&self, x: usize, y: usize) -> bool {
        !self.is_broken(x, y)
    }

    pub fn is_broken(&self, x: usize, y: usize) -> bool {
        self.regen.is_pending((x, y))
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn hints(&self, kind: ProfileKind) -> &HintMapSet {
        self.cache.set(kind)
    }

    pub fn cache(&self) -> &HintCache {
        &self.cache
    }

    pub fn remaining_gifts(&self) -> usize {
        self.targets.active_gift_count()
    }

    pub fn total_gifts(&self) -> usize {
        self.gifts_total
    }

    /// Current tick of the regeneration clock.
    pub fn now(&self) -> u64 {
        self.regen.now()
    }

    pub fn regen_ticks(&self) -> u64 {
        self.regen_ticks
    }

    /// Tick at which a broken brick at (x, y) comes back, if it is broken.
    pub fn regenerates_at(&self, x: usize, y: usize) -> Option<u64> {
        self.regen.fires_at((x, y))
    }

    /// Broken bricks in grid order.
    pub fn broken_bricks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.grid.cells().filter(|&(x, y)| self.is_broken(x, y))
    }
}

// ── Actors ──

impl Board {
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0)
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.iter().find(|a| a.kind == ActorKind::Player)
    }

    pub fn hostiles(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| a.kind == ActorKind::Hostile)
    }

    /// Controllers report where their actor is after each move.
    pub fn set_actor_position(&mut self, id: ActorId, x: usize, y: usize) {
        assert!(self.grid.contains(x, y), "actor moved outside the grid to ({x}, {y})");
        if let Some(actor) = self.actors.get_mut(id.0) {
            actor.x = x;
            actor.y = y;
        }
    }
}

// ── Terrain mutation ──

impl Board {
    /// Break the brick at (x, y). No-op (returns false) unless the cell
    /// currently holds a brick.
    pub fn break_brick(&mut self, x: usize, y: usize) -> bool {
        if self.grid.tile_at(x, y) != Tile::Brick || self.regen.is_pending((x, y)) {
            return false;
        }

        self.grid.set_tile(x, y, Tile::Empty);
        self.events.push(GameEvent::BrickBroken { x, y });
        self.cache.recompute_reckless(&self.grid, &self.targets);
        self.regen.schedule((x, y), self.regen_ticks, self.base.tile_at(x, y));
        debug!("brick ({x}, {y}) broken, regenerates at tick {}", self.regen.now() + self.regen_ticks);
        true
    }

    /// Break the brick below-left / below-right of an actor per its intents.
    pub fn apply_break_commands(&mut self, id: ActorId, commands: &Commands) -> bool {
        let Some(actor) = self.actor(id) else { return false };
        let (x, y) = (actor.x, actor.y);
        match commands.break_dir() {
            Some(Facing::Left) if self.grid.can_break_left(x, y) => self.break_brick(x - 1, y + 1),
            Some(Facing::Right) if self.grid.can_break_right(x, y) => self.break_brick(x + 1, y + 1),
            _ => false,
        }
    }

    /// Collect the active gift at (x, y). No-op (returns false) otherwise.
    pub fn collect_gift(&mut self, x: usize, y: usize) -> bool {
        let Some(id) = self.targets.active_gift_at(x, y) else { return false };
        self.targets.deactivate(id);
        self.grid.set_tile(x, y, Tile::Empty);

        let tray_slot = self.targets.active_gift_count();
        self.events.push(GameEvent::GiftCollected { x, y, tray_slot });
        debug!("gift ({x}, {y}) collected, {tray_slot} left");
        true
    }

    /// Advance one tick: fire due regenerations, then hand over every
    /// event raised since the previous tick.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        for due in self.regen.advance() {
            let (x, y) = due.cell;
            self.regenerate(x, y, due.action);
        }
        self.take_events()
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn regenerate(&mut self, x: usize, y: usize, tile: Tile) {
        self.grid.set_tile(x, y, tile);
        self.events.push(GameEvent::BrickRestored { x, y });

        for i in 0..self.actors.len() {
            if !self.actors[i].at(x, y) {
                continue;
            }
            match self.nearest_open_cell(x, y) {
                Some((nx, ny)) => {
                    let actor = &mut self.actors[i];
                    actor.x = nx;
                    actor.y = ny;
                    self.events.push(GameEvent::ActorRelocated {
                        id: actor.id,
                        from: (x, y),
                        to: (nx, ny),
                    });
                    debug!("actor {:?} pushed out of ({x}, {y}) to ({nx}, {ny})", actor.id);
                }
                None => warn!("no open cell to relocate actor {:?} from ({x}, {y})", self.actors[i].id),
            }
        }

        self.cache.recompute_reckless(&self.grid, &self.targets);
        debug!("brick ({x}, {y}) regenerated");
    }

    /// Nearest open cell by Manhattan distance; ties by smaller y, then x.
    fn nearest_open_cell(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let (x, y) = (x as i64, y as i64);
        for d in 1..=(w + h) {
            for dy in -d..=d {
                let dx = d - dy.abs();
                let xs = if dx == 0 { [x, x] } else { [x - dx, x + dx] };
                for cx in xs {
                    let cy = y + dy;
                    if cx < 0 || cy < 0 || cx >= w || cy >= h {
                        continue;
                    }
                    let (cx, cy) = (cx as usize, cy as usize);
                    if self.grid.tile_at(cx, cy).is_open() {
                        return Some((cx, cy));
                    }
                }
            }
        }
        None
    }

    /// Rebuild both hint sets from current terrain (load-time sequence).
    pub fn recompute_all(&mut self) {
        self.cache.recompute_all(&self.grid, &self.targets);
    }
}
