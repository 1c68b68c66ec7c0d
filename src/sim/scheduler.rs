/// Deferred actions keyed by cell, drained once per tick.
///
/// At most one action is pending per cell: scheduling a cell that
/// already has one is refused. Entries fire in (fire tick, scheduling
/// order) order on the tick loop, never on another thread.

use std::collections::{BTreeMap, HashMap};

pub type Cell = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Due<A> {
    pub cell: Cell,
    pub action: A,
}

#[derive(Clone, Debug)]
pub struct Scheduler<A> {
    now: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Due<A>>,
    by_cell: HashMap<Cell, (u64, u64)>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Scheduler {
            now: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            by_cell: HashMap::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_pending(&self, cell: Cell) -> bool {
        self.by_cell.contains_key(&cell)
    }

    /// Tick at which the cell's action fires, if one is pending.
    pub fn fires_at(&self, cell: Cell) -> Option<u64> {
        self.by_cell.get(&cell).map(|&(at, _)| at)
    }

    /// Schedule `action` for `cell` after `delay` ticks (minimum 1).
    /// Returns false, leaving the existing entry alone, if the cell
    /// already has a pending action.
    pub fn schedule(&mut self, cell: Cell, delay: u64, action: A) -> bool {
        if self.is_pending(cell) {
            return false;
        }
        let key = (self.now + delay.max(1), self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, Due { cell, action });
        self.by_cell.insert(cell, key);
        true
    }

    pub fn cancel(&mut self, cell: Cell) -> Option<A> {
        let key = self.by_cell.remove(&cell)?;
        self.queue.remove(&key).map(|due| due.action)
    }

    /// Advance one tick and return everything that is now due.
    pub fn advance(&mut self) -> Vec<Due<A>> {
        self.now += 1;
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            let item = entry.remove();
            self.by_cell.remove(&item.cell);
            due.push(item);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut s = Scheduler::new();
        assert!(s.schedule((1, 2), 3, 'a'));
        assert_eq!(s.fires_at((1, 2)), Some(3));
        assert!(s.advance().is_empty());
        assert!(s.advance().is_empty());
        let due = s.advance();
        assert_eq!(due, vec![Due { cell: (1, 2), action: 'a' }]);
        assert!(!s.is_pending((1, 2)));
        assert!(s.is_empty());
    }

    #[test]
    fn refuses_double_schedule() {
        let mut s = Scheduler::new();
        assert!(s.schedule((0, 0), 5, 1));
        assert!(!s.schedule((0, 0), 1, 2));
        assert_eq!(s.len(), 1);
        assert_eq!(s.fires_at((0, 0)), Some(5));
    }

    #[test]
    fn cancel_removes_entry() {
        let mut s = Scheduler::new();
        s.schedule((0, 0), 1, "x");
        assert_eq!(s.cancel((0, 0)), Some("x"));
        assert_eq!(s.cancel((0, 0)), None);
        assert!(s.advance().is_empty());
        assert!(s.schedule((0, 0), 1, "y"));
    }

    #[test]
    fn same_tick_in_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule((5, 5), 2, 'b');
        s.advance();
        s.schedule((1, 1), 1, 'c');
        s.schedule((0, 0), 1, 'd');
        let cells: Vec<Cell> = s.advance().into_iter().map(|d| d.cell).collect();
        assert_eq!(cells, vec![(5, 5), (1, 1), (0, 0)]);
    }

    #[test]
    fn zero_delay_waits_one_tick() {
        let mut s = Scheduler::new();
        s.schedule((0, 0), 0, ());
        assert_eq!(s.advance().len(), 1);
    }
}
