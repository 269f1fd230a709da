//! Fixed-capacity entity arena
//!
//! Slots are allocated by first-free linear scan so iteration order (and
//! therefore the simulation) is stable. A full pool refuses new entities.

use serde::{Deserialize, Serialize};

/// One arena slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot<T> {
    Free,
    Live(T),
}

impl<T> Slot<T> {
    pub fn is_live(&self) -> bool {
        matches!(self, Slot::Live(_))
    }
}

/// Fixed-capacity pool of entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| Slot::Free).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Place `value` in the first free slot. Returns None when full.
    pub fn spawn(&mut self, value: T) -> Option<usize> {
        let index = self.slots.iter().position(|s| !s.is_live())?;
        self.slots[index] = Slot::Live(value);
        Some(index)
    }

    /// Free a slot, returning what was in it
    pub fn kill(&mut self, index: usize) -> Option<T> {
        match std::mem::replace(self.slots.get_mut(index)?, Slot::Free) {
            Slot::Live(value) => Some(value),
            Slot::Free => None,
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index)? {
            Slot::Live(value) => Some(value),
            Slot::Free => None,
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index)? {
            Slot::Live(value) => Some(value),
            Slot::Free => None,
        }
    }

    pub fn is_live(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(Slot::is_live)
    }

    /// Live entities with their slot index, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| match s {
            Slot::Live(value) => Some((i, value)),
            Slot::Free => None,
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| match s {
            Slot::Live(value) => Some((i, value)),
            Slot::Free => None,
        })
    }

    /// Free every slot for which `keep` returns false
    pub fn retain(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        for slot in &mut self.slots {
            if let Slot::Live(value) = slot
                && !keep(value)
            {
                *slot = Slot::Free;
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Slot::is_live)
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Free;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_reuses_first_free_slot() {
        let mut pool = Pool::new(3);
        assert_eq!(pool.spawn('a'), Some(0));
        assert_eq!(pool.spawn('b'), Some(1));
        assert_eq!(pool.spawn('c'), Some(2));
        assert!(pool.is_full());
        assert_eq!(pool.spawn('d'), None);

        assert_eq!(pool.kill(1), Some('b'));
        assert_eq!(pool.kill(1), None);
        assert_eq!(pool.spawn('e'), Some(1));
        assert_eq!(pool.get(1), Some(&'e'));
    }

    #[test]
    fn test_iter_skips_free_slots() {
        let mut pool = Pool::new(4);
        pool.spawn(10);
        pool.spawn(20);
        pool.spawn(30);
        pool.kill(1);

        let live: Vec<_> = pool.iter().collect();
        assert_eq!(live, vec![(0, &10), (2, &30)]);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn test_retain_and_clear() {
        let mut pool = Pool::new(5);
        for i in 0..5 {
            pool.spawn(i);
        }
        pool.retain(|v| *v % 2 == 0);
        assert_eq!(pool.live_count(), 3);
        assert!(!pool.is_live(1));

        pool.clear();
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.capacity(), 5);
    }
}
