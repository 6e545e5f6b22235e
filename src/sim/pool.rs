//! Fixed-capacity free lists of arena slots, one per transient actor kind

use super::actor::ActorId;
use super::ship::ActorTag;

#[derive(Debug, Clone)]
pub struct Pool {
    pub tag: ActorTag,
    free: Vec<ActorId>,
    capacity: usize,
}

impl Pool {
    /// Pool owning the given (pre-allocated) slots, all initially free
    pub fn new(tag: ActorTag, slots: impl IntoIterator<Item = ActorId>) -> Self {
        let mut free: Vec<ActorId> = slots.into_iter().collect();
        // Pop from the back hands out the lowest ids first
        free.reverse();
        let capacity = free.len();
        Self {
            tag,
            free,
            capacity,
        }
    }

    /// Take a free slot; `None` when exhausted
    pub fn acquire(&mut self) -> Option<ActorId> {
        self.free.pop()
    }

    pub fn release(&mut self, id: ActorId) {
        debug_assert!(!self.free.contains(&id), "slot {id:?} released twice");
        debug_assert!(self.free.len() < self.capacity, "pool over capacity");
        self.free.push(id);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.capacity - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: u32) -> Pool {
        Pool::new(ActorTag::Bullet, (10..10 + n).map(ActorId))
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut p = pool(3);
        assert_eq!(p.acquire(), Some(ActorId(10)));
        assert_eq!(p.acquire(), Some(ActorId(11)));
        assert_eq!(p.acquire(), Some(ActorId(12)));
        assert_eq!(p.acquire(), None);
        assert_eq!(p.in_use(), 3);
    }

    #[test]
    fn test_release_makes_slot_reusable() {
        let mut p = pool(1);
        let id = p.acquire().unwrap();
        assert_eq!(p.available(), 0);
        p.release(id);
        assert_eq!(p.available(), 1);
        assert_eq!(p.acquire(), Some(id));
        assert_eq!(p.capacity(), 1);
    }
}
