use crate::core::errors::{Error, Result};
use crate::models::{Entry, EntryId};

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Generational slot storage for entries. Released slots are recycled;
/// their generation is bumped so old handles stop resolving. A slot whose
/// generation is exhausted is retired instead of recycled. Indices are `u32`,
/// so at most `u32::MAX + 1` slots can ever be allocated.
#[derive(Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Arena {
    pub(crate) fn insert(&mut self, entry: Entry) -> Result<EntryId> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            self.live += 1;
            return Ok(EntryId::new(index, slot.generation));
        }
        let index = slot_index(self.slots.len())?;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        self.live += 1;
        Ok(EntryId::new(index, 0))
    }

    pub(crate) fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub(crate) fn release(&mut self, id: EntryId) -> Option<Entry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free.push(id.index);
        }
        self.live -= 1;
        Some(entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}

fn slot_index(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::CapacityExceeded(len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;

    fn file(name: &str) -> Entry {
        Entry::new(name.to_string(), EntryKind::File, None)
    }

    #[test]
    fn released_handles_go_stale() {
        let mut arena = Arena::default();
        let a = arena.insert(file("a")).unwrap();
        assert!(arena.release(a).is_some());
        assert!(arena.get(a).is_none());

        let b = arena.insert(file("b")).unwrap();
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).map(Entry::name), Some("b"));
    }

    #[test]
    fn double_release_is_rejected() {
        let mut arena = Arena::default();
        let a = arena.insert(file("a")).unwrap();
        arena.release(a);
        assert!(arena.release(a).is_none());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn exhausted_slots_are_retired() {
        let mut arena = Arena::default();
        arena.insert(file("a")).unwrap();
        arena.slots[0].generation = u32::MAX;
        let a = EntryId::new(0, u32::MAX);
        assert!(arena.release(a).is_some());
        assert!(arena.free.is_empty());

        let b = arena.insert(file("b")).unwrap();
        assert_ne!(b.index(), a.index());
        assert!(arena.get(a).is_none());
    }

    #[test]
    fn index_past_u32_is_rejected() {
        assert_eq!(slot_index(7).unwrap(), 7);
        assert_eq!(slot_index(u32::MAX as usize).unwrap(), u32::MAX);
        if let Some(too_many) = (u32::MAX as usize).checked_add(1) {
            assert!(matches!(slot_index(too_many), Err(Error::CapacityExceeded(n)) if n == too_many));
        }
    }
}
