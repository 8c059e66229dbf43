//! Generation-checked table of objects owned on behalf of C callers.
//!
//! C code refers to arenas through opaque `u64` values issued here. A value
//! whose object has been destroyed resolves to `None`, so a double destroy
//! or a use after destroy is reported instead of touching freed memory.
//!
//! Layout of an issued value: the high 32 bits hold the entry's
//! generation, the low 32 bits hold `entry index + 1`. Zero is therefore
//! never issued and can serve as the "no arena" value in C.

const NULL: u64 = 0;

fn encode(index: u32, generation: u32) -> u64 {
    ((generation as u64) << 32) | (index as u64 + 1)
}

fn decode(value: u64) -> Option<(usize, u32)> {
    if value == NULL {
        return None;
    }
    let index = (value as u32).checked_sub(1)?;
    Some((index as usize, (value >> 32) as u32))
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Owned objects addressed by opaque `u64` values.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// An empty table; `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Take ownership of `value` and return its opaque id.
    pub fn insert(&mut self, value: T) -> u64 {
        if let Some(index) = self.vacant.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            return encode(index, entry.generation);
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        encode(index, 0)
    }

    fn entry(&self, id: u64) -> Option<&Entry<T>> {
        let (index, generation) = decode(id)?;
        self.entries
            .get(index)
            .filter(|entry| entry.generation == generation)
    }

    /// Borrow the object behind `id`.
    pub fn get(&self, id: u64) -> Option<&T> {
        self.entry(id)?.value.as_ref()
    }

    /// Mutably borrow the object behind `id`.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        let (index, generation) = decode(id)?;
        let entry = self.entries.get_mut(index)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.as_mut()
    }

    /// Take the object behind `id` back out of the table.
    ///
    /// The entry's generation advances so `id` never resolves again. An
    /// entry whose generation would wrap to 0 is retired for good.
    pub fn remove(&mut self, id: u64) -> Option<T> {
        let (index, generation) = decode(id)?;
        let entry = self.entries.get_mut(index)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.vacant.push(index as u32);
        }
        Some(value)
    }

    /// Number of live objects.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_never_issued() {
        let mut table = HandleTable::new();
        let id = table.insert("a");
        assert_ne!(id, NULL);
        assert_eq!(table.get(NULL), None);
        assert_eq!(table.get(id), Some(&"a"));
    }

    #[test]
    fn removed_id_goes_stale() {
        let mut table = HandleTable::new();
        let id = table.insert(5u8);
        *table.get_mut(id).unwrap() += 1;
        assert_eq!(table.remove(id), Some(6));
        assert_eq!(table.get(id), None);
        assert_eq!(table.get_mut(id), None);
        assert_eq!(table.remove(id), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn reused_entry_gets_new_id() {
        let mut table = HandleTable::new();
        let first = table.insert(1);
        table.remove(first);
        let second = table.insert(2);
        assert_ne!(first, second);
        assert_eq!(first as u32, second as u32);
        assert_eq!(table.get(second), Some(&2));
        assert_eq!(table.get(first), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn wrapped_entry_is_retired() {
        let mut table = HandleTable::new();
        let id = table.insert(1);
        table.remove(id);
        table.entries[0].generation = u32::MAX;
        let last = table.insert(2);
        assert_eq!(decode(last), Some((0, u32::MAX)));
        table.remove(last);
        assert!(table.vacant.is_empty());
        assert_eq!(table.get(encode(0, 0)), None);
        let fresh = table.insert(3);
        assert_eq!(decode(fresh).map(|(index, _)| index), Some(1));
        assert_eq!(table.len(), 1);
    }
}
