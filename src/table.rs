//! The two dictionaries of the codec.
//!
//! The encoder needs to find the code of a byte string, for which it keeps an open addressed
//! hash table. The decoder only ever asks for the string of a code and codes are dense, so a
//! plain array indexed by code suffices.
use crate::{Code, BASE_ENTRIES, MAX_ENTRIES};

use alloc::{boxed::Box, vec::Vec};

/// The default number of slots in a [`StringTable`].
///
/// This is much larger than the 4096 codes that can ever be assigned, keeping the load factor
/// of the table at or below one quarter.
pub const DEFAULT_CAPACITY: usize = 16384;

/// A fixed capacity map from byte strings to codes with linear probing.
///
/// Entries are never removed and the table never grows. When every slot is taken, further
/// inserts of unknown keys are dropped without notice other than a log message.
pub struct StringTable {
    slots: Box<[Option<Entry>]>,
    len: usize,
}

struct Entry {
    key: Box<[u8]>,
    code: Code,
}

/// A map from codes to byte strings, indexed directly by the code.
pub struct CodeTable {
    strings: Vec<Vec<u8>>,
}

impl StringTable {
    /// Create a table with `capacity` slots, or [`DEFAULT_CAPACITY`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        StringTable {
            slots: slots.into_boxed_slice(),
            len: 0,
        }
    }

    /// Create a table holding all single byte strings, each mapped to its byte value.
    pub fn seeded(capacity: usize) -> Self {
        let mut table = StringTable::new(capacity);
        for byte in 0..BASE_ENTRIES as u16 {
            table.insert(&[byte as u8], byte);
        }
        table
    }

    /// Map `key` to `code`, overwriting the code of an existing equal key.
    ///
    /// Does nothing if the key is new and all slots are occupied.
    pub fn insert(&mut self, key: &[u8], code: Code) {
        let home = self.home(key);
        let mut slot = home;
        loop {
            match &self.slots[slot] {
                Some(entry) if *entry.key != *key => {}
                _ => break,
            }

            slot = self.probe(slot);
            if slot == home {
                log::warn!(
                    "string table full at {} entries, dropped code {}",
                    self.len,
                    code
                );
                return;
            }
        }

        match &mut self.slots[slot] {
            Some(entry) => entry.code = code,
            empty => {
                *empty = Some(Entry {
                    key: key.into(),
                    code,
                });
                self.len += 1;
            }
        }
    }

    /// Find the code of `key`.
    pub fn lookup(&self, key: &[u8]) -> Option<Code> {
        let home = self.home(key);
        let mut slot = home;
        while let Some(entry) = &self.slots[slot] {
            if *entry.key == *key {
                return Some(entry.code);
            }

            slot = self.probe(slot);
            if slot == home {
                break;
            }
        }

        None
    }

    /// The number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// If no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn home(&self, key: &[u8]) -> usize {
        (fnv1a(key) % self.slots.len() as u64) as usize
    }

    fn probe(&self, slot: usize) -> usize {
        (slot + 1) % self.slots.len()
    }
}

impl CodeTable {
    /// Create a table where every code maps to the empty string.
    pub fn new() -> Self {
        let mut strings = Vec::with_capacity(MAX_ENTRIES);
        strings.resize_with(MAX_ENTRIES, Vec::new);
        CodeTable { strings }
    }

    /// Create a table where the first 256 codes map to their single byte.
    pub fn seeded() -> Self {
        let mut table = CodeTable::new();
        for (byte, string) in table.strings[..BASE_ENTRIES].iter_mut().enumerate() {
            string.push(byte as u8);
        }
        table
    }

    /// Store the expansion of `code`. Codes outside of the 12-bit range are ignored.
    pub fn set(&mut self, code: Code, string: Vec<u8>) {
        if let Some(slot) = self.strings.get_mut(usize::from(code)) {
            *slot = string;
        }
    }

    /// The expansion of `code`, if the code is in range and was set.
    pub fn get(&self, code: Code) -> Option<&[u8]> {
        match self.strings.get(usize::from(code)) {
            Some(string) if !string.is_empty() => Some(string),
            _ => None,
        }
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        CodeTable::new()
    }
}

/// The 64-bit FNV-1a hash.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}
