// src/crawl/registry.rs
// =============================================================================
// This module implements the dedup registry: an append-only set of strings
// keyed by a content hash. Every "have I seen this already?" check in the
// crawl goes through one of these.
//
// Key properties:
// - Insertion order is discovery order, and stays addressable by index
//   (the report and the index-aligned off-site registries depend on this)
// - Capacity is fixed at construction; inserting past it silently drops
//   the value (the insert reports false so callers can observe it)
// - The registry itself tolerates duplicate values: callers are expected
//   to check contains() before insert()
//
// The hash is djb2, chosen for being tiny and bit-reproducible: hash
// values show up directly in test fixtures.
// =============================================================================

// djb2 over the raw bytes of the value
//
// hash = hash * 33 + byte, seeded at 5381, wrapping at 64 bits.
pub fn hash_djb2(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &byte in bytes {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

// One stored entry: the hash and the value it was computed from
struct Entry {
    hash: u64,
    value: String,
}

// Append-only, capacity-bounded registry of strings
pub struct DedupRegistry {
    entries: Vec<Entry>,
    capacity: usize,
}

impl DedupRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        DedupRegistry {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends the value if capacity allows
    ///
    /// Returns false when the registry is full and the value was dropped.
    /// Duplicates are NOT rejected here: check contains() first.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push(Entry {
            hash: hash_djb2(value.as_bytes()),
            value: value.to_string(),
        });
        true
    }

    /// Whether any stored entry hashes to the same djb2 value
    ///
    /// A linear scan; acceptable because capacity is small and fixed.
    pub fn contains_hash(&self, hash: u64) -> bool {
        self.entries.iter().any(|entry| entry.hash == hash)
    }

    /// Whether this exact value has been inserted (by hash)
    pub fn contains(&self, value: &str) -> bool {
        self.contains_hash(hash_djb2(value.as_bytes()))
    }

    /// The value stored at the given insertion index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.value.as_str())
    }

    /// Stored values in insertion (= discovery) order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
