//! Storage Core Module
//!
//! Authoritative key map plus recency ordering for the store.
//!
//! Entries live in a slot vector and are threaded into a doubly linked list by
//! slot index. Head = most recently used, tail = least recently used. The
//! key map points at slots, so touch, insert and removal are all O(1).
//!
//! Nothing here checks ownership. A call that breaks the structure's own
//! contract (inserting a present key, touching an absent one) is a bug in the
//! caller and panics.

use std::collections::HashMap;

use crate::store::Entry;

// == Node ==
#[derive(Debug)]
struct Node {
    entry: Entry,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Storage Core ==
/// Key → entry map with O(1) move-to-head and tail removal.
#[derive(Debug, Default)]
pub struct StorageCore {
    /// Node storage; `None` marks a free slot
    slots: Vec<Option<Node>>,
    /// Free slot indices available for reuse
    free: Vec<usize>,
    /// Key → slot index
    index: HashMap<String, usize>,
    /// Most recently used slot
    head: Option<usize>,
    /// Least recently used slot
    tail: Option<usize>,
}

impl StorageCore {
    // == Constructor ==
    /// Creates an empty storage core.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty storage core with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    // == Lookup ==
    /// Returns the entry stored under `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&slot| &self.node(slot).entry)
    }

    // == Insert Front ==
    /// Inserts a new entry at the head.
    ///
    /// # Panics
    /// If an entry with the same key is already present.
    pub(crate) fn insert_front(&mut self, entry: Entry) -> &mut Entry {
        assert!(
            !self.contains(entry.key()),
            "insert_front: key {:?} already present",
            entry.key()
        );

        let key = entry.key().to_string();
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.index.insert(key, slot);
        self.link_front(slot);
        &mut self.node_mut(slot).entry
    }

    // == Touch Front ==
    /// Moves an existing entry to the head and returns it.
    ///
    /// # Panics
    /// If `key` is not present.
    pub(crate) fn touch_front(&mut self, key: &str) -> &mut Entry {
        let slot = self.slot_of(key, "touch_front");
        if self.head != Some(slot) {
            self.unlink(slot);
            self.link_front(slot);
        }
        &mut self.node_mut(slot).entry
    }

    // == Update Value ==
    /// Replaces the value of an existing entry without moving it.
    ///
    /// # Panics
    /// If `key` is not present.
    pub(crate) fn update_value(&mut self, key: &str, value: String) -> &mut Entry {
        let slot = self.slot_of(key, "update_value");
        let entry = &mut self.node_mut(slot).entry;
        entry.value = value;
        entry
    }

    // == Remove Tail ==
    /// Removes and returns the least recently used entry.
    pub fn remove_tail(&mut self) -> Option<Entry> {
        let slot = self.tail?;
        Some(self.release(slot))
    }

    // == Remove ==
    /// Removes the entry stored under `key`, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let slot = *self.index.get(key)?;
        Some(self.release(slot))
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Iterate ==
    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            core: self,
            cursor: self.head,
        }
    }

    // == Internal Helpers ==
    fn slot_of(&self, key: &str, op: &str) -> usize {
        match self.index.get(key) {
            Some(&slot) => slot,
            None => panic!("{}: key {:?} not present", op, key),
        }
    }

    fn node(&self, slot: usize) -> &Node {
        self.slots[slot]
            .as_ref()
            .unwrap_or_else(|| panic!("recency list points at free slot {}", slot))
    }

    fn node_mut(&mut self, slot: usize) -> &mut Node {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| panic!("recency list points at free slot {}", slot))
    }

    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(head) => self.node_mut(head).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }

    fn release(&mut self, slot: usize) -> Entry {
        self.unlink(slot);
        let node = self.slots[slot]
            .take()
            .unwrap_or_else(|| panic!("recency list points at free slot {}", slot));
        self.index
            .remove(node.entry.key())
            .unwrap_or_else(|| panic!("key {:?} missing from index", node.entry.key()));
        self.free.push(slot);
        node.entry
    }
}

// == Iterator ==
/// Head-to-tail iterator over a [`StorageCore`].
pub struct Iter<'a> {
    core: &'a StorageCore,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.core.node(slot);
        self.cursor = node.next;
        Some(&node.entry)
    }
}
