//! Price level implementation with FIFO queue
//!
//! A price level holds all resting orders on one side at a single price.
//! The queue is a doubly linked list threaded through arena nodes: the level
//! only stores head and tail, so appends, front pops and arbitrary removals
//! are all O(1).

use types::numeric::Quantity;

use super::arena::{ArenaIndex, OrderArena};

/// A price level on one side of the ladder
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    head: Option<ArenaIndex>,
    tail: Option<ArenaIndex>,
    /// Total remaining quantity resting at this level
    total_quantity: Quantity,
    order_count: usize,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of the queue (time priority)
    pub fn push_back(&mut self, arena: &mut OrderArena, ix: ArenaIndex) {
        let prev_tail = self.tail;
        if let Some(tail) = prev_tail {
            arena.node_mut(tail).next = Some(ix);
        }

        let node = arena.node_mut(ix);
        debug_assert!(!node.queued, "order is already queued");
        node.prev = prev_tail;
        node.next = None;
        node.queued = true;
        let quantity = node.order.remaining_quantity;

        if prev_tail.is_none() {
            self.head = Some(ix);
        }
        self.tail = Some(ix);
        self.total_quantity += quantity;
        self.order_count += 1;
    }

    /// Unlink an order from anywhere in the queue
    ///
    /// Returns the remaining quantity the order still had, or None if the
    /// order was not queued.
    pub fn unlink(&mut self, arena: &mut OrderArena, ix: ArenaIndex) -> Option<Quantity> {
        let (prev, next, quantity) = {
            let node = arena.node(ix);
            if !node.queued {
                return None;
            }
            (node.prev, node.next, node.order.remaining_quantity)
        };

        match prev {
            Some(p) => arena.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena.node_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let node = arena.node_mut(ix);
        node.prev = None;
        node.next = None;
        node.queued = false;

        self.total_quantity = self.total_quantity.saturating_sub(quantity);
        self.order_count -= 1;
        Some(quantity)
    }

    /// Oldest order at this level
    pub fn front(&self) -> Option<ArenaIndex> {
        self.head
    }

    /// Account for a partial fill of one of this level's orders
    pub fn reduce(&mut self, quantity: Quantity) {
        self.total_quantity = self.total_quantity.saturating_sub(quantity);
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Walk the queue front to back
    pub fn iter<'a>(&self, arena: &'a OrderArena) -> LevelIter<'a> {
        LevelIter {
            arena,
            cursor: self.head,
        }
    }
}

/// Front-to-back iterator over a level's queue
pub struct LevelIter<'a> {
    arena: &'a OrderArena,
    cursor: Option<ArenaIndex>,
}

impl Iterator for LevelIter<'_> {
    type Item = ArenaIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.arena.node(current).next;
        Some(current)
    }
}
