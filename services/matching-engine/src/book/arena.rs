//! Order arena
//!
//! Owns every order ever submitted to one book. Nodes carry the prev/next
//! links of the price-level queue they rest in, so a level can unlink any
//! order in O(1) given its arena index. Records are never freed: a filled or
//! cancelled order stays addressable so later cancels can be rejected.

use std::collections::HashMap;
use types::ids::OrderId;
use types::order::Order;

/// Position of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaIndex(usize);

/// Arena-resident order plus its queue links
#[derive(Debug, Clone)]
pub struct OrderNode {
    pub order: Order,
    pub(crate) prev: Option<ArenaIndex>,
    pub(crate) next: Option<ArenaIndex>,
    /// Whether the node is currently linked into a price level
    pub(crate) queued: bool,
}

/// Owning store of a book's orders, indexed by order id
#[derive(Debug, Default)]
pub struct OrderArena {
    nodes: Vec<OrderNode>,
    index: HashMap<OrderId, ArenaIndex>,
}

impl OrderArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an order and return its arena index
    pub fn insert(&mut self, order: Order) -> ArenaIndex {
        let ix = ArenaIndex(self.nodes.len());
        self.index.insert(order.order_id, ix);
        self.nodes.push(OrderNode {
            order,
            prev: None,
            next: None,
            queued: false,
        });
        ix
    }

    /// Look up the arena index of an order
    pub fn index_of(&self, order_id: &OrderId) -> Option<ArenaIndex> {
        self.index.get(order_id).copied()
    }

    /// Look up an order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.index_of(order_id).map(|ix| self.order(ix))
    }

    pub fn order(&self, ix: ArenaIndex) -> &Order {
        &self.nodes[ix.0].order
    }

    pub fn order_mut(&mut self, ix: ArenaIndex) -> &mut Order {
        &mut self.nodes[ix.0].order
    }

    pub(crate) fn node(&self, ix: ArenaIndex) -> &OrderNode {
        &self.nodes[ix.0]
    }

    pub(crate) fn node_mut(&mut self, ix: ArenaIndex) -> &mut OrderNode {
        &mut self.nodes[ix.0]
    }

    /// Iterate over every order in submission order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.nodes.iter().map(|node| &node.order)
    }

    /// Number of orders ever stored
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
