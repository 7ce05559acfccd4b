//! Previous/next sibling navigation for the reader.

use crate::db::{Database, Node};
use crate::error::Result;

/// A node's neighbors among nodes sharing its parent, in ID order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Siblings {
    /// Sibling with the greatest ID below the node's, if any.
    pub previous: Option<i64>,
    /// Sibling with the smallest ID above the node's, if any.
    pub next: Option<i64>,
}

impl Siblings {
    /// Whether the node is first among its siblings.
    pub fn is_first(&self) -> bool {
        self.previous.is_none()
    }

    /// Whether the node is last among its siblings.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Compute a node's previous and next siblings.
///
/// Ordering is by identifier (creation order), not title. Grouping is
/// by parent alone: top-level nodes (null parent) of every library are
/// siblings of one another.
pub fn siblings(db: &Database, node: &Node) -> Result<Siblings> {
    Ok(Siblings {
        previous: db.sibling_before(node)?.map(|n| n.id),
        next: db.sibling_after(node)?.map(|n| n.id),
    })
}
