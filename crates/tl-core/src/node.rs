//! Augmented nodes of the interval tree.

use std::fmt;

use crate::end_time::EndTime;
use crate::tracked::TimeTracked;

/// A node of the interval tree.
///
/// Owns one entity and both child subtrees. `max` caches the latest end over
/// the node's entity and all of its descendants.
#[derive(Debug)]
pub struct IntervalNode<E> {
    pub(crate) entity: E,
    pub(crate) max: EndTime,
    pub(crate) left: Option<Box<Self>>,
    pub(crate) right: Option<Box<Self>>,
}

impl<E: TimeTracked> IntervalNode<E> {
    pub(crate) fn leaf(entity: E) -> Self {
        let max = entity.valid_until();
        Self {
            entity,
            max,
            left: None,
            right: None,
        }
    }
}

impl<E> IntervalNode<E> {
    /// The stored entity.
    pub const fn entity(&self) -> &E {
        &self.entity
    }

    /// Latest end over this node's subtree.
    pub const fn max_end(&self) -> EndTime {
        self.max
    }

    /// Subtree of entities ordered before this one.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// Subtree of entities ordered at or after this one.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl<E: fmt::Display> fmt::Display for IntervalNode<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[E:{} M:{}]", self.entity, self.max)
    }
}
