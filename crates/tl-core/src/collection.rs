//! Collection of time-tracked entities backed by an augmented interval tree.
//!
//! # Ordering
//!
//! Nodes are keyed by start time, then by end time with open ends last (see
//! [`compare_spans`]). An entity whose key equals an existing node's key goes
//! to that node's right, so equal entities keep their insertion order in an
//! in-order walk.
//!
//! # Augmentation
//!
//! Every node caches the latest end over its subtree. Insertion only ever
//! raises these values along the descent path. Searches skip a subtree as
//! soon as its cached end shows that nothing in it can match.
//!
//! The tree is never rebalanced. Sorted input produces a chain, so all walks
//! (including tear-down) are iterative.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::end_time::{EndTime, compare_spans};
use crate::node::IntervalNode;
use crate::search::{ExistentAt, Nodes, Overlapping, Window};
use crate::tracked::TimeTracked;

/// Time-tracked entities ordered by existence interval.
///
/// Entities are never removed or modified once added. The collection is not
/// synchronized; share it across threads behind a lock.
#[derive(Debug)]
pub struct TrackedCollection<E> {
    root: Option<Box<IntervalNode<E>>>,
    count: usize,
}

impl<E> Default for TrackedCollection<E> {
    fn default() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }
}

impl<E> TrackedCollection<E> {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }

    /// Number of stored entities.
    pub const fn count(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&IntervalNode<E>> {
        self.root.as_deref()
    }

    /// Latest end over all stored entities.
    pub fn max_end(&self) -> Option<EndTime> {
        self.root().map(IntervalNode::max_end)
    }

    /// Walks the tree in-order, calling `visitor` with each node and its depth.
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&IntervalNode<E>, usize),
    {
        for (node, depth) in self.nodes() {
            visitor(node, depth);
        }
    }

    /// In-order iterator over nodes and their depth.
    pub fn nodes(&self) -> Nodes<'_, E> {
        Nodes::new(self.root())
    }

    /// In-order iterator over the stored entities.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.nodes().map(|(node, _)| node.entity())
    }
}

impl<E: TimeTracked> TrackedCollection<E> {
    /// Adds an entity. Duplicates are not detected.
    ///
    /// The entity should not end before it starts; such an entity is still
    /// stored, but search results involving it are meaningless.
    pub fn add_entity(&mut self, entity: E) {
        let node = IntervalNode::leaf(entity);
        let mut depth = 0usize;
        let mut slot = &mut self.root;
        while let Some(current) = slot {
            if current.max < node.max {
                current.max = node.max;
            }
            slot = if compare_spans(&current.entity, &node.entity) == Ordering::Greater {
                &mut current.left
            } else {
                &mut current.right
            };
            depth += 1;
        }
        *slot = Some(Box::new(node));
        self.count += 1;
        tracing::trace!(depth, count = self.count, "inserted entity");
    }

    /// Lazily yields, in-order, the entities whose existence intersects the
    /// query's `[existent_from, valid_until)` interval.
    pub fn overlapping<Q>(&self, query: &Q) -> Overlapping<'_, E>
    where
        Q: TimeTracked + ?Sized,
    {
        Overlapping::new(self.root(), Window::of(query))
    }

    /// Collects the entities overlapping `query`, in-order.
    pub fn find_overlapping<Q>(&self, query: &Q) -> Vec<&E>
    where
        Q: TimeTracked + ?Sized,
    {
        let found: Vec<&E> = self.overlapping(query).collect();
        tracing::debug!(
            matches = found.len(),
            count = self.count,
            "overlap search finished"
        );
        found
    }

    /// Lazily yields, in-order, the entities existent at `pit`.
    pub fn existent_at(&self, pit: DateTime<Utc>) -> ExistentAt<'_, E> {
        ExistentAt::new(self.root(), pit)
    }

    /// Collects the entities existent at `pit`, in-order.
    pub fn find_existent_at(&self, pit: DateTime<Utc>) -> Vec<&E> {
        let found: Vec<&E> = self.existent_at(pit).collect();
        tracing::debug!(
            matches = found.len(),
            count = self.count,
            %pit,
            "point-in-time search finished"
        );
        found
    }
}

impl<E: TimeTracked> Extend<E> for TrackedCollection<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for entity in iter {
            self.add_entity(entity);
        }
    }
}

impl<E: TimeTracked> FromIterator<E> for TrackedCollection<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

impl<E> Drop for TrackedCollection<E> {
    fn drop(&mut self) {
        let mut pending: Vec<Box<IntervalNode<E>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// `(<depth>)[E:<entity> M:<max>]` per node, in-order.
///
/// The alternate form (`{:#}`) puts each node on its own line, indented by depth.
impl<E: fmt::Display> fmt::Display for TrackedCollection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alternate = f.alternate();
        for (node, depth) in self.nodes() {
            if alternate {
                writeln!(f, "{:indent$}({depth}){node}", "", indent = depth * 2)?;
            } else {
                write!(f, "({depth}){node}")?;
            }
        }
        Ok(())
    }
}
