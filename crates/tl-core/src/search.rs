//! In-order walks over the interval tree.
//!
//! All walks keep an explicit stack instead of recursing, because the tree is
//! never rebalanced and its height can grow with the number of entities.

use chrono::{DateTime, Utc};

use crate::end_time::EndTime;
use crate::node::IntervalNode;
use crate::tracked::TimeTracked;

/// In-order iterator over nodes and their depth (number of ancestors).
pub struct Nodes<'a, E> {
    stack: Vec<(&'a IntervalNode<E>, usize)>,
    cursor: Option<(&'a IntervalNode<E>, usize)>,
}

impl<'a, E> Nodes<'a, E> {
    pub(crate) fn new(root: Option<&'a IntervalNode<E>>) -> Self {
        Self {
            stack: Vec::new(),
            cursor: root.map(|node| (node, 0)),
        }
    }
}

impl<'a, E> Iterator for Nodes<'a, E> {
    type Item = (&'a IntervalNode<E>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.cursor {
            self.stack.push((node, depth));
            self.cursor = node.left().map(|left| (left, depth + 1));
        }
        let (node, depth) = self.stack.pop()?;
        self.cursor = node.right().map(|right| (right, depth + 1));
        Some((node, depth))
    }
}

/// Decides which parts of the tree a search has to visit.
pub(crate) trait Probe {
    /// True if no entity in a subtree whose latest end is `max` can match.
    fn prunes(&self, max: &EndTime) -> bool;

    /// True if the entity itself matches.
    fn matches<E: TimeTracked + ?Sized>(&self, entity: &E) -> bool;

    /// True if entities starting at or after `start` may still match.
    fn descends_right(&self, start: DateTime<Utc>) -> bool;
}

/// Matches entities whose existence intersects `[start, end)`.
pub(crate) struct Window {
    start: DateTime<Utc>,
    end: EndTime,
}

impl Window {
    pub(crate) fn of<Q: TimeTracked + ?Sized>(query: &Q) -> Self {
        Self {
            start: query.existent_from(),
            end: query.valid_until(),
        }
    }
}

impl Probe for Window {
    fn prunes(&self, max: &EndTime) -> bool {
        *max < EndTime::At(self.start)
    }

    fn matches<E: TimeTracked + ?Sized>(&self, entity: &E) -> bool {
        self.end.is_after(entity.existent_from()) && entity.valid_until().is_after(self.start)
    }

    fn descends_right(&self, start: DateTime<Utc>) -> bool {
        self.end.is_after(start)
    }
}

/// Matches entities existent at a single point in time.
pub(crate) struct PointInTime(pub(crate) DateTime<Utc>);

impl Probe for PointInTime {
    fn prunes(&self, max: &EndTime) -> bool {
        !max.is_after(self.0)
    }

    fn matches<E: TimeTracked + ?Sized>(&self, entity: &E) -> bool {
        entity.existent_from() <= self.0 && entity.valid_until().is_after(self.0)
    }

    fn descends_right(&self, start: DateTime<Utc>) -> bool {
        start <= self.0
    }
}

/// Pruned in-order walk yielding the entities a [`Probe`] matches.
struct Matches<'a, E, P> {
    probe: P,
    stack: Vec<&'a IntervalNode<E>>,
    cursor: Option<&'a IntervalNode<E>>,
}

impl<'a, E: TimeTracked, P: Probe> Matches<'a, E, P> {
    fn new(root: Option<&'a IntervalNode<E>>, probe: P) -> Self {
        Self {
            probe,
            stack: Vec::new(),
            cursor: root,
        }
    }
}

impl<'a, E: TimeTracked, P: Probe> Iterator for Matches<'a, E, P> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some(node) = self.cursor.take() {
                if self.probe.prunes(&node.max) {
                    break;
                }
                self.stack.push(node);
                self.cursor = node.left();
            }
            let node = self.stack.pop()?;
            if self.probe.descends_right(node.entity.existent_from()) {
                self.cursor = node.right();
            }
            if self.probe.matches(&node.entity) {
                return Some(&node.entity);
            }
        }
    }
}

/// Entities overlapping a query interval, in-order.
///
/// Created by [`TrackedCollection::overlapping`](crate::TrackedCollection::overlapping).
pub struct Overlapping<'a, E> {
    inner: Matches<'a, E, Window>,
}

impl<'a, E: TimeTracked> Overlapping<'a, E> {
    pub(crate) fn new(root: Option<&'a IntervalNode<E>>, window: Window) -> Self {
        Self {
            inner: Matches::new(root, window),
        }
    }
}

impl<'a, E: TimeTracked> Iterator for Overlapping<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Entities existent at a point in time, in-order.
///
/// Created by [`TrackedCollection::existent_at`](crate::TrackedCollection::existent_at).
pub struct ExistentAt<'a, E> {
    inner: Matches<'a, E, PointInTime>,
}

impl<'a, E: TimeTracked> ExistentAt<'a, E> {
    pub(crate) fn new(root: Option<&'a IntervalNode<E>>, pit: DateTime<Utc>) -> Self {
        Self {
            inner: Matches::new(root, PointInTime(pit)),
        }
    }
}

impl<'a, E: TimeTracked> Iterator for ExistentAt<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
