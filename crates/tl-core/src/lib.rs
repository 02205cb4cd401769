//! Core of the timeline: time-tracked entities in an augmented interval tree.
//!
//! This crate contains:
//! - [`TimeTracked`]: the capability an entity needs to be stored
//! - [`EndTime`] and its comparator, where "not ended yet" sorts last
//! - [`TrackedCollection`]: insertion, in-order traversal, overlap and
//!   point-in-time search
//! - [`Lifespan`]: a ready-made entity with a one-way end transition

mod collection;
mod end_time;
mod lifespan;
mod node;
mod search;
mod tracked;

pub use collection::TrackedCollection;
pub use end_time::{EndTime, compare_end_time, compare_spans, overlaps};
pub use lifespan::{Lifespan, LifespanError};
pub use node::IntervalNode;
pub use search::{ExistentAt, Nodes, Overlapping};
pub use tracked::TimeTracked;
