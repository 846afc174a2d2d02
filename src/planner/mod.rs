//! Planner: turns a flat operation list into an application plan.
//!
//! Planning is two pure steps: build the key dependency graph, then order it
//! topologically. The plan knows nothing about the property store; the
//! execution layer consumes it.

pub mod graph;
pub mod schedule;

pub use graph::{Graph, GraphNode, NodeIdx, PlannedOp, SkipReason, SkippedOperation};
pub use schedule::{Schedule, schedule};

use crate::model::Operation;

/// A graph together with its application order.
#[derive(Debug, Clone)]
pub struct Plan {
    pub graph: Graph,
    pub schedule: Schedule,
}

impl Plan {
    /// Keys in application order.
    pub fn ordered_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys_of(&self.schedule.order)
    }

    /// Keys that cannot be applied because of a cycle.
    pub fn excluded_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys_of(&self.schedule.excluded)
    }

    fn keys_of<'a>(&'a self, idxs: &'a [NodeIdx]) -> impl Iterator<Item = &'a str> + 'a {
        let nodes = self.graph.nodes();
        idxs.iter().map(move |&idx| nodes[idx].key.as_str())
    }
}

/// Build and schedule the dependency graph for `operations`.
pub fn plan<I>(operations: I, sentinel: char) -> Plan
where
    I: IntoIterator<Item = Operation>,
{
    let graph = Graph::build(operations, sentinel);
    let schedule = schedule(&graph);
    Plan { graph, schedule }
}
