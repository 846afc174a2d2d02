//! Topological scheduling (Kahn's algorithm).
//!
//! Nodes whose in-degree never reaches zero sit on a cycle or downstream of
//! one. They are never yielded and come back as the excluded set.
//!
//! Time complexity is O(V + E) where E counts one edge per referencing
//! operation; the queue and order buffers are sized to the node count up
//! front.

use std::collections::VecDeque;

use tracing::trace;

use super::graph::{Graph, NodeIdx};

/// Scheduler output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    /// Nodes in application order. Every dependency precedes its dependents.
    pub order: Vec<NodeIdx>,
    /// Nodes that could not be ordered, in creation order.
    pub excluded: Vec<NodeIdx>,
}

impl Schedule {
    /// True when every node was ordered.
    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }
}

/// Order the graph's nodes so each referenced key precedes its dependents.
///
/// Ready nodes are processed first-in first-out, seeded in creation order, so
/// the result is fully determined by the input operation order.
pub fn schedule(graph: &Graph) -> Schedule {
    let nodes = graph.nodes();
    let mut in_degree: Vec<usize> = nodes.iter().map(|n| n.in_degree).collect();

    let mut queue: VecDeque<NodeIdx> = VecDeque::with_capacity(nodes.len());
    queue.extend((0..nodes.len()).filter(|&idx| in_degree[idx] == 0));

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(idx) = queue.pop_front() {
        order.push(idx);
        for &child in &nodes[idx].children {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    let excluded: Vec<NodeIdx> = if order.len() == nodes.len() {
        Vec::new()
    } else {
        (0..nodes.len()).filter(|&idx| in_degree[idx] != 0).collect()
    };

    trace!(ordered = order.len(), excluded = excluded.len(), "scheduled graph");
    Schedule { order, excluded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mode, Operation};

    fn keys(graph: &Graph, idxs: &[NodeIdx]) -> Vec<String> {
        idxs.iter().map(|&i| graph.nodes()[i].key.clone()).collect()
    }

    fn add_ref(key: &str, target: &str) -> Operation {
        Operation::new(key, Mode::Add, format!("&{target}"))
    }

    #[test]
    fn test_chain_orders_dependencies_first() {
        let graph = Graph::build(vec![add_ref("c", "b"), add_ref("b", "a")], '&');
        let schedule = schedule(&graph);

        assert!(schedule.is_complete());
        assert_eq!(keys(&graph, &schedule.order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_independent_keys_keep_creation_order() {
        let graph = Graph::build(vec![
            Operation::new("z", Mode::Add, "1"),
            Operation::new("y", Mode::Add, "1"),
            Operation::new("x", Mode::Add, "1"),
        ], '&');
        assert_eq!(keys(&graph, &schedule(&graph).order), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_cycle_and_downstream_are_excluded() {
        let graph = Graph::build(vec![
            add_ref("a", "b"),
            add_ref("b", "c"),
            add_ref("c", "a"),
            add_ref("d", "c"),
            add_ref("e", "d"),
            Operation::new("f", Mode::Add, "1"),
        ], '&');
        let schedule = schedule(&graph);

        assert_eq!(keys(&graph, &schedule.order), vec!["f"]);
        assert_eq!(keys(&graph, &schedule.excluded), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_upstream_of_cycle_is_scheduled() {
        let graph = Graph::build(vec![
            add_ref("b", "a"),
            add_ref("c", "b"),
            add_ref("d", "c"),
            add_ref("e", "d"),
            add_ref("c", "e"),
        ], '&');
        let schedule = schedule(&graph);

        assert_eq!(keys(&graph, &schedule.order), vec!["a", "b"]);
        assert_eq!(keys(&graph, &schedule.excluded), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_repeated_dependency_is_cleared_per_operation() {
        let graph = Graph::build(vec![
            add_ref("pp", "gp"),
            Operation::new("pp", Mode::Multiply, "&gp"),
        ], '&');
        let schedule = schedule(&graph);

        assert!(schedule.is_complete());
        assert_eq!(keys(&graph, &schedule.order), vec!["gp", "pp"]);
    }

    #[test]
    fn test_empty_graph() {
        let schedule = schedule(&Graph::default());
        assert!(schedule.order.is_empty());
        assert!(schedule.is_complete());
    }
}
