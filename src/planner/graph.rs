//! Dependency graph over property keys.
//!
//! Each key targeted or referenced by an operation is a node. An operation
//! whose value references another key adds one edge from the referenced node
//! to its target node, so a key with two referencing operations carries two
//! units of in-degree even when both name the same dependency.

use std::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::model::Operation;
use crate::reference::classify;

/// Index of a node in creation order.
pub type NodeIdx = usize;

/// An operation admitted to the graph, with its reference already classified.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOp {
    pub op: Operation,
    /// Key named by the value, when the value is a reference.
    pub reference: Option<String>,
}

/// One property key in the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub key: String,
    /// Number of reference-bearing operations targeting this key.
    pub in_degree: usize,
    /// Operations targeting this key, in input order.
    pub operations: Vec<PlannedOp>,
    /// Dependent nodes, one entry per referencing operation.
    pub children: SmallVec<[NodeIdx; 4]>,
}

impl GraphNode {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            in_degree: 0,
            operations: Vec::new(),
            children: SmallVec::new(),
        }
    }

    /// A node that exists only because another key references it.
    pub fn is_anchor(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Why an operation was dropped instead of applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The operation has no target key.
    EmptyKey,
    /// The operation's value references its own key.
    SelfReference,
    /// The store refused the write.
    Store(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyKey => write!(f, "operation has an empty key"),
            SkipReason::SelfReference => write!(f, "operation references its own key"),
            SkipReason::Store(msg) => write!(f, "store rejected the write: {msg}"),
        }
    }
}

/// An operation that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOperation {
    pub operation: Operation,
    pub reason: SkipReason,
}

/// Key dependency graph, nodes stored in creation order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, NodeIdx>,
    skipped: Vec<SkippedOperation>,
}

impl Graph {
    /// Build the graph from operations in input order.
    pub fn build<I>(operations: I, sentinel: char) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        let operations = operations.into_iter();
        let (lower, _) = operations.size_hint();
        let mut graph = Graph {
            nodes: Vec::with_capacity(lower),
            index: HashMap::with_capacity(lower),
            skipped: Vec::new(),
        };

        for op in operations {
            graph.insert(op, sentinel);
        }

        debug!(
            nodes = graph.nodes.len(),
            skipped = graph.skipped.len(),
            "built dependency graph"
        );
        graph
    }

    fn insert(&mut self, op: Operation, sentinel: char) {
        if op.key.is_empty() {
            warn!(source = %op.source, "dropping change with an empty key");
            self.skipped.push(SkippedOperation { operation: op, reason: SkipReason::EmptyKey });
            return;
        }

        let reference = classify(&op.raw_value, sentinel).reference().map(str::to_string);
        if reference.as_deref() == Some(op.key.as_str()) {
            warn!(
                key = %op.key,
                source = %op.source,
                "dropping change that references its own key"
            );
            self.skipped.push(SkippedOperation { operation: op, reason: SkipReason::SelfReference });
            return;
        }

        let target = self.node_for(&op.key);
        if let Some(dependency) = &reference {
            self.nodes[target].in_degree += 1;
            let parent = self.node_for(dependency);
            self.nodes[parent].children.push(target);
        }
        self.nodes[target].operations.push(PlannedOp { op, reference });
    }

    /// Index of the node for `key`, creating an empty one if absent.
    fn node_for(&mut self, key: &str) -> NodeIdx {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(GraphNode::new(key));
        self.index.insert(key.to_string(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, idx: NodeIdx) -> Option<&GraphNode> {
        self.nodes.get(idx)
    }

    pub fn get(&self, key: &str) -> Option<&GraphNode> {
        self.index.get(key).map(|&idx| &self.nodes[idx])
    }

    /// Operations dropped during construction.
    pub fn skipped(&self) -> &[SkippedOperation] {
        &self.skipped
    }

    /// Decompose into nodes and skipped operations.
    pub fn into_parts(self) -> (Vec<GraphNode>, Vec<SkippedOperation>) {
        (self.nodes, self.skipped)
    }
}
