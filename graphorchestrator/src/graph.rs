//! The compiled, immutable graph: nodes by id plus the edge list. Built only
//! through `GraphBuilder::build`; once returned, a `Graph` cannot be
//! mutated — callers reopen a `GraphBuilder` if they need to change wiring.

use std::collections::HashMap;

use crate::edge::Edge;
use crate::node::Node;

pub const START: &str = "start";
pub const END: &str = "end";

pub struct Graph<T> {
    pub(crate) nodes: HashMap<String, Node<T>>,
    pub(crate) edges: Vec<Edge<T>>,
}

impl<T> Graph<T> {
    pub fn node(&self, id: &str) -> Option<&Node<T>> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }
}

impl<T> std::fmt::Debug for Graph<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}
