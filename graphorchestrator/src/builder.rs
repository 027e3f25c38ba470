//! `GraphBuilder`: the only way to construct a `Graph`. Mirrors the
//! reference builder's validation rules and order exactly — every check
//! below raises before any mutation of the graph it would have produced.

use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::action::RoutingFn;
use crate::edge::Edge;
use crate::error::GraphError;
use crate::graph::{Graph, END, START};
use crate::node::Node;
use crate::retry::RetryPolicy;

pub struct GraphBuilder<T> {
    nodes: HashMap<String, Node<T>>,
    edges: Vec<Edge<T>>,
}

impl<T> std::fmt::Debug for GraphBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl<T> Default for GraphBuilder<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GraphBuilder<T>
where
    T: Send + Sync + 'static,
{
    pub fn new() -> Self {
        info!(event = "init", "graph=builder");
        let mut b = Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
        };
        b.nodes.insert(START.to_string(), Node::pass_through(START));
        b.nodes.insert(END.to_string(), Node::pass_through(END));
        b
    }

    pub fn add_node(&mut self, node: Node<T>) -> Result<&mut Self, GraphError> {
        debug!(event = "add_node", node_id = %node.id, "graph=builder");
        if self.nodes.contains_key(&node.id) {
            error!(event = "duplicate_node", node_id = %node.id, "graph=builder");
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        self.nodes.insert(node.id.clone(), node);
        info!(event = "node_added", node_id = %id, "graph=builder");
        Ok(self)
    }

    pub fn set_fallback_node(
        &mut self,
        node_id: &str,
        fallback_node_id: &str,
    ) -> Result<&mut Self, GraphError> {
        if !self.nodes.contains_key(node_id) {
            return Err(GraphError::NodeNotFound(node_id.to_string()));
        }
        if !self.nodes.contains_key(fallback_node_id) {
            return Err(GraphError::NodeNotFound(fallback_node_id.to_string()));
        }
        self.nodes.get_mut(node_id).unwrap().fallback_id = Some(fallback_node_id.to_string());
        debug!(
            event = "set_fallback_node",
            node = node_id,
            fallback = fallback_node_id,
            "graph=builder"
        );
        Ok(self)
    }

    pub fn set_retry_policy(
        &mut self,
        node_id: &str,
        policy: RetryPolicy,
    ) -> Result<&mut Self, GraphError> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;
        node.retry_policy = Some(policy);
        Ok(self)
    }

    pub fn add_aggregator(&mut self, aggregator: Node<T>) -> Result<&mut Self, GraphError> {
        debug!(event = "add_aggregator", node_id = %aggregator.id, "graph=builder");
        self.add_node(aggregator)
    }

    pub fn add_concrete_edge(
        &mut self,
        source_id: &str,
        sink_id: &str,
    ) -> Result<&mut Self, GraphError> {
        debug!(
            event = "add_concrete_edge",
            source = source_id,
            sink = sink_id,
            "graph=builder"
        );
        if !self.nodes.contains_key(source_id) {
            return Err(GraphError::NodeNotFound(source_id.to_string()));
        }
        if source_id == END {
            return Err(GraphError::GraphConfiguration(
                "end cannot be the source of a concrete edge".into(),
            ));
        }
        if !self.nodes.contains_key(sink_id) {
            return Err(GraphError::NodeNotFound(sink_id.to_string()));
        }
        if sink_id == START {
            return Err(GraphError::GraphConfiguration(
                "start cannot be a sink of a concrete edge".into(),
            ));
        }

        for edge in &self.edges {
            if let Edge::Concrete { source, sink } = edge {
                if source == source_id && sink == sink_id {
                    error!(
                        event = "duplicate_edge",
                        source = source_id,
                        sink = sink_id,
                        "graph=builder"
                    );
                    return Err(GraphError::EdgeExists {
                        from: source_id.to_string(),
                        to: sink_id.to_string(),
                    });
                }
            }
        }
        for edge in &self.edges {
            if let Edge::Conditional {
                source, candidates, ..
            } = edge
            {
                if source == source_id && candidates.iter().any(|c| c == sink_id) {
                    error!(
                        event = "conflict_with_conditional_edge",
                        source = source_id,
                        sink = sink_id,
                        "graph=builder"
                    );
                    return Err(GraphError::EdgeExists {
                        from: source_id.to_string(),
                        to: sink_id.to_string(),
                    });
                }
            }
        }

        let index = self.edges.len();
        self.edges.push(Edge::Concrete {
            source: source_id.to_string(),
            sink: sink_id.to_string(),
        });
        self.nodes.get_mut(source_id).unwrap().outgoing.push(index);
        self.nodes.get_mut(sink_id).unwrap().incoming.push(index);
        info!(
            event = "concrete_edge_added",
            source = source_id,
            sink = sink_id,
            "graph=builder"
        );
        Ok(self)
    }

    pub fn add_conditional_edge(
        &mut self,
        source_id: &str,
        sink_ids: Vec<&str>,
        router: RoutingFn<T>,
    ) -> Result<&mut Self, GraphError> {
        debug!(
            event = "add_conditional_edge",
            source = source_id,
            "graph=builder"
        );
        if !router.is_tagged() {
            return Err(GraphError::RouterNotDecorated(source_id.to_string()));
        }
        if !self.nodes.contains_key(source_id) {
            return Err(GraphError::NodeNotFound(source_id.to_string()));
        }
        if source_id == END {
            return Err(GraphError::GraphConfiguration(
                "end cannot be the source of a conditional edge".into(),
            ));
        }

        for sink_id in &sink_ids {
            if !self.nodes.contains_key(*sink_id) {
                return Err(GraphError::NodeNotFound((*sink_id).to_string()));
            }
            if *sink_id == START {
                return Err(GraphError::GraphConfiguration(
                    "start cannot be a sink of a conditional edge".into(),
                ));
            }
        }

        for edge in &self.edges {
            if let Edge::Concrete { source, sink } = edge {
                if source == source_id && sink_ids.iter().any(|s| s == sink) {
                    error!(
                        event = "conflict_with_concrete_edge",
                        source = source_id,
                        sink = %sink,
                        "graph=builder"
                    );
                    return Err(GraphError::EdgeExists {
                        from: source_id.to_string(),
                        to: sink.clone(),
                    });
                }
            }
        }
        for edge in &self.edges {
            if let Edge::Conditional {
                source, candidates, ..
            } = edge
            {
                if source == source_id {
                    for s in &sink_ids {
                        if candidates.iter().any(|c| c == s) {
                            error!(
                                event = "duplicate_conditional_branch",
                                source = source_id,
                                sink = *s,
                                "graph=builder"
                            );
                            return Err(GraphError::EdgeExists {
                                from: source_id.to_string(),
                                to: s.to_string(),
                            });
                        }
                    }
                }
            }
        }

        let candidates: Vec<String> = sink_ids.iter().map(|s| s.to_string()).collect();
        let index = self.edges.len();
        self.edges.push(Edge::Conditional {
            source: source_id.to_string(),
            candidates: candidates.clone(),
            router,
        });
        self.nodes.get_mut(source_id).unwrap().outgoing.push(index);
        for sink_id in &sink_ids {
            self.nodes.get_mut(*sink_id).unwrap().incoming.push(index);
        }
        info!(
            event = "conditional_edge_added",
            source = source_id,
            sinks = ?candidates,
            "graph=builder"
        );
        Ok(self)
    }

    pub fn build(self) -> Result<Graph<T>, GraphError> {
        debug!(event = "build_graph", status = "validating", "graph=builder");
        let start = self.nodes.get(START).expect("start node always present");
        let has_conditional_from_start = start
            .outgoing
            .iter()
            .any(|&i| matches!(self.edges[i], Edge::Conditional { .. }));
        if has_conditional_from_start {
            return Err(GraphError::GraphConfiguration(
                "start node cannot have a conditional edge".into(),
            ));
        }
        let has_concrete_from_start = start
            .outgoing
            .iter()
            .any(|&i| matches!(self.edges[i], Edge::Concrete { .. }));
        if !has_concrete_from_start {
            return Err(GraphError::GraphConfiguration(
                "start node must have at least one outgoing concrete edge".into(),
            ));
        }
        let end = self.nodes.get(END).expect("end node always present");
        if end.incoming.is_empty() {
            return Err(GraphError::GraphConfiguration(
                "end node must have at least one incoming edge".into(),
            ));
        }
        info!(event = "graph_built", status = "success", "graph=builder");
        Ok(Graph {
            nodes: self.nodes,
            edges: self.edges,
        })
    }
}
