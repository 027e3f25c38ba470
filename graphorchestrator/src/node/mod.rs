//! Node variants and the common `Node` wrapper the Builder/Graph operate on.
//!
//! Models the node as a tagged sum (`NodeBody`) sharing a common interface,
//! with Aggregator's input type (a list of states) kept on a separate
//! dispatch path — the scheduler branches on `Node::is_aggregator` rather
//! than forcing every variant through one signature.

mod ai;
mod toolset;

pub use ai::AiNode;
pub use toolset::ToolSetNode;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::action::{AggregatorAction, NodeAction};
use crate::error::GraphError;
use crate::retry::RetryPolicy;
use crate::state::State;

/// The tagged sum of node variants. `Tool`/`Human` reuse the Processing
/// action shape; metadata is what distinguishes them for upstream tooling
/// (logging, UI), per §4.3.
pub enum NodeBody<T> {
    Processing(NodeAction<T>),
    Tool {
        action: NodeAction<T>,
        description: Option<String>,
        docstring: Option<String>,
    },
    Ai(AiNode<T>),
    Human(NodeAction<T>),
    ToolSet(ToolSetNode),
    Aggregator(AggregatorAction<T>),
}

/// A graph vertex: stable id, action body, optional fallback id, optional
/// per-node retry override. Incoming/outgoing edge ids are filled in by the
/// `Graph` that owns this node (see `graph.rs` — nodes/edges refer to each
/// other by id rather than by owning pointer, to break the ownership
/// cycle).
pub struct Node<T> {
    pub id: String,
    pub body: NodeBody<T>,
    pub fallback_id: Option<String>,
    pub retry_policy: Option<RetryPolicy>,
    pub(crate) incoming: Vec<usize>,
    pub(crate) outgoing: Vec<usize>,
}

impl<T> Node<T>
where
    T: Send + Sync + 'static,
{
    fn new(id: impl Into<String>, body: NodeBody<T>) -> Self {
        Self {
            id: id.into(),
            body,
            fallback_id: None,
            retry_policy: None,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn processing(id: impl Into<String>, action: NodeAction<T>) -> Result<Self, GraphError> {
        let id = id.into();
        if !action.is_tagged() {
            return Err(GraphError::ActionNotDecorated(id));
        }
        Ok(Self::new(id, NodeBody::Processing(action)))
    }

    pub fn aggregator(
        id: impl Into<String>,
        action: AggregatorAction<T>,
    ) -> Result<Self, GraphError> {
        let id = id.into();
        if !action.is_tagged() {
            return Err(GraphError::ActionNotDecorated(id));
        }
        Ok(Self::new(id, NodeBody::Aggregator(action)))
    }

    pub fn tool(
        id: impl Into<String>,
        action: NodeAction<T>,
        description: Option<String>,
        docstring: Option<String>,
    ) -> Result<Self, GraphError> {
        let id = id.into();
        if !action.is_tagged() {
            return Err(GraphError::ActionNotDecorated(id));
        }
        let empty_desc = description.as_deref().unwrap_or("").trim().is_empty();
        let empty_doc = docstring.as_deref().unwrap_or("").trim().is_empty();
        if empty_desc && empty_doc {
            return Err(GraphError::EmptyToolDescription(id));
        }
        Ok(Self::new(
            id,
            NodeBody::Tool {
                action,
                description,
                docstring,
            },
        ))
    }

    pub fn ai(id: impl Into<String>, ai: AiNode<T>) -> Self {
        Self::new(id, NodeBody::Ai(ai))
    }

    pub fn human(id: impl Into<String>, action: NodeAction<T>) -> Result<Self, GraphError> {
        let id = id.into();
        if !action.is_tagged() {
            return Err(GraphError::ActionNotDecorated(id));
        }
        Ok(Self::new(id, NodeBody::Human(action)))
    }

    pub fn with_fallback(mut self, fallback_id: impl Into<String>) -> Self {
        self.fallback_id = Some(fallback_id.into());
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    pub fn is_aggregator(&self) -> bool {
        matches!(self.body, NodeBody::Aggregator(_))
    }

    /// Runs this node on a single input state. Panics if called on an
    /// Aggregator — the scheduler must check `is_aggregator` first.
    pub async fn execute(&self, state: State<T>) -> Result<State<T>, GraphError>
    where
        T: Serialize + DeserializeOwned,
    {
        match &self.body {
            NodeBody::Processing(a) | NodeBody::Human(a) => a.call(state).await,
            NodeBody::Tool { action, .. } => action.call(state).await,
            NodeBody::Ai(ai) => ai.execute(state).await,
            NodeBody::ToolSet(ts) => ts.execute(state).await,
            NodeBody::Aggregator(_) => {
                panic!("execute() called on an Aggregator node; use execute_many()")
            }
        }
    }

    /// Runs this node on the full batch of pending inputs. Panics if called
    /// on anything but an Aggregator.
    pub async fn execute_many(&self, states: Vec<State<T>>) -> Result<State<T>, GraphError> {
        match &self.body {
            NodeBody::Aggregator(a) => a.call(states).await,
            _ => panic!("execute_many() called on a non-Aggregator node; use execute()"),
        }
    }
}

impl<T> Node<T>
where
    T: Send + Sync + 'static,
{
    /// Identity action used to seed the reserved `"start"` and `"end"`
    /// nodes.
    pub(crate) fn pass_through(id: impl Into<String>) -> Self {
        Self::processing(id, crate::action::node_action(|s| async move { Ok(s) }))
            .expect("pass_through action is always tagged")
    }
}

pub fn tool_set_node<T>(id: impl Into<String>, toolset: ToolSetNode) -> Node<T>
where
    T: Send + Sync + 'static,
{
    Node::new(id, NodeBody::ToolSet(toolset))
}

impl<T> std::fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("fallback_id", &self.fallback_id)
            .finish()
    }
}
