//! # graphorchestrator
//!
//! A bulk-synchronous, Pregel-style computation graph runtime: build a graph
//! of typed nodes and edges, then drive it through supersteps with bounded
//! concurrency, per-node retry/backoff, fallback routing, and checkpointing.
//!
//! ## Design Principles
//!
//! - **One state type per graph**: `State<T>` is an ordered sequence of
//!   opaque items; every node reads a `State<T>` and returns a `State<T>`
//!   (Aggregator reads a `Vec<State<T>>`).
//! - **Supersteps, not a call stack**: the executor advances the whole
//!   pending map one generation at a time; every task of superstep *k*
//!   finishes before superstep *k+1* starts.
//! - **Role-tagged actions**: actions and routing functions are built
//!   through dedicated smart constructors (`node_action`, `tool_method`,
//!   `aggregator_action`, `routing_function`) so the Builder can reject
//!   anything wired in without going through them.
//!
//! ## Main Modules
//!
//! - [`graph`] / [`builder`]: `Graph`, `GraphBuilder` — build and validate a
//!   graph's topology.
//! - [`node`]: `Node`, `NodeBody` and its variants (`AiNode`, `ToolSetNode`).
//! - [`edge`]: `Edge` (Concrete / Conditional).
//! - [`executor`]: `GraphExecutor` — the superstep scheduler.
//! - [`checkpoint`]: `CheckpointStore` trait plus `MemoryCheckpointStore` and
//!   `JsonCheckpointStore`.
//! - [`action`]: role-tagged action/router wrappers and their constructors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use graphorchestrator::{GraphBuilder, GraphExecutor, Node, State};
//! use graphorchestrator::node_action;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut builder: GraphBuilder<String> = GraphBuilder::new();
//! builder
//!     .add_node(Node::processing("shout", node_action(|mut s: State<String>| async move {
//!         if let Some(last) = s.messages.last_mut() {
//!             last.push('!');
//!         }
//!         Ok(s)
//!     })).unwrap())
//!     .unwrap()
//!     .add_concrete_edge("start", "shout")
//!     .unwrap()
//!     .add_concrete_edge("shout", "end")
//!     .unwrap();
//! let graph = builder.build().unwrap();
//!
//! let initial = State::new(vec!["hello".to_string()]);
//! let executor = GraphExecutor::new(graph, initial);
//! let final_state = executor
//!     .execute(100, std::time::Duration::from_secs(300))
//!     .await
//!     .unwrap();
//! assert_eq!(final_state.unwrap().messages, vec!["hello!".to_string()]);
//! # }
//! ```

pub mod action;
pub mod builder;
pub mod checkpoint;
pub mod edge;
pub mod error;
pub mod executor;
pub mod graph;
pub mod node;
pub mod retry;
pub mod state;

pub use action::{
    aggregator_action, node_action, routing_function, tool_method, AggregatorAction, NodeAction,
    RoutingFn,
};
pub use builder::GraphBuilder;
pub use checkpoint::{CheckpointStore, JsonCheckpointStore, MemoryCheckpointStore, PendingMap};
pub use edge::Edge;
pub use error::GraphError;
pub use executor::GraphExecutor;
pub use graph::{Graph, END, START};
pub use node::{AiNode, Node, NodeBody, ToolSetNode};
pub use retry::RetryPolicy;
pub use state::State;
