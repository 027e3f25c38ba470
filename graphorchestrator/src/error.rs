//! Error types for graph construction and execution.
//!
//! One `thiserror` enum covers every failure kind a `GraphBuilder` or
//! `GraphExecutor` can raise, each carrying enough context (node id, cause)
//! for diagnosis. Builder errors are never recoverable; execution errors are
//! either consumed internally by retry/fallback or surface as a single fatal
//! error that aborts the in-flight superstep.

use thiserror::Error;

/// Unified error type for the graph runtime.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node id was registered more than once.
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    /// An edge or fallback referenced a node id that was never registered.
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    /// A Concrete edge duplicates an existing one, or conflicts with a
    /// Conditional edge registered for the same source/sink pair.
    #[error("edge from '{from}' to '{to}' already exists or conflicts with an existing edge")]
    EdgeExists { from: String, to: String },

    /// The graph violates one of the topology invariants (start/end wiring,
    /// reserved ids used incorrectly, etc.).
    #[error("graph configuration error: {0}")]
    GraphConfiguration(String),

    /// A node action was built from the untagged escape hatch instead of the
    /// `node_action` smart constructor.
    #[error("action for node '{0}' is not marked as a node action")]
    ActionNotDecorated(String),

    /// A routing function was built from the untagged escape hatch instead
    /// of the `routing_function` smart constructor.
    #[error("routing function for edge from '{0}' is not marked as a routing function")]
    RouterNotDecorated(String),

    /// A Processing/Tool/AI/Human/ToolSet action failed after exhausting
    /// retries, with no declared fallback (or the failure is not retryable).
    #[error("node '{node_id}' execution failed: {cause}")]
    InvalidActionOutput { node_id: String, cause: String },

    /// An Aggregator action failed after exhausting retries.
    #[error("aggregator '{node_id}' execution failed: {cause}")]
    InvalidAggregatorOutput { node_id: String, cause: String },

    /// A routing function returned a sink id that is not one of its declared
    /// candidates.
    #[error("routing function at node '{node_id}' returned unknown sink '{sink}'")]
    InvalidRoutingOutput { node_id: String, sink: String },

    /// A Tool node was constructed with neither a description nor a
    /// docstring-equivalent.
    #[error("tool node '{0}' has no description")]
    EmptyToolDescription(String),

    /// A node did not complete within `per_superstep_timeout`. Not subject
    /// to fallback.
    #[error("node '{0}' timed out")]
    Timeout(String),

    /// A node's action failed after all retries and there is no fallback
    /// (or the fallback was never attempted for another fatal reason).
    #[error("node '{node_id}' failed: {cause}")]
    NodeExecutionFailed { node_id: String, cause: String },

    /// A declared fallback also failed after all retries.
    #[error("fallback node '{fallback_id}' failed: {cause}")]
    FallbackFailed { fallback_id: String, cause: String },

    /// The superstep counter reached `max_supersteps` before the graph
    /// drained.
    #[error("max supersteps reached")]
    MaxSupersteps,

    /// A checkpoint store failed to persist or load state.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    /// A ToolSet node's HTTP call to the remote tool server failed (request,
    /// status, or response decoding).
    #[error("toolset transport error: {0}")]
    Transport(String),
}
