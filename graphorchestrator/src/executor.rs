//! `GraphExecutor`: drives the bulk-synchronous superstep loop over a
//! compiled `Graph`, applying per-node retry/backoff, per-superstep
//! timeout, fallback routing, and optional checkpointing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::checkpoint::{CheckpointStore, PendingMap};
use crate::edge::Edge;
use crate::error::GraphError;
use crate::graph::{Graph, END, START};
use crate::retry::RetryPolicy;
use crate::state::State;

const DEFAULT_MAX_WORKERS: usize = 4;
const DEFAULT_MAX_SUPERSTEPS: u32 = 100;
const DEFAULT_SUPERSTEP_TIMEOUT: Duration = Duration::from_secs(300);

type NodeTaskOutcome<T> = (String, State<T>, Result<State<T>, GraphError>);

/// Bulk-synchronous scheduler. Configured with a builder-style `with_*`
/// chain, then driven to completion with `execute`.
pub struct GraphExecutor<T> {
    graph: Arc<Graph<T>>,
    initial_state: State<T>,
    max_workers: usize,
    retry_policy: RetryPolicy,
    checkpoint_store: Option<Arc<dyn CheckpointStore<T>>>,
    checkpoint_every: u64,
}

impl<T> GraphExecutor<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(graph: Graph<T>, initial_state: State<T>) -> Self {
        info!(
            event = "init",
            max_workers = DEFAULT_MAX_WORKERS,
            "graph=executor"
        );
        Self {
            graph: Arc::new(graph),
            initial_state,
            max_workers: DEFAULT_MAX_WORKERS,
            retry_policy: RetryPolicy::default(),
            checkpoint_store: None,
            checkpoint_every: 1,
        }
    }

    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_checkpoint_store(mut self, store: Arc<dyn CheckpointStore<T>>) -> Self {
        self.checkpoint_store = Some(store);
        self
    }

    /// Save a checkpoint every `n` supersteps rather than every one. `n = 1`
    /// (the default) checkpoints after every superstep.
    pub fn with_checkpoint_every(mut self, n: u64) -> Self {
        self.checkpoint_every = n.max(1);
        self
    }

    /// Runs the graph to completion (the pending map drains) or until
    /// `max_supersteps` is reached. Each node visited within a superstep is
    /// bounded by `per_superstep_timeout`; a timeout is fatal and is never
    /// subject to fallback.
    ///
    /// Runs `execute` with the documented defaults: `max_supersteps = 100`,
    /// `per_superstep_timeout = 300s`.
    pub async fn execute_default(&self) -> Result<Option<State<T>>, GraphError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.execute(DEFAULT_MAX_SUPERSTEPS, DEFAULT_SUPERSTEP_TIMEOUT)
            .await
    }

    pub async fn execute(
        &self,
        max_supersteps: u32,
        per_superstep_timeout: Duration,
    ) -> Result<Option<State<T>>, GraphError>
    where
        T: Serialize + DeserializeOwned,
    {
        info!(event = "execution_started", "graph=executor");
        let mut superstep: u32 = 0;
        let mut final_state: Option<State<T>> = None;

        let mut active_states: PendingMap<T> = if let Some(store) = &self.checkpoint_store {
            match store.load_checkpoint().await? {
                Some((step, pending)) => {
                    info!(event = "resumed_from_checkpoint", step, "graph=executor");
                    superstep = step as u32;
                    pending
                }
                None => seed(&self.initial_state),
            }
        } else {
            seed(&self.initial_state)
        };

        while !active_states.is_empty() && superstep < max_supersteps {
            info!(
                event = "superstep_start",
                superstep,
                nodes = ?active_states.keys().collect::<Vec<_>>(),
                "graph=executor"
            );

            let mut next_active_states: PendingMap<T> = HashMap::new();
            let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_workers));
            let mut tasks: JoinSet<NodeTaskOutcome<T>> = JoinSet::new();

            for (node_id, states) in active_states.drain() {
                let node = self
                    .graph
                    .node(&node_id)
                    .expect("active node id always present in graph");
                let is_aggregator = node.is_aggregator();
                let original_input = if is_aggregator {
                    State::default()
                } else {
                    states[0].clone()
                };
                let graph = self.graph.clone();
                let retry_policy = node.retry_policy.unwrap_or(self.retry_policy);
                let semaphore = semaphore.clone();
                let states_for_task = states.clone();
                let original_input_clone = original_input.clone();

                tasks.spawn(async move {
                    let result = tokio::time::timeout(
                        per_superstep_timeout,
                        execute_with_retry(
                            graph.clone(),
                            &node_id,
                            is_aggregator,
                            states_for_task,
                            retry_policy,
                            &semaphore,
                        ),
                    )
                    .await;
                    let result = match result {
                        Ok(r) => r,
                        Err(_) => Err(GraphError::Timeout(node_id.clone())),
                    };
                    (node_id, original_input_clone, result)
                });
            }

            let mut fatal: Option<GraphError> = None;
            let mut completed: HashMap<String, State<T>> = HashMap::new();
            while let Some(joined) = tasks.join_next().await {
                let (node_id, original_input, result) =
                    joined.expect("executor task panicked");

                if fatal.is_some() {
                    continue;
                }

                let node = self.graph.node(&node_id).expect("node present");
                let result_state = match result {
                    Ok(s) => {
                        info!(event = "node_complete", node_id = %node_id, superstep, "graph=executor");
                        s
                    }
                    Err(GraphError::Timeout(_)) => {
                        error!(event = "node_timeout", node_id = %node_id, superstep, "graph=executor");
                        fatal = Some(GraphError::Timeout(node_id.clone()));
                        tasks.abort_all();
                        break;
                    }
                    Err(e) => match &node.fallback_id {
                        Some(fallback_id) => {
                            warn!(
                                event = "fallback_invoked",
                                from = %node_id,
                                to = %fallback_id,
                                reason = %e,
                                "graph=executor"
                            );
                            let fallback_node = self
                                .graph
                                .node(fallback_id)
                                .expect("fallback id validated at build time");
                            let fallback_retry = fallback_node.retry_policy.unwrap_or(self.retry_policy);
                            let semaphore = tokio::sync::Semaphore::new(self.max_workers);
                            let outcome = tokio::time::timeout(
                                per_superstep_timeout,
                                execute_with_retry(
                                    self.graph.clone(),
                                    fallback_id,
                                    false,
                                    vec![original_input],
                                    fallback_retry,
                                    &semaphore,
                                ),
                            )
                            .await;
                            match outcome {
                                Ok(Ok(s)) => {
                                    info!(event = "fallback_success", node_id = %fallback_id, "graph=executor");
                                    s
                                }
                                Ok(Err(fallback_error)) => {
                                    error!(event = "fallback_failed", node_id = %fallback_id, reason = %fallback_error, "graph=executor");
                                    fatal = Some(GraphError::FallbackFailed {
                                        fallback_id: fallback_id.clone(),
                                        cause: fallback_error.to_string(),
                                    });
                                    tasks.abort_all();
                                    break;
                                }
                                Err(_) => {
                                    error!(event = "fallback_timeout", node_id = %fallback_id, "graph=executor");
                                    fatal = Some(GraphError::Timeout(fallback_id.clone()));
                                    tasks.abort_all();
                                    break;
                                }
                            }
                        }
                        None => {
                            error!(event = "node_failed", node_id = %node_id, reason = %e, "graph=executor");
                            fatal = Some(GraphError::NodeExecutionFailed {
                                node_id: node_id.clone(),
                                cause: e.to_string(),
                            });
                            tasks.abort_all();
                            break;
                        }
                    },
                };

                if node_id == END {
                    final_state = Some(result_state.clone());
                }
                completed.insert(node_id, result_state);
            }

            if fatal.is_none() {
                // Route in the graph's edge-registration order rather than
                // task-completion order, so a sink fed by multiple producers
                // (e.g. an aggregator) always sees the same input ordering
                // regardless of which producer happens to finish first.
                for edge in self.graph.edges.iter() {
                    let Some(result_state) = completed.get(edge.source()) else {
                        continue;
                    };
                    match edge {
                        Edge::Concrete { sink, .. } => {
                            next_active_states
                                .entry(sink.clone())
                                .or_default()
                                .push(result_state.clone());
                        }
                        Edge::Conditional { .. } => match edge.resolve(result_state).await {
                            Ok(sinks) => {
                                for sink in sinks {
                                    next_active_states
                                        .entry(sink)
                                        .or_default()
                                        .push(result_state.clone());
                                }
                            }
                            Err(e) => {
                                fatal = Some(e);
                                tasks.abort_all();
                                break;
                            }
                        },
                    }
                }
            }

            if let Some(err) = fatal {
                return Err(err);
            }

            superstep += 1;
            if let Some(store) = &self.checkpoint_store {
                if (superstep as u64).is_multiple_of(self.checkpoint_every) {
                    store.save_checkpoint(superstep as u64, &next_active_states).await?;
                }
            }
            active_states = next_active_states;
        }

        if superstep >= max_supersteps && !active_states.is_empty() {
            error!(event = "max_supersteps_reached", "graph=executor");
            return Err(GraphError::MaxSupersteps);
        }

        info!(event = "execution_complete", "graph=executor");
        Ok(final_state)
    }
}

fn seed<T: Clone>(initial_state: &State<T>) -> PendingMap<T> {
    let mut map = HashMap::new();
    map.insert(START.to_string(), vec![initial_state.clone()]);
    map
}

/// Retries a single node invocation up to `policy.max_retries` times,
/// sleeping `policy.delay_for_attempt` between attempts. Each attempt holds
/// a semaphore permit only while `node.execute`/`execute_many` is running.
async fn execute_with_retry<T>(
    graph: Arc<Graph<T>>,
    node_id: &str,
    is_aggregator: bool,
    states: Vec<State<T>>,
    policy: RetryPolicy,
    semaphore: &tokio::sync::Semaphore,
) -> Result<State<T>, GraphError>
where
    T: Clone + Send + Sync + 'static + Serialize + DeserializeOwned,
{
    let mut attempt = 0;
    loop {
        let _permit = semaphore
            .acquire()
            .await
            .expect("executor semaphore is never closed");
        info!(event = "node_attempt", node_id, attempt, "graph=executor");
        let node = graph.node(node_id).expect("node present");
        let outcome = if is_aggregator {
            node.execute_many(states.clone()).await
        } else {
            node.execute(states[0].clone()).await
        };
        drop(_permit);

        match outcome {
            Ok(s) => return Ok(s),
            Err(e) => {
                if attempt == policy.max_retries {
                    return Err(e);
                }
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    event = "node_retry",
                    node_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    reason = %e,
                    "graph=executor"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
