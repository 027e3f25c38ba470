//! Role-tagged action wrappers.
//!
//! The source system marks actions and routing functions with decorators
//! (`@node_action`, `@aggregator_action`, `@tool_method`, `@routing_function`)
//! and rejects anything undecorated at graph-build time. Rust's type system
//! already enforces the *signature* of each role at compile time, but the
//! source's "was this actually registered the right way" check is preserved
//! here as a small tag carried alongside the closure: the public smart
//! constructors (`node_action`, `aggregator_action`, `tool_method`,
//! `routing_function`) always set it, and a `#[doc(hidden)]` "raw"
//! constructor is the deliberate escape hatch for actions wired in
//! dynamically (e.g. from a registry) rather than written inline — building
//! one that way is what makes `ActionNotDecorated` / `RouterNotDecorated`
//! reachable.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::GraphError;
use crate::state::State;

type SingleFn<T> =
    Arc<dyn Fn(State<T>) -> BoxFuture<'static, Result<State<T>, GraphError>> + Send + Sync>;
type MultiFn<T> =
    Arc<dyn Fn(Vec<State<T>>) -> BoxFuture<'static, Result<State<T>, GraphError>> + Send + Sync>;
type RouterFn<T> =
    Arc<dyn Fn(State<T>) -> BoxFuture<'static, Result<String, GraphError>> + Send + Sync>;

/// A `state -> state` action tagged as a node action (Processing, Tool, AI,
/// HumanInTheLoop, ToolSet all wrap one of these).
#[derive(Clone)]
pub struct NodeAction<T> {
    pub(crate) f: SingleFn<T>,
    pub(crate) tagged: bool,
}

impl<T: Send + Sync + 'static> NodeAction<T> {
    #[doc(hidden)]
    pub fn untagged<F, Fut>(f: F) -> Self
    where
        F: Fn(State<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<State<T>, GraphError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |s| Box::pin(f(s))),
            tagged: false,
        }
    }

    pub async fn call(&self, state: State<T>) -> Result<State<T>, GraphError> {
        (self.f)(state).await
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }
}

/// Builds a tagged `NodeAction`. Use for Processing, AI, HumanInTheLoop, and
/// ToolSet nodes.
pub fn node_action<T, F, Fut>(f: F) -> NodeAction<T>
where
    T: Send + Sync + 'static,
    F: Fn(State<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<State<T>, GraphError>> + Send + 'static,
{
    let mut a = NodeAction::untagged(f);
    a.tagged = true;
    a
}

/// Builds a tagged `NodeAction` for use in a `Tool` node. Distinct name from
/// `node_action` purely to mirror the source's separate `@tool_method`
/// decorator; the wrapper shape is identical.
pub fn tool_method<T, F, Fut>(f: F) -> NodeAction<T>
where
    T: Send + Sync + 'static,
    F: Fn(State<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<State<T>, GraphError>> + Send + 'static,
{
    node_action(f)
}

/// `[state, ...] -> state` action tagged as an aggregator action.
#[derive(Clone)]
pub struct AggregatorAction<T> {
    pub(crate) f: MultiFn<T>,
    pub(crate) tagged: bool,
}

impl<T: Send + Sync + 'static> AggregatorAction<T> {
    #[doc(hidden)]
    pub fn untagged<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<State<T>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<State<T>, GraphError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |s| Box::pin(f(s))),
            tagged: false,
        }
    }

    pub async fn call(&self, states: Vec<State<T>>) -> Result<State<T>, GraphError> {
        (self.f)(states).await
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }
}

pub fn aggregator_action<T, F, Fut>(f: F) -> AggregatorAction<T>
where
    T: Send + Sync + 'static,
    F: Fn(Vec<State<T>>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<State<T>, GraphError>> + Send + 'static,
{
    let mut a = AggregatorAction::untagged(f);
    a.tagged = true;
    a
}

/// `state -> string` function tagged as a routing function.
#[derive(Clone)]
pub struct RoutingFn<T> {
    pub(crate) f: RouterFn<T>,
    pub(crate) tagged: bool,
}

impl<T: Send + Sync + 'static> RoutingFn<T> {
    #[doc(hidden)]
    pub fn untagged<F, Fut>(f: F) -> Self
    where
        F: Fn(State<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, GraphError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |s| Box::pin(f(s))),
            tagged: false,
        }
    }

    pub async fn call(&self, state: State<T>) -> Result<String, GraphError> {
        (self.f)(state).await
    }

    pub fn is_tagged(&self) -> bool {
        self.tagged
    }
}

pub fn routing_function<T, F, Fut>(f: F) -> RoutingFn<T>
where
    T: Send + Sync + 'static,
    F: Fn(State<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, GraphError>> + Send + 'static,
{
    let mut r = RoutingFn::untagged(f);
    r.tagged = true;
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tagged_node_action_is_tagged_and_callable() {
        let a: NodeAction<i32> = node_action(|s| async move { Ok(s) });
        assert!(a.is_tagged());
        let out = a.call(State::new(vec![1])).await.unwrap();
        assert_eq!(out.messages, vec![1]);
    }

    #[tokio::test]
    async fn untagged_node_action_is_not_tagged() {
        let a: NodeAction<i32> = NodeAction::untagged(|s| async move { Ok(s) });
        assert!(!a.is_tagged());
    }
}
