//! AI node: a Processing node whose action wraps a model, built lazily.
//!
//! On first invocation, `build_model` runs exactly once (idempotent via
//! `tokio::sync::OnceCell`) before the wrapped action runs.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::action::NodeAction;
use crate::error::GraphError;
use crate::state::State;

type BuildModelFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), GraphError>> + Send + Sync>;

/// AI node body: lazily built model + a tagged node action that uses it.
#[derive(Clone)]
pub struct AiNode<T> {
    pub(crate) description: String,
    pub(crate) build_model: BuildModelFn,
    pub(crate) built: Arc<OnceCell<()>>,
    pub(crate) action: NodeAction<T>,
}

impl<T: Send + Sync + 'static> AiNode<T> {
    pub fn new<B, BFut, F, FFut>(description: impl Into<String>, build_model: B, action: F) -> Self
    where
        B: Fn() -> BFut + Send + Sync + 'static,
        BFut: Future<Output = Result<(), GraphError>> + Send + 'static,
        F: Fn(State<T>) -> FFut + Send + Sync + 'static,
        FFut: Future<Output = Result<State<T>, GraphError>> + Send + 'static,
    {
        Self {
            description: description.into(),
            build_model: Arc::new(move || Box::pin(build_model())),
            built: Arc::new(OnceCell::new()),
            action: crate::action::node_action(action),
        }
    }

    pub async fn execute(&self, state: State<T>) -> Result<State<T>, GraphError> {
        let build_model = self.build_model.clone();
        self.built
            .get_or_try_init(move || {
                let build_model = build_model.clone();
                async move { (build_model)().await }
            })
            .await?;
        self.action.call(state).await
    }
}

impl<T> std::fmt::Debug for AiNode<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiNode")
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn build_model_runs_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let node: AiNode<i32> = AiNode::new(
            "mock model",
            move || {
                let calls = calls2.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            |s| async move { Ok(s) },
        );

        node.execute(State::new(vec![1])).await.unwrap();
        node.execute(State::new(vec![2])).await.unwrap();
        node.execute(State::new(vec![3])).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
