//! Edges: the two ways a superstep can route a state from one node to the
//! next one (or several).

use crate::action::RoutingFn;
use crate::error::GraphError;
use crate::state::State;

/// An edge leaving a source node. `Concrete` always fires; `Conditional`
/// asks its routing function for the sink id and validates the answer
/// against `candidates`.
pub enum Edge<T> {
    Concrete {
        source: String,
        sink: String,
    },
    Conditional {
        source: String,
        candidates: Vec<String>,
        router: RoutingFn<T>,
    },
}

impl<T> Edge<T> {
    pub fn source(&self) -> &str {
        match self {
            Edge::Concrete { source, .. } => source,
            Edge::Conditional { source, .. } => source,
        }
    }
}

impl<T: Send + Sync + 'static> Edge<T> {
    /// Resolves the sink(s) this edge routes `state` to. A Concrete edge has
    /// exactly one sink; a Conditional edge calls its router and checks the
    /// result against its declared candidates.
    pub async fn resolve(&self, state: &State<T>) -> Result<Vec<String>, GraphError>
    where
        T: Clone,
    {
        match self {
            Edge::Concrete { sink, .. } => Ok(vec![sink.clone()]),
            Edge::Conditional {
                source,
                candidates,
                router,
            } => {
                let sink = router.call(state.clone()).await?;
                if !candidates.contains(&sink) {
                    return Err(GraphError::InvalidRoutingOutput {
                        node_id: source.clone(),
                        sink,
                    });
                }
                Ok(vec![sink])
            }
        }
    }
}
