//! Runs a linear graph with a `JsonCheckpointStore` attached, then shows the
//! checkpoint file left behind after a successful run.

use std::sync::Arc;

use graphorchestrator::{
    node_action, GraphBuilder, GraphExecutor, JsonCheckpointStore, Node, State,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut builder: GraphBuilder<i64> = GraphBuilder::new();
    builder
        .add_node(
            Node::processing(
                "increment",
                node_action(|mut s| async move {
                    let next = s.last().copied().unwrap_or(0) + 1;
                    s.push(next);
                    Ok(s)
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_concrete_edge("start", "increment")
        .unwrap()
        .add_concrete_edge("increment", "end")
        .unwrap();
    let graph = builder.build().unwrap();

    let path = std::env::temp_dir().join("graphorchestrator-demo-checkpoint.json");
    let store = Arc::new(JsonCheckpointStore::new(&path));

    let executor = GraphExecutor::new(graph, State::new(vec![1])).with_checkpoint_store(store);
    let out = executor.execute_default().await.unwrap();
    println!("{:?}", out.unwrap().messages);
    println!("checkpoint written to {}", path.display());
}
