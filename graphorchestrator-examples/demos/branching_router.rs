//! A node that loops on itself via a conditional edge, counting up until
//! the running total is a multiple of 10.

use graphorchestrator::{node_action, routing_function, GraphBuilder, GraphExecutor, Node, State};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut builder: GraphBuilder<i64> = GraphBuilder::new();
    builder
        .add_node(
            Node::processing(
                "count",
                node_action(|mut s| async move {
                    let next = s.last().copied().unwrap_or(0) + 1;
                    s.push(next);
                    Ok(s)
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_concrete_edge("start", "count")
        .unwrap()
        .add_conditional_edge(
            "count",
            vec!["count", "end"],
            routing_function(|s| async move {
                if s.last().copied().unwrap_or(0) % 10 == 0 {
                    Ok("end".to_string())
                } else {
                    Ok("count".to_string())
                }
            }),
        )
        .unwrap();
    let graph = builder.build().unwrap();

    let executor = GraphExecutor::new(graph, State::new(vec![1]));
    let out = executor.execute_default().await.unwrap();
    println!("{:?}", out.unwrap().messages);
}
