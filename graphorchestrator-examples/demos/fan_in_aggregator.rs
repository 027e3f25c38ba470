//! `start` fans out to two branches concretely; an aggregator sums their
//! outputs before routing to `end`.

use graphorchestrator::{aggregator_action, node_action, GraphBuilder, GraphExecutor, Node, State};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut builder: GraphBuilder<i64> = GraphBuilder::new();
    builder
        .add_node(
            Node::processing(
                "double",
                node_action(|mut s| async move {
                    let v = s.last().copied().unwrap_or(0) * 2;
                    s.push(v);
                    Ok(s)
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_node(
            Node::processing(
                "triple",
                node_action(|mut s| async move {
                    let v = s.last().copied().unwrap_or(0) * 3;
                    s.push(v);
                    Ok(s)
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_aggregator(
            Node::aggregator(
                "sum",
                aggregator_action(|states| async move {
                    let total: i64 = states.iter().filter_map(|s| s.last().copied()).sum();
                    let mut out = states[0].clone();
                    out.push(total);
                    Ok(out)
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_concrete_edge("start", "double")
        .unwrap()
        .add_concrete_edge("start", "triple")
        .unwrap()
        .add_concrete_edge("double", "sum")
        .unwrap()
        .add_concrete_edge("triple", "sum")
        .unwrap()
        .add_concrete_edge("sum", "end")
        .unwrap();
    let graph = builder.build().unwrap();

    let executor = GraphExecutor::new(graph, State::new(vec![5]));
    let out = executor.execute_default().await.unwrap();
    println!("{:?}", out.unwrap().messages);
}
