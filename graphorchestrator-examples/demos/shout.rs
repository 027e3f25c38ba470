//! Linear graph: one node that appends "!" to the last message.

use graphorchestrator::{node_action, GraphBuilder, GraphExecutor, Node, State};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut builder: GraphBuilder<String> = GraphBuilder::new();
    builder
        .add_node(
            Node::processing(
                "shout",
                node_action(|mut s: State<String>| async move {
                    if let Some(last) = s.messages.last_mut() {
                        last.push('!');
                    }
                    Ok(s)
                }),
            )
            .unwrap(),
        )
        .unwrap()
        .add_concrete_edge("start", "shout")
        .unwrap()
        .add_concrete_edge("shout", "end")
        .unwrap();
    let graph = builder.build().unwrap();

    let initial = State::new(vec!["hello".to_string()]);
    let executor = GraphExecutor::new(graph, initial);
    let out = executor.execute_default().await.unwrap();
    println!("{:?}", out.unwrap().messages);
}
