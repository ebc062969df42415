//! Example: Compiling a lane built from the process model
//!
//! This example builds a process graph in code, without parsing XML, then
//! compiles and renders its lane.

use bpmn2faas::{
    FunctionBuilder,
    endpoint::EndpointMap,
    identifier::Id,
    model::{Definitions, Flow, Lane, Node, NodeKind, Process, ProcessGraph, ServiceCategory, TriggerKind},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building process from the model...\n");

    // Node identifiers (Id is Copy, so we can reuse them)
    let start = Id::new("upload_received");
    let check = Id::new("is_image");
    let resize = Id::new("resize");
    let merge = Id::new("merge");
    let store = Id::new("store");
    let done = Id::new("done");

    // A storage trigger, an if/else on the uploaded object, then a write
    let graph = ProcessGraph::builder()
        .node(Node::new(start, NodeKind::StartEvent { trigger: TriggerKind::Storage }).with_name("Upload received"))
        .node(Node::new(check, NodeKind::ExclusiveGateway { default_flow: None }))
        .node(
            Node::new(resize, NodeKind::Task { module: "images.resize".to_string() })
                .with_name("Resize image"),
        )
        .node(Node::new(merge, NodeKind::ExclusiveGateway { default_flow: None }))
        .node(Node::new(store, NodeKind::ServiceTask { service: ServiceCategory::ObjectStorage }))
        .node(Node::new(done, NodeKind::EndEvent))
        .flow(Flow::new(Id::new("f1"), start, check))
        .flow(
            Flow::new(Id::new("f2"), check, resize)
                .with_name("image")
                .with_condition("payload['key'].endswith('.png')"),
        )
        .flow(Flow::new(Id::new("f3"), check, merge))
        .flow(Flow::new(Id::new("f4"), resize, merge))
        .flow(Flow::new(Id::new("f5"), merge, store))
        .flow(Flow::new(Id::new("f6"), store, done))
        .build()?;

    let lane = Lane::new(
        Id::new("thumbnails"),
        Some("Thumbnails".to_string()),
        vec![start, check, resize, merge, store, done],
    );
    let definitions = Definitions::new(vec![Process::new(Id::new("uploads"), graph, vec![lane])]);

    // Deployment references for service calls
    let mut endpoints = EndpointMap::new();
    endpoints.insert(store, "thumbnails-bucket");

    // Compile and render
    let builder = FunctionBuilder::default();
    let functions = builder.compile(&definitions, &endpoints)?;

    for function in &functions {
        println!("Compiled lane `{}`:", function.name());
        println!("  Batch: {}", function.is_batch());
        println!("  Operations: {}", function.operations().len());
        println!("  Modules: {:?}", function.modules());
        println!("  Clients: {:?}", function.services());
        println!();

        let code = builder.render(function)?;

        let output_path = "from_model_output.py";
        std::fs::write(output_path, &code)?;
        println!("Function written to: {}", output_path);
    }

    Ok(())
}
