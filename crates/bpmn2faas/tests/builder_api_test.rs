//! Integration tests for the FunctionBuilder API
//!
//! These tests drive the public API from XML to rendered source.

use bpmn2faas::{
    Bpmn2FaasError, FunctionBuilder,
    compile::CompileError,
    config::{AppConfig, EmitConfig},
    emit::{Emitter, JsonEmitter},
    endpoint::EndpointMap,
    identifier::Id,
};

const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn2:definitions xmlns:bpmn2="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:bpmn2faas="http://bpmn2faas">
  <bpmn2:process id="Orders">
    <bpmn2:laneSet id="LaneSet_1">
      <bpmn2:lane id="Lane_Api" name="Order API">
        <bpmn2:flowNodeRef>ApiStart</bpmn2:flowNodeRef>
        <bpmn2:flowNodeRef>Validate</bpmn2:flowNodeRef>
        <bpmn2:flowNodeRef>Enqueue</bpmn2:flowNodeRef>
        <bpmn2:flowNodeRef>ApiEnd</bpmn2:flowNodeRef>
      </bpmn2:lane>
      <bpmn2:lane id="Lane_Worker" name="Order Worker">
        <bpmn2:flowNodeRef>WorkerStart</bpmn2:flowNodeRef>
        <bpmn2:flowNodeRef>Archive</bpmn2:flowNodeRef>
        <bpmn2:flowNodeRef>WorkerEnd</bpmn2:flowNodeRef>
      </bpmn2:lane>
    </bpmn2:laneSet>
    <bpmn2:startEvent id="ApiStart" bpmn2faas:trigger="http"/>
    <bpmn2:task id="Validate" name="Validate order" bpmn2faas:module="orders.validate"/>
    <bpmn2:serviceTask id="Enqueue" bpmn2faas:service="queue"/>
    <bpmn2:endEvent id="ApiEnd"/>
    <bpmn2:startEvent id="WorkerStart" bpmn2faas:trigger="queue"/>
    <bpmn2:serviceTask id="Archive" bpmn2faas:service="object_storage"/>
    <bpmn2:endEvent id="WorkerEnd"/>
    <bpmn2:sequenceFlow id="f1" sourceRef="ApiStart" targetRef="Validate"/>
    <bpmn2:sequenceFlow id="f2" sourceRef="Validate" targetRef="Enqueue"/>
    <bpmn2:sequenceFlow id="f3" sourceRef="Enqueue" targetRef="ApiEnd"/>
    <bpmn2:sequenceFlow id="f4" sourceRef="WorkerStart" targetRef="Archive"/>
    <bpmn2:sequenceFlow id="f5" sourceRef="Archive" targetRef="WorkerEnd"/>
  </bpmn2:process>
</bpmn2:definitions>"#;

fn endpoints() -> EndpointMap {
    [
        (Id::new("Enqueue"), "https://sqs.eu-west-1.amazonaws.com/1/orders"),
        (Id::new("Archive"), "orders-archive"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_builder_api_exists() {
    let _builder = FunctionBuilder::default();
}

#[test]
fn test_compile_every_lane() {
    let builder = FunctionBuilder::default();
    let definitions = builder.parse(ORDERS).expect("Failed to parse document");
    let functions = builder
        .compile(&definitions, &endpoints())
        .expect("Failed to compile lanes");

    let names: Vec<&str> = functions.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["Order API", "Order Worker"]);

    let api = &functions[0];
    assert!(!api.is_batch());
    assert_eq!(api.modules().iter().collect::<Vec<_>>(), vec!["orders.validate"]);
    assert_eq!(api.services().iter().collect::<Vec<_>>(), vec!["sqs"]);

    let worker = &functions[1];
    assert!(worker.is_batch());
    assert_eq!(worker.services().iter().collect::<Vec<_>>(), vec!["s3"]);
    assert!(worker.operations().iter().all(|op| op.indentation() == 1));
}

#[test]
fn test_render_compiled_lane() {
    let builder = FunctionBuilder::default();
    let definitions = builder.parse(ORDERS).expect("Failed to parse document");
    let functions = builder.compile(&definitions, &endpoints()).unwrap();

    let code = builder.render(&functions[0]).expect("Failed to render");
    assert!(code.contains("def handler(event, context):"));
    assert!(code.contains("import orders.validate"));
    assert!(code.contains("sqs = boto3.client('sqs')"));
    assert!(code.contains("sqs.send_message(QueueUrl='https://sqs.eu-west-1.amazonaws.com/1/orders'"));
}

#[test]
fn test_json_emitter_through_public_api() {
    let builder = FunctionBuilder::default();
    let definitions = builder.parse(ORDERS).unwrap();
    let functions = builder.compile(&definitions, &EndpointMap::new()).unwrap();

    let json = JsonEmitter.emit(&functions[1]).expect("Failed to serialize");
    assert!(json.contains("\"name\": \"Order Worker\""));
    assert!(json.contains("\"kind\": \"service_call\""));
}

#[test]
fn test_parse_error_keeps_source() {
    let builder = FunctionBuilder::default();
    let source = "<definitions><process id=\"P\"></definitions>";

    match builder.parse(source) {
        Err(Bpmn2FaasError::Parse { err, src }) => {
            assert_eq!(src, source);
            assert!(!err.diagnostics().is_empty());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_compile_error_for_lane_without_start() {
    let source = ORDERS.replace(
        "<bpmn2:flowNodeRef>WorkerStart</bpmn2:flowNodeRef>",
        "",
    );

    let builder = FunctionBuilder::default();
    let definitions = builder.parse(&source).unwrap();
    let err = builder.compile(&definitions, &endpoints()).unwrap_err();

    assert!(matches!(
        err,
        Bpmn2FaasError::Compile(CompileError::MissingStartEvent { ref lane }) if lane == "Order Worker"
    ));
}

#[test]
fn test_missing_template_dir_is_emit_error() {
    let config = AppConfig::new(EmitConfig::new(
        Some("/nonexistent/bpmn2faas-templates".into()),
        "py",
    ));
    let builder = FunctionBuilder::new(config);

    let err = builder.emitter().unwrap_err();
    assert!(matches!(err, Bpmn2FaasError::Emit(_)));
}

#[test]
fn test_builder_reusability() {
    let builder = FunctionBuilder::default();

    let first = builder.parse(ORDERS).expect("Failed to parse first document");
    let second = builder
        .parse(&ORDERS.replace("orders.validate", "orders.check"))
        .expect("Failed to parse second document");

    let first = builder.compile(&first, &endpoints()).unwrap();
    let second = builder.compile(&second, &endpoints()).unwrap();

    assert_eq!(first[0].modules().iter().collect::<Vec<_>>(), vec!["orders.validate"]);
    assert_eq!(second[0].modules().iter().collect::<Vec<_>>(), vec!["orders.check"]);
}
