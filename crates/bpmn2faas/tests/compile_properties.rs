//! Property tests for lane compilation over generated processes.
//!
//! Processes are chains of tasks and service calls with optional
//! exclusive diamonds, so the expected path is known up front.

use indexmap::IndexSet;
use proptest::prelude::*;

use bpmn2faas::{
    compile::{client_for, compile_lane},
    descriptor::FunctionDescriptor,
    endpoint::EndpointMap,
    identifier::Id,
    model::{Flow, Lane, Node, NodeKind, ProcessGraph, ProcessGraphBuilder, ServiceCategory, TriggerKind},
    operation::{Operation, OperationKind},
};

const MODULES: &[&str] = &["billing", "audit", "notify", "refunds"];
const SERVICES: &[&str] = &["object_storage", "queue", "fifo_queue", "pubsub", "dynamodb"];

#[derive(Debug, Clone)]
enum Simple {
    Task(usize),
    Service(usize),
}

#[derive(Debug, Clone)]
enum Step {
    Simple(Simple),
    Diamond(Vec<Simple>, Vec<Simple>),
}

fn simple() -> impl Strategy<Value = Simple> {
    prop_oneof![
        (0..MODULES.len()).prop_map(Simple::Task),
        (0..SERVICES.len()).prop_map(Simple::Service),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => simple().prop_map(Step::Simple),
        1 => (
            prop::collection::vec(simple(), 0..3),
            prop::collection::vec(simple(), 0..3)
        )
            .prop_map(|(left, right)| Step::Diamond(left, right)),
    ]
}

fn trigger() -> impl Strategy<Value = TriggerKind> {
    prop_oneof![
        Just(TriggerKind::Http),
        Just(TriggerKind::Queue),
        Just(TriggerKind::PubSub),
        Just(TriggerKind::Storage),
        Just(TriggerKind::Schedule),
    ]
}

/// A generated process together with what compiling it must produce.
struct Generated {
    graph: ProcessGraph,
    lane: Lane,
    path: Vec<String>,
    modules: IndexSet<String>,
    services: IndexSet<String>,
}

struct Generator {
    builder: ProcessGraphBuilder,
    ids: Vec<Id>,
    nodes: usize,
    flows: usize,
    modules: IndexSet<String>,
    categories: IndexSet<ServiceCategory>,
}

impl Generator {
    fn add(&mut self, prefix: &str, kind: NodeKind) -> Id {
        self.nodes += 1;
        let id = Id::new(&format!("{prefix}_{}", self.nodes));
        self.builder.add_node(Node::new(id, kind));
        self.ids.push(id);
        id
    }

    fn link(&mut self, source: Id, target: Id) {
        self.flows += 1;
        let id = Id::new(&format!("flow_{}", self.flows));
        self.builder.add_flow(Flow::new(id, source, target));
    }

    fn simple(&mut self, simple: &Simple) -> Id {
        match simple {
            Simple::Task(index) => {
                self.modules.insert(MODULES[*index].to_string());
                self.add(
                    "task",
                    NodeKind::Task {
                        module: MODULES[*index].to_string(),
                    },
                )
            }
            Simple::Service(index) => {
                let category = ServiceCategory::from(SERVICES[*index]);
                self.categories.insert(category.clone());
                self.add("service", NodeKind::ServiceTask { service: category })
            }
        }
    }

    fn generate(trigger: TriggerKind, steps: &[Step]) -> Generated {
        let mut generator = Generator {
            builder: ProcessGraph::builder(),
            ids: Vec::new(),
            nodes: 0,
            flows: 0,
            modules: IndexSet::new(),
            categories: IndexSet::new(),
        };
        let mut path = Vec::new();

        let mut tail = generator.add("start", NodeKind::StartEvent { trigger });
        for step in steps {
            match step {
                Step::Simple(simple) => {
                    let id = generator.simple(simple);
                    generator.link(tail, id);
                    path.push(id.to_string());
                    tail = id;
                }
                Step::Diamond(left, right) => {
                    let split = generator.add("split", NodeKind::ExclusiveGateway { default_flow: None });
                    generator.link(tail, split);
                    path.push(split.to_string());

                    let mut ends = Vec::new();
                    for branch in [left, right] {
                        let mut branch_tail = split;
                        for simple in branch {
                            let id = generator.simple(simple);
                            generator.link(branch_tail, id);
                            branch_tail = id;
                        }
                        ends.push(branch_tail);
                    }

                    let join = generator.add("join", NodeKind::ExclusiveGateway { default_flow: None });
                    for end in ends {
                        generator.link(end, join);
                    }
                    tail = join;
                }
            }
        }
        let end = generator.add("end", NodeKind::EndEvent);
        generator.link(tail, end);
        path.push(end.to_string());

        let services = generator
            .categories
            .iter()
            .map(|category| client_for(category).to_string())
            .collect();

        Generated {
            graph: generator.builder.build().expect("generated graph is valid"),
            lane: Lane::new(Id::new("lane"), None, generator.ids),
            path,
            modules: generator.modules,
            services,
        }
    }
}

fn compile(generated: &Generated) -> FunctionDescriptor {
    compile_lane(&generated.lane, &generated.graph, &EndpointMap::new()).expect("generated lane compiles")
}

fn all_operations(operations: &[Operation]) -> Vec<&Operation> {
    let mut all = Vec::new();
    for operation in operations {
        all.push(operation);
        if let OperationKind::Gateway(gateway) = operation.kind() {
            for branch in gateway.branches() {
                all.extend(all_operations(branch.operations()));
            }
        }
    }
    all
}

proptest! {
    #[test]
    fn prop_compilation_is_deterministic(trigger in trigger(), steps in prop::collection::vec(step(), 0..8)) {
        let generated = Generator::generate(trigger, &steps);
        prop_assert_eq!(compile(&generated), compile(&generated));
    }

    #[test]
    fn prop_operations_follow_the_path(trigger in trigger(), steps in prop::collection::vec(step(), 0..8)) {
        let generated = Generator::generate(trigger, &steps);
        let function = compile(&generated);

        let path: Vec<String> = function.operations().iter().map(|op| op.id().to_string()).collect();
        prop_assert_eq!(path, generated.path);
    }

    #[test]
    fn prop_modules_and_services_are_distinct(trigger in trigger(), steps in prop::collection::vec(step(), 0..8)) {
        let generated = Generator::generate(trigger, &steps);
        let function = compile(&generated);

        // IndexSet equality ignores order, so compare as sequences.
        let modules: Vec<&String> = function.modules().iter().collect();
        let services: Vec<&String> = function.services().iter().collect();
        prop_assert_eq!(modules, generated.modules.iter().collect::<Vec<_>>());
        prop_assert_eq!(services, generated.services.iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_indentation_tracks_batch_trigger(trigger in trigger(), steps in prop::collection::vec(step(), 0..8)) {
        let generated = Generator::generate(trigger, &steps);
        let function = compile(&generated);

        prop_assert_eq!(function.is_batch(), trigger.is_batch());
        let expected = u32::from(trigger.is_batch());
        for operation in all_operations(function.operations()) {
            prop_assert_eq!(operation.indentation(), expected, "operation {}", operation);
        }
    }

    #[test]
    fn prop_every_lane_operation_is_placed_once(trigger in trigger(), steps in prop::collection::vec(step(), 0..8)) {
        let generated = Generator::generate(trigger, &steps);
        let function = compile(&generated);

        let placed: Vec<Id> = all_operations(function.operations()).iter().map(|op| op.id()).collect();
        let distinct: IndexSet<Id> = placed.iter().copied().collect();
        prop_assert_eq!(placed.len(), distinct.len());

        // Everything except the start event and joins is placed.
        let expected = generated
            .lane
            .element_ids()
            .iter()
            .filter(|id| !id.to_string().starts_with("start_") && !id.to_string().starts_with("join_"))
            .count();
        prop_assert_eq!(placed.len(), expected);
    }
}
