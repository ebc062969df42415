//! Service and module aggregation.

use indexmap::IndexSet;

use bpmn2faas_core::{
    model::ServiceCategory,
    operation::{Operation, OperationKind},
};

/// Returns the client module that talks to a service category.
///
/// Categories without a known client pass through under their own name, so
/// translating a client name again yields the same name.
///
/// ```
/// use bpmn2faas::compile::client_for;
/// use bpmn2faas::model::ServiceCategory;
///
/// assert_eq!(client_for(&ServiceCategory::FifoQueue), "sqs");
/// assert_eq!(client_for(&ServiceCategory::from("dynamodb")), "dynamodb");
/// ```
pub fn client_for(category: &ServiceCategory) -> &str {
    match category {
        ServiceCategory::ObjectStorage => "s3",
        ServiceCategory::Queue | ServiceCategory::FifoQueue => "sqs",
        ServiceCategory::PubSub => "sns",
        ServiceCategory::Other(name) => name,
    }
}

/// Translate categories to client names; categories sharing a client
/// collapse into its first occurrence.
pub(super) fn translate_services(categories: &IndexSet<ServiceCategory>) -> IndexSet<String> {
    categories
        .iter()
        .map(|category| client_for(category).to_string())
        .collect()
}

/// Task modules in path order, branch contents included where their
/// gateway appears.
pub(super) fn collect_modules(operations: &[Operation]) -> IndexSet<String> {
    let mut modules = IndexSet::new();
    visit_modules(operations, &mut modules);
    modules
}

fn visit_modules(operations: &[Operation], modules: &mut IndexSet<String>) {
    for operation in operations {
        match operation.kind() {
            OperationKind::Task(task) => {
                if !modules.contains(task.module()) {
                    modules.insert(task.module().to_string());
                }
            }
            OperationKind::Gateway(gateway) => {
                for branch in gateway.branches() {
                    visit_modules(branch.operations(), modules);
                }
            }
            OperationKind::StartEvent(_) | OperationKind::ServiceCall(_) | OperationKind::EndEvent => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use bpmn2faas_core::{
        identifier::Id,
        operation::{Branch, Gateway, Task},
    };
    use proptest::prelude::*;

    use super::*;

    fn task(id: &str, module: &str) -> Operation {
        Operation::new(Id::new(id), vec![], OperationKind::Task(Task::new(module)))
    }

    #[test]
    fn test_translate_collapses_shared_clients() {
        let categories: IndexSet<ServiceCategory> = [
            ServiceCategory::PubSub,
            ServiceCategory::Queue,
            ServiceCategory::ObjectStorage,
            ServiceCategory::FifoQueue,
            ServiceCategory::Other("dynamodb".to_string()),
        ]
        .into_iter()
        .collect();

        let clients: Vec<String> = translate_services(&categories).into_iter().collect();
        assert_eq!(clients, vec!["sns", "sqs", "s3", "dynamodb"]);
    }

    #[test]
    fn test_collect_modules_depth_first() {
        let mut gateway = Gateway::new(true, None);
        let mut yes = Branch::new(Id::new("f_yes"), Id::new("b"), Some("ok".to_string()), false);
        yes.push(task("b", "billing"));
        yes.push(task("c", "audit"));
        let mut no = Branch::new(Id::new("f_no"), Id::new("d"), None, false);
        no.push(task("d", "billing"));
        no.push(task("e", "refunds"));
        gateway.push_branch(yes);
        gateway.push_branch(no);

        let operations = vec![
            task("a", "audit"),
            Operation::new(Id::new("g"), vec![], OperationKind::Gateway(gateway)),
            task("f", "notify"),
        ];

        let modules: Vec<String> = collect_modules(&operations).into_iter().collect();
        assert_eq!(modules, vec!["audit", "billing", "refunds", "notify"]);
    }

    fn category() -> impl Strategy<Value = ServiceCategory> {
        prop_oneof![
            Just(ServiceCategory::ObjectStorage),
            Just(ServiceCategory::Queue),
            Just(ServiceCategory::FifoQueue),
            Just(ServiceCategory::PubSub),
            "[a-z][a-z0-9]{0,8}".prop_map(|name| ServiceCategory::from(name.as_str())),
        ]
    }

    proptest! {
        #[test]
        fn prop_translation_is_idempotent(category in category()) {
            let client = client_for(&category);
            let again = ServiceCategory::from(client);
            prop_assert_eq!(client_for(&again), client);
        }

        #[test]
        fn prop_translated_services_are_distinct(categories in prop::collection::vec(category(), 0..12)) {
            let set: IndexSet<ServiceCategory> = categories.into_iter().collect();
            let clients = translate_services(&set);
            let mut seen = std::collections::HashSet::new();
            prop_assert!(clients.iter().all(|client| seen.insert(client.clone())));
            prop_assert!(clients.len() <= set.len());
        }
    }
}
