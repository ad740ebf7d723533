//! Property tests for the mutation engine's standing invariants.
//!
//! Arbitrary operation sequences are replayed against a fresh store; after
//! every step the parent/subtask linkage must be bidirectional and free of
//! dangling references, and cascade deletes must remove exactly the
//! subtree they name.

use chrono::Utc;
use focal_core::store::{NewTask, Store};
use focal_core::verify::verify;
use proptest::prelude::*;

/// A compressed operation script: indices address the task list at
/// execution time modulo its length, so every script is executable.
#[derive(Debug, Clone)]
enum Op {
    CreateRoot(String),
    CreateChild { parent: usize, title: String },
    Complete(usize),
    Delete(usize),
    Move { task: usize, parent: usize },
    Archive,
    Undo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(Op::CreateRoot),
        (any::<usize>(), "[a-z]{1,8}")
            .prop_map(|(parent, title)| Op::CreateChild { parent, title }),
        any::<usize>().prop_map(Op::Complete),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), any::<usize>()).prop_map(|(task, parent)| Op::Move { task, parent }),
        Just(Op::Archive),
        Just(Op::Undo),
    ]
}

fn pick(store: &Store, index: usize) -> Option<focal_core::model::Id> {
    let tasks = store.tasks();
    if tasks.is_empty() {
        None
    } else {
        Some(tasks[index % tasks.len()].id)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn linkage_stays_bidirectional(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut store = Store::new();
        let now = Utc::now();

        for op in ops {
            match op {
                Op::CreateRoot(title) => {
                    store.create_task(NewTask::titled(title), now).expect("create root");
                }
                Op::CreateChild { parent, title } => {
                    if let Some(parent_id) = pick(&store, parent) {
                        store
                            .create_task(
                                NewTask { parent_task_id: Some(parent_id), ..NewTask::titled(title) },
                                now,
                            )
                            .expect("create child");
                    }
                }
                Op::Complete(index) => {
                    if let Some(id) = pick(&store, index) {
                        store.complete_task(id, now).expect("toggle");
                    }
                }
                Op::Delete(index) => {
                    if let Some(id) = pick(&store, index) {
                        let expected = store.subtree_order(id).len();
                        let before = store.tasks().len();
                        let removed = store.delete_task(id, now).expect("delete");
                        prop_assert_eq!(removed, expected);
                        prop_assert_eq!(store.tasks().len(), before - removed);
                    }
                }
                Op::Move { task, parent } => {
                    let (Some(task_id), Some(parent_id)) =
                        (pick(&store, task), pick(&store, parent))
                    else {
                        continue;
                    };
                    // Cycle rejections are expected; anything else must succeed.
                    match store.move_task(task_id, Some(parent_id), now) {
                        Ok(()) | Err(focal_core::CoreError::CycleDetected { .. }) => {}
                        Err(other) => prop_assert!(false, "unexpected move error: {other}"),
                    }
                }
                Op::Archive => {
                    let first = store.archive_completed_tasks(now);
                    let second = store.archive_completed_tasks(now);
                    prop_assert_eq!(second, 0, "archive must be idempotent (first={})", first);
                }
                Op::Undo => {
                    // Within the window this restores the last deletion;
                    // with nothing deleted it is a no-op.
                    let _ = store.undo_delete(now);
                }
            }

            let violations = verify(store.snapshot());
            prop_assert!(violations.is_empty(), "violations: {:?}", violations);
        }
    }

    #[test]
    fn export_import_round_trips(ops in prop::collection::vec(op_strategy(), 1..25)) {
        let mut store = Store::new();
        let now = Utc::now();
        for op in ops {
            match op {
                Op::CreateRoot(title) => {
                    store.create_task(NewTask::titled(title), now).expect("create");
                }
                Op::CreateChild { parent, title } => {
                    if let Some(parent_id) = pick(&store, parent) {
                        store
                            .create_task(
                                NewTask { parent_task_id: Some(parent_id), ..NewTask::titled(title) },
                                now,
                            )
                            .expect("create child");
                    }
                }
                Op::Complete(index) => {
                    if let Some(id) = pick(&store, index) {
                        store.complete_task(id, now).expect("toggle");
                    }
                }
                _ => {}
            }
        }

        let exported = focal_core::portable::export(&store, now);
        let json = serde_json::to_string(&exported).expect("serialize");
        let parsed = focal_core::portable::ExportFile::from_json(&json).expect("parse");

        let mut restored = Store::new();
        restored.import(parsed, now).expect("import");
        prop_assert_eq!(restored.snapshot(), store.snapshot());
    }
}
