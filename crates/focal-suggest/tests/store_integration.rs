//! Suggestion engine driven by a live store, end to end: tasks created
//! through the mutation engine come out ranked by the "what now" rules.

use chrono::Utc;
use focal_core::model::Energy;
use focal_core::store::{NewTask, Store};
use focal_suggest::{Context, TimeWindow, suggest};

#[test]
fn subtask_counts_from_real_linkage_drive_the_ranking() {
    let mut store = Store::new();
    let now = Utc::now();

    let branchy = store
        .create_task(NewTask::titled("plan the move"), now)
        .expect("create");
    for step in ["book movers", "pack kitchen", "forward mail"] {
        store
            .create_task(
                NewTask {
                    parent_task_id: Some(branchy.id),
                    ..NewTask::titled(step)
                },
                now,
            )
            .expect("create subtask");
    }
    store
        .create_task(NewTask::titled("water plants"), now)
        .expect("create");

    // Low energy: the three leaves and the simple task outrank the branchy
    // parent.
    let picks = suggest(store.tasks(), &Context::new(TimeWindow::Medium, Energy::Low));
    assert_eq!(picks.last().map(|t| t.title.as_str()), Some("plan the move"));

    // High energy flips it.
    let picks = suggest(store.tasks(), &Context::new(TimeWindow::Medium, Energy::High));
    assert_eq!(picks.first().map(|t| t.title.as_str()), Some("plan the move"));

    // A short window hides the parent entirely.
    let picks = suggest(store.tasks(), &Context::new(TimeWindow::Short, Energy::Low));
    assert!(picks.iter().all(|t| t.subtasks.is_empty()));
}

#[test]
fn completing_a_task_removes_it_from_suggestions() {
    let mut store = Store::new();
    let now = Utc::now();
    let task = store
        .create_task(NewTask::titled("call dentist"), now)
        .expect("create");

    assert_eq!(suggest(store.tasks(), &Context::default()).len(), 1);
    store.complete_task(task.id, now).expect("complete");
    assert!(suggest(store.tasks(), &Context::default()).is_empty());
}
