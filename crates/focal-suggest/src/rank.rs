//! The suggestion ranking itself.
//!
//! # Algorithm
//!
//! 1. Keep only incomplete tasks.
//! 2. With a short time window, keep only tasks without subtasks — the
//!    quick-to-finish proxy.
//! 3. Sort with a comparator driven by energy level:
//!    - low energy: fewest subtasks first (simpler tasks);
//!    - high energy: most subtasks first (complex tasks);
//!    - medium energy: earliest due date first, tasks without a due date
//!      after every dated task.
//! 4. Return the first `limit` tasks. The sort is stable, so ties keep
//!    their original store order.

use std::cmp::Ordering;

use tracing::debug;

use focal_core::model::{Energy, Task};

use crate::context::{Context, TimeWindow};

/// Default cap on the number of suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Rank `tasks` against `context` and return at most
/// [`DEFAULT_SUGGESTION_LIMIT`] suggestions.
#[must_use]
pub fn suggest<'a>(tasks: &'a [Task], context: &Context) -> Vec<&'a Task> {
    suggest_with_limit(tasks, context, DEFAULT_SUGGESTION_LIMIT)
}

/// Rank `tasks` against `context` with an explicit cap.
#[must_use]
pub fn suggest_with_limit<'a>(
    tasks: &'a [Task],
    context: &Context,
    limit: usize,
) -> Vec<&'a Task> {
    let mut candidates: Vec<&Task> = tasks
        .iter()
        .filter(|task| !task.completed)
        .filter(|task| {
            context.available_time != TimeWindow::Short || task.subtasks.is_empty()
        })
        .collect();

    candidates.sort_by(|a, b| compare(a, b, context.energy_level));
    candidates.truncate(limit);

    debug!(
        candidates = candidates.len(),
        time = %context.available_time,
        energy = %context.energy_level,
        "suggestions ranked"
    );
    candidates
}

fn compare(a: &Task, b: &Task, energy: Energy) -> Ordering {
    match energy {
        Energy::Low => a.subtask_count().cmp(&b.subtask_count()),
        Energy::High => b.subtask_count().cmp(&a.subtask_count()),
        Energy::Medium => compare_due_dates(a, b),
    }
}

/// Earliest due date first; a task without a due date sorts after any task
/// with one.
fn compare_due_dates(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use focal_core::model::Id;

    fn task_with_subtasks(title: &str, subtasks: usize) -> Task {
        let mut task = Task::new(title, Utc::now());
        task.subtasks = (0..subtasks).map(|_| Id::generate()).collect();
        task
    }

    fn due(title: &str, date: Option<(i32, u32, u32)>) -> Task {
        let mut task = Task::new(title, Utc::now());
        task.due_date = date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date"));
        task
    }

    #[test]
    fn low_energy_prefers_simple_tasks() {
        let tasks: Vec<Task> = [0, 0, 1, 2, 3, 0]
            .iter()
            .enumerate()
            .map(|(i, &n)| task_with_subtasks(&format!("t{i}"), n))
            .collect();
        let context = Context::new(TimeWindow::Medium, Energy::Low);

        let picks = suggest(&tasks, &context);
        let titles: Vec<&str> = picks.iter().map(|t| t.title.as_str()).collect();
        // The five smallest subtask counts, ascending, ties in store order.
        assert_eq!(titles, vec!["t0", "t1", "t5", "t2", "t3"]);
    }

    #[test]
    fn high_energy_prefers_complex_tasks() {
        let tasks = vec![
            task_with_subtasks("simple", 0),
            task_with_subtasks("complex", 4),
            task_with_subtasks("middling", 2),
        ];
        let context = Context::new(TimeWindow::Medium, Energy::High);

        let picks = suggest(&tasks, &context);
        let titles: Vec<&str> = picks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["complex", "middling", "simple"]);
    }

    #[test]
    fn medium_energy_sorts_by_due_date_with_undated_last() {
        let tasks = vec![
            due("undated", None),
            due("later", Some((2026, 9, 1))),
            due("soon", Some((2026, 8, 10))),
        ];
        let context = Context::new(TimeWindow::Medium, Energy::Medium);

        let picks = suggest(&tasks, &context);
        let titles: Vec<&str> = picks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["soon", "later", "undated"]);
    }

    #[test]
    fn short_window_keeps_only_leaf_tasks() {
        let tasks = vec![
            task_with_subtasks("leaf", 0),
            task_with_subtasks("branchy", 3),
        ];
        let context = Context::new(TimeWindow::Short, Energy::Low);

        let picks = suggest(&tasks, &context);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].title, "leaf");
    }

    #[test]
    fn completed_tasks_never_appear() {
        let mut done = task_with_subtasks("done", 0);
        done.completed = true;
        let tasks = vec![done, task_with_subtasks("open", 0)];
        let context = Context::default();

        let picks = suggest(&tasks, &context);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].title, "open");
    }

    #[test]
    fn at_most_five_by_default_fewer_when_scarce() {
        let tasks: Vec<Task> = (0..8).map(|i| task_with_subtasks(&format!("t{i}"), 0)).collect();
        let context = Context::default();
        assert_eq!(suggest(&tasks, &context).len(), 5);
        assert_eq!(suggest(&tasks[..3], &context).len(), 3);
        assert_eq!(suggest_with_limit(&tasks, &context, 7).len(), 7);
    }

    #[test]
    fn blockers_are_carried_but_never_filter() {
        let tasks = vec![task_with_subtasks("anything", 0)];
        let mut context = Context::default();
        context.blockers.push("waiting on landlord".into());

        // Identical output with and without blockers.
        assert_eq!(
            suggest(&tasks, &context).len(),
            suggest(&tasks, &Context::default()).len()
        );
    }
}
