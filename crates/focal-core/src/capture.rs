//! Quick-capture line parser.
//!
//! Converts a single free-text line into a structured task draft by
//! recognizing inline tokens and stripping each matched substring from the
//! title:
//!
//! | token       | effect                                           |
//! |-------------|--------------------------------------------------|
//! | `!today`    | due date = today                                 |
//! | `!tomorrow` | due date = today + 1 day                         |
//! | `!<N>d`     | due date = today + N days                        |
//! | `!high`     | priority = high                                  |
//! | `!low`      | priority = low                                   |
//! | `#<slug>`   | project whose slug matches; sets the project     |
//! | `@<slug>`   | category whose slug matches; may repeat          |
//!
//! Tokens are case-sensitive. Only one date token applies, first match wins
//! in the precedence order `!today` > `!tomorrow` > `!<N>d`; an unapplied
//! date token stays in the title as literal text. `#`/`@` tokens that do
//! not resolve to an existing entity are likewise left untouched — they are
//! ordinary words, not errors. Each recognized token is removed exactly
//! once (its first occurrence); the residual title is trimmed once at the
//! very end, so internal spacing between surviving words is preserved
//! until that final trim.
//!
//! The parser is pure: it sees the input line, today's date, and the known
//! projects/categories, and returns a [`Draft`]. It never touches the
//! store.

use chrono::{Days, NaiveDate};

use crate::model::{Category, Id, Priority, Project};
use crate::store::NewTask;

/// The structured result of parsing one capture line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub project_id: Option<Id>,
    pub category_ids: Vec<Id>,
}

impl Draft {
    /// Convert the draft into creation input for the mutation engine.
    #[must_use]
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            due_date: self.due_date,
            project_id: self.project_id,
            category_ids: self.category_ids,
            priority: self.priority,
            ..NewTask::default()
        }
    }
}

/// Parse one capture line against the known projects and categories.
#[must_use]
pub fn parse(
    input: &str,
    today: NaiveDate,
    projects: &[Project],
    categories: &[Category],
) -> Draft {
    let mut title = input.to_string();
    let mut due_date = None;
    let mut priority = Priority::Medium;

    // Date tokens: first match wins, the rest stay literal.
    if strip_once(&mut title, "!today") {
        due_date = Some(today);
    } else if strip_once(&mut title, "!tomorrow") {
        due_date = today.checked_add_days(Days::new(1));
    } else if let Some((token, days)) = find_relative_days(&title) {
        if let Some(date) = today.checked_add_days(Days::new(days)) {
            strip_once(&mut title, &token);
            due_date = Some(date);
        }
    }

    // Priority tokens are recognized independently; when both appear, both
    // are stripped and the later assignment wins.
    if strip_once(&mut title, "!high") {
        priority = Priority::High;
    }
    if strip_once(&mut title, "!low") {
        priority = Priority::Low;
    }

    // First resolving #slug sets the project.
    let mut project_id = None;
    for token in sigil_tokens(&title, '#') {
        let slug = &token[1..];
        if let Some(project) = projects.iter().find(|p| p.slug() == slug) {
            project_id = Some(project.id);
            strip_once(&mut title, &token);
            break;
        }
    }

    // Every resolving @slug accumulates a category.
    let mut category_ids: Vec<Id> = Vec::new();
    for token in sigil_tokens(&title, '@') {
        let slug = &token[1..];
        if let Some(category) = categories.iter().find(|c| c.slug() == slug) {
            if !category_ids.contains(&category.id) {
                category_ids.push(category.id);
            }
            strip_once(&mut title, &token);
        }
    }

    Draft {
        title: title.trim().to_string(),
        due_date,
        priority,
        project_id,
        category_ids,
    }
}

/// Remove the first occurrence of `token` from `title`. Returns whether a
/// removal happened.
fn strip_once(title: &mut String, token: &str) -> bool {
    if let Some(index) = title.find(token) {
        title.replace_range(index..index + token.len(), "");
        true
    } else {
        false
    }
}

/// Find the first `!<N>d` occurrence and return `("!<N>d", N)`.
fn find_relative_days(title: &str) -> Option<(String, u64)> {
    let bytes = title.as_bytes();
    let mut search_from = 0;
    while let Some(offset) = title[search_from..].find('!') {
        let bang = search_from + offset;
        let digits_start = bang + 1;
        let mut digits_end = digits_start;
        while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
            digits_end += 1;
        }
        if digits_end > digits_start && bytes.get(digits_end) == Some(&b'd') {
            if let Ok(days) = title[digits_start..digits_end].parse::<u64>() {
                return Some((title[bang..=digits_end].to_string(), days));
            }
        }
        search_from = bang + 1;
    }
    None
}

/// Whitespace-delimited tokens starting with `sigil` and at least one more
/// character, in order of appearance.
fn sigil_tokens(title: &str, sigil: char) -> Vec<String> {
    title
        .split_whitespace()
        .filter(|word| word.starts_with(sigil) && word.len() > 1)
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 10).expect("valid date")
    }

    fn project(name: &str) -> Project {
        Project::new(name, Utc::now())
    }

    fn category(name: &str) -> Category {
        Category::new(name, Utc::now())
    }

    #[test]
    fn tomorrow_and_high_priority() {
        let draft = parse("Call doctor !tomorrow !high", today(), &[], &[]);
        assert_eq!(draft.title, "Call doctor");
        assert_eq!(draft.due_date, today().succ_opt());
        assert_eq!(draft.priority, Priority::High);
    }

    #[test]
    fn relative_days() {
        let draft = parse("Buy milk !3d", today(), &[], &[]);
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(
            draft.due_date,
            NaiveDate::from_ymd_opt(2026, 7, 13)
        );
    }

    #[test]
    fn today_token() {
        let draft = parse("!today Water plants", today(), &[], &[]);
        assert_eq!(draft.title, "Water plants");
        assert_eq!(draft.due_date, Some(today()));
    }

    #[test]
    fn first_date_token_wins_rest_stay_literal() {
        let draft = parse("Pay rent !today !3d", today(), &[], &[]);
        assert_eq!(draft.due_date, Some(today()));
        assert_eq!(draft.title, "Pay rent !3d");
    }

    #[test]
    fn no_tokens_means_defaults() {
        let draft = parse("Just a plain title", today(), &[], &[]);
        assert_eq!(draft.title, "Just a plain title");
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.project_id, None);
        assert!(draft.category_ids.is_empty());
    }

    #[test]
    fn tokens_are_case_sensitive() {
        let draft = parse("Ship it !TODAY", today(), &[], &[]);
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.title, "Ship it !TODAY");
    }

    #[test]
    fn resolving_project_and_categories() {
        let work = project("Deep Work");
        let errands = category("Errands");
        let home = category("Home Life");
        let draft = parse(
            "Fix gutters #deep-work @errands @home-life",
            today(),
            &[work.clone()],
            &[errands.clone(), home.clone()],
        );
        assert_eq!(draft.title, "Fix gutters");
        assert_eq!(draft.project_id, Some(work.id));
        assert_eq!(draft.category_ids, vec![errands.id, home.id]);
    }

    #[test]
    fn unresolved_slugs_stay_in_title() {
        let draft = parse("Read paper #nonexistent @nowhere", today(), &[], &[]);
        assert_eq!(draft.title, "Read paper #nonexistent @nowhere");
        assert_eq!(draft.project_id, None);
        assert!(draft.category_ids.is_empty());
    }

    #[test]
    fn both_priority_tokens_strip_and_low_wins() {
        let draft = parse("Tidy desk !high !low", today(), &[], &[]);
        assert_eq!(draft.title, "Tidy desk");
        assert_eq!(draft.priority, Priority::Low);
    }

    #[test]
    fn internal_spacing_survives_until_final_trim() {
        // Stripping the middle token leaves a double space between words;
        // only the ends are trimmed.
        let draft = parse("Buy !high milk", today(), &[], &[]);
        assert_eq!(draft.title, "Buy  milk");
        assert_eq!(draft.priority, Priority::High);
    }

    #[test]
    fn draft_feeds_the_mutation_engine() {
        let work = project("Deep Work");
        let draft = parse("Plan sprint #deep-work !2d", today(), &[work.clone()], &[]);
        let new = draft.into_new_task();
        assert_eq!(new.title, "Plan sprint");
        assert_eq!(new.project_id, Some(work.id));
        assert_eq!(new.due_date, NaiveDate::from_ymd_opt(2026, 7, 12));
    }
}
