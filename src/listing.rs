//! Searching and selecting confirmed tasks for display.

use crate::task_store::Task;

/// Tasks whose task title, task description or request title contain `term`,
/// ignoring case. Order is preserved; an empty term matches everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|task| {
            task.task_title.to_lowercase().contains(&needle)
                || task.task_description.to_lowercase().contains(&needle)
                || task.request_title.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Full record for a selected row.
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, description: &str, request_description: &str) -> Task {
        Task {
            id: id.to_string(),
            task_title: format!("{} - Comprehensive Action Plan", title),
            task_description: description.to_string(),
            request_title: title.to_string(),
            request_description: request_description.to_string(),
            submission_date: "2026-10-17T09:30:00.000Z".to_string(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Plan launch", "Coordinate the product launch", "launch it"),
            task("2", "Hire designer", "Interview Portfolio candidates", "we need help"),
        ]
    }

    #[test]
    fn empty_term_returns_everything_in_order() {
        let tasks = sample();
        let ids: Vec<&str> = filter_tasks(&tasks, "").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn matches_only_second_description() {
        let tasks = sample();
        let hits = filter_tasks(&tasks, "portfolio");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn matches_are_case_insensitive_across_searched_fields() {
        let tasks = sample();
        assert_eq!(filter_tasks(&tasks, "PLAN LAUNCH").len(), 1);
        assert_eq!(filter_tasks(&tasks, "comprehensive").len(), 2);
    }

    #[test]
    fn request_description_is_not_searched() {
        let tasks = sample();
        assert!(filter_tasks(&tasks, "we need help").is_empty());
    }

    #[test]
    fn find_returns_untruncated_record() {
        let long = "x".repeat(500);
        let tasks = vec![task("42", "Long", &long, "d")];
        let found = find_task(&tasks, "42").expect("present");
        assert_eq!(found.task_description.len(), 500);
        assert!(find_task(&tasks, "43").is_none());
    }
}
