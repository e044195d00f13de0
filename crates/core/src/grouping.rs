//! Grouping of tasks by creation date for list views

use chrono::{DateTime, NaiveDate, TimeZone};
use std::collections::BTreeMap;
use tracing::warn;

use crate::task::Task;

/// Tasks created on the same calendar day.
///
/// `date` is `None` for tasks whose `created_at` is not a representable date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub date: Option<NaiveDate>,
    pub tasks: Vec<Task>,
}

impl DateGroup {
    /// Stable key, e.g. `2025-03-05`, or `undated`
    pub fn key(&self) -> String {
        match self.date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "undated".to_string(),
        }
    }

    /// Header text, e.g. `March 5, 2025`, or `Undated`
    pub fn label(&self) -> String {
        match self.date {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => "Undated".to_string(),
        }
    }
}

/// Bucket tasks by the day of `created_at` in `tz`.
///
/// Groups are ordered newest day first; tasks keep their collection order
/// within a group. Tasks without a representable creation date are
/// collected in a trailing undated group.
pub fn group_by_date<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> Vec<DateGroup> {
    let mut groups: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    let mut undated = Vec::new();

    for task in tasks {
        let Some(created) = DateTime::from_timestamp_millis(task.created_at) else {
            warn!("Task {} has out-of-range createdAt {}", task.id, task.created_at);
            undated.push(task.clone());
            continue;
        };
        let date = created.with_timezone(tz).date_naive();
        groups.entry(date).or_default().push(task.clone());
    }

    let mut result: Vec<DateGroup> = groups
        .into_iter()
        .rev()
        .map(|(date, tasks)| DateGroup {
            date: Some(date),
            tasks,
        })
        .collect();
    if !undated.is_empty() {
        result.push(DateGroup {
            date: None,
            tasks: undated,
        });
    }
    result
}
