use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::Id;

/// One planned slot in a day: a time range, a title, and the tasks worked on
/// during it. Blocks are owned by their [`DailyPlan`]; tasks are referenced,
/// not owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeBlock {
    pub id: Id,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub title: String,
    pub task_ids: Vec<Id>,
}

impl Default for TimeBlock {
    fn default() -> Self {
        Self {
            id: Id::generate(),
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            title: String::new(),
            task_ids: Vec::new(),
        }
    }
}

impl TimeBlock {
    #[must_use]
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, title: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            start_time,
            end_time,
            title: title.into(),
            task_ids: Vec::new(),
        }
    }
}

/// The plan for a single calendar date. At most one plan exists per date;
/// the store enforces the keying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub time_blocks: Vec<TimeBlock>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for DailyPlan {
    fn default() -> Self {
        Self {
            date: NaiveDate::default(),
            time_blocks: Vec::new(),
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl DailyPlan {
    #[must_use]
    pub fn new(date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            date,
            time_blocks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a block by id.
    #[must_use]
    pub fn block(&self, id: Id) -> Option<&TimeBlock> {
        self.time_blocks.iter().find(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_starts_empty() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let plan = DailyPlan::new(date, Utc::now());
        assert_eq!(plan.date, date);
        assert!(plan.time_blocks.is_empty());
    }

    #[test]
    fn block_lookup_by_id() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let mut plan = DailyPlan::new(date, Utc::now());
        let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
        let ten = NaiveTime::from_hms_opt(10, 0, 0).expect("valid time");
        let block = TimeBlock::new(nine, ten, "Deep work");
        let id = block.id;
        plan.time_blocks.push(block);
        assert_eq!(plan.block(id).map(|b| b.title.as_str()), Some("Deep work"));
        assert!(plan.block(Id::generate()).is_none());
    }
}
