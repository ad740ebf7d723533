//! Daily planner mutations.
//!
//! One plan per calendar date; the plan is created lazily the first time a
//! block lands on a date. Blocks own their time range and title; tasks are
//! only referenced.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::Store;
use crate::error::{CoreError, EntityKind};
use crate::model::{DailyPlan, Id, TimeBlock};

impl Store {
    /// Insert or replace a time block on the plan for `date`. A block with
    /// a matching id replaces the existing one in place; otherwise the
    /// block is appended. The plan is created if the date has none yet.
    ///
    /// # Errors
    ///
    /// `Validation` when the block's time range is inverted (end before
    /// start).
    pub fn upsert_block(
        &mut self,
        date: NaiveDate,
        block: TimeBlock,
        now: DateTime<Utc>,
    ) -> Result<DailyPlan, CoreError> {
        self.undo_mut().prune(now);

        if block.end_time < block.start_time {
            return Err(CoreError::Validation(format!(
                "time block ends ({}) before it starts ({})",
                block.end_time, block.start_time
            )));
        }

        if self.plan_for(date).is_none() {
            self.data_mut().daily_plans.push(DailyPlan::new(date, now));
        }
        let plan = self
            .data_mut()
            .daily_plans
            .iter_mut()
            .find(|p| p.date == date)
            .ok_or_else(|| CoreError::not_found(EntityKind::DailyPlan, date))?;

        if let Some(existing) = plan.time_blocks.iter_mut().find(|b| b.id == block.id) {
            *existing = block;
        } else {
            plan.time_blocks.push(block);
        }
        plan.updated_at = now;
        debug!(%date, blocks = plan.time_blocks.len(), "plan block upserted");
        Ok(plan.clone())
    }

    /// Remove a block from the plan for `date`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the date has no plan or the plan has no such block.
    pub fn remove_block(
        &mut self,
        date: NaiveDate,
        block_id: Id,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        let plan = self
            .data_mut()
            .daily_plans
            .iter_mut()
            .find(|p| p.date == date)
            .ok_or_else(|| CoreError::not_found(EntityKind::DailyPlan, date))?;

        let before = plan.time_blocks.len();
        plan.time_blocks.retain(|b| b.id != block_id);
        if plan.time_blocks.len() == before {
            return Err(CoreError::not_found(EntityKind::TimeBlock, block_id));
        }
        plan.updated_at = now;
        Ok(())
    }

    /// Associate a task with a block on `date`'s plan. The task must exist;
    /// the association is a weak reference and deduplicated.
    ///
    /// # Errors
    ///
    /// `NotFound` when the task, the plan, or the block does not exist.
    pub fn link_task_to_block(
        &mut self,
        date: NaiveDate,
        block_id: Id,
        task_id: Id,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        if self.task(task_id).is_none() {
            return Err(CoreError::not_found(EntityKind::Task, task_id));
        }
        let plan = self
            .data_mut()
            .daily_plans
            .iter_mut()
            .find(|p| p.date == date)
            .ok_or_else(|| CoreError::not_found(EntityKind::DailyPlan, date))?;
        let block = plan
            .time_blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or_else(|| CoreError::not_found(EntityKind::TimeBlock, block_id))?;

        if !block.task_ids.contains(&task_id) {
            block.task_ids.push(task_id);
            plan.updated_at = now;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid date")
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).expect("valid time")
    }

    #[test]
    fn upsert_creates_plan_lazily() {
        let mut store = Store::new();
        assert!(store.plan_for(date()).is_none());
        store
            .upsert_block(date(), TimeBlock::new(t(9), t(10), "Standup"), now())
            .expect("upsert");
        assert_eq!(store.plan_for(date()).expect("plan").time_blocks.len(), 1);
        // A second block lands on the same plan, not a second plan.
        store
            .upsert_block(date(), TimeBlock::new(t(10), t(11), "Email"), now())
            .expect("upsert");
        assert_eq!(store.daily_plans().len(), 1);
        assert_eq!(store.plan_for(date()).expect("plan").time_blocks.len(), 2);
    }

    #[test]
    fn upsert_replaces_matching_block_id() {
        let mut store = Store::new();
        let block = TimeBlock::new(t(9), t(10), "Standup");
        let id = block.id;
        store.upsert_block(date(), block, now()).expect("upsert");

        let mut renamed = TimeBlock::new(t(9), t(11), "Longer standup");
        renamed.id = id;
        store.upsert_block(date(), renamed, now()).expect("upsert");

        let plan = store.plan_for(date()).expect("plan");
        assert_eq!(plan.time_blocks.len(), 1);
        assert_eq!(plan.block(id).expect("block").title, "Longer standup");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut store = Store::new();
        let err = store
            .upsert_block(date(), TimeBlock::new(t(10), t(9), "Backwards"), now())
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn remove_block_requires_existing_plan_and_block() {
        let mut store = Store::new();
        assert!(matches!(
            store.remove_block(date(), Id::generate(), now()),
            Err(CoreError::NotFound { .. })
        ));

        let block = TimeBlock::new(t(9), t(10), "Standup");
        let id = block.id;
        store.upsert_block(date(), block, now()).expect("upsert");
        store.remove_block(date(), id, now()).expect("remove");
        assert!(store.plan_for(date()).expect("plan").time_blocks.is_empty());
    }

    #[test]
    fn link_requires_task_to_exist() {
        let mut store = Store::new();
        let block = TimeBlock::new(t(9), t(10), "Focus");
        let block_id = block.id;
        store.upsert_block(date(), block, now()).expect("upsert");

        assert!(matches!(
            store.link_task_to_block(date(), block_id, Id::generate(), now()),
            Err(CoreError::NotFound { .. })
        ));
    }
}
