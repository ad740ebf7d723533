//! Work-shift calendar mutations. All shifts live under the single
//! [`crate::model::WorkSchedule`] aggregate.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use super::Store;
use crate::error::{CoreError, EntityKind};
use crate::model::{Id, ShiftType, WorkShift};

impl Store {
    /// Add a shift to the schedule. Multiple shifts per date are allowed.
    ///
    /// # Errors
    ///
    /// `Validation` when the shift ends before it starts. Overnight shifts
    /// are expressed as two entries, one per date.
    pub fn add_shift(
        &mut self,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        shift_type: ShiftType,
        now: DateTime<Utc>,
    ) -> Result<WorkShift, CoreError> {
        self.undo_mut().prune(now);

        if end_time < start_time {
            return Err(CoreError::Validation(format!(
                "shift ends ({end_time}) before it starts ({start_time})"
            )));
        }

        let shift = WorkShift::new(date, start_time, end_time, shift_type);
        let schedule = &mut self.data_mut().work_schedule;
        schedule.shifts.push(shift.clone());
        schedule.updated_at = now;
        debug!(id = %shift.id, %date, "shift added");
        Ok(shift)
    }

    /// Remove a shift by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no shift has that id.
    pub fn remove_shift(&mut self, id: Id, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        let schedule = &mut self.data_mut().work_schedule;
        let before = schedule.shifts.len();
        schedule.shifts.retain(|s| s.id != id);
        if schedule.shifts.len() == before {
            return Err(CoreError::not_found(EntityKind::WorkShift, id));
        }
        schedule.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, day).expect("valid date")
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).expect("valid time")
    }

    #[test]
    fn add_and_remove_shift() {
        let mut store = Store::new();
        let shift = store
            .add_shift(d(1), t(8), t(16), ShiftType::Day, now())
            .expect("add");
        assert_eq!(store.schedule().shifts_on(d(1)).len(), 1);

        store.remove_shift(shift.id, now()).expect("remove");
        assert!(store.schedule().shifts.is_empty());
    }

    #[test]
    fn inverted_shift_is_rejected() {
        let mut store = Store::new();
        assert!(matches!(
            store.add_shift(d(1), t(16), t(8), ShiftType::Night, now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn remove_missing_shift_is_not_found() {
        let mut store = Store::new();
        assert!(matches!(
            store.remove_shift(Id::generate(), now()),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn multiple_shifts_per_date_are_allowed() {
        let mut store = Store::new();
        store
            .add_shift(d(2), t(6), t(12), ShiftType::Morning, now())
            .expect("add");
        store
            .add_shift(d(2), t(18), t(23), ShiftType::Evening, now())
            .expect("add");
        assert_eq!(store.schedule().shifts_on(d(2)).len(), 2);
    }
}
