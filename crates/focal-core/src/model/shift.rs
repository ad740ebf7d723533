use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;
use super::id::Id;

/// The kind of work shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Morning,
    #[default]
    Day,
    Evening,
    Night,
}

impl ShiftType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "morning" => Ok(Self::Morning),
            "day" => Ok(Self::Day),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            _ => Err(ParseEnumError {
                expected: "shift type",
                got: s.to_string(),
            }),
        }
    }
}

/// A single shift on the work calendar. Multiple shifts per date are allowed
/// in principle; typical usage has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkShift {
    pub id: Id,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub shift_type: ShiftType,
}

impl Default for WorkShift {
    fn default() -> Self {
        Self {
            id: Id::generate(),
            date: NaiveDate::default(),
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            shift_type: ShiftType::default(),
        }
    }
}

impl WorkShift {
    #[must_use]
    pub fn new(
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        shift_type: ShiftType,
    ) -> Self {
        Self {
            id: Id::generate(),
            date,
            start_time,
            end_time,
            shift_type,
        }
    }
}

/// All shifts for the single local user, as one aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkSchedule {
    pub shifts: Vec<WorkShift>,
    pub updated_at: DateTime<Utc>,
}

impl WorkSchedule {
    /// All shifts falling on `date`, in insertion order.
    #[must_use]
    pub fn shifts_on(&self, date: NaiveDate) -> Vec<&WorkShift> {
        self.shifts.iter().filter(|s| s.date == date).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
    }

    #[test]
    fn shift_type_round_trips() {
        for ty in [
            ShiftType::Morning,
            ShiftType::Day,
            ShiftType::Evening,
            ShiftType::Night,
        ] {
            assert_eq!(ty.to_string().parse::<ShiftType>(), Ok(ty));
        }
    }

    #[test]
    fn shifts_on_filters_by_date() {
        let mut schedule = WorkSchedule::default();
        schedule
            .shifts
            .push(WorkShift::new(d(2026, 1, 5), t(8, 0), t(16, 0), ShiftType::Day));
        schedule
            .shifts
            .push(WorkShift::new(d(2026, 1, 6), t(22, 0), t(6, 0), ShiftType::Night));
        assert_eq!(schedule.shifts_on(d(2026, 1, 5)).len(), 1);
        assert_eq!(schedule.shifts_on(d(2026, 1, 7)).len(), 0);
    }
}
