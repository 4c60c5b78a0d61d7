//! Work days and the pay period.
//!
//! The pay period is the fixed, ordered sequence of work days over which
//! every job must be scheduled. Each day carries its own capacity (the
//! length of the working day), so short days can be modelled.
//!
//! # Time Model
//! Dates are calendar dates without time zone (`chrono::NaiveDate`).
//! Capacities are whole minutes.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::job::MINUTES_PER_HOUR;

/// One working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDay {
    /// Calendar date.
    pub date: NaiveDate,
    /// Working time available on this day (minutes).
    pub capacity_min: u32,
}

impl WorkDay {
    /// Creates a work day of `hours` hours. The capacity saturates at
    /// `u32::MAX` minutes.
    pub fn new(date: NaiveDate, hours: u32) -> Self {
        Self {
            date,
            capacity_min: hours.saturating_mul(MINUTES_PER_HOUR),
        }
    }

    /// Creates a work day with a capacity given in minutes.
    pub fn with_minutes(date: NaiveDate, capacity_min: u32) -> Self {
        Self { date, capacity_min }
    }

    /// Capacity in fractional hours.
    pub fn capacity_hours(&self) -> f64 {
        f64::from(self.capacity_min) / f64::from(MINUTES_PER_HOUR)
    }

    /// Whether this day falls on a Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        is_weekend(self.date)
    }
}

/// The ordered sequence of work days in one scheduling period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    days: Vec<WorkDay>,
}

impl PayPeriod {
    /// Creates a pay period from explicit work days (kept in the given order).
    pub fn new(days: Vec<WorkDay>) -> Self {
        Self { days }
    }

    /// `length` consecutive calendar days starting at `start`.
    pub fn consecutive(start: NaiveDate, length: usize, hours_per_day: u32) -> Self {
        let days = start
            .iter_days()
            .take(length)
            .map(|date| WorkDay::new(date, hours_per_day))
            .collect();
        Self { days }
    }

    /// `length` weekdays starting at `start`, skipping Saturdays and Sundays.
    pub fn weekdays(start: NaiveDate, length: usize, hours_per_day: u32) -> Self {
        let days = start
            .iter_days()
            .filter(|date| !is_weekend(*date))
            .take(length)
            .map(|date| WorkDay::new(date, hours_per_day))
            .collect();
        Self { days }
    }

    /// `length` consecutive days starting today (local time).
    pub fn starting_today(length: usize, hours_per_day: u32) -> Self {
        Self::consecutive(Local::now().date_naive(), length, hours_per_day)
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the pay period has no days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The work days, in order.
    pub fn days(&self) -> &[WorkDay] {
        &self.days
    }

    /// The day at a position, if any.
    pub fn get(&self, position: usize) -> Option<&WorkDay> {
        self.days.get(position)
    }

    /// Sum of all day capacities (minutes).
    pub fn total_capacity_min(&self) -> u64 {
        self.days.iter().map(|d| u64::from(d.capacity_min)).sum()
    }

    /// First and last date, if the period is non-empty.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.days.first()?.date, self.days.last()?.date))
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
