//! Calendar clock
//!
//! The daily bonus resets on the local calendar day. Engines read the date
//! through `Clock` so tests can pin or advance it.

use chrono::{Days, Local, NaiveDate};
use parking_lot::Mutex;

/// Source of the current local calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// System clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Build from a year/month/day triple, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::new)
    }

    pub fn set(&self, date: NaiveDate) {
        *self.date.lock() = date;
    }

    /// Move forward by `days` calendar days (saturates at the chrono max date)
    pub fn advance_days(&self, days: u64) {
        let mut date = self.date.lock();
        *date = date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock()
    }
}
