use chrono::{Days, NaiveDate};

/// Days either side of today a weather date may be picked from.
pub const WINDOW_DAYS: u64 = 365;

/// Inclusive range of selectable dates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateWindow {
    pub fn around(today: NaiveDate) -> Self {
        Self {
            min: today.checked_sub_days(Days::new(WINDOW_DAYS)).unwrap_or(NaiveDate::MIN),
            max: today.checked_add_days(Days::new(WINDOW_DAYS)).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// `date` pulled into the window.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.min, self.max)
    }
}
