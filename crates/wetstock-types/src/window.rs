//! Query time windows.

use chrono::{DateTime, TimeDelta, Utc};

use crate::WindowError;

/// A closed time interval bounding a query.
///
/// The window end is fixed when the window is constructed; operations that
/// paginate over a window never re-evaluate "now" between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (inclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new window, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start > end {
            return Err(WindowError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a window covering the trailing `days` days, ending now.
    #[must_use]
    pub fn trailing_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - TimeDelta::days(days),
            end,
        }
    }

    /// Creates a window from `start` to now.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is in the future.
    pub fn ending_now(start: DateTime<Utc>) -> Result<Self, WindowError> {
        Self::new(start, Utc::now())
    }

    /// Returns the span of the window.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Returns true if the window contains the given instant.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
