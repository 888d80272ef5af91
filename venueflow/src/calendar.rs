//! Month grid for the booking calendar.
//!
//! A month is laid out Sunday-first: one blank cell per weekday before the
//! 1st, then one cell per day carrying the bookings that start on that date.
//! The grid is computed lazily from borrowed bookings and can be iterated any
//! number of times.

use crate::types::Booking;
use chrono::{Datelike, Month, NaiveDate};
use thiserror::Error;
use venueflow_core::environment::Clock;

/// Calendar errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// Month outside `1..=12`
    #[error("month {0} is out of range")]
    InvalidMonth(u32),

    /// Year outside the range chrono can represent
    #[error("year {0} is out of range")]
    InvalidYear(i32),
}

/// The month currently displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Cursor at `year`/`month` (1-based month)
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the month is not in `1..=12` or the year
    /// cannot be represented.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidYear(year))?;
        Ok(Self { year, month })
    }

    /// Cursor at the month containing `clock.now()`
    #[must_use]
    pub fn current(clock: &dyn Clock) -> Self {
        let today = clock.now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Displayed year
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Displayed month, 1-based
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Move by `offset` months, wrapping across year boundaries
    ///
    /// Saturates at the first and last month chrono can represent.
    #[must_use]
    pub fn shift(self, offset: i32) -> Self {
        let earliest = i64::from(NaiveDate::MIN.year()) * 12;
        let latest = i64::from(NaiveDate::MAX.year()) * 12 + 11;
        let zero_based = (i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(offset))
            .clamp(earliest, latest);
        Self {
            year: i32::try_from(zero_based.div_euclid(12)).unwrap_or(self.year),
            month: u32::try_from(zero_based.rem_euclid(12) + 1).unwrap_or(self.month),
        }
    }

    /// Same year, another month (month picker)
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in `1..=12`.
    pub fn with_month(self, month: u32) -> Result<Self, CalendarError> {
        Self::new(self.year, month)
    }

    /// Same month, another year (year picker)
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidYear`] if the year cannot be represented.
    pub fn with_year(self, year: i32) -> Result<Self, CalendarError> {
        Self::new(year, self.month)
    }

    /// First day of the displayed month
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// English month name, e.g. `November`
    #[must_use]
    pub fn month_name(self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .map_or("", |month| month.name())
    }

    /// Grid of this month over `bookings`
    #[must_use]
    pub fn grid(self, bookings: &[Booking]) -> MonthGrid<'_> {
        let first = self.first_day().unwrap_or_default();
        let days = (28..=31)
            .rev()
            .find(|day| first.with_day(*day).is_some())
            .unwrap_or(28);

        MonthGrid {
            first,
            blanks: first.weekday().num_days_from_sunday(),
            days,
            bookings,
        }
    }
}

/// Years offered by the year picker: `current` and the next two
#[must_use]
pub const fn year_choices(current: i32) -> [i32; 3] {
    [current, current + 1, current + 2]
}

/// Grid cells of `year`/`month` over `bookings`
///
/// # Errors
///
/// Returns [`CalendarError`] for an out-of-range month or year.
pub fn days_in_month(year: i32, month: u32, bookings: &[Booking]) -> Result<MonthGrid<'_>, CalendarError> {
    Ok(MonthCursor::new(year, month)?.grid(bookings))
}

/// One cell of the month grid
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DayCell<'a> {
    /// Padding before the 1st
    Blank,
    /// A day of the month
    Day {
        /// Calendar date
        date: NaiveDate,
        /// Day number, 1-based
        day: u32,
        /// Bookings starting on this date, in input order
        bookings: Vec<&'a Booking>,
    },
}

impl DayCell<'_> {
    /// ISO date (`YYYY-MM-DD`) of a day cell
    #[must_use]
    pub fn iso_date(&self) -> Option<String> {
        match self {
            Self::Blank => None,
            Self::Day { date, .. } => Some(date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Lazily computed month grid
#[derive(Clone, Copy, Debug)]
pub struct MonthGrid<'a> {
    first: NaiveDate,
    blanks: u32,
    days: u32,
    bookings: &'a [Booking],
}

impl<'a> MonthGrid<'a> {
    /// Number of leading blanks (weekday of the 1st, Sunday = 0)
    #[must_use]
    pub const fn blanks(&self) -> u32 {
        self.blanks
    }

    /// Number of days in the month
    #[must_use]
    pub const fn days(&self) -> u32 {
        self.days
    }

    /// Iterate the cells from the start
    #[must_use]
    pub const fn iter(&self) -> Cells<'a> {
        Cells {
            grid: *self,
            position: 0,
        }
    }
}

impl<'a> IntoIterator for MonthGrid<'a> {
    type Item = DayCell<'a>;
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cells of a [`MonthGrid`]
#[derive(Clone, Debug)]
pub struct Cells<'a> {
    grid: MonthGrid<'a>,
    position: u32,
}

impl<'a> Iterator for Cells<'a> {
    type Item = DayCell<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let grid = &self.grid;
        if self.position >= grid.blanks + grid.days {
            return None;
        }
        let position = self.position;
        self.position += 1;

        if position < grid.blanks {
            return Some(DayCell::Blank);
        }

        let day = position - grid.blanks + 1;
        let date = grid.first.with_day(day)?;
        let bookings = grid
            .bookings
            .iter()
            .filter(|booking| booking.booking_date_time.date() == date)
            .collect();

        Some(DayCell::Day { date, day, bookings })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.grid.blanks + self.grid.days;
        let remaining = usize::try_from(total.saturating_sub(self.position)).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Cells<'_> {}
